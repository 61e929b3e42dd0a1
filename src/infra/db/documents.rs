//! Stored document shapes and their conversion into domain records.

use std::fmt;

use mongodb::bson::Bson;
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::Deserialize;

use crate::application::repos::RepoError;
use crate::domain::entities::PostRecord;

/// A post exactly as it is laid out in the `posts` collection.
#[derive(Debug, Clone, Deserialize)]
pub struct PostDocument {
    #[serde(rename = "_id")]
    pub id: Bson,
    #[serde(rename = "_post_id_", deserialize_with = "whole_i32")]
    pub post_id: i32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "whole_i32")]
    pub date: i32,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub color: Vec<String>,
}

/// Older documents store numbers as doubles; accept them when they are whole
/// and fit in 32 bits.
fn whole_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    struct WholeI32;

    impl<'de> Visitor<'de> for WholeI32 {
        type Value = i32;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a whole number within the 32-bit signed range")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<i32, E> {
            i32::try_from(value).map_err(|_| E::invalid_value(Unexpected::Signed(value), &self))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<i32, E> {
            i32::try_from(value).map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<i32, E> {
            let in_range = value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX);
            if value.fract() == 0.0 && in_range {
                Ok(value as i32)
            } else {
                Err(E::invalid_value(Unexpected::Float(value), &self))
            }
        }
    }

    deserializer.deserialize_any(WholeI32)
}

impl TryFrom<PostDocument> for PostRecord {
    type Error = RepoError;

    fn try_from(doc: PostDocument) -> Result<Self, Self::Error> {
        let id = match doc.id {
            Bson::String(id) => id,
            Bson::ObjectId(oid) => oid.to_hex(),
            other => {
                return Err(RepoError::decode(format!(
                    "post {} has an unsupported _id type {:?}",
                    doc.post_id,
                    other.element_type()
                )));
            }
        };

        Ok(PostRecord {
            id,
            post_id: doc.post_id,
            title: doc.title,
            content: doc.content,
            tags: doc.tags,
            date: doc.date,
            author: doc.author,
            colors: doc.color,
        })
    }
}
