//! Domain entities read from the document store and the identity API.

use serde::Serialize;
use time::OffsetDateTime;

use crate::domain::types::Visibility;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostRecord {
    pub id: String,
    pub post_id: i32,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub date: i32,
    pub author: String,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemRecord {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub tag: Option<String>,
    pub avatar_url: Option<String>,
    pub banner: Option<String>,
    pub color: Option<String>,
    pub created: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRecord {
    pub id: String,
    pub name: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub pronouns: Option<String>,
    pub birthday: Option<String>,
    pub color: Option<String>,
    pub avatar_url: Option<String>,
    pub banner: Option<String>,
    pub created: Option<OffsetDateTime>,
    pub visibility: Visibility,
}

impl MemberRecord {
    pub fn is_private(&self) -> bool {
        self.visibility.is_private()
    }
}
