//! JSON shapes returned by the pkblog HTTP API.
//!
//! Field names are part of the public contract consumed by the blog frontend
//! and must not change without a coordinated release.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Full post projection, including the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub id: String,
    pub post_id: i32,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub date: i32,
    pub author: String,
    pub colors: Vec<String>,
}

/// Listing projection: the post without its body or date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: String,
    pub post_id: i32,
    pub title: String,
    pub tags: Vec<String>,
    pub author: String,
    pub colors: Vec<String>,
}

impl From<PostView> for PostSummary {
    fn from(post: PostView) -> Self {
        Self {
            id: post.id,
            post_id: post.post_id,
            title: post.title,
            tags: post.tags,
            author: post.author,
            colors: post.colors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemView {
    pub id: String,
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub banner: Option<String>,
    pub color: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created: Option<OffsetDateTime>,
    pub description: Option<String>,
    pub tag: Option<String>,
}

/// One row of the public member listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberListEntry {
    pub display: Option<String>,
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberView {
    pub display: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub id: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub created: Option<OffsetDateTime>,
    pub color: Option<String>,
    pub avatar: Option<String>,
    pub banner: Option<String>,
    pub birthday: Option<String>,
    pub pronouns: Option<String>,
}

/// Body of every JSON error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
