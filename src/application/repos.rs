//! Traits describing the store and identity adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{MemberRecord, PostRecord, SystemRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("document store unavailable: {0}")]
    Unavailable(String),
    #[error("document did not match the expected shape: {0}")]
    Decode(String),
}

impl RepoError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        Self::Unavailable(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// All posts in the store's natural order.
    async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError>;

    async fn find_by_post_key(&self, key: i32) -> Result<Option<PostRecord>, RepoError>;

    async fn ping(&self) -> Result<(), RepoError>;
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity api request failed: {0}")]
    Transport(String),
    #[error("identity api responded with status {status}")]
    Status { status: u16 },
    #[error("identity api payload could not be decoded: {0}")]
    Decode(String),
    #[error("member `{member_id}` is not publicly visible")]
    Hidden { member_id: String },
}

#[async_trait]
pub trait IdentityApi: Send + Sync {
    async fn system(&self, system_id: &str) -> Result<SystemRecord, IdentityError>;

    async fn members(&self, system_id: &str) -> Result<Vec<MemberRecord>, IdentityError>;

    async fn member(&self, member_id: &str) -> Result<MemberRecord, IdentityError>;
}
