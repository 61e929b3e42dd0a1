//! Read-side post queries.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::entities::PostRecord;

#[derive(Debug, Error)]
pub enum PostError {
    #[error("post key `{raw}` is not a 32-bit integer")]
    InvalidArgument { raw: String },
    #[error("no post with key {key}")]
    NotFound { key: i32 },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Clone)]
pub struct PostService {
    repo: Arc<dyn PostsRepo>,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostsRepo>) -> Self {
        Self { repo }
    }

    pub async fn list_posts(&self) -> Result<Vec<PostRecord>, PostError> {
        let posts = self.repo.list_posts().await?;
        debug!(target = "pkblog::posts", count = posts.len(), "listed posts");
        Ok(posts)
    }

    /// Resolve a post from the raw path segment.
    pub async fn get_post(&self, raw: &str) -> Result<PostRecord, PostError> {
        let key = parse_post_key(raw)?;
        self.repo
            .find_by_post_key(key)
            .await?
            .ok_or(PostError::NotFound { key })
    }

    pub async fn health_check(&self) -> Result<(), RepoError> {
        self.repo.ping().await
    }
}

/// Parse a base-10 signed 32-bit key; an optional leading sign is accepted.
pub fn parse_post_key(raw: &str) -> Result<i32, PostError> {
    raw.parse::<i32>().map_err(|_| PostError::InvalidArgument {
        raw: raw.to_string(),
    })
}
