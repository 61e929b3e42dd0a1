//! MongoDB-backed repository implementation.

mod documents;

pub use documents::PostDocument;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Client, Collection, Database,
    bson::doc,
    error::{Error as MongoError, ErrorKind},
};
use tracing::info;

use crate::application::repos::{PostsRepo, RepoError};
use crate::config::DatabaseSettings;
use crate::domain::entities::PostRecord;

/// Shared handle to the posts collection.
///
/// The driver pools connections internally, so clones share one client.
#[derive(Clone)]
pub struct MongoRepositories {
    database: Database,
    posts: Collection<PostDocument>,
}

impl MongoRepositories {
    pub fn new(client: &Client, settings: &DatabaseSettings) -> Self {
        let database = client.database(&settings.name);
        let posts = database.collection::<PostDocument>(&settings.collection);
        Self { database, posts }
    }

    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, MongoError> {
        let client = Client::with_uri_str(&settings.url).await?;
        info!(
            target = "pkblog::db",
            database = %settings.name,
            collection = %settings.collection,
            "document store client created"
        );
        Ok(Self::new(&client, settings))
    }

    pub async fn health_check(&self) -> Result<(), MongoError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
    }
}

/// Split driver failures into undecodable documents and everything else.
pub fn map_mongo_error(err: MongoError) -> RepoError {
    if matches!(*err.kind, ErrorKind::BsonDeserialization(_)) {
        RepoError::decode(err)
    } else {
        RepoError::unavailable(err)
    }
}

#[async_trait]
impl PostsRepo for MongoRepositories {
    async fn list_posts(&self) -> Result<Vec<PostRecord>, RepoError> {
        let cursor = self.posts.find(doc! {}).await.map_err(map_mongo_error)?;
        let documents: Vec<PostDocument> = cursor.try_collect().await.map_err(map_mongo_error)?;

        documents.into_iter().map(PostRecord::try_from).collect()
    }

    async fn find_by_post_key(&self, key: i32) -> Result<Option<PostRecord>, RepoError> {
        self.posts
            .find_one(doc! { "_post_id_": key })
            .await
            .map_err(map_mongo_error)?
            .map(PostRecord::try_from)
            .transpose()
    }

    async fn ping(&self) -> Result<(), RepoError> {
        self.health_check().await.map_err(RepoError::unavailable)
    }
}
