//! Article persistence.
//!
//! Handlers only see [`ArticleStore`]; the concrete backend is chosen at
//! startup and shared behind an `Arc`. Every method is a single store
//! round-trip, so implementations must be safe to call concurrently
//! without extra locking.

use crate::models::{Article, ArticleFields};
use crate::services::MongoDb;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_document, Document};
use mongodb::options::FindOptions;
use service_core::error::AppError;

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Insert a new article and return the identifier the store assigned.
    async fn insert(&self, fields: ArticleFields) -> Result<ObjectId, AppError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Article>, AppError>;

    /// Every article in store iteration order, without identifiers.
    async fn list(&self) -> Result<Vec<ArticleFields>, AppError>;

    /// `$set` all fields on the matching article. Returns the number of
    /// documents actually modified, so rewriting identical values yields 0.
    async fn update_by_id(&self, id: ObjectId, fields: ArticleFields) -> Result<u64, AppError>;

    async fn delete_by_id(&self, id: ObjectId) -> Result<u64, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

/// `{ $set: { title, content, author } }`. Every field is written, empty or not.
fn update_document(fields: &ArticleFields) -> Result<Document, AppError> {
    let set = to_document(fields).map_err(|e| {
        AppError::InternalError(anyhow::anyhow!("Failed to encode article: {}", e))
    })?;
    Ok(doc! { "$set": set })
}

fn list_options() -> FindOptions {
    FindOptions::builder().projection(doc! { "_id": 0 }).build()
}

#[derive(Clone)]
pub struct MongoArticleStore {
    db: MongoDb,
}

impl MongoArticleStore {
    pub fn new(db: MongoDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ArticleStore for MongoArticleStore {
    async fn insert(&self, fields: ArticleFields) -> Result<ObjectId, AppError> {
        let result = self
            .db
            .articles()
            .insert_one(Article::new(fields), None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert article: {}", e);
                AppError::from(e)
            })?;

        result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "Store returned a non-ObjectId identifier: {}",
                result.inserted_id
            ))
        })
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Article>, AppError> {
        self.db
            .articles()
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(AppError::from)
    }

    async fn list(&self) -> Result<Vec<ArticleFields>, AppError> {
        let cursor = self
            .db
            .articles()
            .clone_with_type::<ArticleFields>()
            .find(doc! {}, list_options())
            .await
            .map_err(|e| {
                tracing::error!("Failed to query articles: {}", e);
                AppError::from(e)
            })?;

        cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to read articles cursor: {}", e);
            AppError::from(e)
        })
    }

    async fn update_by_id(&self, id: ObjectId, fields: ArticleFields) -> Result<u64, AppError> {
        let update = update_document(&fields)?;

        let result = self
            .db
            .articles()
            .update_one(doc! { "_id": id }, update, None)
            .await
            .map_err(|e| {
                tracing::error!(article_id = %id, "Failed to update article: {}", e);
                AppError::from(e)
            })?;

        Ok(result.modified_count)
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<u64, AppError> {
        let result = self
            .db
            .articles()
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| {
                tracing::error!(article_id = %id, "Failed to delete article: {}", e);
                AppError::from(e)
            })?;

        Ok(result.deleted_count)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.db.health_check().await
    }
}
