//! Process-local article store, selected with `STORE_BACKEND=memory`.
//!
//! Mirrors the MongoDB contract: ids come from [`ObjectId::new`], list order
//! is unspecified, and updates only count when a value changes.

use crate::models::{Article, ArticleFields};
use crate::services::ArticleStore;
use async_trait::async_trait;
use dashmap::DashMap;
use mongodb::bson::oid::ObjectId;
use service_core::error::AppError;

#[derive(Default)]
pub struct InMemoryArticleStore {
    articles: DashMap<ObjectId, ArticleFields>,
}

impl InMemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

#[async_trait]
impl ArticleStore for InMemoryArticleStore {
    async fn insert(&self, fields: ArticleFields) -> Result<ObjectId, AppError> {
        let id = ObjectId::new();
        self.articles.insert(id, fields);
        Ok(id)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Article>, AppError> {
        Ok(self.articles.get(&id).map(|entry| Article {
            id: Some(id),
            fields: entry.value().clone(),
        }))
    }

    async fn list(&self) -> Result<Vec<ArticleFields>, AppError> {
        Ok(self
            .articles
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn update_by_id(&self, id: ObjectId, fields: ArticleFields) -> Result<u64, AppError> {
        match self.articles.get_mut(&id) {
            Some(mut entry) if *entry != fields => {
                *entry = fields;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete_by_id(&self, id: ObjectId) -> Result<u64, AppError> {
        Ok(self.articles.remove(&id).map_or(0, |_| 1))
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
