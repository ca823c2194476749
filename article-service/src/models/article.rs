use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

/// A stored article. `_id` is assigned by the store on insert and is
/// left out of the document until then.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(flatten)]
    pub fields: ArticleFields,
}

/// The article body without its identifier. This is what `GET /articles`
/// returns per entry and what an update `$set`s on the matched document.
/// Fields missing from a stored document read back as empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ArticleFields {
    pub title: String,
    pub content: String,
    pub author: String,
}

impl Article {
    pub fn new(fields: ArticleFields) -> Self {
        Self { id: None, fields }
    }
}

pub fn parse_article_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw)
        .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid article id '{}': {}", raw, e)))
}
