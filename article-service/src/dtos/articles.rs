use crate::models::{Article, ArticleFields};
use serde::{Deserialize, Serialize};

/// Request body for create and update. Missing fields decode to empty
/// strings; an `id` key, if sent, is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticlePayload {
    pub title: String,
    pub content: String,
    pub author: String,
}

impl From<ArticlePayload> for ArticleFields {
    fn from(payload: ArticlePayload) -> Self {
        Self {
            title: payload.title,
            content: payload.content,
            author: payload.author,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self {
            id: article.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: article.fields.title,
            content: article.fields.content,
            author: article.fields.author,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatedResponse {
    pub updated: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn payload_missing_fields_decode_to_empty() {
        let payload: ArticlePayload = serde_json::from_str(r#"{"title":"X"}"#).unwrap();
        assert_eq!(payload.title, "X");
        assert_eq!(payload.content, "");
        assert_eq!(payload.author, "");
    }

    #[test]
    fn payload_ignores_client_supplied_id() {
        let payload: ArticlePayload =
            serde_json::from_str(r#"{"id":"123","title":"T","content":"C","author":"A"}"#)
                .unwrap();
        let fields = ArticleFields::from(payload);
        assert_eq!(fields.title, "T");
        assert_eq!(fields.author, "A");
    }

    #[test]
    fn payload_rejects_type_mismatch() {
        assert!(serde_json::from_str::<ArticlePayload>(r#"{"title":42}"#).is_err());
    }

    #[test]
    fn response_renders_id_as_hex() {
        let id = ObjectId::new();
        let response = ArticleResponse::from(Article {
            id: Some(id),
            fields: ArticleFields::default(),
        });
        assert_eq!(response.id, id.to_hex());
        assert_eq!(response.id.len(), 24);
    }
}
