use crate::dtos::{
    ArticlePayload, ArticleResponse, CreatedResponse, DeletedResponse, UpdatedResponse,
};
use crate::models::parse_article_id;
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

fn decode_payload(
    payload: Result<Json<ArticlePayload>, JsonRejection>,
) -> Result<ArticlePayload, AppError> {
    payload
        .map(|Json(payload)| payload)
        .map_err(|rejection| AppError::BadRequest(anyhow::anyhow!(rejection.body_text())))
}

pub async fn create_article(
    State(state): State<AppState>,
    payload: Result<Json<ArticlePayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let payload = decode_payload(payload)?;

    let id = state.store.insert(payload.into()).await?;

    tracing::info!(article_id = %id, "Article created");

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse { id: id.to_hex() }),
    ))
}

pub async fn get_article(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_article_id(&article_id)?;

    // A failed lookup is reported the same way as a miss.
    let article = state
        .store
        .find_by_id(id)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(article_id = %id, "Article lookup failed: {}", e);
            None
        })
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Article not found")))?;

    Ok(Json(ArticleResponse::from(article)))
}

pub async fn list_articles(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let articles = state.store.list().await?;

    tracing::debug!(count = articles.len(), "Listed articles");

    Ok(Json(articles))
}

/// Overwrites title, content and author on the matched article. Fields
/// omitted from the body are written as empty strings, not left alone.
pub async fn update_article(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
    payload: Result<Json<ArticlePayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_article_id(&article_id)?;
    let payload = decode_payload(payload)?;

    let updated = state.store.update_by_id(id, payload.into()).await?;

    tracing::info!(article_id = %id, updated, "Article update applied");

    Ok(Json(UpdatedResponse { updated }))
}

pub async fn delete_article(
    State(state): State<AppState>,
    Path(article_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_article_id(&article_id)?;

    let deleted = state.store.delete_by_id(id).await?;

    tracing::info!(article_id = %id, deleted, "Article delete applied");

    Ok(Json(DeletedResponse { deleted }))
}
