//! Handlers for `/documents` and `/notices` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/documents` | Newest first; optional `?q` over title and category |
//! | `POST`   | `/documents` | Body: [`DocumentItem`]; catalogue entry only |
//! | `GET`    | `/notices` | Newest first |
//! | `POST`   | `/notices` | Body: [`NewNotice`]; dated today |
//! | `DELETE` | `/notices/{id}` | Always 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use palli_core::{
  bulletin::{DocumentItem, NewNotice, Notice},
  ids::NoticeId,
  store::SchoolStore,
};
use serde::Deserialize;

use crate::error::ApiError;

/// Who a notice is attributed to when the form leaves it blank.
const DEFAULT_POSTER: &str = "Admin";

// ─── Documents ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DocumentParams {
  pub q: Option<String>,
}

/// `GET /documents[?q=..]`
pub async fn list_documents<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<DocumentParams>,
) -> Result<Json<Vec<DocumentItem>>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let text = params.q.as_deref().filter(|q| !q.trim().is_empty());
  let documents = store
    .list_documents(text)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(documents))
}

/// `POST /documents`
pub async fn create_document<S>(
  State(store): State<Arc<S>>,
  Json(document): Json<DocumentItem>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if document.title.trim().is_empty() {
    return Err(palli_core::Error::MissingField("title").into());
  }
  let document = store
    .add_document(document)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(document)))
}

// ─── Notices ─────────────────────────────────────────────────────────────────

/// `GET /notices`
pub async fn list_notices<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Notice>>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let notices = store
    .list_notices()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(notices))
}

/// `POST /notices`
pub async fn create_notice<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewNotice>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let notice = body.into_notice(store.today(), DEFAULT_POSTER);
  notice.validate()?;
  let notice = store
    .add_notice(notice)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(notice)))
}

/// `DELETE /notices/{id}`
pub async fn delete_notice<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<NoticeId>,
) -> Result<StatusCode, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  store
    .delete_notice(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(StatusCode::NO_CONTENT)
}
