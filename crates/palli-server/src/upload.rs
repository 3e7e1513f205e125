//! `POST /uploads/documents` — add a file to the document repository.
//!
//! The body carries the file base64-encoded. Only the catalogue entry is
//! kept: size, extension, uploader and a SHA-256 of the content. The bytes
//! themselves are discarded.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use palli_core::{bulletin::DocumentItem, store::SchoolStore};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::{AppState, Error};

/// Recorded as the uploader when nobody is signed in.
const ANONYMOUS: &str = "Unknown";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadBody {
  pub file_name: String,
  /// Base64 (standard alphabet, padded).
  pub content:   String,
}

pub async fn document<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<UploadBody>,
) -> Result<impl IntoResponse, Error>
where
  S: SchoolStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let bytes = B64
    .decode(body.content.trim())
    .map_err(|e| Error::BadRequest(format!("content is not valid base64: {e}")))?;

  let uploader = state
    .session
    .read()
    .await
    .user
    .as_ref()
    .map_or_else(|| ANONYMOUS.to_owned(), |u| u.name.clone());

  let digest = hex::encode(Sha256::digest(&bytes));
  let document = DocumentItem::from_upload(
    &body.file_name,
    bytes.len(),
    state.config.max_upload_bytes,
    &uploader,
    state.store.today(),
    Some(digest),
  )?;

  let document = state
    .store
    .add_document(document)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  tracing::info!(
    title = %document.title,
    size = %document.size,
    uploaded_by = %document.uploaded_by,
    "document uploaded"
  );
  Ok((StatusCode::CREATED, Json(document)))
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, header},
  };
  use palli_core::session::{Role, Session};
  use palli_store_memory::MemoryStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;
  use crate::{ServerConfig, router};

  fn app(max_upload_bytes: usize, session: Session) -> axum::Router {
    let config = ServerConfig {
      session_file: std::env::temp_dir()
        .join(format!("palli-{}.role", uuid::Uuid::new_v4())),
      max_upload_bytes,
      ..ServerConfig::default()
    };
    router(AppState::new(MemoryStore::demo().unwrap(), config, session))
  }

  fn upload(file_name: &str, bytes: &[u8]) -> Request<Body> {
    let body = json!({ "fileName": file_name, "content": B64.encode(bytes) });
    Request::builder()
      .method("POST")
      .uri("/uploads/documents")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(body.to_string()))
      .unwrap()
  }

  async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[tokio::test]
  async fn upload_is_catalogued_with_hash_and_uploader() {
    let mut session = Session::default();
    session.login("k@school", Role::Teacher, None);
    let app = app(1024, session);

    let resp = app.clone().oneshot(upload("notes.pdf", b"hello")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let doc = json_body(resp).await;
    assert_eq!(doc["category"], "Material");
    assert_eq!(doc["type"], "pdf");
    assert_eq!(doc["size"], "0.00 MB");
    assert_eq!(doc["uploadedBy"], "Mrs. Kavitha S");
    assert_eq!(
      doc["contentHash"],
      "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );

    let list = app
      .oneshot(
        Request::builder()
          .uri("/api/documents")
          .body(Body::empty())
          .unwrap(),
      )
      .await
      .unwrap();
    assert_eq!(json_body(list).await[0]["title"], "notes.pdf");
  }

  #[tokio::test]
  async fn anonymous_upload_and_size_limit() {
    let app = app(4, Session::default());

    let resp = app.clone().oneshot(upload("README", b"abcd")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let doc = json_body(resp).await;
    assert_eq!(doc["uploadedBy"], "Unknown");
    assert_eq!(doc["type"], "file");

    let resp = app.oneshot(upload("big.bin", b"abcde")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
  }

  #[tokio::test]
  async fn configured_limit_above_default_is_honoured() {
    let app = app(20 * 1024 * 1024, Session::default());
    let eleven_mib = vec![0u8; 11 * 1024 * 1024];

    let resp = app.oneshot(upload("assembly.mp4", &eleven_mib)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(json_body(resp).await["size"], "11.00 MB");
  }

  #[tokio::test]
  async fn garbage_content_is_rejected() {
    let app = app(1024, Session::default());
    let req = Request::builder()
      .method("POST")
      .uri("/uploads/documents")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(r#"{"fileName":"x.txt","content":"***"}"#))
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }
}
