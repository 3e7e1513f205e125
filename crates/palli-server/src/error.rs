//! Error types and axum `IntoResponse` implementation.

use std::path::PathBuf;

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("not signed in")]
  Unauthorized,
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error(transparent)]
  Core(#[from] palli_core::Error),
  #[error("session file {path}: {source}")]
  SessionFile {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = match &self {
      Error::Unauthorized => StatusCode::UNAUTHORIZED,
      Error::BadRequest(_) => StatusCode::BAD_REQUEST,
      Error::Core(palli_core::Error::UploadTooLarge { .. }) => {
        StatusCode::PAYLOAD_TOO_LARGE
      }
      Error::Core(_) => StatusCode::BAD_REQUEST,
      Error::SessionFile { .. } | Error::Store(_) => {
        tracing::error!(error = %self, "request failed");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
