//! HTTP server for Palli.
//!
//! Mounts the JSON API from [`palli_api`] under `/api` and adds the pieces
//! that need a signed-in user: the session itself, composing leave
//! applications, and document uploads.

pub mod error;
pub mod session;
pub mod upload;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::{DefaultBodyLimit, Request, State},
  http::{HeaderValue, header},
  middleware::{self, Next},
  response::Response,
  routing::{get, post},
};
use palli_core::{bulletin::MAX_UPLOAD_BYTES, session::Session, store::SchoolStore};
use serde::Deserialize;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use session::RoleFile;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `palli.toml` and
/// `PALLI_*` environment variables. Every field has a default.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:             String,
  pub port:             u16,
  /// JSON snapshot to start from. The bundled demo school when unset.
  pub seed_path:        Option<PathBuf>,
  /// Where the signed-in role is remembered between restarts.
  pub session_file:     PathBuf,
  /// Largest decoded upload accepted.
  pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:             "127.0.0.1".to_string(),
      port:             8080,
      seed_path:        None,
      session_file:     PathBuf::from("palli-session.role"),
      max_upload_bytes: MAX_UPLOAD_BYTES,
    }
  }
}

impl ServerConfig {
  /// Request body limit for the upload route: base64 inflates by 4/3, plus
  /// room for the JSON envelope.
  fn upload_body_limit(&self) -> usize { self.max_upload_bytes / 3 * 4 + 64 * 1024 }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: SchoolStore> {
  pub store:   Arc<S>,
  pub config:  Arc<ServerConfig>,
  pub session: Arc<RwLock<Session>>,
  pub roles:   RoleFile,
}

impl<S: SchoolStore> AppState<S> {
  pub fn new(store: S, config: ServerConfig, session: Session) -> Self {
    let roles = RoleFile::new(config.session_file.clone());
    Self {
      store: Arc::new(store),
      config: Arc::new(config),
      session: Arc::new(RwLock::new(session)),
      roles,
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full axum [`Router`] for the server.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: SchoolStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let upload_limit = state.config.upload_body_limit();

  Router::new()
    .route("/healthz", get(|| async { "ok" }))
    .route("/session", get(session::current::<S>))
    .route("/session/login", post(session::login::<S>))
    .route("/session/logout", post(session::logout::<S>))
    .route("/session/language", post(session::toggle_language::<S>))
    .route("/session/leaves", post(session::apply_leave::<S>))
    .route(
      "/uploads/documents",
      post(upload::document::<S>).layer(DefaultBodyLimit::max(upload_limit)),
    )
    .with_state(state.clone())
    .nest("/api", palli_api::api_router(state.store.clone()))
    .layer(middleware::from_fn_with_state(
      state,
      session_language::<S>,
    ))
    .layer(TraceLayer::new_for_http())
}

/// Requests without an `Accept-Language` header get the session's language,
/// so API status messages follow the language toggle.
async fn session_language<S>(
  State(state): State<AppState<S>>,
  mut req: Request,
  next: Next,
) -> Response
where
  S: SchoolStore + Clone + Send + Sync + 'static,
{
  if !req.headers().contains_key(header::ACCEPT_LANGUAGE) {
    let language = state.session.read().await.language;
    req
      .headers_mut()
      .insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static(language.tag()));
  }
  next.run(req).await
}
