//! Session endpoints and role persistence.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/session` | Current user (or `null`) and language |
//! | `POST` | `/session/login` | Body: [`LoginBody`]; any credentials are accepted |
//! | `POST` | `/session/logout` | 204 |
//! | `POST` | `/session/language` | Toggles English/Tamil |
//! | `POST` | `/session/leaves` | Body: [`LeaveForm`]; filed as the signed-in user |
//!
//! The signed-in role is written to a small file on login and removed on
//! logout, so a restarted server comes back signed in with the same role.

use std::path::PathBuf;

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use palli_api::{Lang, Saved};
use palli_core::{
  i18n,
  session::{Language, Role, Session, User},
  store::{SchoolStore, StudentQuery},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error};

// ─── Role file ───────────────────────────────────────────────────────────────

/// The persisted role of the last signed-in user.
#[derive(Debug, Clone)]
pub struct RoleFile {
  path: PathBuf,
}

impl RoleFile {
  pub fn new(path: PathBuf) -> Self { Self { path } }

  /// The remembered role, if any. An unreadable role is treated as none.
  pub async fn load(&self) -> Result<Option<Role>, Error> {
    match tokio::fs::read_to_string(&self.path).await {
      Ok(raw) => Ok(raw.trim().parse().ok()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
      Err(source) => Err(self.error(source)),
    }
  }

  pub async fn save(&self, role: Role) -> Result<(), Error> {
    tokio::fs::write(&self.path, role.to_string())
      .await
      .map_err(|source| self.error(source))
  }

  pub async fn clear(&self) -> Result<(), Error> {
    match tokio::fs::remove_file(&self.path).await {
      Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(self.error(e)),
      _ => Ok(()),
    }
  }

  fn error(&self, source: std::io::Error) -> Error {
    Error::SessionFile { path: self.path.clone(), source }
  }
}

/// Build the start-up session: signed in with the remembered role, if any.
pub async fn restore(roles: &RoleFile) -> Result<Session, Error> {
  let mut session = Session::default();
  if let Some(role) = roles.load().await? {
    let user = session.restore(role);
    tracing::info!(role = %user.role, name = %user.name, "restored session");
  }
  Ok(session)
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// `GET /session`
pub async fn current<S>(State(state): State<AppState<S>>) -> Json<Session>
where
  S: SchoolStore + Clone + Send + Sync + 'static,
{
  Json(state.session.read().await.clone())
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email: String,
  pub role:  Role,
  #[serde(default)]
  pub name:  Option<String>,
}

/// `POST /session/login`
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<User>, Error>
where
  S: SchoolStore + Clone + Send + Sync + 'static,
{
  let mut session = state.session.write().await;
  let previous = session.clone();
  let user = session
    .login(&body.email, body.role, body.name.as_deref())
    .clone();
  if let Err(e) = state.roles.save(user.role).await {
    *session = previous;
    return Err(e);
  }
  drop(session);
  tracing::info!(role = %user.role, name = %user.name, "signed in");
  Ok(Json(user))
}

/// `POST /session/logout`
pub async fn logout<S>(State(state): State<AppState<S>>) -> Result<StatusCode, Error>
where
  S: SchoolStore + Clone + Send + Sync + 'static,
{
  let user = state.session.write().await.logout();
  state.roles.clear().await?;
  if let Some(user) = user {
    tracing::info!(name = %user.name, "signed out");
  }
  Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct LanguageBody {
  pub language: Language,
}

/// `POST /session/language`
pub async fn toggle_language<S>(
  State(state): State<AppState<S>>,
) -> Json<LanguageBody>
where
  S: SchoolStore + Clone + Send + Sync + 'static,
{
  let language = state.session.write().await.toggle_language();
  Json(LanguageBody { language })
}

// ─── Leave on behalf of the session user ─────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveForm {
  pub from_date: NaiveDate,
  #[serde(default)]
  pub to_date:   Option<NaiveDate>,
  pub reason:    String,
}

/// `POST /session/leaves`
///
/// The applicant's class and section, or designation, are looked up from the
/// directories by the signed-in user's name.
pub async fn apply_leave<S>(
  State(state): State<AppState<S>>,
  lang: Lang,
  Json(form): Json<LeaveForm>,
) -> Result<impl IntoResponse, Error>
where
  S: SchoolStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let user = state
    .session
    .read()
    .await
    .user
    .clone()
    .ok_or(Error::Unauthorized)?;

  let students = state
    .store
    .list_students(&StudentQuery::default())
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  let teachers = state
    .store
    .list_teachers()
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let leave = palli_core::leave::NewLeave::for_user(
    &user,
    &students,
    &teachers,
    form.from_date,
    form.to_date,
    form.reason,
  );
  leave.validate()?;

  let leave = state
    .store
    .apply_leave(leave)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;
  Ok((
    StatusCode::CREATED,
    Json(Saved::new(lang, i18n::leave_submitted(), leave)),
  ))
}
