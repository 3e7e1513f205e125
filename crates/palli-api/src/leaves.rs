//! Handlers for `/leaves` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/leaves` | Optional `?user_name`, `?status` |
//! | `POST` | `/leaves` | Body: [`NewLeave`]; stored as `Pending` |
//! | `GET`  | `/leaves/inbox` | `?role` required; teachers also give `?class` and `?section` |
//! | `GET`  | `/leaves/{id}` | 404 if not found |
//! | `PUT`  | `/leaves/{id}/status` | Body: `{"status":"Approved"}` or `"Rejected"` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use palli_core::{
  i18n,
  ids::LeaveId,
  leave::{Approver, LeaveApplication, LeaveDecision, LeaveStatus, NewLeave},
  session::Role,
  store::{LeaveQuery, SchoolStore},
};
use serde::Deserialize;

use crate::{Lang, Saved, error::ApiError};

/// Parse a status filter. `All` (or nothing) means no filter.
fn parse_status(raw: Option<&str>) -> Result<Option<LeaveStatus>, ApiError> {
  match raw.map(str::trim) {
    None | Some("") => Ok(None),
    Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
    Some(s) => s
      .parse()
      .map(Some)
      .map_err(|_| ApiError::BadRequest(format!("unknown leave status: {s}"))),
  }
}

// ─── List ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub user_name: Option<String>,
  pub status:    Option<String>,
}

/// `GET /leaves[?user_name=..][&status=..]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<LeaveApplication>>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let query = LeaveQuery {
    user_name: params.user_name,
    status:    parse_status(params.status.as_deref())?,
  };
  let leaves = store
    .list_leaves(&query)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(leaves))
}

/// `GET /leaves/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<LeaveId>,
) -> Result<Json<LeaveApplication>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let leave = store
    .get_leave(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("leave {id} not found")))?;
  Ok(Json(leave))
}

// ─── Apply ───────────────────────────────────────────────────────────────────

/// `POST /leaves`
pub async fn apply<S>(
  State(store): State<Arc<S>>,
  lang: Lang,
  Json(body): Json<NewLeave>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  body.validate()?;
  let leave = store
    .apply_leave(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((
    StatusCode::CREATED,
    Json(Saved::new(lang, i18n::leave_submitted(), leave)),
  ))
}

// ─── Inbox ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct InboxParams {
  pub role:    String,
  pub class:   Option<String>,
  pub section: Option<String>,
  pub status:  Option<String>,
}

impl InboxParams {
  fn approver(&self) -> Result<Approver, ApiError> {
    let role: Role = self
      .role
      .parse()
      .map_err(|_| ApiError::BadRequest(format!("unknown role: {}", self.role)))?;
    Ok(match role {
      Role::Admin => Approver::Admin,
      Role::Student => Approver::Student,
      Role::Teacher => {
        let (Some(class), Some(section)) = (&self.class, &self.section) else {
          return Err(ApiError::BadRequest(
            "a teacher's inbox needs class and section".into(),
          ));
        };
        Approver::Teacher {
          class:   class.clone(),
          section: section.clone(),
        }
      }
    })
  }
}

/// `GET /leaves/inbox?role=..[&class=..&section=..][&status=..]`
pub async fn inbox<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<InboxParams>,
) -> Result<Json<Vec<LeaveApplication>>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let approver = params.approver()?;
  let status = parse_status(params.status.as_deref())?;
  let leaves = store
    .leave_inbox(&approver, status)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(leaves))
}

// ─── Decide ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct DecisionBody {
  /// `Approved`/`approve` or `Rejected`/`reject`. `Pending` is refused.
  pub status: String,
}

/// `PUT /leaves/{id}/status`
pub async fn decide<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<LeaveId>,
  Json(body): Json<DecisionBody>,
) -> Result<Json<LeaveApplication>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let decision: LeaveDecision = body.status.parse().map_err(|_| {
    ApiError::BadRequest(format!("not a leave decision: {}", body.status))
  })?;
  let leave = store
    .update_leave_status(&id, decision)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("leave {id} not found")))?;
  Ok(Json(leave))
}
