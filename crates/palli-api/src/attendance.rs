//! Handlers for `/attendance` and `/communication-logs` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/attendance` | Optional `?date`, `?student_id`, `?class` + `?section` |
//! | `POST` | `/attendance` | Body: [`AttendanceMark`]; today, no alerts |
//! | `POST` | `/attendance/batch` | Body: `[AttendanceMark]`; today, alerts absentees' parents |
//! | `GET`  | `/attendance/sections/{class}/{section}` | Today's marking progress |
//! | `GET`  | `/communication-logs` | Newest first |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use palli_core::{
  attendance::{AttendanceMark, AttendanceRecord, BatchOutcome, SectionStatus},
  i18n,
  ids::StudentId,
  notify::CommunicationLog,
  store::{AttendanceQuery, SchoolStore},
};
use serde::Deserialize;

use crate::{Lang, Saved, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub date:       Option<NaiveDate>,
  pub student_id: Option<StudentId>,
  pub class:      Option<String>,
  pub section:    Option<String>,
}

/// `GET /attendance[?date=YYYY-MM-DD][&student_id=..][&class=..&section=..]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<AttendanceRecord>>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let query = AttendanceQuery {
    date:       params.date,
    student_id: params.student_id,
    class:      params.class,
    section:    params.section,
  };
  let records = store
    .list_attendance(&query)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(records))
}

/// `POST /attendance`
pub async fn mark_one<S>(
  State(store): State<Arc<S>>,
  Json(mark): Json<AttendanceMark>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let record = store
    .mark_attendance(mark.student_id, mark.status)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(record)))
}

/// `POST /attendance/batch`
pub async fn mark_batch<S>(
  State(store): State<Arc<S>>,
  lang: Lang,
  Json(batch): Json<Vec<AttendanceMark>>,
) -> Result<Json<Saved<BatchOutcome>>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let outcome = store
    .mark_batch_attendance(batch)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let message = i18n::attendance_saved(outcome.alerts_sent());
  Ok(Json(Saved::new(lang, message, outcome)))
}

/// `GET /attendance/sections/{class}/{section}`
pub async fn section_status<S>(
  State(store): State<Arc<S>>,
  Path((class, section)): Path<(String, String)>,
) -> Result<Json<SectionStatus>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let status = store
    .section_status(&class, &section)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(status))
}

/// `GET /communication-logs`
pub async fn logs<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<CommunicationLog>>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let logs = store
    .list_communication_logs()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(logs))
}
