//! Handlers for `/exams` and `/marks` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/exams` | Optional `?class` |
//! | `POST` | `/exams` | Body: [`Exam`]; `totalMarks` defaults to 100 |
//! | `GET`  | `/exams/{id}` | 404 if not found |
//! | `GET`  | `/marks` | Optional `?exam_id`, `?student_id` |
//! | `POST` | `/marks/batch` | Body: [`MarksSheet`]; 400 if any mark is out of range |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use palli_core::{
  Error,
  academic::{Exam, Mark, MarkEntry},
  i18n,
  ids::{ExamId, StudentId},
  store::{MarkQuery, SchoolStore},
};
use serde::Deserialize;

use crate::{Lang, Saved, error::ApiError};

// ─── Exams ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExamParams {
  pub class: Option<String>,
}

/// `GET /exams[?class=..]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<ExamParams>,
) -> Result<Json<Vec<Exam>>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let exams = store
    .list_exams(params.class.as_deref())
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(exams))
}

/// `POST /exams`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(exam): Json<Exam>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  exam.validate()?;
  let exam = store
    .add_exam(exam)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok((StatusCode::CREATED, Json(exam)))
}

/// `GET /exams/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<ExamId>,
) -> Result<Json<Exam>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let exam = store
    .get_exam(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or(Error::ExamNotFound(id))?;
  Ok(Json(exam))
}

// ─── Marks ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MarkParams {
  pub exam_id:    Option<ExamId>,
  pub student_id: Option<StudentId>,
}

/// `GET /marks[?exam_id=..][&student_id=..]`
pub async fn list_marks<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<MarkParams>,
) -> Result<Json<Vec<Mark>>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let query = MarkQuery {
    exam_id:    params.exam_id,
    student_id: params.student_id,
  };
  let marks = store
    .list_marks(&query)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(marks))
}

/// A marks sheet for one exam.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarksSheet {
  pub exam_id: ExamId,
  pub marks:   Vec<MarkEntry>,
}

/// `POST /marks/batch`
///
/// Every entry is range-checked against the exam's total before anything is
/// written.
pub async fn save_marks<S>(
  State(store): State<Arc<S>>,
  lang: Lang,
  Json(sheet): Json<MarksSheet>,
) -> Result<Json<Saved<Vec<Mark>>>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let exam = store
    .get_exam(&sheet.exam_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or(Error::ExamNotFound(sheet.exam_id))?;
  let staged = exam.stage_marks(&sheet.marks)?;
  let saved = store
    .save_batch_marks(staged)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(Saved::new(lang, i18n::marks_saved(), saved)))
}
