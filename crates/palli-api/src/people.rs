//! Handlers for `/students` and `/teachers` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/students` | Optional `?class`, `?section`, `?q` (name or EMIS number) |
//! | `POST` | `/students` | Body: [`Student`]; `id` may be omitted |
//! | `GET`  | `/students/{id}` | 404 if not found |
//! | `PUT`  | `/students/{id}` | Full replacement; 404 if not found |
//! | `GET`  | `/teachers` | |
//! | `POST` | `/teachers` | Body: [`Teacher`]; `id` may be omitted |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use palli_core::{
  i18n,
  ids::StudentId,
  people::{Student, Teacher},
  store::{SchoolStore, StudentQuery},
};
use serde::Deserialize;

use crate::{Lang, Saved, error::ApiError};

// ─── Students ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StudentParams {
  pub class:   Option<String>,
  pub section: Option<String>,
  pub q:       Option<String>,
}

/// `GET /students[?class=..][&section=..][&q=..]`
pub async fn list_students<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<StudentParams>,
) -> Result<Json<Vec<Student>>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let query = StudentQuery {
    class:   params.class,
    section: params.section,
    text:    params.q,
  };
  let students = store
    .list_students(&query)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(students))
}

/// `GET /students/{id}`
pub async fn get_student<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<StudentId>,
) -> Result<Json<Student>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let student = store
    .get_student(&id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("student {id} not found")))?;
  Ok(Json(student))
}

/// `POST /students`
pub async fn create_student<S>(
  State(store): State<Arc<S>>,
  lang: Lang,
  Json(student): Json<Student>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  student.validate()?;
  let student = store
    .add_student(student)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let message = i18n::student_added(&student.name);
  Ok((StatusCode::CREATED, Json(Saved::new(lang, message, student))))
}

/// `PUT /students/{id}` — the path id wins over any id in the body.
pub async fn update_student<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<StudentId>,
  lang: Lang,
  Json(mut student): Json<Student>,
) -> Result<Json<Saved<Student>>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  student.id = id.clone();
  student.validate()?;
  let student = store
    .update_student(student)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("student {id} not found")))?;
  let message = i18n::student_updated(&student.name);
  Ok(Json(Saved::new(lang, message, student)))
}

// ─── Teachers ────────────────────────────────────────────────────────────────

/// `GET /teachers`
pub async fn list_teachers<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Teacher>>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let teachers = store
    .list_teachers()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(teachers))
}

/// `POST /teachers`
pub async fn create_teacher<S>(
  State(store): State<Arc<S>>,
  lang: Lang,
  Json(teacher): Json<Teacher>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  teacher.validate()?;
  let teacher = store
    .add_teacher(teacher)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  let message = i18n::staff_added(&teacher.name);
  Ok((StatusCode::CREATED, Json(Saved::new(lang, message, teacher))))
}
