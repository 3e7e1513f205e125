//! Handlers for `/timetables` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/timetables` | Every saved timetable |
//! | `PUT`  | `/timetables` | Body: [`TimeTable`]; upsert on class and section |
//! | `GET`  | `/timetables/{class}/{section}` | Blank week if none saved |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use palli_core::{academic::TimeTable, i18n, store::SchoolStore};

use crate::{Lang, Saved, error::ApiError};

/// `GET /timetables`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<TimeTable>>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let tables = store
    .list_timetables()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(tables))
}

/// `GET /timetables/{class}/{section}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path((class, section)): Path<(String, String)>,
) -> Result<Json<TimeTable>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let table = store
    .get_timetable(&class, &section)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(table))
}

/// `PUT /timetables`
pub async fn save<S>(
  State(store): State<Arc<S>>,
  lang: Lang,
  Json(table): Json<TimeTable>,
) -> Result<Json<Saved<TimeTable>>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  table.validate()?;
  let table = store
    .save_timetable(table)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(Saved::new(lang, i18n::timetable_saved(), table)))
}
