//! Whole-school read endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/snapshot` | Every collection, as stored |
//! | `GET`  | `/dashboard` | Headcounts, today's attendance, pass/fail |
//! | `GET`  | `/rosters` | Distinct classes and sections |

use std::sync::Arc;

use axum::{Json, extract::State};
use palli_core::{
  state::Snapshot,
  stats::{DashboardSummary, RosterFilters},
  store::SchoolStore,
};

use crate::error::ApiError;

/// `GET /snapshot`
pub async fn snapshot<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Snapshot>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let snapshot = store
    .snapshot()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(snapshot))
}

/// `GET /dashboard`
pub async fn dashboard<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<DashboardSummary>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let summary = store
    .dashboard()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(summary))
}

/// `GET /rosters`
pub async fn rosters<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<RosterFilters>, ApiError>
where
  S: SchoolStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let filters = store
    .rosters()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(filters))
}
