//! JSON REST API for Palli.
//!
//! Exposes an axum [`Router`] backed by any [`palli_core::store::SchoolStore`].
//! Sessions, uploads, TLS, and transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", palli_api::api_router(store.clone()))
//! ```

pub mod attendance;
pub mod bulletin;
pub mod error;
pub mod exams;
pub mod leaves;
pub mod overview;
pub mod people;
pub mod reply;
pub mod timetables;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use palli_core::store::SchoolStore;

pub use error::ApiError;
pub use reply::{Lang, Saved};

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: SchoolStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Overview
    .route("/snapshot", get(overview::snapshot::<S>))
    .route("/dashboard", get(overview::dashboard::<S>))
    .route("/rosters", get(overview::rosters::<S>))
    // People
    .route(
      "/students",
      get(people::list_students::<S>).post(people::create_student::<S>),
    )
    .route(
      "/students/{id}",
      get(people::get_student::<S>).put(people::update_student::<S>),
    )
    .route(
      "/teachers",
      get(people::list_teachers::<S>).post(people::create_teacher::<S>),
    )
    // Bulletin
    .route(
      "/documents",
      get(bulletin::list_documents::<S>).post(bulletin::create_document::<S>),
    )
    .route(
      "/notices",
      get(bulletin::list_notices::<S>).post(bulletin::create_notice::<S>),
    )
    .route("/notices/{id}", delete(bulletin::delete_notice::<S>))
    // Exams & marks
    .route("/exams", get(exams::list::<S>).post(exams::create::<S>))
    .route("/exams/{id}", get(exams::get_one::<S>))
    .route("/marks", get(exams::list_marks::<S>))
    .route("/marks/batch", post(exams::save_marks::<S>))
    // Timetables
    .route(
      "/timetables",
      get(timetables::list::<S>).put(timetables::save::<S>),
    )
    .route("/timetables/{class}/{section}", get(timetables::get_one::<S>))
    // Attendance
    .route(
      "/attendance",
      get(attendance::list::<S>).post(attendance::mark_one::<S>),
    )
    .route("/attendance/batch", post(attendance::mark_batch::<S>))
    .route(
      "/attendance/sections/{class}/{section}",
      get(attendance::section_status::<S>),
    )
    .route("/communication-logs", get(attendance::logs::<S>))
    // Leave
    .route("/leaves", get(leaves::list::<S>).post(leaves::apply::<S>))
    .route("/leaves/inbox", get(leaves::inbox::<S>))
    .route("/leaves/{id}", get(leaves::get_one::<S>))
    .route("/leaves/{id}/status", put(leaves::decide::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests;
