//! Core types and trait definitions for the Palli school store.
//!
//! This crate is deliberately free of HTTP and storage dependencies.
//! All other crates depend on it; the reducer in [`state`] is the single
//! source of truth for how a mutation changes the school's records.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod academic;
pub mod attendance;
pub mod bulletin;
pub mod error;
pub mod i18n;
pub mod ids;
pub mod leave;
pub mod notify;
pub mod people;
pub mod session;
pub mod state;
pub mod stats;
pub mod store;

pub use error::{Error, Result};
