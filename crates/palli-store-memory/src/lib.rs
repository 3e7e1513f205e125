//! In-memory backend for the Palli school store.
//!
//! All records live in one [`palli_core::state::SchoolState`] behind a
//! `tokio` read/write lock. Each store operation takes the lock once, so every
//! mutation is a single atomic transition.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::MemoryStore;
