//! SQLite backend for the gridcache results store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! pool without blocking the async runtime. Every write is an
//! `INSERT … ON CONFLICT … DO UPDATE` keyed by the entity's natural key.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
