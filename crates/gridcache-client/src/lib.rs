//! HTTP client for the Jolpica Ergast-compatible F1 results API.
//!
//! [`JolpicaClient`] implements [`gridcache_core::api::ResultsApi`] over
//! reqwest, with bounded retries for transient failures, a minimum delay
//! between consecutive successful requests (the upstream service is
//! rate-limited), and defensive parsing of the `MRData` JSON envelope.

mod client;
mod wire;

pub mod error;

pub use client::{ClientConfig, JolpicaClient};
pub use error::{Error, Result};
