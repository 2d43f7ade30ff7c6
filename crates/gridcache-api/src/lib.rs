//! JSON HTTP surface for gridcache.
//!
//! Exposes an axum [`Router`] backed by any [`ResultsApi`] + [`ResultsStore`]
//! pair. Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! | Method | Path           | Notes                                        |
//! |--------|----------------|----------------------------------------------|
//! | `POST` | `/refresh`     | Body: optional `{"seasons":"START:END"}`     |
//! | `GET`  | `/stats`       | Per-entity row counts                        |
//! | `GET`  | `/predictions` | Recency-weighted form scores + confidence    |
//! | `GET`  | `/legends`     | `?era=1950-1979&limit=5` win leaderboards    |

pub mod error;
pub mod refresh;
pub mod stats;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use gridcache_core::{api::ResultsApi, store::ResultsStore};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct AppState<A, S> {
  pub api:   Arc<A>,
  pub store: Arc<S>,
}

// Manual impl: `#[derive(Clone)]` would wrongly require `A: Clone, S: Clone`.
impl<A, S> Clone for AppState<A, S> {
  fn clone(&self) -> Self {
    Self { api: self.api.clone(), store: self.store.clone() }
  }
}

/// Build a fully-materialised router for `api` + `store`.
pub fn api_router<A, S>(api: Arc<A>, store: Arc<S>) -> Router<()>
where
  A: ResultsApi + 'static,
  S: ResultsStore + 'static,
{
  Router::new()
    .route("/refresh", post(refresh::trigger::<A, S>))
    .route("/stats", get(stats::counts::<A, S>))
    .route("/predictions", get(stats::predictions::<A, S>))
    .route("/legends", get(stats::legends::<A, S>))
    .layer(TraceLayer::new_for_http())
    .with_state(AppState { api, store })
}

// ─── Integration tests ────────────────────────────────────────────────────────
