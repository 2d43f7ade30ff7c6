//! Handler for `POST /refresh`.

use axum::{Json, extract::State};
use gridcache_core::{
  api::ResultsApi, range::SeasonRange, store::ResultsStore,
};
use gridcache_refresh::RefreshSummary;
use serde::Deserialize;

use crate::{AppState, error::ApiError};

/// Optional JSON body accepted by `POST /refresh`.
#[derive(Debug, Default, Deserialize)]
pub struct RefreshParams {
  /// `START:END` season bound, e.g. `"2005:2025"`. Defaults to
  /// 2005 through the latest available season.
  pub seasons: Option<String>,
}

/// `POST /refresh` — run a synchronous refresh and return the summary.
///
/// The summary always carries its notes/warnings/errors; a partial success
/// is visible to the caller, never silently flattened into a 200-and-done.
pub async fn trigger<A, S>(
  State(state): State<AppState<A, S>>,
  body: Option<Json<RefreshParams>>,
) -> Result<Json<RefreshSummary>, ApiError>
where
  A: ResultsApi,
  S: ResultsStore,
{
  let params = body.map(|Json(p)| p).unwrap_or_default();

  // Validate before any network call.
  let range = params
    .seasons
    .as_deref()
    .map(SeasonRange::parse)
    .transpose()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

  let summary =
    gridcache_refresh::refresh(state.api.as_ref(), state.store.as_ref(), range)
      .await?;

  if summary.has_problems() {
    tracing::warn!(
      warnings = summary.warnings.len(),
      errors = summary.errors.len(),
      "refresh via API completed with problems"
    );
  }
  Ok(Json(summary))
}
