//! Read-only handlers over the cached data: `/stats`, `/predictions`,
//! `/legends`.

use axum::{
  Json,
  extract::{Query, State},
};
use gridcache_core::{
  api::ResultsApi,
  model::EntityCounts,
  stats::{
    ConfidenceLabel, ERA_CHOICES, EntityScore, Era, LegendEntry, confidence,
    constructor_scores, driver_scores, recent_seasons, top_constructors,
    top_drivers,
  },
  store::ResultsStore,
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

/// How many trailing seasons feed the prediction scores.
const PREDICTION_SEASONS: usize = 5;

const DEFAULT_LEGEND_LIMIT: usize = 5;

// ─── /stats ──────────────────────────────────────────────────────────────────

/// `GET /stats` — per-entity row counts.
pub async fn counts<A, S>(
  State(state): State<AppState<A, S>>,
) -> Result<Json<EntityCounts>, ApiError>
where
  A: ResultsApi,
  S: ResultsStore,
{
  let counts = state
    .store
    .counts()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(counts))
}

// ─── /predictions ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct Confidence {
  pub value: f64,
  pub label: ConfidenceLabel,
}

#[derive(Debug, Serialize)]
pub struct PredictionsResponse {
  /// The seasons the scores are computed over, ascending.
  pub seasons:                Vec<i32>,
  pub drivers:                Vec<EntityScore>,
  pub constructors:           Vec<EntityScore>,
  pub driver_confidence:      Confidence,
  pub constructor_confidence: Confidence,
}

fn top_two_confidence(scores: &[EntityScore]) -> Confidence {
  let top = scores.first().map(|s| s.score).unwrap_or(0.0);
  let second = scores.get(1).map(|s| s.score).unwrap_or(0.0);
  let (value, label) = confidence(top, second);
  Confidence { value, label }
}

/// `GET /predictions` — recency-weighted form scores over the last five
/// seasons with winners.
pub async fn predictions<A, S>(
  State(state): State<AppState<A, S>>,
) -> Result<Json<PredictionsResponse>, ApiError>
where
  A: ResultsApi,
  S: ResultsStore,
{
  let wins = state
    .store
    .list_wins()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let seasons = recent_seasons(&wins, PREDICTION_SEASONS);
  let drivers = driver_scores(&wins, &seasons);
  let constructors = constructor_scores(&wins, &seasons);
  let driver_confidence = top_two_confidence(&drivers);
  let constructor_confidence = top_two_confidence(&constructors);

  Ok(Json(PredictionsResponse {
    seasons,
    drivers,
    constructors,
    driver_confidence,
    constructor_confidence,
  }))
}

// ─── /legends ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct LegendsParams {
  /// One of [`ERA_CHOICES`]; anything else means all eras.
  pub era:   Option<String>,
  pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct LegendsResponse {
  pub era:          String,
  pub era_choices:  Vec<&'static str>,
  pub drivers:      Vec<LegendEntry>,
  pub constructors: Vec<LegendEntry>,
}

/// `GET /legends?era=2014-2021&limit=5` — all-time win leaderboards.
pub async fn legends<A, S>(
  State(state): State<AppState<A, S>>,
  Query(params): Query<LegendsParams>,
) -> Result<Json<LegendsResponse>, ApiError>
where
  A: ResultsApi,
  S: ResultsStore,
{
  let wins = state
    .store
    .list_wins()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let era = Era::parse(params.era.as_deref());
  let limit = params.limit.unwrap_or(DEFAULT_LEGEND_LIMIT);

  Ok(Json(LegendsResponse {
    era:          era.label.clone(),
    era_choices:  ERA_CHOICES.to_vec(),
    drivers:      top_drivers(&wins, limit, &era),
    constructors: top_constructors(&wins, limit, &era),
  }))
}
