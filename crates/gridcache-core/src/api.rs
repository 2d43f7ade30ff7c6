//! The `ResultsApi` trait — the upstream results API seen from the core.
//!
//! Implemented by `gridcache-client` over HTTP; the refresh orchestrator and
//! its tests depend on this abstraction, not on any transport.

use std::future::Future;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─── Payloads ────────────────────────────────────────────────────────────────

/// One race as listed in a season's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceDescriptor {
  pub season:       i32,
  pub round:        u32,
  pub race_name:    String,
  pub circuit_name: String,
  pub date:         Option<NaiveDate>,
}

/// The winning driver and constructor of one race.
///
/// Identity fields (`driver_id`, `constructor_id`) are always present —
/// a payload lacking either is reported as "no winner", not as a partial
/// record. Non-identity fields are best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerRecord {
  pub driver_id:               String,
  pub given_name:              String,
  pub family_name:             String,
  pub code:                    Option<String>,
  pub permanent_number:        Option<String>,
  pub constructor_id:          String,
  pub constructor_name:        String,
  pub constructor_nationality: Option<String>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Read-only access to the upstream results API.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ResultsApi: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All season years the API knows about, ascending and deduplicated.
  fn fetch_seasons(
    &self,
  ) -> impl Future<Output = Result<Vec<i32>, Self::Error>> + Send + '_;

  /// The race schedule for one season. An empty vec means the season has
  /// no published rounds yet; that is a valid result, not an error.
  fn fetch_races_for_season(
    &self,
    season: i32,
  ) -> impl Future<Output = Result<Vec<RaceDescriptor>, Self::Error>> + Send + '_;

  /// The winner of one race, or `None` when the API has no result for the
  /// round yet (race not run, or the payload lacks identity fields).
  fn fetch_race_winner(
    &self,
    season: i32,
    round: u32,
  ) -> impl Future<Output = Result<Option<WinnerRecord>, Self::Error>> + Send + '_;
}
