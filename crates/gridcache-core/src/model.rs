//! Persisted entities of the results cache.
//!
//! Every entity is keyed by a natural identifier (season year, race round,
//! external driver/constructor id) rather than a surrogate key, so repeated
//! ingestion of the same upstream record converges on the same row.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ─── Season ──────────────────────────────────────────────────────────────────

/// A championship season, keyed by calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
  pub year:       i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

// ─── Race ────────────────────────────────────────────────────────────────────

/// A single round of a season. `(season_year, round)` is unique.
/// Owned by its [`Season`]; the season never references back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Race {
  pub season_year:  i32,
  pub round:        u32,
  pub race_name:    String,
  pub circuit_name: String,
  pub date:         Option<NaiveDate>,
  pub created_at:   DateTime<Utc>,
  pub updated_at:   DateTime<Utc>,
}

/// Input for [`crate::store::ResultsStore::upsert_race`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRace {
  pub season_year:  i32,
  pub round:        u32,
  pub race_name:    String,
  pub circuit_name: String,
  pub date:         Option<NaiveDate>,
}

// ─── Driver ──────────────────────────────────────────────────────────────────

/// A driver, keyed by the upstream API's stable string identifier
/// (e.g. `"max_verstappen"`). Identity never changes across seasons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
  pub driver_id:        String,
  pub given_name:       String,
  pub family_name:      String,
  pub code:             Option<String>,
  pub permanent_number: Option<String>,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
}

impl Driver {
  /// `"Max Verstappen"`, falling back to the id when both names are empty.
  pub fn display_name(&self) -> String {
    let full = format!("{} {}", self.given_name, self.family_name);
    let full = full.trim();
    if full.is_empty() { self.driver_id.clone() } else { full.to_owned() }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDriver {
  pub driver_id:        String,
  pub given_name:       String,
  pub family_name:      String,
  pub code:             Option<String>,
  pub permanent_number: Option<String>,
}

// ─── Constructor ─────────────────────────────────────────────────────────────

/// A constructor (team), keyed by the upstream API's string identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constructor {
  pub constructor_id: String,
  pub name:           String,
  pub nationality:    Option<String>,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConstructor {
  pub constructor_id: String,
  pub name:           String,
  pub nationality:    Option<String>,
}

// ─── Winner ──────────────────────────────────────────────────────────────────

/// The result-of-one relationship for a race: at most one winner per
/// `(season_year, round)`. Re-ingesting a race updates this row in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
  pub season_year:    i32,
  pub round:          u32,
  pub driver_id:      String,
  pub constructor_id: String,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWinner {
  pub season_year:    i32,
  pub round:          u32,
  pub driver_id:      String,
  pub constructor_id: String,
}

// ─── Read models ─────────────────────────────────────────────────────────────

/// A denormalised win row (winner joined to driver and constructor),
/// the snapshot the pure statistics functions operate on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinRecord {
  pub season_year:      i32,
  pub round:            u32,
  pub driver_id:        String,
  pub driver_name:      String,
  pub constructor_id:   String,
  pub constructor_name: String,
}

/// Per-entity row counts, used by the stats endpoint and idempotence tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
  pub seasons:      u64,
  pub races:        u64,
  pub drivers:      u64,
  pub constructors: u64,
  pub winners:      u64,
}
