//! Defensive deserialization of the Ergast `MRData` wire format.
//!
//! Only the envelope itself is required; every leaf field is an optional
//! [`serde_json::Value`] coerced leniently afterwards. A missing or
//! mistyped leaf degrades to a partial record or a skipped entry with a
//! logged warning — it never fails the request.

use chrono::NaiveDate;
use gridcache_core::api::{RaceDescriptor, WinnerRecord};
use serde::Deserialize;
use serde_json::Value;

// ─── Envelope ────────────────────────────────────────────────────────────────

/// Top-level response shape. Absence of `MRData` is the one structural
/// error the parser reports (`Error::Malformed` upstream).
#[derive(Debug, Deserialize)]
pub struct Envelope {
  #[serde(rename = "MRData")]
  pub mrdata: MrData,
}

#[derive(Debug, Default, Deserialize)]
pub struct MrData {
  #[serde(rename = "SeasonTable", default)]
  pub season_table: Option<SeasonTable>,
  #[serde(rename = "RaceTable", default)]
  pub race_table:   Option<RaceTable>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SeasonTable {
  #[serde(rename = "Seasons", default)]
  pub seasons: Vec<RawSeason>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawSeason {
  #[serde(default)]
  pub season: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RaceTable {
  #[serde(rename = "Races", default)]
  pub races: Vec<RawRace>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawRace {
  #[serde(default)]
  pub round:     Option<Value>,
  #[serde(rename = "raceName", default)]
  pub race_name: Option<Value>,
  #[serde(rename = "Circuit", default)]
  pub circuit:   Option<RawCircuit>,
  #[serde(default)]
  pub date:      Option<Value>,
  #[serde(rename = "Results", default)]
  pub results:   Vec<RawResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCircuit {
  #[serde(rename = "circuitName", default)]
  pub circuit_name: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawResult {
  #[serde(rename = "Driver", default)]
  pub driver:      Option<RawDriver>,
  #[serde(rename = "Constructor", default)]
  pub constructor: Option<RawConstructor>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawDriver {
  #[serde(rename = "driverId", default)]
  pub driver_id:        Option<Value>,
  #[serde(rename = "givenName", default)]
  pub given_name:       Option<Value>,
  #[serde(rename = "familyName", default)]
  pub family_name:      Option<Value>,
  #[serde(default)]
  pub code:             Option<Value>,
  #[serde(rename = "permanentNumber", default)]
  pub permanent_number: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawConstructor {
  #[serde(rename = "constructorId", default)]
  pub constructor_id: Option<Value>,
  #[serde(default)]
  pub name:           Option<Value>,
  #[serde(default)]
  pub nationality:    Option<Value>,
}

// ─── Lenient coercion ────────────────────────────────────────────────────────

/// A number, or a string that parses as one. Anything else is `None`.
pub fn as_int(value: &Option<Value>) -> Option<i64> {
  match value {
    Some(Value::Number(n)) => n.as_i64(),
    Some(Value::String(s)) => s.trim().parse().ok(),
    _ => None,
  }
}

/// A non-empty string, or a number rendered as one.
pub fn as_string(value: &Option<Value>) -> Option<String> {
  match value {
    Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
    Some(Value::Number(n)) => Some(n.to_string()),
    _ => None,
  }
}

/// An ISO-8601 calendar date.
pub fn as_date(value: &Option<Value>) -> Option<NaiveDate> {
  match value {
    Some(Value::String(s)) => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
    _ => None,
  }
}

// ─── Conversions to domain payloads ──────────────────────────────────────────

impl RawSeason {
  pub fn year(&self) -> Option<i32> {
    as_int(&self.season).and_then(|y| i32::try_from(y).ok())
  }
}

impl RawRace {
  /// Convert to a [`RaceDescriptor`], or `None` when the round number is
  /// unusable (a race without a round cannot be keyed).
  pub fn descriptor(&self, season: i32) -> Option<RaceDescriptor> {
    let round = match as_int(&self.round).and_then(|r| u32::try_from(r).ok()) {
      Some(r) => r,
      None => {
        tracing::warn!(season, "race entry without a usable round, skipping");
        return None;
      }
    };

    Some(RaceDescriptor {
      season,
      round,
      race_name: as_string(&self.race_name)
        .unwrap_or_else(|| format!("Round {round}")),
      circuit_name: self
        .circuit
        .as_ref()
        .and_then(|c| as_string(&c.circuit_name))
        .unwrap_or_else(|| "Unknown Circuit".to_owned()),
      date: as_date(&self.date),
    })
  }
}

impl RawResult {
  /// Convert to a [`WinnerRecord`]. A result lacking a driver or
  /// constructor identifier is unattributable and reported as absent.
  pub fn winner(&self, season: i32, round: u32) -> Option<WinnerRecord> {
    let driver = self.driver.as_ref();
    let constructor = self.constructor.as_ref();

    let driver_id = driver.and_then(|d| as_string(&d.driver_id));
    let constructor_id = constructor.and_then(|c| as_string(&c.constructor_id));

    let (Some(driver_id), Some(constructor_id)) = (driver_id, constructor_id)
    else {
      tracing::warn!(
        season,
        round,
        "winner payload lacks driver or constructor id, treating as unavailable"
      );
      return None;
    };

    Some(WinnerRecord {
      given_name: driver
        .and_then(|d| as_string(&d.given_name))
        .unwrap_or_default(),
      family_name: driver
        .and_then(|d| as_string(&d.family_name))
        .unwrap_or_default(),
      code: driver.and_then(|d| as_string(&d.code)),
      permanent_number: driver.and_then(|d| as_string(&d.permanent_number)),
      constructor_name: constructor
        .and_then(|c| as_string(&c.name))
        .unwrap_or_else(|| constructor_id.clone()),
      constructor_nationality: constructor.and_then(|c| as_string(&c.nationality)),
      driver_id,
      constructor_id,
    })
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
