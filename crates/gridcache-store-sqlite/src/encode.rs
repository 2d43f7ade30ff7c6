//! Encoding between SQLite's TEXT columns and chrono types, plus the raw
//! row structs read back out of queries.

use chrono::{DateTime, NaiveDate, Utc};
use gridcache_core::model::{Constructor, Driver, Race, Season, Winner};

use crate::{Error, Result};

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(raw: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(raw)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{raw:?}: {e}")))
}

pub fn encode_date(date: NaiveDate) -> String {
  date.format("%Y-%m-%d").to_string()
}

pub fn decode_date(raw: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{raw:?}: {e}")))
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

pub struct RawSeason {
  pub year:       i32,
  pub created_at: String,
  pub updated_at: String,
}

impl RawSeason {
  pub fn into_season(self) -> Result<Season> {
    Ok(Season {
      year:       self.year,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

pub struct RawRace {
  pub season_year:  i32,
  pub round:        u32,
  pub race_name:    String,
  pub circuit_name: String,
  pub date:         Option<String>,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawRace {
  pub fn into_race(self) -> Result<Race> {
    Ok(Race {
      season_year:  self.season_year,
      round:        self.round,
      race_name:    self.race_name,
      circuit_name: self.circuit_name,
      date:         self.date.as_deref().map(decode_date).transpose()?,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}

pub struct RawDriver {
  pub driver_id:        String,
  pub given_name:       String,
  pub family_name:      String,
  pub code:             Option<String>,
  pub permanent_number: Option<String>,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawDriver {
  pub fn into_driver(self) -> Result<Driver> {
    Ok(Driver {
      driver_id:        self.driver_id,
      given_name:       self.given_name,
      family_name:      self.family_name,
      code:             self.code,
      permanent_number: self.permanent_number,
      created_at:       decode_dt(&self.created_at)?,
      updated_at:       decode_dt(&self.updated_at)?,
    })
  }
}

pub struct RawConstructor {
  pub constructor_id: String,
  pub name:           String,
  pub nationality:    Option<String>,
  pub created_at:     String,
  pub updated_at:     String,
}

impl RawConstructor {
  pub fn into_constructor(self) -> Result<Constructor> {
    Ok(Constructor {
      constructor_id: self.constructor_id,
      name:           self.name,
      nationality:    self.nationality,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}

pub struct RawWinner {
  pub season_year:    i32,
  pub round:          u32,
  pub driver_id:      String,
  pub constructor_id: String,
  pub created_at:     String,
  pub updated_at:     String,
}

impl RawWinner {
  pub fn into_winner(self) -> Result<Winner> {
    Ok(Winner {
      season_year:    self.season_year,
      round:          self.round,
      driver_id:      self.driver_id,
      constructor_id: self.constructor_id,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}
