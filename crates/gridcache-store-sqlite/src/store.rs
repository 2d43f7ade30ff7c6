//! [`SqliteStore`] — the SQLite implementation of [`ResultsStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use gridcache_core::{
  model::{
    Constructor, Driver, EntityCounts, NewConstructor, NewDriver, NewRace,
    NewWinner, Race, Season, WinRecord, Winner,
  },
  store::ResultsStore,
};

use crate::{
  Error, Result,
  encode::{
    RawConstructor, RawDriver, RawRace, RawSeason, RawWinner, encode_date,
    encode_dt,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A results cache backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn race_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRace> {
  Ok(RawRace {
    season_year:  row.get(0)?,
    round:        row.get(1)?,
    race_name:    row.get(2)?,
    circuit_name: row.get(3)?,
    date:         row.get(4)?,
    created_at:   row.get(5)?,
    updated_at:   row.get(6)?,
  })
}

fn winner_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawWinner> {
  Ok(RawWinner {
    season_year:    row.get(0)?,
    round:          row.get(1)?,
    driver_id:      row.get(2)?,
    constructor_id: row.get(3)?,
    created_at:     row.get(4)?,
    updated_at:     row.get(5)?,
  })
}

// ─── ResultsStore impl ───────────────────────────────────────────────────────

impl ResultsStore for SqliteStore {
  type Error = Error;

  // ── Upserts ───────────────────────────────────────────────────────────────

  async fn upsert_season(&self, year: i32) -> Result<Season> {
    let now_str = encode_dt(Utc::now());

    let raw: RawSeason = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO seasons (year, created_at, updated_at)
           VALUES (?1, ?2, ?2)
           ON CONFLICT(year) DO UPDATE SET updated_at = excluded.updated_at",
          rusqlite::params![year, now_str],
        )?;
        let raw = conn.query_row(
          "SELECT year, created_at, updated_at FROM seasons WHERE year = ?1",
          rusqlite::params![year],
          |row| {
            Ok(RawSeason {
              year:       row.get(0)?,
              created_at: row.get(1)?,
              updated_at: row.get(2)?,
            })
          },
        )?;
        Ok(raw)
      })
      .await?;

    raw.into_season()
  }

  async fn upsert_race(&self, race: NewRace) -> Result<Race> {
    let now_str = encode_dt(Utc::now());
    let date_str = race.date.map(encode_date);

    let raw: RawRace = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO races
             (season_year, round, race_name, circuit_name, date, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
           ON CONFLICT(season_year, round) DO UPDATE SET
             race_name    = excluded.race_name,
             circuit_name = excluded.circuit_name,
             date         = excluded.date,
             updated_at   = excluded.updated_at",
          rusqlite::params![
            race.season_year,
            race.round,
            race.race_name,
            race.circuit_name,
            date_str,
            now_str,
          ],
        )?;
        let raw = conn.query_row(
          "SELECT season_year, round, race_name, circuit_name, date, created_at, updated_at
           FROM races WHERE season_year = ?1 AND round = ?2",
          rusqlite::params![race.season_year, race.round],
          race_from_row,
        )?;
        Ok(raw)
      })
      .await?;

    raw.into_race()
  }

  async fn upsert_driver(&self, driver: NewDriver) -> Result<Driver> {
    let now_str = encode_dt(Utc::now());

    let raw: RawDriver = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO drivers
             (driver_id, given_name, family_name, code, permanent_number, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
           ON CONFLICT(driver_id) DO UPDATE SET
             given_name       = excluded.given_name,
             family_name      = excluded.family_name,
             code             = excluded.code,
             permanent_number = excluded.permanent_number,
             updated_at       = excluded.updated_at",
          rusqlite::params![
            driver.driver_id,
            driver.given_name,
            driver.family_name,
            driver.code,
            driver.permanent_number,
            now_str,
          ],
        )?;
        let raw = conn.query_row(
          "SELECT driver_id, given_name, family_name, code, permanent_number,
                  created_at, updated_at
           FROM drivers WHERE driver_id = ?1",
          rusqlite::params![driver.driver_id],
          |row| {
            Ok(RawDriver {
              driver_id:        row.get(0)?,
              given_name:       row.get(1)?,
              family_name:      row.get(2)?,
              code:             row.get(3)?,
              permanent_number: row.get(4)?,
              created_at:       row.get(5)?,
              updated_at:       row.get(6)?,
            })
          },
        )?;
        Ok(raw)
      })
      .await?;

    raw.into_driver()
  }

  async fn upsert_constructor(&self, constructor: NewConstructor) -> Result<Constructor> {
    let now_str = encode_dt(Utc::now());

    let raw: RawConstructor = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO constructors
             (constructor_id, name, nationality, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?4)
           ON CONFLICT(constructor_id) DO UPDATE SET
             name        = excluded.name,
             nationality = excluded.nationality,
             updated_at  = excluded.updated_at",
          rusqlite::params![
            constructor.constructor_id,
            constructor.name,
            constructor.nationality,
            now_str,
          ],
        )?;
        let raw = conn.query_row(
          "SELECT constructor_id, name, nationality, created_at, updated_at
           FROM constructors WHERE constructor_id = ?1",
          rusqlite::params![constructor.constructor_id],
          |row| {
            Ok(RawConstructor {
              constructor_id: row.get(0)?,
              name:           row.get(1)?,
              nationality:    row.get(2)?,
              created_at:     row.get(3)?,
              updated_at:     row.get(4)?,
            })
          },
        )?;
        Ok(raw)
      })
      .await?;

    raw.into_constructor()
  }

  async fn upsert_winner(&self, winner: NewWinner) -> Result<Winner> {
    let now_str = encode_dt(Utc::now());

    let raw: RawWinner = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO winners
             (season_year, round, driver_id, constructor_id, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)
           ON CONFLICT(season_year, round) DO UPDATE SET
             driver_id      = excluded.driver_id,
             constructor_id = excluded.constructor_id,
             updated_at     = excluded.updated_at",
          rusqlite::params![
            winner.season_year,
            winner.round,
            winner.driver_id,
            winner.constructor_id,
            now_str,
          ],
        )?;
        let raw = conn.query_row(
          "SELECT season_year, round, driver_id, constructor_id, created_at, updated_at
           FROM winners WHERE season_year = ?1 AND round = ?2",
          rusqlite::params![winner.season_year, winner.round],
          winner_from_row,
        )?;
        Ok(raw)
      })
      .await?;

    raw.into_winner()
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_seasons(&self) -> Result<Vec<Season>> {
    let raws: Vec<RawSeason> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT year, created_at, updated_at FROM seasons ORDER BY year")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawSeason {
              year:       row.get(0)?,
              created_at: row.get(1)?,
              updated_at: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSeason::into_season).collect()
  }

  async fn list_races(&self, season_year: i32) -> Result<Vec<Race>> {
    let raws: Vec<RawRace> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT season_year, round, race_name, circuit_name, date, created_at, updated_at
           FROM races WHERE season_year = ?1 ORDER BY round",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![season_year], race_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRace::into_race).collect()
  }

  async fn get_winner(&self, season_year: i32, round: u32) -> Result<Option<Winner>> {
    let raw: Option<RawWinner> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT season_year, round, driver_id, constructor_id, created_at, updated_at
               FROM winners WHERE season_year = ?1 AND round = ?2",
              rusqlite::params![season_year, round],
              winner_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawWinner::into_winner).transpose()
  }

  async fn list_wins(&self) -> Result<Vec<WinRecord>> {
    let wins: Vec<WinRecord> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT w.season_year, w.round,
                  d.driver_id, TRIM(d.given_name || ' ' || d.family_name),
                  c.constructor_id, c.name
           FROM winners w
           JOIN drivers d      ON d.driver_id      = w.driver_id
           JOIN constructors c ON c.constructor_id = w.constructor_id
           ORDER BY w.season_year, w.round",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(WinRecord {
              season_year:      row.get(0)?,
              round:            row.get(1)?,
              driver_id:        row.get(2)?,
              driver_name:      row.get(3)?,
              constructor_id:   row.get(4)?,
              constructor_name: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    // A driver with no recorded names still needs a usable label.
    Ok(
      wins
        .into_iter()
        .map(|mut win| {
          if win.driver_name.is_empty() {
            win.driver_name = win.driver_id.clone();
          }
          win
        })
        .collect(),
    )
  }

  async fn counts(&self) -> Result<EntityCounts> {
    let counts = self
      .conn
      .call(|conn| {
        let count = |conn: &rusqlite::Connection, table: &str| {
          conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get::<_, u64>(0)
          })
        };
        Ok(EntityCounts {
          seasons:      count(conn, "seasons")?,
          races:        count(conn, "races")?,
          drivers:      count(conn, "drivers")?,
          constructors: count(conn, "constructors")?,
          winners:      count(conn, "winners")?,
        })
      })
      .await?;

    Ok(counts)
  }
}
