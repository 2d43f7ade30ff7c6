//! The `ResultsStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `gridcache-store-sqlite`).
//! Higher layers (`gridcache-refresh`, `gridcache-api`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::model::{
  Constructor, Driver, EntityCounts, NewConstructor, NewDriver, NewRace,
  NewWinner, Race, Season, WinRecord, Winner,
};

/// Abstraction over the gridcache persistent store.
///
/// Every write is an upsert keyed by the entity's natural key: locate the
/// existing row, insert if absent, otherwise update mutable attributes in
/// place. Repeating an upsert with identical input leaves the store
/// value-equal (only `updated_at` may move). The ingestion path never
/// deletes rows.
pub trait ResultsStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Upserts ───────────────────────────────────────────────────────────

  /// Create or refresh the season row for `year`.
  fn upsert_season(
    &self,
    year: i32,
  ) -> impl Future<Output = Result<Season, Self::Error>> + Send + '_;

  /// Create or update the race keyed by `(season_year, round)`.
  /// The season row must already exist.
  fn upsert_race(
    &self,
    race: NewRace,
  ) -> impl Future<Output = Result<Race, Self::Error>> + Send + '_;

  fn upsert_driver(
    &self,
    driver: NewDriver,
  ) -> impl Future<Output = Result<Driver, Self::Error>> + Send + '_;

  fn upsert_constructor(
    &self,
    constructor: NewConstructor,
  ) -> impl Future<Output = Result<Constructor, Self::Error>> + Send + '_;

  /// Create or update the single winner row for a race. The race, driver
  /// and constructor rows must all exist beforehand; enforcing that call
  /// order is the orchestrator's job.
  fn upsert_winner(
    &self,
    winner: NewWinner,
  ) -> impl Future<Output = Result<Winner, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All cached seasons, ascending by year.
  fn list_seasons(
    &self,
  ) -> impl Future<Output = Result<Vec<Season>, Self::Error>> + Send + '_;

  /// All cached races of one season, ascending by round.
  fn list_races(
    &self,
    season_year: i32,
  ) -> impl Future<Output = Result<Vec<Race>, Self::Error>> + Send + '_;

  /// The winner row for `(season_year, round)`, if one has been ingested.
  fn get_winner(
    &self,
    season_year: i32,
    round: u32,
  ) -> impl Future<Output = Result<Option<Winner>, Self::Error>> + Send + '_;

  /// Denormalised win rows (winner ⨝ driver ⨝ constructor), ordered by
  /// season then round. Snapshot input for [`crate::stats`].
  fn list_wins(
    &self,
  ) -> impl Future<Output = Result<Vec<WinRecord>, Self::Error>> + Send + '_;

  /// Row counts per entity type.
  fn counts(
    &self,
  ) -> impl Future<Output = Result<EntityCounts, Self::Error>> + Send + '_;
}
