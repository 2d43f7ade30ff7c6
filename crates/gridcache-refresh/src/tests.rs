//! Orchestrator tests against a scriptable mock API and an in-memory store.

use std::collections::{HashMap, HashSet};

use gridcache_core::{
  api::{RaceDescriptor, ResultsApi, WinnerRecord},
  range::SeasonRange,
  store::ResultsStore,
};
use gridcache_store_sqlite::SqliteStore;

use crate::{Error, refresh};

// ─── Mock API ────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("mock api failure: {0}")]
struct MockError(&'static str);

#[derive(Default)]
struct MockApi {
  seasons:      Vec<i32>,
  races:        HashMap<i32, Vec<RaceDescriptor>>,
  winners:      HashMap<(i32, u32), WinnerRecord>,
  fail_seasons: bool,
  fail_races:   HashSet<i32>,
  fail_winners: HashSet<(i32, u32)>,
}

impl MockApi {
  fn with_seasons(seasons: &[i32]) -> Self {
    Self { seasons: seasons.to_vec(), ..Self::default() }
  }

  fn race(&mut self, season: i32, round: u32, name: &str) -> &mut Self {
    self.races.entry(season).or_default().push(RaceDescriptor {
      season,
      round,
      race_name: name.to_owned(),
      circuit_name: "Test Circuit".to_owned(),
      date: None,
    });
    self
  }

  fn winner(&mut self, season: i32, round: u32, driver: &str, team: &str) -> &mut Self {
    self.winners.insert(
      (season, round),
      WinnerRecord {
        driver_id:               driver.to_owned(),
        given_name:              driver.to_uppercase(),
        family_name:             "Driver".to_owned(),
        code:                    None,
        permanent_number:        None,
        constructor_id:          team.to_owned(),
        constructor_name:        team.to_uppercase(),
        constructor_nationality: None,
      },
    );
    self
  }
}

impl ResultsApi for MockApi {
  type Error = MockError;

  async fn fetch_seasons(&self) -> Result<Vec<i32>, MockError> {
    if self.fail_seasons {
      return Err(MockError("seasons endpoint down"));
    }
    Ok(self.seasons.clone())
  }

  async fn fetch_races_for_season(
    &self,
    season: i32,
  ) -> Result<Vec<RaceDescriptor>, MockError> {
    if self.fail_races.contains(&season) {
      return Err(MockError("race listing down"));
    }
    Ok(self.races.get(&season).cloned().unwrap_or_default())
  }

  async fn fetch_race_winner(
    &self,
    season: i32,
    round: u32,
  ) -> Result<Option<WinnerRecord>, MockError> {
    if self.fail_winners.contains(&(season, round)) {
      return Err(MockError("winner endpoint down"));
    }
    Ok(self.winners.get(&(season, round)).cloned())
  }
}

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

fn range(start: i32, end: i32) -> Option<SeasonRange> {
  Some(SeasonRange::new(start, end).expect("valid range"))
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn end_to_end_two_seasons_one_winner_pending() {
  let mut api = MockApi::with_seasons(&[2023, 2024]);
  api.race(2023, 1, "Bahrain Grand Prix").winner(2023, 1, "ver", "rbr");
  api.race(2024, 1, "Bahrain Grand Prix");
  let s = store().await;

  let summary = refresh(&api, &s, range(2023, 2024)).await.unwrap();

  assert_eq!(summary.seasons_processed, 2);
  assert_eq!(summary.races_processed, 2);
  assert_eq!(summary.winners_upserted, 1);
  assert!(summary.errors.is_empty());
  assert!(summary.warnings.is_empty());
  assert_eq!(summary.notes.len(), 1, "one informational note expected");
  assert!(summary.notes[0].contains("no winner recorded yet"));

  let counts = s.counts().await.unwrap();
  assert_eq!(counts.seasons, 2);
  assert_eq!(counts.races, 2);
  assert_eq!(counts.winners, 1);
}

#[tokio::test]
async fn refresh_is_idempotent() {
  let mut api = MockApi::with_seasons(&[2023, 2024]);
  api
    .race(2023, 1, "Bahrain Grand Prix")
    .race(2023, 2, "Saudi Arabian Grand Prix")
    .winner(2023, 1, "ver", "rbr")
    .winner(2023, 2, "per", "rbr")
    .race(2024, 1, "Bahrain Grand Prix")
    .winner(2024, 1, "ver", "rbr");
  let s = store().await;

  refresh(&api, &s, range(2023, 2024)).await.unwrap();
  let counts_first = s.counts().await.unwrap();
  let wins_first = s.list_wins().await.unwrap();

  refresh(&api, &s, range(2023, 2024)).await.unwrap();
  let counts_second = s.counts().await.unwrap();
  let wins_second = s.list_wins().await.unwrap();

  assert_eq!(counts_first, counts_second);
  assert_eq!(wins_first, wins_second, "identity fields must not change");
  // The same driver winning across seasons maps to one row.
  assert_eq!(counts_second.drivers, 2);
  assert_eq!(counts_second.constructors, 1);
}

#[tokio::test]
async fn one_bad_race_does_not_abort_the_season() {
  let mut api = MockApi::with_seasons(&[2023]);
  api
    .race(2023, 1, "Race 1")
    .race(2023, 2, "Race 2")
    .race(2023, 3, "Race 3")
    .winner(2023, 1, "ver", "rbr")
    .winner(2023, 3, "ham", "merc");
  api.fail_winners.insert((2023, 2));
  let s = store().await;

  let summary = refresh(&api, &s, range(2023, 2023)).await.unwrap();

  assert_eq!(summary.races_processed, 3);
  assert_eq!(summary.winners_upserted, 2);
  assert_eq!(summary.warnings.len(), 1, "exactly one warning for race 2");
  assert!(summary.warnings[0].contains("round 2"));
  assert!(summary.errors.is_empty());

  assert!(s.get_winner(2023, 1).await.unwrap().is_some());
  assert!(s.get_winner(2023, 2).await.unwrap().is_none());
  assert!(s.get_winner(2023, 3).await.unwrap().is_some());
}

#[tokio::test]
async fn one_bad_season_does_not_abort_the_range() {
  let mut api = MockApi::with_seasons(&[2022, 2023]);
  api.race(2023, 1, "Race 1").winner(2023, 1, "ver", "rbr");
  api.fail_races.insert(2022);
  let s = store().await;

  let summary = refresh(&api, &s, range(2022, 2023)).await.unwrap();

  assert_eq!(summary.seasons_requested, 2);
  assert_eq!(summary.seasons_processed, 1);
  assert_eq!(summary.errors.len(), 1);
  assert!(summary.errors[0].contains("season 2022"));
  assert_eq!(summary.winners_upserted, 1);
}

#[tokio::test]
async fn listed_season_with_zero_races_is_valid_and_noted() {
  let api = MockApi::with_seasons(&[2026]);
  let s = store().await;

  let summary = refresh(&api, &s, range(2026, 2026)).await.unwrap();

  assert_eq!(summary.seasons_processed, 1);
  assert_eq!(summary.races_processed, 0);
  assert!(summary.errors.is_empty() && summary.warnings.is_empty());
  assert_eq!(summary.notes.len(), 1);
  assert!(summary.notes[0].contains("no races published yet"));
  // The season row itself is still cached.
  assert_eq!(s.counts().await.unwrap().seasons, 1);
}

#[tokio::test]
async fn empty_intersection_reports_zero_work() {
  let api = MockApi::with_seasons(&[2020, 2021]);
  let s = store().await;

  let summary = refresh(&api, &s, range(1900, 1901)).await.unwrap();

  assert_eq!(summary.seasons_requested, 0);
  assert_eq!(summary.seasons_processed, 0);
  assert_eq!(summary.notes.len(), 1);
  assert!(summary.notes[0].contains("1900:1901"));
  assert_eq!(s.counts().await.unwrap().seasons, 0);
}

#[tokio::test]
async fn default_range_spans_floor_to_latest() {
  let mut api = MockApi::with_seasons(&[2004, 2005, 2006]);
  api.race(2005, 1, "A").race(2006, 1, "B");
  let s = store().await;

  let summary = refresh(&api, &s, None).await.unwrap();

  assert_eq!(summary.target_start, 2005);
  assert_eq!(summary.target_end, 2006);
  assert_eq!(summary.latest_available, 2006);
  assert_eq!(summary.seasons_processed, 2);
}

#[tokio::test]
async fn unreachable_seasons_endpoint_is_fatal() {
  let mut api = MockApi::with_seasons(&[2023]);
  api.fail_seasons = true;
  let s = store().await;

  let err = refresh(&api, &s, None).await.unwrap_err();
  assert!(matches!(err, Error::Api(_)));
}

#[tokio::test]
async fn api_reporting_no_seasons_at_all_is_fatal() {
  let api = MockApi::with_seasons(&[]);
  let s = store().await;

  let err = refresh(&api, &s, None).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Range(gridcache_core::Error::NoSeasonsAvailable)
  ));
}
