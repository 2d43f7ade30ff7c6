//! The refresh orchestrator: drives the per-season, per-race fetch sequence
//! against a [`ResultsApi`] and reconciles every discovered record into a
//! [`ResultsStore`].
//!
//! Failure containment is the point of this module. A race whose winner
//! cannot be fetched becomes a warning; a season whose schedule cannot be
//! listed becomes an error; neither aborts the refresh. Only range
//! validation, an unreachable seasons endpoint, and store failures
//! propagate to the caller.
//!
//! Records are upserted as they arrive, never batched, so an interrupted
//! refresh leaves a valid-but-partial cache; re-running the same range
//! converges (every write is an idempotent natural-key upsert).

pub mod summary;

use gridcache_core::{
  Error as CoreError,
  api::{ResultsApi, WinnerRecord},
  model::{NewConstructor, NewDriver, NewRace, NewWinner},
  range::{SeasonRange, resolve},
  store::ResultsStore,
};
use thiserror::Error;

pub use summary::RefreshSummary;

// ─── Error ───────────────────────────────────────────────────────────────────

/// A failure that aborts the whole refresh. Per-season and per-race
/// failures never surface here; they are folded into the summary.
#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Range(#[from] CoreError),

  /// The seasons listing itself could not be fetched; without it there is
  /// nothing to refresh.
  #[error("results API error: {0}")]
  Api(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Refresh ─────────────────────────────────────────────────────────────────

/// Fetch and reconcile every season in `range` (default: 2005 through the
/// latest available), one season at a time, one request in flight.
///
/// An empty intersection between the requested range and the available
/// seasons is not an error: the returned summary reports zero seasons and
/// carries an explanatory note.
pub async fn refresh<A, S>(
  api: &A,
  store: &S,
  range: Option<SeasonRange>,
) -> Result<RefreshSummary>
where
  A: ResultsApi,
  S: ResultsStore,
{
  let available = api
    .fetch_seasons()
    .await
    .map_err(|e| Error::Api(Box::new(e)))?;

  let resolved = match resolve(range, &available) {
    Ok(resolved) => resolved,
    Err(CoreError::EmptyRange { start, end }) => {
      // Reported, non-fatal: the refresh completes having done nothing.
      let latest = available.iter().copied().max().unwrap_or_default();
      let mut summary = RefreshSummary::new(start, end, latest, 0);
      summary
        .notes
        .push(CoreError::EmptyRange { start, end }.to_string());
      return Ok(summary);
    }
    Err(e) => return Err(e.into()),
  };

  let mut summary = RefreshSummary::new(
    resolved.start,
    resolved.end,
    resolved.latest_available,
    resolved.seasons.len(),
  );
  tracing::info!(
    start = resolved.start,
    end = resolved.end,
    latest_available = resolved.latest_available,
    seasons = resolved.seasons.len(),
    "starting refresh"
  );

  for &year in &resolved.seasons {
    tracing::info!(year, "fetching races");
    store
      .upsert_season(year)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;

    let races = match api.fetch_races_for_season(year).await {
      Ok(races) => races,
      Err(e) => {
        tracing::warn!(year, error = %e, "failed to fetch races for season");
        summary
          .errors
          .push(format!("season {year}: failed to fetch races: {e}"));
        continue;
      }
    };

    if races.is_empty() {
      // A listed season with no published rounds is a valid empty result.
      tracing::info!(year, "no races published yet");
      summary.notes.push(format!("season {year}: no races published yet"));
      summary.seasons_processed += 1;
      continue;
    }

    for race in &races {
      store
        .upsert_race(NewRace {
          season_year:  race.season,
          round:        race.round,
          race_name:    race.race_name.clone(),
          circuit_name: race.circuit_name.clone(),
          date:         race.date,
        })
        .await
        .map_err(|e| Error::Store(Box::new(e)))?;
      summary.races_processed += 1;

      match api.fetch_race_winner(year, race.round).await {
        Ok(Some(winner)) => {
          upsert_winner(store, year, race.round, &winner).await?;
          summary.winners_upserted += 1;
        }
        Ok(None) => {
          tracing::info!(year, round = race.round, "no winner recorded yet");
          summary
            .notes
            .push(format!("{year} round {}: no winner recorded yet", race.round));
        }
        Err(e) => {
          tracing::warn!(year, round = race.round, error = %e, "winner fetch failed");
          summary
            .warnings
            .push(format!("{year} round {}: winner fetch failed: {e}", race.round));
        }
      }
    }

    summary.seasons_processed += 1;
    tracing::info!(
      year,
      races = races.len(),
      winners_total = summary.winners_upserted,
      "season completed"
    );
  }

  tracing::info!("{}", summary.short_message());
  if !summary.warnings.is_empty() || !summary.errors.is_empty() {
    tracing::warn!(
      warnings = summary.warnings.len(),
      errors = summary.errors.len(),
      "refresh completed with problems"
    );
  }
  Ok(summary)
}

/// Winner write ordering: the driver and constructor rows must exist before
/// the winner row that references them.
async fn upsert_winner<S: ResultsStore>(
  store: &S,
  season: i32,
  round: u32,
  winner: &WinnerRecord,
) -> Result<()> {
  store
    .upsert_driver(NewDriver {
      driver_id:        winner.driver_id.clone(),
      given_name:       winner.given_name.clone(),
      family_name:      winner.family_name.clone(),
      code:             winner.code.clone(),
      permanent_number: winner.permanent_number.clone(),
    })
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  store
    .upsert_constructor(NewConstructor {
      constructor_id: winner.constructor_id.clone(),
      name:           winner.constructor_name.clone(),
      nationality:    winner.constructor_nationality.clone(),
    })
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  store
    .upsert_winner(NewWinner {
      season_year:    season,
      round,
      driver_id:      winner.driver_id.clone(),
      constructor_id: winner.constructor_id.clone(),
    })
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  Ok(())
}

#[cfg(test)]
mod tests;
