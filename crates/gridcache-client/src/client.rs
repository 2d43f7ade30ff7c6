//! [`JolpicaClient`] — reqwest-backed implementation of [`ResultsApi`].

use std::{
  sync::Arc,
  time::{Duration, Instant},
};

use gridcache_core::api::{RaceDescriptor, ResultsApi, WinnerRecord};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::{
  Error, Result,
  wire::{Envelope, RawRace, RawSeason},
};

/// Public base URL of the Jolpica Ergast-compatible API.
pub const DEFAULT_BASE_URL: &str = "http://api.jolpi.ca/ergast/f1";

// ─── Configuration ───────────────────────────────────────────────────────────

/// Retry/throttle/timeout knobs. The defaults match the upstream service's
/// published rate limits; tests override them to run fast.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  pub base_url:      String,
  /// Per-attempt timeout.
  pub timeout:       Duration,
  /// Maximum attempts per request, transient failures only.
  pub max_attempts:  u32,
  /// Minimum delay between two consecutive successful requests.
  pub throttle:      Duration,
  /// Base backoff between attempts of one request; scaled by attempt number.
  pub retry_backoff: Duration,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      base_url:      DEFAULT_BASE_URL.to_owned(),
      timeout:       Duration::from_secs(12),
      max_attempts:  3,
      throttle:      Duration::from_millis(200),
      retry_backoff: Duration::from_millis(500),
    }
  }
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Async HTTP client for the Jolpica results API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based and the
/// throttle clock is shared.
#[derive(Clone)]
pub struct JolpicaClient {
  http:         reqwest::Client,
  config:       ClientConfig,
  /// Completion time of the most recent successful request; the throttle
  /// delay is measured from here, so retries of one request are not
  /// themselves throttled.
  last_success: Arc<Mutex<Option<Instant>>>,
}

impl JolpicaClient {
  pub fn new(config: ClientConfig) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(Error::Build)?;
    Ok(Self { http, config, last_success: Arc::new(Mutex::new(None)) })
  }

  pub fn with_defaults() -> Result<Self> {
    Self::new(ClientConfig::default())
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/{}",
      self.config.base_url.trim_end_matches('/'),
      path.trim_start_matches('/')
    )
  }

  /// Sleep out the remainder of the inter-request delay, if any.
  async fn throttle(&self) {
    let last = *self.last_success.lock().await;
    if let Some(last) = last {
      let elapsed = last.elapsed();
      if elapsed < self.config.throttle {
        tokio::time::sleep(self.config.throttle - elapsed).await;
      }
    }
  }

  /// One logical GET: throttled once up front, then up to
  /// `max_attempts` tries with linear backoff for transient failures.
  /// 4xx statuses and unparseable bodies fail immediately.
  async fn get_json<T: DeserializeOwned>(
    &self,
    path: &str,
    query: &[(&str, &str)],
  ) -> Result<T> {
    let url = self.url(path);
    self.throttle().await;

    let mut last_reason = String::new();
    for attempt in 1..=self.config.max_attempts {
      if attempt > 1 {
        tokio::time::sleep(self.config.retry_backoff * (attempt - 1)).await;
        tracing::debug!(%url, attempt, "retrying request");
      }

      let response = match self.http.get(&url).query(query).send().await {
        Ok(response) => response,
        Err(e) => {
          // Timeouts and connection resets are transient.
          last_reason = e.to_string();
          continue;
        }
      };

      let status = response.status();
      if status.is_server_error() {
        last_reason = format!("HTTP {status}");
        continue;
      }
      if !status.is_success() {
        return Err(Error::Http { url, status });
      }

      // A body cut off mid-stream is as transient as a connect failure.
      let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
          last_reason = e.to_string();
          continue;
        }
      };

      let parsed: T =
        serde_json::from_str(&body).map_err(|e| Error::Malformed {
          url:    url.clone(),
          reason: e.to_string(),
        })?;

      *self.last_success.lock().await = Some(Instant::now());
      return Ok(parsed);
    }

    Err(Error::Transport {
      url,
      attempts: self.config.max_attempts,
      reason:   last_reason,
    })
  }
}

// ─── ResultsApi impl ─────────────────────────────────────────────────────────

impl ResultsApi for JolpicaClient {
  type Error = Error;

  /// `GET /seasons.json?limit=1000`
  async fn fetch_seasons(&self) -> Result<Vec<i32>> {
    let envelope: Envelope =
      self.get_json("/seasons.json", &[("limit", "1000")]).await?;

    let mut years: Vec<i32> = envelope
      .mrdata
      .season_table
      .map(|t| t.seasons)
      .unwrap_or_default()
      .iter()
      .filter_map(RawSeason::year)
      .collect();
    years.sort_unstable();
    years.dedup();
    Ok(years)
  }

  /// `GET /{season}.json?limit=1000`
  async fn fetch_races_for_season(&self, season: i32) -> Result<Vec<RaceDescriptor>> {
    let envelope: Envelope = self
      .get_json(&format!("/{season}.json"), &[("limit", "1000")])
      .await?;

    Ok(
      envelope
        .mrdata
        .race_table
        .map(|t| t.races)
        .unwrap_or_default()
        .iter()
        .filter_map(|race| race.descriptor(season))
        .collect(),
    )
  }

  /// `GET /{season}/{round}/results/1.json`
  async fn fetch_race_winner(
    &self,
    season: i32,
    round: u32,
  ) -> Result<Option<WinnerRecord>> {
    let envelope: Envelope = self
      .get_json(&format!("/{season}/{round}/results/1.json"), &[])
      .await?;

    let races: Vec<RawRace> = envelope
      .mrdata
      .race_table
      .map(|t| t.races)
      .unwrap_or_default();

    // No race entry or no results: the round has not been run yet.
    let Some(result) = races.first().and_then(|race| race.results.first()) else {
      return Ok(None);
    };
    Ok(result.winner(season, round))
  }
}
