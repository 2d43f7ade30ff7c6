//! Season range parsing and resolution.
//!
//! A refresh targets an inclusive `START:END` year interval, defaulting to
//! 2005 through the latest season the API reports. The resolver intersects
//! the requested bound with the truly-available season set before any race
//! is fetched, so an impossible range fails fast and an empty one is
//! reported rather than silently refreshing nothing.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default lower bound when no range is given.
pub const DEFAULT_START_SEASON: i32 = 2005;

// ─── SeasonRange ─────────────────────────────────────────────────────────────

/// An inclusive `[start, end]` interval of season years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonRange {
  pub start: i32,
  pub end:   i32,
}

impl SeasonRange {
  /// Build a range, rejecting `start > end`.
  pub fn new(start: i32, end: i32) -> Result<Self> {
    if start > end {
      return Err(Error::InvalidRange { start, end });
    }
    Ok(Self { start, end })
  }

  /// Parse the CLI/API textual form `START:END` (four digits each side,
  /// surrounding whitespace tolerated), e.g. `"2005:2025"`.
  pub fn parse(raw: &str) -> Result<Self> {
    let malformed = || Error::MalformedRange(raw.to_owned());

    let (start_str, end_str) = raw.trim().split_once(':').ok_or_else(malformed)?;
    let start_str = start_str.trim();
    let end_str = end_str.trim();

    let four_digits =
      |s: &str| s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit());
    if !four_digits(start_str) || !four_digits(end_str) {
      return Err(malformed());
    }

    let start: i32 = start_str.parse().map_err(|_| malformed())?;
    let end: i32 = end_str.parse().map_err(|_| malformed())?;
    Self::new(start, end)
  }
}

// ─── Resolution ──────────────────────────────────────────────────────────────

/// The outcome of intersecting a requested range with availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRange {
  pub start:            i32,
  pub end:              i32,
  /// Highest season year the API reported.
  pub latest_available: i32,
  /// Season years to refresh, ascending, duplicate-free.
  pub seasons:          Vec<i32>,
}

/// Intersect `requested` (or the default bound) with the seasons the API
/// actually has.
///
/// - `requested = None` means `DEFAULT_START_SEASON` through the latest
///   available season.
/// - [`Error::NoSeasonsAvailable`] when `available` is empty.
/// - [`Error::EmptyRange`] when the intersection is empty; callers treat
///   this as a reported zero-work outcome, not a crash.
pub fn resolve(
  requested: Option<SeasonRange>,
  available: &[i32],
) -> Result<ResolvedRange> {
  let available: BTreeSet<i32> = available.iter().copied().collect();
  let latest_available =
    *available.iter().next_back().ok_or(Error::NoSeasonsAvailable)?;

  // The fields are public (and deserialisable), so the `new()` invariant may
  // not hold for `requested`. Re-validate rather than trust it.
  let range = match requested {
    Some(r) => SeasonRange::new(r.start, r.end)?,
    None => SeasonRange::new(DEFAULT_START_SEASON, latest_available)?,
  };

  let seasons: Vec<i32> = available
    .range(range.start..=range.end)
    .copied()
    .collect();

  if seasons.is_empty() {
    return Err(Error::EmptyRange { start: range.start, end: range.end });
  }

  Ok(ResolvedRange {
    start: range.start,
    end: range.end,
    latest_available,
    seasons,
  })
}

// ─── Tests ───────────────────────────────────────────────────────────────────
