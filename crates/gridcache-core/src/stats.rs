//! Trend and legend statistics over cached win rows.
//!
//! All functions here are pure: they take an explicit snapshot of win rows
//! (see [`crate::model::WinRecord`]) plus their parameters, and return
//! structured results. No hidden store access.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::WinRecord;

/// Per-season recency weights, newest season first.
pub const RECENCY_WEIGHTS: [f64; 5] = [1.0, 0.8, 0.6, 0.4, 0.2];

// ─── Scores ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonWins {
  pub season: i32,
  pub wins:   u32,
}

/// A driver's or constructor's recency-weighted form score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityScore {
  pub entity_id:            String,
  pub name:                 String,
  /// `weighted_score + trend_adjustment`, rounded to 3 decimals.
  pub score:                f64,
  pub weighted_score:       f64,
  pub trend_adjustment:     f64,
  pub last_season_wins:     u32,
  pub previous_season_wins: u32,
  pub wins_breakdown:       Vec<SeasonWins>,
}

/// The last `n` distinct seasons (ascending) that have at least one win row.
pub fn recent_seasons(wins: &[WinRecord], n: usize) -> Vec<i32> {
  if n == 0 {
    return vec![];
  }
  let seasons: std::collections::BTreeSet<i32> =
    wins.iter().map(|w| w.season_year).collect();
  let mut seasons: Vec<i32> = seasons.into_iter().collect();
  if seasons.len() > n {
    seasons.drain(..seasons.len() - n);
  }
  seasons
}

/// Recency-weighted win scores per driver, sorted by score descending then
/// name ascending.
pub fn driver_scores(wins: &[WinRecord], seasons: &[i32]) -> Vec<EntityScore> {
  scores_by(wins, seasons, |w| (&w.driver_id, &w.driver_name))
}

/// Recency-weighted win scores per constructor.
pub fn constructor_scores(wins: &[WinRecord], seasons: &[i32]) -> Vec<EntityScore> {
  scores_by(wins, seasons, |w| (&w.constructor_id, &w.constructor_name))
}

fn scores_by<'a, F>(
  wins: &'a [WinRecord],
  seasons: &[i32],
  key: F,
) -> Vec<EntityScore>
where
  F: Fn(&'a WinRecord) -> (&'a str, &'a str),
{
  let seasons = normalize_seasons(seasons);
  if seasons.is_empty() {
    return vec![];
  }

  // entity id → (display name, season → wins)
  let mut by_entity: BTreeMap<&str, (&str, BTreeMap<i32, u32>)> = BTreeMap::new();
  for win in wins {
    if !seasons.contains(&win.season_year) {
      continue;
    }
    let (id, name) = key(win);
    let entry = by_entity.entry(id).or_insert_with(|| (name, BTreeMap::new()));
    *entry.1.entry(win.season_year).or_insert(0) += 1;
  }

  let weights = season_weights(&seasons);
  let last_season = *seasons.last().unwrap_or(&0);
  let previous_season = seasons.len().checked_sub(2).map(|i| seasons[i]);

  let mut scores: Vec<EntityScore> = by_entity
    .into_iter()
    .map(|(id, (name, season_wins))| {
      let weighted_score: f64 = seasons
        .iter()
        .map(|s| f64::from(season_wins.get(s).copied().unwrap_or(0)) * weights[s])
        .sum();

      let last_wins = season_wins.get(&last_season).copied().unwrap_or(0);
      let previous_wins = previous_season
        .and_then(|s| season_wins.get(&s).copied())
        .unwrap_or(0);

      let mut trend_adjustment = 0.0;
      if last_wins > previous_wins {
        trend_adjustment += 0.5;
      }
      if last_wins == 0 {
        trend_adjustment -= 0.3;
      }

      let name = if name.is_empty() { id } else { name };
      EntityScore {
        entity_id:            id.to_owned(),
        name:                 name.to_owned(),
        score:                round3(weighted_score + trend_adjustment),
        weighted_score:       round3(weighted_score),
        trend_adjustment:     round3(trend_adjustment),
        last_season_wins:     last_wins,
        previous_season_wins: previous_wins,
        wins_breakdown:       seasons
          .iter()
          .map(|&season| SeasonWins {
            season,
            wins: season_wins.get(&season).copied().unwrap_or(0),
          })
          .collect(),
      }
    })
    .collect();

  scores.sort_by(|a, b| {
    b.score.total_cmp(&a.score).then_with(|| a.name.cmp(&b.name))
  });
  scores
}

/// Ascending, deduplicated, truncated to the newest
/// `RECENCY_WEIGHTS.len()` seasons.
fn normalize_seasons(seasons: &[i32]) -> Vec<i32> {
  let set: std::collections::BTreeSet<i32> = seasons.iter().copied().collect();
  let mut normalized: Vec<i32> = set.into_iter().collect();
  if normalized.len() > RECENCY_WEIGHTS.len() {
    normalized.drain(..normalized.len() - RECENCY_WEIGHTS.len());
  }
  normalized
}

fn season_weights(seasons: &[i32]) -> BTreeMap<i32, f64> {
  seasons
    .iter()
    .rev()
    .enumerate()
    .map(|(idx, &season)| {
      let weight = *RECENCY_WEIGHTS
        .get(idx)
        .unwrap_or(RECENCY_WEIGHTS.last().unwrap_or(&0.0));
      (season, weight)
    })
    .collect()
}

fn round3(value: f64) -> f64 {
  (value * 1000.0).round() / 1000.0
}

// ─── Confidence ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLabel {
  High,
  Medium,
  Low,
}

/// Normalised gap between the top two scores, with a coarse label.
pub fn confidence(top_score: f64, second_score: f64) -> (f64, ConfidenceLabel) {
  let top = top_score.max(0.0);
  let second = second_score.max(0.0);
  let value = ((top - second) / top.max(1e-6)).max(0.0);

  let label = if value >= 0.35 {
    ConfidenceLabel::High
  } else if value >= 0.15 {
    ConfidenceLabel::Medium
  } else {
    ConfidenceLabel::Low
  };
  (round3(value), label)
}

// ─── Legends ─────────────────────────────────────────────────────────────────

/// Fixed era labels offered by the legends view.
pub const ERA_CHOICES: [&str; 6] = [
  "all",
  "1950-1979",
  "1980-1999",
  "2000-2013",
  "2014-2021",
  "2022-2026",
];

/// An inclusive era filter over season years. `None` bounds mean unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Era {
  pub start: Option<i32>,
  pub end:   Option<i32>,
  pub label: String,
}

impl Era {
  /// All eras (no filtering).
  pub fn all() -> Self {
    Self { start: None, end: None, label: "All Eras".to_owned() }
  }

  /// Parse one of [`ERA_CHOICES`]; anything unknown falls back to all eras.
  pub fn parse(raw: Option<&str>) -> Self {
    let value = raw.unwrap_or("all").trim();
    if value == "all" || !ERA_CHOICES.contains(&value) {
      return Self::all();
    }
    // Known labels are always "START-END" with four digits each side.
    let (start, end) = value.split_once('-').unwrap_or(("", ""));
    match (start.parse::<i32>(), end.parse::<i32>()) {
      (Ok(s), Ok(e)) => Self { start: Some(s), end: Some(e), label: value.to_owned() },
      _ => Self::all(),
    }
  }

  fn contains(&self, season: i32) -> bool {
    self.start.is_none_or(|s| season >= s) && self.end.is_none_or(|e| season <= e)
  }
}

/// One row of a "most wins" leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
  pub rank:              usize,
  pub entity_id:         String,
  pub name:              String,
  pub total_wins:        u32,
  pub peak_season_year:  Option<i32>,
  pub peak_season_wins:  u32,
  pub active_start_year: i32,
  pub active_end_year:   i32,
}

/// Drivers with the most wins inside `era`, best first.
pub fn top_drivers(wins: &[WinRecord], limit: usize, era: &Era) -> Vec<LegendEntry> {
  top_by(wins, limit, era, |w| (&w.driver_id, &w.driver_name))
}

/// Constructors with the most wins inside `era`, best first.
pub fn top_constructors(
  wins: &[WinRecord],
  limit: usize,
  era: &Era,
) -> Vec<LegendEntry> {
  top_by(wins, limit, era, |w| (&w.constructor_id, &w.constructor_name))
}

fn top_by<'a, F>(
  wins: &'a [WinRecord],
  limit: usize,
  era: &Era,
  key: F,
) -> Vec<LegendEntry>
where
  F: Fn(&'a WinRecord) -> (&'a str, &'a str),
{
  let mut by_entity: BTreeMap<&str, (&str, BTreeMap<i32, u32>)> = BTreeMap::new();
  for win in wins {
    if !era.contains(win.season_year) {
      continue;
    }
    let (id, name) = key(win);
    let entry = by_entity.entry(id).or_insert_with(|| (name, BTreeMap::new()));
    *entry.1.entry(win.season_year).or_insert(0) += 1;
  }

  let mut entries: Vec<LegendEntry> = by_entity
    .into_iter()
    .map(|(id, (name, season_wins))| {
      let total_wins: u32 = season_wins.values().sum();
      // Peak season: most wins, ties broken by earliest year.
      let peak = season_wins
        .iter()
        .max_by(|(ya, wa), (yb, wb)| wa.cmp(wb).then(yb.cmp(ya)))
        .map(|(&year, &w)| (year, w));
      let first_year = season_wins.keys().next().copied().unwrap_or(0);
      let last_year = season_wins.keys().next_back().copied().unwrap_or(0);

      let name = if name.is_empty() { id } else { name };
      LegendEntry {
        rank:              0,
        entity_id:         id.to_owned(),
        name:              name.to_owned(),
        total_wins,
        peak_season_year:  peak.map(|(year, _)| year),
        peak_season_wins:  peak.map(|(_, w)| w).unwrap_or(0),
        active_start_year: first_year,
        active_end_year:   last_year,
      }
    })
    .collect();

  entries.sort_by(|a, b| {
    b.total_wins.cmp(&a.total_wins).then_with(|| a.name.cmp(&b.name))
  });
  entries.truncate(limit);
  for (idx, entry) in entries.iter_mut().enumerate() {
    entry.rank = idx + 1;
  }
  entries
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn win(season: i32, round: u32, driver: &str, constructor: &str) -> WinRecord {
    WinRecord {
      season_year:      season,
      round,
      driver_id:        driver.to_owned(),
      driver_name:      format!("Driver {driver}"),
      constructor_id:   constructor.to_owned(),
      constructor_name: format!("Team {constructor}"),
    }
  }

  #[test]
  fn recent_seasons_keeps_the_newest_n() {
    let wins = vec![
      win(2020, 1, "a", "x"),
      win(2021, 1, "a", "x"),
      win(2022, 1, "a", "x"),
      win(2022, 2, "b", "y"),
    ];
    assert_eq!(recent_seasons(&wins, 2), vec![2021, 2022]);
    assert_eq!(recent_seasons(&wins, 10), vec![2020, 2021, 2022]);
    assert!(recent_seasons(&wins, 0).is_empty());
  }

  #[test]
  fn driver_scores_weight_recent_seasons_higher() {
    // "a" wins twice in the newest season, "b" twice in the oldest of two.
    let wins = vec![
      win(2025, 1, "a", "x"),
      win(2025, 2, "a", "x"),
      win(2024, 1, "b", "y"),
      win(2024, 2, "b", "y"),
    ];
    let scores = driver_scores(&wins, &[2024, 2025]);
    assert_eq!(scores.len(), 2);

    let a = &scores[0];
    assert_eq!(a.entity_id, "a");
    // 2 wins * 1.0 (newest), rising trend (+0.5).
    assert_eq!(a.weighted_score, 2.0);
    assert_eq!(a.trend_adjustment, 0.5);
    assert_eq!(a.score, 2.5);
    assert_eq!(a.last_season_wins, 2);
    assert_eq!(a.previous_season_wins, 0);

    let b = &scores[1];
    // 2 wins * 0.8 (previous), winless last season (-0.3).
    assert_eq!(b.weighted_score, 1.6);
    assert_eq!(b.trend_adjustment, -0.3);
    assert_eq!(b.score, 1.3);
  }

  #[test]
  fn scores_ignore_seasons_outside_the_window() {
    let wins = vec![win(1999, 1, "a", "x"), win(2025, 1, "a", "x")];
    let scores = driver_scores(&wins, &[2025]);
    assert_eq!(scores[0].weighted_score, 1.0);
    assert_eq!(scores[0].wins_breakdown, vec![SeasonWins { season: 2025, wins: 1 }]);
  }

  #[test]
  fn scores_window_truncates_to_five_seasons() {
    let seasons: Vec<i32> = (2018..=2025).collect();
    let wins = vec![win(2018, 1, "a", "x"), win(2025, 1, "a", "x")];
    let scores = driver_scores(&wins, &seasons);
    // 2018 falls outside the newest-5 window; only the 2025 win counts.
    assert_eq!(scores[0].wins_breakdown.len(), 5);
    assert_eq!(scores[0].weighted_score, 1.0);
  }

  #[test]
  fn empty_season_window_yields_no_scores() {
    let wins = vec![win(2025, 1, "a", "x")];
    assert!(driver_scores(&wins, &[]).is_empty());
  }

  #[test]
  fn confidence_labels_follow_thresholds() {
    let (value, label) = confidence(10.0, 5.0);
    assert_eq!(value, 0.5);
    assert_eq!(label, ConfidenceLabel::High);

    let (value, label) = confidence(10.0, 8.0);
    assert_eq!(value, 0.2);
    assert_eq!(label, ConfidenceLabel::Medium);

    let (value, label) = confidence(10.0, 9.5);
    assert_eq!(value, 0.05);
    assert_eq!(label, ConfidenceLabel::Low);

    // Degenerate inputs never divide by zero or go negative.
    let (value, label) = confidence(0.0, 0.0);
    assert_eq!(value, 0.0);
    assert_eq!(label, ConfidenceLabel::Low);
    let (value, _) = confidence(1.0, 2.0);
    assert_eq!(value, 0.0);
  }

  #[test]
  fn era_parse_known_and_unknown_labels() {
    let era = Era::parse(Some("2014-2021"));
    assert_eq!(era.start, Some(2014));
    assert_eq!(era.end, Some(2021));

    assert_eq!(Era::parse(None), Era::all());
    assert_eq!(Era::parse(Some("all")), Era::all());
    assert_eq!(Era::parse(Some("1234-5678")), Era::all());
  }

  #[test]
  fn top_drivers_ranks_by_total_wins_with_peak_season() {
    let wins = vec![
      win(2014, 1, "ham", "merc"),
      win(2014, 2, "ham", "merc"),
      win(2015, 1, "ham", "merc"),
      win(2015, 2, "vet", "ferrari"),
      win(2021, 1, "ver", "rbr"),
    ];
    let era = Era::parse(Some("2014-2021"));
    let top = top_drivers(&wins, 2, &era);

    assert_eq!(top.len(), 2);
    assert_eq!(top[0].entity_id, "ham");
    assert_eq!(top[0].rank, 1);
    assert_eq!(top[0].total_wins, 3);
    assert_eq!(top[0].peak_season_year, Some(2014));
    assert_eq!(top[0].peak_season_wins, 2);
    assert_eq!(top[0].active_start_year, 2014);
    assert_eq!(top[0].active_end_year, 2015);
  }

  #[test]
  fn top_constructors_respects_era_bounds() {
    let wins = vec![
      win(1955, 1, "fangio", "mercedes"),
      win(2020, 1, "ham", "merc"),
    ];
    let era = Era::parse(Some("1950-1979"));
    let top = top_constructors(&wins, 5, &era);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].entity_id, "mercedes");
  }

  #[test]
  fn peak_season_ties_break_toward_earliest_year() {
    let wins = vec![
      win(2019, 1, "a", "x"),
      win(2021, 1, "a", "x"),
    ];
    let top = top_drivers(&wins, 1, &Era::all());
    assert_eq!(top[0].peak_season_year, Some(2019));
    assert_eq!(top[0].peak_season_wins, 1);
  }
}
