//! [`RefreshSummary`] — what a refresh did and what went wrong.

use serde::{Deserialize, Serialize};

/// Aggregated outcome of one refresh run.
///
/// `errors` holds season-level failures (the season's races could not even
/// be listed), `warnings` holds race-level failures (a winner fetch failed),
/// and `notes` holds informational outcomes (no winner recorded yet, empty
/// season). Callers must always surface all three: a partial success is
/// never presented as a full one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshSummary {
  pub target_start:      i32,
  pub target_end:        i32,
  pub latest_available:  i32,
  pub seasons_requested: usize,
  pub seasons_processed: usize,
  pub races_processed:   usize,
  pub winners_upserted:  usize,
  pub notes:             Vec<String>,
  pub warnings:          Vec<String>,
  pub errors:            Vec<String>,
}

impl RefreshSummary {
  pub fn new(
    target_start: i32,
    target_end: i32,
    latest_available: i32,
    seasons_requested: usize,
  ) -> Self {
    Self {
      target_start,
      target_end,
      latest_available,
      seasons_requested,
      seasons_processed: 0,
      races_processed: 0,
      winners_upserted: 0,
      notes: vec![],
      warnings: vec![],
      errors: vec![],
    }
  }

  /// One-line human summary, e.g.
  /// `Processed 2/2 seasons, upserted 44 races and 43 winners.`
  pub fn short_message(&self) -> String {
    format!(
      "Processed {}/{} seasons, upserted {} races and {} winners.",
      self.seasons_processed,
      self.seasons_requested,
      self.races_processed,
      self.winners_upserted
    )
  }

  /// Whether anything went wrong (warnings or errors, not notes).
  pub fn has_problems(&self) -> bool {
    !self.warnings.is_empty() || !self.errors.is_empty()
  }
}
