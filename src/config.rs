use serde::Serialize;

use crate::relations::{AffirmationThresholds, InterruptionThresholds, RelationCatalog};

/// Configuration for a batch analysis run
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisConfig {
    /// Merge each participant's utterances separated by less than this many
    /// ms before looking for relations. `None` leaves utterances as supplied.
    pub merge_gap_ms: Option<i64>,
    /// Thresholds for affirmation and interruption detection
    pub relations: RelationCatalog,
    /// Number of equal parts a meeting is split into for the zero-length
    /// utterance distribution
    pub zero_length_slots: usize,
    /// Meetings shorter than this are left out of the zero-length distribution
    pub min_meeting_duration_ms: i64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            merge_gap_ms: None,
            relations: RelationCatalog::default(),
            zero_length_slots: 50,
            min_meeting_duration_ms: 60_000, // 1 minute
        }
    }
}

impl AnalysisConfig {
    /// Override the affirmation thresholds
    pub fn with_affirmation(mut self, thresholds: AffirmationThresholds) -> Self {
        self.relations.affirmation = thresholds;
        self
    }

    /// Override the interruption thresholds
    pub fn with_interruption(mut self, thresholds: InterruptionThresholds) -> Self {
        self.relations.interruption = thresholds;
        self
    }
}
