use serde::Serialize;
use tracing::debug;

use crate::models::{ParticipantId, RelationEdge, RelationPair, Utterance};

use super::aggregate::count_relations;
use super::engine::find_related_pruned;

/// Thresholds for the affirmation relation (milliseconds)
#[derive(Debug, Clone, Serialize)]
pub struct AffirmationThresholds {
    /// Overlap with the earlier utterance must exceed this
    pub min_overlap_ms: i64,
    /// The affirming utterance must be shorter than this
    pub max_length_ms: i64,
}

impl Default for AffirmationThresholds {
    fn default() -> Self {
        Self {
            min_overlap_ms: 250,
            max_length_ms: 2_000,
        }
    }
}

impl AffirmationThresholds {
    /// Does `later` affirm `earlier`?
    ///
    /// The later speaker starts while the earlier one is talking, overlaps
    /// long enough, keeps it short, and stops while the earlier speaker
    /// carries on.
    pub fn is_affirmation(&self, earlier: &Utterance, later: &Utterance) -> bool {
        if earlier.participant_id() == later.participant_id() {
            return false;
        }

        let sufficient_overlap = earlier.end_ms() - later.start_ms() > self.min_overlap_ms;
        let short_affirmation = later.duration_ms() < self.max_length_ms;
        let affirmation_ends_first = earlier.end_ms() - later.end_ms() > 0;

        sufficient_overlap && short_affirmation && affirmation_ends_first
    }
}

/// Thresholds for the interruption relation (milliseconds)
#[derive(Debug, Clone, Serialize)]
pub struct InterruptionThresholds {
    /// Overlap with the interrupted utterance must be at least this
    pub min_overlap_ms: i64,
    /// The interrupting utterance must last at least this
    pub min_length_ms: i64,
}

impl Default for InterruptionThresholds {
    fn default() -> Self {
        Self {
            min_overlap_ms: 1_000,
            min_length_ms: 5_000,
        }
    }
}

impl InterruptionThresholds {
    /// Does `later` interrupt `earlier`?
    ///
    /// The later speaker starts while the earlier one is talking, overlaps for
    /// a while, talks at length, and the earlier speaker gives up first.
    pub fn is_interruption(&self, earlier: &Utterance, later: &Utterance) -> bool {
        if earlier.participant_id() == later.participant_id() {
            return false;
        }

        let sufficient_overlap = earlier.end_ms() - later.start_ms() >= self.min_overlap_ms;
        let long_interruption = later.duration_ms() >= self.min_length_ms;
        let interrupted_stops_first = later.end_ms() - earlier.end_ms() > 0;

        sufficient_overlap && long_interruption && interrupted_stops_first
    }
}

/// Could `earlier` still overlap `later` or anything starting after it?
///
/// Monotone over utterances sorted by start: once an earlier utterance has
/// ended by the time `later` starts, every following utterance starts later
/// still.
pub fn is_possibly_overlapping(later: &Utterance, earlier: &Utterance) -> bool {
    earlier.end_ms() > later.start_ms()
}

/// Relations the catalog knows how to find
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Affirmation,
    Interruption,
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationKind::Affirmation => write!(f, "affirmation"),
            RelationKind::Interruption => write!(f, "interruption"),
        }
    }
}

/// Related utterances of one kind, with counts per participant pair
#[derive(Debug, Clone, Serialize)]
pub struct RelationReport {
    pub kind: RelationKind,
    /// Counts keyed by (earlier speaker, later speaker)
    pub edges: Vec<RelationEdge<ParticipantId>>,
    /// The related utterance pairs, in the order they were found
    pub events: Vec<RelationPair<Utterance>>,
}

/// Affirmation and interruption detection over start-sorted utterances
#[derive(Debug, Clone, Default, Serialize)]
pub struct RelationCatalog {
    pub affirmation: AffirmationThresholds,
    pub interruption: InterruptionThresholds,
}

impl RelationCatalog {
    pub fn new(affirmation: AffirmationThresholds, interruption: InterruptionThresholds) -> Self {
        Self {
            affirmation,
            interruption,
        }
    }

    /// Find all related pairs of the given kind.
    ///
    /// `sorted_uts` must be ordered by start.
    pub fn find<'a>(&self, kind: RelationKind, sorted_uts: &'a [Utterance]) -> Vec<RelationPair<&'a Utterance>> {
        match kind {
            RelationKind::Affirmation => find_affirmations(sorted_uts, &self.affirmation),
            RelationKind::Interruption => find_interruptions(sorted_uts, &self.interruption),
        }
    }

    /// Find related pairs and count them per participant pair
    pub fn compute_utterance_pairwise_relations(
        &self,
        kind: RelationKind,
        sorted_uts: &[Utterance],
    ) -> RelationReport {
        let related = self.find(kind, sorted_uts);
        let counts = count_relations(&related, |ut| ut.participant_id().to_string());

        debug!(
            "{}: {} related pairs between {} participant pairs",
            kind,
            related.len(),
            counts.len()
        );

        RelationReport {
            kind,
            edges: counts.into_edges(),
            events: related.iter().map(|pair| pair.cloned()).collect(),
        }
    }
}

/// Find who affirmed whom in start-sorted utterances
pub fn find_affirmations<'a>(
    sorted_uts: &'a [Utterance],
    thresholds: &AffirmationThresholds,
) -> Vec<RelationPair<&'a Utterance>> {
    find_related_pruned(
        sorted_uts,
        |earlier, later| thresholds.is_affirmation(earlier, later),
        is_possibly_overlapping,
    )
}

/// Find who interrupted whom in start-sorted utterances
pub fn find_interruptions<'a>(
    sorted_uts: &'a [Utterance],
    thresholds: &InterruptionThresholds,
) -> Vec<RelationPair<&'a Utterance>> {
    find_related_pruned(
        sorted_uts,
        |earlier, later| thresholds.is_interruption(earlier, later),
        is_possibly_overlapping,
    )
}
