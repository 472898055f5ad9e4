use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{MetricsError, Result};

/// Identifier of a meeting participant
pub type ParticipantId = String;

/// Largest accepted timestamp magnitude. Differences between any two
/// accepted timestamps, plus a small offset, stay within `i64`.
pub const MAX_TIMESTAMP_MS: i64 = i64::MAX / 4;

/// A period of speaking by one participant during a meeting.
///
/// Times are milliseconds from the start of the meeting, so they are only
/// comparable with other utterances of the same meeting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Utterance {
    participant_id: ParticipantId,
    start_ms: i64,
    end_ms: i64,
}

impl Utterance {
    /// Create an utterance, rejecting an end before the start and timestamps
    /// beyond [`MAX_TIMESTAMP_MS`]
    pub fn new(participant_id: impl Into<ParticipantId>, start_ms: i64, end_ms: i64) -> Result<Self> {
        for value in [start_ms, end_ms] {
            if !(-MAX_TIMESTAMP_MS..=MAX_TIMESTAMP_MS).contains(&value) {
                return Err(MetricsError::TimestampOutOfRange {
                    value,
                    limit: MAX_TIMESTAMP_MS,
                });
            }
        }
        if end_ms < start_ms {
            return Err(MetricsError::InvalidInterval { start_ms, end_ms });
        }
        Ok(Self {
            participant_id: participant_id.into(),
            start_ms,
            end_ms,
        })
    }

    /// Id of the participant who spoke
    pub fn participant_id(&self) -> &str {
        &self.participant_id
    }

    /// Start offset in milliseconds
    pub fn start_ms(&self) -> i64 {
        self.start_ms
    }

    /// End offset in milliseconds
    pub fn end_ms(&self) -> i64 {
        self.end_ms
    }

    /// Duration of this utterance in milliseconds
    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }

    /// A copy of this utterance ending at `end_ms`, never earlier than it already ends
    pub(crate) fn extended_to(&self, end_ms: i64) -> Self {
        Self {
            participant_id: self.participant_id.clone(),
            start_ms: self.start_ms,
            end_ms: self.end_ms.max(end_ms),
        }
    }
}

/// All utterances of one meeting, grouped by participant
#[derive(Debug, Clone, Default, Serialize)]
pub struct MeetingUtterances {
    /// Meeting identifier
    pub meeting_id: String,
    /// Utterances per participant, in the order they were supplied
    pub participant_uts: BTreeMap<ParticipantId, Vec<Utterance>>,
}

impl MeetingUtterances {
    pub fn new(meeting_id: impl Into<String>) -> Self {
        Self {
            meeting_id: meeting_id.into(),
            participant_uts: BTreeMap::new(),
        }
    }

    /// Group a flat list of utterances by participant
    pub fn from_utterances(
        meeting_id: impl Into<String>,
        utterances: impl IntoIterator<Item = Utterance>,
    ) -> Self {
        let mut meeting = Self::new(meeting_id);
        for ut in utterances {
            meeting.push(ut);
        }
        meeting
    }

    /// Add an utterance to its participant's list
    pub fn push(&mut self, utterance: Utterance) {
        self.participant_uts
            .entry(utterance.participant_id.clone())
            .or_default()
            .push(utterance);
    }

    /// Number of participants with at least one utterance entry
    pub fn participant_count(&self) -> usize {
        self.participant_uts.len()
    }

    /// Total number of utterances across participants
    pub fn utterance_count(&self) -> usize {
        self.participant_uts.values().map(Vec::len).sum()
    }

    /// Iterate every utterance, participant by participant
    pub fn utterances(&self) -> impl Iterator<Item = &Utterance> {
        self.participant_uts.values().flatten()
    }

    /// All utterances merged into one sequence ordered by start.
    ///
    /// Ties keep participant order, then each participant's insertion order.
    pub fn sorted_utterances(&self) -> Vec<Utterance> {
        let mut all: Vec<Utterance> = self.utterances().cloned().collect();
        all.sort_by_key(|ut| ut.start_ms);
        all
    }

    /// Earliest start and latest end over all utterances
    pub fn span(&self) -> Option<(i64, i64)> {
        let start = self.utterances().map(|ut| ut.start_ms).min()?;
        let end = self.utterances().map(|ut| ut.end_ms).max()?;
        Some((start, end))
    }

    /// Meeting duration derived from its utterances
    pub fn duration_ms(&self) -> i64 {
        self.span().map(|(start, end)| end - start).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ut(p: &str, start: i64, end: i64) -> Utterance {
        Utterance::new(p, start, end).unwrap()
    }

    #[test]
    fn test_utterance_rejects_end_before_start() {
        let err = Utterance::new("a", 500, 400).unwrap_err();
        assert_eq!(err, MetricsError::InvalidInterval { start_ms: 500, end_ms: 400 });

        // zero length is allowed
        let zero = ut("a", 500, 500);
        assert_eq!(zero.duration_ms(), 0);
    }

    #[test]
    fn test_utterance_rejects_extreme_timestamps() {
        let err = Utterance::new("a", i64::MIN, i64::MAX).unwrap_err();
        assert_eq!(
            err,
            MetricsError::TimestampOutOfRange { value: i64::MIN, limit: MAX_TIMESTAMP_MS }
        );
        assert!(Utterance::new("a", 0, MAX_TIMESTAMP_MS + 1).is_err());

        // the widest accepted utterance still has a representable duration
        let widest = ut("a", -MAX_TIMESTAMP_MS, MAX_TIMESTAMP_MS);
        assert_eq!(widest.duration_ms(), 2 * MAX_TIMESTAMP_MS);
    }

    #[test]
    fn test_extended_to_never_shrinks() {
        let u = ut("a", 0, 300);
        assert_eq!(u.extended_to(500).end_ms(), 500);
        assert_eq!(u.extended_to(100).end_ms(), 300);
        assert_eq!(u.end_ms(), 300);
    }

    #[test]
    fn test_sorted_utterances_across_participants() {
        let meeting = MeetingUtterances::from_utterances(
            "m1",
            vec![ut("b", 100, 200), ut("a", 300, 400), ut("a", 0, 50), ut("b", 300, 350)],
        );

        assert_eq!(meeting.participant_count(), 2);
        assert_eq!(meeting.utterance_count(), 4);

        let sorted = meeting.sorted_utterances();
        let starts: Vec<i64> = sorted.iter().map(|u| u.start_ms()).collect();
        assert_eq!(starts, vec![0, 100, 300, 300]);
        // tie at 300 keeps participant order
        assert_eq!(sorted[2].participant_id(), "a");
        assert_eq!(sorted[3].participant_id(), "b");
    }

    #[test]
    fn test_span() {
        let meeting = MeetingUtterances::from_utterances(
            "m1",
            vec![ut("a", 1_000, 9_000), ut("b", 500, 2_000)],
        );
        assert_eq!(meeting.span(), Some((500, 9_000)));
        assert_eq!(meeting.duration_ms(), 8_500);

        let empty = MeetingUtterances::new("m2");
        assert_eq!(empty.span(), None);
        assert_eq!(empty.duration_ms(), 0);
    }
}
