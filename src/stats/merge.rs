use tracing::debug;

use crate::error::{MetricsError, Result};
use crate::models::{MeetingUtterances, Utterance};

/// Merge utterances closer together than `min_gap_ms`.
///
/// Works on a start-sorted copy; `uts` is left untouched. An utterance that
/// starts less than `min_gap_ms` after the current span ends is absorbed into
/// that span. Intended for the utterances of a single participant: a merged
/// span keeps the participant of its first utterance.
pub fn merge_utterances(uts: &[Utterance], min_gap_ms: i64) -> Result<Vec<Utterance>> {
    let mut sorted = uts.to_vec();
    sorted.sort_by_key(|ut| ut.start_ms());

    let mut iter = sorted.into_iter();
    let mut current = iter.next().ok_or(MetricsError::EmptyInput)?;
    let mut merged = Vec::new();

    for ut in iter {
        if ut.start_ms() - current.end_ms() < min_gap_ms {
            current = current.extended_to(ut.end_ms());
        } else {
            merged.push(current);
            current = ut;
        }
    }
    merged.push(current);

    debug!(
        "Merged {} utterances into {} (min gap {}ms)",
        uts.len(),
        merged.len(),
        min_gap_ms
    );

    Ok(merged)
}

/// Merge each participant's utterances separately, dropping participants
/// with none.
pub fn merge_participant_utterances(
    meeting: &MeetingUtterances,
    min_gap_ms: i64,
) -> Result<MeetingUtterances> {
    let mut merged = MeetingUtterances::new(meeting.meeting_id.clone());
    for (participant_id, uts) in &meeting.participant_uts {
        if uts.is_empty() {
            continue;
        }
        merged
            .participant_uts
            .insert(participant_id.clone(), merge_utterances(uts, min_gap_ms)?);
    }
    Ok(merged)
}
