use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::models::{BoundaryMode, MeetingUtterances};

use super::buckets::{BucketSet, SlotBucketer};

/// Upper bounds (minutes) used to group meetings by length
pub const MEETING_LENGTH_BUCKETS_MIN: [f64; 8] = [5.0, 10.0, 20.0, 40.0, 60.0, 120.0, 180.0, 720.0];

/// Width (ms) of the utterance gap histogram bins, up to [`GAP_HISTOGRAM_MAX_MS`]
pub const GAP_HISTOGRAM_BIN_MS: i64 = 80;
pub const GAP_HISTOGRAM_MAX_MS: i64 = 4_000;

/// Upper bounds (ms) of the utterance duration histogram.
///
/// Fine-grained for short utterances, coarser as they get longer.
pub fn duration_buckets_ms() -> Vec<f64> {
    [0, 2, 5]
        .into_iter()
        .chain((10..300).step_by(10))
        .chain((300..3_500).step_by(50))
        .chain((3_500..=8_000).step_by(500))
        .chain((10_000..=60_000).step_by(10_000))
        .map(|ms| ms as f64)
        .collect()
}

/// Upper bounds (ms) of the utterance gap histogram
pub fn gap_buckets_ms() -> Vec<f64> {
    (1..=GAP_HISTOGRAM_MAX_MS / GAP_HISTOGRAM_BIN_MS)
        .map(|i| (i * GAP_HISTOGRAM_BIN_MS) as f64)
        .collect()
}

/// Duration of every utterance in every meeting
pub fn utterance_durations(meetings: &[MeetingUtterances]) -> Vec<i64> {
    meetings
        .iter()
        .flat_map(|m| m.utterances())
        .map(|ut| ut.duration_ms())
        .collect()
}

/// Histogram of utterance durations; a duration lands in the first bucket it
/// does not exceed.
pub fn duration_histogram(meetings: &[MeetingUtterances]) -> Result<BucketSet> {
    let mut buckets = BucketSet::new(duration_buckets_ms(), BoundaryMode::Inclusive)?;
    buckets.add_all(utterance_durations(meetings).into_iter().map(|d| d as f64));
    Ok(buckets)
}

/// Silences between consecutive utterances of the same participant.
///
/// Only meetings with at least two participants are considered, and
/// zero-length utterances are ignored.
pub fn utterance_gaps(meetings: &[MeetingUtterances]) -> Vec<i64> {
    let mut gaps = Vec::new();
    let mut processed_meetings = 0usize;
    let mut speaking_participants = 0usize;

    for meeting in meetings.iter().filter(|m| m.participant_count() >= 2) {
        processed_meetings += 1;

        for uts in meeting.participant_uts.values() {
            let mut uts: Vec<_> = uts.iter().filter(|ut| ut.duration_ms() != 0).collect();
            uts.sort_by_key(|ut| ut.start_ms());

            if uts.len() < 2 {
                continue;
            }
            speaking_participants += 1;

            gaps.extend(uts.windows(2).map(|w| w[1].start_ms() - w[0].end_ms()));
        }
    }

    debug!(
        "Processed {} participants in {} meetings: {} gaps",
        speaking_participants,
        processed_meetings,
        gaps.len()
    );

    gaps
}

/// Histogram of same-participant gaps in [`GAP_HISTOGRAM_BIN_MS`] bins.
///
/// Negative gaps (a participant overlapping themself) are not counted.
pub fn gap_histogram(meetings: &[MeetingUtterances]) -> Result<BucketSet> {
    let mut buckets = BucketSet::new(gap_buckets_ms(), BoundaryMode::Exclusive)?;
    buckets.add_all(
        utterance_gaps(meetings)
            .into_iter()
            .filter(|&g| g >= 0)
            .map(|g| g as f64),
    );
    Ok(buckets)
}

/// Where zero-length utterances fall within their meetings.
///
/// Each meeting is split into `slots` equal parts of its duration (each 1ms
/// wider than an exact split, so an utterance at the very end still counts)
/// and every zero-length utterance is counted in the part it starts in;
/// counts are summed over meetings. Meetings shorter than `min_meeting_ms`
/// are skipped.
pub fn zero_length_distribution(
    meetings: &[MeetingUtterances],
    slots: usize,
    min_meeting_ms: i64,
) -> Result<Vec<u64>> {
    let mut distribution = vec![0u64; slots];
    if slots == 0 {
        return Ok(distribution);
    }

    for meeting in meetings {
        let Some((meeting_start, meeting_end)) = meeting.span() else {
            continue;
        };
        let meeting_duration = meeting_end - meeting_start;
        if meeting_duration < min_meeting_ms {
            debug!(
                "Skipping meeting {} ({}ms shorter than {}ms)",
                meeting.meeting_id, meeting_duration, min_meeting_ms
            );
            continue;
        }

        let mut slotted = SlotBucketer::spanning(meeting_start, meeting_duration, slots)?;
        for ut in meeting.utterances().filter(|ut| ut.duration_ms() == 0) {
            slotted.add(ut.start_ms());
        }

        for (total, count) in distribution.iter_mut().zip(slotted.into_counts()) {
            *total += count;
        }
    }

    Ok(distribution)
}

/// Length in minutes of each meeting with more than one participant
pub fn meeting_lengths_min(meetings: &[MeetingUtterances]) -> Vec<f64> {
    meetings
        .iter()
        .filter(|m| m.participant_count() > 1)
        .map(|m| m.duration_ms() as f64 / 60_000.0)
        .collect()
}

/// Group meeting lengths (minutes) into [`MEETING_LENGTH_BUCKETS_MIN`]; a
/// length lands in the first bucket it is strictly below.
pub fn meeting_length_distribution(lengths_min: &[f64]) -> Result<BucketSet> {
    let mut buckets = BucketSet::new(MEETING_LENGTH_BUCKETS_MIN, BoundaryMode::Exclusive)?;
    buckets.add_all(lengths_min.iter().copied());
    Ok(buckets)
}

/// The longest meeting with more than one participant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongestMeeting {
    pub meeting_id: String,
    pub length_min: f64,
    pub num_participants: usize,
}

/// Batch-level meeting counts
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeetingStats {
    pub total_meetings: usize,
    /// Meetings with more than one participant
    pub real_meetings: usize,
    /// Average length of real meetings, 0 when there are none
    pub avg_meeting_length_min: f64,
    /// Unique participants across real meetings
    pub total_num_participants: usize,
    /// Number of meetings per participant count, over all meetings
    pub count_by_participants: BTreeMap<usize, usize>,
    pub longest_meeting: Option<LongestMeeting>,
}

/// Summarize the meetings of a batch
pub fn meeting_stats(meetings: &[MeetingUtterances]) -> MeetingStats {
    let mut stats = MeetingStats {
        total_meetings: meetings.len(),
        ..Default::default()
    };

    for meeting in meetings {
        *stats
            .count_by_participants
            .entry(meeting.participant_count())
            .or_insert(0) += 1;
    }

    let real: Vec<&MeetingUtterances> = meetings
        .iter()
        .filter(|m| m.participant_count() > 1)
        .collect();
    if real.is_empty() {
        return stats;
    }
    stats.real_meetings = real.len();

    let lengths = meeting_lengths_min(meetings);
    stats.avg_meeting_length_min = lengths.iter().sum::<f64>() / lengths.len() as f64;

    let participants: BTreeSet<&str> = real
        .iter()
        .flat_map(|m| m.participant_uts.keys().map(String::as_str))
        .collect();
    stats.total_num_participants = participants.len();

    // first meeting wins a tie
    let mut longest: Option<(&MeetingUtterances, f64)> = None;
    for (&meeting, length) in real.iter().zip(lengths) {
        if longest.is_none_or(|(_, best)| length > best) {
            longest = Some((meeting, length));
        }
    }
    stats.longest_meeting = longest.map(|(meeting, length_min)| LongestMeeting {
        meeting_id: meeting.meeting_id.clone(),
        length_min,
        num_participants: meeting.participant_count(),
    });

    debug!(
        "{} meetings, {} with more than one participant",
        stats.total_meetings, stats.real_meetings
    );

    stats
}
