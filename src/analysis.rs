use serde::Serialize;
use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::models::{Histogram, MeetingUtterances};
use crate::relations::{RelationKind, RelationReport};
use crate::stats::{
    duration_histogram, gap_histogram, meeting_length_distribution, meeting_lengths_min,
    meeting_stats, merge_participant_utterances, zero_length_distribution, MeetingStats,
};

/// Affirmations and interruptions found in one meeting
#[derive(Debug, Clone, Serialize)]
pub struct MeetingRelations {
    pub meeting_id: String,
    pub participant_count: usize,
    /// Utterances compared, after merging if enabled
    pub utterance_count: usize,
    pub affirmations: RelationReport,
    pub interruptions: RelationReport,
}

/// Histograms and meeting counts over every meeting in the batch
#[derive(Debug, Clone, Serialize)]
pub struct Distributions {
    pub meeting_stats: MeetingStats,
    pub utterance_durations_ms: Histogram,
    pub utterance_gaps_ms: Histogram,
    /// Zero-length utterance counts per equal part of the meeting
    pub zero_length_by_meeting_part: Vec<u64>,
    pub meeting_lengths_min: Histogram,
}

/// Everything derived from one batch of meetings
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// RFC 3339 time the report was produced
    pub generated_at: String,
    pub config: AnalysisConfig,
    pub meetings: Vec<MeetingRelations>,
    pub distributions: Distributions,
}

/// Find affirmations and interruptions in one meeting
pub fn analyze_meeting_relations(
    meeting: &MeetingUtterances,
    config: &AnalysisConfig,
) -> Result<MeetingRelations> {
    let merged;
    let meeting = match config.merge_gap_ms {
        Some(gap) => {
            merged = merge_participant_utterances(meeting, gap)?;
            &merged
        }
        None => meeting,
    };

    let sorted_uts = meeting.sorted_utterances();
    let catalog = &config.relations;

    Ok(MeetingRelations {
        meeting_id: meeting.meeting_id.clone(),
        participant_count: meeting.participant_count(),
        utterance_count: sorted_uts.len(),
        affirmations: catalog
            .compute_utterance_pairwise_relations(RelationKind::Affirmation, &sorted_uts),
        interruptions: catalog
            .compute_utterance_pairwise_relations(RelationKind::Interruption, &sorted_uts),
    })
}

/// Build the batch histograms
pub fn compute_distributions(
    meetings: &[MeetingUtterances],
    config: &AnalysisConfig,
) -> Result<Distributions> {
    Ok(Distributions {
        meeting_stats: meeting_stats(meetings),
        utterance_durations_ms: duration_histogram(meetings)?.histogram(),
        utterance_gaps_ms: gap_histogram(meetings)?.histogram(),
        zero_length_by_meeting_part: zero_length_distribution(
            meetings,
            config.zero_length_slots,
            config.min_meeting_duration_ms,
        )?,
        meeting_lengths_min: meeting_length_distribution(&meeting_lengths_min(meetings))?
            .histogram(),
    })
}

/// Analyze a batch of meetings: relations per meeting and batch histograms
pub fn execute_analysis(
    meetings: &[MeetingUtterances],
    config: &AnalysisConfig,
) -> Result<AnalysisReport> {
    info!("Analyzing {} meetings", meetings.len());

    let mut meeting_relations = Vec::with_capacity(meetings.len());
    for meeting in meetings {
        if meeting.utterance_count() == 0 {
            warn!("Meeting {} has no utterances, skipping", meeting.meeting_id);
            continue;
        }
        let relations = analyze_meeting_relations(meeting, config)?;
        info!(
            "Meeting {}: {} affirmations, {} interruptions",
            relations.meeting_id,
            relations.affirmations.events.len(),
            relations.interruptions.events.len()
        );
        meeting_relations.push(relations);
    }

    let distributions = compute_distributions(meetings, config)?;

    Ok(AnalysisReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        config: config.clone(),
        meetings: meeting_relations,
        distributions,
    })
}
