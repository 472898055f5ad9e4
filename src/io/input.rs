use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::{MeetingUtterances, Utterance};

/// Batch of meetings as read from disk
#[derive(Debug, Clone, Deserialize)]
pub struct UtteranceBatch {
    pub meetings: Vec<MeetingRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeetingRecord {
    pub meeting_id: String,
    #[serde(default)]
    pub utterances: Vec<UtteranceRecord>,
}

/// A single utterance record, times in ms from the meeting start
#[derive(Debug, Clone, Deserialize)]
pub struct UtteranceRecord {
    pub participant_id: String,
    pub start_ms: i64,
    pub end_ms: i64,
}

/// Parse an utterance batch JSON file
pub fn parse_utterance_file(path: &Path) -> Result<Vec<MeetingUtterances>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_utterance_json(&content)
}

/// Parse an utterance batch JSON string
pub fn parse_utterance_json(json: &str) -> Result<Vec<MeetingUtterances>> {
    let batch: UtteranceBatch =
        serde_json::from_str(json).context("Failed to parse utterance JSON")?;
    batch.meetings.into_iter().map(into_meeting).collect()
}

fn into_meeting(record: MeetingRecord) -> Result<MeetingUtterances> {
    let mut meeting = MeetingUtterances::new(record.meeting_id);
    for (index, ut) in record.utterances.into_iter().enumerate() {
        let utterance = Utterance::new(ut.participant_id, ut.start_ms, ut.end_ms).with_context(|| {
            format!(
                "Invalid utterance {} in meeting {}",
                index, meeting.meeting_id
            )
        })?;
        meeting.push(utterance);
    }
    Ok(meeting)
}
