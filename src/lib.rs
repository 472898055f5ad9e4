pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod relations;
pub mod stats;

pub use analysis::{
    compute_distributions, execute_analysis, AnalysisReport, Distributions, MeetingRelations,
};
pub use config::AnalysisConfig;
pub use error::{MetricsError, Result};
pub use io::{format_distributions, parse_utterance_file, parse_utterance_json, HumanReport};
pub use models::{
    BoundaryMode, Bucket, Histogram, MeetingUtterances, ParticipantId, RelationCounts,
    RelationEdge, RelationPair, UpperBound, Utterance, MAX_TIMESTAMP_MS,
};
pub use relations::{
    count_relations, find_affirmations, find_interruptions, find_related, find_related_checked,
    find_related_pruned, try_find_related, try_find_related_pruned, AffirmationThresholds,
    InterruptionThresholds, RelationCatalog, RelationKind, RelationReport,
};
pub use stats::{
    bucket_values, meeting_stats, merge_participant_utterances, merge_utterances, BucketSet,
    LongestMeeting, MeetingStats, SlotBucketer,
};
