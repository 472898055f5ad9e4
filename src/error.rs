/// Errors raised by the metrics core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricsError {
    #[error("cannot merge an empty utterance list")]
    EmptyInput,

    #[error("invalid interval: end {end_ms}ms is before start {start_ms}ms")]
    InvalidInterval { start_ms: i64, end_ms: i64 },

    #[error("timestamp {value}ms is outside the supported range of +/-{limit}ms")]
    TimestampOutOfRange { value: i64, limit: i64 },

    #[error("bucket boundaries must be strictly ascending (index {index})")]
    UnorderedBoundaries { index: usize },

    #[error("slot width must be positive, got {width}")]
    InvalidSlotWidth { width: i64 },

    #[error("at least one slot is required")]
    NoSlots,

    #[error("pruned sweep found {pruned} pairs but exhaustive sweep found {exhaustive}")]
    PruningMismatch { pruned: usize, exhaustive: usize },
}

pub type Result<T> = std::result::Result<T, MetricsError>;
