use serde::Serialize;

/// Upper bound of a histogram bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpperBound {
    /// Bucket holds values up to this boundary
    Value(f64),
    /// Overflow bucket for values greater than every boundary
    Unbounded,
}

/// How a value is compared against a bucket boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
    /// A value lands in the first bucket where `value <= boundary`
    #[default]
    Inclusive,
    /// A value lands in the first bucket where `value < boundary`
    Exclusive,
}

impl BoundaryMode {
    /// Whether `value` fits under `boundary`
    pub fn fits(self, value: f64, boundary: f64) -> bool {
        match self {
            BoundaryMode::Inclusive => value <= boundary,
            BoundaryMode::Exclusive => value < boundary,
        }
    }
}

/// One histogram bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub upper_bound: UpperBound,
    pub count: u64,
}

/// Buckets of one histogram, with how values were compared to their bounds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub mode: BoundaryMode,
    pub buckets: Vec<Bucket>,
}

impl Histogram {
    /// Number of values counted
    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }
}
