use std::cmp::Ordering;

use crate::error::{MetricsError, Result};
use crate::models::{BoundaryMode, Bucket, Histogram, UpperBound};

/// Histogram over ordered boundaries with a trailing overflow bucket.
///
/// Bucket `i` holds values fitting under `boundaries[i]` (per the
/// [`BoundaryMode`]) that did not fit under any earlier boundary; the last
/// bucket holds everything else.
#[derive(Debug, Clone)]
pub struct BucketSet {
    boundaries: Vec<f64>,
    counts: Vec<u64>,
    mode: BoundaryMode,
}

impl BucketSet {
    /// Boundaries must be strictly ascending
    pub fn new(boundaries: impl Into<Vec<f64>>, mode: BoundaryMode) -> Result<Self> {
        let boundaries = boundaries.into();
        let unordered = boundaries
            .windows(2)
            .position(|w| w[0].partial_cmp(&w[1]) != Some(Ordering::Less));
        if let Some(index) = unordered {
            return Err(MetricsError::UnorderedBoundaries { index: index + 1 });
        }
        let counts = vec![0; boundaries.len() + 1];
        Ok(Self {
            boundaries,
            counts,
            mode,
        })
    }

    /// Count a value, returning the index of the bucket it landed in
    pub fn add(&mut self, value: f64) -> usize {
        let index = self
            .boundaries
            .iter()
            .position(|&b| self.mode.fits(value, b))
            .unwrap_or(self.boundaries.len());
        self.counts[index] += 1;
        index
    }

    pub fn add_all(&mut self, values: impl IntoIterator<Item = f64>) {
        for value in values {
            self.add(value);
        }
    }

    /// Counts per bucket, overflow last
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn mode(&self) -> BoundaryMode {
        self.mode
    }

    /// Number of values counted
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Buckets paired with their upper bounds
    pub fn buckets(&self) -> Vec<Bucket> {
        self.boundaries
            .iter()
            .map(|&b| UpperBound::Value(b))
            .chain(std::iter::once(UpperBound::Unbounded))
            .zip(self.counts.iter())
            .map(|(upper_bound, &count)| Bucket { upper_bound, count })
            .collect()
    }

    /// Snapshot of the buckets together with the boundary mode
    pub fn histogram(&self) -> Histogram {
        Histogram {
            mode: self.mode(),
            buckets: self.buckets(),
        }
    }
}

/// Count `values` into buckets; the result has one more entry than
/// `boundaries` for values above every boundary.
pub fn bucket_values(values: &[f64], boundaries: &[f64], mode: BoundaryMode) -> Result<Vec<u64>> {
    let mut buckets = BucketSet::new(boundaries, mode)?;
    buckets.add_all(values.iter().copied());
    Ok(buckets.counts)
}

/// Fixed-width slots starting at `floor`: a value goes to slot
/// `(value - floor) / width`.
///
/// The width is kept as a fraction so a span can be split into equal parts
/// without rounding.
#[derive(Debug, Clone)]
pub struct SlotBucketer {
    floor: i64,
    width_num: i128,
    width_den: i128,
    counts: Vec<u64>,
}

impl SlotBucketer {
    pub fn new(floor: i64, width: i64, slots: usize) -> Result<Self> {
        if width <= 0 {
            return Err(MetricsError::InvalidSlotWidth { width });
        }
        Ok(Self {
            floor,
            width_num: i128::from(width),
            width_den: 1,
            counts: vec![0; slots],
        })
    }

    /// Split `span_ms` from `floor` into `slots` parts, each 1ms wider than
    /// `span_ms / slots` so a value at `floor + span_ms` lands in the last slot.
    pub fn spanning(floor: i64, span_ms: i64, slots: usize) -> Result<Self> {
        if slots == 0 {
            return Err(MetricsError::NoSlots);
        }
        if span_ms < 0 {
            return Err(MetricsError::InvalidSlotWidth { width: span_ms });
        }
        let slots_wide = slots as i128;
        Ok(Self {
            floor,
            width_num: i128::from(span_ms) + slots_wide,
            width_den: slots_wide,
            counts: vec![0; slots],
        })
    }

    /// Count a value; `None` when it falls before the floor or past the last slot
    pub fn add(&mut self, value: i64) -> Option<usize> {
        if value < self.floor {
            return None;
        }
        let offset = i128::from(value) - i128::from(self.floor);
        let index = usize::try_from(offset * self.width_den / self.width_num).ok()?;
        let count = self.counts.get_mut(index)?;
        *count += 1;
        Some(index)
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn into_counts(self) -> Vec<u64> {
        self.counts
    }
}
