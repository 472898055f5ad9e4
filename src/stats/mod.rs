pub mod buckets;
pub mod distributions;
pub mod merge;

pub use buckets::*;
pub use distributions::*;
pub use merge::*;
