pub mod bucket;
pub mod relation;
pub mod utterance;

pub use bucket::*;
pub use relation::*;
pub use utterance::*;
