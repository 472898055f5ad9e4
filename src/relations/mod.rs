pub mod aggregate;
pub mod catalog;
pub mod engine;

pub use aggregate::*;
pub use catalog::*;
pub use engine::*;
