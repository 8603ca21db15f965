pub mod normalize;
pub mod types;

pub use normalize::{normalize, validate_statement, MarginThresholds};
pub use types::*;
