pub mod adjust;
pub mod bands;
pub mod benchmark;
pub mod compute;
pub mod types;

pub use adjust::{adjust_multiple, AdjustedMultiple, Calibration};
pub use bands::{resolve_band, IndustryMultipleBand};
pub use benchmark::{band_position, classify_health, comparable_range};
pub use compute::{compute_valuation, value_company};
pub use types::*;
