pub mod delta;
pub mod simulate;

pub use delta::{NamedDelta, ScenarioDelta, SCENARIO_ADDBACK_LABEL};
pub use simulate::{simulate, simulate_many, Change, ScenarioResult};
