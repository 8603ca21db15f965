//! Valuation and exit-readiness scoring.
//!
//! The engine turns a financial statement and company profile into normalized
//! earnings and a band-bounded valuation, scores a readiness questionnaire,
//! recommends an exit path from goal answers and re-runs the numbers under
//! hypothetical deltas. All of it is pure computation over explicit inputs;
//! [`Engine`] is the entry point.

pub mod case;
pub mod config;
pub mod engine;
pub mod error;
pub mod financials;
pub mod output;
pub mod path;
pub mod readiness;
pub mod scenario;
pub mod valuation;

pub use case::{load_case, CompanyCase, ExitReport, ReadinessInput};
pub use engine::{Engine, Evaluation};
pub use error::{EngineError, ReasonCode};
