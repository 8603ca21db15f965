use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors the engine can return to its caller.
///
/// Only malformed input is an error. Everything else the engine can run into
/// (no band, a loss, zero revenue, partial answers) degrades to a result carrying a
/// [`ReasonCode`] instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// One message per offending field, all collected before failing.
    #[error("invalid input: {}", .0.join("; "))]
    InvalidInput(Vec<String>),
}

impl EngineError {
    pub fn reason(&self) -> ReasonCode {
        match self {
            EngineError::InvalidInput(_) => ReasonCode::InvalidInput,
        }
    }

    /// Individual field messages.
    pub fn messages(&self) -> &[String] {
        match self {
            EngineError::InvalidInput(errors) => errors,
        }
    }
}

/// Machine-readable reason attached to degraded or failed results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    InvalidInput,
    NoBandFound,
    NegativeEbitda,
    MarginUndefined,
    IncompleteAssessment,
    NoAnswers,
    ZeroBaseline,
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            ReasonCode::InvalidInput => "invalid_input",
            ReasonCode::NoBandFound => "no_band_found",
            ReasonCode::NegativeEbitda => "negative_ebitda",
            ReasonCode::MarginUndefined => "margin_undefined",
            ReasonCode::IncompleteAssessment => "incomplete_assessment",
            ReasonCode::NoAnswers => "no_answers",
            ReasonCode::ZeroBaseline => "zero_baseline",
        };
        write!(f, "{}", code)
    }
}

/// Collects field errors and turns them into a single [`EngineError`].
#[derive(Debug, Default)]
pub(crate) struct InputErrors {
    errors: Vec<String>,
}

impl InputErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Reject negative or non-finite amounts.
    pub fn non_negative(&mut self, field: &str, value: f64) {
        if !value.is_finite() {
            self.push(format!("{}: must be a finite number", field));
        } else if value < 0.0 {
            self.push(format!("{}: must be non-negative (got {})", field, value));
        }
    }

    /// Reject percentages outside [0, 100].
    pub fn percentage(&mut self, field: &str, value: f64) {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            self.push(format!("{}: must be between 0 and 100 (got {})", field, value));
        }
    }

    pub fn finite(&mut self, field: &str, value: f64) {
        if !value.is_finite() {
            self.push(format!("{}: must be a finite number", field));
        }
    }

    pub fn into_messages(self) -> Vec<String> {
        self.errors
    }

    pub fn finish(self) -> Result<(), EngineError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(EngineError::InvalidInput(self.errors))
        }
    }
}
