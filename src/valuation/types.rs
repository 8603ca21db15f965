use serde::{Deserialize, Serialize};

use crate::error::{EngineError, InputErrors, ReasonCode};

/// The company facts that move the multiple.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CompanyProfile {
    pub industry_category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_subcategory: Option<String>,
    /// Filled from the statement when the profile is evaluated with one
    #[serde(default)]
    pub annual_revenue: f64,
    /// Filled from normalized earnings when evaluated with a statement
    #[serde(default)]
    pub ebitda: f64,
    pub recurring_revenue_pct: f64,
    pub customer_concentration_pct: f64,
    #[serde(default)]
    pub years_in_business: u32,
    pub growth_rate_pct: f64,
}

impl CompanyProfile {
    /// Check ranges, returning every problem at once.
    pub fn validate(&self) -> Result<(), EngineError> {
        let mut errors = InputErrors::new();
        if self.industry_category.trim().is_empty() {
            errors.push("industry_category: must not be empty");
        }
        errors.non_negative("annual_revenue", self.annual_revenue);
        errors.finite("ebitda", self.ebitda);
        errors.percentage("recurring_revenue_pct", self.recurring_revenue_pct);
        errors.percentage("customer_concentration_pct", self.customer_concentration_pct);
        errors.finite("growth_rate_pct", self.growth_rate_pct);
        errors.finish()
    }
}

/// Per-factor contributions, each in units of the band width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentFactors {
    /// 0..=1
    pub recurring: f64,
    /// -1..=0
    pub concentration: f64,
    /// -1..=1
    pub growth: f64,
}

impl AdjustmentFactors {
    pub fn total(&self) -> f64 {
        self.recurring + self.concentration + self.growth
    }
}

/// Benchmark valuation range from the band alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparableRange {
    pub low: f64,
    pub median: f64,
    pub high: f64,
}

/// Traffic-light colour for a health label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Red,
    Yellow,
    Green,
}

/// Where the adjusted multiple sits inside its band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValuationHealth {
    BelowMarket,
    MarketRate,
    Premium,
}

impl ValuationHealth {
    pub fn signal(&self) -> Signal {
        match self {
            Self::BelowMarket => Signal::Red,
            Self::MarketRate => Signal::Yellow,
            Self::Premium => Signal::Green,
        }
    }
}

impl std::fmt::Display for ValuationHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BelowMarket => write!(f, "Below Market"),
            Self::MarketRate => write!(f, "Market Rate"),
            Self::Premium => write!(f, "Premium"),
        }
    }
}

/// Which band a valuation was computed against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandRef {
    pub category: String,
    pub subcategory: Option<String>,
    pub size_band: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub enterprise_value: f64,
    pub base_multiple: f64,
    pub high_multiple: f64,
    pub adjusted_multiple: f64,
    pub adjustment_factors: AdjustmentFactors,
    pub comparable_range: ComparableRange,
    pub health: ValuationHealth,
    /// Position of the adjusted multiple in its band, 0..=1
    pub position: f64,
    /// True when the raw multiple fell outside the band and was pulled back
    pub clamped: bool,
    pub band: BandRef,
}

/// A valuation, or the reason one could not be produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValuationOutcome {
    Available(ValuationResult),
    Unavailable { reason: ReasonCode, detail: String },
}

impl ValuationOutcome {
    pub fn result(&self) -> Option<&ValuationResult> {
        match self {
            ValuationOutcome::Available(result) => Some(result),
            ValuationOutcome::Unavailable { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<ReasonCode> {
        match self {
            ValuationOutcome::Available(_) => None,
            ValuationOutcome::Unavailable { reason, .. } => Some(*reason),
        }
    }

    pub fn is_available(&self) -> bool {
        self.result().is_some()
    }

    pub fn enterprise_value(&self) -> Option<f64> {
        self.result().map(|r| r.enterprise_value)
    }
}
