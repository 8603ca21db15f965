use serde::{Deserialize, Serialize};

use super::bands::IndustryMultipleBand;
use super::types::{AdjustmentFactors, CompanyProfile};

/// Calibration constants for the multiple adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Calibration {
    /// Growth rate (%) that earns no adjustment
    #[serde(default = "default_neutral_growth")]
    pub neutral_growth_pct: f64,
    /// Growth points away from neutral that reach a full +/-1 adjustment
    #[serde(default = "default_growth_scale")]
    pub growth_scale_pct: f64,
    /// Customer concentration (%) above which the penalty starts
    #[serde(default = "default_concentration_threshold")]
    pub concentration_threshold_pct: f64,
}

fn default_neutral_growth() -> f64 {
    10.0
}

fn default_growth_scale() -> f64 {
    20.0
}

fn default_concentration_threshold() -> f64 {
    20.0
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            neutral_growth_pct: default_neutral_growth(),
            growth_scale_pct: default_growth_scale(),
            concentration_threshold_pct: default_concentration_threshold(),
        }
    }
}

impl Calibration {
    pub fn recurring_adjustment(&self, recurring_pct: f64) -> f64 {
        (recurring_pct / 100.0).clamp(0.0, 1.0)
    }

    /// Zero up to the threshold, then linear down to -1 at 100%.
    pub fn concentration_adjustment(&self, concentration_pct: f64) -> f64 {
        let threshold = self.concentration_threshold_pct;
        if concentration_pct <= threshold {
            return 0.0;
        }
        let span = 100.0 - threshold;
        if span <= 0.0 {
            return -1.0;
        }
        (-(concentration_pct - threshold) / span).clamp(-1.0, 0.0)
    }

    pub fn growth_adjustment(&self, growth_pct: f64) -> f64 {
        ((growth_pct - self.neutral_growth_pct) / self.growth_scale_pct).clamp(-1.0, 1.0)
    }

    pub fn factors(&self, profile: &CompanyProfile) -> AdjustmentFactors {
        AdjustmentFactors {
            recurring: self.recurring_adjustment(profile.recurring_revenue_pct),
            concentration: self.concentration_adjustment(profile.customer_concentration_pct),
            growth: self.growth_adjustment(profile.growth_rate_pct),
        }
    }
}

/// Adjusted multiple before and after clamping into the band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustedMultiple {
    pub raw: f64,
    pub value: f64,
}

impl AdjustedMultiple {
    pub fn clamped(&self) -> bool {
        self.raw != self.value
    }
}

/// Move the base multiple by the factor total, in band widths, never leaving
/// `[base_multiple, high_multiple]`.
///
/// Callers must pass a band with finite `base_multiple <= high_multiple`.
pub fn adjust_multiple(
    band: &IndustryMultipleBand,
    factors: &AdjustmentFactors,
) -> AdjustedMultiple {
    let width = band.high_multiple - band.base_multiple;
    let raw = band.base_multiple + factors.total() * width;
    let value = raw.clamp(band.base_multiple, band.high_multiple);
    if raw != value {
        tracing::trace!(raw, value, "adjusted multiple clamped into band");
    }
    AdjustedMultiple { raw, value }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(base: f64, high: f64) -> IndustryMultipleBand {
        IndustryMultipleBand {
            category: "Services".to_string(),
            subcategory: None,
            size_band: "Lower middle market".to_string(),
            min_ebitda: 500_000.0,
            max_ebitda: 2_000_000.0,
            base_multiple: base,
            high_multiple: high,
            typical_margin: 0.18,
        }
    }

    #[test]
    fn test_recurring_adjustment_range() {
        let cal = Calibration::default();
        assert_eq!(cal.recurring_adjustment(0.0), 0.0);
        assert_eq!(cal.recurring_adjustment(80.0), 0.8);
        assert_eq!(cal.recurring_adjustment(100.0), 1.0);
    }

    #[test]
    fn test_concentration_below_threshold_no_penalty() {
        let cal = Calibration::default();
        assert_eq!(cal.concentration_adjustment(0.0), 0.0);
        assert_eq!(cal.concentration_adjustment(15.0), 0.0);
        assert_eq!(cal.concentration_adjustment(20.0), 0.0);
    }

    #[test]
    fn test_concentration_penalty_linear() {
        let cal = Calibration::default();
        assert_eq!(cal.concentration_adjustment(45.0), -0.3125);
        assert_eq!(cal.concentration_adjustment(60.0), -0.5);
        assert_eq!(cal.concentration_adjustment(100.0), -1.0);
    }

    #[test]
    fn test_growth_adjustment_clamped() {
        let cal = Calibration::default();
        assert_eq!(cal.growth_adjustment(10.0), 0.0);
        assert!((cal.growth_adjustment(12.0) - 0.1).abs() < 1e-12);
        assert_eq!(cal.growth_adjustment(30.0), 1.0);
        assert_eq!(cal.growth_adjustment(500.0), 1.0);
        assert_eq!(cal.growth_adjustment(-10.0), -1.0);
        assert_eq!(cal.growth_adjustment(-80.0), -1.0);
    }

    #[test]
    fn test_adjust_multiple_within_band() {
        let factors = AdjustmentFactors {
            recurring: 0.4,
            concentration: 0.0,
            growth: 0.0,
        };
        let adjusted = adjust_multiple(&band(4.0, 6.5), &factors);
        assert!((adjusted.value - 5.0).abs() < 1e-12);
        assert!(!adjusted.clamped());
    }

    #[test]
    fn test_adjust_multiple_clamps_high_and_low() {
        let b = band(4.0, 6.5);
        let high = adjust_multiple(
            &b,
            &AdjustmentFactors {
                recurring: 1.0,
                concentration: 0.0,
                growth: 1.0,
            },
        );
        assert_eq!(high.value, 6.5);
        assert!(high.clamped());

        let low = adjust_multiple(
            &b,
            &AdjustmentFactors {
                recurring: 0.0,
                concentration: -1.0,
                growth: -1.0,
            },
        );
        assert_eq!(low.value, 4.0);
        assert!(low.clamped());
    }

    #[test]
    fn test_custom_calibration_parse() {
        let yaml = "neutral_growth_pct: 5\n";
        let cal: Calibration = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(cal.neutral_growth_pct, 5.0);
        assert_eq!(cal.growth_scale_pct, 20.0);
        assert_eq!(cal.concentration_threshold_pct, 20.0);
    }
}
