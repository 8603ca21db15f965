use super::adjust::{adjust_multiple, Calibration};
use super::bands::{resolve_band, IndustryMultipleBand};
use super::benchmark::{band_position, classify_health, comparable_range};
use super::types::{BandRef, CompanyProfile, ValuationOutcome, ValuationResult};
use crate::error::{EngineError, InputErrors, ReasonCode};

pub(crate) fn band_errors(band: &IndustryMultipleBand, prefix: &str, errors: &mut InputErrors) {
    errors.non_negative(&format!("{}.base_multiple", prefix), band.base_multiple);
    errors.non_negative(&format!("{}.high_multiple", prefix), band.high_multiple);
    if band.high_multiple < band.base_multiple {
        errors.push(format!(
            "{}.high_multiple: {} is below base_multiple {}",
            prefix, band.high_multiple, band.base_multiple
        ));
    }
}

pub(crate) fn calibration_errors(calibration: &Calibration, errors: &mut InputErrors) {
    errors.finite("calibration.neutral_growth_pct", calibration.neutral_growth_pct);
    if !calibration.growth_scale_pct.is_finite() || calibration.growth_scale_pct <= 0.0 {
        errors.push("calibration.growth_scale_pct: must be a positive number");
    }
    errors.percentage(
        "calibration.concentration_threshold_pct",
        calibration.concentration_threshold_pct,
    );
}

/// Value a company against an already-resolved band.
///
/// `profile.ebitda` is taken as the adjusted EBITDA and must not be negative.
/// The adjusted multiple is always inside `[base_multiple, high_multiple]`.
pub fn compute_valuation(
    band: &IndustryMultipleBand,
    profile: &CompanyProfile,
    calibration: &Calibration,
) -> Result<ValuationResult, EngineError> {
    let mut errors = InputErrors::new();
    band_errors(band, "band", &mut errors);
    calibration_errors(calibration, &mut errors);
    errors.non_negative("ebitda", profile.ebitda);
    errors.finish()?;
    profile.validate()?;

    let factors = calibration.factors(profile);
    let adjusted = adjust_multiple(band, &factors);
    let enterprise_value = profile.ebitda * adjusted.value;

    tracing::debug!(
        base = band.base_multiple,
        high = band.high_multiple,
        adjusted = adjusted.value,
        enterprise_value,
        "valuation computed"
    );

    Ok(ValuationResult {
        enterprise_value,
        base_multiple: band.base_multiple,
        high_multiple: band.high_multiple,
        adjusted_multiple: adjusted.value,
        adjustment_factors: factors,
        comparable_range: comparable_range(band, profile.ebitda),
        health: classify_health(adjusted.value, band.base_multiple, band.high_multiple),
        position: band_position(adjusted.value, band.base_multiple, band.high_multiple),
        clamped: adjusted.clamped(),
        band: BandRef {
            category: band.category.clone(),
            subcategory: band.subcategory.clone(),
            size_band: band.size_band.clone(),
        },
    })
}

/// Resolve the band for a profile and value it.
///
/// No matching band is not an error; it yields
/// [`ValuationOutcome::Unavailable`] with [`ReasonCode::NoBandFound`].
/// A loss-making profile has no multiple-based value and yields
/// [`ReasonCode::NegativeEbitda`].
pub fn value_company(
    bands: &[IndustryMultipleBand],
    profile: &CompanyProfile,
    calibration: &Calibration,
) -> Result<ValuationOutcome, EngineError> {
    profile.validate()?;

    if profile.ebitda < 0.0 {
        tracing::debug!(ebitda = profile.ebitda, "valuation skipped for negative EBITDA");
        return Ok(ValuationOutcome::Unavailable {
            reason: ReasonCode::NegativeEbitda,
            detail: format!(
                "EBITDA of {} is negative; multiples apply to positive earnings",
                profile.ebitda
            ),
        });
    }

    let band = match resolve_band(
        bands,
        &profile.industry_category,
        profile.industry_subcategory.as_deref(),
        profile.ebitda,
    ) {
        Some(band) => band,
        None => {
            let industry = match &profile.industry_subcategory {
                Some(sub) => format!("{} / {}", profile.industry_category, sub),
                None => profile.industry_category.clone(),
            };
            return Ok(ValuationOutcome::Unavailable {
                reason: ReasonCode::NoBandFound,
                detail: format!(
                    "no multiple band for {} covers EBITDA of {}",
                    industry, profile.ebitda
                ),
            });
        }
    };

    compute_valuation(band, profile, calibration).map(ValuationOutcome::Available)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuation::ValuationHealth;

    fn services_band() -> IndustryMultipleBand {
        IndustryMultipleBand {
            category: "Services".to_string(),
            subcategory: None,
            size_band: "Lower middle market".to_string(),
            min_ebitda: 500_000.0,
            max_ebitda: 2_000_000.0,
            base_multiple: 4.0,
            high_multiple: 6.5,
            typical_margin: 0.18,
        }
    }

    fn profile(recurring: f64, concentration: f64, growth: f64) -> CompanyProfile {
        CompanyProfile {
            industry_category: "Services".to_string(),
            industry_subcategory: None,
            annual_revenue: 2_500_000.0,
            ebitda: 680_000.0,
            recurring_revenue_pct: recurring,
            customer_concentration_pct: concentration,
            years_in_business: 12,
            growth_rate_pct: growth,
        }
    }

    #[test]
    fn test_valuation_low_concentration() {
        let result = compute_valuation(
            &services_band(),
            &profile(80.0, 15.0, 12.0),
            &Calibration::default(),
        )
        .unwrap();

        assert!(result.adjusted_multiple >= 4.0 && result.adjusted_multiple <= 6.5);
        assert!((result.adjusted_multiple - 6.25).abs() < 1e-9);
        assert_eq!(result.enterprise_value, 680_000.0 * result.adjusted_multiple);
        assert_eq!(result.adjustment_factors.concentration, 0.0);
        assert_eq!(result.health, ValuationHealth::Premium);
        assert!(!result.clamped);
    }

    #[test]
    fn test_concentration_penalty_lowers_multiple() {
        let cal = Calibration::default();
        let low = compute_valuation(&services_band(), &profile(80.0, 15.0, 12.0), &cal).unwrap();
        let high = compute_valuation(&services_band(), &profile(80.0, 45.0, 12.0), &cal).unwrap();

        assert!(high.adjusted_multiple < low.adjusted_multiple);
        assert!((high.adjusted_multiple - 5.46875).abs() < 1e-9);
        assert_eq!(high.health, ValuationHealth::MarketRate);
    }

    #[test]
    fn test_extreme_inputs_clamped() {
        let cal = Calibration::default();
        let best = compute_valuation(&services_band(), &profile(100.0, 0.0, 300.0), &cal).unwrap();
        assert_eq!(best.adjusted_multiple, 6.5);
        assert!(best.clamped);

        let worst = compute_valuation(&services_band(), &profile(0.0, 100.0, -90.0), &cal).unwrap();
        assert_eq!(worst.adjusted_multiple, 4.0);
        assert_eq!(worst.health, ValuationHealth::BelowMarket);
    }

    #[test]
    fn test_comparable_range_ignores_adjustment() {
        let cal = Calibration::default();
        let a = compute_valuation(&services_band(), &profile(0.0, 90.0, 0.0), &cal).unwrap();
        let b = compute_valuation(&services_band(), &profile(100.0, 0.0, 30.0), &cal).unwrap();
        assert_eq!(a.comparable_range, b.comparable_range);
    }

    #[test]
    fn test_inverted_band_rejected() {
        let mut band = services_band();
        band.high_multiple = 3.0;
        let err = compute_valuation(&band, &profile(50.0, 10.0, 10.0), &Calibration::default())
            .unwrap_err();
        assert!(err.messages()[0].contains("band.high_multiple"));
    }

    #[test]
    fn test_value_company_without_band_is_unavailable() {
        let mut p = profile(80.0, 15.0, 12.0);
        p.industry_category = "X".to_string();
        let outcome = value_company(&[services_band()], &p, &Calibration::default()).unwrap();

        match outcome {
            ValuationOutcome::Unavailable { reason, detail } => {
                assert_eq!(reason, ReasonCode::NoBandFound);
                assert!(detail.contains("X"));
            }
            ValuationOutcome::Available(_) => panic!("expected unavailable valuation"),
        }
    }

    #[test]
    fn test_negative_ebitda_is_unavailable() {
        let mut p = profile(80.0, 15.0, 12.0);
        p.ebitda = -100_000.0;
        let mut band = services_band();
        band.min_ebitda = -1_000_000.0;
        band.max_ebitda = 1_000_000.0;

        let outcome = value_company(&[band.clone()], &p, &Calibration::default()).unwrap();
        assert_eq!(outcome.reason(), Some(ReasonCode::NegativeEbitda));

        let err = compute_valuation(&band, &p, &Calibration::default()).unwrap_err();
        assert_eq!(err.messages(), ["ebitda: must be non-negative (got -100000)"]);
    }

    #[test]
    fn test_value_company_rejects_invalid_profile() {
        let p = profile(150.0, 15.0, 12.0);
        let err = value_company(&[services_band()], &p, &Calibration::default()).unwrap_err();
        assert_eq!(err.reason(), ReasonCode::InvalidInput);
    }
}
