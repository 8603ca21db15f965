use super::bands::IndustryMultipleBand;
use super::types::{ComparableRange, ValuationHealth};

/// Low/median/high valuation from the band multiples alone.
///
/// Independent of the adjusted multiple; this is what comparable deals in the
/// band would pay, not the company's own valuation.
pub fn comparable_range(band: &IndustryMultipleBand, adjusted_ebitda: f64) -> ComparableRange {
    let low = adjusted_ebitda * band.base_multiple;
    let high = adjusted_ebitda * band.high_multiple;
    ComparableRange {
        low,
        median: (low + high) / 2.0,
        high,
    }
}

/// Position of `adjusted` in `[base, high]`, clamped to 0..=1.
///
/// A zero-width band has no meaningful position and reports the midpoint.
pub fn band_position(adjusted: f64, base: f64, high: f64) -> f64 {
    let width = high - base;
    if width <= 0.0 || !width.is_finite() {
        return 0.5;
    }
    ((adjusted - base) / width).clamp(0.0, 1.0)
}

/// Label the adjusted multiple by which third of the band it falls in.
pub fn classify_health(adjusted: f64, base: f64, high: f64) -> ValuationHealth {
    let position = band_position(adjusted, base, high);
    if position < 1.0 / 3.0 {
        ValuationHealth::BelowMarket
    } else if position < 2.0 / 3.0 {
        ValuationHealth::MarketRate
    } else {
        ValuationHealth::Premium
    }
}
