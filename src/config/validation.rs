use super::schema::EngineConfig;
use crate::error::InputErrors;
use crate::path::validate_goal_questions;
use crate::readiness::validate_questions;
use crate::valuation::compute::{band_errors, calibration_errors};

/// Validate an engine configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &EngineConfig) -> Result<(), Vec<String>> {
    let mut errors = InputErrors::new();

    if let Some(ref calibration) = config.calibration {
        calibration_errors(calibration, &mut errors);
    }

    if let Some(ref margins) = config.margins {
        errors.finite("margins.healthy", margins.healthy);
        errors.finite("margins.moderate", margins.moderate);
        if margins.healthy < margins.moderate {
            errors.push(format!(
                "margins.healthy: {} is below margins.moderate {}",
                margins.healthy, margins.moderate
            ));
        }
    }

    if let Some(ref bands) = config.bands {
        if bands.is_empty() {
            errors.push("bands: at least one band is required");
        }
        for (i, band) in bands.iter().enumerate() {
            let path = format!("bands[{}]", i);
            if band.category.trim().is_empty() {
                errors.push(format!("{}.category: must not be empty", path));
            }
            if !band.min_ebitda.is_finite() || !band.max_ebitda.is_finite() {
                errors.push(format!("{}: min_ebitda and max_ebitda must be finite", path));
            } else if band.min_ebitda < 0.0 {
                errors.push(format!(
                    "{}.min_ebitda: must be non-negative (got {})",
                    path, band.min_ebitda
                ));
            } else if band.min_ebitda >= band.max_ebitda {
                errors.push(format!(
                    "{}.max_ebitda: {} must be above min_ebitda {}",
                    path, band.max_ebitda, band.min_ebitda
                ));
            }
            band_errors(band, &path, &mut errors);
        }
    }

    let mut errors = errors.into_messages();

    if let Some(ref questions) = config.readiness {
        if let Err(e) = validate_questions(questions) {
            errors.extend(e);
        }
    }

    if let Some(ref goals) = config.goals {
        if let Err(e) = validate_goal_questions(goals) {
            errors.extend(e);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
