use serde::{Deserialize, Serialize};

use crate::error::{EngineError, InputErrors};
use crate::financials::{AddBack, FinancialStatement};
use crate::valuation::CompanyProfile;

/// Label used for add-backs a scenario introduces.
pub const SCENARIO_ADDBACK_LABEL: &str = "Scenario adjustment";

/// A hypothetical change to a baseline company.
///
/// Percentage changes scale the statement figures (`-10` means 10% lower).
/// `additional_addbacks` is an absolute amount; a negative value draws down
/// existing add-backs starting from the last entry. Overrides replace the
/// profile value outright.
///
/// Example YAML:
/// ```yaml
/// revenue_change_pct: 15
/// opex_change_pct: -5
/// recurring_revenue_pct: 60
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct ScenarioDelta {
    pub revenue_change_pct: f64,
    pub cogs_change_pct: f64,
    pub opex_change_pct: f64,
    pub additional_addbacks: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring_revenue_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_concentration_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_rate_pct: Option<f64>,
}

/// A delta with a name, for comparing several what-ifs side by side.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NamedDelta {
    pub name: String,
    #[serde(default)]
    pub delta: ScenarioDelta,
}

fn scale(value: f64, change_pct: f64) -> f64 {
    if change_pct == 0.0 {
        value
    } else {
        value * (1.0 + change_pct / 100.0)
    }
}

impl ScenarioDelta {
    pub fn is_zero(&self) -> bool {
        *self == ScenarioDelta::default()
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let mut errors = InputErrors::new();
        for (field, pct) in [
            ("revenue_change_pct", self.revenue_change_pct),
            ("cogs_change_pct", self.cogs_change_pct),
            ("opex_change_pct", self.opex_change_pct),
        ] {
            if !pct.is_finite() || pct < -100.0 {
                errors.push(format!("delta.{}: must be -100 or more (got {})", field, pct));
            }
        }
        errors.finite("delta.additional_addbacks", self.additional_addbacks);
        if let Some(v) = self.recurring_revenue_pct {
            errors.percentage("delta.recurring_revenue_pct", v);
        }
        if let Some(v) = self.customer_concentration_pct {
            errors.percentage("delta.customer_concentration_pct", v);
        }
        if let Some(v) = self.growth_rate_pct {
            errors.finite("delta.growth_rate_pct", v);
        }
        errors.finish()
    }

    /// Derive the scenario statement. The baseline is not touched.
    pub fn apply_to_statement(
        &self,
        baseline: &FinancialStatement,
    ) -> Result<FinancialStatement, EngineError> {
        let mut statement = baseline.clone();
        statement.revenue = scale(baseline.revenue, self.revenue_change_pct);
        statement.cogs = scale(baseline.cogs, self.cogs_change_pct);
        statement.opex = scale(baseline.opex, self.opex_change_pct);

        if self.additional_addbacks > 0.0 {
            statement
                .addbacks
                .push(AddBack::custom(SCENARIO_ADDBACK_LABEL, self.additional_addbacks));
        } else if self.additional_addbacks < 0.0 {
            draw_down(&mut statement.addbacks, -self.additional_addbacks)?;
        }

        Ok(statement)
    }

    /// Derive the scenario profile. The baseline is not touched.
    pub fn apply_to_profile(&self, baseline: &CompanyProfile) -> CompanyProfile {
        let mut profile = baseline.clone();
        if let Some(v) = self.recurring_revenue_pct {
            profile.recurring_revenue_pct = v;
        }
        if let Some(v) = self.customer_concentration_pct {
            profile.customer_concentration_pct = v;
        }
        if let Some(v) = self.growth_rate_pct {
            profile.growth_rate_pct = v;
        }
        profile
    }
}

/// Remove `amount` from add-backs, last entry first, dropping emptied entries.
fn draw_down(addbacks: &mut Vec<AddBack>, mut amount: f64) -> Result<(), EngineError> {
    let available: f64 = addbacks.iter().map(|a| a.amount).sum();
    if amount > available {
        return Err(EngineError::InvalidInput(vec![format!(
            "delta.additional_addbacks: cannot remove {} from {} of add-backs",
            amount, available
        )]));
    }

    while amount > 0.0 {
        let Some(last) = addbacks.last_mut() else {
            break;
        };
        if last.amount > amount {
            last.amount -= amount;
            amount = 0.0;
        } else {
            amount -= last.amount;
            addbacks.pop();
        }
    }
    Ok(())
}
