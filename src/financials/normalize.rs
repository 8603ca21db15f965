use serde::{Deserialize, Serialize};

use super::types::{
    AddBackCategory, AddBackTotal, FinancialStatement, MarginHealth, NormalizedEarnings,
};
use crate::error::{EngineError, InputErrors, ReasonCode};

/// Margin cut-offs for the health label.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MarginThresholds {
    /// Margin at or above which earnings are "Healthy"
    pub healthy: f64,
    /// Margin at or above which earnings are "Moderate"
    pub moderate: f64,
}

impl Default for MarginThresholds {
    fn default() -> Self {
        Self {
            healthy: 0.20,
            moderate: 0.10,
        }
    }
}

impl MarginHealth {
    pub fn classify(margin: f64, thresholds: &MarginThresholds) -> Self {
        if margin >= thresholds.healthy {
            MarginHealth::Healthy
        } else if margin >= thresholds.moderate {
            MarginHealth::Moderate
        } else {
            MarginHealth::Weak
        }
    }
}

/// Check every figure and add-back, returning all problems at once.
pub fn validate_statement(statement: &FinancialStatement) -> Result<(), EngineError> {
    let mut errors = InputErrors::new();
    errors.non_negative("revenue", statement.revenue);
    errors.non_negative("cogs", statement.cogs);
    errors.non_negative("opex", statement.opex);

    for (i, addback) in statement.addbacks.iter().enumerate() {
        errors.non_negative(&format!("addbacks[{}].amount", i), addback.amount);
        if addback.category == AddBackCategory::Custom {
            let blank = addback
                .label
                .as_deref()
                .map(|l| l.trim().is_empty())
                .unwrap_or(true);
            if blank {
                errors.push(format!("addbacks[{}].label: custom add-backs need a label", i));
            }
        }
    }

    errors.finish()
}

/// Normalize a statement into adjusted earnings.
///
/// Zero revenue is not an error: margin is reported as 0 with
/// `margin_undefined` set and [`ReasonCode::MarginUndefined`] attached.
pub fn normalize(
    statement: &FinancialStatement,
    thresholds: &MarginThresholds,
) -> Result<NormalizedEarnings, EngineError> {
    validate_statement(statement)?;

    let gross_profit = statement.revenue - statement.cogs;
    let base_ebitda = gross_profit - statement.opex;
    let total_addbacks: f64 = statement.addbacks.iter().map(|a| a.amount).sum();
    let adjusted_ebitda = base_ebitda + total_addbacks;

    let margin_undefined = statement.revenue == 0.0;
    let margin = if margin_undefined {
        tracing::debug!("zero revenue, margin reported as 0");
        0.0
    } else {
        adjusted_ebitda / statement.revenue
    };

    Ok(NormalizedEarnings {
        gross_profit,
        base_ebitda,
        total_addbacks,
        adjusted_ebitda,
        margin,
        margin_undefined,
        health: MarginHealth::classify(margin, thresholds),
        addbacks_by_category: summarize_addbacks(statement),
        reason: margin_undefined.then_some(ReasonCode::MarginUndefined),
    })
}

/// Canonical categories first (only those present), then each custom label
/// in order of first appearance.
fn summarize_addbacks(statement: &FinancialStatement) -> Vec<AddBackTotal> {
    let mut totals: Vec<AddBackTotal> = AddBackCategory::CANONICAL
        .iter()
        .filter(|c| statement.addbacks.iter().any(|a| a.category == **c))
        .map(|c| AddBackTotal {
            name: c.to_string(),
            category: *c,
            amount: statement.addbacks_for(*c),
        })
        .collect();

    for addback in statement
        .addbacks
        .iter()
        .filter(|a| a.category == AddBackCategory::Custom)
    {
        let name = addback.display_name();
        match totals
            .iter_mut()
            .find(|t| t.category == AddBackCategory::Custom && t.name == name)
        {
            Some(total) => total.amount += addback.amount,
            None => totals.push(AddBackTotal {
                name,
                category: AddBackCategory::Custom,
                amount: addback.amount,
            }),
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::financials::AddBack;

    fn sample_statement() -> FinancialStatement {
        FinancialStatement::new(2_500_000.0, 1_100_000.0, 950_000.0)
            .with_addback(AddBack::new(AddBackCategory::OwnerSalary, 175_000.0))
            .with_addback(AddBack::new(AddBackCategory::PersonalVehicle, 18_000.0))
            .with_addback(AddBack::new(AddBackCategory::TravelMeals, 25_000.0))
            .with_addback(AddBack::new(AddBackCategory::LegalFees, 12_000.0))
            .with_addback(AddBack::new(AddBackCategory::OtherNonRecurring, 0.0))
    }

    #[test]
    fn test_normalize_sample_business() {
        let earnings = normalize(&sample_statement(), &MarginThresholds::default()).unwrap();

        assert_eq!(earnings.gross_profit, 1_400_000.0);
        assert_eq!(earnings.base_ebitda, 450_000.0);
        assert_eq!(earnings.total_addbacks, 230_000.0);
        assert_eq!(earnings.adjusted_ebitda, 680_000.0);
        assert!((earnings.margin - 0.272).abs() < 1e-12);
        assert!(!earnings.margin_undefined);
        assert!(earnings.reason.is_none());
        assert_eq!(earnings.health, MarginHealth::Healthy);
    }

    #[test]
    fn test_zero_revenue_margin_undefined() {
        let statement = FinancialStatement::new(0.0, 0.0, 10_000.0);
        let earnings = normalize(&statement, &MarginThresholds::default()).unwrap();

        assert_eq!(earnings.margin, 0.0);
        assert!(earnings.margin_undefined);
        assert_eq!(earnings.reason, Some(ReasonCode::MarginUndefined));
        assert_eq!(earnings.adjusted_ebitda, -10_000.0);
        assert_eq!(earnings.health, MarginHealth::Weak);

        let json = serde_json::to_value(&earnings).unwrap();
        assert_eq!(json["reason"], "margin_undefined");
    }

    #[test]
    fn test_health_thresholds_boundaries() {
        let t = MarginThresholds::default();
        assert_eq!(MarginHealth::classify(0.20, &t), MarginHealth::Healthy);
        assert_eq!(MarginHealth::classify(0.1999, &t), MarginHealth::Moderate);
        assert_eq!(MarginHealth::classify(0.10, &t), MarginHealth::Moderate);
        assert_eq!(MarginHealth::classify(0.0999, &t), MarginHealth::Weak);
        assert_eq!(MarginHealth::classify(-0.5, &t), MarginHealth::Weak);
    }

    #[test]
    fn test_negative_figures_rejected_together() {
        let statement = FinancialStatement::new(-1.0, -2.0, 0.0)
            .with_addback(AddBack::new(AddBackCategory::LegalFees, -5.0));
        let err = normalize(&statement, &MarginThresholds::default()).unwrap_err();

        let messages = err.messages();
        assert_eq!(messages.len(), 3);
        assert!(messages[0].contains("revenue"));
        assert!(messages[2].contains("addbacks[0].amount"));
    }

    #[test]
    fn test_custom_addback_requires_label() {
        let mut statement = FinancialStatement::new(100.0, 0.0, 0.0);
        statement.addbacks.push(AddBack {
            category: AddBackCategory::Custom,
            label: Some("  ".to_string()),
            amount: 10.0,
        });
        let err = validate_statement(&statement).unwrap_err();
        assert!(err.messages()[0].contains("addbacks[0].label"));
    }

    #[test]
    fn test_addback_summary_groups_custom_labels() {
        let statement = FinancialStatement::new(1_000.0, 0.0, 0.0)
            .with_addback(AddBack::custom("Family phones", 300.0))
            .with_addback(AddBack::new(AddBackCategory::OwnerSalary, 100.0))
            .with_addback(AddBack::custom("Boat slip", 50.0))
            .with_addback(AddBack::custom("Family phones", 200.0))
            .with_addback(AddBack::new(AddBackCategory::OwnerSalary, 25.0));

        let earnings = normalize(&statement, &MarginThresholds::default()).unwrap();
        let names: Vec<_> = earnings
            .addbacks_by_category
            .iter()
            .map(|t| (t.name.as_str(), t.amount))
            .collect();

        assert_eq!(
            names,
            vec![
                ("Owner salary", 125.0),
                ("Family phones", 500.0),
                ("Boat slip", 50.0)
            ]
        );
        assert_eq!(earnings.total_addbacks, 675.0);
    }

    #[test]
    fn test_statement_yaml_parse() {
        let yaml = r#"
revenue: 500000
cogs: 200000
opex: 150000
addbacks:
  - { category: owner_salary, amount: 60000 }
  - { category: custom, label: "Country club", amount: 8000 }
"#;
        let statement: FinancialStatement = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(statement.addbacks.len(), 2);
        assert_eq!(statement.addbacks_for(AddBackCategory::OwnerSalary), 60_000.0);
        assert_eq!(statement.addbacks[1].display_name(), "Country club");
    }
}
