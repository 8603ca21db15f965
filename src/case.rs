use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::engine::Evaluation;
use crate::financials::FinancialStatement;
use crate::path::{GoalAnswers, PathRecommendation};
use crate::readiness::{ReadinessAnswers, ReadinessAssessment};
use crate::scenario::{NamedDelta, ScenarioResult};
use crate::valuation::CompanyProfile;

/// Readiness answers plus the score from an earlier assessment, if any.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReadinessInput {
    #[serde(default)]
    pub answers: ReadinessAnswers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_score: Option<u8>,
}

/// Everything known about one company, as read from a case file.
///
/// Example YAML:
/// ```yaml
/// name: Acme Consulting
/// statement:
///   revenue: 2500000
///   cogs: 1100000
///   opex: 950000
///   addbacks:
///     - { category: owner_salary, amount: 175000 }
///     - { category: custom, label: One-off rebrand, amount: 40000 }
/// profile:
///   industry_category: Professional Services
///   recurring_revenue_pct: 40
///   customer_concentration_pct: 30
///   growth_rate_pct: 8
/// readiness:
///   answers:
///     customer-concentration: 25-40
///     documented-processes: [sops, crm]
/// goals:
///   timeline: 1-3-years
/// scenarios:
///   - name: Trim overhead
///     delta: { opex_change_pct: -10 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CompanyCase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub statement: FinancialStatement,
    pub profile: CompanyProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness: Option<ReadinessInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<GoalAnswers>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scenarios: Vec<NamedDelta>,
}

/// Full result for a [`CompanyCase`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub evaluation: Evaluation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readiness: Option<ReadinessAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathRecommendation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scenarios: Vec<ScenarioResult>,
}

/// Load a company case from a YAML file
pub fn load_case(path: &Path) -> Result<CompanyCase> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read case file at {}", path.display()))?;

    let case: CompanyCase = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse case: invalid YAML in {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        addbacks = case.statement.addbacks.len(),
        scenarios = case.scenarios.len(),
        "loaded case"
    );
    Ok(case)
}
