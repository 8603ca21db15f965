use serde::{Deserialize, Serialize};

use super::delta::{NamedDelta, ScenarioDelta};
use crate::engine::{Engine, Evaluation};
use crate::error::{EngineError, ReasonCode};
use crate::financials::FinancialStatement;
use crate::valuation::CompanyProfile;

/// Difference between a scenario figure and its baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Change {
    pub absolute: f64,
    /// Relative to the magnitude of the baseline; `None` when the baseline is 0
    pub percent: Option<f64>,
}

impl Change {
    pub fn between(baseline: f64, scenario: f64) -> Self {
        let absolute = scenario - baseline;
        let percent = if baseline == 0.0 {
            None
        } else {
            Some(absolute / baseline.abs() * 100.0)
        };
        Self { absolute, percent }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub delta: ScenarioDelta,
    /// The scenario's own earnings and valuation
    #[serde(flatten)]
    pub evaluation: Evaluation,
    pub ebitda_change: Change,
    /// `None` when either side has no valuation
    pub value_change: Option<Change>,
    /// Why a change could not be fully reported
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<ReasonCode>,
}

fn compare(
    name: Option<String>,
    delta: &ScenarioDelta,
    baseline: &Evaluation,
    evaluation: Evaluation,
) -> ScenarioResult {
    let mut reasons = Vec::new();

    let ebitda_change = Change::between(
        baseline.earnings.adjusted_ebitda,
        evaluation.earnings.adjusted_ebitda,
    );
    if ebitda_change.percent.is_none() {
        reasons.push(ReasonCode::ZeroBaseline);
    }

    let value_change = match (
        baseline.valuation.enterprise_value(),
        evaluation.valuation.enterprise_value(),
    ) {
        (Some(before), Some(after)) => {
            let change = Change::between(before, after);
            if change.percent.is_none() && !reasons.contains(&ReasonCode::ZeroBaseline) {
                reasons.push(ReasonCode::ZeroBaseline);
            }
            Some(change)
        }
        _ => {
            let reason = evaluation
                .valuation
                .reason()
                .or(baseline.valuation.reason())
                .unwrap_or(ReasonCode::NoBandFound);
            reasons.push(reason);
            None
        }
    };

    ScenarioResult {
        name,
        delta: delta.clone(),
        evaluation,
        ebitda_change,
        value_change,
        reasons,
    }
}

fn run(
    engine: &Engine,
    statement: &FinancialStatement,
    profile: &CompanyProfile,
    delta: &ScenarioDelta,
) -> Result<Evaluation, EngineError> {
    delta.validate()?;
    let scenario_statement = delta.apply_to_statement(statement)?;
    let scenario_profile = delta.apply_to_profile(profile);
    tracing::debug!(?delta, "running scenario");
    engine.evaluate(&scenario_statement, &scenario_profile)
}

/// Re-run normalization and valuation under a hypothetical delta.
///
/// Works on derived copies; `statement` and `profile` are never modified.
/// A zero delta reproduces the baseline evaluation exactly.
pub fn simulate(
    engine: &Engine,
    statement: &FinancialStatement,
    profile: &CompanyProfile,
    delta: &ScenarioDelta,
) -> Result<ScenarioResult, EngineError> {
    let baseline = engine.evaluate(statement, profile)?;
    let evaluation = run(engine, statement, profile, delta)?;
    Ok(compare(None, delta, &baseline, evaluation))
}

/// Evaluate several named deltas against one baseline, evaluated once.
pub fn simulate_many(
    engine: &Engine,
    statement: &FinancialStatement,
    profile: &CompanyProfile,
    deltas: &[NamedDelta],
) -> Result<Vec<ScenarioResult>, EngineError> {
    let baseline = engine.evaluate(statement, profile)?;
    deltas
        .iter()
        .map(|named| {
            let evaluation = run(engine, statement, profile, &named.delta)?;
            Ok(compare(
                Some(named.name.clone()),
                &named.delta,
                &baseline,
                evaluation,
            ))
        })
        .collect()
}
