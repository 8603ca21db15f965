use serde::{Deserialize, Serialize};

use crate::case::{CompanyCase, ExitReport};
use crate::config::defaults::{default_bands, default_goal_questions, default_readiness_questions};
use crate::config::{validate_config, EngineConfig};
use crate::error::EngineError;
use crate::financials::{self, FinancialStatement, MarginThresholds, NormalizedEarnings};
use crate::path::{self, ExitPath, GoalAnswers, GoalQuestion, PathRecommendation};
use crate::readiness::{self, ReadinessAnswers, ReadinessAssessment, ReadinessQuestion};
use crate::scenario::{self, NamedDelta, ScenarioDelta, ScenarioResult};
use crate::valuation::{
    self, Calibration, CompanyProfile, IndustryMultipleBand, ValuationHealth, ValuationOutcome,
};

/// Earnings and valuation for one statement and profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub earnings: NormalizedEarnings,
    pub valuation: ValuationOutcome,
}

/// The scoring engine: validated calibration plus the declarative tables it
/// evaluates against.
///
/// Every operation is a pure function of `&self` and its arguments, so one
/// engine can be shared freely and called as often as inputs change.
#[derive(Debug, Clone)]
pub struct Engine {
    calibration: Calibration,
    margins: MarginThresholds,
    tie_break: ExitPath,
    bands: Vec<IndustryMultipleBand>,
    readiness: Vec<ReadinessQuestion>,
    goals: Vec<GoalQuestion>,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            calibration: Calibration::default(),
            margins: MarginThresholds::default(),
            tie_break: ExitPath::default(),
            bands: default_bands(),
            readiness: default_readiness_questions(),
            goals: default_goal_questions(),
        }
    }
}

impl Engine {
    /// Build an engine from config, validating it first.
    ///
    /// Sections left out of the config fall back to the built-in tables.
    pub fn new(config: EngineConfig) -> Result<Self, Vec<String>> {
        validate_config(&config)?;

        let engine = Self {
            calibration: config.calibration.unwrap_or_default(),
            margins: config.margins.unwrap_or_default(),
            tie_break: config.tie_break.unwrap_or_default(),
            bands: config.bands.unwrap_or_else(default_bands),
            readiness: config.readiness.unwrap_or_else(default_readiness_questions),
            goals: config.goals.unwrap_or_else(default_goal_questions),
        };
        tracing::debug!(
            bands = engine.bands.len(),
            readiness_questions = engine.readiness.len(),
            goal_questions = engine.goals.len(),
            tie_break = %engine.tie_break,
            "engine configured"
        );
        Ok(engine)
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn margins(&self) -> &MarginThresholds {
        &self.margins
    }

    pub fn tie_break(&self) -> ExitPath {
        self.tie_break
    }

    pub fn bands(&self) -> &[IndustryMultipleBand] {
        &self.bands
    }

    pub fn readiness_questions(&self) -> &[ReadinessQuestion] {
        &self.readiness
    }

    pub fn goal_questions(&self) -> &[GoalQuestion] {
        &self.goals
    }

    pub fn normalize(
        &self,
        statement: &FinancialStatement,
    ) -> Result<NormalizedEarnings, EngineError> {
        financials::normalize(statement, &self.margins)
    }

    pub fn resolve_band(
        &self,
        category: &str,
        subcategory: Option<&str>,
        ebitda: f64,
    ) -> Option<&IndustryMultipleBand> {
        valuation::resolve_band(&self.bands, category, subcategory, ebitda)
    }

    /// Value a profile as given; `profile.ebitda` is taken as adjusted EBITDA.
    pub fn compute_valuation(
        &self,
        profile: &CompanyProfile,
    ) -> Result<ValuationOutcome, EngineError> {
        valuation::value_company(&self.bands, profile, &self.calibration)
    }

    pub fn classify_health(&self, adjusted: f64, base: f64, high: f64) -> ValuationHealth {
        valuation::classify_health(adjusted, base, high)
    }

    pub fn score_readiness(
        &self,
        answers: &ReadinessAnswers,
    ) -> Result<ReadinessAssessment, EngineError> {
        readiness::score_readiness(&self.readiness, answers)
    }

    pub fn recommend_path(&self, answers: &GoalAnswers) -> Result<PathRecommendation, EngineError> {
        path::recommend_path(&self.goals, answers, self.tie_break)
    }

    /// Normalize the statement, then value the profile at the resulting
    /// adjusted EBITDA and the statement's revenue.
    pub fn evaluate(
        &self,
        statement: &FinancialStatement,
        profile: &CompanyProfile,
    ) -> Result<Evaluation, EngineError> {
        let earnings = self.normalize(statement)?;

        let mut valued = profile.clone();
        valued.annual_revenue = statement.revenue;
        valued.ebitda = earnings.adjusted_ebitda;
        let valuation = self.compute_valuation(&valued)?;

        Ok(Evaluation { earnings, valuation })
    }

    pub fn simulate(
        &self,
        statement: &FinancialStatement,
        profile: &CompanyProfile,
        delta: &ScenarioDelta,
    ) -> Result<ScenarioResult, EngineError> {
        scenario::simulate(self, statement, profile, delta)
    }

    pub fn simulate_many(
        &self,
        statement: &FinancialStatement,
        profile: &CompanyProfile,
        deltas: &[NamedDelta],
    ) -> Result<Vec<ScenarioResult>, EngineError> {
        scenario::simulate_many(self, statement, profile, deltas)
    }

    /// Run every part of a case and bundle the results.
    ///
    /// Problems from all parts are collected before failing.
    pub fn evaluate_case(&self, case: &CompanyCase) -> Result<ExitReport, EngineError> {
        let mut messages = Vec::new();

        let evaluation = keep(self.evaluate(&case.statement, &case.profile), &mut messages);
        let readiness = case.readiness.as_ref().and_then(|input| {
            keep(
                self.score_readiness(&input.answers)
                    .map(|a| a.compared_to(input.previous_score)),
                &mut messages,
            )
        });
        let path = case
            .goals
            .as_ref()
            .and_then(|answers| keep(self.recommend_path(answers), &mut messages));
        let scenarios = match evaluation {
            Some(_) => keep(
                self.simulate_many(&case.statement, &case.profile, &case.scenarios),
                &mut messages,
            ),
            None => None,
        };

        match (evaluation, scenarios) {
            (Some(evaluation), Some(scenarios)) if messages.is_empty() => Ok(ExitReport {
                name: case.name.clone(),
                evaluation,
                readiness,
                path,
                scenarios,
            }),
            _ => Err(EngineError::InvalidInput(messages)),
        }
    }
}

fn keep<T>(result: Result<T, EngineError>, messages: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            messages.extend(e.messages().iter().cloned());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReasonCode;
    use crate::financials::{AddBack, AddBackCategory, MarginHealth};

    fn statement() -> FinancialStatement {
        FinancialStatement::new(2_500_000.0, 1_100_000.0, 950_000.0)
            .with_addback(AddBack::new(AddBackCategory::OwnerSalary, 175_000.0))
            .with_addback(AddBack::new(AddBackCategory::PersonalVehicle, 18_000.0))
            .with_addback(AddBack::new(AddBackCategory::TravelMeals, 25_000.0))
            .with_addback(AddBack::new(AddBackCategory::LegalFees, 12_000.0))
    }

    fn profile(category: &str) -> CompanyProfile {
        CompanyProfile {
            industry_category: category.to_string(),
            industry_subcategory: None,
            annual_revenue: 0.0,
            ebitda: 0.0,
            recurring_revenue_pct: 80.0,
            customer_concentration_pct: 15.0,
            years_in_business: 12,
            growth_rate_pct: 12.0,
        }
    }

    #[test]
    fn test_new_fills_defaults() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        assert_eq!(engine.tie_break(), ExitPath::Value);
        assert_eq!(engine.bands().len(), default_bands().len());
        assert_eq!(engine.readiness_questions().len(), 7);
        assert_eq!(engine.goal_questions().len(), 4);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = EngineConfig {
            bands: Some(Vec::new()),
            ..EngineConfig::default()
        };
        let errors = Engine::new(config).unwrap_err();
        assert!(errors[0].starts_with("bands"));
    }

    #[test]
    fn test_evaluate_uses_adjusted_ebitda() {
        let engine = Engine::default();
        let evaluation = engine
            .evaluate(&statement(), &profile("Professional Services"))
            .unwrap();

        assert_eq!(evaluation.earnings.adjusted_ebitda, 680_000.0);
        assert_eq!(evaluation.earnings.health, MarginHealth::Healthy);
        let result = evaluation.valuation.result().unwrap();
        assert_eq!(result.band.size_band, "Lower middle market");
        assert!((result.enterprise_value - 680_000.0 * result.adjusted_multiple).abs() < 1e-6);
    }

    #[test]
    fn test_evaluate_unknown_industry() {
        let engine = Engine::default();
        let evaluation = engine.evaluate(&statement(), &profile("X")).unwrap();
        match evaluation.valuation {
            ValuationOutcome::Unavailable { reason, .. } => {
                assert_eq!(reason, ReasonCode::NoBandFound)
            }
            other => panic!("expected unavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_evaluate_rejects_negative_figures() {
        let engine = Engine::default();
        let mut bad = statement();
        bad.opex = -1.0;
        let mut bad_profile = profile("Professional Services");
        bad_profile.recurring_revenue_pct = 101.0;

        assert!(engine.evaluate(&bad, &profile("Professional Services")).is_err());
        assert!(engine.evaluate(&statement(), &bad_profile).is_err());
    }

    #[test]
    fn test_configured_tie_break() {
        let engine = Engine::new(EngineConfig {
            tie_break: Some(ExitPath::Strategic),
            ..EngineConfig::default()
        })
        .unwrap();
        let recommendation = engine.recommend_path(&GoalAnswers::new()).unwrap();
        assert_eq!(recommendation.recommended, ExitPath::Strategic);
        assert_eq!(recommendation.reason, Some(ReasonCode::NoAnswers));
    }
}
