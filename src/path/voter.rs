use serde::{Deserialize, Serialize};

use super::goals::{validate_goal_questions, ExitPath, GoalAnswers, GoalQuestion, PathWeights};
use crate::error::{EngineError, InputErrors, ReasonCode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRecommendation {
    pub recommended: ExitPath,
    /// Summed option weights per path
    pub totals: PathWeights,
    /// Each path's fraction of the summed weights; all 0 when nothing voted
    pub shares: PathWeights,
    /// More than one path shared the top total
    pub tie_broken: bool,
    pub answered: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReasonCode>,
}

/// Pick the winner among paths sharing the top total.
///
/// `tie_break` wins any tie it is part of. A tie it is not part of goes to
/// the earliest path in [`ExitPath::ALL`].
fn pick(totals: &PathWeights, tie_break: ExitPath) -> (ExitPath, bool) {
    let best = ExitPath::ALL
        .iter()
        .map(|p| totals.get(*p))
        .fold(f64::NEG_INFINITY, f64::max);
    let leaders: Vec<ExitPath> = ExitPath::ALL
        .into_iter()
        .filter(|p| totals.get(*p) == best)
        .collect();

    let tied = leaders.len() > 1;
    let winner = if leaders.contains(&tie_break) {
        tie_break
    } else {
        leaders.first().copied().unwrap_or(tie_break)
    };
    (winner, tied)
}

/// Sum the weight vectors of each answered goal question and recommend the
/// path with the highest total. Unanswered questions add nothing.
///
/// The goal table is checked first; a malformed table is invalid input.
pub fn recommend_path(
    questions: &[GoalQuestion],
    answers: &GoalAnswers,
    tie_break: ExitPath,
) -> Result<PathRecommendation, EngineError> {
    validate_goal_questions(questions).map_err(EngineError::InvalidInput)?;

    let mut errors = InputErrors::new();
    for id in answers.keys() {
        if !questions.iter().any(|q| &q.id == id) {
            errors.push(format!("goals.{}: unknown question", id));
        }
    }

    let mut totals = PathWeights::default();
    let mut answered = 0;
    for question in questions {
        let Some(key) = answers.get(&question.id) else {
            continue;
        };
        match question.option(key) {
            Some(option) => {
                totals.add(&option.weights);
                answered += 1;
            }
            None => errors.push(format!("goals.{}: unknown option '{}'", question.id, key)),
        }
    }
    errors.finish()?;

    let (recommended, tie_broken) = pick(&totals, tie_break);
    if tie_broken {
        tracing::debug!(%recommended, "path tie resolved by policy");
    }

    let sum = totals.total();
    let shares = if sum > 0.0 {
        PathWeights::new(totals.quick / sum, totals.value / sum, totals.strategic / sum)
    } else {
        PathWeights::default()
    };

    Ok(PathRecommendation {
        recommended,
        totals,
        shares,
        tie_broken,
        answered,
        reason: (answered == 0).then_some(ReasonCode::NoAnswers),
    })
}
