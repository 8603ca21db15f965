use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::questions::{
    validate_questions, Answer, QuestionKind, ReadinessAnswers, ReadinessQuestion,
};
use crate::error::{EngineError, InputErrors, ReasonCode};

/// Band the aggregate score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadinessCategory {
    CriticalGaps,
    FixableRisks,
    ExitReady,
}

impl ReadinessCategory {
    pub fn from_score(score: u8) -> Self {
        if score <= 40 {
            ReadinessCategory::CriticalGaps
        } else if score <= 70 {
            ReadinessCategory::FixableRisks
        } else {
            ReadinessCategory::ExitReady
        }
    }
}

impl std::fmt::Display for ReadinessCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CriticalGaps => write!(f, "Critical Gaps"),
            Self::FixableRisks => write!(f, "Fixable Risks"),
            Self::ExitReady => write!(f, "Exit Ready"),
        }
    }
}

/// How one answered question fed the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionScore {
    pub id: String,
    pub category: String,
    pub score: f64,
    pub weight: f64,
    /// score x weight
    pub contribution: f64,
    pub red_flag: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub question_id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessAssessment {
    pub answers: ReadinessAnswers,
    /// Weighted average over answered questions, 0..=100
    pub score: u8,
    pub category: ReadinessCategory,
    /// Question ids whose red-flag rule fired, in question order
    pub red_flags: Vec<String>,
    pub incomplete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReasonCode>,
    pub answered_weight: f64,
    pub breakdown: Vec<QuestionScore>,
    pub action_items: Vec<ActionItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_since_previous: Option<i16>,
}

impl ReadinessAssessment {
    /// Record the change against an earlier score supplied by the caller.
    pub fn compared_to(mut self, previous_score: Option<u8>) -> Self {
        self.change_since_previous = previous_score.map(|p| self.score as i16 - p as i16);
        self
    }
}

/// Score one answered question, returning its score and whether its red flag fires.
fn score_answer(
    question: &ReadinessQuestion,
    answer: &Answer,
    errors: &mut InputErrors,
) -> Option<(f64, bool)> {
    match (question.kind, answer) {
        (QuestionKind::Single, Answer::Single(key)) => match question.option(key) {
            Some((rank, option)) => Some((option.score, rank >= question.red_flag_threshold)),
            None => {
                errors.push(format!("answers.{}: unknown option '{}'", question.id, key));
                None
            }
        },
        (QuestionKind::Multi, Answer::Multi(keys)) => {
            let mut selected = BTreeSet::new();
            let mut points = 0.0;
            for key in keys {
                match question.option(key) {
                    Some((rank, option)) => {
                        if selected.insert(rank) {
                            points += option.score;
                        }
                    }
                    None => {
                        errors.push(format!("answers.{}: unknown option '{}'", question.id, key));
                    }
                }
            }
            Some((
                f64::min(points, 100.0),
                selected.len() < question.red_flag_threshold,
            ))
        }
        (QuestionKind::Single, Answer::Multi(_)) => {
            errors.push(format!(
                "answers.{}: single-select question takes one option",
                question.id
            ));
            None
        }
        (QuestionKind::Multi, Answer::Single(_)) => {
            errors.push(format!(
                "answers.{}: multi-select question takes a list of options",
                question.id
            ));
            None
        }
    }
}

/// Aggregate answers into a 0-100 readiness score with red flags.
///
/// Unanswered questions are left out of both the numerator and the weight
/// total, so a partial assessment is scored on what was answered and flagged
/// `incomplete`. With nothing answered the score is 0 with
/// [`ReasonCode::NoAnswers`]. A malformed question table is invalid input.
pub fn score_readiness(
    questions: &[ReadinessQuestion],
    answers: &ReadinessAnswers,
) -> Result<ReadinessAssessment, EngineError> {
    validate_questions(questions).map_err(EngineError::InvalidInput)?;

    let mut errors = InputErrors::new();
    for id in answers.keys() {
        if !questions.iter().any(|q| &q.id == id) {
            errors.push(format!("answers.{}: unknown question", id));
        }
    }

    let mut breakdown = Vec::new();
    let mut red_flags = Vec::new();
    let mut action_items = Vec::new();

    for question in questions {
        let Some(answer) = answers.get(&question.id) else {
            continue;
        };
        let Some((score, flagged)) = score_answer(question, answer, &mut errors) else {
            continue;
        };

        if flagged {
            tracing::debug!(question = %question.id, score, "red flag raised");
            red_flags.push(question.id.clone());
            if let Some(text) = &question.remediation {
                action_items.push(ActionItem {
                    question_id: question.id.clone(),
                    text: text.clone(),
                });
            }
        }

        breakdown.push(QuestionScore {
            id: question.id.clone(),
            category: question.category.clone(),
            score,
            weight: question.weight,
            contribution: score * question.weight,
            red_flag: flagged,
        });
    }

    errors.finish()?;

    let answered_weight: f64 = breakdown.iter().map(|q| q.weight).sum();
    let contribution: f64 = breakdown.iter().map(|q| q.contribution).sum();
    let score = if answered_weight > 0.0 {
        (contribution / answered_weight).round().clamp(0.0, 100.0) as u8
    } else {
        0
    };

    let incomplete = breakdown.len() < questions.len();
    let reason = if breakdown.is_empty() {
        Some(ReasonCode::NoAnswers)
    } else if incomplete {
        Some(ReasonCode::IncompleteAssessment)
    } else {
        None
    };

    tracing::debug!(
        score,
        answered = breakdown.len(),
        total = questions.len(),
        flags = red_flags.len(),
        "readiness scored"
    );

    Ok(ReadinessAssessment {
        answers: answers.clone(),
        score,
        category: ReadinessCategory::from_score(score),
        red_flags,
        incomplete,
        reason,
        answered_weight,
        breakdown,
        action_items,
        change_since_previous: None,
    })
}
