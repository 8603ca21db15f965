use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Single,
    Multi,
}

/// One selectable answer.
///
/// For single-select questions `score` is the question score when chosen
/// (0-100). For multi-select questions it is the points this option adds;
/// a question's option scores sum to 100.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnswerOption {
    pub id: String,
    pub label: String,
    pub score: f64,
}

/// A weighted readiness question.
///
/// Single-select options are listed best-first; an option's position is its
/// rank. The red flag fires when:
/// - single: the chosen option's rank >= `red_flag_threshold`
/// - multi: fewer than `red_flag_threshold` options are selected
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReadinessQuestion {
    pub id: String,
    pub category: String,
    pub prompt: String,
    pub kind: QuestionKind,
    pub options: Vec<AnswerOption>,
    pub weight: f64,
    pub red_flag_threshold: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ReadinessQuestion {
    /// Find an option by id, falling back to its label.
    pub fn option(&self, key: &str) -> Option<(usize, &AnswerOption)> {
        self.options
            .iter()
            .enumerate()
            .find(|(_, o)| o.id == key)
            .or_else(|| self.options.iter().enumerate().find(|(_, o)| o.label == key))
    }
}

/// An answer: one option key for single-select, a list for multi-select.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Answer {
    Single(String),
    Multi(Vec<String>),
}

/// Answers keyed by question id.
pub type ReadinessAnswers = BTreeMap<String, Answer>;

/// Check a question table. Returns all problems at once.
pub fn validate_questions(questions: &[ReadinessQuestion]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    if questions.is_empty() {
        errors.push("readiness: at least one question is required".to_string());
    }

    for (i, q) in questions.iter().enumerate() {
        let path = format!("readiness[{}]", i);

        if !ids.insert(q.id.as_str()) {
            errors.push(format!("{}.id: duplicate question id '{}'", path, q.id));
        }
        if q.options.is_empty() {
            errors.push(format!("{}.options: must not be empty", path));
        }
        if !q.weight.is_finite() || q.weight < 0.0 {
            errors.push(format!("{}.weight: must be non-negative", path));
        }

        let mut option_ids = HashSet::new();
        for (j, option) in q.options.iter().enumerate() {
            if !option_ids.insert(option.id.as_str()) {
                errors.push(format!(
                    "{}.options[{}].id: duplicate option id '{}'",
                    path, j, option.id
                ));
            }
            if !option.score.is_finite() || !(0.0..=100.0).contains(&option.score) {
                errors.push(format!(
                    "{}.options[{}].score: must be between 0 and 100",
                    path, j
                ));
            }
        }

        if q.kind == QuestionKind::Multi && !q.options.is_empty() {
            let total: f64 = q.options.iter().map(|o| o.score).sum();
            if (total - 100.0).abs() > 1e-6 {
                errors.push(format!(
                    "{}.options: multi-select scores must sum to 100 (got {})",
                    path, total
                ));
            }
        }

        if q.red_flag_threshold > q.options.len() {
            errors.push(format!(
                "{}.red_flag_threshold: {} exceeds option count {}",
                path,
                q.red_flag_threshold,
                q.options.len()
            ));
        }
    }

    let total_weight: f64 = questions.iter().map(|q| q.weight).sum();
    if !questions.is_empty() && (total_weight - 100.0).abs() > 1e-6 {
        errors.push(format!(
            "readiness: question weights must sum to 100 (got {})",
            total_weight
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::default_readiness_questions;

    #[test]
    fn test_default_questions_valid() {
        assert!(validate_questions(&default_readiness_questions()).is_ok());
    }

    #[test]
    fn test_weights_must_sum_to_100() {
        let mut questions = default_readiness_questions();
        questions[0].weight = 5.0;
        let errors = validate_questions(&questions).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("weights must sum to 100"));
    }

    #[test]
    fn test_multi_select_scores_must_sum_to_100() {
        let mut questions = default_readiness_questions();
        let multi = questions
            .iter_mut()
            .find(|q| q.kind == QuestionKind::Multi)
            .unwrap();
        multi.options[0].score = 1.0;
        let errors = validate_questions(&questions).unwrap_err();
        assert!(errors[0].contains("multi-select scores must sum to 100"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut questions = default_readiness_questions();
        questions[1].id = questions[0].id.clone(); // Error 1
        questions[0].red_flag_threshold = 99; // Error 2
        questions[0].options[0].score = 150.0; // Error 3
        let errors = validate_questions(&questions).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_option_lookup_by_id_or_label() {
        let questions = default_readiness_questions();
        let q = &questions[0];
        let (rank, by_id) = q.option(&q.options[1].id).unwrap();
        assert_eq!(rank, 1);
        let (_, by_label) = q.option(&q.options[1].label).unwrap();
        assert_eq!(by_id, by_label);
        assert!(q.option("nonsense").is_none());
    }

    #[test]
    fn test_answers_yaml_parse() {
        let yaml = r#"
customer-concentration: over-40
documented-processes: [sops, org-chart]
"#;
        let answers: ReadinessAnswers = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(
            answers["customer-concentration"],
            Answer::Single("over-40".to_string())
        );
        assert_eq!(
            answers["documented-processes"],
            Answer::Multi(vec!["sops".to_string(), "org-chart".to_string()])
        );
    }
}
