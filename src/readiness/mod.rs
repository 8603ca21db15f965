pub mod questions;
pub mod scorer;

pub use questions::{
    validate_questions, Answer, AnswerOption, QuestionKind, ReadinessAnswers, ReadinessQuestion,
};
pub use scorer::{
    score_readiness, ActionItem, QuestionScore, ReadinessAssessment, ReadinessCategory,
};
