pub mod goals;
pub mod voter;

pub use goals::{
    validate_goal_questions, ExitPath, GoalAnswers, GoalOption, GoalQuestion, PathWeights,
};
pub use voter::{recommend_path, PathRecommendation};
