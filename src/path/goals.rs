use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Strategic exit posture.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ExitPath {
    /// Sell soon, as-is
    Quick,
    /// Spend time fixing gaps to raise the price
    #[default]
    Value,
    /// Grow toward a strategic buyer
    Strategic,
}

impl ExitPath {
    /// Declaration order, also the fallback tie-break order.
    pub const ALL: [ExitPath; 3] = [ExitPath::Quick, ExitPath::Value, ExitPath::Strategic];
}

impl std::fmt::Display for ExitPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Quick => write!(f, "Quick Sale"),
            Self::Value => write!(f, "Build Value"),
            Self::Strategic => write!(f, "Strategic Growth"),
        }
    }
}

/// A value per exit path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PathWeights {
    #[serde(default)]
    pub quick: f64,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub strategic: f64,
}

impl PathWeights {
    pub fn new(quick: f64, value: f64, strategic: f64) -> Self {
        Self {
            quick,
            value,
            strategic,
        }
    }

    pub fn get(&self, path: ExitPath) -> f64 {
        match path {
            ExitPath::Quick => self.quick,
            ExitPath::Value => self.value,
            ExitPath::Strategic => self.strategic,
        }
    }

    pub fn add(&mut self, other: &PathWeights) {
        self.quick += other.quick;
        self.value += other.value;
        self.strategic += other.strategic;
    }

    pub fn total(&self) -> f64 {
        self.quick + self.value + self.strategic
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GoalOption {
    pub id: String,
    pub label: String,
    pub weights: PathWeights,
}

/// An owner-goal question; each option votes for paths by weight.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GoalQuestion {
    pub id: String,
    pub prompt: String,
    pub options: Vec<GoalOption>,
}

impl GoalQuestion {
    /// Find an option by id, falling back to its label.
    pub fn option(&self, key: &str) -> Option<&GoalOption> {
        self.options
            .iter()
            .find(|o| o.id == key)
            .or_else(|| self.options.iter().find(|o| o.label == key))
    }
}

/// Chosen option key per goal question id.
pub type GoalAnswers = BTreeMap<String, String>;

/// Check a goal table. Returns all problems at once.
pub fn validate_goal_questions(questions: &[GoalQuestion]) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for (i, q) in questions.iter().enumerate() {
        let path = format!("goals[{}]", i);
        if !ids.insert(q.id.as_str()) {
            errors.push(format!("{}.id: duplicate question id '{}'", path, q.id));
        }
        if q.options.is_empty() {
            errors.push(format!("{}.options: must not be empty", path));
        }
        for (j, option) in q.options.iter().enumerate() {
            for p in ExitPath::ALL {
                let w = option.weights.get(p);
                if !w.is_finite() || w < 0.0 {
                    errors.push(format!(
                        "{}.options[{}].weights: {:?} weight must be non-negative",
                        path, j, p
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
