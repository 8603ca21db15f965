use serde::{Deserialize, Serialize};

use crate::error::ReasonCode;

/// Raw income statement figures plus owner add-backs.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FinancialStatement {
    pub revenue: f64,
    pub cogs: f64,
    pub opex: f64,
    #[serde(default)]
    pub addbacks: Vec<AddBack>,
}

impl FinancialStatement {
    pub fn new(revenue: f64, cogs: f64, opex: f64) -> Self {
        Self {
            revenue,
            cogs,
            opex,
            addbacks: Vec::new(),
        }
    }

    pub fn with_addback(mut self, addback: AddBack) -> Self {
        self.addbacks.push(addback);
        self
    }

    /// Sum of all add-back amounts for one canonical category.
    pub fn addbacks_for(&self, category: AddBackCategory) -> f64 {
        self.addbacks
            .iter()
            .filter(|a| a.category == category)
            .map(|a| a.amount)
            .sum()
    }
}

/// Canonical add-back categories. Anything else goes in as `Custom` with a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddBackCategory {
    OwnerSalary,
    PersonalVehicle,
    TravelMeals,
    LegalFees,
    OtherNonRecurring,
    Custom,
}

impl AddBackCategory {
    pub const CANONICAL: [AddBackCategory; 5] = [
        AddBackCategory::OwnerSalary,
        AddBackCategory::PersonalVehicle,
        AddBackCategory::TravelMeals,
        AddBackCategory::LegalFees,
        AddBackCategory::OtherNonRecurring,
    ];
}

impl std::fmt::Display for AddBackCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OwnerSalary => write!(f, "Owner salary"),
            Self::PersonalVehicle => write!(f, "Personal vehicle"),
            Self::TravelMeals => write!(f, "Travel & meals"),
            Self::LegalFees => write!(f, "Legal fees"),
            Self::OtherNonRecurring => write!(f, "Other non-recurring"),
            Self::Custom => write!(f, "Custom"),
        }
    }
}

/// A single add-back line.
///
/// `label` is required for `Custom` entries and optional otherwise.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AddBack {
    pub category: AddBackCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub amount: f64,
}

impl AddBack {
    pub fn new(category: AddBackCategory, amount: f64) -> Self {
        Self {
            category,
            label: None,
            amount,
        }
    }

    pub fn custom(label: impl Into<String>, amount: f64) -> Self {
        Self {
            category: AddBackCategory::Custom,
            label: Some(label.into()),
            amount,
        }
    }

    /// Name shown in summaries: the label for custom entries, the category otherwise.
    pub fn display_name(&self) -> String {
        match (&self.category, &self.label) {
            (AddBackCategory::Custom, Some(label)) => label.clone(),
            (category, _) => category.to_string(),
        }
    }
}

/// Margin health label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum MarginHealth {
    Healthy,
    Moderate,
    Weak,
}

impl std::fmt::Display for MarginHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "Healthy"),
            Self::Moderate => write!(f, "Moderate"),
            Self::Weak => write!(f, "Weak"),
        }
    }
}

/// One line of the add-back summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddBackTotal {
    pub name: String,
    pub category: AddBackCategory,
    pub amount: f64,
}

/// Earnings derived from a [`FinancialStatement`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEarnings {
    pub gross_profit: f64,
    pub base_ebitda: f64,
    pub total_addbacks: f64,
    pub adjusted_ebitda: f64,
    /// Adjusted EBITDA over revenue; 0 when revenue is 0.
    pub margin: f64,
    pub margin_undefined: bool,
    pub health: MarginHealth,
    pub addbacks_by_category: Vec<AddBackTotal>,
    /// [`ReasonCode::MarginUndefined`] when revenue is 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReasonCode>,
}
