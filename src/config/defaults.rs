//! Built-in data tables used when a config file leaves a section out.
//!
//! New industries, questions or goals go here (or in the YAML config); the
//! evaluation code never branches on them.

use crate::path::{GoalOption, GoalQuestion, PathWeights};
use crate::readiness::{AnswerOption, QuestionKind, ReadinessQuestion};
use crate::valuation::IndustryMultipleBand;

/// Size bands shared by every industry: label, min EBITDA, max EBITDA.
const SIZE_BANDS: [(&str, f64, f64); 3] = [
    ("Small business", 0.0, 500_000.0),
    ("Lower middle market", 500_000.0, 2_000_000.0),
    ("Middle market", 2_000_000.0, 10_000_000.0),
];

/// category, subcategory, typical margin, (base, high) per size band
type IndustryRow = (&'static str, Option<&'static str>, f64, [(f64, f64); 3]);

const INDUSTRIES: [IndustryRow; 10] = [
    (
        "Professional Services",
        None,
        0.18,
        [(2.0, 3.5), (4.0, 6.5), (6.0, 8.5)],
    ),
    (
        "Professional Services",
        Some("Marketing Agency"),
        0.15,
        [(1.8, 3.2), (3.5, 6.0), (5.5, 8.0)],
    ),
    (
        "Technology",
        None,
        0.22,
        [(3.0, 5.0), (5.0, 8.0), (7.0, 11.0)],
    ),
    (
        "Technology",
        Some("SaaS"),
        0.25,
        [(4.0, 7.0), (6.0, 10.0), (8.0, 14.0)],
    ),
    (
        "Manufacturing",
        None,
        0.14,
        [(2.5, 4.0), (4.0, 6.0), (5.5, 7.5)],
    ),
    ("Retail", None, 0.08, [(1.5, 3.0), (3.0, 4.5), (4.0, 6.0)]),
    (
        "Retail",
        Some("E-commerce"),
        0.12,
        [(2.0, 3.5), (3.5, 5.5), (5.0, 7.5)],
    ),
    (
        "Healthcare",
        None,
        0.16,
        [(2.5, 4.5), (4.5, 7.0), (6.5, 9.5)],
    ),
    (
        "Construction",
        None,
        0.10,
        [(2.0, 3.5), (3.0, 5.0), (4.5, 6.5)],
    ),
    (
        "Hospitality",
        None,
        0.12,
        [(1.5, 3.0), (3.0, 4.5), (4.0, 6.0)],
    ),
];

pub fn default_bands() -> Vec<IndustryMultipleBand> {
    INDUSTRIES
        .iter()
        .flat_map(|(category, subcategory, margin, multiples)| {
            SIZE_BANDS
                .iter()
                .zip(multiples.iter())
                .map(move |((size, min, max), (base, high))| IndustryMultipleBand {
                    category: category.to_string(),
                    subcategory: subcategory.map(String::from),
                    size_band: size.to_string(),
                    min_ebitda: *min,
                    max_ebitda: *max,
                    base_multiple: *base,
                    high_multiple: *high,
                    typical_margin: *margin,
                })
        })
        .collect()
}

fn options(rows: &[(&str, &str, f64)]) -> Vec<AnswerOption> {
    rows.iter()
        .map(|(id, label, score)| AnswerOption {
            id: id.to_string(),
            label: label.to_string(),
            score: *score,
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn question(
    id: &str,
    category: &str,
    prompt: &str,
    kind: QuestionKind,
    weight: f64,
    red_flag_threshold: usize,
    rows: &[(&str, &str, f64)],
    remediation: &str,
) -> ReadinessQuestion {
    ReadinessQuestion {
        id: id.to_string(),
        category: category.to_string(),
        prompt: prompt.to_string(),
        kind,
        options: options(rows),
        weight,
        red_flag_threshold,
        remediation: Some(remediation.to_string()),
    }
}

/// Weights sum to 100. Single-select options run best to worst.
pub fn default_readiness_questions() -> Vec<ReadinessQuestion> {
    vec![
        question(
            "customer-concentration",
            "Customers",
            "What share of revenue comes from your largest customer?",
            QuestionKind::Single,
            20.0,
            3,
            &[
                ("under-10", "Under 10%", 100.0),
                ("10-25", "10-25%", 70.0),
                ("25-40", "25-40%", 35.0),
                ("over-40", "Over 40%", 0.0),
            ],
            "Diversify revenue so no single customer exceeds 25% before going to market",
        ),
        question(
            "owner-dependency",
            "Owner",
            "How much of the business depends on you personally?",
            QuestionKind::Single,
            20.0,
            3,
            &[
                ("runs-without-me", "Runs without me", 100.0),
                ("key-decisions", "Key decisions only", 70.0),
                ("day-to-day", "Day-to-day operations", 30.0),
                ("everything", "Everything", 0.0),
            ],
            "Delegate daily operations and document what only you know",
        ),
        question(
            "financial-records",
            "Financials",
            "How are your financial statements prepared?",
            QuestionKind::Single,
            15.0,
            3,
            &[
                ("audited", "Audited", 100.0),
                ("reviewed", "Reviewed by a CPA", 75.0),
                ("internal", "Internal bookkeeping", 40.0),
                ("incomplete", "Incomplete or behind", 0.0),
            ],
            "Bring the books current and get at least a CPA review of the last three years",
        ),
        question(
            "recurring-revenue",
            "Revenue",
            "How much of your revenue is recurring or contracted?",
            QuestionKind::Single,
            10.0,
            3,
            &[
                ("over-50", "Over 50%", 100.0),
                ("25-50", "25-50%", 65.0),
                ("under-25", "Under 25%", 30.0),
                ("none", "None", 0.0),
            ],
            "Move repeat customers onto contracts, retainers or subscriptions",
        ),
        question(
            "management-team",
            "Team",
            "Who runs the business below you?",
            QuestionKind::Single,
            10.0,
            2,
            &[
                ("full-team", "A full leadership team", 100.0),
                ("some-managers", "Some key managers", 60.0),
                ("no-managers", "No managers", 0.0),
            ],
            "Hire or promote a second-in-command a buyer can rely on",
        ),
        question(
            "documented-processes",
            "Operations",
            "Which of these are documented and current?",
            QuestionKind::Multi,
            15.0,
            2,
            &[
                ("sops", "Standard operating procedures", 20.0),
                ("org-chart", "Org chart with roles", 20.0),
                ("crm", "Customer records in a CRM", 20.0),
                ("vendor-contracts", "Vendor contracts", 20.0),
                ("employee-agreements", "Employee agreements", 20.0),
            ],
            "Write down core processes so the business can be handed over",
        ),
        question(
            "legal-readiness",
            "Legal",
            "Which of these are true today?",
            QuestionKind::Multi,
            10.0,
            2,
            &[
                ("clean-cap-table", "Ownership records are clean", 25.0),
                ("ip-assigned", "IP is owned by the company", 25.0),
                ("no-litigation", "No pending litigation", 25.0),
                ("contracts-assignable", "Key contracts are assignable", 25.0),
            ],
            "Have counsel review ownership, IP and contract assignability",
        ),
    ]
}

fn goal(id: &str, prompt: &str, rows: &[(&str, &str, [f64; 3])]) -> GoalQuestion {
    GoalQuestion {
        id: id.to_string(),
        prompt: prompt.to_string(),
        options: rows
            .iter()
            .map(|(id, label, [q, v, s])| GoalOption {
                id: id.to_string(),
                label: label.to_string(),
                weights: PathWeights::new(*q, *v, *s),
            })
            .collect(),
    }
}

/// Option weights are [quick, value, strategic].
pub fn default_goal_questions() -> Vec<GoalQuestion> {
    vec![
        goal(
            "timeline",
            "When would you like to exit?",
            &[
                ("within-12-months", "Within 12 months", [3.0, 1.0, 0.0]),
                ("1-3-years", "In 1-3 years", [1.0, 3.0, 1.0]),
                ("3-plus-years", "3+ years from now", [0.0, 1.0, 3.0]),
            ],
        ),
        goal(
            "priority",
            "What matters most in the sale?",
            &[
                ("clean-break", "A clean, fast break", [3.0, 1.0, 0.0]),
                ("legacy", "Protecting employees and legacy", [1.0, 3.0, 1.0]),
                ("max-price", "The highest possible price", [0.0, 2.0, 3.0]),
            ],
        ),
        goal(
            "involvement",
            "How involved do you want to be after the sale?",
            &[
                ("leave", "Leave immediately", [3.0, 0.0, 1.0]),
                ("transition", "A transition period", [1.0, 3.0, 1.0]),
                ("stay-and-grow", "Stay on and help it grow", [0.0, 1.0, 3.0]),
            ],
        ),
        goal(
            "risk",
            "How do you feel about risk in the deal?",
            &[
                ("certainty", "Certainty now", [3.0, 1.0, 0.0]),
                ("balanced", "Balanced", [1.0, 3.0, 1.0]),
                ("upside", "Bet on the upside", [0.0, 1.0, 3.0]),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_industry_has_three_size_bands() {
        let bands = default_bands();
        assert_eq!(bands.len(), INDUSTRIES.len() * SIZE_BANDS.len());
        for band in &bands {
            assert!(band.min_ebitda < band.max_ebitda);
            assert!(band.base_multiple <= band.high_multiple);
        }
    }

    #[test]
    fn test_readiness_weights_sum_to_100() {
        let total: f64 = default_readiness_questions().iter().map(|q| q.weight).sum();
        assert_eq!(total, 100.0);
    }

    #[test]
    fn test_goal_tables_cover_all_paths() {
        for q in default_goal_questions() {
            assert_eq!(q.options.len(), 3);
        }
    }
}
