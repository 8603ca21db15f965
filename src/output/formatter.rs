use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::case::ExitReport;
use crate::financials::{MarginHealth, NormalizedEarnings};
use crate::path::{ExitPath, PathRecommendation};
use crate::readiness::{ReadinessAssessment, ReadinessCategory};
use crate::scenario::{Change, ScenarioResult};
use crate::valuation::{Signal, ValuationHealth, ValuationOutcome, ValuationResult};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a dollar amount in compact notation ($680k, $4.3M, $950)
pub fn format_money(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();
    // Unit is chosen after rounding so 999_960 reads "1M", not "1000k"
    let thousands = (abs / 100.0).round() / 10.0;
    let formatted = if thousands >= 1_000.0 {
        format!("{:.1}M", abs / 1_000_000.0)
    } else if abs.round() >= 1_000.0 {
        format!("{:.1}k", thousands)
    } else {
        format!("{:.0}", abs)
    };

    // Trim trailing .0 (e.g., "1.0k" -> "1k")
    let trimmed = formatted.replace(".0M", "M").replace(".0k", "k");
    format!("{}${}", sign, trimmed)
}

/// Signed change, e.g. "+$95k (+14.0%)"
pub fn format_change(change: &Change) -> String {
    let sign = if change.absolute > 0.0 { "+" } else { "" };
    match change.percent {
        Some(pct) => format!(
            "{}{} ({}{:.1}%)",
            sign,
            format_money(change.absolute),
            if pct > 0.0 { "+" } else { "" },
            pct
        ),
        None => format!("{}{} (n/a)", sign, format_money(change.absolute)),
    }
}

fn paint(text: &str, signal: Signal, use_colors: bool) -> String {
    if !use_colors {
        return text.to_string();
    }
    match signal {
        Signal::Red => text.red().bold().to_string(),
        Signal::Yellow => text.yellow().bold().to_string(),
        Signal::Green => text.green().bold().to_string(),
    }
}

fn margin_signal(health: MarginHealth) -> Signal {
    match health {
        MarginHealth::Healthy => Signal::Green,
        MarginHealth::Moderate => Signal::Yellow,
        MarginHealth::Weak => Signal::Red,
    }
}

fn readiness_signal(category: ReadinessCategory) -> Signal {
    match category {
        ReadinessCategory::CriticalGaps => Signal::Red,
        ReadinessCategory::FixableRisks => Signal::Yellow,
        ReadinessCategory::ExitReady => Signal::Green,
    }
}

fn heading(title: &str, use_colors: bool) -> String {
    if use_colors {
        title.bold().underline().to_string()
    } else {
        title.to_string()
    }
}

/// Horizontal rule sized to the terminal, 60 columns when piped
fn rule() -> String {
    let width = terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(60)
        .min(80);
    "-".repeat(width)
}

pub fn format_earnings(earnings: &NormalizedEarnings, use_colors: bool) -> String {
    let mut lines = vec![heading("Earnings", use_colors)];
    lines.push(format!("  Gross profit:     {}", format_money(earnings.gross_profit)));
    lines.push(format!("  Base EBITDA:      {}", format_money(earnings.base_ebitda)));
    for total in &earnings.addbacks_by_category {
        lines.push(format!("    + {:<22}{}", total.name, format_money(total.amount)));
    }
    lines.push(format!("  Add-backs:        {}", format_money(earnings.total_addbacks)));
    lines.push(format!("  Adjusted EBITDA:  {}", format_money(earnings.adjusted_ebitda)));

    let health = paint(
        &earnings.health.to_string(),
        margin_signal(earnings.health),
        use_colors,
    );
    if earnings.margin_undefined {
        lines.push(format!("  Margin:           n/a (no revenue) {}", health));
    } else {
        lines.push(format!(
            "  Margin:           {:.1}% {}",
            earnings.margin * 100.0,
            health
        ));
    }
    lines.join("\n")
}

fn format_valuation_result(result: &ValuationResult, use_colors: bool) -> Vec<String> {
    let band = match &result.band.subcategory {
        Some(sub) => format!("{} / {} ({})", result.band.category, sub, result.band.size_band),
        None => format!("{} ({})", result.band.category, result.band.size_band),
    };
    let health = paint(
        &result.health.to_string(),
        result.health.signal(),
        use_colors,
    );
    let factors = &result.adjustment_factors;
    let mut lines = vec![
        format!("  Band:             {}", band),
        format!(
            "  Multiple:         {:.2}x (band {:.1}x - {:.1}x{})",
            result.adjusted_multiple,
            result.base_multiple,
            result.high_multiple,
            if result.clamped { ", clamped" } else { "" }
        ),
        format!(
            "  Factors:          recurring {:+.2}, concentration {:+.2}, growth {:+.2}",
            factors.recurring, factors.concentration, factors.growth
        ),
        format!("  Enterprise value: {}", format_money(result.enterprise_value)),
        format!(
            "  Comparables:      {} / {} / {}",
            format_money(result.comparable_range.low),
            format_money(result.comparable_range.median),
            format_money(result.comparable_range.high)
        ),
        format!("  Health:           {} ({:.0}% into band)", health, result.position * 100.0),
    ];
    if result.health == ValuationHealth::BelowMarket {
        lines.push("  Valuation sits in the bottom third of its band.".to_string());
    }
    lines
}

pub fn format_valuation(outcome: &ValuationOutcome, use_colors: bool) -> String {
    let mut lines = vec![heading("Valuation", use_colors)];
    match outcome {
        ValuationOutcome::Available(result) => {
            lines.extend(format_valuation_result(result, use_colors));
        }
        ValuationOutcome::Unavailable { reason, detail } => {
            lines.push(format!("  Unavailable ({}): {}", reason, detail));
        }
    }
    lines.join("\n")
}

pub fn format_readiness(assessment: &ReadinessAssessment, use_colors: bool) -> String {
    let mut lines = vec![heading("Exit readiness", use_colors)];
    let category = paint(
        &assessment.category.to_string(),
        readiness_signal(assessment.category),
        use_colors,
    );
    let mut score_line = format!("  Score:            {}/100 {}", assessment.score, category);
    if assessment.incomplete {
        score_line.push_str(&format!(
            " (partial, {:.0}% of weight answered)",
            assessment.answered_weight
        ));
    }
    lines.push(score_line);
    if let Some(change) = assessment.change_since_previous {
        lines.push(format!("  Since last time:  {:+}", change));
    }

    if !assessment.red_flags.is_empty() {
        let flags = assessment.red_flags.join(", ");
        lines.push(format!(
            "  Red flags:        {}",
            paint(&flags, Signal::Red, use_colors)
        ));
    }
    for item in &assessment.action_items {
        lines.push(format!("    - {}", item.text));
    }
    lines.join("\n")
}

pub fn format_path(recommendation: &PathRecommendation, use_colors: bool) -> String {
    let mut lines = vec![heading("Exit path", use_colors)];
    let recommended = recommendation.recommended.to_string();
    let recommended = if use_colors {
        recommended.cyan().bold().to_string()
    } else {
        recommended
    };
    let mut line = format!("  Recommended:      {}", recommended);
    if recommendation.tie_broken {
        line.push_str(" (tie)");
    }
    lines.push(line);
    for path in ExitPath::ALL {
        lines.push(format!(
            "    {:<18}{:>5.1} ({:.0}%)",
            path.to_string(),
            recommendation.totals.get(path),
            recommendation.shares.get(path) * 100.0
        ));
    }
    lines.join("\n")
}

pub fn format_scenario(result: &ScenarioResult, use_colors: bool) -> String {
    let title = format!("Scenario: {}", result.name.as_deref().unwrap_or("what-if"));
    let mut lines = vec![heading(&title, use_colors)];
    lines.push(format!(
        "  Adjusted EBITDA:  {} {}",
        format_money(result.evaluation.earnings.adjusted_ebitda),
        format_change(&result.ebitda_change)
    ));
    match (&result.evaluation.valuation, &result.value_change) {
        (ValuationOutcome::Available(valuation), Some(change)) => lines.push(format!(
            "  Enterprise value: {} {}",
            format_money(valuation.enterprise_value),
            format_change(change)
        )),
        (ValuationOutcome::Available(valuation), None) => lines.push(format!(
            "  Enterprise value: {} (no baseline valuation)",
            format_money(valuation.enterprise_value)
        )),
        (ValuationOutcome::Unavailable { reason, detail }, _) => {
            lines.push(format!("  Valuation unavailable ({}): {}", reason, detail))
        }
    }
    lines.join("\n")
}

/// Format a full report for the terminal
pub fn format_report(report: &ExitReport, use_colors: bool) -> String {
    let separator = rule();
    let mut sections = Vec::new();

    if let Some(name) = &report.name {
        sections.push(if use_colors {
            name.bold().to_string()
        } else {
            name.clone()
        });
    }
    sections.push(format_earnings(&report.evaluation.earnings, use_colors));
    sections.push(format_valuation(&report.evaluation.valuation, use_colors));
    if let Some(readiness) = &report.readiness {
        sections.push(format_readiness(readiness, use_colors));
    }
    if let Some(path) = &report.path {
        sections.push(format_path(path, use_colors));
    }
    for scenario in &report.scenarios {
        sections.push(format_scenario(scenario, use_colors));
    }

    sections.join(&format!("\n{}\n", separator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::financials::{AddBack, AddBackCategory, FinancialStatement};
    use crate::scenario::ScenarioDelta;
    use crate::valuation::CompanyProfile;

    fn statement() -> FinancialStatement {
        FinancialStatement::new(2_500_000.0, 1_100_000.0, 950_000.0)
            .with_addback(AddBack::new(AddBackCategory::OwnerSalary, 175_000.0))
            .with_addback(AddBack::custom("Rebrand", 55_000.0))
    }

    fn profile() -> CompanyProfile {
        CompanyProfile {
            industry_category: "Professional Services".to_string(),
            industry_subcategory: None,
            annual_revenue: 0.0,
            ebitda: 0.0,
            recurring_revenue_pct: 40.0,
            customer_concentration_pct: 30.0,
            years_in_business: 10,
            growth_rate_pct: 8.0,
        }
    }

    #[test]
    fn test_format_money_small() {
        assert_eq!(format_money(950.0), "$950");
    }

    #[test]
    fn test_format_money_zero() {
        assert_eq!(format_money(0.0), "$0");
    }

    #[test]
    fn test_format_money_thousands() {
        assert_eq!(format_money(680_000.0), "$680k");
        assert_eq!(format_money(1_500.0), "$1.5k");
    }

    #[test]
    fn test_format_money_millions() {
        assert_eq!(format_money(1_000_000.0), "$1M");
        assert_eq!(format_money(4_300_000.0), "$4.3M");
    }

    #[test]
    fn test_format_money_rounds_up_into_next_unit() {
        assert_eq!(format_money(999_960.0), "$1M");
        assert_eq!(format_money(999_940.0), "$999.9k");
        assert_eq!(format_money(999.6), "$1k");
        assert_eq!(format_money(-999_999.0), "-$1M");
    }

    #[test]
    fn test_format_money_negative() {
        assert_eq!(format_money(-95_000.0), "-$95k");
    }

    #[test]
    fn test_format_change() {
        let change = Change {
            absolute: 95_000.0,
            percent: Some(14.0),
        };
        assert_eq!(format_change(&change), "+$95k (+14.0%)");

        let change = Change {
            absolute: -2_000.0,
            percent: None,
        };
        assert_eq!(format_change(&change), "-$2k (n/a)");
    }

    #[test]
    fn test_format_earnings_plain() {
        let earnings = Engine::default().normalize(&statement()).unwrap();
        let text = format_earnings(&earnings, false);
        assert!(text.contains("Adjusted EBITDA:  $680k"));
        assert!(text.contains("Owner salary"));
        assert!(text.contains("Rebrand"));
        assert!(text.contains("27.2% Healthy"));
    }

    #[test]
    fn test_format_valuation_unavailable() {
        let outcome = ValuationOutcome::Unavailable {
            reason: crate::error::ReasonCode::NoBandFound,
            detail: "no multiple band for X".to_string(),
        };
        let text = format_valuation(&outcome, false);
        assert!(text.contains("Unavailable (no_band_found)"));
    }

    #[test]
    fn test_format_scenario() {
        let delta = ScenarioDelta {
            opex_change_pct: -10.0,
            ..ScenarioDelta::default()
        };
        let result = Engine::default()
            .simulate(&statement(), &profile(), &delta)
            .unwrap();
        let text = format_scenario(&result, false);
        assert!(text.starts_with("Scenario: what-if"));
        assert!(text.contains("$775k +$95k"));
    }

    #[test]
    fn test_format_report_sections() {
        let engine = Engine::default();
        let report = ExitReport {
            name: Some("Acme".to_string()),
            evaluation: engine.evaluate(&statement(), &profile()).unwrap(),
            readiness: None,
            path: Some(engine.recommend_path(&Default::default()).unwrap()),
            scenarios: Vec::new(),
        };
        let text = format_report(&report, false);
        assert!(text.starts_with("Acme"));
        assert!(text.contains("Valuation"));
        assert!(text.contains("Recommended:      Build Value (tie)"));
        assert!(!text.contains("Exit readiness"));
    }
}
