use serde::{Deserialize, Serialize};

use crate::financials::MarginThresholds;
use crate::path::{ExitPath, GoalQuestion};
use crate::readiness::ReadinessQuestion;
use crate::valuation::{Calibration, IndustryMultipleBand};

/// Engine configuration.
///
/// Every section is optional; a missing section falls back to the built-in
/// table in [`super::defaults`].
///
/// Example YAML:
/// ```yaml
/// calibration:
///   neutral_growth_pct: 8
/// margins:
///   healthy: 0.25
///   moderate: 0.12
/// tie_break: value
/// bands:
///   - category: Landscaping
///     size_band: Small business
///     min_ebitda: 0
///     max_ebitda: 750000
///     base_multiple: 2.0
///     high_multiple: 3.5
///     typical_margin: 0.12
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calibration: Option<Calibration>,

    /// Margin cut-offs for the earnings health label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margins: Option<MarginThresholds>,

    /// Path that wins a tied recommendation (default: value)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tie_break: Option<ExitPath>,

    /// Industry multiple bands; replaces the built-in table entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bands: Option<Vec<IndustryMultipleBand>>,

    /// Readiness questions; replaces the built-in set entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness: Option<Vec<ReadinessQuestion>>,

    /// Goal questions for the path recommendation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<GoalQuestion>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::default_readiness_questions;

    #[test]
    fn test_empty_config_parse() {
        let config: EngineConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_config_parse() {
        let yaml = r#"
calibration:
  neutral_growth_pct: 8
tie_break: strategic
bands:
  - category: Landscaping
    size_band: Small business
    min_ebitda: 0
    max_ebitda: 750000
    base_multiple: 2.0
    high_multiple: 3.5
    typical_margin: 0.12
"#;
        let config: EngineConfig = serde_saphyr::from_str(yaml).unwrap();
        let calibration = config.calibration.unwrap();
        assert_eq!(calibration.neutral_growth_pct, 8.0);
        assert_eq!(calibration.growth_scale_pct, 20.0);
        assert_eq!(config.tie_break, Some(ExitPath::Strategic));
        assert_eq!(config.bands.unwrap()[0].category, "Landscaping");
        assert!(config.readiness.is_none());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "multiples: []\n";
        assert!(serde_saphyr::from_str::<EngineConfig>(yaml).is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = EngineConfig {
            tie_break: Some(ExitPath::Quick),
            readiness: Some(default_readiness_questions()),
            ..EngineConfig::default()
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: EngineConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
