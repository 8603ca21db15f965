use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Industry- and size-specific EBITDA multiple range.
///
/// A band covers EBITDA in the half-open interval `[min_ebitda, max_ebitda)`.
///
/// Example YAML:
/// ```yaml
/// bands:
///   - category: Technology
///     subcategory: SaaS
///     size_band: Lower middle market
///     min_ebitda: 500000
///     max_ebitda: 2000000
///     base_multiple: 5.5
///     high_multiple: 9.0
///     typical_margin: 0.25
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IndustryMultipleBand {
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub size_band: String,
    pub min_ebitda: f64,
    pub max_ebitda: f64,
    pub base_multiple: f64,
    pub high_multiple: f64,
    pub typical_margin: f64,
}

impl IndustryMultipleBand {
    pub fn covers(&self, ebitda: f64) -> bool {
        self.min_ebitda <= ebitda && ebitda < self.max_ebitda
    }

    fn matches(&self, category: &str, subcategory: Option<&str>, ebitda: f64) -> bool {
        if self.category != category {
            return false;
        }
        // Subcategory only constrains the match when the caller names one
        if let Some(sub) = subcategory {
            if self.subcategory.as_deref() != Some(sub) {
                return false;
            }
        }
        self.covers(ebitda)
    }

    /// Resolution order: category, subcategory (none first), then min_ebitda.
    fn resolution_order(&self, other: &Self) -> Ordering {
        self.category
            .cmp(&other.category)
            .then_with(|| self.subcategory.cmp(&other.subcategory))
            .then_with(|| self.min_ebitda.total_cmp(&other.min_ebitda))
    }
}

/// Find the band that applies to a company.
///
/// Returns `None` when no band matches, which is an expected outcome for
/// uncovered industries or EBITDA outside every band. When several bands
/// match, the first in `(category, subcategory, min_ebitda)` order wins;
/// exact duplicates resolve to the earliest in `bands`.
pub fn resolve_band<'a>(
    bands: &'a [IndustryMultipleBand],
    category: &str,
    subcategory: Option<&str>,
    ebitda: f64,
) -> Option<&'a IndustryMultipleBand> {
    let resolved = bands
        .iter()
        .filter(|b| b.matches(category, subcategory, ebitda))
        .min_by(|a, b| a.resolution_order(b));

    match resolved {
        Some(band) => tracing::debug!(
            category,
            subcategory = band.subcategory.as_deref().unwrap_or("-"),
            size_band = %band.size_band,
            ebitda,
            "resolved multiple band"
        ),
        None => tracing::debug!(
            category,
            subcategory = subcategory.unwrap_or("-"),
            ebitda,
            "no multiple band covers company"
        ),
    }

    resolved
}
