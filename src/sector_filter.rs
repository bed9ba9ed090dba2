//! Aggregate-category exclusion
//!
//! Output tables mix individual sectors with rollups (totals, GDP, taxes,
//! subsidies) and classification group codes. Only individual sectors are
//! scored. The rules are data, kept in [`ExclusionRules`] so they can be
//! versioned and tested apart from the scoring code.

use crate::utils::normalize_key;
use once_cell::sync::Lazy;
use serde::Serialize;

/// Keyword/code rule table for aggregate labels
#[derive(Debug, Clone, Serialize)]
pub struct ExclusionRules {
    pub version: u32,
    /// A normalized label containing any keyword is excluded
    pub keywords: Vec<String>,
    /// A normalized label exactly equal to a code is excluded
    pub codes: Vec<String>,
}

impl ExclusionRules {
    pub fn new(version: u32, keywords: &[&str], codes: &[&str]) -> Self {
        Self {
            version,
            keywords: keywords.iter().map(|k| normalize_key(k)).collect(),
            codes: codes.iter().map(|c| normalize_key(c)).collect(),
        }
    }

    /// Default rules for the regional accounts tables
    pub fn regional_accounts() -> Self {
        Self::new(
            1,
            &[
                // year headers
                "yil", "yıl", "year",
                // totals
                "toplam", "total", "tamami", "tamamı",
                // GDP / gross value added
                "gsyh", "gayrisafi", "gdp", "gross value added",
                // general government rollups
                "genel", "general",
                // taxes and subsidies
                "vergi", "tax", "subvansiyon", "subsid",
            ],
            // classification group codes, plus the literal "nan" of blank headers
            &["a", "b", "c", "d", "e", "f", "g", "mn", "opq", "o", "p", "q", "nan"],
        )
    }

    /// True when the label is an aggregate or otherwise non-investable
    ///
    /// Short lowercase alphabetic labels are only excluded when they are a
    /// known aggregate code; any other short label is a legitimate sector name.
    pub fn is_excluded(&self, label: &str) -> bool {
        let key = normalize_key(label);
        if key.is_empty() {
            return true;
        }
        if self.keywords.iter().any(|k| key.contains(k.as_str())) {
            return true;
        }
        self.codes.iter().any(|c| *c == key)
    }
}

static DEFAULT_RULES: Lazy<ExclusionRules> = Lazy::new(ExclusionRules::regional_accounts);

/// Default rule table
pub fn default_rules() -> &'static ExclusionRules {
    &DEFAULT_RULES
}

/// [`ExclusionRules::is_excluded`] against the default table
pub fn is_excluded(label: &str) -> bool {
    DEFAULT_RULES.is_excluded(label)
}
