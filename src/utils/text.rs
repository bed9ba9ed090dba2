//! Text Normalization
//!
//! Region and sector names arrive from several independently-maintained
//! tables with inconsistent casing, diacritics, and padding. Everything that
//! compares names goes through [`normalize_key`].

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Derive the comparison key for a name
///
/// Algorithm:
/// 1. Canonical decomposition (NFD) so that `ç` becomes `c` + combining cedilla
/// 2. Drop every combining mark
/// 3. Trim surrounding whitespace and lower-case
///
/// Only simple lower-casing is applied. Characters without a decomposition
/// (e.g. dotless `ı`) are kept as-is.
pub fn normalize_key(text: &str) -> String {
    let stripped: String = text.nfd().filter(|ch| !is_combining_mark(*ch)).collect();
    stripped.trim().to_lowercase()
}

/// True when the normalized label contains any of the keywords
///
/// Keywords are expected to be normalized already.
pub fn contains_any(key: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| key.contains(k))
}
