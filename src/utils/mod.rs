//! Utility modules for sector scoring
//!
//! Contains shared functionality used across multiple metrics:
//! - Text: Diacritic-insensitive name keys
//! - Coerce: Locale-formatted numbers and year extraction
//! - Normalization: Percentile ranks and min-max scaling

pub mod text;
pub mod coerce;
pub mod normalization;

// Re-export commonly used functions
pub use text::{normalize_key, contains_any};
pub use coerce::{to_number, parse_number, extract_year};
pub use normalization::{percentile_rank, minmax_scale, round_to};
