//! Metric modules for sector scoring
//!
//! Each stage of the per-region computation lives in its own module:
//! shares and growth feed the combiner; health and the auxiliary indicators
//! feed the opportunity rules.

pub mod share;
pub mod growth;
pub mod combine;
pub mod health;
pub mod auxiliary;
pub mod opportunity;

// Re-export metric functions
pub use share::{compute_nominal_shares, latest_sector_values, NominalShares, SectorValue};
pub use growth::{collect_growth, GrowthTable, SectorGrowth, GROWTH_WINDOW};
pub use combine::{combine_scores, SectorRecord, FORMULA_NOTE};
pub use health::{per_100k, HealthMetric, WorkforceCounts, WorkforceTable, DOCTOR_THRESHOLD, NURSE_THRESHOLD};
pub use auxiliary::{
    agricultural_area, foreign_sales_total, housing_sales_total, unemployment_rate, Indicators, RankedValue,
    HOUSING_TARGET_YEAR,
};
pub use opportunity::{detect_opportunities, OpportunityInputs, OpportunityKind, OpportunitySignal};
