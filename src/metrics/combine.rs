//! Attractiveness score
//!
//! score = 0.5 × minmax(nominal share) + 0.5 × minmax(mean real growth)
//!
//! Only sectors present in both the share and growth data are scored.

use crate::error::ScoringError;
use crate::metrics::growth::{GrowthTable, GROWTH_WINDOW};
use crate::metrics::share::NominalShares;
use crate::utils::{minmax_scale, round_to};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

pub const SHARE_WEIGHT: f64 = 0.5;
pub const GROWTH_WEIGHT: f64 = 0.5;

/// Human-readable description of the scoring formula
pub const FORMULA_NOTE: &str = "Score = 0.5 x min-max(output share) + 0.5 x min-max(2021-2023 mean real growth). \
Aggregates such as totals, GDP and taxes are excluded.";

/// A scored sector
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorRecord {
    pub sector: String,
    pub nominal_value: f64,
    pub nominal_share: f64,
    pub growth_by_year: BTreeMap<i32, Option<f64>>,
    pub avg_growth: f64,
    /// In [0, 1], four decimals
    pub score: f64,
    pub rationale: Vec<String>,
}

/// Combine shares and growth into a ranked sector list
///
/// Sectors are visited in ascending name order and then stably sorted by
/// descending score, so equal scores stay in name order.
pub fn combine_scores(shares: &NominalShares, growth: &GrowthTable) -> Result<Vec<SectorRecord>, ScoringError> {
    let share_map: BTreeMap<String, (f64, f64)> = shares
        .values
        .iter()
        .map(|v| (v.sector.clone(), (v.value, v.value / shares.total)))
        .collect();
    let growth_map: BTreeMap<String, f64> = growth.averages().into_iter().collect();

    let common: BTreeSet<&String> = share_map.keys().filter(|k| growth_map.contains_key(*k)).collect();
    if common.is_empty() {
        return Err(ScoringError::NoCommonSectors);
    }

    let share_values: Vec<f64> = common.iter().map(|s| share_map[*s].1).collect();
    let growth_values: Vec<f64> = common.iter().map(|s| growth_map[*s]).collect();
    let share_scaled = minmax_scale(&share_values);
    let growth_scaled = minmax_scale(&growth_values);

    let mut records: Vec<SectorRecord> = common
        .iter()
        .enumerate()
        .map(|(i, sector)| {
            let (nominal_value, share) = share_map[*sector];
            let avg_growth = growth_values[i];
            let score = SHARE_WEIGHT * share_scaled[i] + GROWTH_WEIGHT * growth_scaled[i];

            SectorRecord {
                sector: (*sector).clone(),
                nominal_value,
                nominal_share: round_to(share, 6),
                growth_by_year: growth
                    .get(sector)
                    .map(|g| g.growth_by_year.clone())
                    .unwrap_or_default(),
                avg_growth: round_to(avg_growth, 6),
                score: round_to(score, 4),
                rationale: vec![
                    format!("Output share: {:.1}%", share * 100.0),
                    format!(
                        "Average real growth ({}-{}): {:.2}%",
                        GROWTH_WINDOW[0],
                        GROWTH_WINDOW[GROWTH_WINDOW.len() - 1],
                        avg_growth
                    ),
                ],
            }
        })
        .collect();

    records.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(records)
}
