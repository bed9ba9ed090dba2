//! Real growth aggregation
//!
//! Mean inflation-adjusted growth per sector over a fixed three-year window.
//! The chain-linked volume sheet stores, for every sector, a name column and
//! two columns later its annual rate; the pattern repeats every four columns.

use crate::data::TableAccessor;
use crate::error::ScoringError;
use crate::layout::StridedGrowthLayout;
use crate::region::{Region, RegionIndex};
use crate::sector_filter::ExclusionRules;
use crate::utils::{extract_year, to_number};
use serde::Serialize;
use std::collections::BTreeMap;

/// Years averaged into a sector's growth figure
pub const GROWTH_WINDOW: [i32; 3] = [2021, 2022, 2023];

/// Growth rates for one sector within the window
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorGrowth {
    pub sector: String,
    /// Window year → rate (last value seen for that year; null when absent)
    pub growth_by_year: BTreeMap<i32, Option<f64>>,
    /// Mean of every rate found in the window; `None` when there is none
    #[serde(skip)]
    pub average: Option<f64>,
}

/// Growth for all named sector columns of a region, in column order
#[derive(Debug, Clone)]
pub struct GrowthTable {
    pub sectors: Vec<SectorGrowth>,
}

impl GrowthTable {
    /// Sectors with at least one rate in the window, with their mean
    pub fn averages(&self) -> Vec<(String, f64)> {
        self.sectors
            .iter()
            .filter_map(|s| s.average.map(|avg| (s.sector.clone(), avg)))
            .collect()
    }

    pub fn get(&self, sector: &str) -> Option<&SectorGrowth> {
        self.sectors.iter().find(|s| s.sector == sector)
    }
}

/// Collect window growth rates for a region
///
/// Aggregate columns are skipped when `rules` is given. Values outside the
/// window are ignored; a partial window is averaged over what is present.
pub fn collect_growth(
    table: &dyn TableAccessor,
    region: &Region,
    rules: Option<&ExclusionRules>,
) -> Result<GrowthTable, ScoringError> {
    let layout = StridedGrowthLayout::resolve(table)?;
    let index = RegionIndex::from_column(table, layout.region_col, layout.data_rows(table));

    let rows = index.positions(region);
    if rows.is_empty() {
        return Err(ScoringError::region_not_found(&region.display_name, "real growth"));
    }

    let window_rows: Vec<(usize, i32)> = rows
        .iter()
        .filter_map(|&row| {
            extract_year(table.cell(row, layout.year_col))
                .filter(|y| GROWTH_WINDOW.contains(y))
                .map(|y| (row, y))
        })
        .collect();

    let sectors = layout
        .pairs
        .iter()
        .filter(|(_, name)| rules.map_or(true, |r| !r.is_excluded(name)))
        .map(|(rate_col, name)| {
            let mut growth_by_year: BTreeMap<i32, Option<f64>> =
                GROWTH_WINDOW.iter().map(|y| (*y, None)).collect();
            let mut found = Vec::new();

            for &(row, year) in &window_rows {
                let rate = to_number(table.cell(row, *rate_col));
                growth_by_year.insert(year, rate);
                if let Some(rate) = rate {
                    found.push(rate);
                }
            }

            let average = if found.is_empty() {
                None
            } else {
                Some(found.iter().sum::<f64>() / found.len() as f64)
            };

            SectorGrowth {
                sector: name.trim().to_string(),
                growth_by_year,
                average,
            }
        })
        .collect();

    Ok(GrowthTable { sectors })
}
