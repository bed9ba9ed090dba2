//! Nominal output shares
//!
//! Each sector's share of a region's total current-price output for the
//! latest year the region reports.

use crate::data::TableAccessor;
use crate::error::ScoringError;
use crate::layout::SectorPanelLayout;
use crate::region::{Region, RegionIndex};
use crate::sector_filter::ExclusionRules;
use crate::utils::{extract_year, to_number};
use serde::Serialize;

/// A sector's nominal value in the selected year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorValue {
    pub sector: String,
    pub value: f64,
}

/// Result of the share computation for one region
#[derive(Debug, Clone)]
pub struct NominalShares {
    pub year: i32,
    /// Included sectors in column order
    pub values: Vec<SectorValue>,
    pub total: f64,
    /// Rows that also carried the latest year and were ignored
    pub duplicate_rows: usize,
}

impl NominalShares {
    pub fn share(&self, sector: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|v| v.sector == sector)
            .map(|v| v.value / self.total)
    }

    /// (sector, share) pairs in column order
    pub fn shares(&self) -> Vec<(String, f64)> {
        self.values
            .iter()
            .map(|v| (v.sector.clone(), v.value / self.total))
            .collect()
    }
}

/// Latest-year sector values for a region
///
/// When several rows carry the latest year the first row in table order is
/// used; the others are counted in `duplicate_rows` and logged.
pub fn latest_sector_values(
    table: &dyn TableAccessor,
    region: &Region,
    rules: &ExclusionRules,
) -> Result<(i32, Vec<SectorValue>, usize), ScoringError> {
    let layout = SectorPanelLayout::resolve(table)?;
    let index = RegionIndex::from_column(table, layout.region_col, layout.data_rows(table));

    let rows = index.positions(region);
    if rows.is_empty() {
        return Err(ScoringError::region_not_found(&region.display_name, "nominal output"));
    }

    let dated: Vec<(usize, i32)> = rows
        .iter()
        .filter_map(|&row| extract_year(table.cell(row, layout.year_col)).map(|y| (row, y)))
        .collect();
    let latest = dated
        .iter()
        .map(|(_, y)| *y)
        .max()
        .ok_or_else(|| ScoringError::NoData(format!("no year data for region: {}", region.display_name)))?;

    let mut latest_rows = dated.iter().filter(|(_, y)| *y == latest).map(|(row, _)| *row);
    // rows are in table order, so the first match is the earliest row
    let row = latest_rows.next().ok_or_else(|| ScoringError::NoData(region.display_name.clone()))?;
    let duplicate_rows = latest_rows.count();
    if duplicate_rows > 0 {
        tracing::warn!(
            "{}: {} extra rows share latest year {} in nominal output; using row {}",
            region.display_name,
            duplicate_rows,
            latest,
            row
        );
    }

    let values = layout
        .sector_cols
        .iter()
        .filter(|(_, label)| !rules.is_excluded(label))
        .filter_map(|(col, label)| {
            to_number(table.cell(row, *col)).map(|value| SectorValue {
                sector: label.trim().to_string(),
                value,
            })
        })
        .collect();

    Ok((latest, values, duplicate_rows))
}

/// Compute nominal shares for a region
///
/// Fails with `NoData` when the region is absent, has no dated row, no
/// parseable sector value, or a non-positive total.
pub fn compute_nominal_shares(
    table: &dyn TableAccessor,
    region: &Region,
    rules: &ExclusionRules,
) -> Result<NominalShares, ScoringError> {
    let (year, values, duplicate_rows) = latest_sector_values(table, region, rules)?;
    if values.is_empty() {
        return Err(ScoringError::NoData(format!(
            "no sector output values for region: {}",
            region.display_name
        )));
    }

    let total: f64 = values.iter().map(|v| v.value).sum();
    if total <= 0.0 {
        return Err(ScoringError::NoData(format!(
            "total output is zero or negative for region: {}",
            region.display_name
        )));
    }

    Ok(NominalShares {
        year,
        values,
        total,
        duplicate_rows,
    })
}
