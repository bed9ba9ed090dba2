//! Auxiliary regional indicators
//!
//! Agricultural area, unemployment and housing market figures. These feed the
//! opportunity rules only; each reader is independent so that one unreadable
//! dataset leaves the others usable.

use crate::data::{Dataset, TableAccessor};
use crate::error::ScoringError;
use crate::layout::{KeyedRowsLayout, RegionColumnsLayout};
use crate::region::{Region, RegionIndex};
use crate::utils::{percentile_rank, round_to, to_number};
use serde::Serialize;

/// Year whose monthly housing sales are totalled
pub const HOUSING_TARGET_YEAR: i32 = 2023;

/// A region's value with its percentile among all regions of the table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedValue {
    pub value: f64,
    pub percentile: f64,
}

/// Auxiliary values used by the opportunity rules
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicators {
    pub agricultural_area: Option<f64>,
    pub agricultural_area_percentile: Option<f64>,
    pub unemployment_rate: Option<f64>,
    pub unemployment_percentile: Option<f64>,
    pub housing_sales: Option<f64>,
    pub foreign_housing_sales: Option<f64>,
}

impl Indicators {
    pub fn new(
        agricultural_area: Option<RankedValue>,
        unemployment: Option<RankedValue>,
        housing_sales: Option<f64>,
        foreign_housing_sales: Option<f64>,
    ) -> Self {
        Self {
            agricultural_area: agricultural_area.map(|r| r.value),
            agricultural_area_percentile: agricultural_area.map(|r| r.percentile),
            unemployment_rate: unemployment.map(|r| r.value),
            unemployment_percentile: unemployment.map(|r| r.percentile),
            housing_sales,
            foreign_housing_sales,
        }
    }

    /// Copy with percentiles rounded to four decimals for output
    pub fn rounded(&self) -> Self {
        Self {
            agricultural_area_percentile: self.agricultural_area_percentile.map(|p| round_to(p, 4)),
            unemployment_percentile: self.unemployment_percentile.map(|p| round_to(p, 4)),
            ..self.clone()
        }
    }

    /// Foreign sales when reported and positive
    pub fn foreign_sales_positive(&self) -> Option<f64> {
        self.foreign_housing_sales.filter(|v| *v > 0.0)
    }
}

/// Rank a region's value among the numeric rows of a keyed-row table
///
/// Rows whose value cell is not numeric are left out of both the lookup and
/// the distribution.
fn ranked_keyed_value(
    table: &dyn TableAccessor,
    dataset: Dataset,
    region: &Region,
) -> Result<Option<RankedValue>, ScoringError> {
    let layout = KeyedRowsLayout::resolve(table, dataset)?;
    let col = layout.value_col();

    let numeric: Vec<(usize, f64)> = (0..table.n_rows())
        .filter_map(|row| to_number(table.cell(row, col)).map(|v| (row, v)))
        .collect();
    let distribution: Vec<f64> = numeric.iter().map(|(_, v)| *v).collect();

    let index = RegionIndex::from_column(table, layout.key_col, numeric.iter().map(|(row, _)| *row));
    let value = index
        .position(region)
        .and_then(|row| to_number(table.cell(row, col)));

    Ok(value.map(|value| RankedValue {
        value,
        percentile: percentile_rank(&distribution, value),
    }))
}

/// Total agricultural area and its percentile
pub fn agricultural_area(table: &dyn TableAccessor, region: &Region) -> Result<Option<RankedValue>, ScoringError> {
    ranked_keyed_value(table, Dataset::AgriculturalArea, region)
}

/// Latest unemployment rate and its percentile
pub fn unemployment_rate(table: &dyn TableAccessor, region: &Region) -> Result<Option<RankedValue>, ScoringError> {
    ranked_keyed_value(table, Dataset::Unemployment, region)
}

/// Sum of the target year's monthly housing sales
///
/// `None` when the region has no column or no month carries a number.
pub fn housing_sales_total(
    table: &dyn TableAccessor,
    region: &Region,
    year: i32,
) -> Result<Option<f64>, ScoringError> {
    let layout = RegionColumnsLayout::housing(table, year)?;
    let index = RegionIndex::from_row(table, layout.name_row, layout.first_col);
    let Some(col) = index.position(region) else {
        return Ok(None);
    };

    let months: Vec<f64> = layout
        .value_rows
        .filter_map(|row| to_number(table.cell(row, col)))
        .collect();
    if months.is_empty() {
        return Ok(None);
    }
    Ok(Some(months.iter().sum()))
}

/// Housing sales to foreigners; not every region is listed
pub fn foreign_sales_total(table: &dyn TableAccessor, region: &Region) -> Result<Option<f64>, ScoringError> {
    let layout = KeyedRowsLayout::resolve(table, Dataset::ForeignHousingSales)?;
    let index = RegionIndex::from_column(table, layout.key_col, 0..table.n_rows());
    Ok(index
        .position(region)
        .and_then(|row| to_number(table.cell(row, layout.value_col()))))
}
