//! Health workforce density
//!
//! Doctors and nurses per 100,000 residents, judged against fixed adequacy
//! thresholds.

use crate::data::TableAccessor;
use crate::error::ScoringError;
use crate::layout::RegionBlocksLayout;
use crate::region::{Region, RegionIndex};
use crate::utils::{round_to, to_number};
use serde::Serialize;

/// Doctors per 100k at or above this are adequate
pub const DOCTOR_THRESHOLD: f64 = 200.0;
/// Nurses per 100k at or above this are adequate
pub const NURSE_THRESHOLD: f64 = 300.0;

const PER_CAPITA_SCALE: f64 = 100_000.0;

/// Per-100k rates; `None` when the count or the population is unavailable
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetric {
    pub doctor_per_100k: Option<f64>,
    pub nurse_per_100k: Option<f64>,
}

impl HealthMetric {
    pub fn from_counts(counts: WorkforceCounts, population: Option<f64>) -> Self {
        Self {
            doctor_per_100k: per_100k(counts.doctors, population),
            nurse_per_100k: per_100k(counts.nurses, population),
        }
    }

    pub fn doctors_adequate(&self) -> bool {
        self.doctor_per_100k.is_some_and(|v| v >= DOCTOR_THRESHOLD)
    }

    pub fn nurses_adequate(&self) -> bool {
        self.nurse_per_100k.is_some_and(|v| v >= NURSE_THRESHOLD)
    }

    pub fn is_available(&self) -> bool {
        self.doctor_per_100k.is_some() || self.nurse_per_100k.is_some()
    }

    /// Rates rounded to two decimals for output
    pub fn rounded(&self) -> Self {
        Self {
            doctor_per_100k: self.doctor_per_100k.map(|v| round_to(v, 2)),
            nurse_per_100k: self.nurse_per_100k.map(|v| round_to(v, 2)),
        }
    }

    /// One status line per metric, e.g. "Doctors per 100,000 residents: ≈ 400 (threshold 200), adequate"
    pub fn status_lines(&self) -> Vec<String> {
        vec![
            status_line("Doctors", self.doctor_per_100k, DOCTOR_THRESHOLD),
            status_line("Nurses", self.nurse_per_100k, NURSE_THRESHOLD),
        ]
    }
}

fn status_line(label: &str, value: Option<f64>, threshold: f64) -> String {
    match value {
        None => format!("{} per 100,000 residents: no data", label),
        Some(v) => {
            let status = if v < threshold { "low" } else { "adequate" };
            format!(
                "{} per 100,000 residents: ≈ {:.0} (threshold {:.0}), {}",
                label, v, threshold, status
            )
        }
    }
}

/// `count / population × 100000`
pub fn per_100k(count: Option<f64>, population: Option<f64>) -> Option<f64> {
    match (count, population) {
        (Some(count), Some(pop)) if pop != 0.0 => Some(count / pop * PER_CAPITA_SCALE),
        _ => None,
    }
}

/// Raw workforce counts for one region
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct WorkforceCounts {
    pub doctors: Option<f64>,
    pub nurses: Option<f64>,
}

/// Health workforce sheet: a block of rows per region, region name on the
/// block's first row
pub struct WorkforceTable<'a> {
    table: &'a dyn TableAccessor,
    layout: RegionBlocksLayout,
    index: RegionIndex,
}

impl<'a> WorkforceTable<'a> {
    pub fn new(table: &'a dyn TableAccessor) -> Result<Self, ScoringError> {
        let layout = RegionBlocksLayout::resolve(table)?;
        let index = RegionIndex::from_column(table, layout.key_col, 0..table.n_rows());
        Ok(Self { table, layout, index })
    }

    /// Counts for a region; `None` when the region has no block
    pub fn counts(&self, region: &Region) -> Option<WorkforceCounts> {
        let start = self.index.position(region)?;
        let read = |offset: usize| to_number(self.table.cell(start + offset, self.layout.count_col));
        Some(WorkforceCounts {
            doctors: read(self.layout.doctor_offset),
            nurses: read(self.layout.nurse_offset),
        })
    }

    /// Region names in block order, consecutive repeats collapsed
    pub fn region_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        let mut previous: Option<String> = None;
        for row in 0..self.table.n_rows() {
            let cell = self.table.cell(row, self.layout.key_col);
            let key = cell.key();
            if key.is_empty() || key == "nan" {
                continue;
            }
            if previous.as_deref() != Some(key.as_str()) {
                names.push(cell.as_text());
                previous = Some(key);
            }
        }
        names
    }
}
