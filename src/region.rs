//! Regions and region lookup
//!
//! Every dataset names regions its own way (casing, diacritics, padding) and
//! along its own axis. [`RegionIndex`] is the single matching implementation:
//! build it once per table axis, then query it by normalized key.

use crate::data::TableAccessor;
use crate::error::ScoringError;
use crate::layout::RegionColumnsLayout;
use crate::utils::{normalize_key, to_number};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// A region as requested by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub display_name: String,
    pub key: String,
}

impl Region {
    pub fn new(name: &str) -> Self {
        Self {
            display_name: name.trim().to_string(),
            key: normalize_key(name),
        }
    }
}

/// A region name as it appears in one table, with every position it occupies
#[derive(Debug, Clone, PartialEq)]
pub struct RegionEntry {
    pub name: String,
    pub positions: Vec<usize>,
}

/// Normalized-name index over one axis of a table
///
/// Entries keep first-appearance order; positions are rows or columns
/// depending on how the index was built.
#[derive(Debug, Clone, Default)]
pub struct RegionIndex {
    entries: Vec<RegionEntry>,
    by_key: FxHashMap<String, usize>,
}

impl RegionIndex {
    fn push(&mut self, name: String, position: usize) {
        let key = normalize_key(&name);
        if key.is_empty() || key == "nan" {
            return;
        }
        match self.by_key.get(&key) {
            Some(&idx) => self.entries[idx].positions.push(position),
            None => {
                self.by_key.insert(key, self.entries.len());
                self.entries.push(RegionEntry {
                    name,
                    positions: vec![position],
                });
            }
        }
    }

    /// Index the names found in `col` over `rows`
    pub fn from_column(table: &dyn TableAccessor, col: usize, rows: impl IntoIterator<Item = usize>) -> Self {
        let mut index = Self::default();
        for row in rows {
            index.push(table.cell(row, col).as_text(), row);
        }
        index
    }

    /// Index the names found along `row` from `first_col` on
    pub fn from_row(table: &dyn TableAccessor, row: usize, first_col: usize) -> Self {
        let mut index = Self::default();
        for col in first_col..table.n_cols() {
            index.push(table.cell(row, col).as_text(), col);
        }
        index
    }

    /// First position of a region
    pub fn position(&self, region: &Region) -> Option<usize> {
        self.positions(region).first().copied()
    }

    /// Every position of a region, in table order
    pub fn positions(&self, region: &Region) -> &[usize] {
        self.by_key
            .get(&region.key)
            .map(|&idx| self.entries[idx].positions.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, region: &Region) -> bool {
        self.by_key.contains_key(&region.key)
    }

    pub fn entries(&self) -> &[RegionEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Canonical region list with population totals
///
/// Built once per request from the population table and shared by every
/// component that needs a region list or a per-capita denominator.
#[derive(Debug, Clone, Default)]
pub struct PopulationIndex {
    index: RegionIndex,
    totals: FxHashMap<usize, f64>,
}

impl PopulationIndex {
    pub fn build(table: &dyn TableAccessor) -> Result<Self, ScoringError> {
        let layout = RegionColumnsLayout::population(table)?;
        let index = RegionIndex::from_row(table, layout.name_row, layout.first_col);

        let mut totals = FxHashMap::default();
        for entry in index.entries() {
            let col = entry.positions[0];
            let total = layout
                .value_rows
                .clone()
                .find_map(|row| to_number(table.cell(row, col)));
            if let Some(total) = total {
                totals.insert(col, total);
            }
        }

        tracing::debug!("Population index: {} regions, {} with totals", index.len(), totals.len());
        Ok(Self { index, totals })
    }

    pub fn population(&self, region: &Region) -> Option<f64> {
        self.index
            .position(region)
            .and_then(|col| self.totals.get(&col).copied())
    }

    /// Region display names in table order, one per key
    pub fn region_names(&self) -> Vec<String> {
        self.index.entries().iter().map(|e| e.name.clone()).collect()
    }

    pub fn index(&self) -> &RegionIndex {
        &self.index
    }
}
