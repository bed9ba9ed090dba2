//! Layout resolvers
//!
//! Each dataset is a spreadsheet with its own arrangement: some put one region
//! per row, some one region per column, one stores name/rate column pairs,
//! and the health workforce sheet stores a block of rows per region. A
//! resolver inspects a table once and returns a typed description of where
//! things are, so metric code never hard-codes offsets.
//!
//! Resolvers are selected through [`Dataset::shape`].

use crate::data::{Dataset, Grid, TableAccessor};
use crate::error::ScoringError;
use crate::utils::{contains_any, extract_year};
use std::ops::Range;

/// Broad table arrangement of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    /// Region/year rows with one column per sector
    SectorPanel,
    /// Region/year rows with (name, rate) column pairs at a fixed stride
    StridedGrowth,
    /// One row per region, region name in a fixed column
    KeyedRows,
    /// One column per region, names along a header row
    RegionColumns,
    /// A fixed-height block of rows per region
    RegionBlocks,
}

impl Dataset {
    pub fn shape(&self) -> TableShape {
        match self {
            Dataset::NominalOutput => TableShape::SectorPanel,
            Dataset::RealGrowth => TableShape::StridedGrowth,
            Dataset::AgriculturalArea
            | Dataset::Unemployment
            | Dataset::ForeignHousingSales
            | Dataset::RenewableSuggestions => TableShape::KeyedRows,
            Dataset::HousingSales | Dataset::Population => TableShape::RegionColumns,
            Dataset::HealthWorkforce => TableShape::RegionBlocks,
        }
    }

    /// Whether all-empty rows and columns are dropped before offsets apply
    ///
    /// Strided and block sheets are addressed by raw offsets.
    pub fn compacts(&self) -> bool {
        !matches!(self.shape(), TableShape::StridedGrowth | TableShape::RegionBlocks)
    }

    /// Apply the dataset's pre-processing to a freshly read table
    pub fn prepare(&self, grid: Grid) -> Grid {
        if self.compacts() {
            grid.compact()
        } else {
            grid
        }
    }
}

fn require_columns(table: &dyn TableAccessor, dataset: Dataset, expected: usize) -> Result<(), ScoringError> {
    if table.n_cols() < expected {
        return Err(ScoringError::MalformedShape {
            dataset: dataset.label().to_string(),
            expected,
            found: table.n_cols(),
        });
    }
    Ok(())
}

// ============================================================================
// Sector panel (nominal output)
// ============================================================================

/// Header keywords identifying the year column label
const YEAR_HEADER_KEYWORDS: [&str; 3] = ["yil", "yıl", "year"];

/// Offsets for the nominal output table
#[derive(Debug, Clone, PartialEq)]
pub struct SectorPanelLayout {
    pub header_row: usize,
    pub region_col: usize,
    pub year_col: usize,
    /// (column, header label) for every column from the first value column on
    pub sector_cols: Vec<(usize, String)>,
}

impl SectorPanelLayout {
    pub const PREFERRED_HEADER_ROW: usize = 3;
    pub const REGION_COL: usize = 1;
    pub const YEAR_COL: usize = 2;
    pub const FIRST_VALUE_COL: usize = 3;

    /// Locate the header row and sector columns
    ///
    /// Header discovery, in order:
    /// 1. the first row (up to the preferred row) whose year column is labelled as a year
    /// 2. the preferred row, when the table is tall enough
    /// 3. row 0
    pub fn resolve(table: &dyn TableAccessor) -> Result<Self, ScoringError> {
        require_columns(table, Dataset::NominalOutput, Self::FIRST_VALUE_COL + 1)?;
        if table.n_rows() == 0 {
            return Err(ScoringError::NoData("nominal output table is empty".to_string()));
        }

        let scan_end = Self::PREFERRED_HEADER_ROW.min(table.n_rows() - 1);
        let header_row = (0..=scan_end)
            .find(|&row| contains_any(&table.cell(row, Self::YEAR_COL).key(), &YEAR_HEADER_KEYWORDS))
            .unwrap_or(if Self::PREFERRED_HEADER_ROW < table.n_rows() {
                Self::PREFERRED_HEADER_ROW
            } else {
                0
            });

        let sector_cols = (Self::FIRST_VALUE_COL..table.n_cols())
            .map(|col| (col, table.cell(header_row, col).as_text()))
            .collect();

        Ok(Self {
            header_row,
            region_col: Self::REGION_COL,
            year_col: Self::YEAR_COL,
            sector_cols,
        })
    }

    pub fn data_rows(&self, table: &dyn TableAccessor) -> Range<usize> {
        (self.header_row + 1)..table.n_rows()
    }
}

// ============================================================================
// Strided growth pairs (real growth)
// ============================================================================

/// Offsets for the chain-linked volume table
#[derive(Debug, Clone, PartialEq)]
pub struct StridedGrowthLayout {
    pub header_row: usize,
    pub region_col: usize,
    pub year_col: usize,
    /// (rate column, sector name) pairs; blank names are skipped
    pub pairs: Vec<(usize, String)>,
}

impl StridedGrowthLayout {
    pub const HEADER_ROW: usize = 3;
    pub const REGION_COL: usize = 1;
    pub const YEAR_COL: usize = 2;
    pub const FIRST_RATE_COL: usize = 5;
    pub const STRIDE: usize = 4;
    /// Name column sits this many columns before its rate column
    pub const NAME_OFFSET: usize = 2;
    pub const MIN_COLS: usize = 6;

    pub fn resolve(table: &dyn TableAccessor) -> Result<Self, ScoringError> {
        require_columns(table, Dataset::RealGrowth, Self::MIN_COLS)?;

        let pairs = (Self::FIRST_RATE_COL..table.n_cols())
            .step_by(Self::STRIDE)
            .filter_map(|rate_col| {
                let name = table.cell(Self::HEADER_ROW, rate_col - Self::NAME_OFFSET).as_text();
                if name.is_empty() || name.eq_ignore_ascii_case("nan") {
                    None
                } else {
                    Some((rate_col, name))
                }
            })
            .collect();

        Ok(Self {
            header_row: Self::HEADER_ROW,
            region_col: Self::REGION_COL,
            year_col: Self::YEAR_COL,
            pairs,
        })
    }

    pub fn data_rows(&self, table: &dyn TableAccessor) -> Range<usize> {
        (self.header_row + 1).min(table.n_rows())..table.n_rows()
    }
}

// ============================================================================
// Keyed rows (one region per row)
// ============================================================================

/// Region name column plus the value columns read for each region
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedRowsLayout {
    pub key_col: usize,
    pub value_cols: Vec<usize>,
}

impl KeyedRowsLayout {
    pub fn resolve(table: &dyn TableAccessor, dataset: Dataset) -> Result<Self, ScoringError> {
        if dataset.shape() != TableShape::KeyedRows {
            return Err(ScoringError::NoData(format!("{} is not a keyed-row dataset", dataset)));
        }

        let layout = match dataset {
            Dataset::AgriculturalArea => Self { key_col: 0, value_cols: vec![1] },
            // column H holds the latest year's rate
            Dataset::Unemployment => Self { key_col: 1, value_cols: vec![7] },
            Dataset::ForeignHousingSales => Self { key_col: 1, value_cols: vec![2] },
            // renewable suggestions: three (title, reason) pairs in columns C..H
            _ => Self { key_col: 1, value_cols: (2..8).collect() },
        };

        let needed = layout.value_cols.iter().copied().max().unwrap_or(layout.key_col) + 1;
        require_columns(table, dataset, needed)?;
        Ok(layout)
    }

    pub fn value_col(&self) -> usize {
        self.value_cols[0]
    }
}

// ============================================================================
// Region columns (one region per column)
// ============================================================================

/// Names along a header row, one region per column
#[derive(Debug, Clone, PartialEq)]
pub struct RegionColumnsLayout {
    pub name_row: usize,
    pub first_col: usize,
    /// Rows holding the values to read for each region
    pub value_rows: Range<usize>,
}

impl RegionColumnsLayout {
    pub const NAME_ROW: usize = 2;

    /// Population: names on row 2 from column E, totals on row 3
    pub fn population(table: &dyn TableAccessor) -> Result<Self, ScoringError> {
        const FIRST_COL: usize = 4;
        require_columns(table, Dataset::Population, FIRST_COL + 1)?;
        Ok(Self {
            name_row: Self::NAME_ROW,
            first_col: FIRST_COL,
            value_rows: 3..4,
        })
    }

    /// Housing sales: names on row 2 from column D, twelve month rows per year
    ///
    /// The month block is found by scanning the year and month label columns
    /// (A, B) for the first row tagged with `year`; when no row is tagged the
    /// historical fixed block for 2023 (rows 136..=147) is used. Column C
    /// holds the national total and is never read as a tag.
    pub fn housing(table: &dyn TableAccessor, year: i32) -> Result<Self, ScoringError> {
        const LABEL_COLS: usize = 2;
        const FIRST_COL: usize = 3;
        const MONTHS: usize = 12;
        const FALLBACK_ROWS: Range<usize> = 136..148;
        require_columns(table, Dataset::HousingSales, FIRST_COL + 1)?;

        let tagged = ((Self::NAME_ROW + 1)..table.n_rows())
            .find(|&row| (0..LABEL_COLS).any(|col| extract_year(table.cell(row, col)) == Some(year)));

        let value_rows = match tagged {
            Some(start) => start..(start + MONTHS).min(table.n_rows()),
            None => {
                tracing::debug!("No row tagged {} in housing sales; using fixed month rows", year);
                FALLBACK_ROWS.start.min(table.n_rows())..FALLBACK_ROWS.end.min(table.n_rows())
            }
        };

        Ok(Self {
            name_row: Self::NAME_ROW,
            first_col: FIRST_COL,
            value_rows,
        })
    }
}

// ============================================================================
// Region blocks (health workforce)
// ============================================================================

/// Offsets inside each region's block of the health workforce sheet
#[derive(Debug, Clone, PartialEq)]
pub struct RegionBlocksLayout {
    pub key_col: usize,
    pub count_col: usize,
    /// Total physicians row, relative to the region's first row
    pub doctor_offset: usize,
    /// Nurses row, relative to the region's first row
    pub nurse_offset: usize,
}

impl RegionBlocksLayout {
    pub fn resolve(table: &dyn TableAccessor) -> Result<Self, ScoringError> {
        // column Y holds the latest year's counts
        const COUNT_COL: usize = 24;
        require_columns(table, Dataset::HealthWorkforce, COUNT_COL + 1)?;
        Ok(Self {
            key_col: 0,
            count_col: COUNT_COL,
            doctor_offset: 16,
            nurse_offset: 26,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sector_panel_prefers_labelled_header() {
        let grid = Grid::from_rows(vec![
            vec!["Title", "", "", ""],
            vec!["", "İl", "Yıl", "Tarım"],
            vec!["", "Ankara", "2022", "10"],
        ]);
        let layout = SectorPanelLayout::resolve(&grid).unwrap();
        assert_eq!(layout.header_row, 1);
        assert_eq!(layout.sector_cols, vec![(3, "Tarım".to_string())]);
        assert_eq!(layout.data_rows(&grid), 2..3);
    }

    #[test]
    fn test_sector_panel_falls_back_to_preferred_row() {
        let grid = Grid::from_rows(vec![
            vec!["a", "", "", ""],
            vec!["b", "", "", ""],
            vec!["c", "", "", ""],
            vec!["", "Region", "Period", "Sanayi"],
            vec!["", "Ankara", "2022", "10"],
        ]);
        assert_eq!(SectorPanelLayout::resolve(&grid).unwrap().header_row, 3);
    }

    #[test]
    fn test_sector_panel_short_table_uses_row_zero() {
        let grid = Grid::from_rows(vec![vec!["", "Region", "Period", "Sanayi"]]);
        assert_eq!(SectorPanelLayout::resolve(&grid).unwrap().header_row, 0);
    }

    #[test]
    fn test_sector_panel_too_narrow() {
        let grid = Grid::from_rows(vec![vec!["", "Region", "Year"]]);
        let err = SectorPanelLayout::resolve(&grid).unwrap_err();
        assert!(matches!(err, ScoringError::MalformedShape { expected: 4, found: 3, .. }));
    }

    #[test]
    fn test_strided_growth_pairs() {
        let mut header = vec![""; 14];
        header[3] = "Tarım";
        header[7] = "Sanayi";
        // index 11 left blank: pair skipped
        let grid = Grid::from_rows(vec![vec![""; 14], vec![""; 14], vec![""; 14], header]);
        let layout = StridedGrowthLayout::resolve(&grid).unwrap();
        assert_eq!(layout.pairs, vec![(5, "Tarım".to_string()), (9, "Sanayi".to_string())]);
    }

    #[test]
    fn test_keyed_rows_requires_value_column() {
        let grid = Grid::from_rows(vec![vec!["", "Ankara", "1", "2"]]);
        let err = KeyedRowsLayout::resolve(&grid, Dataset::Unemployment).unwrap_err();
        assert!(matches!(err, ScoringError::MalformedShape { expected: 8, .. }));
        assert!(KeyedRowsLayout::resolve(&grid, Dataset::ForeignHousingSales).is_ok());
    }

    #[test]
    fn test_keyed_rows_rejects_other_shapes() {
        let grid = Grid::from_rows(vec![vec![""; 10]]);
        let err = KeyedRowsLayout::resolve(&grid, Dataset::Population).unwrap_err();
        assert_eq!(err.to_string(), "population is not a keyed-row dataset");
        assert_eq!(KeyedRowsLayout::resolve(&grid, Dataset::RenewableSuggestions).unwrap().value_cols.len(), 6);
    }

    #[test]
    fn test_housing_month_block_found_by_year_tag() {
        let mut rows = vec![vec!["", "", "", ""]; 3];
        rows[2] = vec!["", "", "", "Ankara"];
        rows.push(vec!["2022", "Ocak", "", "5"]);
        rows.push(vec!["2023", "Ocak", "", "7"]);
        let grid = Grid::from_rows(rows);
        let layout = RegionColumnsLayout::housing(&grid, 2023).unwrap();
        assert_eq!(layout.value_rows, 4..5);
    }

    #[test]
    fn test_housing_national_total_is_not_a_year_tag() {
        let mut rows = vec![vec!["", "", "", ""]; 3];
        rows[2] = vec!["", "", "Türkiye", "Muğla"];
        rows.push(vec!["2022", "Kasım", "98000", "1000"]);
        rows.push(vec!["", "Aralık", "102023", "1000"]);
        rows.push(vec!["2023", "Ocak", "90000", "400"]);
        let grid = Grid::from_rows(rows);
        let layout = RegionColumnsLayout::housing(&grid, 2023).unwrap();
        assert_eq!(layout.value_rows, 5..6);
    }

    #[test]
    fn test_housing_month_block_fallback() {
        let grid = Grid::from_rows(vec![vec!["", "", "", "Ankara"]; 200]);
        let layout = RegionColumnsLayout::housing(&grid, 2023).unwrap();
        assert_eq!(layout.value_rows, 136..148);
    }

    #[test]
    fn test_compaction_policy() {
        assert!(Dataset::NominalOutput.compacts());
        assert!(!Dataset::RealGrowth.compacts());
        assert!(!Dataset::HealthWorkforce.compacts());
        for dataset in Dataset::ALL {
            let raw = matches!(dataset.shape(), TableShape::StridedGrowth | TableShape::RegionBlocks);
            assert_eq!(dataset.compacts(), !raw, "{}", dataset);
        }
    }
}
