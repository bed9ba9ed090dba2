//! Data Loading and Table Access
//!
//! Source tables are spreadsheet sheets exported as CSV. They have no usable
//! schema: every dataset is addressed by fixed row/column offsets (see
//! `layout`). This module turns a file into a [`Grid`] of typed cells and hides
//! where grids come from behind [`DataSource`].
//!
//! Tables are read fresh on every request; nothing is cached.

use crate::config::EngineConfig;
use crate::error::ScoringError;
use crate::utils::normalize_key;
use anyhow::{Context, Result};
use polars::prelude::*;
use rustc_hash::FxHashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Build a cell from raw CSV text
    ///
    /// Plain machine-formatted numbers become `Number`; locale-formatted ones
    /// ("1.234,5") stay `Text` and are handled by the value coercer.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Cell::Number(v),
            _ => Cell::Text(raw.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Text form of the cell, trimmed
    ///
    /// Whole numbers render without a fractional part so that a numeric
    /// `2023` reads back as "2023".
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", *v as i64),
            Cell::Number(v) => v.to_string(),
            Cell::Text(s) => s.trim().to_string(),
        }
    }

    /// Normalized comparison key of the cell's text
    pub fn key(&self) -> String {
        normalize_key(&self.as_text())
    }
}

impl From<&str> for Cell {
    fn from(raw: &str) -> Self {
        Cell::from_raw(raw)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

static EMPTY_CELL: Cell = Cell::Empty;

/// Position-based access to a dataset
///
/// Out-of-range positions read as `Cell::Empty` rather than panicking, so
/// layouts can read optional columns safely.
pub trait TableAccessor: Send + Sync {
    fn n_rows(&self) -> usize;
    fn n_cols(&self) -> usize;
    fn cell(&self, row: usize, col: usize) -> &Cell;
}

/// In-memory row-major table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    width: usize,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        Self { rows, width }
    }

    /// Build a grid from string literals (empty strings become `Cell::Empty`)
    pub fn from_rows<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(|s| Cell::from_raw(s.as_ref())).collect())
                .collect(),
        )
    }

    /// Drop rows and columns whose cells are all empty
    pub fn compact(&self) -> Grid {
        let keep_cols: Vec<usize> = (0..self.width)
            .filter(|&c| self.rows.iter().any(|r| r.get(c).is_some_and(|cell| !cell.is_empty())))
            .collect();

        let rows = self
            .rows
            .iter()
            .filter(|r| r.iter().any(|cell| !cell.is_empty()))
            .map(|r| {
                keep_cols
                    .iter()
                    .map(|&c| r.get(c).cloned().unwrap_or(Cell::Empty))
                    .collect()
            })
            .collect();

        Grid { rows, width: keep_cols.len() }
    }
}

impl TableAccessor for Grid {
    fn n_rows(&self) -> usize {
        self.rows.len()
    }

    fn n_cols(&self) -> usize {
        self.width
    }

    fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}

/// The source datasets the engine reconciles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// Sector output at current prices, one row per region/year
    NominalOutput,
    /// Chain-linked volume growth rates, name/rate column pairs
    RealGrowth,
    AgriculturalArea,
    Unemployment,
    /// Monthly housing sales, one column per region
    HousingSales,
    ForeignHousingSales,
    /// Health workforce, one block of rows per region
    HealthWorkforce,
    /// Population by region, one column per region
    Population,
    RenewableSuggestions,
}

impl Dataset {
    pub const ALL: [Dataset; 9] = [
        Dataset::NominalOutput,
        Dataset::RealGrowth,
        Dataset::AgriculturalArea,
        Dataset::Unemployment,
        Dataset::HousingSales,
        Dataset::ForeignHousingSales,
        Dataset::HealthWorkforce,
        Dataset::Population,
        Dataset::RenewableSuggestions,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Dataset::NominalOutput => "nominal output",
            Dataset::RealGrowth => "real growth",
            Dataset::AgriculturalArea => "agricultural area",
            Dataset::Unemployment => "unemployment",
            Dataset::HousingSales => "housing sales",
            Dataset::ForeignHousingSales => "foreign housing sales",
            Dataset::HealthWorkforce => "health workforce",
            Dataset::Population => "population",
            Dataset::RenewableSuggestions => "renewable suggestions",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Supplies tables by dataset
pub trait DataSource: Send + Sync {
    fn table(&self, dataset: Dataset) -> Result<Grid, ScoringError>;
}

/// Tables held in memory (fixtures, embedding callers)
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: FxHashMap<Dataset, Grid>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, dataset: Dataset, grid: Grid) -> Self {
        self.tables.insert(dataset, grid);
        self
    }

    pub fn insert(&mut self, dataset: Dataset, grid: Grid) {
        self.tables.insert(dataset, grid);
    }
}

impl DataSource for MemorySource {
    fn table(&self, dataset: Dataset) -> Result<Grid, ScoringError> {
        self.tables
            .get(&dataset)
            .cloned()
            .ok_or_else(|| ScoringError::NotFound(dataset.label().to_string()))
    }
}

/// Sheet names preferred when a workbook was exported as several CSV files
const SHEET_PRIORITY_KEYWORDS: [&str; 2] = ["duzey", "trb"];

/// Reads CSV sheet exports from a data directory
///
/// A dataset with stem `issizlik` resolves to `issizlik.csv`, or to one of
/// `issizlik__<sheet>.csv` when the workbook had several sheets.
pub struct DirectorySource {
    config: EngineConfig,
}

impl DirectorySource {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Locate the CSV file for a dataset
    pub fn resolve_path(&self, dataset: Dataset) -> Result<PathBuf, ScoringError> {
        let stem = self.config.datasets.stem(dataset);
        let dir = &self.config.data_dir;

        let exact = dir.join(format!("{}.csv", stem));
        if exact.is_file() {
            return Ok(exact);
        }

        let prefix = format!("{}__", stem);
        let mut sheets: Vec<(String, PathBuf)> = std::fs::read_dir(dir)
            .map_err(|_| ScoringError::NotFound(dataset.label().to_string()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|e| e == "csv"))
            .filter_map(|p| {
                let name = p.file_stem()?.to_str()?.to_string();
                let sheet = name.strip_prefix(&prefix)?.to_string();
                Some((sheet, p))
            })
            .collect();
        sheets.sort_by(|a, b| a.0.cmp(&b.0));

        let names: Vec<&str> = sheets.iter().map(|(s, _)| s.as_str()).collect();
        let picked = pick_sheet(&names).ok_or_else(|| ScoringError::NotFound(dataset.label().to_string()))?;
        Ok(sheets[picked].1.clone())
    }
}

impl DataSource for DirectorySource {
    fn table(&self, dataset: Dataset) -> Result<Grid, ScoringError> {
        let path = self.resolve_path(dataset)?;
        tracing::debug!("Reading {} from {:?}", dataset, path);
        load_csv_grid(&path).map_err(|e| ScoringError::Read {
            dataset: dataset.label().to_string(),
            message: format!("{:#}", e),
        })
    }
}

/// Pick the sheet to read among several exports
///
/// The first sheet whose name mentions a priority keyword wins, otherwise
/// the first sheet. `None` when there are no sheets.
pub fn pick_sheet(sheet_names: &[&str]) -> Option<usize> {
    if sheet_names.is_empty() {
        return None;
    }
    sheet_names
        .iter()
        .position(|name| {
            let key = normalize_key(name);
            SHEET_PRIORITY_KEYWORDS.iter().any(|k| key.contains(k))
        })
        .or(Some(0))
}

/// Field count of the widest record in a CSV file
///
/// Quoted fields may contain separators and line breaks.
fn widest_record(contents: &str) -> usize {
    let mut widest = 0;
    let mut fields = 1;
    let mut in_quotes = false;
    let mut record_has_content = false;

    for ch in contents.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                record_has_content = true;
            }
            ',' if !in_quotes => {
                fields += 1;
                record_has_content = true;
            }
            '\n' if !in_quotes => {
                if record_has_content {
                    widest = widest.max(fields);
                }
                fields = 1;
                record_has_content = false;
            }
            '\r' => {}
            _ => record_has_content = true,
        }
    }
    if record_has_content {
        widest = widest.max(fields);
    }
    widest
}

/// Load a headerless CSV into a grid, all columns read as text
///
/// Sheet exports start with title rows shorter than the data rows, so the
/// schema is sized to the widest record and short rows pad with nulls.
pub fn load_csv_grid(path: &Path) -> Result<Grid> {
    let contents = std::fs::read_to_string(path).with_context(|| format!("Failed to read CSV: {:?}", path))?;
    let width = widest_record(&contents);
    if width == 0 {
        return Ok(Grid::new(Vec::new()));
    }

    let schema: Schema = (1..=width)
        .map(|i| Field::new(format!("column_{}", i).into(), DataType::String))
        .collect();

    let df = CsvReadOptions::default()
        .with_has_header(false)
        .with_schema(Some(Arc::new(schema)))
        .try_into_reader_with_file_path(Some(path.into()))
        .with_context(|| format!("Failed to create CSV reader: {:?}", path))?
        .finish()
        .with_context(|| format!("Failed to load CSV: {:?}", path))?;

    let height = df.height();
    let mut rows: Vec<Vec<Cell>> = vec![Vec::with_capacity(df.width()); height];

    for column in df.get_columns() {
        let values = column
            .str()
            .with_context(|| format!("Column '{}' is not string type", column.name()))?;
        for (idx, row) in rows.iter_mut().enumerate() {
            row.push(values.get(idx).map(Cell::from_raw).unwrap_or(Cell::Empty));
        }
    }

    Ok(Grid::new(rows))
}

/// Shared handle used by the scorer
pub type SharedSource = Arc<dyn DataSource>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_from_raw() {
        assert_eq!(Cell::from_raw("  "), Cell::Empty);
        assert_eq!(Cell::from_raw("2023"), Cell::Number(2023.0));
        assert_eq!(Cell::from_raw("1.234,5"), Cell::Text("1.234,5".to_string()));
        assert_eq!(Cell::Number(2023.0).as_text(), "2023");
    }

    #[test]
    fn test_out_of_range_reads_empty() {
        let grid = Grid::from_rows(vec![vec!["a", "b"]]);
        assert_eq!(grid.cell(5, 5), &Cell::Empty);
        assert_eq!(grid.cell(0, 1).as_text(), "b");
    }

    #[test]
    fn test_compact_drops_empty_rows_and_columns() {
        let grid = Grid::from_rows(vec![
            vec!["", "", ""],
            vec!["", "x", "1"],
            vec!["", "", ""],
            vec!["", "y", ""],
        ]);
        let compacted = grid.compact();
        assert_eq!(compacted.n_rows(), 2);
        assert_eq!(compacted.n_cols(), 2);
        assert_eq!(compacted.cell(1, 0).as_text(), "y");
        assert!(compacted.cell(1, 1).is_empty());
    }

    #[test]
    fn test_pick_sheet_prefers_keyword() {
        assert_eq!(pick_sheet(&["Kapak", "TRB Düzey2"]), Some(1));
        assert_eq!(pick_sheet(&["Sheet1", "Sheet2"]), Some(0));
        assert_eq!(pick_sheet(&[]), None);
    }

    #[test]
    fn test_widest_record() {
        assert_eq!(widest_record("Title\n,a,b,c\n"), 4);
        assert_eq!(widest_record("\"x, y\",z\r\n1\n"), 2);
        assert_eq!(widest_record("\"multi\nline\",1,2"), 3);
        assert_eq!(widest_record(""), 0);
    }

    #[test]
    fn test_short_title_row_pads_with_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cari_fiyatli.csv");
        std::fs::write(&path, "Cari fiyatlarla GSYH\n,İl,Yıl,Tarım,Sanayi\n,Muğla,2022,100,300\n").unwrap();

        let grid = load_csv_grid(&path).unwrap();
        assert_eq!(grid.n_rows(), 3);
        assert_eq!(grid.n_cols(), 5);
        assert_eq!(grid.cell(0, 0).as_text(), "Cari fiyatlarla GSYH");
        assert!(grid.cell(0, 4).is_empty());
        assert_eq!(grid.cell(2, 4), &Cell::Number(300.0));
    }

    #[test]
    fn test_memory_source_missing_dataset() {
        let source = MemorySource::new();
        let err = source.table(Dataset::Population).unwrap_err();
        assert!(matches!(err, ScoringError::NotFound(_)));
    }
}
