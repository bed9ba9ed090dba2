// Directory Source Tests
//
// Purpose: CSV exports on disk score the same as the in-memory tables
// Run with: cargo test --test directory_source_tests

mod common;

use sector_scorer::{
    DataSource, Dataset, DirectorySource, EngineConfig, Grid, RegionScorer, TableAccessor,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;

fn write_csv(path: &Path, grid: &Grid) {
    write_rows(path, grid, false);
}

/// Like a spreadsheet export: trailing empty cells are not written
fn write_ragged_csv(path: &Path, grid: &Grid) {
    write_rows(path, grid, true);
}

fn write_rows(path: &Path, grid: &Grid, ragged: bool) {
    let mut out = String::new();
    for row in 0..grid.n_rows() {
        let mut line: Vec<String> = (0..grid.n_cols()).map(|col| grid.cell(row, col).as_text()).collect();
        if ragged {
            while line.len() > 1 && line.last().is_some_and(|c| c.is_empty()) {
                line.pop();
            }
        }
        let quoted: Vec<String> = line.iter().map(|c| format!("\"{}\"", c)).collect();
        out.push_str(&quoted.join(","));
        out.push('\n');
    }
    fs::write(path, out).unwrap();
}

fn fixture(dataset: Dataset) -> Grid {
    match dataset {
        Dataset::NominalOutput => common::nominal_output(),
        Dataset::RealGrowth => common::real_growth(),
        Dataset::AgriculturalArea => common::agricultural_area(),
        Dataset::Unemployment => common::unemployment(),
        Dataset::HousingSales => common::housing_sales(),
        Dataset::ForeignHousingSales => common::foreign_housing_sales(),
        Dataset::HealthWorkforce => common::health_workforce(),
        Dataset::Population => common::population(),
        Dataset::RenewableSuggestions => common::renewable_suggestions(),
    }
}

/// Every dataset under its default stem; nominal output as a multi-sheet export
fn write_data_dir(dir: &Path) {
    let config = EngineConfig::new(dir);
    for dataset in Dataset::ALL {
        let stem = config.datasets.stem(dataset);
        if dataset == Dataset::NominalOutput {
            write_csv(&dir.join(format!("{}__Kapak.csv", stem)), &Grid::from_rows(vec![vec!["cover"]]));
            write_csv(&dir.join(format!("{}__TRB Düzey2.csv", stem)), &fixture(dataset));
        } else {
            write_csv(&dir.join(format!("{}.csv", stem)), &fixture(dataset));
        }
    }
}

#[test]
fn test_csv_directory_matches_memory_source() {
    let dir = tempfile::tempdir().unwrap();
    write_data_dir(dir.path());

    let from_disk = RegionScorer::from_data_dir(dir.path()).unwrap();
    let in_memory = RegionScorer::new(Arc::new(common::full_source()));

    let disk_report = serde_json::to_value(from_disk.recommend("Muğla").unwrap()).unwrap();
    let memory_report = serde_json::to_value(in_memory.recommend("Muğla").unwrap()).unwrap();
    assert_eq!(disk_report, memory_report);
}

#[test]
fn test_ragged_exports_with_short_title_rows() {
    let dir = tempfile::tempdir().unwrap();
    let config = EngineConfig::new(dir.path());
    for dataset in Dataset::ALL {
        let path = dir.path().join(format!("{}.csv", config.datasets.stem(dataset)));
        write_ragged_csv(&path, &fixture(dataset));
    }

    let from_disk = RegionScorer::from_data_dir(dir.path()).unwrap();
    let in_memory = RegionScorer::new(Arc::new(common::full_source()));

    let disk_report = serde_json::to_value(from_disk.recommend("Muğla").unwrap()).unwrap();
    let memory_report = serde_json::to_value(in_memory.recommend("Muğla").unwrap()).unwrap();
    assert_eq!(disk_report, memory_report);
}

#[test]
fn test_priority_sheet_is_read() {
    let dir = tempfile::tempdir().unwrap();
    write_data_dir(dir.path());

    let source = DirectorySource::new(EngineConfig::new(dir.path()));
    let path = source.resolve_path(Dataset::NominalOutput).unwrap();
    assert!(path.to_string_lossy().ends_with("TRB Düzey2.csv"));

    let grid = source.table(Dataset::NominalOutput).unwrap();
    assert_eq!(grid.cell(5, 1).as_text(), "Muğla");
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let scorer = RegionScorer::from_data_dir(dir.path()).unwrap();
    let payload = sector_scorer::into_payload(scorer.recommend("Muğla"));
    assert_eq!(payload["error"], "data file not found: nominal output");
}

#[test]
fn test_datasets_file_overrides_stems() {
    let dir = tempfile::tempdir().unwrap();
    write_csv(&dir.path().join("nufus_2023.csv"), &common::population());
    fs::write(dir.path().join("datasets.json"), r#"{ "population": "nufus_2023" }"#).unwrap();

    let scorer = RegionScorer::from_data_dir(dir.path()).unwrap();
    let audit = scorer.health_audit(Some("Sinop")).unwrap();
    assert_eq!(audit.results[0].population, Some(220_000.0));
}
