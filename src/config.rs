//! Engine configuration
//!
//! Only file locations are configurable. Scoring weights, the growth window,
//! and policy thresholds are constants in the modules that use them.

use crate::data::Dataset;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the optional override file inside the data directory
pub const DATASETS_FILE: &str = "datasets.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub data_dir: PathBuf,
    #[serde(default)]
    pub datasets: DatasetFiles,
}

/// CSV file stem for each dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetFiles {
    pub nominal_output: String,
    pub real_growth: String,
    pub agricultural_area: String,
    pub unemployment: String,
    pub housing_sales: String,
    pub foreign_housing_sales: String,
    pub health_workforce: String,
    pub population: String,
    pub renewable_suggestions: String,
}

impl Default for DatasetFiles {
    fn default() -> Self {
        Self {
            nominal_output: "cari_fiyatli".to_string(),
            real_growth: "zincir_hacim".to_string(),
            agricultural_area: "toplam_tarim_alani".to_string(),
            unemployment: "issizlik".to_string(),
            housing_sales: "illere_gore_konut_satis".to_string(),
            foreign_housing_sales: "illere_gore_yabanciya_konut_satis".to_string(),
            health_workforce: "illere_gore_saglik_personeli".to_string(),
            population: "il_yas_cinsiyet_nufus".to_string(),
            renewable_suggestions: "yenilenebilir_enerji_onerileri".to_string(),
        }
    }
}

impl DatasetFiles {
    pub fn stem(&self, dataset: Dataset) -> &str {
        match dataset {
            Dataset::NominalOutput => &self.nominal_output,
            Dataset::RealGrowth => &self.real_growth,
            Dataset::AgriculturalArea => &self.agricultural_area,
            Dataset::Unemployment => &self.unemployment,
            Dataset::HousingSales => &self.housing_sales,
            Dataset::ForeignHousingSales => &self.foreign_housing_sales,
            Dataset::HealthWorkforce => &self.health_workforce,
            Dataset::Population => &self.population,
            Dataset::RenewableSuggestions => &self.renewable_suggestions,
        }
    }
}

impl EngineConfig {
    /// Configuration with default file stems
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            datasets: DatasetFiles::default(),
        }
    }

    /// Configuration for a data directory, honoring `datasets.json` if present
    ///
    /// The override file lists only the stems that differ from the defaults.
    pub fn from_data_dir(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        let override_path = data_dir.join(DATASETS_FILE);
        if !override_path.is_file() {
            return Ok(Self::new(data_dir));
        }

        let contents = fs::read_to_string(&override_path)
            .with_context(|| format!("Failed to read dataset file names: {:?}", override_path))?;
        let datasets: DatasetFiles = serde_json::from_str(&contents)
            .with_context(|| "Failed to parse dataset file names JSON")?;

        tracing::info!("Loaded dataset file names from {:?}", override_path);
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            datasets,
        })
    }
}
