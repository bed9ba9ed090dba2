//! Region Scorer - coordinator for per-region sector scoring
//!
//! Every operation reads the tables it needs from the data source, runs the
//! metric pipeline and returns a serializable payload. Nothing is cached
//! between calls; within one call each table is read once.
//!
//! Pipeline for one region:
//! shares + growth → combined scores → health and auxiliary indicators →
//! opportunity rules → narrative.

use crate::config::EngineConfig;
use crate::data::{Dataset, DirectorySource, Grid, SharedSource, TableAccessor};
use crate::error::ScoringError;
use crate::explanation::{NarrativeComposer, NarrativeInputs, Recommendation};
use crate::layout::KeyedRowsLayout;
use crate::metrics::*;
use crate::region::{PopulationIndex, Region, RegionIndex};
use crate::sector_filter::{default_rules, ExclusionRules};
use crate::utils::round_to;
use anyhow::Result;
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

// ============================================================================
// Payloads
// ============================================================================

/// Latest-year sector values for a region
#[derive(Debug, Clone, Serialize)]
pub struct NominalOutputView {
    pub region: String,
    pub year: i32,
    pub sectors: Vec<SectorValue>,
}

/// Window growth rates by sector
#[derive(Debug, Clone, Serialize)]
pub struct RealGrowthView {
    pub region: String,
    pub years: Vec<i32>,
    pub sectors: Vec<SectorGrowth>,
}

/// Full scoring report for one region
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionReport {
    pub region: String,
    pub year: i32,
    pub top_sectors: Vec<SectorRecord>,
    pub formula_note: &'static str,
    pub opportunities: Vec<OpportunitySignal>,
    pub health: HealthMetric,
    pub indicators: Indicators,
    pub recommendation: Recommendation,
}

/// Digest of a region's report for the all-regions bundle
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    pub region: String,
    pub summary: String,
    pub actions: Vec<OpportunitySignal>,
    pub top_sectors: Vec<SectorRecord>,
    pub health: HealthMetric,
}

impl From<RegionReport> for RegionSummary {
    fn from(report: RegionReport) -> Self {
        Self {
            summary: NarrativeComposer::summary_line(&report.top_sectors),
            region: report.region,
            actions: report.opportunities,
            top_sectors: report.top_sectors,
            health: report.health,
        }
    }
}

/// One bundle entry: a summary, or the reason the region could not be scored
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum BundleItem {
    Scored(RegionSummary),
    Failed { region: String, error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationBundle {
    pub count: usize,
    pub items: Vec<BundleItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub title: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenewableSuggestions {
    pub region: String,
    pub suggestions: Vec<Suggestion>,
}

/// Health data availability for one region
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub region: String,
    pub population: Option<f64>,
    pub doctor_total: Option<f64>,
    pub nurse_total: Option<f64>,
    pub doctor_per_100k: Option<f64>,
    pub nurse_per_100k: Option<f64>,
    pub has_doctor: bool,
    pub has_nurse: bool,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditSummary {
    pub total: usize,
    pub missing_doctor: usize,
    pub missing_nurse: usize,
    pub missing_population: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthAudit {
    pub summary: AuditSummary,
    pub results: Vec<AuditEntry>,
}

// ============================================================================
// Per-request tables
// ============================================================================

fn degrade<T>(dataset: Dataset, region: &Region, result: Result<Option<T>, ScoringError>) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("{} unavailable for {}: {}", dataset, region.display_name, e);
            None
        }
    }
}

/// Tables read for one request
///
/// The two core tables keep their error so each region reports it; the
/// auxiliary tables are simply absent when unreadable.
struct RequestTables {
    nominal: Result<Grid, ScoringError>,
    growth: Result<Grid, ScoringError>,
    agriculture: Option<Grid>,
    unemployment: Option<Grid>,
    housing: Option<Grid>,
    foreign: Option<Grid>,
    health: Option<Grid>,
    population: Result<PopulationIndex, ScoringError>,
}

impl RequestTables {
    fn load(scorer: &RegionScorer) -> Self {
        let optional = |dataset: Dataset| match scorer.table(dataset) {
            Ok(grid) => Some(grid),
            Err(e) => {
                tracing::warn!("{} unavailable: {}", dataset, e);
                None
            }
        };

        let population = scorer
            .table(Dataset::Population)
            .and_then(|grid| PopulationIndex::build(&grid));
        if let Err(e) = &population {
            tracing::warn!("population unavailable: {}", e);
        }

        Self {
            nominal: scorer.table(Dataset::NominalOutput),
            growth: scorer.table(Dataset::RealGrowth),
            agriculture: optional(Dataset::AgriculturalArea),
            unemployment: optional(Dataset::Unemployment),
            housing: optional(Dataset::HousingSales),
            foreign: optional(Dataset::ForeignHousingSales),
            health: optional(Dataset::HealthWorkforce),
            population,
        }
    }

    fn population(&self, region: &Region) -> Option<f64> {
        self.population.as_ref().ok().and_then(|p| p.population(region))
    }

    fn health_metric(&self, region: &Region) -> HealthMetric {
        let counts = self
            .health
            .as_ref()
            .and_then(|grid| degrade(Dataset::HealthWorkforce, region, WorkforceTable::new(grid).map(|t| t.counts(region))))
            .unwrap_or_default();
        HealthMetric::from_counts(counts, self.population(region))
    }

    fn indicators(&self, region: &Region) -> Indicators {
        let area = self
            .agriculture
            .as_ref()
            .and_then(|t| degrade(Dataset::AgriculturalArea, region, agricultural_area(t, region)));
        let unemployment = self
            .unemployment
            .as_ref()
            .and_then(|t| degrade(Dataset::Unemployment, region, unemployment_rate(t, region)));
        let housing = self.housing.as_ref().and_then(|t| {
            degrade(Dataset::HousingSales, region, housing_sales_total(t, region, HOUSING_TARGET_YEAR))
        });
        let foreign = self
            .foreign
            .as_ref()
            .and_then(|t| degrade(Dataset::ForeignHousingSales, region, foreign_sales_total(t, region)));

        Indicators::new(area, unemployment, housing, foreign)
    }

    /// Score one region against the loaded tables
    fn report(&self, region: &Region, rules: &ExclusionRules) -> Result<RegionReport, ScoringError> {
        let nominal = self.nominal.as_ref().map_err(Clone::clone)?;
        let growth_table = self.growth.as_ref().map_err(Clone::clone)?;

        let shares = compute_nominal_shares(nominal, region, rules)?;
        let growth = collect_growth(growth_table, region, Some(rules))?;
        let ranked = combine_scores(&shares, &growth)?;

        let health = self.health_metric(region);
        let indicators = self.indicators(region);

        let opportunities = detect_opportunities(&OpportunityInputs {
            health: &health,
            indicators: &indicators,
            shares: &shares,
            ranked: &ranked,
        });

        let recommendation = NarrativeComposer::compose(&NarrativeInputs {
            region: &region.display_name,
            ranked: &ranked,
            opportunities: &opportunities,
            foreign_sales: indicators.foreign_housing_sales,
        });

        tracing::debug!(
            "{}: {} sectors scored, {} opportunities",
            region.display_name,
            ranked.len(),
            opportunities.len()
        );

        Ok(RegionReport {
            region: region.display_name.clone(),
            year: shares.year,
            top_sectors: ranked,
            formula_note: FORMULA_NOTE,
            opportunities,
            health: health.rounded(),
            indicators: indicators.rounded(),
            recommendation,
        })
    }
}

// ============================================================================
// Scorer
// ============================================================================

/// Main region scorer
pub struct RegionScorer {
    source: SharedSource,
    rules: ExclusionRules,
}

impl RegionScorer {
    /// Scorer over a data source with the default exclusion rules
    pub fn new(source: SharedSource) -> Self {
        Self::with_rules(source, default_rules().clone())
    }

    pub fn with_rules(source: SharedSource, rules: ExclusionRules) -> Self {
        Self { source, rules }
    }

    /// Scorer reading CSV exports from the configured directory
    pub fn from_config(config: EngineConfig) -> Self {
        tracing::info!("Region scorer reading data from {:?}", config.data_dir);
        Self::new(Arc::new(DirectorySource::new(config)))
    }

    /// Scorer for a data directory, honoring its `datasets.json`
    pub fn from_data_dir(data_dir: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_config(EngineConfig::from_data_dir(data_dir)?))
    }

    pub fn rules(&self) -> &ExclusionRules {
        &self.rules
    }

    /// Read a table and apply its dataset's pre-processing
    fn table(&self, dataset: Dataset) -> Result<Grid, ScoringError> {
        let grid = self.source.table(dataset)?;
        Ok(dataset.prepare(grid))
    }

    /// Latest-year values of the non-aggregate sectors
    pub fn nominal_output(&self, region: &str) -> Result<NominalOutputView, ScoringError> {
        let region = Region::new(region);
        let table = self.table(Dataset::NominalOutput)?;
        let (year, sectors, _) = latest_sector_values(&table, &region, &self.rules)?;
        Ok(NominalOutputView {
            region: region.display_name,
            year,
            sectors,
        })
    }

    /// Growth by window year for every non-aggregate sector
    pub fn real_growth(&self, region: &str) -> Result<RealGrowthView, ScoringError> {
        let region = Region::new(region);
        let table = self.table(Dataset::RealGrowth)?;
        let growth = collect_growth(&table, &region, Some(&self.rules))?;
        Ok(RealGrowthView {
            region: region.display_name,
            years: GROWTH_WINDOW.to_vec(),
            sectors: growth.sectors,
        })
    }

    /// Ranked sectors, opportunities, health, indicators and narrative
    pub fn recommend(&self, region: &str) -> Result<RegionReport, ScoringError> {
        let region = Region::new(region);
        let tables = RequestTables::load(self);
        tables.report(&region, &self.rules)
    }

    /// Summaries for every region of the population table
    ///
    /// Regions are scored in parallel; items keep population table order.
    /// A region that cannot be scored yields an error item, not a failure.
    pub fn all_recommendations(&self) -> Result<RecommendationBundle, ScoringError> {
        let start = Instant::now();
        let tables = RequestTables::load(self);
        let names = tables.population.as_ref().map_err(Clone::clone)?.region_names();

        let items: Vec<BundleItem> = names
            .par_iter()
            .map(|name| {
                let region = Region::new(name);
                match tables.report(&region, &self.rules) {
                    Ok(report) => BundleItem::Scored(report.into()),
                    Err(e) => BundleItem::Failed {
                        region: name.clone(),
                        error: e.to_string(),
                    },
                }
            })
            .collect();

        tracing::info!("Scored {} regions in {:?}", items.len(), start.elapsed());
        Ok(RecommendationBundle {
            count: items.len(),
            items,
        })
    }

    /// The three renewable energy suggestions listed for a region
    pub fn renewable_suggestions(&self, region: &str) -> Result<RenewableSuggestions, ScoringError> {
        let region = Region::new(region);
        let table = self.table(Dataset::RenewableSuggestions)?;
        let layout = KeyedRowsLayout::resolve(&table, Dataset::RenewableSuggestions)?;
        let index = RegionIndex::from_column(&table, layout.key_col, 0..table.n_rows());
        let row = index
            .position(&region)
            .ok_or_else(|| ScoringError::region_not_found(&region.display_name, "renewable suggestions"))?;

        let suggestions = layout
            .value_cols
            .chunks(2)
            .map(|pair| Suggestion {
                title: table.cell(row, pair[0]).as_text(),
                reason: pair.get(1).map(|&col| table.cell(row, col).as_text()).unwrap_or_default(),
            })
            .collect();

        Ok(RenewableSuggestions {
            region: region.display_name,
            suggestions,
        })
    }

    /// Doctor/nurse data availability per region, optionally for one region
    ///
    /// Regions are listed from the health workforce sheet, or from the
    /// population table when that sheet is unreadable.
    pub fn health_audit(&self, region: Option<&str>) -> Result<HealthAudit, ScoringError> {
        let population = self
            .table(Dataset::Population)
            .and_then(|grid| PopulationIndex::build(&grid))
            .map_err(|e| tracing::warn!("population unavailable for audit: {}", e))
            .ok();
        let health_grid = self
            .table(Dataset::HealthWorkforce)
            .map_err(|e| tracing::warn!("health workforce unavailable for audit: {}", e))
            .ok();
        let workforce = health_grid.as_ref().and_then(|grid| {
            WorkforceTable::new(grid)
                .map_err(|e| tracing::warn!("health workforce unusable for audit: {}", e))
                .ok()
        });

        let mut names = workforce.as_ref().map(|w| w.region_names()).unwrap_or_default();
        if names.is_empty() {
            names = population.as_ref().map(|p| p.region_names()).unwrap_or_default();
        }

        let wanted = region.map(Region::new);
        let results: Vec<AuditEntry> = names
            .iter()
            .map(|name| Region::new(name))
            .filter(|r| wanted.as_ref().map_or(true, |w| w.key == r.key))
            .map(|r| audit_entry(&r, population.as_ref(), workforce.as_ref()))
            .collect();

        let summary = AuditSummary {
            total: results.len(),
            missing_doctor: results.iter().filter(|e| e.doctor_total.is_none()).count(),
            missing_nurse: results.iter().filter(|e| e.nurse_total.is_none()).count(),
            missing_population: results
                .iter()
                .filter(|e| e.population.map_or(true, |p| p == 0.0))
                .count(),
        };

        Ok(HealthAudit { summary, results })
    }
}

fn audit_entry(region: &Region, population: Option<&PopulationIndex>, workforce: Option<&WorkforceTable<'_>>) -> AuditEntry {
    let mut reasons = Vec::new();

    let pop = population.and_then(|p| p.population(region));
    if pop.is_none() {
        reasons.push("population data not found".to_string());
    }

    let counts = match workforce {
        None => {
            reasons.push("health workforce table could not be read".to_string());
            WorkforceCounts::default()
        }
        Some(table) => match table.counts(region) {
            None => {
                reasons.push("region row not found in column A".to_string());
                WorkforceCounts::default()
            }
            Some(counts) => {
                if counts.doctors.is_none() {
                    reasons.push("total physicians cell could not be read".to_string());
                }
                if counts.nurses.is_none() {
                    reasons.push("nurses cell could not be read".to_string());
                }
                counts
            }
        },
    };

    AuditEntry {
        region: region.display_name.clone(),
        population: pop,
        doctor_total: counts.doctors,
        nurse_total: counts.nurses,
        doctor_per_100k: per_100k(counts.doctors, pop).map(|v| round_to(v, 2)),
        nurse_per_100k: per_100k(counts.nurses, pop).map(|v| round_to(v, 2)),
        has_doctor: counts.doctors.is_some(),
        has_nurse: counts.nurses.is_some(),
        reasons,
    }
}
