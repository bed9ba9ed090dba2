//! Sector Scorer
//!
//! Ranks economic sectors by investment attractiveness for an administrative
//! region, reconciling independently shaped statistical tables.
//!
//! Module layout:
//! - `utils/`: text keys, locale-aware number parsing, percentile and min-max helpers
//! - `data`: cells, grids, dataset sources (CSV through Polars, or in-memory)
//! - `layout`: where each dataset keeps its regions, years and values
//! - `region`: normalized region lookup and the population index
//! - `metrics/`: shares, growth, scores, health, auxiliary indicators, opportunities
//! - `explanation/`: narrative recommendation
//! - `scorer`: per-request coordinator exposing the public operations
//! - `api_server` (feature `api`): HTTP adapter

pub mod utils;
pub mod error;
pub mod config;
pub mod data;
pub mod layout;
pub mod region;
pub mod sector_filter;
pub mod metrics;
pub mod explanation;
pub mod scorer;

#[cfg(feature = "api")]
pub mod api_server;

// Re-export commonly used types
pub use config::{DatasetFiles, EngineConfig};
pub use data::{Cell, DataSource, Dataset, DirectorySource, Grid, MemorySource, SharedSource, TableAccessor};
pub use error::{into_payload, ScoringError};
pub use explanation::{NarrativeComposer, Recommendation};
pub use metrics::*;
pub use region::{PopulationIndex, Region, RegionIndex};
pub use scorer::{
    AuditEntry, AuditSummary, BundleItem, HealthAudit, NominalOutputView, RealGrowthView, RecommendationBundle,
    RegionReport, RegionScorer, RegionSummary, RenewableSuggestions, Suggestion,
};
pub use sector_filter::{default_rules, is_excluded, ExclusionRules};
