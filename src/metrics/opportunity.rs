//! Opportunity detection
//!
//! Threshold rules over the auxiliary indicators. Rules are evaluated in a
//! fixed order and each emits at most one signal.

use crate::metrics::auxiliary::{Indicators, HOUSING_TARGET_YEAR};
use crate::metrics::combine::SectorRecord;
use crate::metrics::health::HealthMetric;
use crate::metrics::share::NominalShares;
use crate::utils::{contains_any, normalize_key, percentile_rank};
use serde::Serialize;

/// Minimum agricultural area percentile for the agro-processing rule
pub const AREA_PERCENTILE_MIN: f64 = 0.7;
/// Maximum agriculture share percentile for the agro-processing rule
pub const AGRICULTURE_SHARE_PERCENTILE_MAX: f64 = 0.4;
/// Housing sales above this total flag a real estate opportunity
pub const HOUSING_SALES_MIN: f64 = 3500.0;
/// Number of top-scored sectors checked for services
const TOURISM_TOP_N: usize = 3;

/// Sector label keywords identifying agriculture, forestry and fishing
pub const AGRICULTURE_KEYWORDS: [&str; 7] = [
    "tarim",
    "tarım",
    "agricultur",
    "ormancilik",
    "ormancılık",
    "forestry",
    "fishing",
];

/// Normalized labels of the services sector
const SERVICES_LABELS: [&str; 2] = ["hizmetler", "services"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpportunityKind {
    Health,
    Agriculture,
    RealEstate,
    Tourism,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunitySignal {
    pub title: String,
    pub reason: String,
    #[serde(skip)]
    pub kind: OpportunityKind,
}

impl OpportunitySignal {
    fn new(kind: OpportunityKind, title: &str, reason: String) -> Self {
        Self {
            title: title.to_string(),
            reason,
            kind,
        }
    }
}

/// Everything the rules look at for one region
pub struct OpportunityInputs<'a> {
    pub health: &'a HealthMetric,
    pub indicators: &'a Indicators,
    pub shares: &'a NominalShares,
    /// Scored sectors, best first
    pub ranked: &'a [SectorRecord],
}

pub fn detect_opportunities(inputs: &OpportunityInputs<'_>) -> Vec<OpportunitySignal> {
    [
        health_signal(inputs.health),
        agriculture_signal(inputs.indicators, inputs.shares),
        real_estate_signal(inputs.indicators),
        tourism_signal(inputs.indicators, inputs.ranked),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Fires unless both doctor and nurse densities are adequate
fn health_signal(health: &HealthMetric) -> Option<OpportunitySignal> {
    if !health.is_available() || (health.doctors_adequate() && health.nurses_adequate()) {
        return None;
    }
    Some(OpportunitySignal::new(
        OpportunityKind::Health,
        "Private healthcare investment",
        health.status_lines().join("; "),
    ))
}

/// Large farmland but a small agricultural share of output
fn agriculture_signal(indicators: &Indicators, shares: &NominalShares) -> Option<OpportunitySignal> {
    let area_percentile = indicators.agricultural_area_percentile?;

    let agriculture_shares: Vec<(String, f64)> = shares
        .shares()
        .into_iter()
        .filter(|(label, _)| contains_any(&normalize_key(label), &AGRICULTURE_KEYWORDS))
        .collect();
    let (_, target_share) = agriculture_shares.first()?;
    let distribution: Vec<f64> = agriculture_shares.iter().map(|(_, s)| *s).collect();
    let share_percentile = percentile_rank(&distribution, *target_share);

    if area_percentile >= AREA_PERCENTILE_MIN && share_percentile <= AGRICULTURE_SHARE_PERCENTILE_MAX {
        Some(OpportunitySignal::new(
            OpportunityKind::Agriculture,
            "Agro-processing & logistics",
            format!(
                "Agricultural area is high (>{}% of regions), agricultural value-added share is low",
                (area_percentile * 100.0) as i64
            ),
        ))
    } else {
        None
    }
}

fn real_estate_signal(indicators: &Indicators) -> Option<OpportunitySignal> {
    let total = indicators.housing_sales.filter(|t| *t > HOUSING_SALES_MIN)?;

    let mut conditions = vec![format!(
        "{} housing sales total ~{}",
        HOUSING_TARGET_YEAR,
        group_thousands(total)
    )];
    if let Some(foreign) = indicators.foreign_sales_positive() {
        conditions.push(format!("Sales to foreigners ~{}", group_thousands(foreign)));
    }

    Some(OpportunitySignal::new(
        OpportunityKind::RealEstate,
        "Real estate investment",
        conditions.join("; "),
    ))
}

fn tourism_signal(indicators: &Indicators, ranked: &[SectorRecord]) -> Option<OpportunitySignal> {
    let services_top = ranked
        .iter()
        .take(TOURISM_TOP_N)
        .any(|r| SERVICES_LABELS.contains(&normalize_key(&r.sector).as_str()));
    let foreign_interest = indicators.foreign_sales_positive().is_some();

    let mut reasons = Vec::new();
    if services_top {
        reasons.push("Services sector ranks among the most attractive");
    }
    if foreign_interest {
        reasons.push("Strong foreign interest in the region");
    }
    if reasons.is_empty() {
        return None;
    }

    Some(OpportunitySignal::new(
        OpportunityKind::Tourism,
        "Tourism & experience economy",
        reasons.join("; "),
    ))
}

/// Integer part with comma thousands separators: 12345.9 → "12,345"
pub fn group_thousands(value: f64) -> String {
    let whole = value.trunc() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if whole < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
