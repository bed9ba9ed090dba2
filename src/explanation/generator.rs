use crate::explanation::types::*;
use crate::metrics::{OpportunityKind, OpportunitySignal, SectorRecord};
use crate::utils::{contains_any, normalize_key};

/// Cap on the number of recommended actions
pub const MAX_ACTIONS: usize = 5;
/// Foreign sales above this add the foreign-buyer action
pub const FOREIGN_BUYER_ACTION_MIN: f64 = 500.0;

const FALLBACK_TOP_SECTOR: &str = "identified sectors";
const SUMMARY_TOP_N: usize = 3;

const REAL_ESTATE_RATIONALE: &str =
    "In addition, the active housing market and strong demand offer further real estate development opportunities";
const REAL_ESTATE_ACTION: &str = "Develop real estate and construction projects that meet growing demand.";
const FOREIGN_BUYER_ACTION: &str =
    "Offer rental and property management services to foreign investors to widen the market.";

const HEALTH_RATIONALE: &str =
    "Capacity needs in healthcare infrastructure point to significant potential for private health services";
const HEALTH_ACTIONS: [&str; 2] = [
    "Close the capacity gap by opening private hospitals or clinics offering quality care.",
    "Strengthen healthcare infrastructure by hiring the staff it needs.",
];

const FALLBACK_ACTIONS: [&str; 2] = [
    "Develop business models tailored to the region's specific needs through market research.",
    "Invest in vocational training programmes that raise local workforce skills.",
];

/// Everything the composer needs for one region
pub struct NarrativeInputs<'a> {
    pub region: &'a str,
    /// Scored sectors, best first
    pub ranked: &'a [SectorRecord],
    pub opportunities: &'a [OpportunitySignal],
    pub foreign_sales: Option<f64>,
}

/// Ordered, capped action list, unique ignoring case
struct ActionList {
    items: Vec<String>,
}

impl ActionList {
    fn new() -> Self {
        Self { items: Vec::new() }
    }

    fn is_full(&self) -> bool {
        self.items.len() >= MAX_ACTIONS
    }

    /// Returns whether the action was taken
    fn push(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() || self.is_full() {
            return false;
        }
        let key = text.to_lowercase();
        if self.items.iter().any(|a| a.to_lowercase() == key) {
            return false;
        }
        self.items.push(text.to_string());
        true
    }
}

/// Sector family of a label, by keyword; first match wins
pub fn classify_sector(label: &str) -> Option<SectorTheme> {
    let key = normalize_key(label);
    if contains_any(&key, &["imalat", "sanayi", "manufactur", "industr"]) {
        Some(SectorTheme::Industry)
    } else if contains_any(&key, &["tarim", "tarım", "agricultur"]) {
        Some(SectorTheme::Agriculture)
    } else if contains_any(&key, &["kamu", "egitim", "public", "educat"]) {
        Some(SectorTheme::PublicServices)
    } else if contains_any(&key, &["hizmetler", "services"]) {
        Some(SectorTheme::Services)
    } else if contains_any(&key, &["gayrimenkul", "insaat", "real estate", "construct"]) {
        Some(SectorTheme::RealEstate)
    } else {
        None
    }
}

/// Rationale sentence and actions suggested for a sector family
struct SectorTemplate {
    rationale: &'static str,
    actions: &'static [&'static str],
}

const INDUSTRY: SectorTemplate = SectorTemplate {
    rationale: "Industry and manufacturing play a central role in the regional economy and give new investment a solid base",
    actions: &[
        "Invest in technology-driven modernisation and capacity expansion in organised industrial zones.",
        "Set up new production lines for product groups with high export potential.",
    ],
};

const AGRICULTURE: SectorTemplate = SectorTemplate {
    rationale: "Agriculture offers significant value-added opportunities given the region's geography and potential",
    actions: &[
        "Build modern facilities for processing, packaging and branding agricultural products.",
        "Raise yield per hectare with smart farming and modern irrigation technology.",
    ],
};

const PUBLIC_SERVICES: SectorTemplate = SectorTemplate {
    rationale: "The weight of public and education services creates a market for private ventures serving these sectors",
    actions: &["Support education infrastructure by opening private schools and course centres."],
};

const TOURISM_SERVICES: SectorTemplate = SectorTemplate {
    rationale: "The region's natural and cultural assets offer a distinctive setting for value-added investment in tourism and related services",
    actions: &[
        "Invest in tourism segments that fit the region's identity.",
        "Raise hotel quality and reach international markets through digital marketing.",
    ],
};

const URBAN_SERVICES: SectorTemplate = SectorTemplate {
    rationale: "Activity in retail, logistics and business services shows the dynamism of the local economy and leaves room for efficiency-focused investment",
    actions: &["Optimise urban logistics services."],
};

const REAL_ESTATE: SectorTemplate = SectorTemplate {
    rationale: "Urban development and strong demand make construction and real estate attractive",
    actions: &[
        "Develop energy-efficient, sustainable green building housing projects.",
        "Offer facility management and professional real estate consultancy services.",
    ],
};

fn sector_template(theme: SectorTheme, tourism: bool) -> &'static SectorTemplate {
    match theme {
        SectorTheme::Industry => &INDUSTRY,
        SectorTheme::Agriculture => &AGRICULTURE,
        SectorTheme::PublicServices => &PUBLIC_SERVICES,
        SectorTheme::Services if tourism => &TOURISM_SERVICES,
        SectorTheme::Services => &URBAN_SERVICES,
        SectorTheme::RealEstate => &REAL_ESTATE,
    }
}

/// Builds the narrative recommendation from scored sectors and signals
pub struct NarrativeComposer;

impl NarrativeComposer {
    pub fn compose(inputs: &NarrativeInputs<'_>) -> Recommendation {
        let top_sector = inputs
            .ranked
            .first()
            .map(|r| r.sector.as_str())
            .unwrap_or(FALLBACK_TOP_SECTOR);
        let headline = format!("{} growth strategy focused on {}", inputs.region, top_sector);

        let has = |kind: OpportunityKind| inputs.opportunities.iter().any(|o| o.kind == kind);
        let tourism = has(OpportunityKind::Tourism);

        let mut actions = ActionList::new();
        let mut rationale: Vec<String> = Vec::new();

        for record in inputs.ranked {
            if actions.is_full() {
                break;
            }
            let Some(theme) = classify_sector(&record.sector) else {
                continue;
            };
            let template = sector_template(theme, tourism);
            let mut accepted = false;
            for action in template.actions {
                accepted |= actions.push(action);
            }
            if accepted && !rationale.iter().any(|r| r == template.rationale) {
                rationale.push(template.rationale.to_string());
            }
        }

        if has(OpportunityKind::RealEstate) {
            rationale.push(REAL_ESTATE_RATIONALE.to_string());
            actions.push(REAL_ESTATE_ACTION);
            if inputs.foreign_sales.is_some_and(|v| v > FOREIGN_BUYER_ACTION_MIN) {
                actions.push(FOREIGN_BUYER_ACTION);
            }
        }

        if has(OpportunityKind::Health) {
            rationale.push(HEALTH_RATIONALE.to_string());
            for action in HEALTH_ACTIONS {
                actions.push(action);
            }
        }

        if rationale.is_empty() {
            rationale.push(format!(
                "The {} economy shows diversified growth potential led by the {} sector. \
                 Investment in the identified strategic areas will speed up regional development",
                inputs.region, top_sector
            ));
        }
        if actions.items.is_empty() {
            for action in FALLBACK_ACTIONS {
                actions.push(action);
            }
        }

        Recommendation {
            headline,
            rationale: join_sentences(&rationale),
            actions: actions.items,
        }
    }

    /// One-line digest of the best sectors, e.g. "Leading sectors: Sanayi: score 100%"
    ///
    /// Percentages round half to even, so 12.5% reads as 12%.
    pub fn summary_line(ranked: &[SectorRecord]) -> String {
        if ranked.is_empty() {
            return "Limited data.".to_string();
        }
        let highlights: Vec<String> = ranked
            .iter()
            .take(SUMMARY_TOP_N)
            .map(|r| format!("{}: score {}%", r.sector, (r.score * 100.0).round_ties_even() as i64))
            .collect();
        format!("Leading sectors: {}", highlights.join(", "))
    }
}

/// Trim, drop case-insensitive repeats, end each part with a period
fn join_sentences(parts: &[String]) -> String {
    let mut seen: Vec<String> = Vec::new();
    let mut sentences: Vec<String> = Vec::new();
    for part in parts {
        let text = part.trim();
        if text.is_empty() {
            continue;
        }
        let key = text.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        if text.ends_with('.') {
            sentences.push(text.to_string());
        } else {
            sentences.push(format!("{}.", text));
        }
    }
    sentences.join(" ")
}
