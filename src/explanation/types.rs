use serde::Serialize;

/// Narrative investment recommendation for a region
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub headline: String,
    /// Period-terminated sentences joined with a space
    pub rationale: String,
    /// At most five, unique ignoring case
    pub actions: Vec<String>,
}

/// Sector families that have action templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorTheme {
    Industry,
    Agriculture,
    PublicServices,
    Services,
    RealEstate,
}
