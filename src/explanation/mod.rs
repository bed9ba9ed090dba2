pub mod types;
pub mod generator;

pub use types::{Recommendation, SectorTheme};
pub use generator::{classify_sector, NarrativeComposer, NarrativeInputs, FOREIGN_BUYER_ACTION_MIN, MAX_ACTIONS};
