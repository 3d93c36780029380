use serde::Serialize;
use utoipa::ToSchema;

/// The two fixed-format lines of a TLE, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ElementSet {
    pub line1: String,
    pub line2: String,
}

impl ElementSet {
    /// Builds an element set from raw lines, rejecting blank ones.
    pub fn new(line1: &str, line2: &str) -> Option<Self> {
        let line1 = line1.trim();
        let line2 = line2.trim();
        if line1.is_empty() || line2.is_empty() {
            return None;
        }
        Some(Self {
            line1: line1.to_string(),
            line2: line2.to_string(),
        })
    }
}

/// A tracked satellite, immutable once loaded
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SatelliteRecord {
    pub id: String,
    pub name: String,
    pub element_set: ElementSet,
}

/// Entry of the satellite chooser
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SatelliteChoice {
    pub id: String,
    pub name: String,
}
