use serde::{Deserialize, Deserializer, Serialize};

use super::{Address, Coordinate, HazardLayer};

/// Feature attributes in the order the service returned them.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// A single feature returned by a point-intersection query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Feature {
    /// Missing or `null` attributes read as an empty map.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub attributes: Attributes,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Attributes, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Attributes>::deserialize(deserializer)?.unwrap_or_default())
}

/// Outcome of querying one hazard layer.
///
/// The three states stay distinct so a missing endpoint is never mistaken
/// for a failed query.
#[derive(Debug, Clone, PartialEq)]
pub enum RawQueryResult {
    NotConfigured,
    Success(Vec<Feature>),
    Failed(String),
}

impl RawQueryResult {
    pub fn configured(&self) -> bool {
        !matches!(self, RawQueryResult::NotConfigured)
    }

    pub fn features(&self) -> &[Feature] {
        match self {
            RawQueryResult::Success(features) => features,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            RawQueryResult::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Normalized per-layer result surfaced in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub configured: bool,
    pub hit: bool,
    pub attributes: Attributes,
    pub error: Option<String>,
}

impl Finding {
    pub fn not_configured() -> Self {
        Self {
            configured: false,
            hit: false,
            attributes: Attributes::new(),
            error: None,
        }
    }

    pub fn status(&self) -> FindingStatus {
        match (self.configured, self.hit) {
            (false, _) => FindingStatus::NotConfigured,
            (true, false) => FindingStatus::No,
            (true, true) => FindingStatus::Yes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingStatus {
    NotConfigured,
    No,
    Yes,
}

impl FindingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingStatus::NotConfigured => "NOT CONFIGURED",
            FindingStatus::No => "NO",
            FindingStatus::Yes => "YES",
        }
    }
}

/// One finding per hazard layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Findings {
    pub fault_zone: Finding,
    pub liquefaction_zone: Finding,
    pub landslide_zone: Finding,
}

impl Findings {
    pub fn get(&self, layer: HazardLayer) -> &Finding {
        match layer {
            HazardLayer::FaultZone => &self.fault_zone,
            HazardLayer::LiquefactionZone => &self.liquefaction_zone,
            HazardLayer::LandslideZone => &self.landslide_zone,
        }
    }

    /// Findings in report order.
    pub fn iter(&self) -> impl Iterator<Item = (HazardLayer, &Finding)> {
        HazardLayer::ALL.into_iter().map(|layer| (layer, self.get(layer)))
    }
}

/// Everything the report renderer needs, rebuilt for each request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub address: Address,
    pub coordinate: Coordinate,
    pub findings: Findings,
}
