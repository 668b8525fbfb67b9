use serde::{Deserialize, Serialize};

/// The fixed set of hazard datasets screened for every address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardLayer {
    FaultZone,
    LiquefactionZone,
    LandslideZone,
}

impl HazardLayer {
    /// Report order.
    pub const ALL: [HazardLayer; 3] = [
        HazardLayer::FaultZone,
        HazardLayer::LiquefactionZone,
        HazardLayer::LandslideZone,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            HazardLayer::FaultZone => "fault_zone",
            HazardLayer::LiquefactionZone => "liquefaction_zone",
            HazardLayer::LandslideZone => "landslide_zone",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HazardLayer::FaultZone => "Alquist–Priolo Earthquake Fault Zone",
            HazardLayer::LiquefactionZone => "Seismic Hazard Zone – Liquefaction",
            HazardLayer::LandslideZone => "Seismic Hazard Zone – Earthquake-Induced Landslide",
        }
    }
}

/// A hazard layer paired with the endpoint that serves it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HazardLayerConfig {
    pub layer: HazardLayer,
    url: Option<String>,
}

impl HazardLayerConfig {
    /// Blank URLs count as "not configured".
    pub fn new(layer: HazardLayer, url: Option<&str>) -> Self {
        let url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string);
        Self { layer, url }
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some()
    }
}
