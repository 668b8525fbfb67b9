pub mod address;
pub mod coordinate;
pub mod finding;
pub mod hazard;

pub use address::Address;
pub use coordinate::Coordinate;
pub use finding::{
    AnalysisResult, Attributes, Feature, Finding, FindingStatus, Findings, RawQueryResult,
};
pub use hazard::{HazardLayer, HazardLayerConfig};
