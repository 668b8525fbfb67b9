//! Reduction of raw layer query results into report findings.

use crate::domain::{Attributes, Finding, Findings, RawQueryResult};
use crate::hazards::LayerResults;

/// Attributes carried from the first matching feature into a finding.
pub const MAX_ATTRIBUTES: usize = 3;

/// Normalize one layer's raw result.
///
/// Only the first feature contributes attributes; later features are ignored.
pub fn synthesize(raw: &RawQueryResult) -> Finding {
    let features = raw.features();
    let attributes: Attributes = features
        .first()
        .map(|feature| {
            feature
                .attributes
                .iter()
                .take(MAX_ATTRIBUTES)
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        })
        .unwrap_or_default();

    Finding {
        configured: raw.configured(),
        hit: !features.is_empty(),
        attributes,
        error: raw.error().map(str::to_string),
    }
}

pub fn synthesize_all(raw: &LayerResults) -> Findings {
    Findings {
        fault_zone: synthesize(&raw.fault_zone),
        liquefaction_zone: synthesize(&raw.liquefaction_zone),
        landslide_zone: synthesize(&raw.landslide_zone),
    }
}
