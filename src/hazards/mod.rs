//! Point-in-zone queries against the configured hazard layers.

use std::time::Duration;

use crate::api::arcgis;
use crate::config::LayerEndpoints;
use crate::domain::{Coordinate, HazardLayer, HazardLayerConfig, RawQueryResult};

/// Raw results for all three layers.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerResults {
    pub fault_zone: RawQueryResult,
    pub liquefaction_zone: RawQueryResult,
    pub landslide_zone: RawQueryResult,
}

#[derive(Debug, Clone)]
pub struct HazardZoneQuerier {
    client: reqwest::Client,
    timeout: Duration,
}

impl HazardZoneQuerier {
    pub fn new(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Query one layer. Never fails: a missing endpoint or a failed request
    /// becomes a `RawQueryResult` state for this layer only.
    pub async fn query_layer(&self, config: &HazardLayerConfig, point: Coordinate) -> RawQueryResult {
        let layer = config.layer.key();
        let Some(url) = config.endpoint() else {
            tracing::debug!(layer, "Layer not configured, skipping");
            return RawQueryResult::NotConfigured;
        };

        match arcgis::query_point(&self.client, url, point, self.timeout).await {
            Ok(features) => {
                tracing::info!(layer, features = features.len(), "Layer queried");
                RawQueryResult::Success(features)
            }
            Err(e) => {
                tracing::warn!(layer, "Layer query failed: {:#}", e);
                RawQueryResult::Failed(format!("{:#}", e))
            }
        }
    }

    /// Query all layers concurrently; results are combined once every layer
    /// has answered.
    pub async fn query_all(&self, endpoints: &LayerEndpoints, point: Coordinate) -> LayerResults {
        let fault = endpoints.layer_config(HazardLayer::FaultZone);
        let liquefaction = endpoints.layer_config(HazardLayer::LiquefactionZone);
        let landslide = endpoints.layer_config(HazardLayer::LandslideZone);

        let (fault_zone, liquefaction_zone, landslide_zone) = tokio::join!(
            self.query_layer(&fault, point),
            self.query_layer(&liquefaction, point),
            self.query_layer(&landslide, point),
        );

        LayerResults {
            fault_zone,
            liquefaction_zone,
            landslide_zone,
        }
    }
}
