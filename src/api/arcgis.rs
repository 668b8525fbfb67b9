use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::{Coordinate, Feature};

/// Upper bound on features returned by one point query.
pub const MAX_RECORDS: &str = "10";

/// Raw ArcGIS REST `query` response.
///
/// ArcGIS servers report failures as an `error` envelope with HTTP 200.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub features: Option<Vec<Feature>>,
    #[serde(default)]
    pub error: Option<ArcGisError>,
}

#[derive(Debug, Deserialize)]
pub struct ArcGisError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Vec<String>,
}

impl QueryResponse {
    pub fn into_features(self) -> Result<Vec<Feature>> {
        if let Some(err) = self.error {
            let mut message = err.message;
            if !err.details.is_empty() {
                message = format!("{} ({})", message, err.details.join("; "));
            }
            match err.code {
                Some(code) => bail!("ArcGIS query failed with code {}: {}", code, message),
                None => bail!("ArcGIS query failed: {}", message),
            }
        }
        Ok(self.features.unwrap_or_default())
    }
}

/// Build the `query` operation URL for a layer endpoint.
pub fn query_url(layer_url: &str) -> String {
    format!("{}/query", layer_url.trim_end_matches('/'))
}

/// Point geometry in WGS84 as the ArcGIS JSON geometry parameter.
fn point_geometry(point: Coordinate) -> String {
    serde_json::json!({
        "x": point.lon,
        "y": point.lat,
        "spatialReference": {"wkid": 4326}
    })
    .to_string()
}

/// Run a point-intersection query against an ArcGIS feature/map service layer.
///
/// # Arguments
/// * `layer_url` - Layer endpoint, e.g. `.../MapServer/0`
/// * `point` - WGS84 point to test
/// * `timeout` - Budget for the whole request
///
/// # Returns
/// * Features intersecting the point, in the order the server returned them
pub async fn query_point(
    client: &reqwest::Client,
    layer_url: &str,
    point: Coordinate,
    timeout: Duration,
) -> Result<Vec<Feature>> {
    let geometry = point_geometry(point);

    let response = client
        .get(query_url(layer_url))
        .query(&[
            ("f", "json"),
            ("geometry", geometry.as_str()),
            ("geometryType", "esriGeometryPoint"),
            ("inSR", "4326"),
            ("spatialRel", "esriSpatialRelIntersects"),
            ("returnGeometry", "false"),
            ("outFields", "*"),
            ("resultRecordCount", MAX_RECORDS),
        ])
        .timeout(timeout)
        .send()
        .await
        .context("Failed to send request to ArcGIS layer")?;

    if !response.status().is_success() {
        bail!("ArcGIS layer returned error status: {}", response.status());
    }

    let body: QueryResponse = response
        .json()
        .await
        .context("Failed to parse ArcGIS JSON response")?;

    body.into_features()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_url_strips_trailing_slash() {
        assert_eq!(
            query_url("https://gis.example.com/arcgis/rest/services/AP/MapServer/0/"),
            "https://gis.example.com/arcgis/rest/services/AP/MapServer/0/query"
        );
        assert_eq!(
            query_url("https://gis.example.com/arcgis/rest/services/AP/MapServer/0"),
            "https://gis.example.com/arcgis/rest/services/AP/MapServer/0/query"
        );
    }

    #[test]
    fn test_point_geometry() {
        let geometry = point_geometry(Coordinate::new(-122.1, 37.4));
        assert_eq!(
            geometry,
            r#"{"x":-122.1,"y":37.4,"spatialReference":{"wkid":4326}}"#
        );
    }

    #[test]
    fn test_parse_query_response() {
        let json = r#"{
            "displayFieldName": "NAME",
            "features": [
                {"attributes": {"ZONE_ID": "AB12", "NAME": "Hayward"}},
                {"attributes": {"ZONE_ID": "CD34"}}
            ]
        }"#;
        let response: QueryResponse = serde_json::from_str(json).unwrap();
        let features = response.into_features().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].attributes["ZONE_ID"], "AB12");
        assert_eq!(features[1].attributes["ZONE_ID"], "CD34");
    }

    #[test]
    fn test_missing_features_is_empty() {
        let response: QueryResponse = serde_json::from_str(r#"{"features": null}"#).unwrap();
        assert!(response.into_features().unwrap().is_empty());
    }

    #[test]
    fn test_error_envelope_is_an_error() {
        let json = r#"{"error": {"code": 400, "message": "Invalid or missing input parameters.", "details": ["'geometry' parameter is invalid"]}}"#;
        let response: QueryResponse = serde_json::from_str(json).unwrap();
        let err = response.into_features().unwrap_err();
        assert_eq!(
            err.to_string(),
            "ArcGIS query failed with code 400: Invalid or missing input parameters. ('geometry' parameter is invalid)"
        );
    }
}
