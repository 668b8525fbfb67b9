use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;

use crate::config::GeocoderConfig;
use crate::domain::Coordinate;

/// Census address ranges benchmark used for one-line lookups.
const BENCHMARK: &str = "2020";

#[derive(Debug, Deserialize, Default)]
struct CensusResponse {
    #[serde(default)]
    result: CensusResult,
}

#[derive(Debug, Deserialize, Default)]
struct CensusResult {
    #[serde(default, rename = "addressMatches")]
    address_matches: Vec<AddressMatch>,
}

#[derive(Debug, Deserialize)]
struct AddressMatch {
    #[serde(default, rename = "matchedAddress")]
    matched_address: Option<String>,
    coordinates: CensusCoordinates,
}

/// `x` is longitude, `y` is latitude.
#[derive(Debug, Deserialize)]
struct CensusCoordinates {
    x: f64,
    y: f64,
}

/// Geocode a one-line US address with the Census Bureau geocoder.
pub async fn geocode(
    client: &reqwest::Client,
    config: &GeocoderConfig,
    address: &str,
) -> Result<Coordinate> {
    let response = client
        .get(&config.census_url)
        .query(&[
            ("address", address),
            ("benchmark", BENCHMARK),
            ("format", "json"),
        ])
        .timeout(config.timeout())
        .send()
        .await
        .context("Failed to send request to Census geocoder")?;

    if !response.status().is_success() {
        bail!("Census geocoder returned error status: {}", response.status());
    }

    let body: CensusResponse = response
        .json()
        .await
        .context("Failed to parse Census geocoder JSON response")?;

    first_match(body).with_context(|| format!("Address not found: {}", address))
}

fn first_match(body: CensusResponse) -> Result<Coordinate> {
    let matched = body
        .result
        .address_matches
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("Census geocoder returned no address matches"))?;

    if let Some(name) = &matched.matched_address {
        tracing::debug!("Census matched {:?}", name);
    }

    let CensusCoordinates { x, y } = matched.coordinates;
    Coordinate::checked(x, y)
        .ok_or_else(|| anyhow!("Census geocoder returned an invalid coordinate ({}, {})", x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_census_response() {
        let json = r#"{
            "result": {
                "input": {"address": {"address": "200 E Santa Clara St, San Jose, CA"}},
                "addressMatches": [
                    {"matchedAddress": "200 E SANTA CLARA ST, SAN JOSE, CA, 95113",
                     "coordinates": {"x": -121.88632, "y": 37.33774}},
                    {"matchedAddress": "200 W SANTA CLARA ST, SAN JOSE, CA, 95113",
                     "coordinates": {"x": -121.89301, "y": 37.33369}}
                ]
            }
        }"#;
        let body: CensusResponse = serde_json::from_str(json).unwrap();

        let coordinate = first_match(body).unwrap();
        assert_eq!(coordinate, Coordinate::new(-121.88632, 37.33774));
    }

    #[test]
    fn test_no_matches_is_an_error() {
        let body: CensusResponse =
            serde_json::from_str(r#"{"result": {"addressMatches": []}}"#).unwrap();
        assert!(first_match(body).is_err());

        let body: CensusResponse = serde_json::from_str("{}").unwrap();
        assert!(first_match(body).is_err());
    }
}
