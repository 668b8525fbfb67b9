use anyhow::{Context, Result, anyhow, bail};
use reqwest::header::USER_AGENT;
use serde::Deserialize;

use crate::config::GeocoderConfig;
use crate::domain::Coordinate;

#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Geocode a free-text address with the Nominatim search API.
///
/// Nominatim's usage policy requires an identifying User-Agent, so the
/// configured one is sent explicitly on every request.
///
/// # Returns
/// * `Ok(Coordinate)` - the first candidate
/// * `Err` - transport failure, non-2xx status, malformed payload or no match
pub async fn geocode(
    client: &reqwest::Client,
    config: &GeocoderConfig,
    address: &str,
) -> Result<Coordinate> {
    let response = client
        .get(&config.nominatim_url)
        .header(USER_AGENT, &config.user_agent)
        .query(&[("q", address), ("format", "json"), ("limit", "1")])
        .timeout(config.timeout())
        .send()
        .await
        .context("Failed to send request to Nominatim API")?;

    if !response.status().is_success() {
        bail!("Nominatim API returned error status: {}", response.status());
    }

    let results: Vec<NominatimResult> = response
        .json()
        .await
        .context("Failed to parse Nominatim JSON response")?;

    first_coordinate(results).with_context(|| format!("Address not found: {}", address))
}

fn first_coordinate(results: Vec<NominatimResult>) -> Result<Coordinate> {
    let result = results
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("Nominatim returned no results"))?;

    let lat: f64 = result
        .lat
        .trim()
        .parse()
        .context("Failed to parse latitude from Nominatim response")?;
    let lon: f64 = result
        .lon
        .trim()
        .parse()
        .context("Failed to parse longitude from Nominatim response")?;

    if let Some(name) = &result.display_name {
        tracing::debug!("Nominatim matched {:?}", name);
    }

    Coordinate::checked(lon, lat)
        .ok_or_else(|| anyhow!("Nominatim returned an invalid coordinate ({}, {})", lon, lat))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nominatim_response() {
        let json = r#"[{"lat":"37.3361663","lon":"-121.890591","display_name":"San Jose, Santa Clara County, California, United States"}]"#;
        let results: Vec<NominatimResult> = serde_json::from_str(json).unwrap();

        let coordinate = first_coordinate(results).unwrap();
        assert_eq!(coordinate, Coordinate::new(-121.890591, 37.3361663));
    }

    #[test]
    fn test_empty_response_is_an_error() {
        let results: Vec<NominatimResult> = serde_json::from_str("[]").unwrap();
        assert!(first_coordinate(results).is_err());
    }

    #[test]
    fn test_unparsable_latitude_is_an_error() {
        let json = r#"[{"lat":"north","lon":"-121.89"}]"#;
        let results: Vec<NominatimResult> = serde_json::from_str(json).unwrap();
        assert!(first_coordinate(results).is_err());
    }

    #[test]
    fn test_out_of_range_coordinate_is_an_error() {
        let json = r#"[{"lat":"95.0","lon":"-121.89"}]"#;
        let results: Vec<NominatimResult> = serde_json::from_str(json).unwrap();
        assert!(first_coordinate(results).is_err());
    }
}
