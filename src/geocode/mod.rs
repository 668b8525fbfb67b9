//! Address resolution through an ordered chain of geocoding providers.
//!
//! Providers are tried one at a time in a fixed order (Census, then
//! Nominatim). The first provider that yields a candidate wins and later
//! providers are never consulted. A provider that fails for any reason
//! simply passes the address on to the next one; only exhausting the chain
//! is reported to the caller.

use anyhow::Result;

use crate::api::{census, nominatim};
use crate::config::GeocoderConfig;
use crate::domain::{Address, Coordinate};
use crate::error::ScreeningError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeocodingProvider {
    Census,
    Nominatim,
}

impl GeocodingProvider {
    pub fn name(&self) -> &'static str {
        match self {
            GeocodingProvider::Census => "census",
            GeocodingProvider::Nominatim => "nominatim",
        }
    }

    async fn lookup(
        &self,
        client: &reqwest::Client,
        config: &GeocoderConfig,
        address: &str,
    ) -> Result<Coordinate> {
        match self {
            GeocodingProvider::Census => census::geocode(client, config, address).await,
            GeocodingProvider::Nominatim => nominatim::geocode(client, config, address).await,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AddressResolver {
    client: reqwest::Client,
    config: GeocoderConfig,
}

impl AddressResolver {
    pub fn new(client: reqwest::Client, config: GeocoderConfig) -> Self {
        Self { client, config }
    }

    /// Enabled providers in the order they are tried.
    pub fn providers(&self) -> Vec<GeocodingProvider> {
        let mut providers = Vec::with_capacity(2);
        if self.config.use_census {
            providers.push(GeocodingProvider::Census);
        }
        if self.config.use_nominatim {
            providers.push(GeocodingProvider::Nominatim);
        }
        providers
    }

    pub async fn resolve(&self, address: &Address) -> Result<Coordinate, ScreeningError> {
        for provider in self.providers() {
            match provider
                .lookup(&self.client, &self.config, address.as_str())
                .await
            {
                Ok(coordinate) => {
                    tracing::info!(
                        provider = provider.name(),
                        lon = coordinate.lon,
                        lat = coordinate.lat,
                        "Geocoded address"
                    );
                    return Ok(coordinate);
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), "Geocoder declined: {:#}", e);
                }
            }
        }

        Err(ScreeningError::GeocodeUnavailable)
    }
}
