//! Resolve → query → synthesize → render.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::{Address, AnalysisResult};
use crate::error::ScreeningError;
use crate::findings::synthesize_all;
use crate::geocode::AddressResolver;
use crate::hazards::HazardZoneQuerier;
use crate::report;

/// A finished report ready to hand back to the caller.
#[derive(Debug, Clone)]
pub struct Report {
    pub result: AnalysisResult,
    pub filename: String,
    pub pdf: Vec<u8>,
}

/// Runs screening requests against an immutable configuration.
///
/// Cheap to clone; clones share the HTTP connection pool and configuration.
#[derive(Debug, Clone)]
pub struct Analyzer {
    config: Arc<AppConfig>,
    resolver: AddressResolver,
    querier: HazardZoneQuerier,
}

impl Analyzer {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.geocoder.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: AppConfig, client: reqwest::Client) -> Self {
        let resolver = AddressResolver::new(client.clone(), config.geocoder.clone());
        let querier = HazardZoneQuerier::new(client, config.layers.timeout());
        Self {
            config: Arc::new(config),
            resolver,
            querier,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Geocode the address and screen the point against every hazard layer.
    ///
    /// Layer failures are folded into the findings; only an unresolvable
    /// address is an error.
    pub async fn analyze(&self, address: &Address) -> Result<AnalysisResult, ScreeningError> {
        let coordinate = self.resolver.resolve(address).await?;
        let raw = self.querier.query_all(&self.config.layers, coordinate).await;
        let findings = synthesize_all(&raw);

        Ok(AnalysisResult {
            address: address.clone(),
            coordinate,
            findings,
        })
    }

    /// Full pipeline including rendering.
    pub async fn report(&self, address: &Address) -> Result<Report, ScreeningError> {
        let result = self.analyze(address).await?;
        let pdf = report::render(&result)?;
        let filename = report::report_filename(address.as_str());

        tracing::info!(
            address = %address,
            bytes = pdf.len(),
            "Rendered screening report"
        );

        Ok(Report {
            result,
            filename,
            pdf,
        })
    }
}
