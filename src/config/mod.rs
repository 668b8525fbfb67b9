use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::{HazardLayer, HazardLayerConfig};

fn default_true() -> bool {
    true
}
fn default_census_url() -> String {
    "https://geocoding.geo.census.gov/geocoder/locations/onelineaddress".to_string()
}
fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}
fn default_user_agent() -> String {
    "RGSA-open-source/1.0".to_string()
}
fn default_geocoder_timeout_secs() -> u64 {
    20
}
fn default_layer_timeout_secs() -> u64 {
    30
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

/// Geocoding provider chain settings. Census is tried first, Nominatim second.
#[derive(Debug, Deserialize, Clone)]
pub struct GeocoderConfig {
    #[serde(default = "default_true")]
    pub use_census: bool,
    #[serde(default = "default_true")]
    pub use_nominatim: bool,
    #[serde(default = "default_census_url")]
    pub census_url: String,
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_geocoder_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            use_census: true,
            use_nominatim: true,
            census_url: default_census_url(),
            nominatim_url: default_nominatim_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_geocoder_timeout_secs(),
        }
    }
}

impl GeocoderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Hazard layer endpoints. An absent or empty URL leaves the layer unconfigured.
#[derive(Debug, Deserialize, Clone)]
pub struct LayerEndpoints {
    #[serde(default)]
    pub fault_zone: Option<String>,
    #[serde(default)]
    pub liquefaction_zone: Option<String>,
    #[serde(default)]
    pub landslide_zone: Option<String>,
    #[serde(default = "default_layer_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LayerEndpoints {
    fn default() -> Self {
        Self {
            fault_zone: None,
            liquefaction_zone: None,
            landslide_zone: None,
            timeout_secs: default_layer_timeout_secs(),
        }
    }
}

impl LayerEndpoints {
    pub fn layer_config(&self, layer: HazardLayer) -> HazardLayerConfig {
        let url = match layer {
            HazardLayer::FaultZone => self.fault_zone.as_deref(),
            HazardLayer::LiquefactionZone => self.liquefaction_zone.as_deref(),
            HazardLayer::LandslideZone => self.landslide_zone.as_deref(),
        };
        HazardLayerConfig::new(layer, url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl ServerConfig {
    /// `*` anywhere in the list (or an empty list) allows any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Process-wide settings, fixed at startup and read-only afterwards.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub layers: LayerEndpoints,
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Resolve configuration: defaults, then the TOML file (explicit path or
    /// the first one found on the search path), then environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::discover().unwrap_or_default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config file not found: {:?}", path);
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn discover() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => {
                        tracing::info!("Loaded config file {:?}", path);
                        return Some(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Overlay environment settings. `lookup` is `std::env::var` in production.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("USE_CENSUS_GEOCODER") {
            self.geocoder.use_census = parse_flag(&v);
        }
        if let Some(v) = lookup("USE_NOMINATIM_FALLBACK") {
            self.geocoder.use_nominatim = parse_flag(&v);
        }
        if let Some(v) = lookup("CENSUS_GEOCODER_URL") {
            self.geocoder.census_url = v.trim().to_string();
        }
        if let Some(v) = lookup("NOMINATIM_URL") {
            self.geocoder.nominatim_url = v.trim().to_string();
        }

        if let Some(v) = lookup("CGS_AP_FAULT_ZONE_URL") {
            self.layers.fault_zone = Some(v);
        }
        if let Some(v) = lookup("CGS_LIQUEFACTION_ZONE_URL") {
            self.layers.liquefaction_zone = Some(v);
        }
        if let Some(v) = lookup("CGS_LANDSLIDE_ZONE_URL") {
            self.layers.landslide_zone = Some(v);
        }

        if let Some(v) = lookup("ALLOWED_ORIGINS") {
            self.server.allowed_origins = parse_origins(&v);
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.trim().parse().ok()) {
            self.server.port = port;
        }
    }
}

fn parse_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

fn parse_origins(value: &str) -> Vec<String> {
    let origins: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();
    if origins.is_empty() {
        default_allowed_origins()
    } else {
        origins
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("hazardscreen.toml"));
    paths.push(PathBuf::from(".hazardscreen.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("hazardscreen").join("config.toml"));
        paths.push(config_dir.join("hazardscreen.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".hazardscreen.toml"));
    }

    paths
}
