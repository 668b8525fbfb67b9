//! hazardscreen - Rapid geotechnical and seismic hazard screening reports

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod findings;
pub mod geocode;
pub mod hazards;
pub mod pipeline;
pub mod report;
pub mod server;

pub use config::AppConfig;
pub use error::ScreeningError;
pub use pipeline::{Analyzer, Report};
