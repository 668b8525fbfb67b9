//! PDF rendering of screening results.

pub mod layout;
pub mod pdf;

use thiserror::Error;

use crate::domain::AnalysisResult;

pub use layout::{Cursor, TextLine, layout};

const FILENAME_SUFFIX: &str = "_geotech_seismic_report.pdf";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to encode page content: {0}")]
    Content(String),

    #[error("Failed to write PDF document: {0}")]
    Write(String),
}

/// Render the report as an in-memory PDF. Identical input yields identical bytes.
pub fn render(result: &AnalysisResult) -> Result<Vec<u8>, RenderError> {
    pdf::encode(&layout(result))
}

/// Download filename for an address: commas dropped, spaces to underscores.
pub fn report_filename(address: &str) -> String {
    format!("{}{}", address.replace(',', "").replace(' ', "_"), FILENAME_SUFFIX)
}
