use thiserror::Error;

use crate::report::RenderError;

/// Failures that end a screening request.
///
/// Unconfigured or failed hazard layers are not errors; they are carried as
/// degraded findings.
#[derive(Debug, Error)]
pub enum ScreeningError {
    #[error("{0}")]
    InputInvalid(String),

    #[error("geocoding failed; verify address")]
    GeocodeUnavailable,

    #[error(transparent)]
    RenderFailure(#[from] RenderError),
}
