//! HTTP handlers

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{
        HeaderValue, StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::error::ApiError;
use crate::domain::Address;
use crate::pipeline::Analyzer;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub address: Option<String>,
}

/// Health check endpoint
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Screen an address and return the PDF report as an attachment.
pub async fn analyze(
    State(analyzer): State<Analyzer>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|e| {
        tracing::debug!("Rejected analyze payload: {}", e);
        ApiError::InvalidRequest("address is required".to_string())
    })?;

    let address = Address::parse(request.address.as_deref().unwrap_or_default())?;
    let report = analyzer.report(&address).await?;

    let headers = [
        (CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
        (CONTENT_DISPOSITION, attachment(&report.filename)),
    ];
    Ok((StatusCode::OK, headers, report.pdf).into_response())
}

/// `Content-Disposition` value; characters that cannot appear in a quoted
/// ASCII header parameter are replaced with `_`.
fn attachment(filename: &str) -> HeaderValue {
    let safe: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() || c == ' ') && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    HeaderValue::from_str(&format!("attachment; filename=\"{}\"", safe))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_header() {
        assert_eq!(
            attachment("123_Main_St_City_geotech_seismic_report.pdf"),
            "attachment; filename=\"123_Main_St_City_geotech_seismic_report.pdf\""
        );
        assert_eq!(
            attachment("Caf\u{e9}_\"A\"_geotech_seismic_report.pdf"),
            "attachment; filename=\"Caf___A__geotech_seismic_report.pdf\""
        );
    }
}
