use serde::Serialize;
use std::fmt;

use crate::error::ScreeningError;

/// Free-text postal address as supplied by the caller.
///
/// Always trimmed and never empty once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn parse(raw: &str) -> Result<Self, ScreeningError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ScreeningError::InputInvalid(
                "address is required".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
