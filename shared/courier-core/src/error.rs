//! Error types for Courier services

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CourierError>;

#[derive(Error, Debug)]
pub enum CourierError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse failure: {0}")]
    ParseFailure(String),

    #[error("Unknown placeholder: {0}")]
    UnknownPlaceholder(String),

    #[error("No pending draft")]
    NoPendingDraft,

    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Network error: {0}")]
    Network(String),
}

impl CourierError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::ParseFailure(_) | Self::UnknownPlaceholder(_) => 400,
            Self::NotFound(_) => 404,
            Self::NoPendingDraft => 409,
            Self::Upstream(_) | Self::Network(_) => 502,
            _ => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::ParseFailure(_) => "PARSE_FAILURE",
            Self::UnknownPlaceholder(_) => "UNKNOWN_PLACEHOLDER",
            Self::NoPendingDraft => "NO_PENDING_DRAFT",
            Self::Upstream(_) => "UPSTREAM_FAILURE",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Network(_) => "NETWORK_ERROR",
        }
    }
}

impl From<std::io::Error> for CourierError {
    fn from(err: std::io::Error) -> Self {
        CourierError::Network(err.to_string())
    }
}

impl From<reqwest::Error> for CourierError {
    fn from(err: reqwest::Error) -> Self {
        CourierError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(CourierError::ParseFailure("x".into()).status_code(), 400);
        assert_eq!(CourierError::UnknownPlaceholder("x".into()).status_code(), 400);
        assert_eq!(CourierError::NotFound("x".into()).status_code(), 404);
        assert_eq!(CourierError::NoPendingDraft.status_code(), 409);
        assert_eq!(CourierError::Upstream("x".into()).status_code(), 502);
        assert_eq!(CourierError::Config("x".into()).status_code(), 500);
    }

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(CourierError::NoPendingDraft.error_code(), "NO_PENDING_DRAFT");
        assert_eq!(CourierError::Validation("x".into()).error_code(), "VALIDATION_ERROR");
    }
}
