use rmcp::ErrorData as McpError;
use serde_json::json;

use crate::secret::SecretError;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ReporterError {
    #[error("Query must not be empty")]
    EmptyQuery,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] SecretError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Error querying NIH RePORTER API: {0}")]
    Transport(#[source] reqwest::Error),
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ReporterError {
    /// Get the error code for this error variant.
    pub fn code(&self) -> &'static str {
        match self {
            ReporterError::EmptyQuery => "EMPTY_QUERY",
            ReporterError::InvalidUrl(_) => "INVALID_URL",
            ReporterError::Configuration(_) => "CONFIGURATION_ERROR",
            ReporterError::Client(_) => "CLIENT_ERROR",
            ReporterError::Transport(_) => "TRANSPORT_ERROR",
        }
    }

    /// Whether this error was caused by the caller's input.
    pub fn is_validation(&self) -> bool {
        matches!(self, ReporterError::EmptyQuery)
    }

    /// Convert to MCP error with structured data.
    pub fn to_mcp_error(&self) -> McpError {
        let data = Some(json!({ "code": self.code() }));
        if self.is_validation() {
            McpError::invalid_params(self.to_string(), data)
        } else {
            McpError::internal_error(self.to_string(), data)
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ReporterError::EmptyQuery.code(), "EMPTY_QUERY");
        assert_eq!(ReporterError::InvalidUrl("x".into()).code(), "INVALID_URL");
        assert_eq!(
            ReporterError::Configuration(SecretError::NotFound("KEY".into())).code(),
            "CONFIGURATION_ERROR"
        );
    }

    #[test]
    fn test_validation_maps_to_invalid_params() {
        let err = ReporterError::EmptyQuery.to_mcp_error();
        assert_eq!(err.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert_eq!(err.data, Some(json!({ "code": "EMPTY_QUERY" })));
    }

    #[test]
    fn test_configuration_maps_to_internal_error() {
        let err = ReporterError::Configuration(SecretError::NotFound("KEY".into())).to_mcp_error();
        assert_eq!(err.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
        assert!(err.message.contains("KEY"));
    }
}
