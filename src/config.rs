//! Configuration for the NIH RePORTER MCP server.

use url::Url;

use crate::error::ReporterError;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Default projects search endpoint.
pub const DEFAULT_API_URL: &str = "https://api.reporter.nih.gov/v2/projects/search";

/// Environment variable for the endpoint override.
pub const API_URL_ENV: &str = "NIH_REPORTER_API_URL";

/// Name of the secret holding the API key.
pub const API_KEY_SECRET: &str = "NIH_REPORTER_API_KEY";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Projects search endpoint.
    pub api_url: Url,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ReporterError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ReporterError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = match lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            Some(raw) => parse_api_url(raw.trim())?,
            None => parse_api_url(DEFAULT_API_URL)?,
        };

        Ok(Self { api_url })
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

fn parse_api_url(raw: &str) -> Result<Url, ReporterError> {
    let url = Url::parse(raw).map_err(|e| ReporterError::InvalidUrl(format!("{raw}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ReporterError::InvalidUrl(format!(
            "Unsupported scheme: {}",
            url.scheme()
        )));
    }

    Ok(url)
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
