//! Grant search against the NIH RePORTER projects API.

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::config::{API_KEY_SECRET, Config, DEFAULT_API_URL};
use crate::error::ReporterError;
use crate::secret::SecretProvider;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Default maximum number of results.
pub const DEFAULT_LIMIT: i32 = 10;

/// Prefix of every successful result.
pub const RESULTS_PREFIX: &str = "NIH RePORTER API Results: ";

/// Prefix of every transport failure.
pub const ERROR_PREFIX: &str = "Error querying NIH RePORTER API: ";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-api-key";

/// Project fields requested from the API.
pub const INCLUDE_FIELDS: &[&str] = &[
    "project_title",
    "project_num",
    "contact_pi_name",
    "organization_name",
    "award_amount",
    "fiscal_year",
    "project_start_date",
    "project_end_date",
    "abstract_text",
];

/// User-Agent header for requests.
const USER_AGENT: &str = concat!("nih-reporter/", env!("CARGO_PKG_VERSION"));

//--------------------------------------------------------------------------------------------------
// Types: Input
//--------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SearchFilters {
    /// Search query string to filter NIH grants and projects. Can include keywords,
    /// PI names, institutions, etc.
    pub query: String,

    /// Fiscal year to filter the grants/projects.
    #[serde(default)]
    pub fiscal_year: Option<i32>,

    /// Project activity code (e.g., R01, K99) to filter results.
    #[serde(default)]
    pub project_activity: Option<String>,

    /// Name of the organization/institution to filter results.
    #[serde(default)]
    pub org_name: Option<String>,

    /// Name of the Principal Investigator to filter results.
    #[serde(default)]
    pub pi_name: Option<String>,

    /// Maximum number of results to return. Defaults to 10.
    #[serde(default)]
    pub limit: Option<i32>,
}

//--------------------------------------------------------------------------------------------------
// Types: Request Body
//--------------------------------------------------------------------------------------------------

/// JSON body of a projects search request.
#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    pub criteria: Criteria<'a>,
    pub include_fields: &'static [&'static str],
    pub offset: i32,
    pub limit: i32,
}

/// Search criteria. Unset filters are left out of the body entirely.
#[derive(Debug, Serialize)]
pub struct Criteria<'a> {
    pub text: &'a str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiscal_years: Option<Vec<i32>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_codes: Option<Vec<&'a str>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_names: Option<Vec<&'a str>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pi_names: Option<Vec<&'a str>>,
}

//--------------------------------------------------------------------------------------------------
// Types: Tool
//--------------------------------------------------------------------------------------------------

/// Forwards search filters to the projects search endpoint and renders the reply as text.
#[derive(Clone)]
pub struct GrantSearchTool {
    client: reqwest::Client,
    endpoint: Url,
    secrets: Arc<dyn SecretProvider>,
}

//--------------------------------------------------------------------------------------------------
// Methods: SearchFilters
//--------------------------------------------------------------------------------------------------

impl SearchFilters {
    /// Create filters for a text query, rejecting an empty one.
    pub fn new(query: impl Into<String>) -> Result<Self, ReporterError> {
        let filters = Self {
            query: query.into(),
            ..Self::default()
        };
        filters.validate()?;
        Ok(filters)
    }

    /// Restrict results to one fiscal year.
    pub fn fiscal_year(mut self, year: i32) -> Self {
        self.fiscal_year = Some(year);
        self
    }

    /// Restrict results to one activity code.
    pub fn project_activity(mut self, code: impl Into<String>) -> Self {
        self.project_activity = Some(code.into());
        self
    }

    /// Restrict results to one organization.
    pub fn org_name(mut self, name: impl Into<String>) -> Self {
        self.org_name = Some(name.into());
        self
    }

    /// Restrict results to one principal investigator.
    pub fn pi_name(mut self, name: impl Into<String>) -> Self {
        self.pi_name = Some(name.into());
        self
    }

    /// Set the maximum number of results.
    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Reject an empty query before a request is sent.
    pub fn validate(&self) -> Result<(), ReporterError> {
        if self.query.trim().is_empty() {
            return Err(ReporterError::EmptyQuery);
        }

        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Methods: GrantSearchTool
//--------------------------------------------------------------------------------------------------

impl GrantSearchTool {
    /// Create a tool targeting the public projects search endpoint.
    pub fn new(secrets: Arc<dyn SecretProvider>) -> Result<Self, ReporterError> {
        let endpoint =
            Url::parse(DEFAULT_API_URL).map_err(|e| ReporterError::InvalidUrl(e.to_string()))?;

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(ReporterError::Client)?;

        Ok(Self {
            client,
            endpoint,
            secrets,
        })
    }

    /// Create a tool from loaded configuration.
    pub fn from_config(
        config: &Config,
        secrets: Arc<dyn SecretProvider>,
    ) -> Result<Self, ReporterError> {
        Ok(Self::new(secrets)?.with_endpoint(config.api_url.clone()))
    }

    /// Point the tool at a different endpoint.
    pub fn with_endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Endpoint the tool posts to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Run one search.
    ///
    /// Returns `Err` only for invalid filters or an unresolvable API key. Transport
    /// failures come back as `Ok` text starting with [`ERROR_PREFIX`]; successful
    /// replies start with [`RESULTS_PREFIX`].
    pub async fn execute(&self, filters: &SearchFilters) -> Result<String, ReporterError> {
        filters.validate()?;

        let api_key = self.secrets.resolve(API_KEY_SECRET)?;
        let body = build_request_body(filters);

        tracing::info!(query = %filters.query, limit = body.limit, "Searching NIH RePORTER");

        match self.send(&api_key, &body).await {
            Ok(results) => Ok(format!("{RESULTS_PREFIX}{results}")),
            Err(e) => {
                tracing::warn!(error = %e, "NIH RePORTER request failed");
                Ok(e.to_string())
            }
        }
    }

    async fn send(&self, api_key: &str, body: &SearchRequest<'_>) -> Result<Value, ReporterError> {
        tracing::debug!(endpoint = %self.endpoint, criteria = ?body.criteria, "POST projects search");

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await
            .map_err(ReporterError::Transport)?
            .error_for_status()
            .map_err(ReporterError::Transport)?;

        response.json().await.map_err(ReporterError::Transport)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Build the request body for a set of filters.
pub fn build_request_body(filters: &SearchFilters) -> SearchRequest<'_> {
    let criteria = Criteria {
        text: &filters.query,
        fiscal_years: filters.fiscal_year.filter(|&y| y != 0).map(|y| vec![y]),
        activity_codes: non_empty(&filters.project_activity).map(|v| vec![v]),
        org_names: non_empty(&filters.org_name).map(|v| vec![v]),
        pi_names: non_empty(&filters.pi_name).map(|v| vec![v]),
    };

    SearchRequest {
        criteria,
        include_fields: INCLUDE_FIELDS,
        offset: 0,
        limit: filters.limit.unwrap_or(DEFAULT_LIMIT),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
