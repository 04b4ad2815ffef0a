//! Secret providers resolving named credentials.

use std::collections::HashMap;
use std::env;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("Secret '{0}' is not set")]
    NotFound(String),

    #[error("Secret '{name}' could not be read: {reason}")]
    Unreadable { name: String, reason: String },
}

/// Resolves a named credential to its current value.
pub trait SecretProvider: Send + Sync {
    fn resolve(&self, name: &str) -> Result<String, SecretError>;
}

/// Reads secrets from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretProvider;

/// Serves secrets from an in-memory map.
#[derive(Debug, Clone, Default)]
pub struct StaticSecretProvider {
    secrets: HashMap<String, String>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl StaticSecretProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret, replacing any previous value under the same name.
    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl SecretProvider for EnvSecretProvider {
    fn resolve(&self, name: &str) -> Result<String, SecretError> {
        match env::var(name) {
            Ok(value) if !value.is_empty() => Ok(value),
            Ok(_) | Err(env::VarError::NotPresent) => Err(SecretError::NotFound(name.to_string())),
            Err(e @ env::VarError::NotUnicode(_)) => Err(SecretError::Unreadable {
                name: name.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

impl SecretProvider for StaticSecretProvider {
    fn resolve(&self, name: &str) -> Result<String, SecretError> {
        self.secrets
            .get(name)
            .filter(|v| !v.is_empty())
            .cloned()
            .ok_or_else(|| SecretError::NotFound(name.to_string()))
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_provider_resolves_known_secret() {
        let provider = StaticSecretProvider::new().with_secret("API_KEY", "abc123");
        assert_eq!(provider.resolve("API_KEY").unwrap(), "abc123");
    }

    #[test]
    fn test_static_provider_missing_secret() {
        let provider = StaticSecretProvider::new();
        let err = provider.resolve("API_KEY").unwrap_err();
        assert!(matches!(err, SecretError::NotFound(ref name) if name == "API_KEY"));
    }

    #[test]
    fn test_static_provider_empty_value_is_missing() {
        let provider = StaticSecretProvider::new().with_secret("API_KEY", "");
        assert!(provider.resolve("API_KEY").is_err());
    }

    #[test]
    fn test_env_provider_missing_secret() {
        let err = EnvSecretProvider
            .resolve("NIH_REPORTER_TEST_SECRET_THAT_IS_NEVER_SET")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Secret 'NIH_REPORTER_TEST_SECRET_THAT_IS_NEVER_SET' is not set"
        );
    }
}
