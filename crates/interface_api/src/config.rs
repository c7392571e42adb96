//! API configuration
//!
//! Loaded from `API_*` environment variables (after `.env`), with nested
//! keys separated by a double underscore: `API_AGENCY__NAME`.

use serde::Deserialize;
use std::time::Duration;

use domain_documents::AgencyProfile;
use domain_submission::WorkflowSettings;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// HS256 signing secret
    pub jwt_secret: String,
    pub jwt_expiration_secs: u64,
    pub database_url: String,
    pub log_level: String,
    /// Signer portal base; envelope links are `{esign_base_url}?envelopeId=…`
    pub esign_base_url: String,
    /// Headless Chromium binary used for PDFs
    pub chromium_path: String,
    pub pdf_timeout_secs: u64,
    /// Producing agency printed on generated documents
    pub agency: AgencyProfile,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            database_url: "postgres://localhost/bind_portal".to_string(),
            log_level: "info".to_string(),
            esign_base_url: "http://localhost:3000/esign".to_string(),
            chromium_path: "chromium".to_string(),
            pdf_timeout_secs: 30,
            agency: AgencyProfile::default(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment; unset keys keep their defaults
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::with_prefix("API")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn pdf_timeout(&self) -> Duration {
        Duration::from_secs(self.pdf_timeout_secs)
    }

    pub fn workflow_settings(&self) -> WorkflowSettings {
        WorkflowSettings {
            signing_base_url: self.esign_base_url.clone(),
            ..WorkflowSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.pdf_timeout(), Duration::from_secs(30));
        assert_eq!(config.workflow_settings().signing_base_url, config.esign_base_url);
    }
}
