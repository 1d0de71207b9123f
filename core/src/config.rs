//! Endpoint and client configuration.
//!
//! Loaded from a camelCase JSON document:
//!
//! ```json
//! {
//!   "endpoints": {
//!     "aircraft": { "serviceEndpoint": "https://svc", "clientName": "aircraft" }
//!   },
//!   "clients": {
//!     "aircraft": { "timeoutSecs": 30, "defaultHeaders": { "x-api-key": "..." } }
//!   }
//! }
//! ```
//!
//! `AppConfig::from_env` reads the file named by `AIRTRAFFIC_CONFIG`, or
//! returns an empty configuration when the variable is unset.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::endpoint::EndpointDescriptor;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "AIRTRAFFIC_CONFIG";

/// Errors raised while loading configuration or building clients from it.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),

    #[error("client '{client}' has an invalid default header '{header}'")]
    InvalidHeader { client: String, header: String },

    #[error("client '{client}' has an invalid base address: {reason}")]
    InvalidBaseAddress { client: String, reason: String },

    #[error("failed to build client '{client}': {source}")]
    Client {
        client: String,
        source: reqwest::Error,
    },
}

/// A named downstream service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfig {
    pub service_endpoint: String,
    pub client_name: String,
}

/// Settings for one named transport client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    pub base_address: Option<String>,
    pub timeout_secs: Option<u64>,
    pub default_headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub endpoints: BTreeMap<String, EndpointConfig>,
    pub clients: BTreeMap<String, ClientConfig>,
}

impl AppConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_path(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    pub fn endpoint(&self, name: &str) -> Result<&EndpointConfig, ConfigError> {
        self.endpoints
            .get(name)
            .ok_or_else(|| ConfigError::UnknownEndpoint(name.to_string()))
    }

    /// Descriptor for a call to the configured endpoint `name`.
    pub fn descriptor(
        &self,
        name: &str,
        url_parameters: impl Into<String>,
    ) -> Result<EndpointDescriptor, ConfigError> {
        let endpoint = self.endpoint(name)?;
        Ok(EndpointDescriptor::new(
            endpoint.service_endpoint.clone(),
            url_parameters,
            endpoint.client_name.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "endpoints": {
            "aircraft": { "serviceEndpoint": "https://svc", "clientName": "aircraft" }
        },
        "clients": {
            "aircraft": {
                "baseAddress": "https://svc",
                "timeoutSecs": 30,
                "defaultHeaders": { "x-api-key": "secret" }
            }
        }
    }"#;

    #[test]
    fn parses_camel_case_document() {
        let config = AppConfig::from_json_str(SAMPLE).unwrap();
        let endpoint = config.endpoint("aircraft").unwrap();
        assert_eq!(endpoint.service_endpoint, "https://svc");
        assert_eq!(endpoint.client_name, "aircraft");

        let client = &config.clients["aircraft"];
        assert_eq!(client.timeout_secs, Some(30));
        assert_eq!(client.default_headers["x-api-key"], "secret");
    }

    #[test]
    fn sections_default_to_empty() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());

        let config = AppConfig::from_json_str(r#"{"clients":{"airport":{}}}"#).unwrap();
        assert_eq!(config.clients["airport"], ClientConfig::default());
    }

    #[test]
    fn descriptor_uses_endpoint_settings() {
        let config = AppConfig::from_json_str(SAMPLE).unwrap();
        let descriptor = config.descriptor("aircraft", "/aircraft/1").unwrap();
        assert_eq!(descriptor.target_url(), "https://svc/aircraft/1");
        assert_eq!(descriptor.client_name(), "aircraft");
    }

    #[test]
    fn unknown_endpoint_is_an_error() {
        let config = AppConfig::default();
        let err = config.descriptor("airport", "/airports").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownEndpoint(name) if name == "airport"));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = AppConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = AppConfig::from_path("/nonexistent/airtraffic.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
