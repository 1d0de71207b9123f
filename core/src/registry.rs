//! Named transport clients.
//!
//! # Design
//! A `ClientRegistry` hands out a `Transport` by logical client name. The
//! invoker acquires one per call and drops it when the call ends, so nothing
//! call-specific outlives the invocation. `ReqwestRegistry` keeps one pooled
//! `reqwest::Client` per configured name and wraps it in a fresh
//! `NamedClient` handle on every acquire; connection pooling, default headers,
//! base address and timeout are fixed at configuration time.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;

use crate::config::{ClientConfig, ConfigError};
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one `HttpRequest`.
///
/// Non-success statuses are returned as data; only failures that prevent a
/// response from being received are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Source of ready-to-use transport clients, keyed by logical name.
pub trait ClientRegistry: Send + Sync {
    type Client: Transport;

    fn acquire(&self, client_name: &str) -> Self::Client;
}

#[derive(Debug, Clone)]
struct ClientEntry {
    client: reqwest::Client,
    base_address: Option<Url>,
}

/// Registry backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestRegistry {
    clients: BTreeMap<String, ClientEntry>,
    default: ClientEntry,
}

impl ReqwestRegistry {
    /// Build one pooled client per configured name.
    pub fn from_config(clients: &BTreeMap<String, ClientConfig>) -> Result<Self, ConfigError> {
        let mut entries = BTreeMap::new();
        for (name, config) in clients {
            entries.insert(name.clone(), build_entry(name, config)?);
        }
        Ok(Self {
            clients: entries,
            default: build_entry("default", &ClientConfig::default())?,
        })
    }

    pub fn is_configured(&self, client_name: &str) -> bool {
        self.clients.contains_key(client_name)
    }

    pub fn client_names(&self) -> impl Iterator<Item = &str> {
        self.clients.keys().map(String::as_str)
    }
}

impl ClientRegistry for ReqwestRegistry {
    type Client = NamedClient;

    /// Unknown names get a client with default settings.
    fn acquire(&self, client_name: &str) -> NamedClient {
        let entry = match self.clients.get(client_name) {
            Some(entry) => entry,
            None => {
                tracing::debug!(client = client_name, "No configuration for client, using defaults");
                &self.default
            }
        };
        NamedClient {
            name: client_name.to_string(),
            client: entry.client.clone(),
            base_address: entry.base_address.clone(),
        }
    }
}

fn build_entry(name: &str, config: &ClientConfig) -> Result<ClientEntry, ConfigError> {
    let mut headers = HeaderMap::new();
    for (key, value) in &config.default_headers {
        let invalid = || ConfigError::InvalidHeader {
            client: name.to_string(),
            header: key.clone(),
        };
        let key = HeaderName::from_bytes(key.as_bytes()).map_err(|_| invalid())?;
        let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        headers.insert(key, value);
    }

    let mut builder = reqwest::Client::builder().default_headers(headers);
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder.build().map_err(|source| ConfigError::Client {
        client: name.to_string(),
        source,
    })?;

    let base_address = config
        .base_address
        .as_deref()
        .map(|raw| {
            Url::parse(raw).map_err(|e| ConfigError::InvalidBaseAddress {
                client: name.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()?;

    Ok(ClientEntry {
        client,
        base_address,
    })
}

/// A per-call handle onto a pooled `reqwest::Client`.
#[derive(Debug)]
pub struct NamedClient {
    name: String,
    client: reqwest::Client,
    base_address: Option<Url>,
}

impl NamedClient {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute URLs are used as-is; relative ones are joined onto the base
    /// address.
    pub fn resolve(&self, url: &str) -> Result<Url, TransportError> {
        let invalid = |reason: String| TransportError::InvalidUrl {
            url: url.to_string(),
            reason,
        };
        match Url::parse(url) {
            Ok(url) => Ok(url),
            Err(e) => match &self.base_address {
                Some(base) => base.join(url).map_err(|e| invalid(e.to_string())),
                None => Err(invalid(format!(
                    "{e}; client '{}' has no base address",
                    self.name
                ))),
            },
        }
    }
}

#[async_trait]
impl Transport for NamedClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.resolve(&request.url)?;
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
        };

        // Request headers shadow the client's default headers of the same name.
        let mut builder = self.client.request(method, url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(entries: &[(&str, ClientConfig)]) -> ReqwestRegistry {
        let clients = entries
            .iter()
            .map(|(name, config)| (name.to_string(), config.clone()))
            .collect();
        ReqwestRegistry::from_config(&clients).unwrap()
    }

    #[test]
    fn acquire_known_client() {
        let reg = registry(&[("aircraft", ClientConfig::default())]);
        assert!(reg.is_configured("aircraft"));
        assert_eq!(reg.acquire("aircraft").name(), "aircraft");
    }

    #[test]
    fn acquire_unknown_client_uses_defaults() {
        let reg = registry(&[]);
        assert!(!reg.is_configured("airport"));
        let client = reg.acquire("airport");
        assert_eq!(client.name(), "airport");
        assert!(client.resolve("/airports").is_err());
    }

    #[test]
    fn absolute_url_is_used_as_is() {
        let reg = registry(&[(
            "aircraft",
            ClientConfig {
                base_address: Some("http://base.example".to_string()),
                ..ClientConfig::default()
            },
        )]);
        let url = reg.acquire("aircraft").resolve("https://svc/aircraft/1").unwrap();
        assert_eq!(url.as_str(), "https://svc/aircraft/1");
    }

    #[test]
    fn relative_url_joins_base_address() {
        let reg = registry(&[(
            "aircraft",
            ClientConfig {
                base_address: Some("http://base.example/api/".to_string()),
                ..ClientConfig::default()
            },
        )]);
        let url = reg.acquire("aircraft").resolve("aircraft/1").unwrap();
        assert_eq!(url.as_str(), "http://base.example/api/aircraft/1");
    }

    #[test]
    fn relative_url_without_base_is_invalid() {
        let reg = registry(&[("aircraft", ClientConfig::default())]);
        let err = reg.acquire("aircraft").resolve("/aircraft/1").unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl { .. }));
    }

    #[test]
    fn invalid_default_header_is_rejected() {
        let mut config = ClientConfig::default();
        config
            .default_headers
            .insert("bad header".to_string(), "x".to_string());
        let clients = BTreeMap::from([("aircraft".to_string(), config)]);
        let err = ReqwestRegistry::from_config(&clients).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHeader { .. }));
    }

    #[test]
    fn invalid_base_address_is_rejected() {
        let config = ClientConfig {
            base_address: Some("not a url".to_string()),
            ..ClientConfig::default()
        };
        let clients = BTreeMap::from([("aircraft".to_string(), config)]);
        let err = ReqwestRegistry::from_config(&clients).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseAddress { .. }));
    }
}
