//! Endpoint descriptors: one value per downstream call.

use serde::Serialize;

use crate::error::InvokeError;

/// Everything needed to address one downstream call.
///
/// Built by the caller for a single invocation and dropped afterwards.
/// `content` is only read by POST and PUT.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointDescriptor {
    service_endpoint: String,
    url_parameters: String,
    client_name: String,
    content: Option<serde_json::Value>,
}

impl EndpointDescriptor {
    pub fn new(
        service_endpoint: impl Into<String>,
        url_parameters: impl Into<String>,
        client_name: impl Into<String>,
    ) -> Self {
        Self {
            service_endpoint: service_endpoint.into(),
            url_parameters: url_parameters.into(),
            client_name: client_name.into(),
            content: None,
        }
    }

    /// Attach a request payload, serialized to JSON up front.
    pub fn with_content<C: Serialize>(mut self, content: &C) -> Result<Self, InvokeError> {
        let value = serde_json::to_value(content)
            .map_err(|e| InvokeError::Serialization(e.to_string()))?;
        self.content = Some(value);
        Ok(self)
    }

    pub fn service_endpoint(&self) -> &str {
        &self.service_endpoint
    }

    pub fn url_parameters(&self) -> &str {
        &self.url_parameters
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn content(&self) -> Option<&serde_json::Value> {
        self.content.as_ref()
    }

    /// The service endpoint with the URL parameters appended verbatim.
    pub fn target_url(&self) -> String {
        format!("{}{}", self.service_endpoint, self.url_parameters)
    }
}
