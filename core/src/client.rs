//! Stateless request builder and response parser for downstream calls.
//!
//! # Design
//! `EndpointClient` carries only its `ErrorBodyPolicy`. Each operation is
//! split into a `build_*` method that turns an `EndpointDescriptor` into an
//! `HttpRequest` and a `parse_*` method that turns an `HttpResponse` into a
//! typed value or an `InvokeError`. `EndpointInvoker` runs the round-trip in
//! between.
//!
//! The three operations translate structured error payloads differently:
//!
//! | Operation | fails when set | reports   |
//! |-----------|----------------|-----------|
//! | fetch     | `errorCode`    | `message` |
//! | create    | `errorCode`    | `errorCode` |
//! | update    | `message`      | `message` |

use serde::de::DeserializeOwned;

use crate::endpoint::EndpointDescriptor;
use crate::error::InvokeError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::ErrorPayload;

const APPLICATION_JSON: &str = "application/json";

/// How a non-success response body is turned into an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorBodyPolicy {
    /// A non-empty body is reported verbatim. A structured payload is only
    /// consulted when the body is empty.
    #[default]
    RawFirst,
    /// A non-empty body that parses as an `ErrorPayload` with the operation's
    /// guard field set is reported through that payload. Anything else
    /// non-empty is reported verbatim.
    StructuredFirst,
}

/// The three downstream operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Fetch,
    Create,
    Update,
}

#[derive(Debug, Clone, Copy)]
enum PayloadField {
    Message,
    ErrorCode,
}

impl PayloadField {
    fn select(self, payload: &ErrorPayload) -> Option<&str> {
        let value = match self {
            PayloadField::Message => payload.message.as_deref(),
            PayloadField::ErrorCode => payload.error_code.as_deref(),
        };
        value.filter(|v| !v.is_empty())
    }
}

impl Operation {
    pub fn method(self) -> HttpMethod {
        match self {
            Operation::Fetch => HttpMethod::Get,
            Operation::Create => HttpMethod::Post,
            Operation::Update => HttpMethod::Put,
        }
    }

    /// `(guard, reported)` payload fields for this operation.
    fn payload_fields(self) -> (PayloadField, PayloadField) {
        match self {
            Operation::Fetch => (PayloadField::ErrorCode, PayloadField::Message),
            Operation::Create => (PayloadField::ErrorCode, PayloadField::ErrorCode),
            Operation::Update => (PayloadField::Message, PayloadField::Message),
        }
    }

    /// The message to raise for `payload`, if its guard field is set.
    ///
    /// A set guard with an absent reported field yields an empty message.
    pub fn structured_error(self, payload: &ErrorPayload) -> Option<String> {
        let (guard, reported) = self.payload_fields();
        guard.select(payload)?;
        Some(reported.select(payload).unwrap_or_default().to_string())
    }
}

/// Synchronous, stateless builder/parser for downstream calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointClient {
    policy: ErrorBodyPolicy,
}

impl EndpointClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error_policy(policy: ErrorBodyPolicy) -> Self {
        Self { policy }
    }

    pub fn error_policy(&self) -> ErrorBodyPolicy {
        self.policy
    }

    pub fn build_fetch(&self, descriptor: &EndpointDescriptor) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: descriptor.target_url(),
            headers: vec![("accept".to_string(), APPLICATION_JSON.to_string())],
            body: None,
        }
    }

    pub fn build_create(&self, descriptor: &EndpointDescriptor) -> Result<HttpRequest, InvokeError> {
        build_with_body(HttpMethod::Post, descriptor)
    }

    pub fn build_update(&self, descriptor: &EndpointDescriptor) -> Result<HttpRequest, InvokeError> {
        build_with_body(HttpMethod::Put, descriptor)
    }

    /// Build the request for `operation`.
    pub fn build(
        &self,
        operation: Operation,
        descriptor: &EndpointDescriptor,
    ) -> Result<HttpRequest, InvokeError> {
        match operation {
            Operation::Fetch => Ok(self.build_fetch(descriptor)),
            Operation::Create => self.build_create(descriptor),
            Operation::Update => self.build_update(descriptor),
        }
    }

    pub fn parse_fetch<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, InvokeError> {
        self.parse(Operation::Fetch, response)
    }

    pub fn parse_create<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, InvokeError> {
        self.parse(Operation::Create, response)
    }

    pub fn parse_update<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, InvokeError> {
        self.parse(Operation::Update, response)
    }

    /// Translate `response` for `operation` into `T` or an error.
    pub fn parse<T: DeserializeOwned>(
        &self,
        operation: Operation,
        response: HttpResponse,
    ) -> Result<T, InvokeError> {
        check_status(self.policy, operation, &response)?;
        serde_json::from_str(&response.body)
            .map_err(|e| InvokeError::Deserialization(e.to_string()))
    }
}

fn build_with_body(
    method: HttpMethod,
    descriptor: &EndpointDescriptor,
) -> Result<HttpRequest, InvokeError> {
    let content = descriptor
        .content()
        .ok_or(InvokeError::MissingContent { method })?;
    let body =
        serde_json::to_string(content).map_err(|e| InvokeError::Serialization(e.to_string()))?;
    Ok(HttpRequest {
        method,
        url: descriptor.target_url(),
        headers: vec![
            ("accept".to_string(), APPLICATION_JSON.to_string()),
            ("content-type".to_string(), APPLICATION_JSON.to_string()),
        ],
        body: Some(body),
    })
}

/// Map a non-success response to `InvokeError::Downstream`.
///
/// Returns `Ok(())` for success responses and for error responses that carry
/// nothing reportable; the caller then attempts to deserialize the body.
fn check_status(
    policy: ErrorBodyPolicy,
    operation: Operation,
    response: &HttpResponse,
) -> Result<(), InvokeError> {
    if response.is_success() {
        return Ok(());
    }

    let downstream = |message: String| InvokeError::Downstream {
        status: response.status,
        message,
    };

    if policy == ErrorBodyPolicy::StructuredFirst {
        if let Some(message) = structured_message(operation, &response.body) {
            return Err(downstream(message));
        }
    }

    if !response.body.is_empty() {
        return Err(downstream(response.body.clone()));
    }

    match structured_message(operation, &response.body) {
        Some(message) => Err(downstream(message)),
        None => Ok(()),
    }
}

fn structured_message(operation: Operation, body: &str) -> Option<String> {
    let payload: ErrorPayload = serde_json::from_str(body).ok()?;
    operation.structured_error(&payload)
}
