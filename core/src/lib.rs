//! Typed JSON-over-HTTP calls to downstream air traffic services.
//!
//! # Overview
//! An `EndpointDescriptor` names one downstream call: service endpoint, URL
//! parameters, logical client name and an optional JSON payload.
//! `EndpointInvoker` performs it as a fetch (GET), create (POST) or update
//! (PUT), translates non-success responses into `InvokeError::Downstream`, and
//! deserializes success bodies into the caller's type.
//!
//! # Design
//! - Request building and response parsing live in the stateless
//!   `EndpointClient`, free of I/O (host-does-IO pattern).
//! - Transport clients come from a `ClientRegistry` passed to the invoker
//!   explicitly; `ReqwestRegistry` is the production implementation.
//! - Cancellation and deadlines are opt-in per call through `CallContext`.

pub mod client;
pub mod config;
pub mod context;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod invoker;
pub mod registry;
pub mod types;

pub use client::{EndpointClient, ErrorBodyPolicy, Operation};
pub use config::{AppConfig, ClientConfig, ConfigError, EndpointConfig};
pub use context::{cancellation, CallContext, CancelHandle, CancelSignal};
pub use endpoint::EndpointDescriptor;
pub use error::{InvokeError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use invoker::EndpointInvoker;
pub use registry::{ClientRegistry, NamedClient, ReqwestRegistry, Transport};
pub use types::{Aircraft, Airport, ErrorPayload, NewAircraft, NewAirport};
