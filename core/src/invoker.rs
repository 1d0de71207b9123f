//! Typed downstream calls over a named-client registry.
//!
//! # Design
//! `EndpointInvoker` owns nothing call-specific. Each operation acquires a
//! client from the registry, builds the request with `EndpointClient`, sends
//! it under the caller's `CallContext`, drops the client, and only then parses
//! the response. The client is dropped exactly once on every path, including
//! build, transport, cancellation and parse failures. There is no retry; the
//! caller decides what to do with an error.

use serde::de::DeserializeOwned;

use crate::client::{EndpointClient, ErrorBodyPolicy, Operation};
use crate::context::CallContext;
use crate::endpoint::EndpointDescriptor;
use crate::error::InvokeError;
use crate::registry::{ClientRegistry, Transport};

#[derive(Debug, Clone)]
pub struct EndpointInvoker<R> {
    registry: R,
    client: EndpointClient,
}

impl<R: ClientRegistry> EndpointInvoker<R> {
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            client: EndpointClient::new(),
        }
    }

    pub fn with_error_policy(mut self, policy: ErrorBodyPolicy) -> Self {
        self.client = EndpointClient::with_error_policy(policy);
        self
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// GET the descriptor's target and deserialize the body as `T`.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        descriptor: &EndpointDescriptor,
        ctx: &CallContext,
    ) -> Result<T, InvokeError> {
        self.invoke(Operation::Fetch, descriptor, ctx).await
    }

    /// POST the descriptor's content and deserialize the body as `T`.
    pub async fn create<T: DeserializeOwned>(
        &self,
        descriptor: &EndpointDescriptor,
        ctx: &CallContext,
    ) -> Result<T, InvokeError> {
        self.invoke(Operation::Create, descriptor, ctx).await
    }

    /// PUT the descriptor's content and deserialize the body as `T`.
    pub async fn update<T: DeserializeOwned>(
        &self,
        descriptor: &EndpointDescriptor,
        ctx: &CallContext,
    ) -> Result<T, InvokeError> {
        self.invoke(Operation::Update, descriptor, ctx).await
    }

    async fn invoke<T: DeserializeOwned>(
        &self,
        operation: Operation,
        descriptor: &EndpointDescriptor,
        ctx: &CallContext,
    ) -> Result<T, InvokeError> {
        let transport = self.registry.acquire(descriptor.client_name());
        let response = async {
            let request = self.client.build(operation, descriptor)?;
            tracing::debug!(
                client = descriptor.client_name(),
                method = %request.method,
                url = %request.url,
                "Invoking downstream endpoint"
            );
            ctx.run(transport.send(request)).await
        }
        .await;
        drop(transport);

        let response = response.inspect_err(|e| {
            tracing::warn!(
                client = descriptor.client_name(),
                method = %operation.method(),
                error = %e,
                "Downstream call failed before a response arrived"
            );
        })?;

        tracing::debug!(
            client = descriptor.client_name(),
            status = response.status,
            "Downstream response received"
        );

        self.client.parse(operation, response).inspect_err(|e| {
            if let InvokeError::Downstream { status, message } = e {
                tracing::warn!(
                    client = descriptor.client_name(),
                    method = %operation.method(),
                    status = *status,
                    message = %message,
                    "Downstream endpoint returned an error"
                );
            }
        })
    }
}
