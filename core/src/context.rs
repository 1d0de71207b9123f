//! Per-call cancellation and deadline.
//!
//! The invoker imposes no timeout of its own. A `CallContext` lets the caller
//! bound or abort the network round-trip; the transport client's own timeout
//! still applies underneath.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;

use crate::error::{InvokeError, TransportError};

/// Create a linked cancellation handle and signal.
pub fn cancellation() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}

/// Cancels every call carrying the matching `CancelSignal`.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Receiving side of a cancellation pair. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled. Never resolves if the handle is dropped first.
    async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        let sender_dropped = rx.wait_for(|cancelled| *cancelled).await.is_err();
        if sender_dropped {
            std::future::pending::<()>().await;
        }
    }
}

/// Deadline and cancellation applied to a single invocation.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    timeout: Option<Duration>,
    cancel: Option<CancelSignal>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, signal: CancelSignal) -> Self {
        self.cancel = Some(signal);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Drive `send` to completion unless the deadline passes or the call is
    /// cancelled first.
    pub(crate) async fn run<F, T>(&self, send: F) -> Result<T, InvokeError>
    where
        F: Future<Output = Result<T, TransportError>>,
    {
        if self.cancel.as_ref().is_some_and(CancelSignal::is_cancelled) {
            return Err(InvokeError::Cancelled);
        }

        let bounded = async {
            match self.timeout {
                Some(timeout) => tokio::time::timeout(timeout, send)
                    .await
                    .map_err(|_| InvokeError::DeadlineExceeded)?
                    .map_err(InvokeError::from),
                None => send.await.map_err(InvokeError::from),
            }
        };

        let cancelled = async {
            match &self.cancel {
                Some(signal) => signal.cancelled().await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            result = bounded => result,
            _ = cancelled => Err(InvokeError::Cancelled),
        }
    }
}
