//! RPC bridge client.
//!
//! Wraps the single asynchronous call primitive to the backend and
//! normalizes every result into `Result<T, CallError>`. The backend answers
//! each call with a JSON envelope `{success: bool, ...payload}`; transport
//! exceptions, undecodable bodies, and `success: false` all come back as a
//! uniform error and never escape as panics.

mod http;

pub use http::HttpTransport;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use crate::notify::{Notifier, ToastKind};

/// Boxed future used by the dyn-compatible async traits in this crate.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Failure reaching the backend bridge at all.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP-level failure (connect, timeout, non-success status).
    #[error("bridge request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The bridge is unreachable or misconfigured.
    #[error("bridge unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a single backend call.
#[derive(Debug, Error)]
pub enum CallError {
    /// The bridge could not be reached. A generic "Connection error"
    /// notification has already been emitted by [`RpcClient`].
    #[error("connection error: {0}")]
    Transport(#[from] TransportError),

    /// The response body was not a decodable envelope.
    #[error("undecodable response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The backend answered `success: false`. Callers surface `message`
    /// with an operation-specific notification.
    #[error("{message}")]
    Backend { message: String },
}

impl CallError {
    /// The backend-supplied message for logical failures, if any.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Backend { message } => Some(message),
            Self::Transport(_) | Self::Decode(_) => None,
        }
    }
}

/// Payload for calls whose envelope carries nothing beyond `success` and a
/// message (cart mutations, logout, deletes).
#[derive(Debug, serde::Deserialize)]
pub struct Ack {}

/// The single asynchronous call primitive to the backend.
///
/// Production uses [`HttpTransport`]; tests inject scripted
/// implementations. `invoke` returns the raw envelope body as text.
pub trait RpcTransport: Send + Sync {
    fn invoke<'a>(
        &'a self,
        method: &'a str,
        args: &'a [Value],
    ) -> BoxFuture<'a, Result<String, TransportError>>;
}

/// Typed client over an [`RpcTransport`].
///
/// This is the only component permitted to emit a *generic* failure
/// notification; it does so exactly once per transport failure. Logical
/// failures (`success: false`) are left to callers, which know the
/// operation-specific message to show.
#[derive(Clone)]
pub struct RpcClient {
    transport: Arc<dyn RpcTransport>,
    notifier: Arc<dyn Notifier>,
}

impl RpcClient {
    /// Create a new client over the given transport.
    #[must_use]
    pub fn new(transport: Arc<dyn RpcTransport>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            transport,
            notifier,
        }
    }

    /// Call a backend method and decode the success payload into `T`.
    ///
    /// `T` is deserialized from the whole envelope, so payload structs name
    /// the envelope fields they need (`user`, `cart`, `products`, ...) and
    /// ignore the rest.
    ///
    /// # Errors
    ///
    /// Returns `CallError::Transport` if the bridge cannot be reached,
    /// `CallError::Decode` if the body is not a valid envelope, and
    /// `CallError::Backend` if the backend reported `success: false`.
    #[instrument(skip(self, args), fields(method = %method))]
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        args: &[Value],
    ) -> Result<T, CallError> {
        let body = match self.transport.invoke(method, args).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "bridge call failed");
                self.notifier.notify("Connection error", ToastKind::Error);
                return Err(CallError::Transport(e));
            }
        };

        let envelope: Value = serde_json::from_str(&body)?;

        let success = envelope
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        if !success {
            let message = envelope
                .get("message")
                .or_else(|| envelope.get("error"))
                .and_then(Value::as_str)
                .unwrap_or("Operation failed")
                .to_owned();
            tracing::debug!(%message, "backend reported failure");
            return Err(CallError::Backend { message });
        }

        Ok(serde_json::from_value(envelope)?)
    }
}
