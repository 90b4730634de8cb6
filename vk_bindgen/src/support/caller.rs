//! Transport seam between emitted bindings and an HTTP client.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::de::DeserializeOwned;
use thiserror::Error;

use super::api_error::ApiError;
use super::wire::FormValues;

/// Cancellation token passed through every binding call.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancelled: Arc<AtomicBool>,
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks this context and every clone of it as cancelled.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// A request field could not be encoded.
#[derive(Debug, Error)]
#[error("failed to encode request field {key:?}: {source}")]
pub struct EncodeError {
    pub key: String,
    #[source]
    pub source: serde_json::Error,
}

/// Outcome of a failed binding call. Exactly one cause is carried.
#[derive(Debug, Error)]
pub enum MethodError {
    /// The API answered with an error envelope.
    #[error(transparent)]
    Api(ApiError),

    /// The request never produced an API answer.
    #[error("transport error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),

    /// The request could not be encoded; nothing was sent.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl MethodError {
    #[must_use]
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport(err.into())
    }

    #[must_use]
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

/// Executes one API method.
///
/// Implementations send `values` form-encoded to `method`, attach version and
/// credentials unless the caller already supplied them as options, and map an
/// error envelope to [`MethodError::Api`].
pub trait Caller {
    fn call<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        method: &str,
        values: FormValues,
    ) -> impl Future<Output = Result<T, MethodError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_shared_between_clones() {
        let ctx: Context = Context::new();
        let clone: Context = ctx.clone();
        assert!(!clone.is_cancelled());
        ctx.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn api_error_accessor_only_for_api_variant() {
        let api: MethodError = MethodError::Api(ApiError {
            error_code: 6,
            ..ApiError::default()
        });
        assert_eq!(Some(6), api.api_error().map(ApiError::code));
        let transport: MethodError = MethodError::transport("connection reset");
        assert!(transport.api_error().is_none());
    }
}
