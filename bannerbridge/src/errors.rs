//! Error types for bannerbridge.
//!
//! Errors fall into two groups that travel on different paths:
//!
//! - **[`AdapterError`]**: misuse of the adapter by the host (an operation
//!   called out of sequence). Returned synchronously from the offending call.
//! - **[`AdFailure`]**: why a request produced no ad. Delivered once,
//!   asynchronously, inside [`AdResult::Failure`](crate::AdResult::Failure).
//!
//! Late or duplicate network callbacks are not errors at all. They are
//! absorbed by the lifecycle (see
//! [`TransitionError::AlreadyTerminated`](crate::lifecycle::TransitionError))
//! and never reach the host.
//!
//! # Example
//!
//! ```rust,ignore
//! match adapter.request_native_banner_ad(request) {
//!     Ok(()) => { /* wait for the sink */ }
//!     Err(AdapterError::InvalidState { state, .. }) => {
//!         // adapters are single use; build a new one
//!     }
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lifecycle::LifecycleState;

/// Host-facing operations that can be rejected by the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// `request_native_banner_ad`.
    RequestAd,
    /// Binding a delegate for network callbacks.
    BindDelegate,
    /// `mark_rendered`.
    MarkRendered,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequestAd => f.write_str("request native banner ad"),
            Self::BindDelegate => f.write_str("bind delegate"),
            Self::MarkRendered => f.write_str("mark rendered"),
        }
    }
}

/// Errors returned synchronously to the caller of an adapter operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    /// The operation is not allowed in the adapter's current state.
    ///
    /// Adapters serve exactly one request; a second request, or a request
    /// after teardown, always ends here without touching the network.
    #[error("cannot {operation} while adapter is {state}")]
    InvalidState {
        /// The rejected operation
        operation: Operation,
        /// The state the adapter was in
        state: LifecycleState,
    },
}

/// Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Why a network failed to load an ad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadFailureReason {
    /// The network had no ad for this placement.
    NoFill,
    /// The network gave up waiting on its own backend.
    Timeout,
    /// The device could not reach the network.
    NetworkUnavailable,
    /// The placement was requested too frequently.
    RateLimited,
    /// Any other failure inside the network SDK.
    Internal,
}

impl fmt::Display for LoadFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFill => f.write_str("no fill"),
            Self::Timeout => f.write_str("timeout"),
            Self::NetworkUnavailable => f.write_str("network unavailable"),
            Self::RateLimited => f.write_str("rate limited"),
            Self::Internal => f.write_str("internal network error"),
        }
    }
}

/// Normalized error codes reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdErrorCode {
    /// The network returned a handle that failed validation.
    InvalidPayload,
    /// The network reported a load error.
    NetworkLoadFailure(LoadFailureReason),
}

impl AdErrorCode {
    /// Stable numeric code for host-side reporting.
    pub const fn code(self) -> u32 {
        match self {
            Self::InvalidPayload => 102,
            Self::NetworkLoadFailure(LoadFailureReason::NoFill) => 201,
            Self::NetworkLoadFailure(LoadFailureReason::Timeout) => 202,
            Self::NetworkLoadFailure(LoadFailureReason::NetworkUnavailable) => 203,
            Self::NetworkLoadFailure(LoadFailureReason::RateLimited) => 204,
            Self::NetworkLoadFailure(LoadFailureReason::Internal) => 205,
        }
    }
}

impl fmt::Display for AdErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPayload => write!(f, "invalid payload ({})", self.code()),
            Self::NetworkLoadFailure(reason) => {
                write!(f, "network load failure: {reason} ({})", self.code())
            }
        }
    }
}

/// Failure delivered to the host in place of an ad.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct AdFailure {
    code: AdErrorCode,
    message: String,
    network_code: Option<i64>,
}

impl AdFailure {
    /// A handle that did not pass validation.
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self {
            code: AdErrorCode::InvalidPayload,
            message: message.into(),
            network_code: None,
        }
    }

    /// A load error reported by the network, keeping its raw code.
    pub fn network(reason: LoadFailureReason, network_code: i64, message: impl Into<String>) -> Self {
        Self {
            code: AdErrorCode::NetworkLoadFailure(reason),
            message: message.into(),
            network_code: Some(network_code),
        }
    }

    /// Normalized error code.
    pub const fn code(&self) -> AdErrorCode {
        self.code
    }

    /// Human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The network's own error code, when the failure came from the network.
    pub const fn network_code(&self) -> Option<i64> {
        self.network_code
    }
}
