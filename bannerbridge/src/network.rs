//! The seam to the third-party network SDK.
//!
//! The adapter never links against a network directly. A thin shim around the
//! SDK implements [`NativeBannerNetwork`]; it starts loads and reports back
//! through the [`DelegateHandle`] it was given.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::binding::DelegateHandle;
use crate::errors::{AdFailure, LoadFailureReason};
use crate::types::AdRequest;

/// Raw error codes reported by the network SDK.
pub mod codes {
    /// The device could not reach the network.
    pub const NETWORK_ERROR: i64 = 1000;
    /// No ad available for the placement.
    pub const NO_FILL: i64 = 1001;
    /// Loads issued too frequently for the placement.
    pub const LOAD_TOO_FREQUENTLY: i64 = 1002;
    /// The network's backend failed.
    pub const SERVER_ERROR: i64 = 2000;
    /// The SDK failed internally.
    pub const INTERNAL_ERROR: i64 = 2001;
    /// The SDK timed out waiting for its backend.
    pub const TIMEOUT: i64 = 2003;
}

/// An error exactly as the network SDK reported it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("network error {code}: {message}")]
pub struct SdkError {
    code: i64,
    message: String,
}

impl SdkError {
    /// Wraps a raw SDK error.
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The SDK's error code.
    pub const fn code(&self) -> i64 {
        self.code
    }

    /// The SDK's description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Maps the SDK code onto the adapter's failure reasons.
    ///
    /// Unrecognized codes are reported as [`LoadFailureReason::Internal`].
    pub const fn reason(&self) -> LoadFailureReason {
        match self.code {
            codes::NETWORK_ERROR => LoadFailureReason::NetworkUnavailable,
            codes::NO_FILL => LoadFailureReason::NoFill,
            codes::LOAD_TOO_FREQUENTLY => LoadFailureReason::RateLimited,
            codes::TIMEOUT => LoadFailureReason::Timeout,
            _ => LoadFailureReason::Internal,
        }
    }

    /// Normalizes this error into the failure reported to the host.
    pub fn to_failure(&self) -> AdFailure {
        AdFailure::network(self.reason(), self.code, self.message.clone())
    }
}

/// A third-party network able to load native banner ads.
///
/// `load_native_banner_ad` is fire-and-forget: it must not block waiting for
/// the ad. The network reports the outcome through `delegate`, from any
/// thread and at any later time, including synchronously from inside this
/// call. Holding `delegate` never keeps the adapter alive.
pub trait NativeBannerNetwork: Send + Sync {
    /// Starts loading an ad for `request`.
    fn load_native_banner_ad(&self, request: &AdRequest, delegate: DelegateHandle);
}

impl<T> NativeBannerNetwork for Arc<T>
where
    T: NativeBannerNetwork + ?Sized,
{
    fn load_native_banner_ad(&self, request: &AdRequest, delegate: DelegateHandle) {
        (**self).load_native_banner_ad(request, delegate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AdErrorCode;

    #[test]
    fn known_codes_map_to_reasons() {
        let cases = [
            (codes::NETWORK_ERROR, LoadFailureReason::NetworkUnavailable),
            (codes::NO_FILL, LoadFailureReason::NoFill),
            (codes::LOAD_TOO_FREQUENTLY, LoadFailureReason::RateLimited),
            (codes::SERVER_ERROR, LoadFailureReason::Internal),
            (codes::INTERNAL_ERROR, LoadFailureReason::Internal),
            (codes::TIMEOUT, LoadFailureReason::Timeout),
        ];

        for (code, expected) in cases {
            assert_eq!(SdkError::new(code, "x").reason(), expected, "code {code}");
        }
    }

    #[test]
    fn unknown_code_is_internal() {
        assert_eq!(
            SdkError::new(-7, "mystery").reason(),
            LoadFailureReason::Internal
        );
    }

    #[test]
    fn failure_keeps_network_code_and_message() {
        let failure = SdkError::new(codes::NO_FILL, "No fill").to_failure();

        assert_eq!(
            failure.code(),
            AdErrorCode::NetworkLoadFailure(LoadFailureReason::NoFill)
        );
        assert_eq!(failure.network_code(), Some(codes::NO_FILL));
        assert_eq!(failure.message(), "No fill");
    }
}
