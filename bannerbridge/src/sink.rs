//! The host mediation framework's side of the contract.

use std::sync::Arc;

use crate::types::AdResult;

/// Receives the adapter's outcome on behalf of the host framework.
///
/// `on_ad_result` is called at most once per adapter. The passthrough
/// methods fire only for a filled ad whose adapter is still the network's
/// delegate. Implementations may call back into the adapter (for example
/// `stop_being_delegate`) from any of these methods.
///
/// Every method runs under the adapter's lock, and `stop_being_delegate` on
/// another thread waits for it to return. An implementation must not block
/// on a lock that a thread tearing the adapter down may hold, or both threads
/// deadlock.
pub trait HostCallbackSink: Send + Sync {
    /// The single terminal result of the request.
    fn on_ad_result(&self, result: AdResult);

    /// The network logged an impression for the filled ad.
    fn report_impression(&self) {}

    /// The user clicked the filled ad.
    fn report_click(&self) {}
}

impl<T> HostCallbackSink for Arc<T>
where
    T: HostCallbackSink + ?Sized,
{
    fn on_ad_result(&self, result: AdResult) {
        (**self).on_ad_result(result);
    }

    fn report_impression(&self) {
        (**self).report_impression();
    }

    fn report_click(&self) {
        (**self).report_click();
    }
}
