//! `bannerbridge` - race-safe mediation adapter core for native banner ads
//!
//! A host ad-mediation framework asks a [`NativeBannerAdAdapter`] for one ad.
//! The adapter asks a third-party network (behind [`NativeBannerNetwork`]) to
//! load it, receives the network's asynchronous callbacks through a revocable
//! [`DelegateBinding`], and reports exactly one [`AdResult`] to the host's
//! [`HostCallbackSink`]. Duplicate, contradictory and late callbacks are
//! absorbed; after [`NativeBannerAdAdapter::stop_being_delegate`] nothing the
//! network does has any effect.
//!
//! ```rust,ignore
//! let adapter = NativeBannerAdAdapter::new(network, sink, AdapterConfig::default());
//! adapter.request_native_banner_ad(AdRequest::new(PlacementId::try_new("123_456")?))?;
//! // ... the sink receives AdResult::Success or AdResult::Failure exactly once
//! adapter.stop_being_delegate();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod adapter;
pub mod binding;
pub mod config;
pub mod errors;
pub mod lifecycle;
pub mod network;
pub mod sink;
pub mod types;
pub mod validation;

pub use adapter::{AdapterSnapshot, NativeBannerAdAdapter};
pub use binding::{DelegateBinding, DelegateHandle, Delivery, NetworkDelegate, NetworkEvent};
pub use config::{AdapterConfig, NetworkLabel};
pub use errors::{
    AdErrorCode, AdFailure, AdapterError, AdapterResult, LoadFailureReason, Operation,
};
pub use lifecycle::{AdLifecycle, LifecycleState, TransitionError};
pub use network::{NativeBannerNetwork, SdkError};
pub use sink::HostCallbackSink;
pub use types::{
    AdFormat, AdRequest, AdResult, ImageAsset, LoadOptions, MediaCachePolicy, NativeAdAssets,
    NativeAdHandle, NativeAdPayload, PlacementId, RequestId,
};
