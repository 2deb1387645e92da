//! Core value types exchanged between the host, the adapter and the network SDK.
//!
//! Identifiers use smart constructors so an [`AdRequest`] can only ever carry
//! a valid placement. Ad handles are opaque and cheap to clone; the network
//! SDK owns the ad object they describe.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use nutype::nutype;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AdFailure;

/// Identifier of an ad placement configured with the third-party network.
///
/// `PlacementId` values are trimmed, non-empty and at most 255 characters.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 255),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        AsRef,
        Deref,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct PlacementId(String);

/// Correlation identifier for one ad request.
///
/// Generated as a `UUIDv7` so identifiers sort by creation time in logs.
#[nutype(derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    AsRef,
    Display,
    Serialize,
    Deserialize
))]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generates a fresh, time-ordered request identifier.
    pub fn generate() -> Self {
        Self::new(Uuid::now_v7())
    }
}

/// Ad formats a network may hand back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdFormat {
    /// Compact native ad rendered as a banner. The only format this adapter requests.
    NativeBanner,
    /// Full native ad with a media view.
    Native,
}

impl fmt::Display for AdFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NativeBanner => f.write_str("native_banner"),
            Self::Native => f.write_str("native"),
        }
    }
}

/// Which creative assets the network pre-caches before reporting a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaCachePolicy {
    /// Cache every asset before the ad is reported as loaded.
    #[default]
    All,
    /// Cache only the icon.
    IconOnly,
    /// Cache nothing; assets load when the ad is rendered.
    Disabled,
}

/// Network-specific options forwarded with the load call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    media_cache_policy: MediaCachePolicy,
    extras: BTreeMap<String, String>,
}

impl LoadOptions {
    /// Creates options with the default cache policy and no extras.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the media cache policy.
    #[must_use]
    pub fn with_media_cache_policy(mut self, policy: MediaCachePolicy) -> Self {
        self.media_cache_policy = policy;
        self
    }

    /// Adds an opaque key/value pair passed through to the network untouched.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.extras.insert(key.into(), value.into());
        self
    }

    /// The media cache policy.
    pub const fn media_cache_policy(&self) -> MediaCachePolicy {
        self.media_cache_policy
    }

    /// Extras forwarded to the network.
    pub const fn extras(&self) -> &BTreeMap<String, String> {
        &self.extras
    }
}

/// An immutable request for one native banner ad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdRequest {
    request_id: RequestId,
    placement_id: PlacementId,
    format: AdFormat,
    load_options: LoadOptions,
}

impl AdRequest {
    /// Creates a native banner request for the placement with default options.
    pub fn new(placement_id: PlacementId) -> Self {
        Self {
            request_id: RequestId::generate(),
            placement_id,
            format: AdFormat::NativeBanner,
            load_options: LoadOptions::default(),
        }
    }

    /// Replaces the load options.
    #[must_use]
    pub fn with_load_options(mut self, load_options: LoadOptions) -> Self {
        self.load_options = load_options;
        self
    }

    /// Correlation id of this request.
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Placement the ad is requested for.
    pub const fn placement_id(&self) -> &PlacementId {
        &self.placement_id
    }

    /// Requested format. Always [`AdFormat::NativeBanner`].
    pub const fn format(&self) -> AdFormat {
        self.format
    }

    /// Options forwarded to the network.
    pub const fn load_options(&self) -> &LoadOptions {
        &self.load_options
    }
}

/// An image asset referenced by a native ad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAsset {
    /// Where the network serves the image from.
    pub url: String,
    /// Width in points.
    pub width: u32,
    /// Height in points.
    pub height: u32,
}

/// Creative assets of a native ad, as reported by the network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeAdAssets {
    /// Primary text.
    pub headline: Option<String>,
    /// Secondary text.
    pub body: Option<String>,
    /// Button label.
    pub call_to_action: Option<String>,
    /// Advertiser or sponsor name.
    pub advertiser_name: Option<String>,
    /// Ad icon.
    pub icon: Option<ImageAsset>,
}

/// What the network knows about a loaded ad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeAdPayload {
    /// Network-side identifier of the ad.
    pub ad_id: String,
    /// Format the network actually produced.
    pub format: AdFormat,
    /// The network's own validity flag. Networks clear it once an ad expires.
    pub is_ad_valid: bool,
    /// Creative assets.
    pub assets: NativeAdAssets,
}

/// Opaque, shared handle to a network-owned native ad.
///
/// Cloning is cheap; every clone refers to the same payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeAdHandle {
    payload: Arc<NativeAdPayload>,
}

impl NativeAdHandle {
    /// Wraps a payload reported by the network.
    pub fn new(payload: NativeAdPayload) -> Self {
        Self {
            payload: Arc::new(payload),
        }
    }

    /// Network-side identifier of the ad.
    pub fn ad_id(&self) -> &str {
        &self.payload.ad_id
    }

    /// Format the network produced.
    pub fn format(&self) -> AdFormat {
        self.payload.format
    }

    /// Whether the network still considers the ad valid.
    pub fn is_ad_valid(&self) -> bool {
        self.payload.is_ad_valid
    }

    /// Creative assets.
    pub fn assets(&self) -> &NativeAdAssets {
        &self.payload.assets
    }
}

/// The single terminal outcome of an ad request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdResult {
    /// The network filled the request with a renderable ad.
    Success(NativeAdHandle),
    /// The request failed; see the carried code and message.
    Failure(AdFailure),
}

impl AdResult {
    /// Returns true for [`AdResult::Success`].
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
