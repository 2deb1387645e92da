//! Builders for requests and network payloads used across test suites.

use bannerbridge::{
    AdFormat, AdRequest, ImageAsset, NativeAdAssets, NativeAdHandle, NativeAdPayload,
    PlacementId,
};

/// A placement id that always validates.
pub fn placement(raw: &str) -> PlacementId {
    PlacementId::try_new(raw).expect("fixture placement ids are valid")
}

/// A native banner request for a fixed test placement.
pub fn request() -> AdRequest {
    AdRequest::new(placement("test-placement"))
}

/// Payload of a complete, valid native banner ad.
pub fn native_banner_payload(ad_id: &str) -> NativeAdPayload {
    NativeAdPayload {
        ad_id: ad_id.to_string(),
        format: AdFormat::NativeBanner,
        is_ad_valid: true,
        assets: NativeAdAssets {
            headline: Some("Sunrise Roasters".to_string()),
            body: Some("Single-origin beans, roasted this week.".to_string()),
            call_to_action: Some("Shop now".to_string()),
            advertiser_name: Some("Sunrise".to_string()),
            icon: Some(ImageAsset {
                url: format!("https://cdn.example/{ad_id}/icon.png"),
                width: 128,
                height: 128,
            }),
        },
    }
}

/// A handle that passes validation under the default configuration.
pub fn valid_handle(ad_id: &str) -> NativeAdHandle {
    NativeAdHandle::new(native_banner_payload(ad_id))
}

/// A handle the network itself already marked invalid.
pub fn expired_handle(ad_id: &str) -> NativeAdHandle {
    NativeAdHandle::new(NativeAdPayload {
        is_ad_valid: false,
        ..native_banner_payload(ad_id)
    })
}

/// A valid ad of the wrong format.
pub fn full_native_handle(ad_id: &str) -> NativeAdHandle {
    NativeAdHandle::new(NativeAdPayload {
        format: AdFormat::Native,
        ..native_banner_payload(ad_id)
    })
}
