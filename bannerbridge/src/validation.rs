//! Validation of ad handles handed back by the network.

use crate::config::AdapterConfig;
use crate::errors::AdFailure;
use crate::types::{AdFormat, NativeAdHandle};

/// Checks a loaded handle before it may be reported as a fill.
///
/// A handle passes when it is present, is a native banner, is still marked
/// valid by the network and carries every asset the configuration requires.
pub fn validate_ad_handle(
    handle: Option<NativeAdHandle>,
    config: &AdapterConfig,
) -> Result<NativeAdHandle, AdFailure> {
    let handle = handle.ok_or_else(|| AdFailure::invalid_payload("network returned no ad"))?;

    if handle.format() != AdFormat::NativeBanner {
        return Err(AdFailure::invalid_payload(format!(
            "expected a {} ad, network returned {}",
            AdFormat::NativeBanner,
            handle.format()
        )));
    }

    if !handle.is_ad_valid() {
        return Err(AdFailure::invalid_payload(format!(
            "network marked ad {} as invalid",
            handle.ad_id()
        )));
    }

    let assets = handle.assets();
    if config.require_headline() && is_blank(assets.headline.as_deref()) {
        return Err(missing_asset(&handle, "headline"));
    }
    if config.require_call_to_action() && is_blank(assets.call_to_action.as_deref()) {
        return Err(missing_asset(&handle, "call to action"));
    }
    if config.require_icon() && assets.icon.is_none() {
        return Err(missing_asset(&handle, "icon"));
    }

    Ok(handle)
}

fn is_blank(text: Option<&str>) -> bool {
    text.map_or(true, |t| t.trim().is_empty())
}

fn missing_asset(handle: &NativeAdHandle, asset: &str) -> AdFailure {
    AdFailure::invalid_payload(format!("ad {} is missing its {asset}", handle.ad_id()))
}
