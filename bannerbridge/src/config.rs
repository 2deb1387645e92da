//! Adapter configuration.
//!
//! Every field is validated at construction, either through `nutype` or by
//! being a plain flag, so a configuration that exists is usable. The type
//! deserializes from whatever format the host keeps its mediation settings in.

use nutype::nutype;
use serde::{Deserialize, Serialize};

/// Label identifying the third-party network in log records.
///
/// Trimmed, non-empty and at most 64 characters.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 64),
    default = "third-party",
    derive(
        Debug,
        Default,
        Clone,
        PartialEq,
        Eq,
        Hash,
        AsRef,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct NetworkLabel(String);

/// Configuration of one [`NativeBannerAdAdapter`](crate::NativeBannerAdAdapter).
///
/// Required-asset flags tighten payload validation: an ad missing a required
/// asset is reported as an invalid payload instead of a fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    network_label: NetworkLabel,
    require_headline: bool,
    require_icon: bool,
    require_call_to_action: bool,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            network_label: NetworkLabel::default(),
            require_headline: true,
            require_icon: false,
            require_call_to_action: false,
        }
    }
}

impl AdapterConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the network label used in log records.
    #[must_use]
    pub fn with_network_label(mut self, label: NetworkLabel) -> Self {
        self.network_label = label;
        self
    }

    /// Requires a non-blank headline.
    #[must_use]
    pub fn with_require_headline(mut self, required: bool) -> Self {
        self.require_headline = required;
        self
    }

    /// Requires an icon asset.
    #[must_use]
    pub fn with_require_icon(mut self, required: bool) -> Self {
        self.require_icon = required;
        self
    }

    /// Requires a non-blank call to action.
    #[must_use]
    pub fn with_require_call_to_action(mut self, required: bool) -> Self {
        self.require_call_to_action = required;
        self
    }

    /// Label of the network in log records.
    pub const fn network_label(&self) -> &NetworkLabel {
        &self.network_label
    }

    /// Whether a headline is required.
    pub const fn require_headline(&self) -> bool {
        self.require_headline
    }

    /// Whether an icon is required.
    pub const fn require_icon(&self) -> bool {
        self.require_icon
    }

    /// Whether a call to action is required.
    pub const fn require_call_to_action(&self) -> bool {
        self.require_call_to_action
    }
}
