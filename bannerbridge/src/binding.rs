//! Revocable delegate bindings between a network ad object and its adapter.
//!
//! A network keeps a [`DelegateHandle`] and calls [`DelegateBinding::deliver`]
//! whenever its ad object has something to report. The binding forwards the
//! event only while it is active and the target is still alive. The target is
//! held through a `Weak` reference, so a network holding the handle after the
//! host discarded the adapter delivers into nothing instead of a dangling
//! delegate.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use tracing::debug;

use crate::errors::{AdapterError, AdapterResult, Operation};
use crate::lifecycle::LifecycleState;
use crate::network::SdkError;
use crate::types::{NativeAdHandle, RequestId};

/// Callbacks a network ad object can raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    /// The load finished. `None` models a network handing back a null ad.
    Loaded(Option<NativeAdHandle>),
    /// The load failed.
    LoadFailed(SdkError),
    /// The network logged an impression.
    Impression,
    /// The user clicked the ad.
    Click,
}

impl NetworkEvent {
    /// Short name used in log records.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Loaded(_) => "loaded",
            Self::LoadFailed(_) => "load_failed",
            Self::Impression => "impression",
            Self::Click => "click",
        }
    }
}

/// Anything that can receive network callbacks through a binding.
pub trait NetworkDelegate: Send + Sync {
    /// Handles one network callback.
    fn handle_network_event(&self, event: NetworkEvent);
}

/// What happened to a delivered event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The event reached the delegate.
    Forwarded,
    /// The binding was revoked or the delegate is gone; the event was dropped.
    Dropped,
}

/// Shared handle a network keeps to report callbacks.
pub type DelegateHandle = Arc<DelegateBinding>;

/// Flag-gated, weak registration of a delegate with a network ad object.
pub struct DelegateBinding {
    request_id: RequestId,
    active: AtomicBool,
    target: Weak<dyn NetworkDelegate>,
}

impl DelegateBinding {
    /// Registers `target` as the callback recipient for `request_id`.
    ///
    /// Binding is only allowed while the owning lifecycle is `Idle`.
    pub fn bind<T>(
        target: &Arc<T>,
        state: LifecycleState,
        request_id: RequestId,
    ) -> AdapterResult<DelegateHandle>
    where
        T: NetworkDelegate + 'static,
    {
        if state != LifecycleState::Idle {
            return Err(AdapterError::InvalidState {
                operation: Operation::BindDelegate,
                state,
            });
        }

        let target: Weak<dyn NetworkDelegate> = Arc::<T>::downgrade(target);
        debug!(request_id = %request_id, "delegate bound");

        Ok(Arc::new(Self {
            request_id,
            active: AtomicBool::new(true),
            target,
        }))
    }

    /// Forwards `event` to the delegate if the binding is still active.
    pub fn deliver(&self, event: NetworkEvent) -> Delivery {
        if !self.is_active() {
            debug!(request_id = %self.request_id, event = event.kind(), "binding revoked, event dropped");
            return Delivery::Dropped;
        }

        let Some(target) = self.target.upgrade() else {
            debug!(request_id = %self.request_id, event = event.kind(), "delegate gone, event dropped");
            return Delivery::Dropped;
        };

        target.handle_network_event(event);
        Delivery::Forwarded
    }

    /// Deactivates the binding. Returns true only for the call that revoked it.
    pub fn revoke(&self) -> bool {
        let was_active = self.active.swap(false, Ordering::AcqRel);
        if was_active {
            debug!(request_id = %self.request_id, "delegate binding revoked");
        }
        was_active
    }

    /// Whether events are still forwarded.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// The request this binding serves.
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }
}

impl fmt::Debug for DelegateBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateBinding")
            .field("request_id", &self.request_id)
            .field("active", &self.is_active())
            .field("target_alive", &(self.target.strong_count() > 0))
            .finish()
    }
}
