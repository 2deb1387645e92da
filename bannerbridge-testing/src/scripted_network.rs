//! A network double driven entirely by the test.

use std::sync::{Arc, Mutex};

use bannerbridge::{AdRequest, DelegateHandle, Delivery, NativeBannerNetwork, NetworkEvent};

/// One `load_native_banner_ad` call as the network saw it.
#[derive(Debug, Clone)]
pub struct LoadRecord {
    /// The request the adapter sent.
    pub request: AdRequest,
    /// The handle the adapter gave the network for callbacks.
    pub delegate: DelegateHandle,
}

/// Records loads and lets the test raise callbacks whenever it likes.
///
/// Events queued with [`ScriptedNetwork::answering_immediately`] are delivered
/// synchronously from inside the load call, the way some SDKs answer from
/// their cache.
#[derive(Debug, Clone, Default)]
pub struct ScriptedNetwork {
    loads: Arc<Mutex<Vec<LoadRecord>>>,
    immediate: Arc<Mutex<Vec<NetworkEvent>>>,
}

impl ScriptedNetwork {
    /// A network that never answers on its own.
    pub fn new() -> Self {
        Self::default()
    }

    /// A network that delivers `events` from inside every load call.
    pub fn answering_immediately(events: Vec<NetworkEvent>) -> Self {
        Self {
            loads: Arc::default(),
            immediate: Arc::new(Mutex::new(events)),
        }
    }

    /// Number of loads issued so far.
    pub fn load_count(&self) -> usize {
        self.loads.lock().unwrap().len()
    }

    /// Every load issued so far.
    pub fn loads(&self) -> Vec<LoadRecord> {
        self.loads.lock().unwrap().clone()
    }

    /// The delegate of the most recent load.
    pub fn last_delegate(&self) -> Option<DelegateHandle> {
        self.loads
            .lock()
            .unwrap()
            .last()
            .map(|record| Arc::clone(&record.delegate))
    }

    /// Delivers `event` to the most recent load's delegate.
    ///
    /// Returns [`Delivery::Dropped`] when no load was ever issued.
    pub fn deliver(&self, event: NetworkEvent) -> Delivery {
        self.last_delegate()
            .map_or(Delivery::Dropped, |delegate| delegate.deliver(event))
    }
}

impl NativeBannerNetwork for ScriptedNetwork {
    fn load_native_banner_ad(&self, request: &AdRequest, delegate: DelegateHandle) {
        self.loads.lock().unwrap().push(LoadRecord {
            request: request.clone(),
            delegate: Arc::clone(&delegate),
        });

        let immediate = self.immediate.lock().unwrap().clone();
        for event in immediate {
            let _ = delegate.deliver(event);
        }
    }
}
