//! Misbehaving-network simulation.
//!
//! [`ChaosNetwork`] answers every load with one outcome and then repeats or
//! contradicts it at configured rates.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use bannerbridge::network::codes;
use bannerbridge::{
    AdRequest, DelegateHandle, Delivery, NativeBannerNetwork, NetworkEvent, SdkError,
};
use nutype::nutype;
use rand::{random, rngs::StdRng, Rng, SeedableRng};

use crate::fixtures;

/// Probability value for chaos injection rates.
///
/// Probability represents a value in the range [0.0, 1.0] where 0.0 means
/// never inject and 1.0 means always inject.
///
/// # Examples
///
/// ```ignore
/// use bannerbridge_testing::chaos::Probability;
///
/// let never = Probability::try_new(0.0).unwrap();
/// let always = Probability::try_new(1.0).unwrap();
///
/// assert!(Probability::try_new(1.5).is_err());
/// ```
#[nutype(
    validate(greater_or_equal = 0.0, less_or_equal = 1.0),
    derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Into)
)]
pub struct Probability(f32);

fn clamped(probability: f32) -> Probability {
    Probability::try_new(probability.clamp(0.0, 1.0)).expect("clamped value is always valid")
}

/// Injection rates and delivery mode for a [`ChaosNetwork`].
#[derive(Debug, Clone)]
pub struct ChaosConfig {
    deterministic_seed: Option<u64>,
    duplicate_probability: Probability,
    contradiction_probability: Probability,
    max_extra_callbacks: u32,
    background_delivery: bool,
}

impl ChaosConfig {
    /// Quiet config with a fixed seed.
    pub fn deterministic() -> Self {
        Self::seeded(0)
    }

    /// Quiet config whose injections replay from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self {
            deterministic_seed: Some(seed),
            ..Self::default()
        }
    }

    /// Chance that each extra slot repeats the original outcome.
    pub fn with_duplicate_probability(mut self, probability: f32) -> Self {
        self.duplicate_probability = clamped(probability);
        self
    }

    /// Chance that each extra slot reports the opposite outcome.
    pub fn with_contradiction_probability(mut self, probability: f32) -> Self {
        self.contradiction_probability = clamped(probability);
        self
    }

    /// Number of extra slots considered after the outcome.
    pub fn with_max_extra_callbacks(mut self, max: u32) -> Self {
        self.max_extra_callbacks = max;
        self
    }

    /// Deliver callbacks from a spawned thread instead of the load call.
    pub fn on_background_thread(mut self) -> Self {
        self.background_delivery = true;
        self
    }
}

impl Default for ChaosConfig {
    fn default() -> Self {
        Self {
            deterministic_seed: None,
            duplicate_probability: clamped(0.0),
            contradiction_probability: clamped(0.0),
            max_extra_callbacks: 3,
            background_delivery: false,
        }
    }
}

/// Network that answers every load with `outcome` plus injected noise.
pub struct ChaosNetwork {
    outcome: NetworkEvent,
    config: ChaosConfig,
    rng: Mutex<StdRng>,
    delivered: Arc<Mutex<Vec<(NetworkEvent, Delivery)>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl ChaosNetwork {
    /// Creates a network that answers every load with `outcome`.
    pub fn new(outcome: NetworkEvent, config: ChaosConfig) -> Self {
        let rng = match config.deterministic_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(random()),
        };

        Self {
            outcome,
            config,
            rng: Mutex::new(rng),
            delivered: Arc::default(),
            workers: Mutex::new(Vec::new()),
        }
    }

    /// Every callback sent so far and what the binding did with it.
    pub fn delivered(&self) -> Vec<(NetworkEvent, Delivery)> {
        self.delivered.lock().unwrap().clone()
    }

    /// Waits for background deliveries to finish.
    pub fn join(&self) {
        let workers: Vec<_> = self.workers.lock().unwrap().drain(..).collect();
        for worker in workers {
            worker.join().expect("chaos delivery thread panicked");
        }
    }

    fn should_inject(&self, probability: Probability) -> bool {
        let prob_f32: f32 = probability.into();

        if prob_f32 <= 0.0 {
            return false;
        }

        if prob_f32 >= 1.0 {
            return true;
        }

        let mut rng = self
            .rng
            .lock()
            .expect("chaos RNG mutex should not be poisoned");

        rng.random_bool(f64::from(prob_f32))
    }

    fn script(&self) -> Vec<NetworkEvent> {
        let mut events = vec![self.outcome.clone()];
        for _ in 0..self.config.max_extra_callbacks {
            if self.should_inject(self.config.duplicate_probability) {
                tracing::debug!(event = self.outcome.kind(), "injecting duplicate callback");
                events.push(self.outcome.clone());
            }
            if self.should_inject(self.config.contradiction_probability) {
                let contradiction = contradict(&self.outcome);
                tracing::debug!(event = contradiction.kind(), "injecting contradictory callback");
                events.push(contradiction);
            }
        }
        events
    }
}

fn contradict(outcome: &NetworkEvent) -> NetworkEvent {
    match outcome {
        NetworkEvent::Loaded(_) => NetworkEvent::LoadFailed(SdkError::new(
            codes::INTERNAL_ERROR,
            "contradictory failure after load",
        )),
        NetworkEvent::LoadFailed(_) => {
            NetworkEvent::Loaded(Some(fixtures::valid_handle("contradictory-fill")))
        }
        other => other.clone(),
    }
}

fn deliver_all(
    delegate: &DelegateHandle,
    events: Vec<NetworkEvent>,
    log: &Mutex<Vec<(NetworkEvent, Delivery)>>,
) {
    for event in events {
        let delivery = delegate.deliver(event.clone());
        log.lock().unwrap().push((event, delivery));
    }
}

impl NativeBannerNetwork for ChaosNetwork {
    fn load_native_banner_ad(&self, _request: &AdRequest, delegate: DelegateHandle) {
        let events = self.script();

        if !self.config.background_delivery {
            deliver_all(&delegate, events, &self.delivered);
            return;
        }

        let log = Arc::clone(&self.delivered);
        let worker = thread::spawn(move || deliver_all(&delegate, events, &log));
        self.workers.lock().unwrap().push(worker);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_rejects_out_of_range() {
        assert!(Probability::try_new(1.5).is_err());
        assert!(Probability::try_new(-0.1).is_err());
        assert!(Probability::try_new(0.5).is_ok());
    }

    #[test]
    fn quiet_config_sends_only_the_outcome() {
        let network = ChaosNetwork::new(NetworkEvent::Click, ChaosConfig::deterministic());

        assert_eq!(network.script(), vec![NetworkEvent::Click]);
    }

    #[test]
    fn certain_injection_fills_every_slot() {
        let config = ChaosConfig::deterministic()
            .with_duplicate_probability(1.0)
            .with_contradiction_probability(1.0)
            .with_max_extra_callbacks(2);
        let network = ChaosNetwork::new(NetworkEvent::Loaded(None), config);

        let script = network.script();

        assert_eq!(script.len(), 5);
        assert!(matches!(script[2], NetworkEvent::LoadFailed(_)));
    }

    #[test]
    fn same_seed_same_script() {
        let config = ChaosConfig::seeded(42)
            .with_duplicate_probability(0.5)
            .with_contradiction_probability(0.5);

        let first = ChaosNetwork::new(NetworkEvent::Impression, config.clone()).script();
        let second = ChaosNetwork::new(NetworkEvent::Impression, config).script();

        assert_eq!(first, second);
    }
}
