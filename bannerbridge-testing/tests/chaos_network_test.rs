//! Adapters against networks that repeat and contradict themselves.

use std::sync::Arc;

use bannerbridge::network::codes;
use bannerbridge::{
    AdResult, AdapterConfig, Delivery, LifecycleState, NativeBannerAdAdapter, NetworkEvent,
    SdkError,
};
use bannerbridge_testing::{fixtures, ChaosConfig, ChaosNetwork, RecordingSink};

fn noisy(seed: u64) -> ChaosConfig {
    ChaosConfig::seeded(seed)
        .with_duplicate_probability(0.6)
        .with_contradiction_probability(0.6)
        .with_max_extra_callbacks(5)
}

#[test]
fn noisy_success_is_reported_once_as_success() {
    for seed in 0..200 {
        // Given: a network that fills and then keeps talking
        let network = Arc::new(ChaosNetwork::new(
            NetworkEvent::Loaded(Some(fixtures::valid_handle("ad-1"))),
            noisy(seed),
        ));
        let sink = RecordingSink::new();
        let adapter = NativeBannerAdAdapter::new(
            Arc::clone(&network),
            sink.clone(),
            AdapterConfig::default(),
        );

        // When
        adapter
            .request_native_banner_ad(fixtures::request())
            .expect("idle adapter accepts a request");

        // Then: the outcome won and everything after it was absorbed
        assert_eq!(
            sink.results(),
            vec![AdResult::Success(fixtures::valid_handle("ad-1"))],
            "seed {seed}"
        );
        assert_eq!(adapter.state(), LifecycleState::Filled, "seed {seed}");
        let extra = u64::try_from(network.delivered().len() - 1).expect("fits in u64");
        assert_eq!(adapter.snapshot().suppressed_callbacks, extra, "seed {seed}");
    }
}

#[test]
fn noisy_failure_is_reported_once_as_failure() {
    for seed in 0..200 {
        let network = Arc::new(ChaosNetwork::new(
            NetworkEvent::LoadFailed(SdkError::new(codes::SERVER_ERROR, "backend down")),
            noisy(seed),
        ));
        let sink = RecordingSink::new();
        let adapter = NativeBannerAdAdapter::new(
            Arc::clone(&network),
            sink.clone(),
            AdapterConfig::default(),
        );

        adapter
            .request_native_banner_ad(fixtures::request())
            .expect("idle adapter accepts a request");

        let results = sink.results();
        assert_eq!(results.len(), 1, "seed {seed}");
        assert!(!results[0].is_success(), "seed {seed}");
        assert_eq!(adapter.state(), LifecycleState::Failed, "seed {seed}");
    }
}

#[test]
fn background_delivery_after_stop_is_dropped() {
    for seed in 0..50 {
        // Given: a network answering from its own thread
        let network = Arc::new(ChaosNetwork::new(
            NetworkEvent::Loaded(Some(fixtures::valid_handle("ad-1"))),
            noisy(seed).on_background_thread(),
        ));
        let sink = RecordingSink::new();
        let adapter = NativeBannerAdAdapter::new(
            Arc::clone(&network),
            sink.clone(),
            AdapterConfig::default(),
        );
        adapter
            .request_native_banner_ad(fixtures::request())
            .expect("idle adapter accepts a request");

        // When: the host stops while the thread may still be delivering
        adapter.stop_being_delegate();
        let reported_at_stop = sink.records().len();
        network.join();

        // Then: nothing landed after stop, and at most one result overall
        assert_eq!(sink.records().len(), reported_at_stop, "seed {seed}");
        assert!(sink.result_count() <= 1, "seed {seed}");
        let forwarded = network
            .delivered()
            .iter()
            .filter(|(_, delivery)| *delivery == Delivery::Forwarded)
            .count();
        assert!(forwarded >= sink.result_count(), "seed {seed}");
    }
}

#[test]
fn background_delivery_without_stop_reports_exactly_once() {
    for seed in 0..50 {
        let network = Arc::new(ChaosNetwork::new(
            NetworkEvent::LoadFailed(SdkError::new(codes::TIMEOUT, "timeout")),
            noisy(seed).on_background_thread(),
        ));
        let sink = RecordingSink::new();
        let adapter = NativeBannerAdAdapter::new(
            Arc::clone(&network),
            sink.clone(),
            AdapterConfig::default(),
        );

        adapter
            .request_native_banner_ad(fixtures::request())
            .expect("idle adapter accepts a request");
        network.join();

        assert_eq!(sink.result_count(), 1, "seed {seed}");
        assert_eq!(adapter.state(), LifecycleState::Failed, "seed {seed}");
    }
}
