//! Adapters serve one request. Any second request is a host bug and must not
//! reach the network.

use bannerbridge::network::codes;
use bannerbridge::{
    AdapterConfig, AdapterError, LifecycleState, NativeBannerAdAdapter, NetworkEvent, Operation,
    SdkError,
};
use bannerbridge_testing::{fixtures, RecordingSink, ScriptedNetwork};

fn adapter() -> (
    NativeBannerAdAdapter<ScriptedNetwork, RecordingSink>,
    ScriptedNetwork,
    RecordingSink,
) {
    let network = ScriptedNetwork::new();
    let sink = RecordingSink::new();
    let adapter =
        NativeBannerAdAdapter::new(network.clone(), sink.clone(), AdapterConfig::default());
    (adapter, network, sink)
}

fn assert_rejected(
    adapter: &NativeBannerAdAdapter<ScriptedNetwork, RecordingSink>,
    expected: LifecycleState,
) {
    let error = adapter
        .request_native_banner_ad(fixtures::request())
        .expect_err("second request must be rejected");

    assert_eq!(
        error,
        AdapterError::InvalidState {
            operation: Operation::RequestAd,
            state: expected,
        }
    );
}

#[test]
fn second_request_while_requesting_is_rejected() {
    let (adapter, network, sink) = adapter();
    adapter
        .request_native_banner_ad(fixtures::request())
        .expect("idle adapter accepts a request");

    assert_rejected(&adapter, LifecycleState::Requesting);

    assert_eq!(network.load_count(), 1);
    assert!(sink.records().is_empty());
    assert_eq!(adapter.state(), LifecycleState::Requesting);
}

#[test]
fn request_after_fill_is_rejected() {
    // Given: an adapter that already delivered an ad
    let (adapter, network, sink) = adapter();
    adapter
        .request_native_banner_ad(fixtures::request())
        .expect("idle adapter accepts a request");
    let _ = network.deliver(NetworkEvent::Loaded(Some(fixtures::valid_handle("ad-1"))));

    // When / Then: reuse fails and the network is left alone
    assert_rejected(&adapter, LifecycleState::Filled);
    assert_eq!(network.load_count(), 1);
    assert_eq!(sink.result_count(), 1);
}

#[test]
fn request_after_failure_is_rejected() {
    let (adapter, network, _sink) = adapter();
    adapter
        .request_native_banner_ad(fixtures::request())
        .expect("idle adapter accepts a request");
    let _ = network.deliver(NetworkEvent::LoadFailed(SdkError::new(
        codes::NO_FILL,
        "no fill",
    )));

    assert_rejected(&adapter, LifecycleState::Failed);
    assert_eq!(network.load_count(), 1);
}

#[test]
fn request_after_stop_is_rejected() {
    let (adapter, network, sink) = adapter();
    adapter.stop_being_delegate();

    assert_rejected(&adapter, LifecycleState::Revoked);
    assert_eq!(network.load_count(), 0);
    assert!(sink.records().is_empty());
}

#[test]
fn rejected_request_does_not_disturb_the_original_binding() {
    // Given: a request in flight and a rejected second attempt
    let (adapter, network, sink) = adapter();
    adapter
        .request_native_banner_ad(fixtures::request())
        .expect("idle adapter accepts a request");
    let original = network.last_delegate().expect("load was issued");
    assert_rejected(&adapter, LifecycleState::Requesting);

    // When: the network answers the original request
    let _ = original.deliver(NetworkEvent::Loaded(Some(fixtures::valid_handle("ad-1"))));

    // Then: the answer still reaches the host
    assert_eq!(sink.result_count(), 1);
    assert_eq!(adapter.state(), LifecycleState::Filled);
}

#[test]
fn mark_rendered_requires_a_filled_ad() {
    let (adapter, network, _sink) = adapter();

    let before = adapter
        .mark_rendered()
        .expect_err("idle adapter cannot render");
    assert_eq!(
        before,
        AdapterError::InvalidState {
            operation: Operation::MarkRendered,
            state: LifecycleState::Idle,
        }
    );

    adapter
        .request_native_banner_ad(fixtures::request())
        .expect("idle adapter accepts a request");
    let _ = network.deliver(NetworkEvent::Loaded(Some(fixtures::valid_handle("ad-1"))));

    adapter.mark_rendered().expect("filled ad can be rendered");
    assert_eq!(adapter.state(), LifecycleState::Rendered);
    assert_rejected(&adapter, LifecycleState::Rendered);
}
