//! Property tests over arbitrary network callback sequences.

use bannerbridge::network::codes;
use bannerbridge::{
    AdResult, AdapterConfig, LifecycleState, NativeBannerAdAdapter, NetworkEvent, SdkError,
};
use bannerbridge_testing::{fixtures, RecordingSink, ScriptedNetwork, SinkRecord};
use proptest::prelude::*;

fn arb_event() -> impl Strategy<Value = NetworkEvent> {
    prop_oneof![
        "[a-z0-9]{1,8}".prop_map(|id| NetworkEvent::Loaded(Some(fixtures::valid_handle(&id)))),
        Just(NetworkEvent::Loaded(None)),
        Just(NetworkEvent::Loaded(Some(fixtures::expired_handle("expired")))),
        prop::sample::select(vec![
            codes::NETWORK_ERROR,
            codes::NO_FILL,
            codes::LOAD_TOO_FREQUENTLY,
            codes::SERVER_ERROR,
            codes::INTERNAL_ERROR,
            codes::TIMEOUT,
            -1,
        ])
        .prop_map(|code| NetworkEvent::LoadFailed(SdkError::new(code, "failed"))),
        Just(NetworkEvent::Impression),
        Just(NetworkEvent::Click),
    ]
}

fn is_terminal_event(event: &NetworkEvent) -> bool {
    matches!(event, NetworkEvent::Loaded(_) | NetworkEvent::LoadFailed(_))
}

proptest! {
    #[test]
    fn at_most_one_result_whatever_the_network_does(
        events in prop::collection::vec(arb_event(), 0..24),
        stop_at in prop::option::of(0usize..24),
    ) {
        let network = ScriptedNetwork::new();
        let sink = RecordingSink::new();
        let adapter =
            NativeBannerAdAdapter::new(network.clone(), sink.clone(), AdapterConfig::default());
        adapter
            .request_native_banner_ad(fixtures::request())
            .expect("idle adapter accepts a request");

        let mut reported_at_stop = None;
        for (index, event) in events.iter().enumerate() {
            if stop_at == Some(index) {
                adapter.stop_being_delegate();
                reported_at_stop = Some(sink.records().len());
            }
            let _ = network.deliver(event.clone());
        }

        let results = sink.results();
        prop_assert!(results.len() <= 1);

        match reported_at_stop {
            Some(count) => {
                prop_assert_eq!(sink.records().len(), count);
                prop_assert_eq!(adapter.state(), LifecycleState::Revoked);
            }
            None => {
                // Without teardown, the first terminal event always produces the result.
                let first_terminal = events.iter().find(|event| is_terminal_event(event));
                prop_assert_eq!(results.len(), usize::from(first_terminal.is_some()));
                if let Some(NetworkEvent::LoadFailed(_)) = first_terminal {
                    prop_assert!(matches!(results[0], AdResult::Failure(_)));
                }
            }
        }
    }

    #[test]
    fn engagement_is_only_forwarded_after_a_success(
        events in prop::collection::vec(arb_event(), 0..24),
    ) {
        let network = ScriptedNetwork::new();
        let sink = RecordingSink::new();
        let adapter =
            NativeBannerAdAdapter::new(network.clone(), sink.clone(), AdapterConfig::default());
        adapter
            .request_native_banner_ad(fixtures::request())
            .expect("idle adapter accepts a request");

        for event in events {
            let _ = network.deliver(event);
        }

        let records = sink.records();
        let engagement = records
            .iter()
            .filter(|record| !matches!(record, SinkRecord::Result(_)))
            .count();
        if engagement > 0 {
            prop_assert!(matches!(records[0], SinkRecord::Result(AdResult::Success(_))));
        }
    }
}
