//! The native banner mediation adapter.
//!
//! [`NativeBannerAdAdapter`] turns one `request_native_banner_ad` call into
//! exactly one [`AdResult`] for the host, no matter how many (or how late)
//! callbacks the network raises.
//!
//! # Concurrency
//!
//! Every mutation of the lifecycle and of the binding slot happens under one
//! reentrant lock per adapter. The host sink and the network load call are
//! invoked with that lock held but with no interior borrow outstanding, so:
//!
//! - once `stop_being_delegate` returns, no callback can reach the sink, even
//!   one that passed the binding's flag check just before revocation;
//! - a sink or network may call back into the adapter on the same thread
//!   without deadlocking.
//!
//! The price is that `stop_being_delegate` waits for a sink call already in
//! progress on another thread. A sink must therefore never block on a lock
//! that a thread tearing the adapter down may hold.

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::ReentrantMutex;
use serde::Serialize;
use tracing::{debug, info, info_span, warn, Span};

use crate::binding::{DelegateBinding, DelegateHandle, NetworkDelegate, NetworkEvent};
use crate::config::AdapterConfig;
use crate::errors::{AdapterError, AdapterResult, Operation};
use crate::lifecycle::{AdLifecycle, LifecycleState};
use crate::network::{NativeBannerNetwork, SdkError};
use crate::sink::HostCallbackSink;
use crate::types::{AdRequest, AdResult, NativeAdHandle, RequestId};
use crate::validation::validate_ad_handle;

/// Point-in-time diagnostics for one adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdapterSnapshot {
    /// Current lifecycle state.
    pub state: LifecycleState,
    /// The request being served, once one was issued.
    pub request_id: Option<RequestId>,
    /// Whether network callbacks are still forwarded.
    pub binding_active: bool,
    /// When the terminal result was handed to the host.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Network callbacks absorbed without effect.
    pub suppressed_callbacks: u64,
}

/// Mediation adapter for one native banner ad request.
///
/// Adapters are single use: the first `request_native_banner_ad` issues the
/// load, every later one fails with [`AdapterError::InvalidState`]. Dropping
/// the adapter stops it being the network's delegate.
pub struct NativeBannerAdAdapter<N, S>
where
    N: NativeBannerNetwork + 'static,
    S: HostCallbackSink + 'static,
{
    core: Arc<AdapterCore<N, S>>,
}

impl<N, S> NativeBannerAdAdapter<N, S>
where
    N: NativeBannerNetwork + 'static,
    S: HostCallbackSink + 'static,
{
    /// Creates an idle adapter.
    pub fn new(network: N, sink: S, config: AdapterConfig) -> Self {
        Self {
            core: Arc::new(AdapterCore {
                network,
                sink,
                config,
                cell: ReentrantMutex::new(RefCell::new(AdapterCell::default())),
            }),
        }
    }

    /// Starts loading a native banner ad.
    ///
    /// Returns as soon as the network has been asked to load; the outcome
    /// reaches the sink later. Fails with [`AdapterError::InvalidState`],
    /// without contacting the network, unless the adapter is `Idle`.
    pub fn request_native_banner_ad(&self, request: AdRequest) -> AdapterResult<()> {
        self.core.request(request)
    }

    /// Tells the adapter the host attached the filled ad to a view.
    pub fn mark_rendered(&self) -> AdapterResult<()> {
        self.core.mark_rendered()
    }

    /// Revokes the delegate binding.
    ///
    /// Idempotent and valid in every state. After it returns, nothing the
    /// network does can reach the sink.
    ///
    /// If another thread is inside a sink callback, this waits for that call
    /// to finish. Do not call it while holding a lock the sink may take.
    pub fn stop_being_delegate(&self) {
        self.core.stop_being_delegate();
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.core.cell.lock().borrow().lifecycle.state()
    }

    /// Diagnostics snapshot.
    pub fn snapshot(&self) -> AdapterSnapshot {
        self.core.cell.lock().borrow().snapshot()
    }

    /// The configuration this adapter validates payloads with.
    pub fn config(&self) -> &AdapterConfig {
        &self.core.config
    }
}

impl<N, S> Drop for NativeBannerAdAdapter<N, S>
where
    N: NativeBannerNetwork + 'static,
    S: HostCallbackSink + 'static,
{
    fn drop(&mut self) {
        self.core.stop_being_delegate();
    }
}

impl<N, S> fmt::Debug for NativeBannerAdAdapter<N, S>
where
    N: NativeBannerNetwork + 'static,
    S: HostCallbackSink + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeBannerAdAdapter")
            .field("network", self.core.config.network_label())
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

#[derive(Default)]
struct AdapterCell {
    lifecycle: AdLifecycle,
    binding: Option<DelegateHandle>,
    request_id: Option<RequestId>,
    span: Option<Span>,
    resolved_at: Option<DateTime<Utc>>,
    suppressed_callbacks: u64,
}

impl AdapterCell {
    fn binding_active(&self) -> bool {
        self.binding.as_ref().is_some_and(|binding| binding.is_active())
    }

    fn awaiting_result(&self) -> bool {
        self.binding_active() && self.lifecycle.accepts_callbacks()
    }

    fn suppress(&mut self, event: &'static str) {
        self.suppressed_callbacks += 1;
        let state = self.lifecycle.state();
        if contradicts(state, event) {
            warn!(event, state = %state, "contradictory network callback suppressed");
        } else if state.has_reported() {
            debug!(event, state = %state, "duplicate network callback suppressed");
        } else {
            debug!(event, state = %state, "network callback suppressed");
        }
    }

    fn span(&self) -> Span {
        self.span.clone().unwrap_or_else(Span::none)
    }

    fn snapshot(&self) -> AdapterSnapshot {
        AdapterSnapshot {
            state: self.lifecycle.state(),
            request_id: self.request_id,
            binding_active: self.binding_active(),
            resolved_at: self.resolved_at,
            suppressed_callbacks: self.suppressed_callbacks,
        }
    }
}

/// A load outcome disagreeing with the result the host already has.
fn contradicts(state: LifecycleState, event: &str) -> bool {
    match state {
        LifecycleState::Filled | LifecycleState::Rendered => event == "load_failed",
        LifecycleState::Failed => event == "loaded",
        LifecycleState::Idle | LifecycleState::Requesting | LifecycleState::Revoked => false,
    }
}

#[derive(Debug, Clone, Copy)]
enum Passthrough {
    Impression,
    Click,
}

struct AdapterCore<N, S> {
    network: N,
    sink: S,
    config: AdapterConfig,
    cell: ReentrantMutex<RefCell<AdapterCell>>,
}

impl<N, S> AdapterCore<N, S>
where
    N: NativeBannerNetwork + 'static,
    S: HostCallbackSink + 'static,
{
    fn request(self: &Arc<Self>, request: AdRequest) -> AdapterResult<()> {
        let guard = self.cell.lock();

        let (delegate, span) = {
            let mut cell = guard.borrow_mut();
            let state = cell.lifecycle.state();
            if state != LifecycleState::Idle {
                let _entered = cell.span().entered();
                warn!(
                    rejected_request_id = %request.request_id(),
                    state = %state,
                    "adapter reused, request rejected"
                );
                return Err(AdapterError::InvalidState {
                    operation: Operation::RequestAd,
                    state,
                });
            }

            let delegate = DelegateBinding::bind(self, state, request.request_id())?;
            cell.lifecycle
                .begin_request()
                .map_err(|error| AdapterError::InvalidState {
                    operation: Operation::RequestAd,
                    state: error.state(),
                })?;

            let span = info_span!(
                "native_banner_request",
                request_id = %request.request_id(),
                placement = %request.placement_id(),
                network = %self.config.network_label(),
            );
            cell.binding = Some(Arc::clone(&delegate));
            cell.request_id = Some(request.request_id());
            cell.span = Some(span.clone());
            (delegate, span)
        };

        let _entered = span.enter();
        info!(
            cache_policy = ?request.load_options().media_cache_policy(),
            "requesting native banner ad"
        );
        self.network.load_native_banner_ad(&request, delegate);
        Ok(())
    }

    fn mark_rendered(&self) -> AdapterResult<()> {
        let guard = self.cell.lock();
        let mut cell = guard.borrow_mut();
        cell.lifecycle
            .render()
            .map_err(|error| AdapterError::InvalidState {
                operation: Operation::MarkRendered,
                state: error.state(),
            })?;

        let _entered = cell.span().entered();
        debug!("native banner ad rendered");
        Ok(())
    }

    fn stop_being_delegate(&self) {
        let guard = self.cell.lock();
        let mut cell = guard.borrow_mut();

        let binding_revoked = cell
            .binding
            .as_ref()
            .is_some_and(|binding| binding.revoke());
        let from = cell.lifecycle.state();
        if cell.lifecycle.revoke() {
            let _entered = cell.span().entered();
            debug!(from = %from, binding_revoked, "stopped being delegate");
        }
    }

    fn on_ad_loaded(&self, cell: &RefCell<AdapterCell>, handle: Option<NativeAdHandle>) {
        let result = {
            let mut cell = cell.borrow_mut();
            if !cell.awaiting_result() {
                cell.suppress("loaded");
                return;
            }

            let (transition, result) = match validate_ad_handle(handle, &self.config) {
                Ok(handle) => (cell.lifecycle.fill(), AdResult::Success(handle)),
                Err(failure) => {
                    warn!(error = %failure, "network returned an unusable ad");
                    (cell.lifecycle.fail(), AdResult::Failure(failure))
                }
            };
            if transition.is_err() {
                cell.suppress("loaded");
                return;
            }
            cell.resolved_at = Some(Utc::now());
            result
        };

        self.report(result);
    }

    fn on_ad_load_failed(&self, cell: &RefCell<AdapterCell>, error: &SdkError) {
        let result = {
            let mut cell = cell.borrow_mut();
            if !cell.awaiting_result() || cell.lifecycle.fail().is_err() {
                cell.suppress("load_failed");
                return;
            }
            cell.resolved_at = Some(Utc::now());
            AdResult::Failure(error.to_failure())
        };

        self.report(result);
    }

    fn on_passthrough(&self, cell: &RefCell<AdapterCell>, event: Passthrough) {
        {
            let mut cell = cell.borrow_mut();
            let showing = matches!(
                cell.lifecycle.state(),
                LifecycleState::Filled | LifecycleState::Rendered
            );
            if !(showing && cell.binding_active()) {
                cell.suppress(match event {
                    Passthrough::Impression => "impression",
                    Passthrough::Click => "click",
                });
                return;
            }
        }

        match event {
            Passthrough::Impression => self.sink.report_impression(),
            Passthrough::Click => self.sink.report_click(),
        }
    }

    fn report(&self, result: AdResult) {
        match &result {
            AdResult::Success(handle) => {
                info!(ad_id = handle.ad_id(), "native banner ad filled");
            }
            AdResult::Failure(failure) => {
                info!(code = failure.code().code(), error = %failure, "native banner ad failed");
            }
        }
        self.sink.on_ad_result(result);
    }
}

impl<N, S> NetworkDelegate for AdapterCore<N, S>
where
    N: NativeBannerNetwork + 'static,
    S: HostCallbackSink + 'static,
{
    fn handle_network_event(&self, event: NetworkEvent) {
        let guard = self.cell.lock();
        let span = guard.borrow().span();
        let _entered = span.enter();

        match event {
            NetworkEvent::Loaded(handle) => self.on_ad_loaded(&guard, handle),
            NetworkEvent::LoadFailed(error) => self.on_ad_load_failed(&guard, &error),
            NetworkEvent::Impression => self.on_passthrough(&guard, Passthrough::Impression),
            NetworkEvent::Click => self.on_passthrough(&guard, Passthrough::Click),
        }
    }
}
