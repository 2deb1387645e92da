#![forbid(unsafe_code, unconditional_recursion, overflowing_literals)]
#![deny(
    bad_style,
    deprecated,
    non_ascii_idents,
    rust_2018_idioms,
    trivial_casts,
    unreachable_code,
    unused_assignments,
    unused_imports,
    unused_must_use,
    unused_mut,
    unused_variables
)]

//! Test doubles for the `bannerbridge` mediation adapter.
//!
//! - [`ScriptedNetwork`] stands in for the third-party SDK: it records every
//!   load and keeps the delegate handles so a test can fire callbacks at will.
//! - [`RecordingSink`] stands in for the host framework and records every
//!   callback it receives.
//! - [`ChaosNetwork`] answers each load with a scripted outcome and then,
//!   at configurable rates, repeats or contradicts it the way misbehaving
//!   SDKs do.
//! - [`fixtures`] builds requests and ad handles.

pub mod chaos;
pub mod fixtures;
pub mod recording_sink;
pub mod scripted_network;

pub use chaos::{ChaosConfig, ChaosNetwork, Probability};
pub use recording_sink::{RecordingSink, SinkRecord};
pub use scripted_network::{LoadRecord, ScriptedNetwork};
