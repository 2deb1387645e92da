//! The finite state machine governing one ad request.
//!
//! ```text
//! Idle ──► Requesting ──► Filled ──► Rendered
//!                    └──► Failed
//!   (any state) ──────────────────► Revoked
//! ```
//!
//! Transitions only move forward. `Requesting` is entered at most once, so an
//! adapter can never issue a second load. `Failed`, `Rendered` and `Revoked`
//! are terminal.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// States of one ad-request attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// No request has been issued yet.
    #[default]
    Idle,
    /// A load is in flight with the network.
    Requesting,
    /// The network delivered a valid ad; the host has been told.
    Filled,
    /// The request failed; the host has been told.
    Failed,
    /// The host attached the filled ad to a view.
    Rendered,
    /// The adapter stopped being the network's delegate.
    Revoked,
}

impl LifecycleState {
    /// True for states no transition leaves.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Failed | Self::Rendered | Self::Revoked)
    }

    /// True once a result has been handed to the host.
    pub const fn has_reported(self) -> bool {
        matches!(self, Self::Filled | Self::Failed | Self::Rendered)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Requesting => "requesting",
            Self::Filled => "filled",
            Self::Failed => "failed",
            Self::Rendered => "rendered",
            Self::Revoked => "revoked",
        };
        f.write_str(name)
    }
}

/// Why a transition did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The transition is out of sequence, e.g. requesting twice.
    #[error("transition from {from} to {to} is not allowed")]
    Rejected {
        /// State the lifecycle was in
        from: LifecycleState,
        /// State that was attempted
        to: LifecycleState,
    },

    /// A result was already reported, or the adapter was revoked.
    ///
    /// Callers absorb this silently: it is how duplicate and late network
    /// callbacks are neutralized.
    #[error("lifecycle already terminated in state {state}")]
    AlreadyTerminated {
        /// State that absorbed the transition
        state: LifecycleState,
    },
}

impl TransitionError {
    /// State the lifecycle was in when the transition was refused.
    pub const fn state(&self) -> LifecycleState {
        match self {
            Self::Rejected { from, .. } => *from,
            Self::AlreadyTerminated { state } => *state,
        }
    }
}

/// One adapter's lifecycle. Not synchronized; the owner serializes access.
#[derive(Debug, Clone, Default)]
pub struct AdLifecycle {
    state: LifecycleState,
}

impl AdLifecycle {
    /// A lifecycle in `Idle`.
    pub const fn new() -> Self {
        Self {
            state: LifecycleState::Idle,
        }
    }

    /// Current state.
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// True while a network result is still expected.
    pub const fn accepts_callbacks(&self) -> bool {
        matches!(self.state, LifecycleState::Requesting)
    }

    /// `Idle → Requesting`.
    pub fn begin_request(&mut self) -> Result<(), TransitionError> {
        match self.state {
            LifecycleState::Idle => {
                self.state = LifecycleState::Requesting;
                Ok(())
            }
            from => Err(TransitionError::Rejected {
                from,
                to: LifecycleState::Requesting,
            }),
        }
    }

    /// `Requesting → Filled`.
    pub fn fill(&mut self) -> Result<(), TransitionError> {
        self.resolve(LifecycleState::Filled)
    }

    /// `Requesting → Failed`.
    pub fn fail(&mut self) -> Result<(), TransitionError> {
        self.resolve(LifecycleState::Failed)
    }

    /// `Filled → Rendered`.
    pub fn render(&mut self) -> Result<(), TransitionError> {
        match self.state {
            LifecycleState::Filled => {
                self.state = LifecycleState::Rendered;
                Ok(())
            }
            from => Err(TransitionError::Rejected {
                from,
                to: LifecycleState::Rendered,
            }),
        }
    }

    /// Any state `→ Revoked`. Returns false if already revoked.
    pub fn revoke(&mut self) -> bool {
        if self.state == LifecycleState::Revoked {
            return false;
        }
        self.state = LifecycleState::Revoked;
        true
    }

    fn resolve(&mut self, to: LifecycleState) -> Result<(), TransitionError> {
        match self.state {
            LifecycleState::Requesting => {
                self.state = to;
                Ok(())
            }
            LifecycleState::Idle => Err(TransitionError::Rejected {
                from: LifecycleState::Idle,
                to,
            }),
            state => Err(TransitionError::AlreadyTerminated { state }),
        }
    }
}
