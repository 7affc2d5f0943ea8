// Copyright (c) 2025 - Cowboy AI, Inc.
//! Host Create Flow State Machine
//!
//! Tracks one create request through the pipeline. The flow is strictly
//! linear; no state is revisited.
//!
//! # States
//!
//! ```text
//! Received → Validated → Classified → ConstraintsChecked → Transacting
//!     │           │            │               │                │
//!     └───────────┴────────────┴───────────────┴────────────────┴──→ Aborted(kind)
//!
//! Transacting → Committed → DnsTriggered
//! Transacting → RolledBack                 (dry run)
//! ```
//!
//! `Committed`, `RolledBack` and `Aborted` end the request; only `Committed`
//! may additionally move to `DnsTriggered`, and only for subordinate hosts.

use std::fmt;

use super::{StateMachine, TransitionError, TransitionResult};
use crate::errors::FlowError;

/// Position of a create request in the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCreateState {
    Received,
    /// Name parsed, normalized and deep enough
    Validated,
    /// Placement known; `subordinate` is true when a superordinate domain was found
    Classified { subordinate: bool },
    /// Address rules and the advisory uniqueness check passed
    ConstraintsChecked { subordinate: bool },
    Transacting { subordinate: bool },
    Committed { subordinate: bool },
    RolledBack,
    DnsTriggered,
    Aborted(FlowError),
}

/// Pipeline step outcomes fed to the machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCreateInput {
    NameValidated,
    Classified { subordinate: bool },
    ConstraintsPassed,
    TransactionStarted,
    TransactionCommitted,
    TransactionRolledBack,
    DnsRefreshEnqueued,
    Failed(FlowError),
}

impl fmt::Display for HostCreateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostCreateState::Received => write!(f, "received"),
            HostCreateState::Validated => write!(f, "validated"),
            HostCreateState::Classified { .. } => write!(f, "classified"),
            HostCreateState::ConstraintsChecked { .. } => write!(f, "constraints_checked"),
            HostCreateState::Transacting { .. } => write!(f, "transacting"),
            HostCreateState::Committed { .. } => write!(f, "committed"),
            HostCreateState::RolledBack => write!(f, "rolled_back"),
            HostCreateState::DnsTriggered => write!(f, "dns_triggered"),
            HostCreateState::Aborted(kind) => write!(f, "aborted({})", kind.result_code()),
        }
    }
}

impl fmt::Display for HostCreateInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostCreateInput::NameValidated => write!(f, "name_validated"),
            HostCreateInput::Classified { subordinate: true } => write!(f, "classified_subordinate"),
            HostCreateInput::Classified { subordinate: false } => write!(f, "classified_external"),
            HostCreateInput::ConstraintsPassed => write!(f, "constraints_passed"),
            HostCreateInput::TransactionStarted => write!(f, "transaction_started"),
            HostCreateInput::TransactionCommitted => write!(f, "transaction_committed"),
            HostCreateInput::TransactionRolledBack => write!(f, "transaction_rolled_back"),
            HostCreateInput::DnsRefreshEnqueued => write!(f, "dns_refresh_enqueued"),
            HostCreateInput::Failed(_) => write!(f, "failed"),
        }
    }
}

impl StateMachine for HostCreateState {
    type Input = HostCreateInput;

    fn transition(&self, input: &Self::Input) -> TransitionResult<Self> {
        use HostCreateInput as In;
        use HostCreateState::*;

        let next = match (self, input) {
            (Received, In::NameValidated) => Validated,
            (Validated, In::Classified { subordinate }) => Classified {
                subordinate: *subordinate,
            },
            (Classified { subordinate }, In::ConstraintsPassed) => ConstraintsChecked {
                subordinate: *subordinate,
            },
            (ConstraintsChecked { subordinate }, In::TransactionStarted) => Transacting {
                subordinate: *subordinate,
            },
            (Transacting { subordinate }, In::TransactionCommitted) => Committed {
                subordinate: *subordinate,
            },
            (Transacting { .. }, In::TransactionRolledBack) => RolledBack,
            (Committed { subordinate: true }, In::DnsRefreshEnqueued) => DnsTriggered,
            (state, In::Failed(kind)) if !state.is_terminal() => Aborted(kind.clone()),
            (state, input) => {
                return Err(TransitionError::InvalidTransition {
                    from: state.to_string(),
                    input: input.to_string(),
                })
            }
        };

        Ok(next)
    }

    fn is_terminal(&self) -> bool {
        matches!(
            self,
            HostCreateState::Committed { .. }
                | HostCreateState::RolledBack
                | HostCreateState::DnsTriggered
                | HostCreateState::Aborted(_)
        )
    }
}
