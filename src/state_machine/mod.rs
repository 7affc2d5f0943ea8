// Copyright (c) 2025 - Cowboy AI, Inc.
//! Request Lifecycle State Machines
//!
//! Transitions are pure: `(State, Input) → State`. Whoever drives the machine
//! owns the side effects and keeps the [`StateTrail`] for its log lines.

use std::fmt;

pub mod host_create;

pub use host_create::{HostCreateInput, HostCreateState};

/// Result of a state transition
pub type TransitionResult<S> = Result<S, TransitionError>;

/// Errors that can occur during state transitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Transition from current state on this input is not allowed
    #[error("Invalid transition from {from} on {input}")]
    InvalidTransition { from: String, input: String },
}

/// Finite state machine over a state enum
pub trait StateMachine: Sized + Clone + fmt::Display {
    type Input;

    /// Next state for `input`, or an error if the input is not allowed here
    fn transition(&self, input: &Self::Input) -> TransitionResult<Self>;

    fn can_transition(&self, input: &Self::Input) -> bool {
        self.transition(input).is_ok()
    }

    /// Whether no further input is accepted
    fn is_terminal(&self) -> bool {
        false
    }
}

/// Current state plus the names of every state passed through
#[derive(Debug, Clone)]
pub struct StateTrail<FSM: StateMachine> {
    current: FSM,
    visited: Vec<String>,
}

impl<FSM: StateMachine> StateTrail<FSM> {
    pub fn new(initial: FSM) -> Self {
        Self {
            visited: vec![initial.to_string()],
            current: initial,
        }
    }

    /// Apply `input`; a rejected input leaves the trail unchanged
    pub fn advance(&mut self, input: &FSM::Input) -> TransitionResult<()> {
        self.current = self.current.transition(input)?;
        self.visited.push(self.current.to_string());
        Ok(())
    }

    pub fn current(&self) -> &FSM {
        &self.current
    }

    pub fn visited(&self) -> &[String] {
        &self.visited
    }
}

impl<FSM: StateMachine> fmt::Display for StateTrail<FSM> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.visited.join(" → "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FlowError;

    #[test]
    fn test_trail_records_each_state() {
        let mut trail = StateTrail::new(HostCreateState::Received);
        trail.advance(&HostCreateInput::NameValidated).unwrap();
        trail
            .advance(&HostCreateInput::Failed(FlowError::HostNameTooShallow))
            .unwrap();

        assert_eq!(trail.visited().len(), 3);
        assert!(trail.current().is_terminal());
        assert_eq!(
            trail.to_string(),
            format!(
                "received → validated → aborted({})",
                FlowError::HostNameTooShallow.result_code()
            )
        );
    }

    #[test]
    fn test_rejected_input_leaves_trail_unchanged() {
        let mut trail = StateTrail::new(HostCreateState::Received);
        assert!(trail.advance(&HostCreateInput::TransactionCommitted).is_err());
        assert_eq!(*trail.current(), HostCreateState::Received);
        assert_eq!(trail.to_string(), "received");
    }
}
