// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for the host create pipeline
//!
//! Two families are kept strictly apart:
//!
//! - [`FlowError`] - client-input and state-conflict failures. Each variant is a
//!   distinct failure kind carrying the structured payload the caller needs.
//! - [`InfrastructureError`] - transient failures of the store or messaging
//!   layer. Callers may retry these; they never stand in for a validation kind.

use std::fmt;

use thiserror::Error;

/// Errors that can occur in infrastructure operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InfrastructureError {
    /// Persistent store could not be reached or its state lock was poisoned
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Optimistic transaction kept conflicting with concurrent writers
    #[error("Transaction retries exhausted after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    /// NATS connection error
    #[error("NATS connection error: {0}")]
    NatsConnection(String),

    /// NATS publish error
    #[error("NATS publish error: {0}")]
    NatsPublish(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for infrastructure operations
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;

impl From<async_nats::Error> for InfrastructureError {
    fn from(err: async_nats::Error) -> Self {
        InfrastructureError::NatsConnection(err.to_string())
    }
}

impl From<serde_json::Error> for InfrastructureError {
    fn from(err: serde_json::Error) -> Self {
        InfrastructureError::Serialization(err.to_string())
    }
}

/// Failure of a host create request
///
/// Every variant except [`FlowError::Infrastructure`] is a client-input or
/// state-conflict failure that aborts with no persisted side effects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("Registrar is not logged in")]
    NotLoggedIn,

    #[error("Invalid host name")]
    InvalidHostName,

    #[error("Host names must be in lower-case; expected {expected}")]
    HostNameNotLowerCase { expected: String },

    #[error("Host names must be puny-coded; expected {expected}")]
    HostNameNotPunyCoded { expected: String },

    #[error("Host names must be in normalized format; expected {expected}")]
    HostNameNotNormalized { expected: String },

    #[error("Host names are limited to 253 characters")]
    HostNameTooLong,

    #[error("Host name must be at least two levels below the registry suffix")]
    HostNameTooShallow,

    #[error("Subordinate hosts must have an ip address")]
    SubordinateHostMustHaveIp,

    #[error("External hosts must not have ip addresses")]
    UnexpectedExternalHostIp,

    #[error("IP address version mismatch: {literal}")]
    IpAddressVersionMismatch { literal: String },

    #[error("Invalid IP address: {literal}")]
    InvalidIpAddress { literal: String },

    #[error("Superordinate domain ({domain}) does not exist")]
    SuperordinateDomainDoesNotExist { domain: String },

    #[error("Superordinate domain for this hostname is in pending delete")]
    SuperordinateDomainInPendingDelete { domain: String },

    #[error("Object with given ID ({name}) already exists")]
    AlreadyExistsForThisClient { name: String },

    #[error("Object with given ID ({name}) already exists; another registrar holds it or a concurrent create won")]
    CreateContention { name: String },

    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

/// Result type for the host create pipeline
pub type FlowResult<T> = Result<T, FlowError>;

impl FlowError {
    /// Whether the caller may retry the same request unchanged
    pub fn is_transient(&self) -> bool {
        matches!(self, FlowError::Infrastructure(_))
    }

    /// Registry protocol result code reported for this failure
    pub fn result_code(&self) -> ResultCode {
        use FlowError::*;

        match self {
            NotLoggedIn => ResultCode::CommandUseError,
            InvalidHostName
            | HostNameNotLowerCase { .. }
            | HostNameNotPunyCoded { .. }
            | HostNameNotNormalized { .. }
            | HostNameTooLong
            | IpAddressVersionMismatch { .. }
            | InvalidIpAddress { .. } => ResultCode::ParameterValueSyntaxError,
            HostNameTooShallow | UnexpectedExternalHostIp => {
                ResultCode::ParameterValuePolicyError
            }
            SubordinateHostMustHaveIp => ResultCode::RequiredParameterMissing,
            SuperordinateDomainDoesNotExist { .. } => ResultCode::ObjectDoesNotExist,
            SuperordinateDomainInPendingDelete { .. } => ResultCode::StatusProhibitsOperation,
            AlreadyExistsForThisClient { .. } | CreateContention { .. } => ResultCode::ObjectExists,
            Infrastructure(_) => ResultCode::CommandFailed,
        }
    }
}

/// Registry protocol (EPP, RFC 5730) result codes used by this flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultCode {
    Success,
    CommandUseError,
    RequiredParameterMissing,
    ParameterValueSyntaxError,
    ObjectExists,
    ObjectDoesNotExist,
    StatusProhibitsOperation,
    ParameterValuePolicyError,
    CommandFailed,
}

impl ResultCode {
    /// Numeric protocol code
    pub fn code(self) -> u16 {
        match self {
            ResultCode::Success => 1000,
            ResultCode::CommandUseError => 2002,
            ResultCode::RequiredParameterMissing => 2003,
            ResultCode::ParameterValueSyntaxError => 2005,
            ResultCode::ObjectExists => 2302,
            ResultCode::ObjectDoesNotExist => 2303,
            ResultCode::StatusProhibitsOperation => 2304,
            ResultCode::ParameterValuePolicyError => 2306,
            ResultCode::CommandFailed => 2400,
        }
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
