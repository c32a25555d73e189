//! # Error Types
//!
//! Error handling for the interchain query host.
//!
//! Every packet-level failure is a variant of [`IcqError`] and is recoverable at
//! the protocol level: the caller turns it into an error acknowledgement the
//! requesting chain can observe. Gas exhaustion is deliberately *not* an
//! `IcqError` variant; it is reported as [`OutOfGas`] and surfaces through
//! [`PacketOutcome::Aborted`](crate::protocol::host::PacketOutcome::Aborted),
//! so it cannot be converted into a graceful rejection by `?`.
//!
//! ## Error Categories
//! - **Decode**: malformed envelope or request batch, empty batch
//! - **Unauthorized**: host disabled, path not allow-listed, historical or proven query
//! - **Execution**: the query itself failed on the host
//! - **Validation**: an administrative parameter update was rejected
//! - **Config**: configuration file or environment problems
//!
//! ## Example Usage
//! ```rust
//! use interchain_query::error::{IcqError, Result};
//!
//! fn require_enabled(enabled: bool) -> Result<()> {
//!     if !enabled {
//!         return Err(IcqError::Unauthorized("host is disabled".to_string()));
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_enabled(false).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Decode errors
    pub const ERR_EMPTY_PACKET: &str = "packet data is empty";
    pub const ERR_EMPTY_QUERY_BATCH: &str = "query batch contains no requests";
    pub const ERR_EMPTY_RESPONSE_BATCH: &str = "response batch contains no responses";

    /// Authorization errors
    pub const ERR_HOST_DISABLED: &str = "host is disabled";
    pub const ERR_HISTORICAL_QUERY: &str = "query height not allowed";
    pub const ERR_PROVE_QUERY: &str = "query proof not allowed";
    pub const ERR_PATH_NOT_ALLOWED: &str = "query path not allowed";

    /// Execution errors
    pub const ERR_NO_ROUTE: &str = "no route found for query path";
    pub const ERR_NON_ZERO_CODE: &str = "query returned non-zero code";

    /// Parameter store errors
    pub const ERR_PARAMS_WRITE_LOCK: &str = "Failed to acquire write lock on host params";
    pub const ERR_PARAMS_READ_LOCK: &str = "Failed to acquire read lock on host params";
    pub const ERR_ROUTER_WRITE_LOCK: &str = "Failed to acquire write lock on query router";
    pub const ERR_ROUTER_READ_LOCK: &str = "Failed to acquire read lock on query router";
}

// IcqError is the primary error type for all host operations
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum IcqError {
    #[error("I/O error: {0}")]
    #[serde(skip_serializing, skip_deserializing)]
    Io(#[from] io::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

impl IcqError {
    /// Stable classification used when the error is written into an acknowledgement.
    pub fn kind(&self) -> ErrorKind {
        match self {
            IcqError::Decode(_) => ErrorKind::Decode,
            IcqError::Unauthorized(_) => ErrorKind::Unauthorized,
            IcqError::Execution(_) => ErrorKind::Execution,
            IcqError::Validation(_) => ErrorKind::Validation,
            IcqError::Io(_)
            | IcqError::Encode(_)
            | IcqError::ConfigError(_)
            | IcqError::LockPoisoned(_) => ErrorKind::Internal,
        }
    }
}

/// Coarse error classes exposed on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Decode,
    Unauthorized,
    Execution,
    Validation,
    Internal,
}

impl ErrorKind {
    /// Get human-readable name
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::Decode => "decode",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Execution => "execution",
            ErrorKind::Validation => "validation",
            ErrorKind::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The per-packet gas budget ran out.
///
/// Not recoverable inside the host: the enclosing transaction must be rolled
/// back and no acknowledgement may be written.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("out of gas in location: {descriptor}; gas wanted: {limit}, gas used: {used}")]
pub struct OutOfGas {
    /// What was consuming gas when the limit was hit
    pub descriptor: String,
    /// The meter's limit
    pub limit: u64,
    /// Gas the meter would have reached
    pub used: u64,
}

/// Type alias for Results using IcqError
pub type Result<T> = std::result::Result<T, IcqError>;
