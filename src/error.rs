//! # Error Types
//!
//! Error handling for the packet encoder.
//!
//! Every encoding failure is fatal for the packet being encoded: each one points at a
//! structural defect in a packet type's declaration, never at a transient condition.
//! Callers are expected to log and drop the packet rather than retry the same input.
//!
//! ## Error Categories
//! - **Declaration Errors**: missing identifier, malformed rule maps, unsupported map keys
//! - **Resource Errors**: nesting deeper than the configured limit, oversized collections
//! - **Read Errors**: truncated or invalid primitive encodings on the read side
//! - **Configuration Errors**: invalid TOML, failed logging setup, duplicate registrations
//!
//! All errors implement `std::error::Error` for interoperability.
//!
//! ## Example Usage
//! ```rust
//! use packet_encoder::error::{ProtocolError, Result};
//! use tracing::{error, info};
//!
//! fn lookup_id(id: Option<i16>, type_name: &str) -> Result<i16> {
//!     id.ok_or_else(|| ProtocolError::MissingIdentifier(type_name.to_string()))
//! }
//!
//! match lookup_id(None, "LoginPacket") {
//!     Ok(id) => info!(id, "Resolved packet identifier"),
//!     Err(e) => error!(error = %e, "Dropping packet"),
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Registry-related error messages
    pub const ERR_REGISTRY_WRITE_LOCK: &str = "Failed to acquire write lock on packet registry";
    pub const ERR_REGISTRY_READ_LOCK: &str = "Failed to acquire read lock on packet registry";

    /// Rule map errors
    pub const ERR_UNKNOWN_RULE_FIELD: &str = "rule targets a field the type does not declare";
    pub const ERR_CONVERSION_KIND: &str = "conversion produced a value of the wrong kind";

    /// Read-side errors
    pub const ERR_UNEXPECTED_EOF: &str = "Unexpected end of input";
    pub const ERR_INVALID_BOOL: &str = "Invalid boolean byte";
    pub const ERR_INVALID_UTF8: &str = "String is not valid UTF-8";
    pub const ERR_VARINT_OVERFLOW: &str = "String length prefix overflows";
    pub const ERR_STRING_TOO_LONG: &str = "String length exceeds remaining input";
}

/// Primary error type for all encoder operations
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    #[serde(skip_serializing, skip_deserializing)]
    Io(#[from] io::Error),

    #[error("Packet type has no wire identifier: {0}")]
    MissingIdentifier(String),

    #[error("Malformed rule map: {0}")]
    MalformedRuleMap(String),

    #[error("Unsupported map key type: {0}")]
    UnsupportedKeyType(String),

    #[error("Nesting exceeded the depth limit of {limit}")]
    UnboundedRecursion { limit: usize },

    #[error("Collection too large: {0} entries")]
    OversizedCollection(usize),

    #[error("Duplicate packet registration: {0}")]
    DuplicateRegistration(String),

    #[error("Deserialize error: {0}")]
    DeserializeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Synchronization primitive poisoned: {0}")]
    LockPoisoned(String),
}

impl ProtocolError {
    /// Short, stable label for the error kind (used in logs and metrics)
    pub fn kind(&self) -> &'static str {
        match self {
            ProtocolError::Io(_) => "io",
            ProtocolError::MissingIdentifier(_) => "missing_identifier",
            ProtocolError::MalformedRuleMap(_) => "malformed_rule_map",
            ProtocolError::UnsupportedKeyType(_) => "unsupported_key_type",
            ProtocolError::UnboundedRecursion { .. } => "unbounded_recursion",
            ProtocolError::OversizedCollection(_) => "oversized_collection",
            ProtocolError::DuplicateRegistration(_) => "duplicate_registration",
            ProtocolError::DeserializeError(_) => "deserialize",
            ProtocolError::ConfigError(_) => "config",
            ProtocolError::LockPoisoned(_) => "lock_poisoned",
        }
    }
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
