use std::net::AddrParseError;
use std::num::ParseIntError;

use thiserror::Error;

#[derive(Debug, Error)]
/// Configuration errors, surfaced at startup before anything runs.
pub enum ConfigError {
    /// Port value could not be parsed.
    #[error("invalid port value '{value}': {source}")]
    PortParseError {
        /// Offending value.
        value: String,
        /// Parse error.
        source: ParseIntError,
    },

    /// Port was zero.
    #[error("port cannot be zero")]
    InvalidPort {
        /// Offending value.
        value: String,
    },

    /// Bind address could not be parsed.
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        /// Offending value.
        value: String,
        /// Parse error.
        source: AddrParseError,
    },

    /// A component rejected its parameters.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Reason.
        reason: String,
    },
}
