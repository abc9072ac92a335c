//! Error types for the ndnkey library.
//!
//! This module defines all error types used throughout the library.
//! Each variant names the stage of identity issuance it comes from and
//! carries enough context to diagnose the underlying cause.

use thiserror::Error;

/// The main error type for ndnkey operations.
#[derive(Error, Debug)]
pub enum NdnKeyError {
    /// The identity path is empty or not a valid NDN name
    #[error("Invalid identity: {0}")]
    InvalidIdentityError(String),

    /// The requested algorithm kind is not one of rsa, ecdsa or hmac
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithmError(String),

    /// The random source or key generation primitive failed
    #[error("Key generation error: {0}")]
    GenerationError(String),

    /// Key material is malformed or incompatible with the requested encoding
    #[error("Encoding error: {0}")]
    EncodingError(String),

    /// The output destination could not be created
    #[error("Cannot open {target}: {source}")]
    SinkUnavailableError {
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing or flushing an output failed part way
    #[error("Write to {target} failed: {source}")]
    WriteError {
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// A certificate record could not be parsed
    #[error("Decode error: {0}")]
    DecodeError(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A specialized Result type for ndnkey operations.
pub type Result<T> = std::result::Result<T, NdnKeyError>;
