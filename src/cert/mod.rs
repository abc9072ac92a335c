//! Certificate record generation.
//!
//! This module builds the self-signed certificate record that binds a
//! certificate name to the identity's public key.

pub mod body;
pub mod record;

pub use record::{CertificateRecord, SignatureType};
