//! Cryptographic operations module.
//!
//! This module provides the key primitives used to issue an identity:
//!
//! - Algorithm selection (RSA-2048, ECDSA P-224, HMAC-SHA256)
//! - Key material generation from a secure random source
//! - Signing of certificate records
//!
//! # Example
//!
//! ```rust
//! use ndnkey::crypto::algorithm::AlgorithmKind;
//! use ndnkey::crypto::material::generate;
//! use ndnkey::crypto::signing::sign;
//!
//! # fn example() -> ndnkey::error::Result<()> {
//! let kind: AlgorithmKind = "ecdsa".parse()?;
//! let material = generate(kind)?;
//! let signature = sign(&material, b"certificate bytes")?;
//! assert!(!signature.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod algorithm;
pub mod material;
pub mod signing;
