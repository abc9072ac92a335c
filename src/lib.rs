//! ndnkey: NDN identity key issuance
//!
//! This library generates a key for a Named Data Networking identity and
//! exports it next to a self-signed certificate record. It provides:
//!
//! - Key material generation (RSA-2048, ECDSA P-224, 32-byte HMAC keys)
//! - Key and certificate name derivation from an identity path
//! - Certificate records as NDN TLV Data packets
//! - Export to `<base>.pri` and `<base>.ndncert`
//!
//! # Architecture
//!
//! Names and TLV encoding live in [`name`] and [`tlv`]; keys in [`crypto`];
//! certificate records in [`cert`]; file output in [`storage`]. The [`issue`]
//! module strings these together as a single run with a recorded stage, so a
//! failure can be reported together with the step it happened in.
//!
//! # Example
//!
//! ```rust,no_run
//! use ndnkey::crypto::algorithm::AlgorithmKind;
//! use ndnkey::error::Result;
//! use ndnkey::issue::{issue, IssueConfig};
//!
//! fn example() -> Result<()> {
//!     let config = IssueConfig::new("/ndn/guest/alice", AlgorithmKind::Rsa, "alice")?;
//!     let report = issue(config)?;
//!     println!("{} exported", report.certificate_name);
//!     Ok(())
//! }
//! ```

pub mod cert;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod issue;
pub mod name;
pub mod storage;
pub mod tlv;

// Re-export commonly used types
pub use error::{NdnKeyError, Result};
