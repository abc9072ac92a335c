//! Algorithm kinds supported for identity keys.

use crate::error::{NdnKeyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The cryptographic family of an identity key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmKind {
    /// RSA with a 2048-bit modulus.
    Rsa,
    /// ECDSA on NIST P-224.
    Ecdsa,
    /// HMAC-SHA256 with a 256-bit secret.
    Hmac,
}

impl AlgorithmKind {
    /// Every supported kind, in selector order.
    pub const ALL: [AlgorithmKind; 3] = [AlgorithmKind::Rsa, AlgorithmKind::Ecdsa, AlgorithmKind::Hmac];

    /// The selector string accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            AlgorithmKind::Rsa => "rsa",
            AlgorithmKind::Ecdsa => "ecdsa",
            AlgorithmKind::Hmac => "hmac",
        }
    }

    /// Whether keys of this kind have no public half.
    pub fn is_symmetric(&self) -> bool {
        matches!(self, AlgorithmKind::Hmac)
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmKind {
    type Err = NdnKeyError;

    /// Parse an algorithm selector (`rsa`, `ecdsa` or `hmac`, case-insensitive).
    ///
    /// # Example
    ///
    /// ```
    /// use ndnkey::crypto::algorithm::AlgorithmKind;
    ///
    /// let kind: AlgorithmKind = "ECDSA".parse().unwrap();
    /// assert_eq!(kind, AlgorithmKind::Ecdsa);
    /// assert!("dsa".parse::<AlgorithmKind>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "rsa" => Ok(AlgorithmKind::Rsa),
            "ecdsa" => Ok(AlgorithmKind::Ecdsa),
            "hmac" => Ok(AlgorithmKind::Hmac),
            _ => Err(NdnKeyError::UnsupportedAlgorithmError(format!(
                "'{}' (expected rsa, ecdsa or hmac)",
                s
            ))),
        }
    }
}
