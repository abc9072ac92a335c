//! Private key encodings.
//!
//! Asymmetric keys are written as PKCS#8, either PEM-armoured or raw DER.
//! HMAC keys are written as their raw 32 bytes; PKCS#8 has no HMAC form, and
//! raw bytes are not a valid encoding of an asymmetric key.

use crate::crypto::algorithm::AlgorithmKind;
use crate::crypto::material::KeyMaterial;
use crate::error::{NdnKeyError, Result};
use rsa::pkcs8::EncodePrivateKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

/// PEM label of a PKCS#8 private key.
pub const PKCS8_PEM_LABEL: &str = "PRIVATE KEY";

/// On-disk format of an exported private key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivateKeyEncoding {
    /// PKCS#8 DER inside a `PRIVATE KEY` PEM block.
    Pem,
    /// PKCS#8 DER.
    Der,
    /// The key bytes verbatim.
    Raw,
}

impl PrivateKeyEncoding {
    /// The encoding used when none is requested.
    pub fn default_for(kind: AlgorithmKind) -> Self {
        if kind.is_symmetric() {
            PrivateKeyEncoding::Raw
        } else {
            PrivateKeyEncoding::Pem
        }
    }

    pub fn supports(&self, kind: AlgorithmKind) -> bool {
        match self {
            PrivateKeyEncoding::Pem | PrivateKeyEncoding::Der => !kind.is_symmetric(),
            PrivateKeyEncoding::Raw => kind.is_symmetric(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrivateKeyEncoding::Pem => "pem",
            PrivateKeyEncoding::Der => "der",
            PrivateKeyEncoding::Raw => "raw",
        }
    }
}

impl fmt::Display for PrivateKeyEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrivateKeyEncoding {
    type Err = NdnKeyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pem" => Ok(PrivateKeyEncoding::Pem),
            "der" => Ok(PrivateKeyEncoding::Der),
            "raw" => Ok(PrivateKeyEncoding::Raw),
            _ => Err(NdnKeyError::ConfigError(format!(
                "Unsupported format: '{}'. Use 'pem', 'der' or 'raw'",
                s
            ))),
        }
    }
}

/// Serialize `material` in `encoding`.
///
/// Fails with `EncodingError` when the encoding cannot represent the key.
///
/// # Example
///
/// ```
/// use ndnkey::crypto::algorithm::AlgorithmKind;
/// use ndnkey::crypto::material::generate;
/// use ndnkey::storage::encoding::{encode_private_key, PrivateKeyEncoding};
///
/// let material = generate(AlgorithmKind::Ecdsa).unwrap();
/// let pem = encode_private_key(&material, PrivateKeyEncoding::Pem).unwrap();
/// assert!(std::str::from_utf8(&pem).unwrap().contains("BEGIN PRIVATE KEY"));
/// ```
pub fn encode_private_key(
    material: &KeyMaterial,
    encoding: PrivateKeyEncoding,
) -> Result<Zeroizing<Vec<u8>>> {
    if !encoding.supports(material.kind()) {
        return Err(NdnKeyError::EncodingError(format!(
            "{} keys cannot be exported as {}",
            material.kind(),
            encoding
        )));
    }

    match encoding {
        PrivateKeyEncoding::Raw => match material {
            KeyMaterial::Hmac(key) => Ok(Zeroizing::new(key.as_bytes().to_vec())),
            other => Err(NdnKeyError::EncodingError(format!(
                "{} keys have no raw encoding",
                other.kind()
            ))),
        },
        PrivateKeyEncoding::Der => pkcs8_der(material),
        PrivateKeyEncoding::Pem => {
            let der = pkcs8_der(material)?;
            let pem = pem::encode(&pem::Pem::new(PKCS8_PEM_LABEL, der.to_vec()));
            Ok(Zeroizing::new(pem.into_bytes()))
        }
    }
}

fn pkcs8_der(material: &KeyMaterial) -> Result<Zeroizing<Vec<u8>>> {
    let document = match material {
        KeyMaterial::Rsa(key) => key.to_pkcs8_der(),
        KeyMaterial::Ecdsa(key) => key.to_pkcs8_der(),
        KeyMaterial::Hmac(_) => {
            return Err(NdnKeyError::EncodingError(
                "hmac keys have no PKCS#8 encoding".to_string(),
            ))
        }
    };

    document
        .map(|doc| Zeroizing::new(doc.as_bytes().to_vec()))
        .map_err(|e| NdnKeyError::EncodingError(format!("PKCS#8 encoding failed: {}", e)))
}
