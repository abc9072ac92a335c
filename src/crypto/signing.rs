//! Signatures over certificate records.
//!
//! RSA keys sign with PKCS#1 v1.5 over SHA-256, ECDSA keys produce a DER
//! signature over a SHA-256 prehash, and HMAC keys produce an HMAC-SHA256 tag.

use crate::crypto::material::KeyMaterial;
use crate::error::{NdnKeyError, Result};
use hmac::{Hmac, Mac};
use p224::ecdsa::signature::hazmat::PrehashSigner;
use rsa::pkcs1v15::SigningKey as RsaSigningKey;
use rsa::signature::{SignatureEncoding, Signer};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Sign `message` with the given key material.
///
/// # Example
///
/// ```
/// use ndnkey::crypto::algorithm::AlgorithmKind;
/// use ndnkey::crypto::material::generate;
/// use ndnkey::crypto::signing::sign;
///
/// let material = generate(AlgorithmKind::Hmac).unwrap();
/// let tag = sign(&material, b"payload").unwrap();
/// assert_eq!(tag.len(), 32);
/// ```
pub fn sign(material: &KeyMaterial, message: &[u8]) -> Result<Vec<u8>> {
    match material {
        KeyMaterial::Rsa(key) => {
            let signing_key = RsaSigningKey::<Sha256>::new(key.clone());
            let signature = signing_key
                .try_sign(message)
                .map_err(|e| NdnKeyError::EncodingError(format!("RSA signing failed: {}", e)))?;
            Ok(signature.to_vec())
        }
        KeyMaterial::Ecdsa(secret) => {
            let signing_key = p224::ecdsa::SigningKey::from(secret);
            let digest = Sha256::digest(message);
            let signature: p224::ecdsa::Signature = signing_key
                .sign_prehash(&digest)
                .map_err(|e| NdnKeyError::EncodingError(format!("ECDSA signing failed: {}", e)))?;
            Ok(signature.to_der().as_bytes().to_vec())
        }
        KeyMaterial::Hmac(key) => {
            let mut mac = HmacSha256::new_from_slice(key.as_bytes())
                .map_err(|e| NdnKeyError::EncodingError(format!("Invalid HMAC key: {}", e)))?;
            mac.update(message);
            Ok(mac.finalize().into_bytes().to_vec())
        }
    }
}
