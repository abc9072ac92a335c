//! Key material generation.
//!
//! This module produces the private key for an identity. Each algorithm kind
//! owns its own representation inside [`KeyMaterial`], so the shape of a key
//! is always determined by its kind.

use crate::crypto::algorithm::AlgorithmKind;
use crate::error::{NdnKeyError, Result};
use rand::rngs::{OsRng, StdRng};
use rand::{CryptoRng, RngCore, SeedableRng};
use rsa::pkcs8::EncodePublicKey;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Modulus size of generated RSA keys.
pub const RSA_MODULUS_BITS: usize = 2048;

/// Length of a generated HMAC secret in bytes.
pub const HMAC_KEY_LENGTH: usize = 32;

/// A 256-bit HMAC secret, wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct HmacKey([u8; HMAC_KEY_LENGTH]);

impl HmacKey {
    /// Wrap exactly [`HMAC_KEY_LENGTH`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let key: [u8; HMAC_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            NdnKeyError::EncodingError(format!(
                "Expected {} bytes for HMAC key, got {}",
                HMAC_KEY_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for HmacKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HmacKey(..)")
    }
}

/// Private key material for one identity.
#[derive(Clone)]
pub enum KeyMaterial {
    Rsa(RsaPrivateKey),
    Ecdsa(p224::SecretKey),
    Hmac(HmacKey),
}

impl KeyMaterial {
    /// The algorithm kind this material belongs to.
    pub fn kind(&self) -> AlgorithmKind {
        match self {
            KeyMaterial::Rsa(_) => AlgorithmKind::Rsa,
            KeyMaterial::Ecdsa(_) => AlgorithmKind::Ecdsa,
            KeyMaterial::Hmac(_) => AlgorithmKind::Hmac,
        }
    }

    /// DER-encoded SubjectPublicKeyInfo of the public half.
    ///
    /// Returns `None` for symmetric keys.
    pub fn public_key_der(&self) -> Result<Option<Vec<u8>>> {
        let document = match self {
            KeyMaterial::Rsa(key) => RsaPublicKey::from(key).to_public_key_der(),
            KeyMaterial::Ecdsa(key) => key.public_key().to_public_key_der(),
            KeyMaterial::Hmac(_) => return Ok(None),
        };

        document
            .map(|doc| Some(doc.as_bytes().to_vec()))
            .map_err(|e| NdnKeyError::EncodingError(format!("Failed to encode public key: {}", e)))
    }

    /// Short hex identifier of the public key (first 8 bytes of its SHA-256).
    pub fn fingerprint(&self) -> Result<Option<String>> {
        Ok(self
            .public_key_der()?
            .map(|der| hex::encode(&Sha256::digest(&der)[..8])))
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyMaterial::{:?}(..)", self.kind())
    }
}

/// Generate key material for `kind` from the operating system's random source.
///
/// # Example
///
/// ```
/// use ndnkey::crypto::algorithm::AlgorithmKind;
/// use ndnkey::crypto::material::generate;
///
/// let material = generate(AlgorithmKind::Hmac).unwrap();
/// assert_eq!(material.kind(), AlgorithmKind::Hmac);
/// ```
pub fn generate(kind: AlgorithmKind) -> Result<KeyMaterial> {
    generate_key_material(kind, &mut OsRng)
}

/// Generate key material for `kind` from the given random source.
pub fn generate_key_material<R>(kind: AlgorithmKind, rng: &mut R) -> Result<KeyMaterial>
where
    R: RngCore + CryptoRng,
{
    match kind {
        AlgorithmKind::Rsa => generate_rsa(rng).map(KeyMaterial::Rsa),
        AlgorithmKind::Ecdsa => generate_p224(rng).map(KeyMaterial::Ecdsa),
        AlgorithmKind::Hmac => {
            let mut secret = [0u8; HMAC_KEY_LENGTH];
            rng.try_fill_bytes(&mut secret).map_err(|e| {
                NdnKeyError::GenerationError(format!(
                    "Random source produced fewer than {} bytes: {}",
                    HMAC_KEY_LENGTH, e
                ))
            })?;
            let key = HmacKey(secret);
            secret.zeroize();
            Ok(KeyMaterial::Hmac(key))
        }
    }
}

/// RSA prime search draws from the source infallibly, so it runs on a
/// CSPRNG seeded by one fallible draw from `rng`.
fn generate_rsa<R: RngCore + CryptoRng>(rng: &mut R) -> Result<RsaPrivateKey> {
    let mut seed = <StdRng as SeedableRng>::Seed::default();
    rng.try_fill_bytes(&mut seed)
        .map_err(|e| NdnKeyError::GenerationError(format!("Random source failed: {}", e)))?;
    let mut prime_rng = StdRng::from_seed(seed);
    seed.zeroize();

    RsaPrivateKey::new(&mut prime_rng, RSA_MODULUS_BITS).map_err(|e| {
        NdnKeyError::GenerationError(format!(
            "RSA-{} keypair generation failed: {}",
            RSA_MODULUS_BITS, e
        ))
    })
}

fn generate_p224<R: RngCore + CryptoRng>(rng: &mut R) -> Result<p224::SecretKey> {
    let mut scalar = p224::FieldBytes::default();
    rng.try_fill_bytes(scalar.as_mut_slice())
        .map_err(|e| NdnKeyError::GenerationError(format!("Random source failed: {}", e)))?;

    // Rejects zero and values at or above the group order
    let secret = p224::SecretKey::from_bytes(&scalar).map_err(|_| {
        NdnKeyError::GenerationError("Random scalar is not a valid P-224 key".to_string())
    });
    scalar.as_mut_slice().zeroize();
    secret
}
