//! The identity aggregate produced by one issuance run.

use crate::crypto::algorithm::AlgorithmKind;
use crate::crypto::material::{self, KeyMaterial};
use crate::error::{NdnKeyError, Result};
use crate::name::builder::{current_timestamp_ms, KeyNames, NameBuilder};
use crate::name::path::Name;

/// Key name, certificate name and key material of one identity.
///
/// The algorithm kind is stored alongside the material and must agree with
/// it; construction fails otherwise.
#[derive(Debug, Clone)]
pub struct Identity {
    key_name: Name,
    certificate_name: Name,
    material: KeyMaterial,
    algorithm: AlgorithmKind,
    issued_at_ms: u64,
}

impl Identity {
    /// Assemble an identity from already-derived parts.
    pub fn new(
        names: KeyNames,
        material: KeyMaterial,
        algorithm: AlgorithmKind,
        issued_at_ms: u64,
    ) -> Result<Self> {
        if material.kind() != algorithm {
            return Err(NdnKeyError::EncodingError(format!(
                "Key material is {} but identity declares {}",
                material.kind(),
                algorithm
            )));
        }

        Ok(Self {
            key_name: names.key_name,
            certificate_name: names.certificate_name,
            material,
            algorithm,
            issued_at_ms,
        })
    }

    /// Generate a fresh key for `identity` and name it with the current time.
    ///
    /// # Example
    ///
    /// ```
    /// use ndnkey::crypto::algorithm::AlgorithmKind;
    /// use ndnkey::identity::Identity;
    /// use ndnkey::name::path::Name;
    ///
    /// # fn example() -> ndnkey::error::Result<()> {
    /// let identity = Identity::generate(&Name::parse("/ndn/guest/bob")?, AlgorithmKind::Hmac)?;
    /// assert!(identity.certificate_name().to_string().ends_with("/ID-CERT/%00%00"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn generate(identity: &Name, algorithm: AlgorithmKind) -> Result<Self> {
        let builder = NameBuilder::new(identity.clone())?;
        let material = material::generate(algorithm)?;
        let issued_at_ms = current_timestamp_ms()?;
        Self::new(builder.derive(issued_at_ms), material, algorithm, issued_at_ms)
    }

    /// The name of the key: identity, `KEY`, version.
    pub fn key_name(&self) -> &Name {
        &self.key_name
    }

    /// The name of the self-signed certificate record.
    pub fn certificate_name(&self) -> &Name {
        &self.certificate_name
    }

    /// Get the private key material.
    pub fn material(&self) -> &KeyMaterial {
        &self.material
    }

    /// Get the algorithm kind.
    pub fn algorithm(&self) -> AlgorithmKind {
        self.algorithm
    }

    /// Milliseconds since the Unix epoch at which the names were derived.
    pub fn issued_at_ms(&self) -> u64 {
        self.issued_at_ms
    }

    /// The identity path the key name was derived from.
    pub fn identity_name(&self) -> Name {
        self.key_name.prefix(self.key_name.len().saturating_sub(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::material::generate;

    fn bob_names(timestamp_ms: u64) -> KeyNames {
        NameBuilder::new(Name::parse("/ndn/guest/bob").unwrap())
            .unwrap()
            .derive(timestamp_ms)
    }

    #[test]
    fn test_new_accepts_matching_kind() {
        let material = generate(AlgorithmKind::Hmac).unwrap();
        let identity = Identity::new(bob_names(5), material, AlgorithmKind::Hmac, 5).unwrap();

        assert_eq!(identity.algorithm(), AlgorithmKind::Hmac);
        assert_eq!(identity.issued_at_ms(), 5);
        assert_eq!(identity.identity_name().to_string(), "/ndn/guest/bob");
    }

    #[test]
    fn test_new_rejects_mismatched_kind() {
        let material = generate(AlgorithmKind::Hmac).unwrap();
        let result = Identity::new(bob_names(5), material, AlgorithmKind::Ecdsa, 5);

        match result {
            Err(NdnKeyError::EncodingError(msg)) => {
                assert!(msg.contains("hmac"));
                assert!(msg.contains("ecdsa"));
            }
            _ => panic!("Expected EncodingError"),
        }
    }

    #[test]
    fn test_generate_names_match_timestamp() {
        let name = Name::parse("/ndn/guest/bob").unwrap();
        let identity = Identity::generate(&name, AlgorithmKind::Ecdsa).unwrap();

        let expected = bob_names(identity.issued_at_ms());
        assert_eq!(identity.key_name(), &expected.key_name);
        assert_eq!(identity.certificate_name(), &expected.certificate_name);
        assert_eq!(identity.material().kind(), AlgorithmKind::Ecdsa);
    }

    #[test]
    fn test_generate_rejects_empty_identity() {
        let result = Identity::generate(&Name::new(), AlgorithmKind::Hmac);
        assert!(matches!(result, Err(NdnKeyError::InvalidIdentityError(_))));
    }
}
