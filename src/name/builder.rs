//! Key and certificate name derivation.
//!
//! For an identity `/ndn/guest/alice` generated at millisecond `T`:
//!
//! - key name: `/ndn/guest/alice/KEY/ksk-T`
//! - certificate name: `/ndn/guest/alice/KEY/ksk-T/ID-CERT/%00%00`
//!
//! Two runs in the same millisecond produce the same names.

use crate::error::{NdnKeyError, Result};
use crate::name::component::Component;
use crate::name::path::Name;
use chrono::Utc;

/// Marker component between the identity and the key version.
pub const KEY_MARKER: &str = "KEY";

/// Marker component between the key name and the certificate version.
pub const CERTIFICATE_MARKER: &str = "ID-CERT";

/// Reserved certificate version meaning "unversioned, latest".
pub const UNVERSIONED: [u8; 2] = [0x00, 0x00];

/// Prefix of the time-derived key version component.
pub const KEY_VERSION_PREFIX: &str = "ksk-";

/// The pair of names derived for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNames {
    pub key_name: Name,
    pub certificate_name: Name,
}

/// Derives key and certificate names under one identity.
#[derive(Debug, Clone)]
pub struct NameBuilder {
    identity: Name,
}

impl NameBuilder {
    /// Create a builder for a non-empty identity path.
    pub fn new(identity: Name) -> Result<Self> {
        if identity.is_empty() {
            return Err(NdnKeyError::InvalidIdentityError(
                "Identity path cannot be empty".to_string(),
            ));
        }
        Ok(Self { identity })
    }

    pub fn identity(&self) -> &Name {
        &self.identity
    }

    /// Identity + `KEY` + version component for `timestamp_ms`.
    pub fn key_name(&self, timestamp_ms: u64) -> Name {
        self.identity
            .clone()
            .append(KEY_MARKER)
            .append(version_component(timestamp_ms))
    }

    /// Derive both names for a key generated at `timestamp_ms`.
    ///
    /// # Example
    ///
    /// ```
    /// use ndnkey::name::builder::NameBuilder;
    /// use ndnkey::name::path::Name;
    ///
    /// let builder = NameBuilder::new(Name::parse("/ndn/guest/alice").unwrap()).unwrap();
    /// let names = builder.derive(1_700_000_000_000);
    /// assert_eq!(names.key_name.to_string(), "/ndn/guest/alice/KEY/ksk-1700000000000");
    /// assert_eq!(
    ///     names.certificate_name.to_string(),
    ///     "/ndn/guest/alice/KEY/ksk-1700000000000/ID-CERT/%00%00"
    /// );
    /// ```
    pub fn derive(&self, timestamp_ms: u64) -> KeyNames {
        let key_name = self.key_name(timestamp_ms);
        let certificate_name = certificate_name_for(&key_name);
        KeyNames {
            key_name,
            certificate_name,
        }
    }
}

/// The version component `ksk-<timestamp_ms>`.
pub fn version_component(timestamp_ms: u64) -> Component {
    Component::from(format!("{}{}", KEY_VERSION_PREFIX, timestamp_ms).as_str())
}

/// The certificate name for any key name.
pub fn certificate_name_for(key_name: &Name) -> Name {
    key_name
        .clone()
        .append(CERTIFICATE_MARKER)
        .append(&UNVERSIONED[..])
}

/// Milliseconds since the Unix epoch, UTC.
///
/// Fails with `GenerationError` when the system clock is before the epoch.
pub fn current_timestamp_ms() -> Result<u64> {
    timestamp_from_millis(Utc::now().timestamp_millis())
}

fn timestamp_from_millis(millis: i64) -> Result<u64> {
    u64::try_from(millis).map_err(|_| {
        NdnKeyError::GenerationError(format!(
            "System clock is before the Unix epoch ({} ms)",
            millis
        ))
    })
}
