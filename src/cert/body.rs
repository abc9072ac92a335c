//! DER certificate body.
//!
//! The body carried in a certificate record's content:
//!
//! ```text
//! CertificateBody ::= SEQUENCE {
//!     validity             SEQUENCE { notBefore GeneralizedTime, notAfter GeneralizedTime },
//!     subject              SEQUENCE OF SEQUENCE { oid OBJECT IDENTIFIER, value UTF8String },
//!     subjectPublicKeyInfo SubjectPublicKeyInfo OPTIONAL -- absent for HMAC keys
//! }
//! ```

use crate::error::{NdnKeyError, Result};
use crate::name::path::Name;
use const_oid::ObjectIdentifier;
use der::asn1::GeneralizedTime;
use der::{Decode, Encode, Sequence};
use spki::SubjectPublicKeyInfoOwned;
use std::time::Duration;

/// X.520 `name` attribute, used for the subject description.
pub const NAME_ATTRIBUTE: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.41");

/// Certificate validity when none is configured.
pub const DEFAULT_VALIDITY_DAYS: u32 = 365;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct CertificateValidity {
    pub not_before: GeneralizedTime,
    pub not_after: GeneralizedTime,
}

#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct SubjectDescription {
    pub oid: ObjectIdentifier,
    pub value: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct CertificateBody {
    pub validity: CertificateValidity,
    pub subject: Vec<SubjectDescription>,
    pub subject_public_key_info: Option<SubjectPublicKeyInfoOwned>,
}

impl CertificateBody {
    /// Build a body for `subject` valid from `not_before_ms` for `validity_days`.
    ///
    /// `public_key_der` is a DER SubjectPublicKeyInfo, or `None` for
    /// symmetric keys.
    pub fn new(
        subject: &Name,
        public_key_der: Option<&[u8]>,
        not_before_ms: u64,
        validity_days: u32,
    ) -> Result<Self> {
        let validity = create_validity(not_before_ms, validity_days)?;

        let subject_public_key_info = public_key_der
            .map(|der| SubjectPublicKeyInfoOwned::from_der(der))
            .transpose()
            .map_err(|e| {
                NdnKeyError::EncodingError(format!("Invalid SubjectPublicKeyInfo: {}", e))
            })?;

        Ok(Self {
            validity,
            subject: vec![SubjectDescription {
                oid: NAME_ATTRIBUTE,
                value: subject.to_string(),
            }],
            subject_public_key_info,
        })
    }

    pub fn to_der_bytes(&self) -> Result<Vec<u8>> {
        self.to_der().map_err(|e| {
            NdnKeyError::EncodingError(format!("Failed to encode certificate body: {}", e))
        })
    }

    pub fn from_der_bytes(der: &[u8]) -> Result<Self> {
        Self::from_der(der).map_err(|e| {
            NdnKeyError::DecodeError(format!("Failed to decode certificate body: {}", e))
        })
    }

    /// The subject name recorded in the body, if any.
    pub fn subject_name(&self) -> Option<&str> {
        self.subject
            .iter()
            .find(|description| description.oid == NAME_ATTRIBUTE)
            .map(|description| description.value.as_str())
    }
}

/// Validity window starting at `not_before_ms` (truncated to seconds) and lasting `days`.
///
/// Fails with `EncodingError` when the end falls outside what GeneralizedTime can hold.
pub fn create_validity(not_before_ms: u64, days: u32) -> Result<CertificateValidity> {
    let not_before = Duration::from_secs(not_before_ms / 1000);
    let not_after = not_before + Duration::from_secs(days as u64 * SECONDS_PER_DAY);

    let to_time = |unix: Duration| {
        GeneralizedTime::from_unix_duration(unix).map_err(|e| {
            NdnKeyError::EncodingError(format!("Failed to create validity: {}", e))
        })
    };

    Ok(CertificateValidity {
        not_before: to_time(not_before)?,
        not_after: to_time(not_after)?,
    })
}
