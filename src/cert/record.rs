//! Signed certificate records.
//!
//! A record is a Data packet named with the certificate name. Its content is
//! the DER [`CertificateBody`]; its signature covers the Name, MetaInfo,
//! Content and SignatureInfo elements and is produced by the identity's own
//! key. HMAC identities get a record without a public key, signed with the
//! secret itself: it proves possession to holders of the same secret and is
//! not publicly verifiable.

use crate::cert::body::CertificateBody;
use crate::crypto::algorithm::AlgorithmKind;
use crate::crypto::signing::sign;
use crate::error::{NdnKeyError, Result};
use crate::identity::Identity;
use crate::name::path::Name;
use crate::tlv::codec::decode_non_negative_integer;
use crate::tlv::{types, TlvReader, TlvWriter};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;

/// FreshnessPeriod of issued records: one hour.
pub const KEY_FRESHNESS_PERIOD_MS: u64 = 3_600_000;

const BASE64_LINE_WIDTH: usize = 64;

/// SignatureType values of the records this crate writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignatureType {
    Sha256WithRsa,
    Sha256WithEcdsa,
    HmacWithSha256,
}

impl SignatureType {
    pub fn for_algorithm(kind: AlgorithmKind) -> Self {
        match kind {
            AlgorithmKind::Rsa => SignatureType::Sha256WithRsa,
            AlgorithmKind::Ecdsa => SignatureType::Sha256WithEcdsa,
            AlgorithmKind::Hmac => SignatureType::HmacWithSha256,
        }
    }

    pub fn code(&self) -> u64 {
        match self {
            SignatureType::Sha256WithRsa => 1,
            SignatureType::Sha256WithEcdsa => 3,
            SignatureType::HmacWithSha256 => 4,
        }
    }

    pub fn from_code(code: u64) -> Result<Self> {
        match code {
            1 => Ok(SignatureType::Sha256WithRsa),
            3 => Ok(SignatureType::Sha256WithEcdsa),
            4 => Ok(SignatureType::HmacWithSha256),
            other => Err(NdnKeyError::DecodeError(format!(
                "Unsupported signature type {}",
                other
            ))),
        }
    }
}

/// A certificate record, decoded or ready to encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRecord {
    pub name: Name,
    pub content_type: u64,
    pub freshness_period_ms: Option<u64>,
    pub body: CertificateBody,
    pub signature_type: SignatureType,
    pub key_locator: Option<Name>,
    pub signature: Vec<u8>,
}

impl CertificateRecord {
    /// Build and self-sign the certificate record for `identity`.
    ///
    /// # Example
    ///
    /// ```
    /// use ndnkey::cert::record::CertificateRecord;
    /// use ndnkey::crypto::algorithm::AlgorithmKind;
    /// use ndnkey::identity::Identity;
    /// use ndnkey::name::path::Name;
    ///
    /// # fn example() -> ndnkey::error::Result<()> {
    /// let identity = Identity::generate(&Name::parse("/ndn/guest/alice")?, AlgorithmKind::Ecdsa)?;
    /// let record = CertificateRecord::issue(&identity, 365)?;
    /// assert_eq!(&record.name, identity.certificate_name());
    /// assert!(record.body.subject_public_key_info.is_some());
    /// # Ok(())
    /// # }
    /// ```
    pub fn issue(identity: &Identity, validity_days: u32) -> Result<Self> {
        let public_key = identity.material().public_key_der()?;
        let body = CertificateBody::new(
            &identity.identity_name(),
            public_key.as_deref(),
            identity.issued_at_ms(),
            validity_days,
        )?;

        let mut record = Self {
            name: identity.certificate_name().clone(),
            content_type: types::CONTENT_TYPE_KEY,
            freshness_period_ms: Some(KEY_FRESHNESS_PERIOD_MS),
            body,
            signature_type: SignatureType::for_algorithm(identity.algorithm()),
            key_locator: Some(identity.key_name().clone()),
            signature: Vec::new(),
        };
        record.signature = sign(identity.material(), &record.signed_portion()?)?;

        Ok(record)
    }

    /// The bytes covered by the signature.
    pub fn signed_portion(&self) -> Result<Vec<u8>> {
        let body = self.body.to_der_bytes()?;

        let mut writer = TlvWriter::new();
        self.name.encode_into(&mut writer);
        writer.write_nested(types::META_INFO, |meta| {
            meta.write_uint(types::CONTENT_TYPE, self.content_type);
            if let Some(freshness) = self.freshness_period_ms {
                meta.write_uint(types::FRESHNESS_PERIOD, freshness);
            }
        });
        writer.write(types::CONTENT, &body);
        writer.write_nested(types::SIGNATURE_INFO, |info| {
            info.write_uint(types::SIGNATURE_TYPE, self.signature_type.code());
            if let Some(key_name) = &self.key_locator {
                info.write_nested(types::KEY_LOCATOR, |locator| key_name.encode_into(locator));
            }
        });

        Ok(writer.into_bytes())
    }

    /// Wire encoding of the whole Data packet.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let signed = self.signed_portion()?;

        let mut writer = TlvWriter::new();
        writer.write_nested(types::DATA, |data| {
            data.write_raw(&signed);
            data.write(types::SIGNATURE_VALUE, &self.signature);
        });

        Ok(writer.into_bytes())
    }

    /// Base64 text of the wire encoding, wrapped at 64 columns.
    pub fn to_base64(&self) -> Result<String> {
        let encoded = STANDARD.encode(self.encode()?);

        let mut text = String::with_capacity(encoded.len() + encoded.len() / BASE64_LINE_WIDTH + 1);
        let mut rest = encoded.as_str();
        while !rest.is_empty() {
            let (line, tail) = rest.split_at(rest.len().min(BASE64_LINE_WIDTH));
            text.push_str(line);
            text.push('\n');
            rest = tail;
        }

        Ok(text)
    }

    /// Parse the wire encoding of a record.
    pub fn decode(wire: &[u8]) -> Result<Self> {
        let mut outer = TlvReader::new(wire);
        let data = outer.expect(types::DATA)?;
        if !outer.is_empty() {
            return Err(NdnKeyError::DecodeError(
                "Trailing bytes after certificate record".to_string(),
            ));
        }

        let mut reader = TlvReader::new(data.value);
        let name = Name::decode_value(reader.expect(types::NAME)?.value)?;

        let mut content_type = 0;
        let mut freshness_period_ms = None;
        if let Some(meta) = reader.optional(types::META_INFO)? {
            let mut meta = TlvReader::new(meta.value);
            if let Some(element) = meta.optional(types::CONTENT_TYPE)? {
                content_type = decode_non_negative_integer(element.value)?;
            }
            if let Some(element) = meta.optional(types::FRESHNESS_PERIOD)? {
                freshness_period_ms = Some(decode_non_negative_integer(element.value)?);
            }
        }

        let body = CertificateBody::from_der_bytes(reader.expect(types::CONTENT)?.value)?;

        let info = reader.expect(types::SIGNATURE_INFO)?;
        let mut info = TlvReader::new(info.value);
        let signature_type = SignatureType::from_code(decode_non_negative_integer(
            info.expect(types::SIGNATURE_TYPE)?.value,
        )?)?;
        let key_locator = match info.optional(types::KEY_LOCATOR)? {
            Some(locator) => {
                let mut locator = TlvReader::new(locator.value);
                Some(Name::decode_value(locator.expect(types::NAME)?.value)?)
            }
            None => None,
        };

        let signature = reader.expect(types::SIGNATURE_VALUE)?.value.to_vec();

        Ok(Self {
            name,
            content_type,
            freshness_period_ms,
            body,
            signature_type,
            key_locator,
            signature,
        })
    }

    /// Parse the base64 text form, ignoring line breaks.
    pub fn from_base64(text: &str) -> Result<Self> {
        let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let wire = STANDARD
            .decode(compact)
            .map_err(|e| NdnKeyError::DecodeError(format!("Invalid base64: {}", e)))?;
        Self::decode(&wire)
    }
}
