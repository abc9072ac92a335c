//! Name components and their URI escaping.

use crate::error::{NdnKeyError, Result};
use crate::tlv::{types, TlvWriter};
use std::fmt;

/// One opaque segment of a hierarchical name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Component(Vec<u8>);

impl Component {
    /// Create a component from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Get the raw component bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse one URI-escaped component.
    ///
    /// `%XX` sequences are decoded. A component made only of periods loses
    /// three of them (`...` is the empty component); `.` and `..` are rejected.
    ///
    /// # Example
    ///
    /// ```
    /// use ndnkey::name::component::Component;
    ///
    /// let component = Component::from_escaped("%00%00").unwrap();
    /// assert_eq!(component.as_bytes(), &[0, 0]);
    /// assert_eq!(component.to_string(), "%00%00");
    /// ```
    pub fn from_escaped(escaped: &str) -> Result<Self> {
        let decoded = percent_decode(escaped)?;

        if !decoded.is_empty() && decoded.iter().all(|b| *b == b'.') {
            if decoded.len() < 3 {
                return Err(NdnKeyError::InvalidIdentityError(format!(
                    "Component '{}' is not allowed in a name",
                    escaped
                )));
            }
            return Ok(Self(decoded[3..].to_vec()));
        }

        Ok(Self(decoded))
    }

    /// Append this component as a GenericNameComponent element.
    pub fn encode_into(&self, writer: &mut TlvWriter) {
        writer.write(types::GENERIC_NAME_COMPONENT, &self.0);
    }
}

impl From<&str> for Component {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<&[u8]> for Component {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(|b| *b == b'.') {
            f.write_str("...")?;
        }
        for &byte in &self.0 {
            if is_unreserved(byte) {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "%{:02X}", byte)?;
            }
        }
        Ok(())
    }
}

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}

fn percent_decode(escaped: &str) -> Result<Vec<u8>> {
    let bytes = escaped.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex_digits = bytes.get(i + 1..i + 3).ok_or_else(|| {
                NdnKeyError::InvalidIdentityError(format!(
                    "Truncated escape sequence in '{}'",
                    escaped
                ))
            })?;
            let decoded = hex::decode(hex_digits).map_err(|e| {
                NdnKeyError::InvalidIdentityError(format!(
                    "Invalid escape sequence in '{}': {}",
                    escaped, e
                ))
            })?;
            out.extend_from_slice(&decoded);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    Ok(out)
}
