//! Hierarchical names.
//!
//! A [`Name`] is an ordered list of [`Component`]s written in URI form as
//! `/a/b/c`. Parsing accepts an optional `ndn:` scheme and ignores empty
//! segments, so `/ndn//guest/` and `ndn:/ndn/guest` are the same name.

use crate::error::{NdnKeyError, Result};
use crate::name::component::Component;
use crate::tlv::{types, TlvReader, TlvWriter};
use std::fmt;
use std::str::FromStr;

/// An NDN name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Name {
    components: Vec<Component>,
}

impl Name {
    /// The empty name `/`.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_components<I, C>(components: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Component>,
    {
        Self {
            components: components.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a name from its URI form.
    ///
    /// # Example
    ///
    /// ```
    /// use ndnkey::name::path::Name;
    ///
    /// let name = Name::parse("/ndn/guest/alice").unwrap();
    /// assert_eq!(name.len(), 3);
    /// assert_eq!(name.to_string(), "/ndn/guest/alice");
    /// ```
    pub fn parse(uri: &str) -> Result<Self> {
        let trimmed = uri.trim();
        let path = trimmed.strip_prefix("ndn:").unwrap_or(trimmed);

        if path.contains(['?', '#']) {
            return Err(NdnKeyError::InvalidIdentityError(format!(
                "Name '{}' must not contain a query or fragment",
                uri
            )));
        }

        let components = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(Component::from_escaped)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { components })
    }

    /// Return this name with `component` appended.
    pub fn append(mut self, component: impl Into<Component>) -> Self {
        self.components.push(component.into());
        self
    }

    /// Append `component` in place.
    pub fn push(&mut self, component: impl Into<Component>) {
        self.components.push(component.into());
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Get the components in order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Get the component at `index`.
    pub fn get(&self, index: usize) -> Option<&Component> {
        self.components.get(index)
    }

    /// The first `len` components (the whole name if `len` is larger).
    pub fn prefix(&self, len: usize) -> Name {
        Self {
            components: self.components.iter().take(len).cloned().collect(),
        }
    }

    pub fn is_prefix_of(&self, other: &Name) -> bool {
        other.components.starts_with(&self.components)
    }

    /// Append this name as a Name element.
    pub fn encode_into(&self, writer: &mut TlvWriter) {
        writer.write_nested(types::NAME, |inner| {
            for component in &self.components {
                component.encode_into(inner);
            }
        });
    }

    /// Decode the value of a Name element.
    pub fn decode_value(value: &[u8]) -> Result<Self> {
        let mut reader = TlvReader::new(value);
        let mut components = Vec::new();
        while !reader.is_empty() {
            let element = reader.read()?;
            if element.typ != types::GENERIC_NAME_COMPONENT {
                return Err(NdnKeyError::DecodeError(format!(
                    "Unsupported name component type {}",
                    element.typ
                )));
            }
            components.push(Component::from(element.value));
        }
        Ok(Self { components })
    }
}

impl FromStr for Name {
    type Err = NdnKeyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return f.write_str("/");
        }
        for component in &self.components {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}
