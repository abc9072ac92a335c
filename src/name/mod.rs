//! Hierarchical NDN names.
//!
//! This module provides name components with URI escaping, names with TLV
//! encoding, and the derivation of key and certificate names from an
//! identity path.

pub mod builder;
pub mod component;
pub mod path;

pub use builder::{KeyNames, NameBuilder};
pub use component::Component;
pub use path::Name;
