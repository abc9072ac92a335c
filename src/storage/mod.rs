//! Key export.
//!
//! Private key encodings and the file exporter for `.pri` / `.ndncert` pairs.

pub mod encoding;
pub mod exporter;

pub use exporter::{ExportOptions, ExportPaths, KeyExporter};
