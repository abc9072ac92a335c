//! Key and certificate export.
//!
//! An identity is exported as two artifacts next to each other:
//!
//! - `<base>.pri`: the private key
//! - `<base>.ndncert`: the base64 certificate record
//!
//! The private key is always written first. Each file is opened, written,
//! flushed and synced inside its own scope, so the handle is released on
//! every exit path. Files left behind by a failed export are not removed.

use crate::cert::body::DEFAULT_VALIDITY_DAYS;
use crate::cert::record::CertificateRecord;
use crate::error::{NdnKeyError, Result};
use crate::identity::Identity;
use crate::storage::encoding::{encode_private_key, PrivateKeyEncoding};
use serde::Serialize;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zeroize::Zeroizing;

/// File extension of the private key artifact.
pub const PRIVATE_KEY_EXTENSION: &str = "pri";

/// File extension of the certificate artifact.
pub const CERTIFICATE_EXTENSION: &str = "ndncert";

/// Export settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Private key encoding; `None` picks the default for the key's kind.
    pub encoding: Option<PrivateKeyEncoding>,
    pub validity_days: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            encoding: None,
            validity_days: DEFAULT_VALIDITY_DAYS,
        }
    }
}

/// Paths of the two artifacts for one output base name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportPaths {
    pub private_key: PathBuf,
    pub certificate: PathBuf,
}

impl ExportPaths {
    /// Append the artifact extensions to `base` (`alice` ⇒ `alice.pri`, `alice.ndncert`).
    pub fn from_base(base: &Path) -> Self {
        Self {
            private_key: with_suffix(base, PRIVATE_KEY_EXTENSION),
            certificate: with_suffix(base, CERTIFICATE_EXTENSION),
        }
    }
}

fn with_suffix(base: &Path, extension: &str) -> PathBuf {
    let mut path = OsString::from(base.as_os_str());
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}

/// Writes an identity's private key and certificate record.
#[derive(Debug, Clone, Default)]
pub struct KeyExporter {
    options: ExportOptions,
}

impl KeyExporter {
    /// Create an exporter with the given options.
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    /// Get the export options.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    fn encoding_for(&self, identity: &Identity) -> PrivateKeyEncoding {
        self.options
            .encoding
            .unwrap_or_else(|| PrivateKeyEncoding::default_for(identity.algorithm()))
    }

    fn check_pairing(identity: &Identity) -> Result<()> {
        if identity.material().kind() != identity.algorithm() {
            return Err(NdnKeyError::EncodingError(format!(
                "Key material is {} but identity declares {}",
                identity.material().kind(),
                identity.algorithm()
            )));
        }
        Ok(())
    }

    /// Serialized private key bytes.
    pub fn private_key_bytes(&self, identity: &Identity) -> Result<Zeroizing<Vec<u8>>> {
        Self::check_pairing(identity)?;
        encode_private_key(identity.material(), self.encoding_for(identity))
    }

    /// Serialized certificate record text.
    pub fn certificate_text(&self, identity: &Identity) -> Result<String> {
        Self::check_pairing(identity)?;
        CertificateRecord::issue(identity, self.options.validity_days)?.to_base64()
    }

    /// Write the private key to `sink`.
    pub fn export_private_key<W: Write>(&self, identity: &Identity, sink: &mut W) -> Result<()> {
        let encoded = self.private_key_bytes(identity)?;
        write_all(sink, &encoded, "private key sink")
    }

    /// Write the certificate record to `sink`.
    pub fn export_certificate<W: Write>(&self, identity: &Identity, sink: &mut W) -> Result<()> {
        let text = self.certificate_text(identity)?;
        write_all(sink, text.as_bytes(), "certificate sink")
    }

    /// Write the private key to `path`.
    ///
    /// The key is encoded before the file is created, so an encoding failure
    /// leaves no file behind.
    pub fn export_private_key_file(&self, identity: &Identity, path: &Path) -> Result<()> {
        let encoded = self.private_key_bytes(identity)?;
        write_file(path, &encoded)?;
        debug!(path = %path.display(), bytes = encoded.len(), "Wrote private key");
        Ok(())
    }

    /// Write the certificate record to `path`.
    pub fn export_certificate_file(&self, identity: &Identity, path: &Path) -> Result<()> {
        let text = self.certificate_text(identity)?;
        write_file(path, text.as_bytes())?;
        debug!(path = %path.display(), bytes = text.len(), "Wrote certificate");
        Ok(())
    }

    /// Write both artifacts for `base`, private key first.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use ndnkey::crypto::algorithm::AlgorithmKind;
    /// use ndnkey::identity::Identity;
    /// use ndnkey::name::path::Name;
    /// use ndnkey::storage::exporter::KeyExporter;
    /// use std::path::Path;
    ///
    /// # fn example() -> ndnkey::error::Result<()> {
    /// let identity = Identity::generate(&Name::parse("/ndn/guest/alice")?, AlgorithmKind::Rsa)?;
    /// let paths = KeyExporter::default().export_to_files(&identity, Path::new("alice"))?;
    /// assert!(paths.certificate.ends_with("alice.ndncert"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn export_to_files(&self, identity: &Identity, base: &Path) -> Result<ExportPaths> {
        let paths = ExportPaths::from_base(base);
        self.export_private_key_file(identity, &paths.private_key)?;
        self.export_certificate_file(identity, &paths.certificate)?;
        info!(
            certificate = %identity.certificate_name(),
            private_key = %paths.private_key.display(),
            "Exported identity"
        );
        Ok(paths)
    }
}

fn write_all<W: Write>(sink: &mut W, bytes: &[u8], target: &str) -> Result<()> {
    let to_error = |source| NdnKeyError::WriteError {
        target: target.to_string(),
        source,
    };
    sink.write_all(bytes).map_err(to_error)?;
    sink.flush().map_err(to_error)
}

/// Create `path`, write `bytes`, flush and sync. The handle is dropped on return.
fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let target = path.display().to_string();
    let file = File::create(path).map_err(|source| NdnKeyError::SinkUnavailableError {
        target: target.clone(),
        source,
    })?;

    let mut writer = BufWriter::new(file);
    write_all(&mut writer, bytes, &target)?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|source| NdnKeyError::WriteError { target, source })
}
