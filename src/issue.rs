//! One issuance run: generate a key, name it, export it.
//!
//! ```text
//! Idle → Generating → Naming → ExportingKey → ExportingCertificate → Done
//!            └──────────┴───────────┴──────────────────┴──→ Failed { at }
//! ```
//!
//! Each stage runs once. A failing stage is recorded on the run and its
//! error is returned unchanged; nothing is retried and files written by
//! earlier stages are left in place.

use crate::cert::body::{create_validity, DEFAULT_VALIDITY_DAYS};
use crate::crypto::algorithm::AlgorithmKind;
use crate::crypto::material::generate_key_material;
use crate::error::{NdnKeyError, Result};
use crate::identity::Identity;
use crate::name::builder::{current_timestamp_ms, NameBuilder};
use crate::name::path::Name;
use crate::storage::encoding::PrivateKeyEncoding;
use crate::storage::exporter::{ExportOptions, ExportPaths, KeyExporter};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Identity used when none is given.
pub const DEFAULT_IDENTITY: &str = "/ndn/guest/alice";

/// Output base name used when none is given.
pub const DEFAULT_OUTPUT_BASE: &str = "default";

/// Validated inputs of one run.
///
/// Construction checks the identity and algorithm, so a run never starts
/// with either one invalid.
#[derive(Debug, Clone)]
pub struct IssueConfig {
    identity: Name,
    algorithm: AlgorithmKind,
    output_base: PathBuf,
    encoding: Option<PrivateKeyEncoding>,
    validity_days: u32,
}

impl IssueConfig {
    /// Validate `identity` and build a config with default export options.
    pub fn new(
        identity: &str,
        algorithm: AlgorithmKind,
        output_base: impl Into<PathBuf>,
    ) -> Result<Self> {
        let identity = Name::parse(identity)?;
        NameBuilder::new(identity.clone())?;

        Ok(Self {
            identity,
            algorithm,
            output_base: output_base.into(),
            encoding: None,
            validity_days: DEFAULT_VALIDITY_DAYS,
        })
    }

    /// Like [`IssueConfig::new`], with the algorithm given by name.
    pub fn parse(identity: &str, algorithm: &str, output_base: impl Into<PathBuf>) -> Result<Self> {
        let algorithm = algorithm.parse::<AlgorithmKind>()?;
        Self::new(identity, algorithm, output_base)
    }

    /// Request a private key encoding instead of the per-algorithm default.
    ///
    /// The pairing is checked here so a bad combination fails before any key
    /// is generated.
    pub fn with_encoding(mut self, encoding: PrivateKeyEncoding) -> Result<Self> {
        if !encoding.supports(self.algorithm) {
            return Err(NdnKeyError::ConfigError(format!(
                "{} keys cannot be exported as {}",
                self.algorithm, encoding
            )));
        }
        self.encoding = Some(encoding);
        Ok(self)
    }

    /// Set the certificate validity.
    ///
    /// The window is built from the current time so a span the certificate
    /// cannot encode fails here rather than after the key is written.
    pub fn with_validity_days(mut self, days: u32) -> Result<Self> {
        if days == 0 {
            return Err(NdnKeyError::ConfigError(
                "Validity must be at least one day".to_string(),
            ));
        }
        create_validity(current_timestamp_ms()?, days).map_err(|e| {
            NdnKeyError::ConfigError(format!("Validity of {} days is out of range: {}", days, e))
        })?;
        self.validity_days = days;
        Ok(self)
    }

    /// Get the identity path.
    pub fn identity(&self) -> &Name {
        &self.identity
    }

    /// Get the key algorithm.
    pub fn algorithm(&self) -> AlgorithmKind {
        self.algorithm
    }

    /// Base path the `.pri` and `.ndncert` extensions are appended to.
    pub fn output_base(&self) -> &Path {
        &self.output_base
    }

    /// Export options for the key exporter.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            encoding: self.encoding,
            validity_days: self.validity_days,
        }
    }
}

impl Default for IssueConfig {
    fn default() -> Self {
        Self {
            identity: Name::from_components(["ndn", "guest", "alice"]),
            algorithm: AlgorithmKind::Rsa,
            output_base: PathBuf::from(DEFAULT_OUTPUT_BASE),
            encoding: None,
            validity_days: DEFAULT_VALIDITY_DAYS,
        }
    }
}

/// A stage of the run that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Generating,
    Naming,
    ExportingKey,
    ExportingCertificate,
}

impl Stage {
    /// Snake-case stage name, as used in logs and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Generating => "generating",
            Stage::Naming => "naming",
            Stage::ExportingKey => "exporting_key",
            Stage::ExportingCertificate => "exporting_certificate",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running(Stage),
    Done,
    Failed { at: Stage },
}

/// Summary of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct IssueReport {
    pub certificate_name: String,
    pub key_name: String,
    pub algorithm: AlgorithmKind,
    pub paths: ExportPaths,
    pub issued_at_ms: u64,
    /// Hex prefix of the SHA-256 of the public key; absent for HMAC.
    pub key_id: Option<String>,
}

#[derive(Debug)]
pub struct IssueRun {
    config: IssueConfig,
    state: RunState,
}

impl IssueRun {
    /// Create an idle run for `config`.
    pub fn new(config: IssueConfig) -> Self {
        Self {
            config,
            state: RunState::Idle,
        }
    }

    /// The current stage, or the stage that failed.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Get the run's configuration.
    pub fn config(&self) -> &IssueConfig {
        &self.config
    }

    /// Run every stage with the OS random source and the wall clock.
    pub fn execute(&mut self) -> Result<IssueReport> {
        self.execute_with(&mut OsRng, current_timestamp_ms)
    }

    /// Run every stage with the given random source and clock.
    ///
    /// The clock is read once, after key generation, as part of naming.
    pub fn execute_with<R, C>(&mut self, rng: &mut R, clock: C) -> Result<IssueReport>
    where
        R: RngCore + CryptoRng,
        C: FnOnce() -> Result<u64>,
    {
        if self.state != RunState::Idle {
            return Err(NdnKeyError::ConfigError(
                "An issue run can only be executed once".to_string(),
            ));
        }

        let config = self.config.clone();

        let material = self.step(Stage::Generating, || {
            generate_key_material(config.algorithm, rng)
        })?;

        let identity = self.step(Stage::Naming, || {
            let issued_at_ms = clock()?;
            let names = NameBuilder::new(config.identity.clone())?.derive(issued_at_ms);
            Identity::new(names, material, config.algorithm, issued_at_ms)
        })?;

        let exporter = KeyExporter::new(config.export_options());
        let paths = ExportPaths::from_base(&config.output_base);

        self.step(Stage::ExportingKey, || {
            exporter.export_private_key_file(&identity, &paths.private_key)
        })?;
        let key_id = self.step(Stage::ExportingCertificate, || {
            exporter.export_certificate_file(&identity, &paths.certificate)?;
            identity.material().fingerprint()
        })?;

        self.state = RunState::Done;
        info!(
            certificate = %identity.certificate_name(),
            algorithm = %identity.algorithm(),
            key_id = key_id.as_deref().unwrap_or("-"),
            "Issued identity"
        );

        Ok(IssueReport {
            certificate_name: identity.certificate_name().to_string(),
            key_name: identity.key_name().to_string(),
            algorithm: identity.algorithm(),
            paths,
            issued_at_ms: identity.issued_at_ms(),
            key_id,
        })
    }

    fn step<T>(&mut self, stage: Stage, action: impl FnOnce() -> Result<T>) -> Result<T> {
        self.state = RunState::Running(stage);
        debug!(stage = %stage, "Entering stage");

        action().map_err(|e| {
            error!(stage = %stage, error = %e, "Issuance failed");
            self.state = RunState::Failed { at: stage };
            e
        })
    }
}

/// Run one issuance to completion.
///
/// # Example
///
/// ```rust,no_run
/// use ndnkey::crypto::algorithm::AlgorithmKind;
/// use ndnkey::issue::{issue, IssueConfig};
///
/// # fn example() -> ndnkey::error::Result<()> {
/// let config = IssueConfig::new("/ndn/guest/bob", AlgorithmKind::Hmac, "bob")?;
/// let report = issue(config)?;
/// println!("{} exported", report.certificate_name);
/// # Ok(())
/// # }
/// ```
pub fn issue(config: IssueConfig) -> Result<IssueReport> {
    IssueRun::new(config).execute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::material::test_rng::{CountingRng, ExhaustedRng};
    use crate::crypto::material::HMAC_KEY_LENGTH;
    use std::fs;
    use tempfile::TempDir;

    const NOW_MS: u64 = 1_700_000_000_000;

    #[test]
    fn test_empty_identity_is_rejected() {
        for identity in ["", "/", "ndn:/"] {
            match IssueConfig::new(identity, AlgorithmKind::Hmac, "out") {
                Err(NdnKeyError::InvalidIdentityError(_)) => {}
                _ => panic!("Expected InvalidIdentityError for {:?}", identity),
            }
        }
    }

    #[test]
    fn test_unsupported_algorithm_is_rejected() {
        match IssueConfig::parse("/ndn/guest/carol", "dsa", "out") {
            Err(NdnKeyError::UnsupportedAlgorithmError(msg)) => assert!(msg.contains("dsa")),
            _ => panic!("Expected UnsupportedAlgorithmError"),
        }
    }

    #[test]
    fn test_encoding_pairing_checked_in_config() {
        let config = IssueConfig::new("/ndn/guest/bob", AlgorithmKind::Hmac, "bob").unwrap();
        assert!(matches!(
            config.with_encoding(PrivateKeyEncoding::Pem),
            Err(NdnKeyError::ConfigError(_))
        ));
    }

    #[test]
    fn test_unencodable_validity_rejected_in_config() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("bob");
        let config = IssueConfig::new("/ndn/guest/bob", AlgorithmKind::Hmac, &base).unwrap();

        match config.with_validity_days(4_000_000) {
            Err(NdnKeyError::ConfigError(msg)) => assert!(msg.contains("4000000 days")),
            _ => panic!("Expected ConfigError"),
        }
        assert!(!ExportPaths::from_base(&base).private_key.exists());
    }

    #[test]
    fn test_large_encodable_validity_is_accepted() {
        let config = IssueConfig::new("/ndn/guest/bob", AlgorithmKind::Hmac, "bob")
            .unwrap()
            .with_validity_days(100 * 365)
            .unwrap();
        assert_eq!(config.export_options().validity_days, 100 * 365);
    }

    #[test]
    fn test_default_config() {
        let config = IssueConfig::default();
        assert_eq!(config.identity().to_string(), DEFAULT_IDENTITY);
        assert_eq!(config.algorithm(), AlgorithmKind::Rsa);
        assert_eq!(config.output_base(), Path::new(DEFAULT_OUTPUT_BASE));
        assert_eq!(config.export_options().validity_days, DEFAULT_VALIDITY_DAYS);
    }

    #[test]
    fn test_run_reaches_done() {
        let temp_dir = TempDir::new().unwrap();
        let config =
            IssueConfig::new("/ndn/guest/bob", AlgorithmKind::Hmac, temp_dir.path().join("bob"))
                .unwrap();
        let mut run = IssueRun::new(config);
        let mut rng = CountingRng::default();

        let report = run.execute_with(&mut rng, || Ok(NOW_MS)).unwrap();

        assert_eq!(run.state(), RunState::Done);
        assert_eq!(rng.drawn, HMAC_KEY_LENGTH);
        assert_eq!(report.issued_at_ms, NOW_MS);
        assert_eq!(report.key_name, "/ndn/guest/bob/KEY/ksk-1700000000000");
        assert_eq!(
            report.certificate_name,
            "/ndn/guest/bob/KEY/ksk-1700000000000/ID-CERT/%00%00"
        );
        assert!(report.key_id.is_none());
        assert_eq!(fs::read(&report.paths.private_key).unwrap().len(), HMAC_KEY_LENGTH);
        assert!(report.paths.certificate.exists());
    }

    #[test]
    fn test_generation_failure_is_recorded() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("bob");
        let config = IssueConfig::new("/ndn/guest/bob", AlgorithmKind::Hmac, &base).unwrap();
        let mut run = IssueRun::new(config);

        let result = run.execute_with(&mut ExhaustedRng, || Ok(NOW_MS));

        assert!(matches!(result, Err(NdnKeyError::GenerationError(_))));
        assert_eq!(run.state(), RunState::Failed { at: Stage::Generating });
        assert!(!ExportPaths::from_base(&base).private_key.exists());
    }

    #[test]
    fn test_clock_failure_is_recorded_at_naming() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("bob");
        let config = IssueConfig::new("/ndn/guest/bob", AlgorithmKind::Hmac, &base).unwrap();
        let mut run = IssueRun::new(config);

        let result = run.execute_with(&mut CountingRng::default(), || {
            Err(NdnKeyError::GenerationError("clock before epoch".to_string()))
        });

        assert!(matches!(result, Err(NdnKeyError::GenerationError(_))));
        assert_eq!(run.state(), RunState::Failed { at: Stage::Naming });
        assert!(!ExportPaths::from_base(&base).private_key.exists());
    }

    #[test]
    fn test_unwritable_destination_fails_at_key_export() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("missing").join("bob");
        let config = IssueConfig::new("/ndn/guest/bob", AlgorithmKind::Hmac, &base).unwrap();
        let mut run = IssueRun::new(config);
        let mut rng = CountingRng::default();

        let result = run.execute_with(&mut rng, || Ok(NOW_MS));

        assert!(matches!(result, Err(NdnKeyError::SinkUnavailableError { .. })));
        assert_eq!(run.state(), RunState::Failed { at: Stage::ExportingKey });
        assert_eq!(rng.drawn, HMAC_KEY_LENGTH);
        assert!(!ExportPaths::from_base(&base).certificate.exists());
    }

    #[test]
    fn test_run_executes_once() {
        let temp_dir = TempDir::new().unwrap();
        let config =
            IssueConfig::new("/ndn/guest/bob", AlgorithmKind::Hmac, temp_dir.path().join("bob"))
                .unwrap();
        let mut run = IssueRun::new(config);
        run.execute_with(&mut CountingRng::default(), || Ok(NOW_MS)).unwrap();

        let mut rng = CountingRng::default();
        assert!(matches!(
            run.execute_with(&mut rng, || Ok(NOW_MS)),
            Err(NdnKeyError::ConfigError(_))
        ));
        assert_eq!(rng.drawn, 0);
        assert_eq!(run.state(), RunState::Done);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let temp_dir = TempDir::new().unwrap();
        let config =
            IssueConfig::new("/ndn/guest/dave", AlgorithmKind::Ecdsa, temp_dir.path().join("dave"))
                .unwrap();
        let report = IssueRun::new(config)
            .execute_with(&mut CountingRng::default(), || Ok(NOW_MS))
            .unwrap();

        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["algorithm"], "ecdsa");
        assert_eq!(json["issued_at_ms"], NOW_MS);
        assert_eq!(json["key_id"].as_str().unwrap().len(), 16);
        assert!(json["paths"]["certificate"]
            .as_str()
            .unwrap()
            .ends_with("dave.ndncert"));
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::ExportingCertificate.to_string(), "exporting_certificate");
        assert_eq!(
            serde_json::to_value(RunState::Failed { at: Stage::Naming }).unwrap(),
            serde_json::json!({ "failed": { "at": "naming" } })
        );
    }
}
