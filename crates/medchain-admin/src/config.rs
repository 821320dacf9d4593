//! Admin configuration
//!
//! Loaded from a TOML file (a missing file means defaults), then overridden
//! by `MEDCHAIN_*` environment variables, then validated.
//!
//! ```toml
//! log_level = "info"
//! default_status = "Requested"
//! verify_digests = false
//!
//! [signer]
//! key_file = "admin.key"
//! ```

use crate::errors::ServiceError;
use medchain_signature::Ed25519Signer;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "MEDCHAIN_";

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Key material of the local signer
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignerConfig {
    /// Hex encoded public key
    pub public_key: String,
    /// Hex encoded private key
    pub private_key: String,
    /// Key file written by `medchain-admin keygen`
    pub key_file: Option<PathBuf>,
}

impl std::fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerConfig")
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .field("key_file", &self.key_file)
            .finish()
    }
}

/// Key pair file contents
#[derive(Clone, Serialize, Deserialize)]
pub struct KeyFile {
    /// Hex encoded public key
    pub public_key: String,
    /// Hex encoded private key
    pub private_key: String,
}

impl KeyFile {
    /// Capture the key pair of a signer
    pub fn from_signer(signer: &Ed25519Signer) -> Self {
        Self {
            public_key: signer.public_key_hex(),
            private_key: signer.private_key_hex().to_string(),
        }
    }

    /// Read a key file
    pub fn load(path: &Path) -> Result<Self, ServiceError> {
        let text = Zeroizing::new(std::fs::read_to_string(path)?);
        toml::from_str(&text).map_err(|e| {
            ServiceError::Configuration(format!("Failed to parse key file {}: {e}", path.display()))
        })
    }

    /// Write the key file
    pub fn save(&self, path: &Path) -> Result<(), ServiceError> {
        let text = Zeroizing::new(toml::to_string_pretty(self).map_err(|e| {
            ServiceError::Configuration(format!("Failed to serialize key file: {e}"))
        })?);
        std::fs::write(path, text.as_bytes())?;
        Ok(())
    }

    /// Load the signer described by this file
    pub fn signer(&self) -> Result<Ed25519Signer, ServiceError> {
        Ok(Ed25519Signer::from_hex(&self.public_key, &self.private_key)?)
    }
}

impl Drop for KeyFile {
    fn drop(&mut self) {
        use zeroize::Zeroize;
        self.private_key.zeroize();
    }
}

/// Admin tool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Local signer
    pub signer: SignerConfig,
    /// Log filter used when `--verbose` is not given
    pub log_level: String,
    /// Status given to queries created without one
    pub default_status: String,
    /// Recompute digests from the transaction before signing
    pub verify_digests: bool,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            signer: SignerConfig::default(),
            log_level: "info".to_string(),
            default_status: "Requested".to_string(),
            verify_digests: false,
        }
    }
}

impl AdminConfig {
    /// Load from file, apply environment overrides and validate
    pub fn load(path: &Path) -> Result<Self, ServiceError> {
        let mut config = Self::from_file(path)?;
        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config file; a missing file gives the defaults
    pub fn from_file(path: &Path) -> Result<Self, ServiceError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| {
            ServiceError::Configuration(format!(
                "Failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }

    /// Apply `MEDCHAIN_*` overrides read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| lookup(&format!("{ENV_PREFIX}{suffix}"));

        if let Some(level) = var("LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(status) = var("DEFAULT_STATUS") {
            self.default_status = status;
        }
        if let Some(flag) = var("VERIFY_DIGESTS") {
            self.verify_digests = flag.parse().map_err(|_| {
                ServiceError::Configuration(format!(
                    "{ENV_PREFIX}VERIFY_DIGESTS must be true or false, got {flag}"
                ))
            })?;
        }
        if let Some(key) = var("PUBLIC_KEY") {
            self.signer.public_key = key;
        }
        if let Some(key) = var("PRIVATE_KEY") {
            self.signer.private_key = key;
        }
        if let Some(path) = var("KEY_FILE") {
            self.signer.key_file = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<(), ServiceError> {
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(ServiceError::Configuration(format!(
                "log_level must be one of {}, got {}",
                LOG_LEVELS.join(", "),
                self.log_level
            )));
        }
        if self.default_status.is_empty() {
            return Err(ServiceError::Configuration(
                "default_status cannot be empty".to_string(),
            ));
        }
        if self.signer.key_file.is_some() && !self.signer.private_key.is_empty() {
            return Err(ServiceError::Configuration(
                "signer.key_file and signer.private_key are mutually exclusive".to_string(),
            ));
        }
        for (name, value) in [
            ("public_key", &self.signer.public_key),
            ("private_key", &self.signer.private_key),
        ] {
            if hex::decode(value).is_err() {
                return Err(ServiceError::Configuration(format!(
                    "signer.{name} is not valid hex"
                )));
            }
        }
        Ok(())
    }

    /// Local signer, if one is configured
    pub fn signer(&self) -> Result<Option<Ed25519Signer>, ServiceError> {
        if let Some(path) = &self.signer.key_file {
            return KeyFile::load(path)?.signer().map(Some);
        }
        if self.signer.private_key.is_empty() {
            return Ok(None);
        }
        Ok(Some(Ed25519Signer::from_hex(
            &self.signer.public_key,
            &self.signer.private_key,
        )?))
    }
}
