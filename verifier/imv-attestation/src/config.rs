// Licensed under the Apache-2.0 license

use crate::hasher::PtsHasher;
use pts_common::error::PtsError;
use pts_common::protocol::{DhGroup, DhGroups, MeasAlgorithm, MeasAlgorithms, PTS_MAX_NONCE_LEN};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    UnknownName(#[from] PtsError),
    #[error("no local hasher for measurement algorithm {0}")]
    UnsupportedHashAlgorithm(MeasAlgorithm),
    #[error("DH group {0} is not provided by the DH capability")]
    UnsupportedDhGroup(DhGroup),
    #[error("no {0} configured")]
    Empty(&'static str),
    #[error("minimum nonce length {0} exceeds the protocol maximum")]
    MinNonceLen(usize),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings of the attestation verifier.
///
/// ```toml
/// min_nonce_len = 20
/// hash_algorithms = ["sha384", "sha256"]
/// dh_groups = ["ecp384"]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImvAttestationConfig {
    /// Minimum nonce length required from the peer, 0 for the protocol minimum.
    pub min_nonce_len: usize,
    pub hash_algorithms: Vec<String>,
    pub dh_groups: Vec<String>,
}

impl Default for ImvAttestationConfig {
    fn default() -> Self {
        Self {
            min_nonce_len: 0,
            hash_algorithms: vec!["sha384".to_string(), "sha256".to_string()],
            dh_groups: vec!["ecp384".to_string(), "ecp256".to_string()],
        }
    }
}

impl ImvAttestationConfig {
    pub fn from_toml_str(config: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(config)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let config = std::fs::read_to_string(path)?;
        Self::from_toml_str(&config)
    }

    /// Measurement algorithms the verifier accepts.
    pub fn supported_algorithms(&self) -> ConfigResult<MeasAlgorithms> {
        let mut algorithms = MeasAlgorithms::empty();
        for name in &self.hash_algorithms {
            let algorithm: MeasAlgorithm = name.parse()?;
            if !PtsHasher::is_supported(algorithm) {
                return Err(ConfigError::UnsupportedHashAlgorithm(algorithm));
            }
            algorithms |= algorithm.into();
        }
        if algorithms.is_empty() {
            return Err(ConfigError::Empty("hash algorithms"));
        }
        Ok(algorithms)
    }

    /// DH groups the verifier accepts.
    pub fn supported_dh_groups(&self) -> ConfigResult<DhGroups> {
        let mut groups = DhGroups::empty();
        for name in &self.dh_groups {
            let group: DhGroup = name.parse()?;
            groups |= group.into();
        }
        if groups.is_empty() {
            return Err(ConfigError::Empty("DH groups"));
        }
        Ok(groups)
    }

    pub fn min_nonce_len(&self) -> ConfigResult<usize> {
        if self.min_nonce_len > PTS_MAX_NONCE_LEN {
            return Err(ConfigError::MinNonceLen(self.min_nonce_len));
        }
        Ok(self.min_nonce_len)
    }
}
