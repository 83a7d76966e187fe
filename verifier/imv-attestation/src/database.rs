// Licensed under the Apache-2.0 license

use pts_common::error::PtsError;
use pts_common::protocol::MeasAlgorithm;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Expected measurement of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineHash {
    pub filename: String,
    pub hash: Vec<u8>,
}

/// Read access to the measurement baseline.
pub trait MeasurementDatabase: Send + Sync {
    /// Expected hashes for a file, or for every file in a directory when
    /// `is_dir` is set.
    fn file_hashes(
        &self,
        platform: &str,
        algorithm: MeasAlgorithm,
        file_id: u32,
        is_dir: bool,
    ) -> Vec<BaselineHash>;

    /// Every expected hash recorded for a platform.
    fn platform_hashes(&self, platform: &str, algorithm: MeasAlgorithm) -> Vec<BaselineHash>;
}

#[derive(Error, Debug)]
pub enum BaselineError {
    #[error("unable to read baseline: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed baseline: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Algorithm(#[from] PtsError),
    #[error("{algorithm} hash of {filename} has {actual} bytes, expected {expected}")]
    HashLength {
        filename: String,
        algorithm: MeasAlgorithm,
        expected: usize,
        actual: usize,
    },
}

pub type BaselineResult<T> = Result<T, BaselineError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineEntry {
    pub platform: String,
    pub algorithm: MeasAlgorithm,
    pub file_id: u32,
    /// Directory the file belongs to, if it was measured as part of one.
    pub directory_id: Option<u32>,
    pub filename: String,
    pub hash: Vec<u8>,
}

impl BaselineEntry {
    fn to_hash(&self) -> BaselineHash {
        BaselineHash {
            filename: self.filename.clone(),
            hash: self.hash.clone(),
        }
    }

    fn matches(&self, platform: &str, algorithm: MeasAlgorithm) -> bool {
        self.platform == platform && self.algorithm == algorithm
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BaselineRecord {
    platform: String,
    algorithm: String,
    file_id: u32,
    #[serde(default)]
    directory_id: Option<u32>,
    filename: String,
    #[serde(with = "hex::serde")]
    hash: Vec<u8>,
}

#[derive(Deserialize)]
struct BaselineManifest {
    #[serde(default, rename = "file")]
    files: Vec<BaselineRecord>,
}

/// In-memory measurement baseline.
///
/// ```toml
/// [[file]]
/// platform = "Ubuntu 24.04 x86_64"
/// algorithm = "sha256"
/// file_id = 3
/// directory_id = 2
/// filename = "ls"
/// hash = "c5b1..."
/// ```
#[derive(Debug, Default, Clone)]
pub struct BaselineDatabase {
    entries: Vec<BaselineEntry>,
}

impl BaselineDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entry: BaselineEntry) -> BaselineResult<()> {
        let expected = entry.algorithm.digest_len();
        if entry.hash.len() != expected {
            return Err(BaselineError::HashLength {
                filename: entry.filename,
                algorithm: entry.algorithm,
                expected,
                actual: entry.hash.len(),
            });
        }
        self.entries.push(entry);
        Ok(())
    }

    pub fn from_toml_str(manifest: &str) -> BaselineResult<Self> {
        let manifest: BaselineManifest = toml::from_str(manifest)?;
        let mut db = Self::new();
        for record in manifest.files {
            db.add(BaselineEntry {
                platform: record.platform,
                algorithm: record.algorithm.parse()?,
                file_id: record.file_id,
                directory_id: record.directory_id,
                filename: record.filename,
                hash: record.hash,
            })?;
        }
        Ok(db)
    }

    pub fn from_file(path: impl AsRef<Path>) -> BaselineResult<Self> {
        let manifest = std::fs::read_to_string(path)?;
        Self::from_toml_str(&manifest)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MeasurementDatabase for BaselineDatabase {
    fn file_hashes(
        &self,
        platform: &str,
        algorithm: MeasAlgorithm,
        file_id: u32,
        is_dir: bool,
    ) -> Vec<BaselineHash> {
        self.entries
            .iter()
            .filter(|entry| entry.matches(platform, algorithm))
            .filter(|entry| {
                if is_dir {
                    entry.directory_id == Some(file_id)
                } else {
                    entry.file_id == file_id
                }
            })
            .map(BaselineEntry::to_hash)
            .collect()
    }

    fn platform_hashes(&self, platform: &str, algorithm: MeasAlgorithm) -> Vec<BaselineHash> {
        self.entries
            .iter()
            .filter(|entry| entry.matches(platform, algorithm))
            .map(BaselineEntry::to_hash)
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const PLATFORM: &str = "Ubuntu 24.04 x86_64";

    fn manifest() -> String {
        format!(
            r#"
            [[file]]
            platform = "{PLATFORM}"
            algorithm = "sha256"
            file_id = 1
            filename = "/etc/tnc_config"
            hash = "{a}"

            [[file]]
            platform = "{PLATFORM}"
            algorithm = "sha256"
            file_id = 3
            directory_id = 2
            filename = "ls"
            hash = "{b}"

            [[file]]
            platform = "{PLATFORM}"
            algorithm = "sha256"
            file_id = 4
            directory_id = 2
            filename = "cat"
            hash = "{c}"

            [[file]]
            platform = "Debian 12 aarch64"
            algorithm = "sha256"
            file_id = 1
            filename = "/etc/tnc_config"
            hash = "{c}"
            "#,
            a = "aa".repeat(32),
            b = "bb".repeat(32),
            c = "cc".repeat(32),
        )
    }

    #[test]
    fn test_lookup() {
        let db = BaselineDatabase::from_toml_str(&manifest()).unwrap();
        assert_eq!(db.len(), 4);

        let hashes = db.file_hashes(PLATFORM, MeasAlgorithm::Sha256, 1, false);
        assert_eq!(
            hashes,
            vec![BaselineHash {
                filename: "/etc/tnc_config".to_string(),
                hash: vec![0xaa; 32],
            }]
        );

        let hashes = db.file_hashes(PLATFORM, MeasAlgorithm::Sha256, 2, true);
        let names: Vec<_> = hashes.iter().map(|h| h.filename.as_str()).collect();
        assert_eq!(names, ["ls", "cat"]);

        assert!(db.file_hashes(PLATFORM, MeasAlgorithm::Sha384, 1, false).is_empty());
        assert!(db.file_hashes(PLATFORM, MeasAlgorithm::Sha256, 2, false).is_empty());
        assert_eq!(db.platform_hashes(PLATFORM, MeasAlgorithm::Sha256).len(), 3);
        assert_eq!(db.platform_hashes("Debian 12 aarch64", MeasAlgorithm::Sha256).len(), 1);
    }

    #[test]
    fn test_rejects_bad_records() {
        let err = BaselineDatabase::from_toml_str(
            r#"
            [[file]]
            platform = "p"
            algorithm = "sha384"
            file_id = 1
            filename = "f"
            hash = "0011"
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            BaselineError::HashLength {
                expected: 48,
                actual: 2,
                ..
            }
        ));

        let err = BaselineDatabase::from_toml_str(
            r#"
            [[file]]
            platform = "p"
            algorithm = "md5"
            file_id = 1
            filename = "f"
            hash = "00"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, BaselineError::Algorithm(_)));

        let err = BaselineDatabase::from_toml_str(
            r#"
            [[file]]
            platform = "p"
            algorithm = "sha256"
            file_id = 1
            filename = "f"
            hash = "zz"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, BaselineError::Parse(_)));
    }

    #[test]
    fn test_empty_manifest() {
        assert!(BaselineDatabase::from_toml_str("").unwrap().is_empty());
    }
}
