// Licensed under the Apache-2.0 license

use pts_common::protocol::MeasAlgorithm;
use sha2::{Digest, Sha256, Sha384};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum HashError {
    #[error("no hasher available for {0}")]
    Unsupported(MeasAlgorithm),
}

pub type HashResult<T> = Result<T, HashError>;

enum HasherInner {
    Sha256(Sha256),
    Sha384(Sha384),
}

/// Incremental hasher over the measurement algorithms with a local
/// implementation.
pub struct PtsHasher {
    inner: HasherInner,
}

impl PtsHasher {
    pub fn new(algorithm: MeasAlgorithm) -> HashResult<Self> {
        let inner = match algorithm {
            MeasAlgorithm::Sha256 => HasherInner::Sha256(Sha256::new()),
            MeasAlgorithm::Sha384 => HasherInner::Sha384(Sha384::new()),
            MeasAlgorithm::Sha1 => return Err(HashError::Unsupported(algorithm)),
        };
        Ok(Self { inner })
    }

    pub fn is_supported(algorithm: MeasAlgorithm) -> bool {
        Self::new(algorithm).is_ok()
    }

    pub fn update(&mut self, data: &[u8]) {
        match &mut self.inner {
            HasherInner::Sha256(hasher) => Digest::update(hasher, data),
            HasherInner::Sha384(hasher) => Digest::update(hasher, data),
        }
    }

    pub fn finalize(self) -> Vec<u8> {
        match self.inner {
            HasherInner::Sha256(hasher) => hasher.finalize().to_vec(),
            HasherInner::Sha384(hasher) => hasher.finalize().to_vec(),
        }
    }
}

/// Hashes the concatenation of `chunks`.
pub fn hash_all(algorithm: MeasAlgorithm, chunks: &[&[u8]]) -> HashResult<Vec<u8>> {
    let mut hasher = PtsHasher::new(algorithm)?;
    for chunk in chunks {
        hasher.update(chunk);
    }
    Ok(hasher.finalize())
}
