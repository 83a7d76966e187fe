// Licensed under the Apache-2.0 license

use crate::hasher::{hash_all, HashError};
use core::fmt;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use pts_common::protocol::{DhGroup, DhGroups, MeasAlgorithm, PTS_MAX_NONCE_LEN, TPM_NONCE_SIZE};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;
use zeroize::Zeroizing;

// Uncompressed SEC1 point tag, absent from PTS public values.
const SEC1_UNCOMPRESSED_TAG: u8 = 0x04;

// Domain separator prefixed to the secret assessment value input.
const SECRET_HASH_PREFIX: &[u8] = b"1";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DhError {
    #[error("DH group {0} not available")]
    UnsupportedGroup(DhGroup),
    #[error("invalid nonce length {0}")]
    InvalidNonceLength(usize),
    #[error("invalid peer public value")]
    InvalidPublicValue,
    #[error("DH exchange incomplete")]
    Incomplete,
    #[error(transparent)]
    Hash(#[from] HashError),
}

pub type DhResult<T> = Result<T, DhError>;

/// Private half of a local DH contribution.
pub trait DhPrivateKey: Send {
    /// Computes the raw shared secret with the peer's public value.
    fn shared_secret(&self, peer_public_value: &[u8]) -> DhResult<Zeroizing<Vec<u8>>>;
}

/// Local DH contribution: key pair plus the initiator nonce sent with it.
pub struct DhLocal {
    group: DhGroup,
    public_value: Vec<u8>,
    nonce: Vec<u8>,
    private_key: Box<dyn DhPrivateKey>,
}

impl DhLocal {
    pub fn new(
        group: DhGroup,
        public_value: Vec<u8>,
        nonce: Vec<u8>,
        private_key: Box<dyn DhPrivateKey>,
    ) -> Self {
        Self {
            group,
            public_value,
            nonce,
            private_key,
        }
    }

    pub fn group(&self) -> DhGroup {
        self.group
    }

    pub fn public_value(&self) -> &[u8] {
        &self.public_value
    }

    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    pub fn shared_secret(&self, peer_public_value: &[u8]) -> DhResult<Zeroizing<Vec<u8>>> {
        self.private_key.shared_secret(peer_public_value)
    }
}

impl fmt::Debug for DhLocal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DhLocal")
            .field("group", &self.group)
            .field("public_value", &self.public_value)
            .field("nonce", &self.nonce)
            .finish_non_exhaustive()
    }
}

/// Source of local DH contributions and nonces.
pub trait DhCapability: Send + Sync {
    /// Groups this capability can generate values for.
    fn groups(&self) -> DhGroups;

    /// Generates a fresh key pair in `group` and a random nonce of `nonce_len` bytes.
    fn generate(&self, group: DhGroup, nonce_len: usize) -> DhResult<DhLocal>;
}

/// Derives the secret assessment value `H("1" | ni | nr | shared)`,
/// truncated to the TPM nonce size.
pub fn derive_secret(
    local: &DhLocal,
    peer_public_value: &[u8],
    hash_algorithm: MeasAlgorithm,
    responder_nonce: &[u8],
) -> DhResult<Zeroizing<Vec<u8>>> {
    if local.nonce().is_empty() || responder_nonce.is_empty() {
        return Err(DhError::Incomplete);
    }
    let shared = local.shared_secret(peer_public_value)?;
    let mut secret = Zeroizing::new(hash_all(
        hash_algorithm,
        &[SECRET_HASH_PREFIX, local.nonce(), responder_nonce, &shared],
    )?);
    secret.truncate(TPM_NONCE_SIZE);
    Ok(secret)
}

fn random_nonce(len: usize) -> DhResult<Vec<u8>> {
    if len == 0 || len > PTS_MAX_NONCE_LEN {
        return Err(DhError::InvalidNonceLength(len));
    }
    let mut nonce = vec![0u8; len];
    OsRng.fill_bytes(&mut nonce);
    Ok(nonce)
}

fn sec1_from_raw(raw: &[u8]) -> Vec<u8> {
    let mut sec1 = Vec::with_capacity(raw.len() + 1);
    sec1.push(SEC1_UNCOMPRESSED_TAG);
    sec1.extend_from_slice(raw);
    sec1
}

enum EcdhPrivateKey {
    P256(p256::ecdh::EphemeralSecret),
    P384(p384::ecdh::EphemeralSecret),
}

impl DhPrivateKey for EcdhPrivateKey {
    fn shared_secret(&self, peer_public_value: &[u8]) -> DhResult<Zeroizing<Vec<u8>>> {
        let sec1 = sec1_from_raw(peer_public_value);
        let shared = match self {
            EcdhPrivateKey::P256(secret) => {
                let peer = p256::PublicKey::from_sec1_bytes(&sec1)
                    .map_err(|_| DhError::InvalidPublicValue)?;
                secret.diffie_hellman(&peer).raw_secret_bytes().to_vec()
            }
            EcdhPrivateKey::P384(secret) => {
                let peer = p384::PublicKey::from_sec1_bytes(&sec1)
                    .map_err(|_| DhError::InvalidPublicValue)?;
                secret.diffie_hellman(&peer).raw_secret_bytes().to_vec()
            }
        };
        Ok(Zeroizing::new(shared))
    }
}

/// Elliptic curve DH over the NIST groups (IKE 19 and 20). Public values
/// are the raw `x | y` coordinates.
#[derive(Debug, Default, Clone, Copy)]
pub struct EcdhCapability;

impl DhCapability for EcdhCapability {
    fn groups(&self) -> DhGroups {
        DhGroups::IKE19 | DhGroups::IKE20
    }

    fn generate(&self, group: DhGroup, nonce_len: usize) -> DhResult<DhLocal> {
        let nonce = random_nonce(nonce_len)?;
        let (public_point, private_key) = match group {
            DhGroup::Ike19 => {
                let secret = p256::ecdh::EphemeralSecret::random(&mut OsRng);
                let point = secret.public_key().to_encoded_point(false);
                (point.as_bytes().to_vec(), EcdhPrivateKey::P256(secret))
            }
            DhGroup::Ike20 => {
                let secret = p384::ecdh::EphemeralSecret::random(&mut OsRng);
                let point = secret.public_key().to_encoded_point(false);
                (point.as_bytes().to_vec(), EcdhPrivateKey::P384(secret))
            }
            _ => return Err(DhError::UnsupportedGroup(group)),
        };
        Ok(DhLocal::new(
            group,
            public_point[1..].to_vec(),
            nonce,
            Box::new(private_key),
        ))
    }
}
