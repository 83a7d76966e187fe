// Licensed under the Apache-2.0 license

use ecdsa::signature::Verifier;
use ecdsa::{Signature, VerifyingKey};
use log::{debug, info, warn};
use p256::NistP256;
use p384::NistP384;
use pts_common::message::{Aik, AikPublicKey, Certificate, KeyType};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Read access to the trusted certificate credentials.
pub trait TrustedIssuerStore: Send + Sync {
    /// Enumerates trusted certificates whose subject is `issuer` and whose
    /// key matches `key_type`.
    fn trusted_issuers<'a>(
        &'a self,
        key_type: KeyType,
        issuer: &'a str,
    ) -> Box<dyn Iterator<Item = Arc<dyn Certificate>> + 'a>;
}

/// In-memory set of trusted certificates.
#[derive(Debug, Default)]
pub struct CertificateStore {
    certificates: Vec<Arc<dyn Certificate>>,
}

impl CertificateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, certificate: Arc<dyn Certificate>) {
        self.certificates.push(certificate);
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }
}

impl TrustedIssuerStore for CertificateStore {
    fn trusted_issuers<'a>(
        &'a self,
        key_type: KeyType,
        issuer: &'a str,
    ) -> Box<dyn Iterator<Item = Arc<dyn Certificate>> + 'a> {
        Box::new(
            self.certificates
                .iter()
                .filter(move |cert| cert.subject() == issuer)
                .filter(move |cert| {
                    key_type == KeyType::Any || cert.public_key().key_type() == key_type
                })
                .cloned(),
        )
    }
}

/// SHA-256 fingerprint over the key encoding, used to identify an AIK in logs.
pub fn fingerprint(key: &dyn AikPublicKey) -> [u8; 32] {
    Sha256::digest(key.encoding()).into()
}

/// Checks whether `aik` is trusted.
///
/// A bare public key is accepted as is. A certificate is accepted once any
/// trusted issuer with the certificate's issuer name verifies its signature;
/// the search stops at the first issuer that does.
pub fn verify_aik(aik: &Aik, store: &dyn TrustedIssuerStore) -> bool {
    let cert = match aik {
        Aik::PublicKey(key) => {
            info!(
                "AIK public key {} accepted without certificate",
                hex::encode(fingerprint(key.as_ref()))
            );
            return true;
        }
        Aik::Certificate(cert) => cert,
    };

    let trusted = store
        .trusted_issuers(KeyType::Any, cert.issuer())
        .any(|issuer| {
            debug!("trying trusted issuer \"{}\"", issuer.subject());
            cert.issued_by(issuer.as_ref())
        });
    if trusted {
        info!(
            "AIK certificate \"{}\" is trusted, key {}",
            cert.subject(),
            hex::encode(fingerprint(cert.public_key().as_ref()))
        );
    } else {
        warn!(
            "AIK certificate \"{}\" issued by \"{}\" is not trusted",
            cert.subject(),
            cert.issuer()
        );
    }
    trusted
}

/// ECDSA AIK over P-256 with SHA-256 or P-384 with SHA-384.
///
/// Keys are encoded as uncompressed SEC1 points. Signatures are accepted
/// either as fixed size `r | s` or DER.
#[derive(Debug, Clone)]
pub enum EcdsaAikKey {
    P256(VerifyingKey<NistP256>),
    P384(VerifyingKey<NistP384>),
}

impl EcdsaAikKey {
    /// Parses a SEC1 encoded point, picking the curve from its length.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Option<Self> {
        VerifyingKey::<NistP384>::from_sec1_bytes(bytes)
            .map(EcdsaAikKey::P384)
            .or_else(|_| VerifyingKey::<NistP256>::from_sec1_bytes(bytes).map(EcdsaAikKey::P256))
            .ok()
    }
}

impl From<VerifyingKey<NistP256>> for EcdsaAikKey {
    fn from(key: VerifyingKey<NistP256>) -> Self {
        EcdsaAikKey::P256(key)
    }
}

impl From<VerifyingKey<NistP384>> for EcdsaAikKey {
    fn from(key: VerifyingKey<NistP384>) -> Self {
        EcdsaAikKey::P384(key)
    }
}

impl AikPublicKey for EcdsaAikKey {
    fn key_type(&self) -> KeyType {
        KeyType::Ecdsa
    }

    fn encoding(&self) -> Vec<u8> {
        match self {
            EcdsaAikKey::P256(key) => key.to_encoded_point(false).as_bytes().to_vec(),
            EcdsaAikKey::P384(key) => key.to_encoded_point(false).as_bytes().to_vec(),
        }
    }

    fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        match self {
            EcdsaAikKey::P256(key) => Signature::<NistP256>::from_slice(signature)
                .or_else(|_| Signature::<NistP256>::from_der(signature))
                .is_ok_and(|signature| key.verify(data, &signature).is_ok()),
            EcdsaAikKey::P384(key) => Signature::<NistP384>::from_slice(signature)
                .or_else(|_| Signature::<NistP384>::from_der(signature))
                .is_ok_and(|signature| key.verify(data, &signature).is_ok()),
        }
    }
}
