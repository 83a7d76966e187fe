// Licensed under the Apache-2.0 license

use core::fmt;
use std::sync::Arc;

/// Public key algorithm filter used when looking up trusted issuers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    Any,
    Rsa,
    Ecdsa,
}

/// Public half of an Attestation Identity Key.
pub trait AikPublicKey: fmt::Debug + Send + Sync {
    fn key_type(&self) -> KeyType;

    /// Encoded public key, used to derive its fingerprint.
    fn encoding(&self) -> Vec<u8>;

    /// Verifies `signature` over `data`.
    ///
    /// # Returns
    /// * `bool` - True if the signature is valid for this key.
    fn verify(&self, data: &[u8], signature: &[u8]) -> bool;
}

/// X.509 certificate as seen by the trust chain check.
pub trait Certificate: fmt::Debug + Send + Sync {
    /// Subject distinguished name.
    fn subject(&self) -> &str;

    /// Issuer distinguished name.
    fn issuer(&self) -> &str;

    /// Subject public key.
    fn public_key(&self) -> Arc<dyn AikPublicKey>;

    /// Checks whether `issuer` signed this certificate.
    fn issued_by(&self, issuer: &dyn Certificate) -> bool;
}

/// AIK as carried by the AIK attribute: either a bare public key or a
/// certificate binding the key to an issuer.
#[derive(Debug, Clone)]
pub enum Aik {
    PublicKey(Arc<dyn AikPublicKey>),
    Certificate(Arc<dyn Certificate>),
}

impl Aik {
    pub fn public_key(&self) -> Arc<dyn AikPublicKey> {
        match self {
            Aik::PublicKey(key) => Arc::clone(key),
            Aik::Certificate(cert) => cert.public_key(),
        }
    }

    pub fn is_certificate(&self) -> bool {
        matches!(self, Aik::Certificate(_))
    }
}
