// Licensed under the Apache-2.0 license
#![allow(dead_code)]

use ecdsa::signature::Signer;
use ecdsa::{Signature, SigningKey, VerifyingKey};
use imv_attestation::config::ImvAttestationConfig;
use imv_attestation::database::MeasurementDatabase;
use imv_attestation::dh::{DhCapability, DhLocal, DhResult, EcdhCapability};
use imv_attestation::hasher::hash_all;
use imv_attestation::state::AttestationState;
use imv_attestation::trust::{EcdsaAikKey, TrustedIssuerStore};
use imv_attestation::ImvContext;
use log::LevelFilter;
use p384::NistP384;
use pts_common::message::{
    Aik, AikPublicKey, Attribute, Certificate, ComponentEvidence, ComponentName,
    DhNonceParamsResp, KeyType, PtsAttribute, Qualifier,
};
use pts_common::protocol::{DhGroup, DhGroups, MeasAlgorithm, MeasAlgorithms, PEN_TCG};
use rand::rngs::OsRng;
use simple_logger::SimpleLogger;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const PLATFORM: &str = "Ubuntu 24.04 x86_64";
pub const COMPONENT: ComponentName = ComponentName::new(PEN_TCG, 1);

pub fn setup() {
    // Initialize log level to debug (only once)
    let _ = SimpleLogger::new().with_level(LevelFilter::Debug).init();
}

pub fn context<'a>(
    config: &ImvAttestationConfig,
    trust_store: &'a dyn TrustedIssuerStore,
    dh: &'a dyn DhCapability,
) -> ImvContext<'a> {
    setup();
    ImvContext::new(config, trust_store, dh).unwrap()
}

pub fn context_with_db<'a>(
    config: &ImvAttestationConfig,
    pts_db: &'a dyn MeasurementDatabase,
    trust_store: &'a dyn TrustedIssuerStore,
    dh: &'a dyn DhCapability,
) -> ImvContext<'a> {
    context(config, trust_store, dh).with_pts_db(pts_db)
}

/// DH capability counting the contributions it generates.
#[derive(Default)]
pub struct CountingDh {
    inner: EcdhCapability,
    generated: AtomicUsize,
}

impl CountingDh {
    pub fn generated(&self) -> usize {
        self.generated.load(Ordering::SeqCst)
    }
}

impl DhCapability for CountingDh {
    fn groups(&self) -> DhGroups {
        self.inner.groups()
    }

    fn generate(&self, group: DhGroup, nonce_len: usize) -> DhResult<DhLocal> {
        self.generated.fetch_add(1, Ordering::SeqCst);
        self.inner.generate(group, nonce_len)
    }
}

/// AIK key that counts signature verifications.
#[derive(Debug)]
pub struct SpyKey {
    inner: EcdsaAikKey,
    verify_calls: Arc<AtomicUsize>,
}

impl SpyKey {
    pub fn new(inner: EcdsaAikKey) -> (Arc<Self>, Arc<AtomicUsize>) {
        let verify_calls = Arc::new(AtomicUsize::new(0));
        let key = Arc::new(Self {
            inner,
            verify_calls: Arc::clone(&verify_calls),
        });
        (key, verify_calls)
    }
}

impl AikPublicKey for SpyKey {
    fn key_type(&self) -> KeyType {
        self.inner.key_type()
    }

    fn encoding(&self) -> Vec<u8> {
        self.inner.encoding()
    }

    fn verify(&self, data: &[u8], signature: &[u8]) -> bool {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.verify(data, signature)
    }
}

/// Key identified by a marker byte, never verifying anything.
#[derive(Debug)]
pub struct MarkerKey(pub u8);

impl AikPublicKey for MarkerKey {
    fn key_type(&self) -> KeyType {
        KeyType::Rsa
    }

    fn encoding(&self) -> Vec<u8> {
        vec![self.0; 4]
    }

    fn verify(&self, _data: &[u8], _signature: &[u8]) -> bool {
        false
    }
}

/// Certificate signed by whichever issuer holds `signer_key`.
#[derive(Debug)]
pub struct MockCertificate {
    pub subject: String,
    pub issuer: String,
    pub key: Arc<dyn AikPublicKey>,
    pub signer_key: Vec<u8>,
    pub checks: Arc<AtomicUsize>,
}

impl MockCertificate {
    pub fn new(subject: &str, issuer: &str, key: Arc<dyn AikPublicKey>, signer: u8) -> Self {
        Self {
            subject: subject.to_string(),
            issuer: issuer.to_string(),
            key,
            signer_key: MarkerKey(signer).encoding(),
            checks: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Trusted CA certificate carrying the key of marker `marker`.
    pub fn authority(subject: &str, marker: u8) -> Arc<dyn Certificate> {
        Arc::new(Self::new(subject, subject, Arc::new(MarkerKey(marker)), marker))
    }

    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}

impl Certificate for MockCertificate {
    fn subject(&self) -> &str {
        &self.subject
    }

    fn issuer(&self) -> &str {
        &self.issuer
    }

    fn public_key(&self) -> Arc<dyn AikPublicKey> {
        Arc::clone(&self.key)
    }

    fn issued_by(&self, issuer: &dyn Certificate) -> bool {
        self.checks.fetch_add(1, Ordering::SeqCst);
        issuer.public_key().encoding() == self.signer_key
    }
}

/// Attested endpoint side of the exchange.
pub struct Peer {
    pub dh: DhLocal,
    pub signing_key: SigningKey<NistP384>,
}

impl Peer {
    pub fn new(group: DhGroup, nonce_len: usize) -> Self {
        Self {
            dh: EcdhCapability.generate(group, nonce_len).unwrap(),
            signing_key: SigningKey::random(&mut OsRng),
        }
    }

    pub fn dh_params(&self, hash_algo_set: MeasAlgorithms) -> Attribute {
        Attribute::from(PtsAttribute::DhNonceParamsResp(DhNonceParamsResp {
            dh_group: self.dh.group().into(),
            hash_algo_set,
            responder_nonce: self.dh.nonce().to_vec(),
            responder_value: self.dh.public_value().to_vec(),
        }))
    }

    /// Secret assessment value as computed by the endpoint.
    pub fn secret(&self, state: &AttestationState, hash_algorithm: MeasAlgorithm) -> Vec<u8> {
        let initiator_nonce = state.dh().initiator_nonce().unwrap();
        let imv_value = state.dh().local_public_value().unwrap();
        let shared = self.dh.shared_secret(imv_value).unwrap();
        let mut secret = hash_all(
            hash_algorithm,
            &[b"1", initiator_nonce, self.dh.nonce(), shared.as_slice()],
        )
        .unwrap();
        secret.truncate(20);
        secret
    }

    pub fn aik(&self) -> (Aik, Arc<AtomicUsize>) {
        let (key, calls) = SpyKey::new(EcdsaAikKey::from(VerifyingKey::from(&self.signing_key)));
        (Aik::PublicKey(key), calls)
    }

    pub fn sign(&self, data: &[u8]) -> Vec<u8> {
        let signature: Signature<NistP384> = self.signing_key.sign(data);
        signature.to_bytes().to_vec()
    }
}

/// Evidence extending PCR `pcr` from `pcr_before` by `measurement` with SHA-256.
pub fn evidence(measurement: &[u8], pcr_before: &[u8], pcr: u32) -> ComponentEvidence {
    ComponentEvidence {
        name: COMPONENT,
        qualifier: Qualifier::from_bits(0),
        depth: 0,
        extended_pcr: Some(pcr),
        hash_algorithm: MeasAlgorithm::Sha256,
        measurement: measurement.to_vec(),
        pcr_before: pcr_before.to_vec(),
        pcr_after: hash_all(MeasAlgorithm::Sha256, &[pcr_before, measurement]).unwrap(),
    }
}

/// TPM_PCR_COMPOSITE over `(index, value)` pairs in ascending index order.
pub fn pcr_composite(pcrs: &[(u32, &[u8])]) -> Vec<u8> {
    let mut select = [0u8; 3];
    let mut values = Vec::new();
    for (index, value) in pcrs {
        select[*index as usize / 8] |= 1 << (index % 8);
        values.extend_from_slice(value);
    }
    let mut composite = vec![0x00, 0x03];
    composite.extend_from_slice(&select);
    composite.extend_from_slice(&(values.len() as u32).to_be_bytes());
    composite.extend_from_slice(&values);
    composite
}

/// TPM_QUOTE_INFO over a composite digested with SHA-256.
pub fn quote_info(composite: &[u8], secret: &[u8]) -> Vec<u8> {
    let mut info = b"\x01\x01\x00\x00QUOT".to_vec();
    info.extend_from_slice(&hash_all(MeasAlgorithm::Sha256, &[composite]).unwrap());
    info.extend_from_slice(secret);
    info
}
