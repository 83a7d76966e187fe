// Licensed under the Apache-2.0 license

#[cfg(test)]
mod common;
use common::{context, evidence, pcr_composite, quote_info, CountingDh, Peer, COMPONENT};
use imv_attestation::component::ReferenceComponent;
use imv_attestation::config::ImvAttestationConfig;
use imv_attestation::hasher::hash_all;
use imv_attestation::trust::CertificateStore;
use imv_attestation::{AttestationResult, AttestationState, ImvContext, Verdict};
use pts_common::message::{
    Attribute, ComponentEvidence, PtsAttribute, Qualifier, QuoteVariant, SimpleEvidFinal,
};
use pts_common::protocol::{DhGroup, MeasAlgorithm, MeasAlgorithms, ProtoCaps};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Attested {
    peer: Peer,
    state: AttestationState,
    verify_calls: Arc<AtomicUsize>,
    pcr_after: Vec<u8>,
    secret: Vec<u8>,
}

/// Runs DH agreement, AIK delivery and `evidence_count` component
/// measurements extending PCR 10.
fn attest(ctx: &ImvContext, evidence_count: usize) -> Attested {
    let peer = Peer::new(DhGroup::Ike20, 20);
    let (aik, verify_calls) = peer.aik();
    let mut state = AttestationState::new();
    state.add_component(
        COMPONENT,
        Box::new(ReferenceComponent::new(
            Qualifier::from_bits(0),
            vec![vec![1; 32], vec![2; 32]],
        )),
    );

    let mut attrs = vec![
        Attribute::from(PtsAttribute::ProtoCaps(ProtoCaps::DH_NONCE | ProtoCaps::TRUSTED)),
        peer.dh_params(MeasAlgorithms::SHA256),
        Attribute::from(PtsAttribute::Aik(Some(aik))),
    ];
    let mut pcr_after = vec![0; 32];
    for measurement in [[1u8; 32], [2u8; 32]].iter().take(evidence_count) {
        let evidence: ComponentEvidence = evidence(measurement, &pcr_after, 10);
        pcr_after = evidence.pcr_after.clone();
        attrs.push(Attribute::from(PtsAttribute::SimpleCompEvid(evidence)));
    }

    let mut out = Vec::new();
    assert_eq!(ctx.process_batch(&attrs, &mut out, &mut state), Verdict::Continue);
    assert!(out.is_empty());

    let secret = peer.secret(&state, MeasAlgorithm::Sha256);
    Attested {
        peer,
        state,
        verify_calls,
        pcr_after,
        secret,
    }
}

fn evid_final(
    quote_variant: QuoteVariant,
    pcr_composite: Vec<u8>,
    tpm_quote_signature: Vec<u8>,
) -> Attribute {
    Attribute::from(PtsAttribute::SimpleEvidFinal(SimpleEvidFinal {
        quote_variant,
        comp_hash_algorithm: MeasAlgorithms::SHA256,
        pcr_composite,
        tpm_quote_signature,
        evidence_signature: None,
    }))
}

#[test]
fn test_valid_quote_is_trusted() {
    let store = CertificateStore::new();
    let dh = CountingDh::default();
    let ctx = context(&ImvAttestationConfig::default(), &store, &dh);
    let mut attested = attest(&ctx, 2);
    let mut out = Vec::new();

    let composite = pcr_composite(&[(10, attested.pcr_after.as_slice())]);
    let signature = attested.peer.sign(&quote_info(&composite, &attested.secret));
    let attr = evid_final(QuoteVariant::QuoteInfo, composite, signature);

    assert_eq!(ctx.process(&attr, &mut out, &mut attested.state), Verdict::Continue);
    assert_eq!(attested.verify_calls.load(Ordering::SeqCst), 1);
    assert_eq!(attested.state.component_count(), 0);
    assert_eq!(attested.state.attestation_result(), AttestationResult::Trusted);
}

#[test]
fn test_composite_mismatch_aborts_before_signature() {
    let store = CertificateStore::new();
    let dh = CountingDh::default();
    let ctx = context(&ImvAttestationConfig::default(), &store, &dh);
    let mut attested = attest(&ctx, 2);
    let mut out = Vec::new();

    let mut composite = pcr_composite(&[(10, attested.pcr_after.as_slice())]);
    let signature = attested.peer.sign(&quote_info(&composite, &attested.secret));
    composite[9] ^= 0x01;
    let attr = evid_final(QuoteVariant::QuoteInfo, composite, signature);

    assert_eq!(ctx.process(&attr, &mut out, &mut attested.state), Verdict::Abort);
    assert_eq!(attested.verify_calls.load(Ordering::SeqCst), 0);
    assert_eq!(attested.state.attestation_result(), AttestationResult::NotTrusted);
    assert!(out.is_empty());

    // The session stays aborted.
    let attr = Attribute::from(PtsAttribute::ProtoCaps(ProtoCaps::XML));
    assert_eq!(ctx.process(&attr, &mut out, &mut attested.state), Verdict::Abort);
    assert_eq!(
        attested.state.proto_caps(),
        ProtoCaps::DH_NONCE | ProtoCaps::TRUSTED
    );
}

#[test]
fn test_bad_signature_aborts() {
    let store = CertificateStore::new();
    let dh = CountingDh::default();
    let ctx = context(&ImvAttestationConfig::default(), &store, &dh);
    let mut attested = attest(&ctx, 2);
    let mut out = Vec::new();

    let composite = pcr_composite(&[(10, attested.pcr_after.as_slice())]);
    let signature = attested.peer.sign(&quote_info(&composite, &[0u8; 20]));
    let attr = evid_final(QuoteVariant::QuoteInfo, composite, signature);

    assert_eq!(ctx.process(&attr, &mut out, &mut attested.state), Verdict::Abort);
    assert_eq!(attested.verify_calls.load(Ordering::SeqCst), 1);
    assert_eq!(attested.state.attestation_result(), AttestationResult::NotTrusted);
}

#[test]
fn test_evidence_signature_is_not_checked() {
    let store = CertificateStore::new();
    let dh = CountingDh::default();
    let ctx = context(&ImvAttestationConfig::default(), &store, &dh);
    let mut attested = attest(&ctx, 2);
    let mut out = Vec::new();

    let composite = pcr_composite(&[(10, attested.pcr_after.as_slice())]);
    let signature = attested.peer.sign(&quote_info(&composite, &attested.secret));
    let attr = Attribute::from(PtsAttribute::SimpleEvidFinal(SimpleEvidFinal {
        quote_variant: QuoteVariant::QuoteInfo,
        comp_hash_algorithm: MeasAlgorithms::SHA256,
        pcr_composite: composite,
        tpm_quote_signature: signature,
        evidence_signature: Some(vec![0xde, 0xad, 0xbe, 0xef]),
    }));

    assert_eq!(ctx.process(&attr, &mut out, &mut attested.state), Verdict::Continue);
    assert_eq!(attested.verify_calls.load(Ordering::SeqCst), 1);
    assert_eq!(attested.state.attestation_result(), AttestationResult::Trusted);
}

#[test]
fn test_no_quote() {
    let store = CertificateStore::new();
    let dh = CountingDh::default();
    let ctx = context(&ImvAttestationConfig::default(), &store, &dh);
    let mut attested = attest(&ctx, 2);
    let mut out = Vec::new();

    let attr = evid_final(QuoteVariant::None, vec![], vec![]);
    assert_eq!(ctx.process(&attr, &mut out, &mut attested.state), Verdict::Continue);
    assert_eq!(attested.verify_calls.load(Ordering::SeqCst), 0);
    assert_eq!(attested.state.component_count(), 1);
}

#[test]
fn test_missing_component_evidence_is_not_trusted() {
    let store = CertificateStore::new();
    let dh = CountingDh::default();
    let ctx = context(&ImvAttestationConfig::default(), &store, &dh);
    let mut attested = attest(&ctx, 1);
    let mut out = Vec::new();

    let composite = pcr_composite(&[(10, attested.pcr_after.as_slice())]);
    let signature = attested.peer.sign(&quote_info(&composite, &attested.secret));
    let attr = evid_final(QuoteVariant::QuoteInfo, composite, signature);

    assert_eq!(ctx.process(&attr, &mut out, &mut attested.state), Verdict::Continue);
    assert!(attested.state.measurement_error());
    assert_eq!(attested.state.attestation_result(), AttestationResult::NotTrusted);
}

#[test]
fn test_quote_without_prerequisites_aborts() {
    let store = CertificateStore::new();
    let dh = CountingDh::default();
    let ctx = context(&ImvAttestationConfig::default(), &store, &dh);
    let mut out = Vec::new();

    // No DH secret, no PCR values.
    let mut state = AttestationState::new();
    let attr = evid_final(QuoteVariant::QuoteInfo, vec![0; 9], vec![0; 96]);
    assert_eq!(ctx.process(&attr, &mut out, &mut state), Verdict::Abort);

    // Matching composite but no AIK.
    let peer = Peer::new(DhGroup::Ike20, 20);
    let mut state = AttestationState::new();
    state.add_component(
        COMPONENT,
        Box::new(ReferenceComponent::new(Qualifier::from_bits(0), vec![vec![1; 32]])),
    );
    let evidence = evidence(&[1; 32], &[0; 32], 10);
    let pcr_after = evidence.pcr_after.clone();
    let attrs = [
        peer.dh_params(MeasAlgorithms::SHA256),
        Attribute::from(PtsAttribute::SimpleCompEvid(evidence)),
    ];
    assert_eq!(ctx.process_batch(&attrs, &mut out, &mut state), Verdict::Continue);
    let composite = pcr_composite(&[(10, pcr_after.as_slice())]);
    let signature = peer.sign(&quote_info(&composite, &peer.secret(&state, MeasAlgorithm::Sha256)));
    let attr = evid_final(QuoteVariant::QuoteInfo, composite, signature);
    assert_eq!(ctx.process(&attr, &mut out, &mut state), Verdict::Abort);
    assert_eq!(state.attestation_result(), AttestationResult::NotTrusted);
}

fn quote_info2(composite: &[u8], secret: &[u8], version_info: &[u8]) -> Vec<u8> {
    let mut info = b"\x00\x36QUT2".to_vec();
    info.extend_from_slice(secret);
    info.extend_from_slice(&composite[..5]);
    info.push(0x01);
    info.extend_from_slice(&hash_all(MeasAlgorithm::Sha256, &[composite]).unwrap());
    info.extend_from_slice(version_info);
    info
}

#[test]
fn test_quote_info2_with_version_info() {
    let store = CertificateStore::new();
    let dh = CountingDh::default();
    let ctx = context(&ImvAttestationConfig::default(), &store, &dh);
    let mut attested = attest(&ctx, 2);
    let mut out = Vec::new();
    let version_info = [0x30, 0x01, 0x01, 0x02, 0x00, 0x05];

    let attr = Attribute::from(PtsAttribute::TpmVersionInfo(version_info.to_vec()));
    assert_eq!(ctx.process(&attr, &mut out, &mut attested.state), Verdict::Continue);

    let composite = pcr_composite(&[(10, attested.pcr_after.as_slice())]);
    let signature = attested
        .peer
        .sign(&quote_info2(&composite, &attested.secret, &version_info));
    let attr = evid_final(QuoteVariant::QuoteInfo2CapVer, composite, signature);
    assert_eq!(ctx.process(&attr, &mut out, &mut attested.state), Verdict::Continue);
    assert_eq!(attested.verify_calls.load(Ordering::SeqCst), 1);
    assert_eq!(attested.state.attestation_result(), AttestationResult::Trusted);
}

#[test]
fn test_quote_info2() {
    let store = CertificateStore::new();
    let dh = CountingDh::default();
    let ctx = context(&ImvAttestationConfig::default(), &store, &dh);
    let mut attested = attest(&ctx, 2);
    let mut out = Vec::new();

    let composite = pcr_composite(&[(10, attested.pcr_after.as_slice())]);
    let signature = attested
        .peer
        .sign(&quote_info2(&composite, &attested.secret, &[]));

    // Version info was never delivered.
    let attr = evid_final(QuoteVariant::QuoteInfo2CapVer, composite.clone(), signature.clone());
    let mut state_without_version = attest(&ctx, 2).state;
    assert_eq!(ctx.process(&attr, &mut out, &mut state_without_version), Verdict::Abort);

    let attr = evid_final(QuoteVariant::QuoteInfo2, composite, signature);
    assert_eq!(ctx.process(&attr, &mut out, &mut attested.state), Verdict::Continue);
    assert_eq!(attested.state.attestation_result(), AttestationResult::Trusted);
}
