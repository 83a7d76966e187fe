// Licensed under the Apache-2.0 license

use crate::component::{ComponentRegistry, PtsComponent};
use crate::dh::{derive_secret, DhError, DhLocal, DhResult};
use crate::pcr::PcrBank;
use core::fmt;
use log::info;
use pts_common::message::{Aik, ComponentName};
use pts_common::protocol::{DhGroup, MeasAlgorithm, ProtoCaps};
use std::collections::BTreeMap;
use zeroize::Zeroizing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttestationResult {
    Trusted,
    NotTrusted,
}

/// DH nonce exchange transcript.
///
/// Stages fill in order: negotiated parameters, local contribution, peer
/// contribution, secret. Restarting an earlier stage clears the later ones.
#[derive(Default)]
pub struct DhTranscript {
    group: Option<DhGroup>,
    hash_algorithm: Option<MeasAlgorithm>,
    local: Option<DhLocal>,
    responder_nonce: Option<Vec<u8>>,
    peer_public_value: Option<Vec<u8>>,
    secret: Option<Zeroizing<Vec<u8>>>,
}

impl DhTranscript {
    pub fn set_parameters(&mut self, group: DhGroup, hash_algorithm: MeasAlgorithm) {
        *self = Self {
            group: Some(group),
            hash_algorithm: Some(hash_algorithm),
            ..Self::default()
        };
    }

    pub fn set_local(&mut self, local: DhLocal) {
        self.local = Some(local);
        self.responder_nonce = None;
        self.peer_public_value = None;
        self.secret = None;
    }

    pub fn set_peer(&mut self, responder_nonce: &[u8], public_value: &[u8]) {
        self.responder_nonce = Some(responder_nonce.to_vec());
        self.peer_public_value = Some(public_value.to_vec());
        self.secret = None;
    }

    /// Derives the secret assessment value from the recorded stages.
    pub fn calculate_secret(&mut self) -> DhResult<()> {
        let (Some(hash_algorithm), Some(local), Some(responder_nonce), Some(public_value)) = (
            self.hash_algorithm,
            self.local.as_ref(),
            self.responder_nonce.as_ref(),
            self.peer_public_value.as_ref(),
        ) else {
            return Err(DhError::Incomplete);
        };
        self.secret = Some(derive_secret(
            local,
            public_value,
            hash_algorithm,
            responder_nonce,
        )?);
        Ok(())
    }

    pub fn group(&self) -> Option<DhGroup> {
        self.group
    }

    pub fn hash_algorithm(&self) -> Option<MeasAlgorithm> {
        self.hash_algorithm
    }

    pub fn initiator_nonce(&self) -> Option<&[u8]> {
        self.local.as_ref().map(DhLocal::nonce)
    }

    pub fn local_public_value(&self) -> Option<&[u8]> {
        self.local.as_ref().map(DhLocal::public_value)
    }

    pub fn responder_nonce(&self) -> Option<&[u8]> {
        self.responder_nonce.as_deref()
    }

    pub fn peer_public_value(&self) -> Option<&[u8]> {
        self.peer_public_value.as_deref()
    }

    pub fn secret(&self) -> Option<&[u8]> {
        self.secret.as_ref().map(|secret| secret.as_slice())
    }
}

impl fmt::Debug for DhTranscript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DhTranscript")
            .field("group", &self.group)
            .field("hash_algorithm", &self.hash_algorithm)
            .field("local", &self.local)
            .field("responder_nonce", &self.responder_nonce)
            .field("peer_public_value", &self.peer_public_value)
            .field("has_secret", &self.secret.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMeasRequest {
    pub file_id: u32,
    pub is_dir: bool,
}

/// Per-endpoint attestation state.
#[derive(Debug, Default)]
pub struct AttestationState {
    proto_caps: ProtoCaps,
    meas_algorithm: Option<MeasAlgorithm>,
    dh: DhTranscript,
    platform_info: Option<String>,
    tpm_version_info: Option<Vec<u8>>,
    aik: Option<Aik>,
    pcrs: PcrBank,
    file_meas_requests: BTreeMap<u16, FileMeasRequest>,
    last_request_id: u16,
    components: ComponentRegistry,
    measurement_error: bool,
    aborted: bool,
}

impl AttestationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn proto_caps(&self) -> ProtoCaps {
        self.proto_caps
    }

    pub fn set_proto_caps(&mut self, caps: ProtoCaps) {
        self.proto_caps = caps;
    }

    pub fn meas_algorithm(&self) -> Option<MeasAlgorithm> {
        self.meas_algorithm
    }

    pub fn set_meas_algorithm(&mut self, algorithm: MeasAlgorithm) {
        self.meas_algorithm = Some(algorithm);
    }

    pub fn dh(&self) -> &DhTranscript {
        &self.dh
    }

    pub fn dh_mut(&mut self) -> &mut DhTranscript {
        &mut self.dh
    }

    pub fn platform_info(&self) -> Option<&str> {
        self.platform_info.as_deref()
    }

    pub fn set_platform_info(&mut self, platform_info: &str) {
        self.platform_info = Some(platform_info.to_string());
    }

    pub fn tpm_version_info(&self) -> Option<&[u8]> {
        self.tpm_version_info.as_deref()
    }

    pub fn set_tpm_version_info(&mut self, info: &[u8]) {
        self.tpm_version_info = Some(info.to_vec());
    }

    pub fn aik(&self) -> Option<&Aik> {
        self.aik.as_ref()
    }

    pub fn set_aik(&mut self, aik: Aik) {
        self.aik = Some(aik);
    }

    pub fn pcrs(&self) -> &PcrBank {
        &self.pcrs
    }

    /// Records an outstanding file measurement request.
    ///
    /// # Returns
    /// * `u16` - The request id, never zero.
    pub fn add_file_meas_request(&mut self, file_id: u32, is_dir: bool) -> u16 {
        self.last_request_id = self.last_request_id.checked_add(1).unwrap_or(1);
        self.file_meas_requests
            .insert(self.last_request_id, FileMeasRequest { file_id, is_dir });
        self.last_request_id
    }

    /// Removes and returns the request answered by `request_id`.
    pub fn check_off_file_meas_request(&mut self, request_id: u16) -> Option<FileMeasRequest> {
        self.file_meas_requests.remove(&request_id)
    }

    pub fn file_meas_request_count(&self) -> usize {
        self.file_meas_requests.len()
    }

    pub fn add_component(&mut self, name: ComponentName, component: Box<dyn PtsComponent>) {
        self.components.register(name, component);
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub(crate) fn components_and_pcrs(&mut self) -> (&mut ComponentRegistry, &mut PcrBank) {
        (&mut self.components, &mut self.pcrs)
    }

    /// Finalizes the component round, flagging components with missing evidence.
    pub fn finalize_components(&mut self) {
        if !self.components.finalize() {
            self.set_measurement_error();
        }
    }

    /// Flags a measurement mismatch. The flag is never cleared.
    pub fn set_measurement_error(&mut self) {
        if !self.measurement_error {
            info!("measurement error flagged");
        }
        self.measurement_error = true;
    }

    pub fn measurement_error(&self) -> bool {
        self.measurement_error
    }

    pub(crate) fn set_aborted(&mut self) {
        self.aborted = true;
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    pub fn attestation_result(&self) -> AttestationResult {
        if self.measurement_error || self.aborted {
            AttestationResult::NotTrusted
        } else {
            AttestationResult::Trusted
        }
    }
}
