// Licensed under the Apache-2.0 license

use crate::config::{ConfigError, ConfigResult, ImvAttestationConfig};
use crate::database::MeasurementDatabase;
use crate::dh::DhCapability;
use crate::error::{ImvError, ImvResult};
use crate::handlers::{
    aik, comp_evid, dh_nonce, evid_final, file_meas, file_meta, meas_algo, proto_caps,
    tpm_version_info,
};
use crate::state::AttestationState;
use crate::trust::TrustedIssuerStore;
use log::{error, info};
use pts_common::message::{Attribute, OutboundAttribute, PtsAttribute};
use pts_common::protocol::{DhGroups, MeasAlgorithms, DH_GROUP_PRIORITY_TABLE};

/// Outcome of processing an attribute or a batch of attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    Abort,
}

/// Verifier settings and capabilities shared by every session.
///
/// The context is immutable while attributes are processed, so sessions of
/// different endpoints can be driven from different threads.
pub struct ImvContext<'a> {
    pub(crate) supported_algorithms: MeasAlgorithms,
    pub(crate) supported_dh_groups: DhGroups,
    pub(crate) min_nonce_len: usize,
    pub(crate) pts_db: Option<&'a dyn MeasurementDatabase>,
    pub(crate) trust_store: &'a dyn TrustedIssuerStore,
    pub(crate) dh: &'a dyn DhCapability,
}

impl<'a> ImvContext<'a> {
    pub fn new(
        config: &ImvAttestationConfig,
        trust_store: &'a dyn TrustedIssuerStore,
        dh: &'a dyn DhCapability,
    ) -> ConfigResult<Self> {
        let supported_algorithms = config.supported_algorithms()?;
        let supported_dh_groups = config.supported_dh_groups()?;
        validate_dh_groups(supported_dh_groups, dh.groups())?;

        Ok(Self {
            supported_algorithms,
            supported_dh_groups,
            min_nonce_len: config.min_nonce_len()?,
            pts_db: None,
            trust_store,
            dh,
        })
    }

    /// Attaches the measurement baseline. Without one, file measurements
    /// are not checked.
    pub fn with_pts_db(mut self, pts_db: &'a dyn MeasurementDatabase) -> Self {
        self.pts_db = Some(pts_db);
        self
    }

    pub fn supported_algorithms(&self) -> MeasAlgorithms {
        self.supported_algorithms
    }

    pub fn supported_dh_groups(&self) -> DhGroups {
        self.supported_dh_groups
    }

    /// Processes one inbound attribute, queueing any error attributes for
    /// the peer in `out`.
    ///
    /// Once an attribute aborts, the session stays aborted and later calls
    /// return [`Verdict::Abort`] without touching `state`.
    pub fn process(
        &self,
        attr: &Attribute,
        out: &mut Vec<OutboundAttribute>,
        state: &mut AttestationState,
    ) -> Verdict {
        if state.is_aborted() {
            error!("{}: {}", attr.get_type(), ImvError::SessionAborted);
            return Verdict::Abort;
        }

        match self.handle_attribute(attr, out, state) {
            Ok(()) => Verdict::Continue,
            Err(err) => {
                error!("{}: {}", attr.get_type(), err);
                state.set_aborted();
                Verdict::Abort
            }
        }
    }

    /// Processes attributes in order, stopping at the first abort.
    pub fn process_batch(
        &self,
        attrs: &[Attribute],
        out: &mut Vec<OutboundAttribute>,
        state: &mut AttestationState,
    ) -> Verdict {
        for attr in attrs {
            if self.process(attr, out, state) == Verdict::Abort {
                return Verdict::Abort;
            }
        }
        Verdict::Continue
    }

    fn handle_attribute(
        &self,
        attr: &Attribute,
        out: &mut Vec<OutboundAttribute>,
        state: &mut AttestationState,
    ) -> ImvResult<()> {
        match attr.body() {
            PtsAttribute::ProtoCaps(caps) => proto_caps::handle_proto_caps(state, *caps),
            PtsAttribute::MeasAlgoSelection(selected) => {
                meas_algo::handle_meas_algo_selection(self, state, *selected)
            }
            PtsAttribute::DhNonceParamsResp(params) => {
                dh_nonce::handle_dh_nonce_params(self, state, params, out)
            }
            PtsAttribute::TpmVersionInfo(info) => {
                tpm_version_info::handle_tpm_version_info(state, info)
            }
            PtsAttribute::Aik(aik) => aik::handle_aik(self, state, aik.as_ref()),
            PtsAttribute::FileMeas(measurements) => {
                file_meas::handle_file_meas(self, state, measurements)
            }
            PtsAttribute::UnixFileMeta(metadata) => file_meta::handle_unix_file_meta(metadata),
            PtsAttribute::SimpleCompEvid(evidence) => {
                comp_evid::handle_simple_comp_evid(state, evidence)
            }
            PtsAttribute::SimpleEvidFinal(evidence) => {
                evid_final::handle_simple_evid_final(state, evidence)
            }
            PtsAttribute::Unsupported(_) | PtsAttribute::Unknown(_) => {
                info!("received unsupported attribute '{}'", attr.get_type());
                Ok(())
            }
        }
    }
}

fn validate_dh_groups(configured: DhGroups, available: DhGroups) -> ConfigResult<()> {
    for group in DH_GROUP_PRIORITY_TABLE {
        let flag = DhGroups::from(*group);
        if configured.contains(flag) && !available.contains(flag) {
            return Err(ConfigError::UnsupportedDhGroup(*group));
        }
    }
    Ok(())
}
