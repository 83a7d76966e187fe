// Licensed under the Apache-2.0 license

use crate::context::ImvContext;
use crate::error::{ImvError, ImvResult};
use crate::state::AttestationState;
use log::{debug, info};
use pts_common::message::{DhNonceParamsResp, OutboundAttribute, PaTncError};
use pts_common::protocol::{DhGroup, MeasAlgorithm, PTS_MAX_NONCE_LEN, PTS_MIN_NONCE_LEN};

pub(crate) fn handle_dh_nonce_params(
    ctx: &ImvContext,
    state: &mut AttestationState,
    params: &DhNonceParamsResp,
    out: &mut Vec<OutboundAttribute>,
) -> ImvResult<()> {
    let nonce_len = params.responder_nonce.len();
    let min_nonce_len = PTS_MIN_NONCE_LEN.max(ctx.min_nonce_len);
    if nonce_len < min_nonce_len || nonce_len > PTS_MAX_NONCE_LEN {
        info!(
            "PTS-IMC nonce length {} outside of [{}, {}]",
            nonce_len, min_nonce_len, PTS_MAX_NONCE_LEN
        );
        out.push(OutboundAttribute::PaTncError(PaTncError::dh_nonce_error(
            min_nonce_len as u16,
            PTS_MAX_NONCE_LEN as u16,
        )));
        return Ok(());
    }

    let group = DhGroup::try_from(params.dh_group)
        .ok()
        .filter(|_| ctx.supported_dh_groups.contains(params.dh_group))
        .ok_or(ImvError::UnsupportedDhGroup(params.dh_group))?;

    let Some(hash_algorithm) = MeasAlgorithm::select(ctx.supported_algorithms, params.hash_algo_set)
    else {
        info!(
            "PTS-IMC offered no supported DH hash algorithm in {:?}",
            params.hash_algo_set
        );
        out.push(OutboundAttribute::PaTncError(PaTncError::hash_alg_error(
            ctx.supported_algorithms,
        )));
        return Ok(());
    };
    debug!("DH group {} with hash algorithm {}", group, hash_algorithm);

    let local = ctx
        .dh
        .generate(group, nonce_len)
        .map_err(ImvError::DhNonce)?;

    let transcript = state.dh_mut();
    transcript.set_parameters(group, hash_algorithm);
    transcript.set_local(local);
    transcript.set_peer(&params.responder_nonce, &params.responder_value);
    transcript.calculate_secret().map_err(ImvError::Secret)?;
    debug!("secret assessment value computed");
    Ok(())
}
