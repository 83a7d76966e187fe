// Licensed under the Apache-2.0 license

use crate::error::{ImvError, ImvResult};
use crate::quote::{construct_quote_info, QuoteError};
use crate::state::AttestationState;
use constant_time_eq::constant_time_eq;
use log::{debug, info};
use pts_common::message::{QuoteVariant, SimpleEvidFinal};
use pts_common::protocol::MeasAlgorithm;

pub(crate) fn handle_simple_evid_final(
    state: &mut AttestationState,
    evidence: &SimpleEvidFinal,
) -> ImvResult<()> {
    if let Some(signature) = &evidence.evidence_signature {
        // Evidence signature verification is not implemented.
        info!(
            "evidence signature of {} bytes ignored",
            signature.len()
        );
    }

    if evidence.quote_variant == QuoteVariant::None {
        debug!("final evidence carries no TPM quote");
        return Ok(());
    }

    let comp_hash_algorithm = MeasAlgorithm::try_from(evidence.comp_hash_algorithm)
        .map_err(|_| QuoteError::CompositeHash(evidence.comp_hash_algorithm))?;
    let quote = construct_quote_info(
        state.pcrs(),
        evidence.quote_variant,
        comp_hash_algorithm,
        state.dh().secret(),
        state.tpm_version_info(),
    )?;

    if !constant_time_eq(&quote.pcr_composite, &evidence.pcr_composite) {
        return Err(ImvError::PcrCompositeMismatch);
    }

    let aik = state.aik().ok_or(ImvError::AikUnavailable)?;
    if !aik
        .public_key()
        .verify(&quote.quote_info, &evidence.tpm_quote_signature)
    {
        return Err(ImvError::QuoteSignature);
    }
    info!("TPM Quote Info signature verification successful");

    state.finalize_components();
    Ok(())
}
