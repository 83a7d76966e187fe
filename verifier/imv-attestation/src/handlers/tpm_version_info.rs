// Licensed under the Apache-2.0 license

use crate::error::ImvResult;
use crate::state::AttestationState;
use log::debug;

pub(crate) fn handle_tpm_version_info(state: &mut AttestationState, info: &[u8]) -> ImvResult<()> {
    debug!("TPM version info {}", hex::encode(info));
    state.set_tpm_version_info(info);
    Ok(())
}
