// Licensed under the Apache-2.0 license

use crate::context::ImvContext;
use crate::error::{ImvError, ImvResult};
use crate::state::AttestationState;
use crate::trust::verify_aik;
use pts_common::message::Aik;

pub(crate) fn handle_aik(
    ctx: &ImvContext,
    state: &mut AttestationState,
    aik: Option<&Aik>,
) -> ImvResult<()> {
    let aik = aik.ok_or(ImvError::AikUnavailable)?;
    if !verify_aik(aik, ctx.trust_store) {
        return Err(ImvError::AikUntrusted);
    }
    state.set_aik(aik.clone());
    Ok(())
}
