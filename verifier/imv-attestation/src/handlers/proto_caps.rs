// Licensed under the Apache-2.0 license

use crate::error::ImvResult;
use crate::state::AttestationState;
use log::debug;
use pts_common::protocol::ProtoCaps;

pub(crate) fn handle_proto_caps(state: &mut AttestationState, caps: ProtoCaps) -> ImvResult<()> {
    debug!("PTS-IMC protocol capabilities {:?}", caps);
    state.set_proto_caps(caps);
    Ok(())
}
