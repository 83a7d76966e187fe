// Licensed under the Apache-2.0 license

use crate::error::ImvResult;
use crate::state::AttestationState;
use log::{debug, info};
use pts_common::message::ComponentEvidence;

pub(crate) fn handle_simple_comp_evid(
    state: &mut AttestationState,
    evidence: &ComponentEvidence,
) -> ImvResult<()> {
    let result = {
        let (components, pcrs) = state.components_and_pcrs();
        let Some(component) = components.lookup(&evidence.name) else {
            info!("  no entry found for component evidence request {}", evidence.name);
            return Ok(());
        };
        component.verify(evidence.qualifier, pcrs, evidence)
    };

    match result {
        Ok(()) => debug!(
            "component {} evidence at depth {} verified",
            evidence.name, evidence.depth
        ),
        Err(err) => {
            info!(
                "component {} evidence at depth {} failed: {}",
                evidence.name, evidence.depth, err
            );
            state.set_measurement_error();
        }
    }
    Ok(())
}
