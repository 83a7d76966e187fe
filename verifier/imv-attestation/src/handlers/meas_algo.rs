// Licensed under the Apache-2.0 license

use crate::context::ImvContext;
use crate::error::{ImvError, ImvResult};
use crate::state::AttestationState;
use log::debug;
use pts_common::protocol::{MeasAlgorithm, MeasAlgorithms};

pub(crate) fn handle_meas_algo_selection(
    ctx: &ImvContext,
    state: &mut AttestationState,
    selected: MeasAlgorithms,
) -> ImvResult<()> {
    let algorithm = MeasAlgorithm::try_from(selected)
        .ok()
        .filter(|_| ctx.supported_algorithms.contains(selected))
        .ok_or(ImvError::UnsupportedMeasAlgorithm(selected))?;

    debug!("PTS-IMC selected measurement algorithm {}", algorithm);
    state.set_meas_algorithm(algorithm);
    Ok(())
}
