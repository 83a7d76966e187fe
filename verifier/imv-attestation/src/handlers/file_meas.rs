// Licensed under the Apache-2.0 license

use crate::context::ImvContext;
use crate::error::ImvResult;
use crate::measurement::{check_file_measurements, verify_file_measurements};
use crate::state::AttestationState;
use log::{info, warn};
use pts_common::message::FileMeasurements;

pub(crate) fn handle_file_meas(
    ctx: &ImvContext,
    state: &mut AttestationState,
    measurements: &FileMeasurements,
) -> ImvResult<()> {
    let (Some(pts_db), Some(platform_info), Some(algorithm)) =
        (ctx.pts_db, state.platform_info(), state.meas_algorithm())
    else {
        warn!(
            "file measurements not checked: pts database {}, platform info {}, measurement algorithm {}",
            availability(ctx.pts_db.is_some()),
            availability(state.platform_info().is_some()),
            availability(state.meas_algorithm().is_some())
        );
        return Ok(());
    };
    let platform_info = platform_info.to_string();

    let request_id = measurements.request_id;
    let file_count = measurements.file_count();
    info!(
        "measurement request {} returned {} file{}:",
        request_id,
        file_count,
        if file_count == 1 { "" } else { "s" }
    );

    let success = if request_id != 0 {
        let Some(request) = state.check_off_file_meas_request(request_id) else {
            info!("  no entry found for file measurement request {}", request_id);
            return Ok(());
        };
        let expected = pts_db.file_hashes(&platform_info, algorithm, request.file_id, request.is_dir);
        verify_file_measurements(measurements, &expected, request.is_dir)
    } else {
        let baseline = pts_db.platform_hashes(&platform_info, algorithm);
        check_file_measurements(measurements, &baseline)
    };

    if !success {
        state.set_measurement_error();
    }
    Ok(())
}

fn availability(available: bool) -> &'static str {
    if available {
        "available"
    } else {
        "not available"
    }
}
