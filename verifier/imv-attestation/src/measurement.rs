// Licensed under the Apache-2.0 license

use crate::database::BaselineHash;
use std::collections::BTreeMap;
use log::{debug, info, warn};
use pts_common::message::{FileMeasurement, FileMeasurements};

/// Checks the measurements answering a single request against the expected
/// hashes of the requested file or directory.
///
/// Every expected file must be reported with one of its expected hashes. For
/// a directory, entries are matched by filename.
///
/// # Returns
/// * `bool` - True if no expected file is missing or mismatching.
pub fn verify_file_measurements(
    measurements: &FileMeasurements,
    expected: &[BaselineHash],
    is_dir: bool,
) -> bool {
    if expected.is_empty() {
        warn!(
            "no baseline hashes for measurement request {}",
            measurements.request_id
        );
        return true;
    }

    let mut accepted: BTreeMap<&str, Vec<&[u8]>> = BTreeMap::new();
    for baseline in expected {
        accepted
            .entry(baseline.filename.as_str())
            .or_default()
            .push(baseline.hash.as_slice());
    }

    let mut success = true;
    for (filename, hashes) in accepted {
        let reported = measurements
            .entries
            .iter()
            .find(|entry| !is_dir || entry.filename == filename);
        match reported {
            None => {
                info!("  {} not reported", filename);
                success = false;
            }
            Some(entry) if !hashes.contains(&entry.measurement.as_slice()) => {
                info!(
                    "  {} measurement {} does not match any of {} baseline hashes",
                    entry.filename,
                    hex::encode(&entry.measurement),
                    hashes.len()
                );
                success = false;
            }
            Some(entry) => debug!("  {} measurement matches baseline", entry.filename),
        }
    }
    success
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineStatus {
    Match,
    Mismatch,
    NotFound,
}

/// Looks up a single reported entry by filename in the platform baseline.
pub fn baseline_status(entry: &FileMeasurement, baseline: &[BaselineHash]) -> BaselineStatus {
    let mut status = BaselineStatus::NotFound;
    for candidate in baseline.iter().filter(|b| b.filename == entry.filename) {
        if candidate.hash == entry.measurement {
            return BaselineStatus::Match;
        }
        status = BaselineStatus::Mismatch;
    }
    status
}

/// Compares an unsolicited measurement against the whole platform baseline.
///
/// Filenames absent from the baseline are logged only.
///
/// # Returns
/// * `bool` - True if no reported file mismatches its baseline.
pub fn check_file_measurements(measurements: &FileMeasurements, baseline: &[BaselineHash]) -> bool {
    let mut success = true;
    for entry in &measurements.entries {
        match baseline_status(entry, baseline) {
            BaselineStatus::Match => debug!("  {} measurement matches baseline", entry.filename),
            BaselineStatus::NotFound => info!("  {} not found in baseline", entry.filename),
            BaselineStatus::Mismatch => {
                info!(
                    "  {} measurement {} does not match baseline",
                    entry.filename,
                    hex::encode(&entry.measurement)
                );
                success = false;
            }
        }
    }
    success
}
