// Licensed under the Apache-2.0 license

use crate::error::ImvResult;
use chrono::DateTime;
use log::info;
use pts_common::message::FileMetadata;

pub(crate) fn handle_unix_file_meta(metadata: &[FileMetadata]) -> ImvResult<()> {
    let file_count = metadata.len();
    info!(
        "metadata request returned {} file{}:",
        file_count,
        if file_count == 1 { "" } else { "s" }
    );
    for entry in metadata {
        info!(
            "  '{}' ({} file) size {} owner {} group {}",
            entry.filename, entry.file_type, entry.filesize, entry.owner, entry.group
        );
        info!(
            "    created {}, modified {}, accessed {}",
            format_time(entry.created),
            format_time(entry.modified),
            format_time(entry.accessed)
        );
    }
    Ok(())
}

fn format_time(secs: i64) -> String {
    match DateTime::from_timestamp(secs, 0) {
        Some(time) => time.format("%b %d %H:%M:%S %Y UTC").to_string(),
        None => format!("{} (invalid)", secs),
    }
}
