// Licensed under the Apache-2.0 license

use strum_macros::Display;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileType {
    #[default]
    #[strum(serialize = "unknown")]
    Unknown,
    #[strum(serialize = "fifo")]
    Fifo,
    #[strum(serialize = "character special")]
    CharSpecial,
    #[strum(serialize = "directory")]
    Directory,
    #[strum(serialize = "block special")]
    BlockSpecial,
    #[strum(serialize = "regular")]
    Regular,
    #[strum(serialize = "symbolic link")]
    SymLink,
    #[strum(serialize = "socket")]
    Socket,
}

/// One entry of a Unix-Style File Metadata attribute. Times are seconds
/// since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileMetadata {
    pub filename: String,
    pub file_type: FileType,
    pub filesize: u64,
    pub created: i64,
    pub modified: i64,
    pub accessed: i64,
    pub owner: u64,
    pub group: u64,
}
