// Licensed under the Apache-2.0 license

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// TCG PTS error codes carried in PA-TNC error attributes.
#[derive(Debug, PartialEq, Eq, Clone, Copy, IntoPrimitive, TryFromPrimitive)]
#[repr(u32)]
pub enum PtsErrorCode {
    Reserved = 0x01,
    HashAlgNotSupported = 0x02,
    InvalidPath = 0x03,
    FileNotFound = 0x04,
    RegistryNotSupported = 0x05,
    RegistryKeyNotFound = 0x06,
    DhGroupsNotSupported = 0x07,
    BadNonceLength = 0x08,
    InvalidNameFamily = 0x09,
    TpmVersionNotSupported = 0x0A,
    InvalidDelimiter = 0x0B,
    OperationNotSupported = 0x0C,
    RmError = 0x0D,
    UnableLocalValidation = 0x0E,
    UnableCurrentEvidence = 0x0F,
    UnableDetermineTtc = 0x10,
    UnableDeterminePcr = 0x11,
}
