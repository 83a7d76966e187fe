// Licensed under the Apache-2.0 license

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PtsError {
    #[error("invalid attribute type {vendor_id:#08x}/{type_id:#010x}")]
    InvalidAttrType { vendor_id: u32, type_id: u32 },
    #[error("invalid measurement algorithm {0:#06x}")]
    InvalidMeasAlgorithm(u16),
    #[error("invalid DH group {0:#06x}")]
    InvalidDhGroup(u16),
    #[error("invalid quote info flags {0:#04x}")]
    InvalidQuoteFlags(u8),
    #[error("unknown algorithm name '{0}'")]
    UnknownAlgorithmName(String),
}
