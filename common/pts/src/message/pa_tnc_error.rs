// Licensed under the Apache-2.0 license

use crate::protocol::{
    IetfAttrType, MeasAlgorithms, PenType, PtsErrorCode, PEN_MAX, PEN_TCG,
};
use zerocopy::byteorder::network_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes};

#[derive(Debug, FromBytes, IntoBytes, Immutable)]
#[repr(C)]
pub struct PaTncErrorHeader {
    pub reserved: u8,
    pub vendor_id: [u8; 3],
    pub error_code: U32,
}

/// Error information of a bad nonce length error.
#[derive(Debug, FromBytes, IntoBytes, Immutable)]
#[repr(C)]
pub struct NonceLengthErrorInfo {
    pub min_nonce_len: U16,
    pub max_nonce_len: U16,
}

/// Error information of an unsupported hash algorithm error.
#[derive(Debug, FromBytes, IntoBytes, Immutable)]
#[repr(C)]
pub struct HashAlgErrorInfo {
    pub reserved: U16,
    pub algorithms: U16,
}

/// PA-TNC error attribute reported back to the peer.
#[derive(Debug, Clone, PartialEq)]
pub struct PaTncError {
    error_code: PenType,
    info: Vec<u8>,
}

impl PaTncError {
    pub fn new(error_code: PenType, info: Vec<u8>) -> Self {
        Self { error_code, info }
    }

    /// Bad nonce length error carrying the acceptable `[min, max]` range.
    pub fn dh_nonce_error(min_nonce_len: u16, max_nonce_len: u16) -> Self {
        let info = NonceLengthErrorInfo {
            min_nonce_len: U16::new(min_nonce_len),
            max_nonce_len: U16::new(max_nonce_len),
        };
        Self::new(
            PenType::new(PEN_TCG, PtsErrorCode::BadNonceLength.into()),
            info.as_bytes().to_vec(),
        )
    }

    /// Unsupported hash algorithm error carrying the locally supported set.
    pub fn hash_alg_error(algorithms: MeasAlgorithms) -> Self {
        let info = HashAlgErrorInfo {
            reserved: U16::new(0),
            algorithms: U16::new(algorithms.bits()),
        };
        Self::new(
            PenType::new(PEN_TCG, PtsErrorCode::HashAlgNotSupported.into()),
            info.as_bytes().to_vec(),
        )
    }

    pub fn error_code(&self) -> PenType {
        self.error_code
    }

    pub fn info(&self) -> &[u8] {
        &self.info
    }

    /// Encodes the attribute value.
    pub fn build(&self) -> Vec<u8> {
        let vendor_id = (self.error_code.vendor_id & PEN_MAX).to_be_bytes();
        let header = PaTncErrorHeader {
            reserved: 0,
            vendor_id: [vendor_id[1], vendor_id[2], vendor_id[3]],
            error_code: U32::new(self.error_code.type_id),
        };
        let mut value = Vec::with_capacity(core::mem::size_of::<PaTncErrorHeader>() + self.info.len());
        value.extend_from_slice(header.as_bytes());
        value.extend_from_slice(&self.info);
        value
    }

    pub const fn attr_type() -> PenType {
        PenType::ietf(IetfAttrType::PaTncError)
    }
}
