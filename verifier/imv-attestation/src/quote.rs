// Licensed under the Apache-2.0 license

use crate::hasher::{hash_all, HashError};
use crate::pcr::{PcrBank, PCR_SELECT_SIZE};
use pts_common::message::QuoteVariant;
use pts_common::protocol::{MeasAlgorithm, MeasAlgorithms};
use thiserror::Error;
use zerocopy::byteorder::network_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

// TPM_STRUCT_VER 1.1.0.0
const TPM_STRUCT_VER_1_1: [u8; 4] = [1, 1, 0, 0];
const TPM_QUOTE_FIXED: [u8; 4] = *b"QUOT";
const TPM_QUOTE2_FIXED: [u8; 4] = *b"QUT2";
const TPM_TAG_QUOTE_INFO2: u16 = 0x0036;
const TPM_LOC_ZERO: u8 = 0x01;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    #[error("no PCR values recorded")]
    NoPcrs,
    #[error("secret assessment value not available")]
    NoSecret,
    #[error("TPM version info not available")]
    NoVersionInfo,
    #[error("invalid PCR composite hash algorithm {0:?}")]
    CompositeHash(MeasAlgorithms),
    #[error(transparent)]
    Hash(#[from] HashError),
}

pub type QuoteResult<T> = Result<T, QuoteError>;

// TPM_PCR_SELECTION
#[derive(FromBytes, IntoBytes, Immutable, KnownLayout, Debug)]
#[repr(C)]
struct PcrSelection {
    size_of_select: U16,
    select: [u8; PCR_SELECT_SIZE],
}

// TPM_PCR_COMPOSITE up to the PCR values
#[derive(FromBytes, IntoBytes, Immutable, KnownLayout, Debug)]
#[repr(C)]
struct PcrCompositeHeader {
    select: PcrSelection,
    value_size: U32,
}

// TPM_QUOTE_INFO up to the composite digest
#[derive(FromBytes, IntoBytes, Immutable, KnownLayout, Debug)]
#[repr(C)]
struct QuoteInfoHeader {
    version: [u8; 4],
    fixed: [u8; 4],
}

// TPM_QUOTE_INFO2 up to the external data
#[derive(FromBytes, IntoBytes, Immutable, KnownLayout, Debug)]
#[repr(C)]
struct QuoteInfo2Header {
    tag: U16,
    fixed: [u8; 4],
}

impl PcrSelection {
    fn new(pcrs: &PcrBank) -> Self {
        Self {
            size_of_select: U16::new(PCR_SELECT_SIZE as u16),
            select: pcrs.selection(),
        }
    }
}

/// Locally reconstructed quote structures.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteInfo {
    pub pcr_composite: Vec<u8>,
    pub quote_info: Vec<u8>,
}

/// Serializes the TPM_PCR_COMPOSITE over every recorded PCR.
pub fn pcr_composite(pcrs: &PcrBank) -> QuoteResult<Vec<u8>> {
    if pcrs.is_empty() {
        return Err(QuoteError::NoPcrs);
    }
    let value_size: usize = pcrs.values().map(<[u8]>::len).sum();
    let header = PcrCompositeHeader {
        select: PcrSelection::new(pcrs),
        value_size: U32::new(value_size as u32),
    };

    let mut composite = header.as_bytes().to_vec();
    for value in pcrs.values() {
        composite.extend_from_slice(value);
    }
    Ok(composite)
}

/// Rebuilds the PCR composite and the quote info the AIK should have signed.
///
/// `comp_hash_algorithm` digests the composite. The version info is only
/// used by [`QuoteVariant::QuoteInfo2CapVer`].
pub fn construct_quote_info(
    pcrs: &PcrBank,
    variant: QuoteVariant,
    comp_hash_algorithm: MeasAlgorithm,
    secret: Option<&[u8]>,
    tpm_version_info: Option<&[u8]>,
) -> QuoteResult<QuoteInfo> {
    let secret = secret.ok_or(QuoteError::NoSecret)?;
    let pcr_composite = pcr_composite(pcrs)?;
    let digest = hash_all(comp_hash_algorithm, &[&pcr_composite])?;

    let mut quote_info = Vec::new();
    if variant.uses_quote2() {
        let header = QuoteInfo2Header {
            tag: U16::new(TPM_TAG_QUOTE_INFO2),
            fixed: TPM_QUOTE2_FIXED,
        };
        quote_info.extend_from_slice(header.as_bytes());
        quote_info.extend_from_slice(secret);
        quote_info.extend_from_slice(PcrSelection::new(pcrs).as_bytes());
        quote_info.push(TPM_LOC_ZERO);
        quote_info.extend_from_slice(&digest);
        if variant.uses_version_info() {
            let version_info = tpm_version_info.ok_or(QuoteError::NoVersionInfo)?;
            quote_info.extend_from_slice(version_info);
        }
    } else {
        let header = QuoteInfoHeader {
            version: TPM_STRUCT_VER_1_1,
            fixed: TPM_QUOTE_FIXED,
        };
        quote_info.extend_from_slice(header.as_bytes());
        quote_info.extend_from_slice(&digest);
        quote_info.extend_from_slice(secret);
    }

    Ok(QuoteInfo {
        pcr_composite,
        quote_info,
    })
}
