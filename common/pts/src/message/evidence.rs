// Licensed under the Apache-2.0 license

use crate::error::PtsError;
use crate::protocol::{MeasAlgorithm, MeasAlgorithms};
use bitfield::bitfield;
use core::fmt;

/// Functional component name, unique per vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentName {
    pub vendor_id: u32,
    pub name: u32,
}

impl ComponentName {
    pub const fn new(vendor_id: u32, name: u32) -> Self {
        Self { vendor_id, name }
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#08x}/{}", self.vendor_id, self.name)
    }
}

// Component functional name qualifier
bitfield! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Qualifier(u8);
    impl Debug;
    u8;
    pub kernel, set_kernel: 5, 5;
    pub sub_component, set_sub_component: 4, 4;
    pub comp_type, set_comp_type: 3, 0;
}

impl Qualifier {
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(&self) -> u8 {
        self.0
    }
}

/// Decoded Simple Component Evidence attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentEvidence {
    pub name: ComponentName,
    pub qualifier: Qualifier,
    pub depth: u32,
    /// PCR extended by this measurement, if any.
    pub extended_pcr: Option<u32>,
    pub hash_algorithm: MeasAlgorithm,
    pub measurement: Vec<u8>,
    pub pcr_before: Vec<u8>,
    pub pcr_after: Vec<u8>,
}

/// Quote structure variant announced by the Simple Evidence Final flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteVariant {
    None = 0x00,
    QuoteInfo = 0x40,
    QuoteInfo2 = 0x80,
    QuoteInfo2CapVer = 0xC0,
}

impl QuoteVariant {
    pub const FLAGS_MASK: u8 = 0xC0;
    pub const EVID_SIG_FLAG: u8 = 0x20;

    pub fn uses_quote2(&self) -> bool {
        matches!(self, QuoteVariant::QuoteInfo2 | QuoteVariant::QuoteInfo2CapVer)
    }

    pub fn uses_version_info(&self) -> bool {
        matches!(self, QuoteVariant::QuoteInfo2CapVer)
    }
}

impl TryFrom<u8> for QuoteVariant {
    type Error = PtsError;

    fn try_from(flags: u8) -> Result<Self, Self::Error> {
        if flags & !(Self::FLAGS_MASK | Self::EVID_SIG_FLAG) != 0 {
            return Err(PtsError::InvalidQuoteFlags(flags));
        }
        Ok(match flags & Self::FLAGS_MASK {
            0x40 => QuoteVariant::QuoteInfo,
            0x80 => QuoteVariant::QuoteInfo2,
            0xC0 => QuoteVariant::QuoteInfo2CapVer,
            _ => QuoteVariant::None,
        })
    }
}

/// Decoded Simple Evidence Final attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleEvidFinal {
    pub quote_variant: QuoteVariant,
    /// Hash algorithm the peer used over the PCR composite.
    pub comp_hash_algorithm: MeasAlgorithms,
    pub pcr_composite: Vec<u8>,
    pub tpm_quote_signature: Vec<u8>,
    /// Signature over the whole evidence exchange, if present.
    pub evidence_signature: Option<Vec<u8>>,
}
