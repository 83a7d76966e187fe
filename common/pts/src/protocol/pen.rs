// Licensed under the Apache-2.0 license

use core::fmt;
use num_enum::TryFromPrimitive;
use strum_macros::Display;

/// IANA Private Enterprise Number of the IETF.
pub const PEN_IETF: u32 = 0x000000;

/// IANA Private Enterprise Number of the Trusted Computing Group.
pub const PEN_TCG: u32 = 0x005597;

/// Largest vendor id encodable in the 24-bit PEN field.
pub const PEN_MAX: u32 = 0xffffff;

/// Attribute or error type qualified by the vendor that defines it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PenType {
    pub vendor_id: u32,
    pub type_id: u32,
}

impl PenType {
    pub const fn new(vendor_id: u32, type_id: u32) -> Self {
        Self { vendor_id, type_id }
    }

    pub const fn tcg(attr: TcgAttrType) -> Self {
        Self::new(PEN_TCG, attr as u32)
    }

    pub const fn ietf(attr: IetfAttrType) -> Self {
        Self::new(PEN_IETF, attr as u32)
    }

    /// Returns the TCG attribute type if this is a known TCG PTS type.
    pub fn tcg_attr(&self) -> Option<TcgAttrType> {
        if self.vendor_id != PEN_TCG {
            return None;
        }
        TcgAttrType::try_from(self.type_id).ok()
    }
}

impl fmt::Display for PenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.vendor_id {
            PEN_TCG => match self.tcg_attr() {
                Some(attr) => write!(f, "TCG/{}", attr),
                None => write!(f, "TCG/{:#010x}", self.type_id),
            },
            PEN_IETF => match IetfAttrType::try_from(self.type_id) {
                Ok(attr) => write!(f, "IETF/{}", attr),
                Err(_) => write!(f, "IETF/{:#010x}", self.type_id),
            },
            vendor_id => write!(f, "{:#08x}/{:#010x}", vendor_id, self.type_id),
        }
    }
}

/// TCG PTS attribute types, IF-M binding.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u32)]
pub enum TcgAttrType {
    #[strum(serialize = "Request Functional Component Evidence")]
    ReqFuncCompEvid = 0x0010_0000,
    #[strum(serialize = "Generate Attestation Evidence")]
    GenAttestEvid = 0x0020_0000,
    #[strum(serialize = "Simple Component Evidence")]
    SimpleCompEvid = 0x0030_0000,
    #[strum(serialize = "Simple Evidence Final")]
    SimpleEvidFinal = 0x0040_0000,
    #[strum(serialize = "Verification Result")]
    VerificationResult = 0x0050_0000,
    #[strum(serialize = "Integrity Report")]
    IntegReport = 0x0060_0000,
    #[strum(serialize = "Request File Metadata")]
    ReqFileMeta = 0x0070_0000,
    #[strum(serialize = "Windows-Style File Metadata")]
    WinFileMeta = 0x0080_0000,
    #[strum(serialize = "Unix-Style File Metadata")]
    UnixFileMeta = 0x0090_0000,
    #[strum(serialize = "Request Registry Value")]
    ReqRegistryValue = 0x00A0_0000,
    #[strum(serialize = "Registry Value")]
    RegistryValue = 0x00B0_0000,
    #[strum(serialize = "Request File Measurement")]
    ReqFileMeas = 0x00C0_0000,
    #[strum(serialize = "File Measurement")]
    FileMeas = 0x00D0_0000,
    #[strum(serialize = "Request Integrity Measurement Log")]
    ReqIntegMeasLog = 0x00E0_0000,
    #[strum(serialize = "Integrity Measurement Log")]
    IntegMeasLog = 0x00F0_0000,
    #[strum(serialize = "Request PTS Protocol Capabilities")]
    ReqProtoCaps = 0x0100_0000,
    #[strum(serialize = "PTS Protocol Capabilities")]
    ProtoCaps = 0x0200_0000,
    #[strum(serialize = "DH Nonce Parameters Request")]
    DhNonceParamsReq = 0x0300_0000,
    #[strum(serialize = "DH Nonce Parameters Response")]
    DhNonceParamsResp = 0x0400_0000,
    #[strum(serialize = "DH Nonce Finish")]
    DhNonceFinish = 0x0500_0000,
    #[strum(serialize = "PTS Measurement Algorithm Request")]
    MeasAlgo = 0x0600_0000,
    #[strum(serialize = "PTS Measurement Algorithm Response")]
    MeasAlgoSelection = 0x0700_0000,
    #[strum(serialize = "Get TPM Version Information")]
    GetTpmVersionInfo = 0x0800_0000,
    #[strum(serialize = "TPM Version Information")]
    TpmVersionInfo = 0x0900_0000,
    #[strum(serialize = "Request Template Reference Manifest Set Metadata")]
    ReqTemplRefManiSetMeta = 0x0A00_0000,
    #[strum(serialize = "Template Reference Manifest Set Metadata")]
    TemplRefManiSetMeta = 0x0B00_0000,
    #[strum(serialize = "Update Template Reference Manifest")]
    UpdateTemplRefMani = 0x0C00_0000,
    #[strum(serialize = "Get Attestation Identity Key")]
    GetAik = 0x0D00_0000,
    #[strum(serialize = "Attestation Identity Key")]
    Aik = 0x0E00_0000,
}

/// IETF PA-TNC attribute types used by the verifier.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u32)]
pub enum IetfAttrType {
    #[strum(serialize = "Attribute Request")]
    AttributeRequest = 1,
    #[strum(serialize = "Product Information")]
    ProductInfo = 2,
    #[strum(serialize = "Numeric Version")]
    NumericVersion = 3,
    #[strum(serialize = "String Version")]
    StringVersion = 4,
    #[strum(serialize = "Operational Status")]
    OpStatus = 5,
    #[strum(serialize = "Port Filter")]
    PortFilter = 6,
    #[strum(serialize = "Installed Packages")]
    InstalledPackages = 7,
    #[strum(serialize = "PA-TNC Error")]
    PaTncError = 8,
    #[strum(serialize = "Assessment Result")]
    AssessmentResult = 9,
    #[strum(serialize = "Remediation Instructions")]
    RemediationInstructions = 10,
}
