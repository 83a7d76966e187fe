// Licensed under the Apache-2.0 license

use crate::message::{
    Aik, ComponentEvidence, DhNonceParamsResp, FileMeasurements, FileMetadata, PaTncError,
    SimpleEvidFinal,
};
use crate::protocol::{MeasAlgorithms, PenType, ProtoCaps, TcgAttrType};

/// Payload of a decoded inbound attribute.
///
/// Kinds the verifier acts on carry their decoded body. Other TCG PTS kinds
/// are `Unsupported`, anything else is `Unknown`.
#[derive(Debug, Clone)]
pub enum PtsAttribute {
    ProtoCaps(ProtoCaps),
    MeasAlgoSelection(MeasAlgorithms),
    DhNonceParamsResp(DhNonceParamsResp),
    TpmVersionInfo(Vec<u8>),
    /// `None` when the attribute held no usable key or certificate.
    Aik(Option<Aik>),
    FileMeas(FileMeasurements),
    UnixFileMeta(Vec<FileMetadata>),
    SimpleCompEvid(ComponentEvidence),
    SimpleEvidFinal(SimpleEvidFinal),
    Unsupported(TcgAttrType),
    Unknown(PenType),
}

impl PtsAttribute {
    pub fn attr_type(&self) -> PenType {
        let tcg_type = match self {
            PtsAttribute::ProtoCaps(_) => TcgAttrType::ProtoCaps,
            PtsAttribute::MeasAlgoSelection(_) => TcgAttrType::MeasAlgoSelection,
            PtsAttribute::DhNonceParamsResp(_) => TcgAttrType::DhNonceParamsResp,
            PtsAttribute::TpmVersionInfo(_) => TcgAttrType::TpmVersionInfo,
            PtsAttribute::Aik(_) => TcgAttrType::Aik,
            PtsAttribute::FileMeas(_) => TcgAttrType::FileMeas,
            PtsAttribute::UnixFileMeta(_) => TcgAttrType::UnixFileMeta,
            PtsAttribute::SimpleCompEvid(_) => TcgAttrType::SimpleCompEvid,
            PtsAttribute::SimpleEvidFinal(_) => TcgAttrType::SimpleEvidFinal,
            PtsAttribute::Unsupported(tcg_type) => *tcg_type,
            PtsAttribute::Unknown(pen_type) => return *pen_type,
        };
        PenType::tcg(tcg_type)
    }

    /// Classifies an attribute type the decoder produced no body for.
    pub fn without_body(pen_type: PenType) -> Self {
        match pen_type.tcg_attr() {
            Some(tcg_type) => PtsAttribute::Unsupported(tcg_type),
            None => PtsAttribute::Unknown(pen_type),
        }
    }
}

/// Inbound attribute handed over by the attribute decoder.
#[derive(Debug, Clone)]
pub struct Attribute {
    body: PtsAttribute,
    value: Vec<u8>,
    noskip: bool,
}

impl Attribute {
    pub fn new(body: PtsAttribute, value: Vec<u8>, noskip: bool) -> Self {
        Self {
            body,
            value,
            noskip,
        }
    }

    pub fn get_type(&self) -> PenType {
        self.body.attr_type()
    }

    /// Raw attribute value as received.
    pub fn get_value(&self) -> &[u8] {
        &self.value
    }

    pub fn get_noskip_flag(&self) -> bool {
        self.noskip
    }

    pub fn body(&self) -> &PtsAttribute {
        &self.body
    }
}

impl From<PtsAttribute> for Attribute {
    fn from(body: PtsAttribute) -> Self {
        Self::new(body, Vec::new(), false)
    }
}

/// Attribute queued for the peer.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundAttribute {
    PaTncError(PaTncError),
}

impl OutboundAttribute {
    pub fn get_type(&self) -> PenType {
        match self {
            OutboundAttribute::PaTncError(_) => PaTncError::attr_type(),
        }
    }

    pub fn get_noskip_flag(&self) -> bool {
        false
    }

    pub fn build(&self) -> Vec<u8> {
        match self {
            OutboundAttribute::PaTncError(error) => error.build(),
        }
    }
}
