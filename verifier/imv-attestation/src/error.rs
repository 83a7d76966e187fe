// Licensed under the Apache-2.0 license

use crate::dh::DhError;
use crate::quote::QuoteError;
use pts_common::protocol::{DhGroups, MeasAlgorithms};
use thiserror::Error;

/// Reasons for aborting an attribute batch. None of these are reported to
/// the peer.
#[derive(Error, Debug)]
pub enum ImvError {
    #[error("PTS-IMC selected unsupported measurement algorithm {0:?}")]
    UnsupportedMeasAlgorithm(MeasAlgorithms),
    #[error("PTS-IMC selected unsupported DH group {0:?}")]
    UnsupportedDhGroup(DhGroups),
    #[error("DH nonce creation failed: {0}")]
    DhNonce(#[source] DhError),
    #[error("secret assessment value computation failed: {0}")]
    Secret(#[source] DhError),
    #[error("AIK unavailable")]
    AikUnavailable,
    #[error("AIK certificate is not trusted")]
    AikUntrusted,
    #[error("unable to construct TPM Quote Info: {0}")]
    QuoteInfo(#[from] QuoteError),
    #[error("received PCR Composite does not match constructed one")]
    PcrCompositeMismatch,
    #[error("TPM Quote Info signature verification failed")]
    QuoteSignature,
    #[error("session was aborted by an earlier attribute")]
    SessionAborted,
}

pub type ImvResult<T> = Result<T, ImvError>;
