// Licensed under the Apache-2.0 license

pub mod algorithms;
pub mod capabilities;
pub mod pen;
pub mod pts_error;

pub use algorithms::*;
pub use capabilities::*;
pub use pen::*;
pub use pts_error::*;

/// Lower bound on the nonce length either side of the DH nonce exchange may use.
pub const PTS_MIN_NONCE_LEN: usize = 16;

/// Upper bound on the nonce length; the length field on the wire is one byte.
pub const PTS_MAX_NONCE_LEN: usize = 0xff;

/// Number of PCRs addressable in a PCR selection.
pub const PTS_PCR_MAX_NUM: u32 = 24;

/// Size of the TPM external data (nonce) fed into a quote.
pub const TPM_NONCE_SIZE: usize = 20;
