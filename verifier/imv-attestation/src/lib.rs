// Licensed under the Apache-2.0 license

// Common errors
pub mod error;

// Verifier configuration
pub mod config;

// Attribute dispatch and verifier context
pub mod context;
pub(crate) mod handlers;

// Per-endpoint attestation state
pub mod state;

// Hash algorithms
pub mod hasher;

// DH nonce agreement
pub mod dh;

// AIK trust chain
pub mod trust;

// Measurement baseline and file measurement checks
pub mod database;
pub mod measurement;

// Functional components and PCR bookkeeping
pub mod component;
pub mod pcr;

// TPM quote reconstruction
pub mod quote;

pub use context::{ImvContext, Verdict};
pub use state::{AttestationResult, AttestationState};
