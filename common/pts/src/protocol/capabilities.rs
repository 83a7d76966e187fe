// Licensed under the Apache-2.0 license

use bitflags::bitflags;

bitflags! {
    /// PTS protocol capability flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ProtoCaps: u32 {
        /// XML based evidence support
        const XML = 1 << 0;
        /// Trusted platform evidence
        const TRUSTED = 1 << 1;
        /// DH nonce negotiation support
        const DH_NONCE = 1 << 2;
        /// Verification support
        const VERIFICATION = 1 << 3;
        /// Current (in-memory) evidence support
        const CURRENT = 1 << 4;
    }
}
