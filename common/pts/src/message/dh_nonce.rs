// Licensed under the Apache-2.0 license

use crate::protocol::{DhGroups, MeasAlgorithms};

/// Decoded DH Nonce Parameters Response sent by the attested endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct DhNonceParamsResp {
    /// Group selected by the peer; a single flag is expected.
    pub dh_group: DhGroups,
    /// Hash algorithms the peer is able to use for the secret.
    pub hash_algo_set: MeasAlgorithms,
    pub responder_nonce: Vec<u8>,
    pub responder_value: Vec<u8>,
}
