// Licensed under the Apache-2.0 license

use pts_common::protocol::PTS_PCR_MAX_NUM;
use std::collections::BTreeMap;
use thiserror::Error;

// Bytes in a PCR selection bitmap covering PTS_PCR_MAX_NUM registers.
pub const PCR_SELECT_SIZE: usize = (PTS_PCR_MAX_NUM as usize).div_ceil(8);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PcrError {
    #[error("PCR {0} out of range")]
    InvalidIndex(u32),
    #[error("PCR {0} value before extension does not match recorded value")]
    BeforeMismatch(u32),
}

pub type PcrResult<T> = Result<T, PcrError>;

/// PCR values reconstructed from component evidence.
#[derive(Debug, Default, Clone)]
pub struct PcrBank {
    registers: BTreeMap<u32, Vec<u8>>,
}

impl PcrBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the extension of PCR `index` from `before` to `after`.
    pub fn add_pcr(&mut self, index: u32, before: &[u8], after: &[u8]) -> PcrResult<()> {
        if index >= PTS_PCR_MAX_NUM {
            return Err(PcrError::InvalidIndex(index));
        }
        if let Some(current) = self.registers.get(&index) {
            if current.as_slice() != before {
                return Err(PcrError::BeforeMismatch(index));
            }
        }
        self.registers.insert(index, after.to_vec());
        Ok(())
    }

    pub fn get(&self, index: u32) -> Option<&[u8]> {
        self.registers.get(&index).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.registers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    /// Selection bitmap, PCR `i` in bit `i % 8` of byte `i / 8`.
    pub fn selection(&self) -> [u8; PCR_SELECT_SIZE] {
        let mut select = [0u8; PCR_SELECT_SIZE];
        for index in self.registers.keys() {
            select[*index as usize / 8] |= 1 << (index % 8);
        }
        select
    }

    /// Recorded values in ascending index order.
    pub fn values(&self) -> impl Iterator<Item = &[u8]> {
        self.registers.values().map(Vec::as_slice)
    }
}
