// Licensed under the Apache-2.0 license

use crate::hasher::{hash_all, HashError};
use crate::pcr::{PcrBank, PcrError};
use log::{debug, info};
use pts_common::message::{ComponentEvidence, ComponentName, Qualifier};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("qualifier {0:?} not expected")]
    Qualifier(Qualifier),
    #[error("evidence at depth {0} exceeds the expected measurements")]
    UnexpectedEvidence(u32),
    #[error("measurement {0} does not match the reference value")]
    MeasurementMismatch(usize),
    #[error("PCR {0} value after extension is inconsistent")]
    PcrAfterMismatch(u32),
    #[error(transparent)]
    Pcr(#[from] PcrError),
    #[error(transparent)]
    Hash(#[from] HashError),
}

pub type ComponentResult<T> = Result<T, ComponentError>;

/// Verifier for the evidence of one functional component.
pub trait PtsComponent: Send {
    /// Checks one evidence item, recording any PCR extension it reports.
    fn verify(
        &mut self,
        qualifier: Qualifier,
        pcrs: &mut PcrBank,
        evidence: &ComponentEvidence,
    ) -> ComponentResult<()>;

    /// Closes the measurement round.
    ///
    /// # Returns
    /// * `bool` - True if all expected evidence was received.
    fn finalize(&mut self) -> bool;
}

/// Components whose evidence was requested from the peer.
#[derive(Default)]
pub struct ComponentRegistry {
    components: HashMap<ComponentName, Box<dyn PtsComponent>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `component`, replacing any earlier one with the same name.
    pub fn register(&mut self, name: ComponentName, component: Box<dyn PtsComponent>) {
        self.components.insert(name, component);
    }

    pub fn lookup(&mut self, name: &ComponentName) -> Option<&mut (dyn PtsComponent + 'static)> {
        self.components.get_mut(name).map(|component| component.as_mut())
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Finalizes and removes every registered component.
    ///
    /// # Returns
    /// * `bool` - True if every component received all expected evidence.
    pub fn finalize(&mut self) -> bool {
        let mut complete = true;
        for (name, mut component) in self.components.drain() {
            if !component.finalize() {
                info!("component {} is missing evidence", name);
                complete = false;
            }
        }
        complete
    }
}

impl core::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.components.keys()).finish()
    }
}

/// Compares evidence against an ordered list of reference measurements.
#[derive(Debug, Clone)]
pub struct ReferenceComponent {
    qualifier: Qualifier,
    expected: Vec<Vec<u8>>,
    seen: usize,
}

impl ReferenceComponent {
    pub fn new(qualifier: Qualifier, expected: Vec<Vec<u8>>) -> Self {
        Self {
            qualifier,
            expected,
            seen: 0,
        }
    }
}

impl PtsComponent for ReferenceComponent {
    fn verify(
        &mut self,
        qualifier: Qualifier,
        pcrs: &mut PcrBank,
        evidence: &ComponentEvidence,
    ) -> ComponentResult<()> {
        if qualifier != self.qualifier {
            return Err(ComponentError::Qualifier(qualifier));
        }
        let index = self.seen;
        let expected = self
            .expected
            .get(index)
            .ok_or(ComponentError::UnexpectedEvidence(evidence.depth))?;
        self.seen += 1;
        if *expected != evidence.measurement {
            return Err(ComponentError::MeasurementMismatch(index));
        }

        if let Some(pcr) = evidence.extended_pcr {
            let extended = hash_all(
                evidence.hash_algorithm,
                &[&evidence.pcr_before, &evidence.measurement],
            )?;
            if extended != evidence.pcr_after {
                return Err(ComponentError::PcrAfterMismatch(pcr));
            }
            pcrs.add_pcr(pcr, &evidence.pcr_before, &evidence.pcr_after)?;
            debug!("PCR {} extended with measurement {}", pcr, index);
        }
        Ok(())
    }

    fn finalize(&mut self) -> bool {
        let complete = self.seen == self.expected.len();
        self.seen = 0;
        complete
    }
}
