// Licensed under the Apache-2.0 license

use crate::error::PtsError;
use bitflags::bitflags;
use core::fmt;
use core::str::FromStr;

// Measurement algorithm priority table, strongest first. Both ends of the
// exchange must walk it in the same order.
pub static MEAS_ALGO_PRIORITY_TABLE: &[MeasAlgorithm] = &[
    MeasAlgorithm::Sha384,
    MeasAlgorithm::Sha256,
    MeasAlgorithm::Sha1,
];

// DH group priority table, strongest first.
pub static DH_GROUP_PRIORITY_TABLE: &[DhGroup] = &[
    DhGroup::Ike20,
    DhGroup::Ike19,
    DhGroup::Ike14,
    DhGroup::Ike5,
    DhGroup::Ike2,
];

pub trait Prioritize<T>
where
    Self: Sized,
    T: Copy + Into<Self>,
{
    /// Picks the first entry of `priority_table` supported by both sides.
    fn prioritize(&self, peer: &Self, priority_table: &[T]) -> Option<T>;
}

bitflags! {
    /// PTS measurement algorithm flag set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MeasAlgorithms: u16 {
        const SHA1 = 1 << 15;
        const SHA256 = 1 << 14;
        const SHA384 = 1 << 13;
    }
}

bitflags! {
    /// PTS Diffie-Hellman group flag set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DhGroups: u16 {
        const IKE2 = 1 << 15;
        const IKE5 = 1 << 14;
        const IKE14 = 1 << 13;
        const IKE19 = 1 << 12;
        const IKE20 = 1 << 11;
    }
}

impl Prioritize<MeasAlgorithm> for MeasAlgorithms {
    fn prioritize(&self, peer: &Self, priority_table: &[MeasAlgorithm]) -> Option<MeasAlgorithm> {
        let common = *self & *peer;
        priority_table
            .iter()
            .copied()
            .find(|&algo| common.contains(algo.into()))
    }
}

/// A single measurement (hash) algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasAlgorithm {
    Sha1,
    Sha256,
    Sha384,
}

impl MeasAlgorithm {
    pub const fn digest_len(&self) -> usize {
        match self {
            MeasAlgorithm::Sha1 => 20,
            MeasAlgorithm::Sha256 => 32,
            MeasAlgorithm::Sha384 => 48,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            MeasAlgorithm::Sha1 => "sha1",
            MeasAlgorithm::Sha256 => "sha256",
            MeasAlgorithm::Sha384 => "sha384",
        }
    }

    /// Selects the strongest algorithm present in both sets.
    pub fn select(supported: MeasAlgorithms, offered: MeasAlgorithms) -> Option<Self> {
        supported.prioritize(&offered, MEAS_ALGO_PRIORITY_TABLE)
    }
}

impl From<MeasAlgorithm> for MeasAlgorithms {
    fn from(algo: MeasAlgorithm) -> Self {
        match algo {
            MeasAlgorithm::Sha1 => MeasAlgorithms::SHA1,
            MeasAlgorithm::Sha256 => MeasAlgorithms::SHA256,
            MeasAlgorithm::Sha384 => MeasAlgorithms::SHA384,
        }
    }
}

impl TryFrom<MeasAlgorithms> for MeasAlgorithm {
    type Error = PtsError;

    /// Accepts a flag set with exactly one known bit set.
    fn try_from(flags: MeasAlgorithms) -> Result<Self, Self::Error> {
        MEAS_ALGO_PRIORITY_TABLE
            .iter()
            .copied()
            .find(|&algo| MeasAlgorithms::from(algo) == flags)
            .ok_or(PtsError::InvalidMeasAlgorithm(flags.bits()))
    }
}

impl FromStr for MeasAlgorithm {
    type Err = PtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" => Ok(MeasAlgorithm::Sha1),
            "sha256" => Ok(MeasAlgorithm::Sha256),
            "sha384" => Ok(MeasAlgorithm::Sha384),
            _ => Err(PtsError::UnknownAlgorithmName(s.to_string())),
        }
    }
}

impl fmt::Display for MeasAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single Diffie-Hellman group, named by its IKE transform id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DhGroup {
    /// 1024-bit MODP
    Ike2,
    /// 1536-bit MODP
    Ike5,
    /// 2048-bit MODP
    Ike14,
    /// 256-bit random ECP (NIST P-256)
    Ike19,
    /// 384-bit random ECP (NIST P-384)
    Ike20,
}

impl DhGroup {
    pub const fn name(&self) -> &'static str {
        match self {
            DhGroup::Ike2 => "modp1024",
            DhGroup::Ike5 => "modp1536",
            DhGroup::Ike14 => "modp2048",
            DhGroup::Ike19 => "ecp256",
            DhGroup::Ike20 => "ecp384",
        }
    }
}

impl From<DhGroup> for DhGroups {
    fn from(group: DhGroup) -> Self {
        match group {
            DhGroup::Ike2 => DhGroups::IKE2,
            DhGroup::Ike5 => DhGroups::IKE5,
            DhGroup::Ike14 => DhGroups::IKE14,
            DhGroup::Ike19 => DhGroups::IKE19,
            DhGroup::Ike20 => DhGroups::IKE20,
        }
    }
}

impl TryFrom<DhGroups> for DhGroup {
    type Error = PtsError;

    /// Accepts a flag set with exactly one known bit set.
    fn try_from(flags: DhGroups) -> Result<Self, Self::Error> {
        DH_GROUP_PRIORITY_TABLE
            .iter()
            .copied()
            .find(|&group| DhGroups::from(group) == flags)
            .ok_or(PtsError::InvalidDhGroup(flags.bits()))
    }
}

impl FromStr for DhGroup {
    type Err = PtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s_lower = s.to_ascii_lowercase();
        DH_GROUP_PRIORITY_TABLE
            .iter()
            .copied()
            .find(|group| group.name() == s_lower)
            .ok_or_else(|| PtsError::UnknownAlgorithmName(s.to_string()))
    }
}

impl fmt::Display for DhGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
