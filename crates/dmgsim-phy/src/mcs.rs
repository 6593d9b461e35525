//! Modulation and coding schemes.
//!
//! This module provides:
//! - [`McsIndex`] - Totally ordered MCS identifier (supports `12.1`-style indices)
//! - [`Modulation`] - SC modulation and its coded bits per block
//! - [`Mcs`] - A single scheme entry
//! - [`McsTable`] - Immutable index → scheme lookup, loaded once per process

use crate::error::PhyError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

// ============================================================================
// MCS Index
// ============================================================================

/// MCS identifier stored as tenths, so `12.1` and `12` compare exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct McsIndex(u16);

impl McsIndex {
    /// Create an index from its integer part and tenth digit (`12.1` → `new(12, 1)`).
    pub const fn new(major: u16, minor: u16) -> Self {
        Self(major * 10 + minor)
    }

    /// Convert from a decimal index such as `9.1`.
    ///
    /// Returns `None` for negative, non-finite or out-of-range values.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let tenths = (value * 10.0).round();
        if tenths > u16::MAX as f64 {
            return None;
        }
        Some(Self(tenths as u16))
    }

    /// Decimal representation of the index.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 10.0
    }
}

impl fmt::Display for McsIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 10 == 0 {
            write!(f, "{}", self.0 / 10)
        } else {
            write!(f, "{}.{}", self.0 / 10, self.0 % 10)
        }
    }
}

impl Serialize for McsIndex {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_f64())
    }
}

struct McsIndexVisitor;

impl<'de> Visitor<'de> for McsIndexVisitor {
    type Value = McsIndex;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative MCS index such as 12 or 12.1")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<McsIndex, E> {
        self.visit_f64(v as f64)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<McsIndex, E> {
        self.visit_f64(v as f64)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<McsIndex, E> {
        McsIndex::from_f64(v).ok_or_else(|| E::custom(format!("invalid MCS index {}", v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<McsIndex, E> {
        let parsed: f64 = v
            .trim()
            .parse()
            .map_err(|_| E::custom(format!("invalid MCS index '{}'", v)))?;
        self.visit_f64(parsed)
    }
}

impl<'de> Deserialize<'de> for McsIndex {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(McsIndexVisitor)
    }
}

// ============================================================================
// Modulation
// ============================================================================

/// SC PHY modulation, identified by its modulation rate (coded bits per symbol).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Modulation {
    /// π/2-BPSK, rate 1.
    Bpsk,
    /// π/2-QPSK, rate 2.
    Qpsk,
    /// π/2-16QAM, rate 4.
    Qam16,
    /// π/2-64QAM, rate 6.
    Qam64,
}

impl Modulation {
    /// Modulation rate (coded bits per symbol).
    pub const fn rate(&self) -> u8 {
        match self {
            Modulation::Bpsk => 1,
            Modulation::Qpsk => 2,
            Modulation::Qam16 => 4,
            Modulation::Qam64 => 6,
        }
    }

    /// Coded bits per SC block (N_CBPB).
    pub const fn coded_bits_per_block(&self) -> u64 {
        match self {
            Modulation::Bpsk => 448,
            Modulation::Qpsk => 896,
            Modulation::Qam16 => 1792,
            Modulation::Qam64 => 2688,
        }
    }
}

impl TryFrom<u8> for Modulation {
    type Error = PhyError;

    fn try_from(rate: u8) -> Result<Self, Self::Error> {
        match rate {
            1 => Ok(Modulation::Bpsk),
            2 => Ok(Modulation::Qpsk),
            4 => Ok(Modulation::Qam16),
            6 => Ok(Modulation::Qam64),
            other => Err(PhyError::InvalidModulationRate(other)),
        }
    }
}

impl From<Modulation> for u8 {
    fn from(modulation: Modulation) -> Self {
        modulation.rate()
    }
}

// ============================================================================
// MCS Table
// ============================================================================

/// A single modulation and coding scheme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Mcs {
    /// Scheme index.
    pub mcs: McsIndex,
    /// Modulation.
    #[serde(rename = "modulation_rate")]
    pub modulation: Modulation,
    /// LDPC code rate.
    pub code_rate: f64,
}

/// Immutable MCS lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct McsTable {
    entries: BTreeMap<McsIndex, Mcs>,
}

impl Default for McsTable {
    /// The 802.11ad SC PHY schemes (MCS 1–12 plus the 802.11-2016 extensions).
    fn default() -> Self {
        use Modulation::*;
        let rows = [
            (McsIndex::new(1, 0), Bpsk, 0.5),
            (McsIndex::new(2, 0), Bpsk, 0.5),
            (McsIndex::new(3, 0), Bpsk, 0.625),
            (McsIndex::new(4, 0), Bpsk, 0.75),
            (McsIndex::new(5, 0), Bpsk, 0.8125),
            (McsIndex::new(6, 0), Qpsk, 0.5),
            (McsIndex::new(7, 0), Qpsk, 0.625),
            (McsIndex::new(8, 0), Qpsk, 0.75),
            (McsIndex::new(9, 0), Qpsk, 0.8125),
            (McsIndex::new(9, 1), Qpsk, 0.875),
            (McsIndex::new(10, 0), Qam16, 0.5),
            (McsIndex::new(11, 0), Qam16, 0.625),
            (McsIndex::new(12, 0), Qam16, 0.75),
            (McsIndex::new(12, 1), Qam16, 0.8125),
            (McsIndex::new(12, 2), Qam16, 0.875),
            (McsIndex::new(12, 3), Qam64, 0.625),
            (McsIndex::new(12, 4), Qam64, 0.75),
            (McsIndex::new(12, 5), Qam64, 0.8125),
            (McsIndex::new(12, 6), Qam64, 0.875),
        ];
        let entries = rows
            .into_iter()
            .map(|(mcs, modulation, code_rate)| {
                (mcs, Mcs { mcs, modulation, code_rate })
            })
            .collect();
        Self { entries }
    }
}

impl McsTable {
    /// Build a table from a list of schemes, rejecting duplicates and bad code rates.
    pub fn from_entries(list: Vec<Mcs>) -> Result<Self, PhyError> {
        let mut entries = BTreeMap::new();
        for entry in list {
            if !(entry.code_rate > 0.0 && entry.code_rate <= 1.0) {
                return Err(PhyError::InvalidTable(format!(
                    "MCS {} has code rate {} outside (0, 1]",
                    entry.mcs, entry.code_rate
                )));
            }
            if entries.insert(entry.mcs, entry).is_some() {
                return Err(PhyError::InvalidTable(format!("duplicate MCS {}", entry.mcs)));
            }
        }
        if entries.is_empty() {
            return Err(PhyError::InvalidTable("MCS table is empty".to_string()));
        }
        Ok(Self { entries })
    }

    /// Parse a YAML list of `{mcs, modulation_rate, code_rate}` entries.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PhyError> {
        let list: Vec<Mcs> = serde_yaml::from_str(yaml)?;
        Self::from_entries(list)
    }

    /// Load a YAML table from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PhyError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Look up a scheme.
    pub fn get(&self, mcs: McsIndex) -> Result<&Mcs, PhyError> {
        self.entries.get(&mcs).ok_or(PhyError::UnknownMcs(mcs))
    }

    /// Iterate over the schemes in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = &Mcs> {
        self.entries.values()
    }

    /// Number of schemes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty (never true for a constructed table).
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
