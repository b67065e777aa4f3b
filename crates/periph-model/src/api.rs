//! Host-facing contracts for embedding the model.

use crate::{BusError, GpioConfig, GpioSnapshot, MemoryConfig, MemorySnapshot, ModelError};

/// Result categories for register-bus writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum BusWriteResult {
    /// Write was staged and takes effect at the next tick.
    Applied,
    /// Register is read-only; nothing was staged.
    DeniedReadOnly,
}

/// Word-wide memory-mapped register access.
pub trait RegisterBus {
    /// Reads the register at byte `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Misaligned`] for an offset that is not a multiple
    /// of four and [`BusError::Unmapped`] for one past the register map.
    fn read32(&mut self, offset: u32) -> Result<u32, BusError>;

    /// Writes the register at byte `offset`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::read32`].
    fn write32(&mut self, offset: u32, value: u32) -> Result<BusWriteResult, BusError>;
}

/// Top-level configuration of a [`PeripheralModel`](crate::PeripheralModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ModelConfig {
    /// GPIO reset values and interrupt enables.
    pub gpio: GpioConfig,
    /// Memory shape and latency mode.
    pub memory: MemoryConfig,
}

/// Stable snapshot wire-version identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u16)]
pub enum SnapshotVersion {
    /// Initial schema revision.
    #[default]
    V1 = 1,
}

impl SnapshotVersion {
    /// Converts wire value to known snapshot version.
    #[must_use]
    pub const fn from_u16(version: u16) -> Option<Self> {
        match version {
            1 => Some(Self::V1),
            _ => None,
        }
    }

    /// Wire value of this version.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for SnapshotVersion {
    type Error = ModelError;

    fn try_from(version: u16) -> Result<Self, Self::Error> {
        Self::from_u16(version).ok_or_else(|| {
            ModelError::InvalidConfig(format!("unsupported snapshot version {version}"))
        })
    }
}

/// Serializable full-state snapshot used for save/restore and replay fixtures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ModelSnapshot {
    /// Snapshot schema version.
    pub version: SnapshotVersion,
    /// Number of committed ticks.
    pub cycle: u64,
    /// GPIO registers.
    pub gpio: GpioSnapshot,
    /// Memory array and port pipelines.
    pub memory: MemorySnapshot,
}
