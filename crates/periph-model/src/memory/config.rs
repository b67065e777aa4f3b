//! Construction-time configuration for the dual-port memory block.

use std::fmt;
use std::str::FromStr;

use crate::bits::MAX_WORD_WIDTH;
use crate::ModelError;

/// Default number of cells.
pub const DEFAULT_DEPTH: usize = 1024;
/// Default word width in bits.
pub const DEFAULT_WORD_WIDTH: u8 = 32;

/// Read-output pipeline depth, selected once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum LatencyMode {
    /// Port output is the read-data register: one tick address-to-output.
    #[default]
    LowLatency,
    /// One more registered stage after the read-data register: two ticks.
    HighPerformance,
}

impl LatencyMode {
    /// Canonical configuration string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LowLatency => "LOW_LATENCY",
            Self::HighPerformance => "HIGH_PERFORMANCE",
        }
    }

    /// Ticks from presenting an address to seeing its data on the port output.
    #[must_use]
    pub const fn read_latency(self) -> u8 {
        match self {
            Self::LowLatency => 1,
            Self::HighPerformance => 2,
        }
    }
}

impl fmt::Display for LatencyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LatencyMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "LOW_LATENCY" => Ok(Self::LowLatency),
            "HIGH_PERFORMANCE" => Ok(Self::HighPerformance),
            _ => Err(ModelError::InvalidConfig(format!(
                "unknown latency mode {s:?}, expected LOW_LATENCY or HIGH_PERFORMANCE"
            ))),
        }
    }
}

/// Shape of a [`DualPortRam`](crate::DualPortRam).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MemoryConfig {
    /// Number of addressable cells.
    pub depth: usize,
    /// Bits per cell, `1..=64`.
    pub word_width: u8,
    /// Output pipeline configuration.
    pub latency: LatencyMode,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            word_width: DEFAULT_WORD_WIDTH,
            latency: LatencyMode::LowLatency,
        }
    }
}

impl MemoryConfig {
    /// Checks the configuration before any storage is allocated.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] for a zero depth or a word width
    /// outside `1..=64`.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.depth == 0 {
            return Err(ModelError::InvalidConfig(
                "memory depth must be at least one cell".into(),
            ));
        }
        if self.word_width == 0 || self.word_width > MAX_WORD_WIDTH {
            return Err(ModelError::InvalidConfig(format!(
                "word width {} is outside 1..={MAX_WORD_WIDTH}",
                self.word_width
            )));
        }
        Ok(())
    }
}

/// Initial contents of the memory array.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum MemoryInit {
    /// Every cell starts at zero.
    #[default]
    Zero,
    /// Every cell starts at the same value.
    Fill(u64),
    /// Explicit contents; must hold exactly `depth` cells.
    Image(Vec<u64>),
}
