//! Per-port inputs and pipeline state.

use std::fmt;

use super::{LatencyMode, OutputStage};
use crate::{Clocked, ClockedRegister};

/// One of the two independent access ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum PortId {
    /// Port A.
    A,
    /// Port B.
    B,
}

impl PortId {
    /// Both ports in evaluation order.
    pub const ALL: [Self; 2] = [Self::A, Self::B];

    /// Array index of this port.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

impl fmt::Display for PortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => f.write_str("A"),
            Self::B => f.write_str("B"),
        }
    }
}

/// Inputs presented on one port for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PortInput {
    /// Cell address, `0..depth`.
    pub address: usize,
    /// Write `write_data` to `address` after the read.
    pub write_enable: bool,
    /// Data written when `write_enable` is set.
    pub write_data: u64,
    /// Port enable; when low the port does nothing and its read-data
    /// register holds.
    pub enable: bool,
    /// Enable of the high-performance output register.
    pub output_enable: bool,
}

impl Default for PortInput {
    fn default() -> Self {
        Self::read(0)
    }
}

impl PortInput {
    /// Read of `address` with every enable asserted.
    #[must_use]
    pub const fn read(address: usize) -> Self {
        Self {
            address,
            write_enable: false,
            write_data: 0,
            enable: true,
            output_enable: true,
        }
    }

    /// Read-then-write of `address` with every enable asserted.
    #[must_use]
    pub const fn write(address: usize, data: u64) -> Self {
        Self {
            address,
            write_enable: true,
            write_data: data,
            enable: true,
            output_enable: true,
        }
    }

    /// An idle port: enable low, nothing read or written.
    #[must_use]
    pub const fn idle() -> Self {
        Self::read(0).disabled()
    }

    /// Same inputs with the port enable deasserted.
    #[must_use]
    pub const fn disabled(mut self) -> Self {
        self.enable = false;
        self
    }

    /// Same inputs with the output-register enable set to `enable`.
    #[must_use]
    pub const fn with_output_enable(mut self, enable: bool) -> Self {
        self.output_enable = enable;
        self
    }

    /// Whether this input writes the array.
    #[must_use]
    pub const fn writes(&self) -> bool {
        self.enable && self.write_enable
    }
}

/// Values a port presents after a tick commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PortOutput {
    /// Read-data register: the cell value read on the most recent enabled tick.
    pub read_data: u64,
    /// Port output after the latency stage.
    pub data_out: u64,
}

/// Read pipeline of one port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortPipeline {
    read_data: ClockedRegister<u64>,
    stage: OutputStage,
}

impl PortPipeline {
    /// Creates a cleared pipeline for `mode`.
    #[must_use]
    pub const fn new(mode: LatencyMode) -> Self {
        Self {
            read_data: ClockedRegister::new(0),
            stage: OutputStage::new(mode),
        }
    }

    /// Current outputs.
    #[must_use]
    pub const fn output(&self) -> PortOutput {
        PortOutput {
            read_data: self.read_data.value(),
            data_out: self.stage.output(self.read_data.value()),
        }
    }

    /// Drives the pipeline: `read` is this tick's cell value, or `None` when
    /// the port is disabled.
    pub fn drive(&mut self, read: Option<u64>, output_enable: bool) {
        self.stage.drive(self.read_data.value(), output_enable);
        match read {
            Some(value) => self.read_data.drive(value),
            None => self.read_data.hold(),
        }
    }

    /// Asserts reset on the output stage; the read-data register keeps its value.
    pub fn assert_reset(&mut self) {
        self.stage.assert_reset();
    }

    /// Releases reset on the output stage.
    pub fn release_reset(&mut self) {
        self.stage.release_reset();
    }

    pub(crate) const fn stage_value(&self) -> u64 {
        self.stage.register_value()
    }

    pub(crate) fn restore(&mut self, read_data: u64, stage: u64) {
        self.read_data.force(read_data);
        self.stage.restore(stage);
    }
}

impl Clocked for PortPipeline {
    fn update(&mut self) {
        self.read_data.update();
        self.stage.update();
    }
}
