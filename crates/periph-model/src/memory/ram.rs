//! Dual-port memory core with read-first, write-after-read ports.

use super::access::{validate_address, validate_port_input};
use super::{
    LatencyMode, MemoryConfig, MemoryInit, PortId, PortInput, PortOutput, PortPipeline,
};
use crate::bits::fit_word;
use crate::{Clocked, ModelError};

/// How two same-tick accesses to one address overlapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum CollisionKind {
    /// Both ports wrote the address.
    WriteWrite,
    /// One port read the address while the other wrote it.
    ReadWrite,
}

/// A same-address dual-port access with at least one write.
///
/// The outcome of a collision is unspecified. This model evaluates both
/// reads against the start-of-tick array and then applies port A's write
/// before port B's, but callers must not rely on that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Collision {
    /// Address both ports targeted.
    pub address: usize,
    /// Which accesses overlapped.
    pub kind: CollisionKind,
}

impl Collision {
    /// Classifies a pair of port inputs; `None` when they do not collide.
    #[must_use]
    pub const fn between(a: &PortInput, b: &PortInput) -> Option<Self> {
        if !(a.enable && b.enable) || a.address != b.address {
            return None;
        }
        let kind = match (a.writes(), b.writes()) {
            (true, true) => CollisionKind::WriteWrite,
            (true, false) | (false, true) => CollisionKind::ReadWrite,
            (false, false) => return None,
        };
        Some(Self {
            address: a.address,
            kind,
        })
    }
}

/// Values both ports present after a simultaneous tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MemoryOutputs {
    /// Port A outputs.
    pub a: PortOutput,
    /// Port B outputs.
    pub b: PortOutput,
    /// Same-address hazard observed on this tick, if any.
    pub collision: Option<Collision>,
}

/// Full state of a [`DualPortRam`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MemorySnapshot {
    /// Every cell in address order.
    pub cells: Vec<u64>,
    /// Read-data register of port A then port B.
    pub read_data: [u64; 2],
    /// High-performance output register of port A then port B.
    pub output_stage: [u64; 2],
}

/// Fixed-depth memory array shared by two independent ports.
#[derive(Debug, Clone)]
pub struct DualPortRam {
    config: MemoryConfig,
    cells: Box<[u64]>,
    ports: [PortPipeline; 2],
    pending_writes: [Option<(usize, u64)>; 2],
}

impl DualPortRam {
    /// Creates a zero-filled memory.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] when `config` fails
    /// [`MemoryConfig::validate`].
    pub fn new(config: MemoryConfig) -> Result<Self, ModelError> {
        Self::with_init(config, MemoryInit::Zero)
    }

    /// Creates a memory seeded from `init`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] for an invalid shape or an image
    /// whose length differs from the depth, and
    /// [`ModelError::WidthMismatch`] for a seed value wider than a word.
    pub fn with_init(config: MemoryConfig, init: MemoryInit) -> Result<Self, ModelError> {
        config.validate()?;
        let cells = match init {
            MemoryInit::Zero => vec![0; config.depth],
            MemoryInit::Fill(value) => vec![fit_word(value, config.word_width)?; config.depth],
            MemoryInit::Image(image) => {
                if image.len() != config.depth {
                    return Err(ModelError::InvalidConfig(format!(
                        "initializer holds {} cells, memory depth is {}",
                        image.len(),
                        config.depth
                    )));
                }
                for value in &image {
                    fit_word(*value, config.word_width)?;
                }
                image
            }
        };
        Ok(Self::from_cells(config, cells.into_boxed_slice()))
    }

    /// Creates a memory whose cell `i` starts at `init(i)`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::with_init`].
    pub fn with_init_fn(
        config: MemoryConfig,
        init: impl FnMut(usize) -> u64,
    ) -> Result<Self, ModelError> {
        config.validate()?;
        let image = (0..config.depth).map(init).collect();
        Self::with_init(config, MemoryInit::Image(image))
    }

    fn from_cells(config: MemoryConfig, cells: Box<[u64]>) -> Self {
        tracing::debug!(
            depth = config.depth,
            word_width = config.word_width,
            latency = %config.latency,
            "dual-port memory created"
        );
        Self {
            config,
            cells,
            ports: [PortPipeline::new(config.latency); 2],
            pending_writes: [None; 2],
        }
    }

    /// Configuration this memory was built with.
    #[must_use]
    pub const fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Configured latency mode.
    #[must_use]
    pub const fn latency(&self) -> LatencyMode {
        self.config.latency
    }

    /// Every cell in address order.
    #[must_use]
    pub const fn cells(&self) -> &[u64] {
        &self.cells
    }

    /// Reads a cell without clocking either port.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::OutOfRange`] when `address >= depth`.
    pub fn peek(&self, address: usize) -> Result<u64, ModelError> {
        let address = validate_address(address, self.config.depth)?;
        Ok(self.cells[address])
    }

    /// Current outputs of `port`.
    #[must_use]
    pub const fn port_output(&self, port: PortId) -> PortOutput {
        self.ports[port.index()].output()
    }

    /// Validates both ports' inputs without touching any state.
    ///
    /// # Errors
    ///
    /// See [`validate_port_input`].
    pub fn validate(&self, a: &PortInput, b: &PortInput) -> Result<(), ModelError> {
        validate_port_input(a, &self.config)?;
        validate_port_input(b, &self.config)
    }

    fn drive_port(&mut self, port: PortId, input: &PortInput) {
        let idx = port.index();
        self.pending_writes[idx] = None;
        let read = if input.enable {
            let value = self.cells[input.address];
            if input.write_enable {
                self.pending_writes[idx] = Some((input.address, input.write_data));
            }
            Some(value)
        } else {
            None
        };
        self.ports[idx].drive(read, input.output_enable);
    }

    fn commit_port(&mut self, port: PortId) {
        let idx = port.index();
        if let Some((address, data)) = self.pending_writes[idx].take() {
            tracing::trace!(%port, address, data, "memory write");
            self.cells[address] = data;
        }
        self.ports[idx].update();
    }

    /// Drive phase for a simultaneous tick of both ports.
    ///
    /// Both reads see the array as of the start of the tick.
    ///
    /// # Errors
    ///
    /// Fails before driving anything when either input is invalid.
    pub fn drive(&mut self, a: &PortInput, b: &PortInput) -> Result<Option<Collision>, ModelError> {
        self.validate(a, b)?;
        let collision = Collision::between(a, b);
        if let Some(collision) = collision {
            tracing::warn!(
                address = collision.address,
                kind = ?collision.kind,
                "dual-port same-address access, result is unspecified"
            );
        }
        self.drive_port(PortId::A, a);
        self.drive_port(PortId::B, b);
        Ok(collision)
    }

    /// Clocks both ports on the same edge.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure; nothing is committed in that case.
    pub fn tick(&mut self, a: &PortInput, b: &PortInput) -> Result<MemoryOutputs, ModelError> {
        let collision = self.drive(a, b)?;
        self.update();
        Ok(MemoryOutputs {
            a: self.port_output(PortId::A),
            b: self.port_output(PortId::B),
            collision,
        })
    }

    /// Clocks a single port in its own clock domain.
    ///
    /// The read-first, write-after-read rule applies within this port's tick
    /// alone; the other port is not clocked.
    ///
    /// # Errors
    ///
    /// Returns the validation failure for `input`; nothing is committed.
    pub fn access(&mut self, port: PortId, input: &PortInput) -> Result<PortOutput, ModelError> {
        validate_port_input(input, &self.config)?;
        self.drive_port(port, input);
        self.commit_port(port);
        Ok(self.port_output(port))
    }

    /// Asserts reset on both ports' output stages; the array is untouched.
    pub fn assert_reset(&mut self) {
        tracing::debug!("memory reset asserted");
        for port in &mut self.ports {
            port.assert_reset();
        }
    }

    /// Releases reset on both ports.
    pub fn release_reset(&mut self) {
        tracing::debug!("memory reset released");
        for port in &mut self.ports {
            port.release_reset();
        }
    }

    /// Captures the array and both port pipelines.
    #[must_use]
    pub fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            cells: self.cells.to_vec(),
            read_data: self.ports.map(|port| port.output().read_data),
            output_stage: self.ports.map(|port| port.stage_value()),
        }
    }

    /// Loads the array and both pipelines from `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] when the cell count differs from
    /// the depth and [`ModelError::WidthMismatch`] when any value is wider
    /// than a word. Nothing is loaded on failure.
    pub fn restore(&mut self, snapshot: &MemorySnapshot) -> Result<(), ModelError> {
        if snapshot.cells.len() != self.config.depth {
            return Err(ModelError::InvalidConfig(format!(
                "snapshot holds {} cells, memory depth is {}",
                snapshot.cells.len(),
                self.config.depth
            )));
        }
        let width = self.config.word_width;
        for value in snapshot
            .cells
            .iter()
            .chain(&snapshot.read_data)
            .chain(&snapshot.output_stage)
        {
            fit_word(*value, width)?;
        }

        self.cells.copy_from_slice(&snapshot.cells);
        for (idx, port) in self.ports.iter_mut().enumerate() {
            port.restore(snapshot.read_data[idx], snapshot.output_stage[idx]);
        }
        self.pending_writes = [None; 2];
        Ok(())
    }
}

impl Clocked for DualPortRam {
    fn update(&mut self) {
        for port in PortId::ALL {
            self.commit_port(port);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Collision, CollisionKind, DualPortRam};
    use crate::memory::{LatencyMode, MemoryConfig, MemoryInit, PortId, PortInput};
    use crate::{Clocked, ModelError};

    fn small(latency: LatencyMode) -> MemoryConfig {
        MemoryConfig {
            depth: 8,
            word_width: 16,
            latency,
        }
    }

    #[test]
    fn read_returns_value_before_same_tick_write() {
        let mut ram = DualPortRam::with_init_fn(small(LatencyMode::LowLatency), |i| {
            if i == 5 {
                0x1111
            } else {
                0
            }
        })
        .expect("valid config");

        let out = ram
            .access(PortId::A, &PortInput::write(5, 0x2222))
            .expect("valid access");
        assert_eq!(out.read_data, 0x1111);
        assert_eq!(ram.peek(5), Ok(0x2222));

        let out = ram.access(PortId::A, &PortInput::read(5)).expect("valid access");
        assert_eq!(out.data_out, 0x2222);
    }

    #[test]
    fn simultaneous_tick_reads_start_of_tick_array() {
        let mut ram = DualPortRam::with_init(small(LatencyMode::LowLatency), MemoryInit::Fill(7))
            .expect("valid config");
        let out = ram
            .tick(&PortInput::write(3, 1), &PortInput::read(3))
            .expect("valid tick");
        assert_eq!(out.a.read_data, 7);
        assert_eq!(out.b.read_data, 7);
        assert_eq!(
            out.collision,
            Some(Collision {
                address: 3,
                kind: CollisionKind::ReadWrite
            })
        );
        assert_eq!(ram.peek(3), Ok(1));
    }

    #[test]
    fn write_write_collision_leaves_other_cells_alone() {
        let mut ram = DualPortRam::with_init_fn(small(LatencyMode::LowLatency), |i| i as u64)
            .expect("valid config");
        let out = ram
            .tick(&PortInput::write(2, 0xAAAA), &PortInput::write(2, 0xBBBB))
            .expect("valid tick");
        assert_eq!(out.collision.map(|c| c.kind), Some(CollisionKind::WriteWrite));

        let cell = ram.peek(2).expect("in range");
        assert!(cell == 0xAAAA || cell == 0xBBBB);
        for addr in (0..8).filter(|addr| *addr != 2) {
            assert_eq!(ram.peek(addr), Ok(addr as u64));
        }
    }

    #[test]
    fn redrive_before_update_replaces_pending_write() {
        let mut ram = DualPortRam::new(small(LatencyMode::LowLatency)).expect("valid config");
        ram.drive(&PortInput::write(1, 0x55), &PortInput::idle()).expect("valid drive");
        ram.drive(&PortInput::read(1), &PortInput::idle()).expect("valid drive");
        ram.update();
        assert_eq!(ram.peek(1), Ok(0));

        ram.drive(&PortInput::write(2, 0x66), &PortInput::write(3, 0x77)).expect("valid drive");
        ram.drive(&PortInput::idle(), &PortInput::write(3, 0x77).disabled())
            .expect("valid drive");
        ram.update();
        assert_eq!(ram.peek(2), Ok(0));
        assert_eq!(ram.peek(3), Ok(0));
    }

    #[test]
    fn disjoint_or_read_only_accesses_do_not_collide() {
        assert_eq!(
            Collision::between(&PortInput::write(1, 0), &PortInput::write(2, 0)),
            None
        );
        assert_eq!(
            Collision::between(&PortInput::read(1), &PortInput::read(1)),
            None
        );
        assert_eq!(
            Collision::between(&PortInput::write(1, 0), &PortInput::write(1, 0).disabled()),
            None
        );
    }

    #[test]
    fn disabled_port_skips_read_and_write() {
        let mut ram = DualPortRam::with_init(small(LatencyMode::LowLatency), MemoryInit::Fill(3))
            .expect("valid config");
        ram.access(PortId::B, &PortInput::read(0)).expect("valid");
        let out = ram
            .access(PortId::B, &PortInput::write(1, 9).disabled())
            .expect("valid");
        assert_eq!(out.read_data, 3);
        assert_eq!(ram.peek(1), Ok(3));
    }

    #[test]
    fn invalid_tick_commits_nothing() {
        let mut ram = DualPortRam::new(small(LatencyMode::LowLatency)).expect("valid config");
        let before = ram.snapshot();
        assert_eq!(
            ram.tick(&PortInput::write(0, 1), &PortInput::read(8)),
            Err(ModelError::OutOfRange {
                address: 8,
                depth: 8
            })
        );
        assert_eq!(
            ram.tick(&PortInput::write(0, 0x1_0000), &PortInput::read(0)),
            Err(ModelError::WidthMismatch {
                value: 0x1_0000,
                width: 16
            })
        );
        assert_eq!(ram.snapshot(), before);
    }

    #[test]
    fn initializer_must_match_depth_and_width() {
        let config = small(LatencyMode::LowLatency);
        assert!(matches!(
            DualPortRam::with_init(config, MemoryInit::Image(vec![0; 7])),
            Err(ModelError::InvalidConfig(_))
        ));
        assert_eq!(
            DualPortRam::with_init(config, MemoryInit::Fill(0x1_0000)).map(|_| ()),
            Err(ModelError::WidthMismatch {
                value: 0x1_0000,
                width: 16
            })
        );
        assert!(DualPortRam::new(MemoryConfig {
            depth: 0,
            ..config
        })
        .is_err());
    }

    #[test]
    fn high_performance_reset_clears_output_but_not_array() {
        let mut ram = DualPortRam::with_init(
            small(LatencyMode::HighPerformance),
            MemoryInit::Fill(0x42),
        )
        .expect("valid config");
        ram.access(PortId::A, &PortInput::read(0)).expect("valid");
        let out = ram.access(PortId::A, &PortInput::read(0)).expect("valid");
        assert_eq!(out.data_out, 0x42);

        ram.assert_reset();
        assert_eq!(ram.port_output(PortId::A).data_out, 0);
        assert_eq!(ram.peek(0), Ok(0x42));

        ram.release_reset();
        let out = ram.access(PortId::A, &PortInput::read(0)).expect("valid");
        assert_eq!(out.data_out, 0x42);
    }

    #[test]
    fn snapshot_restore_round_trips_and_validates() {
        let mut ram = DualPortRam::new(small(LatencyMode::HighPerformance)).expect("valid");
        ram.tick(&PortInput::write(1, 0xAB), &PortInput::write(2, 0xCD))
            .expect("valid");
        ram.tick(&PortInput::read(1), &PortInput::read(2)).expect("valid");
        ram.tick(&PortInput::read(2), &PortInput::read(1)).expect("valid");
        let snapshot = ram.snapshot();
        assert_eq!(snapshot.read_data, [0xCD, 0xAB]);
        assert_eq!(snapshot.output_stage, [0xAB, 0xCD]);

        let mut other = DualPortRam::new(small(LatencyMode::HighPerformance)).expect("valid");
        other.restore(&snapshot).expect("compatible snapshot");
        assert_eq!(other.snapshot(), snapshot);

        let mut short = snapshot.clone();
        short.cells.pop();
        assert!(matches!(
            other.restore(&short),
            Err(ModelError::InvalidConfig(_))
        ));
    }
}
