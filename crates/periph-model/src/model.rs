//! Whole-model composition: one GPIO controller and one dual-port memory
//! advanced on a shared clock.

use crate::{
    BusError, BusWriteResult, Clocked, DualPortRam, Gpio, GpioInputs, GpioOutputs, MemoryInit,
    MemoryOutputs, ModelConfig, ModelError, ModelSnapshot, PortId, PortInput, RegisterBus,
    SnapshotVersion,
};

/// Inputs applied to every component on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ModelInputs {
    /// GPIO pads and register writes.
    pub gpio: GpioInputs,
    /// Memory port A.
    pub port_a: PortInput,
    /// Memory port B.
    pub port_b: PortInput,
}

impl Default for ModelInputs {
    fn default() -> Self {
        Self {
            gpio: GpioInputs::default(),
            port_a: PortInput::idle(),
            port_b: PortInput::idle(),
        }
    }
}

/// Values every component presents after a tick commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ModelOutputs {
    /// GPIO pad and interrupt vectors.
    pub gpio: GpioOutputs,
    /// Both memory ports.
    pub memory: MemoryOutputs,
}

/// A GPIO controller and a dual-port memory sharing one clock.
#[derive(Debug, Clone)]
pub struct PeripheralModel {
    config: ModelConfig,
    gpio: Gpio,
    memory: DualPortRam,
    cycle: u64,
}

impl PeripheralModel {
    /// Builds a model with every register at reset and the array seeded from
    /// `init`.
    ///
    /// # Errors
    ///
    /// Propagates [`DualPortRam::with_init`] failures.
    pub fn new(config: ModelConfig, init: MemoryInit) -> Result<Self, ModelError> {
        Ok(Self {
            config,
            gpio: Gpio::new(config.gpio),
            memory: DualPortRam::with_init(config.memory, init)?,
            cycle: 0,
        })
    }

    /// Rebuilds a model from a snapshot taken under `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] or [`ModelError::WidthMismatch`]
    /// when the snapshot does not fit `config`.
    pub fn from_snapshot(
        config: ModelConfig,
        snapshot: &ModelSnapshot,
    ) -> Result<Self, ModelError> {
        let mut model = Self::new(config, MemoryInit::Zero)?;
        model.memory.restore(&snapshot.memory)?;
        model.gpio.restore(&snapshot.gpio);
        model.cycle = snapshot.cycle;
        tracing::debug!(cycle = model.cycle, "model restored from snapshot");
        Ok(model)
    }

    /// Configuration this model was built with.
    #[must_use]
    pub const fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Number of committed ticks.
    #[must_use]
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// The GPIO controller.
    #[must_use]
    pub const fn gpio(&self) -> &Gpio {
        &self.gpio
    }

    /// The dual-port memory.
    #[must_use]
    pub const fn memory(&self) -> &DualPortRam {
        &self.memory
    }

    /// Current outputs without clocking; no collision is reported.
    #[must_use]
    pub const fn outputs(&self) -> ModelOutputs {
        ModelOutputs {
            gpio: self.gpio.outputs(),
            memory: MemoryOutputs {
                a: self.memory.port_output(PortId::A),
                b: self.memory.port_output(PortId::B),
                collision: None,
            },
        }
    }

    /// Advances every component by one clock edge.
    ///
    /// Writes staged through [`RegisterBus`] since the previous tick are
    /// applied first; requests in `inputs.gpio` of the same kind replace them.
    ///
    /// # Errors
    ///
    /// Returns the memory-port validation failure. On failure nothing is
    /// driven, nothing commits, staged bus writes stay staged and
    /// [`Self::cycle`] does not advance.
    pub fn step(&mut self, inputs: &ModelInputs) -> Result<ModelOutputs, ModelError> {
        let collision = self.memory.drive(&inputs.port_a, &inputs.port_b)?;
        let gpio_inputs = self.gpio.take_staged().merge(inputs.gpio);
        self.gpio.drive(&gpio_inputs);
        self.update();

        let mut outputs = self.outputs();
        outputs.memory.collision = collision;
        tracing::trace!(
            cycle = self.cycle,
            pad_out = outputs.gpio.pad_out,
            interrupt_status = outputs.gpio.interrupt_status,
            "tick committed"
        );
        Ok(outputs)
    }

    /// Asserts reset on every component. The memory array keeps its contents.
    pub fn assert_reset(&mut self) {
        self.gpio.assert_reset();
        self.memory.assert_reset();
    }

    /// Releases reset on every component.
    pub fn release_reset(&mut self) {
        self.gpio.release_reset();
        self.memory.release_reset();
    }

    /// Captures every register and cell.
    #[must_use]
    pub fn snapshot(&self) -> ModelSnapshot {
        ModelSnapshot {
            version: SnapshotVersion::V1,
            cycle: self.cycle,
            gpio: self.gpio.snapshot(),
            memory: self.memory.snapshot(),
        }
    }
}

impl Clocked for PeripheralModel {
    fn update(&mut self) {
        self.gpio.update();
        self.memory.update();
        self.cycle += 1;
    }
}

impl RegisterBus for PeripheralModel {
    fn read32(&mut self, offset: u32) -> Result<u32, BusError> {
        self.gpio.read32(offset)
    }

    fn write32(&mut self, offset: u32, value: u32) -> Result<BusWriteResult, BusError> {
        self.gpio.write32(offset, value)
    }
}

#[cfg(test)]
mod tests {
    use super::{ModelInputs, PeripheralModel};
    use crate::gpio::regmap::{DIRECT_OUT, INTR_STATE};
    use crate::{
        GpioConfig, GpioInputs, InterruptEnables, MemoryConfig, MemoryInit, ModelConfig,
        ModelError, PortInput, RegisterBus, WriteRequest,
    };

    fn config() -> ModelConfig {
        ModelConfig {
            memory: MemoryConfig {
                depth: 16,
                word_width: 32,
                ..MemoryConfig::default()
            },
            ..ModelConfig::default()
        }
    }

    #[test]
    fn step_advances_every_component_and_cycle() {
        let mut model = PeripheralModel::new(config(), MemoryInit::Fill(0x55)).expect("valid");
        let out = model
            .step(&ModelInputs {
                gpio: GpioInputs {
                    data_out: WriteRequest::DirectWrite(0xC0DE).into(),
                    ..GpioInputs::pads(1)
                },
                port_a: PortInput::write(3, 0x99),
                port_b: PortInput::read(4),
            })
            .expect("valid tick");
        assert_eq!(model.cycle(), 1);
        assert_eq!(out.gpio.pad_out, 0xC0DE);
        assert_eq!(out.memory.a.read_data, 0x55);
        assert_eq!(out.memory.b.read_data, 0x55);
        assert_eq!(out.memory.collision, None);
        assert_eq!(model.memory().peek(3), Ok(0x99));
    }

    #[test]
    fn failed_step_changes_nothing() {
        let mut model = PeripheralModel::new(config(), MemoryInit::Zero).expect("valid");
        model.write32(DIRECT_OUT, 0xFF).expect("mapped");
        let before = model.snapshot();

        let err = model.step(&ModelInputs {
            gpio: GpioInputs::pads(u32::MAX),
            port_a: PortInput::read(16),
            ..ModelInputs::default()
        });
        assert_eq!(
            err,
            Err(ModelError::OutOfRange {
                address: 16,
                depth: 16
            })
        );
        assert_eq!(model.cycle(), 0);
        assert_eq!(model.snapshot(), before);

        let out = model.step(&ModelInputs::default()).expect("valid tick");
        assert_eq!(out.gpio.pad_out, 0xFF, "staged bus write survives a failed tick");
    }

    #[test]
    fn bus_clear_and_input_clear_combine() {
        let mut model = PeripheralModel::new(
            ModelConfig {
                gpio: GpioConfig {
                    interrupt_enables: InterruptEnables {
                        level_high: 0b11,
                        ..InterruptEnables::NONE
                    },
                    ..GpioConfig::default()
                },
                ..config()
            },
            MemoryInit::Zero,
        )
        .expect("valid");
        for _ in 0..3 {
            model
                .step(&ModelInputs {
                    gpio: GpioInputs::pads(0b11),
                    ..ModelInputs::default()
                })
                .expect("valid tick");
        }
        assert_eq!(model.gpio().interrupt_status(), 0b11);

        model.write32(INTR_STATE, 0b01).expect("mapped");
        let out = model
            .step(&ModelInputs {
                gpio: GpioInputs {
                    interrupt_clear: 0b10,
                    ..GpioInputs::pads(0)
                },
                ..ModelInputs::default()
            })
            .expect("valid tick");
        // clear wins over the same-tick level detection
        assert_eq!(out.gpio.interrupt_status, 0);

        let out = model.step(&ModelInputs::default()).expect("valid tick");
        assert_eq!(out.gpio.interrupt_status, 0b11, "level still high in the synchronizer");
    }

    #[test]
    fn reset_cascades_but_keeps_memory_contents() {
        let mut model = PeripheralModel::new(config(), MemoryInit::Zero).expect("valid");
        model
            .step(&ModelInputs {
                gpio: GpioInputs {
                    data_out: WriteRequest::DirectWrite(0xAB).into(),
                    ..GpioInputs::default()
                },
                port_a: PortInput::write(0, 0x1234),
                ..ModelInputs::default()
            })
            .expect("valid tick");

        model.assert_reset();
        assert_eq!(model.gpio().data_out(), 0);
        assert_eq!(model.memory().peek(0), Ok(0x1234));
        model.release_reset();
    }

    #[test]
    fn snapshot_rebuilds_identical_model() {
        let mut model = PeripheralModel::new(config(), MemoryInit::Fill(7)).expect("valid");
        for addr in 0..4 {
            model
                .step(&ModelInputs {
                    gpio: GpioInputs::pads(addr as u32),
                    port_a: PortInput::write(addr, addr as u64 * 3),
                    port_b: PortInput::read(addr + 1),
                })
                .expect("valid tick");
        }
        let snapshot = model.snapshot();
        let restored = PeripheralModel::from_snapshot(config(), &snapshot).expect("compatible");
        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.cycle(), 4);

        let narrow = ModelConfig {
            memory: MemoryConfig {
                word_width: 2,
                ..config().memory
            },
            ..config()
        };
        assert!(matches!(
            PeripheralModel::from_snapshot(narrow, &snapshot),
            Err(ModelError::WidthMismatch { .. })
        ));
    }
}
