//! GPIO peripheral composition.
//!
//! Raw pads flow through the [`InputSynchronizer`] into edge detection and
//! the [`InterruptController`]; the two [`MaskedRegister`]s drive the pad
//! output and output-enable vectors.

use std::mem;

use super::{InterruptController, InterruptEnables, MaskedRegister, WriteSet};
use crate::edge;
use crate::{Clocked, InputSynchronizer};

/// Construction-time configuration for a [`Gpio`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct GpioConfig {
    /// Interrupt enable sets; read-only for the lifetime of the model.
    pub interrupt_enables: InterruptEnables,
    /// Reset value of the output-data register.
    pub data_out_reset: u32,
    /// Reset value of the output-enable register.
    pub data_oe_reset: u32,
}

/// Inputs applied to a [`Gpio`] on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct GpioInputs {
    /// Raw, unsynchronized pad input vector.
    pub pads: u32,
    /// Write requests against the output-data register.
    pub data_out: WriteSet,
    /// Write requests against the output-enable register.
    pub data_oe: WriteSet,
    /// Write-1-to-clear mask for the interrupt status register.
    pub interrupt_clear: u32,
}

impl GpioInputs {
    /// Inputs that only present `pads`, with no writes and no clears.
    #[must_use]
    pub const fn pads(pads: u32) -> Self {
        Self {
            pads,
            data_out: WriteSet::NONE,
            data_oe: WriteSet::NONE,
            interrupt_clear: 0,
        }
    }

    /// Layers `later` over `self`: pads come from `later`, write requests of
    /// the same kind from `later` replace those in `self`, and clear masks
    /// accumulate.
    #[must_use]
    pub const fn merge(self, later: Self) -> Self {
        Self {
            pads: later.pads,
            data_out: self.data_out.merge(later.data_out),
            data_oe: self.data_oe.merge(later.data_oe),
            interrupt_clear: self.interrupt_clear | later.interrupt_clear,
        }
    }
}

/// Register values presented by a [`Gpio`] after a tick commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct GpioOutputs {
    /// Pad output vector (output-data register).
    pub pad_out: u32,
    /// Pad output-enable vector (output-enable register).
    pub pad_oe: u32,
    /// Interrupt status vector, also the interrupt lines.
    pub interrupt_status: u32,
}

/// Full register state of a [`Gpio`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct GpioSnapshot {
    /// Synchronizer stages, first to last.
    pub sync_stages: [u32; 3],
    /// Output-data register.
    pub data_out: u32,
    /// Output-enable register.
    pub data_oe: u32,
    /// Interrupt status register.
    pub interrupt_status: u32,
}

/// Synchronized-input, interrupt-capable GPIO controller.
#[derive(Debug, Clone)]
pub struct Gpio {
    config: GpioConfig,
    sync: InputSynchronizer,
    data_out: MaskedRegister,
    data_oe: MaskedRegister,
    irq: InterruptController,
    staged: GpioInputs,
}

impl Default for Gpio {
    fn default() -> Self {
        Self::new(GpioConfig::default())
    }
}

impl Gpio {
    /// Creates a GPIO controller with every register at its reset value.
    #[must_use]
    pub fn new(config: GpioConfig) -> Self {
        tracing::debug!(?config, "gpio created");
        Self {
            config,
            sync: InputSynchronizer::new(),
            data_out: MaskedRegister::new(config.data_out_reset),
            data_oe: MaskedRegister::new(config.data_oe_reset),
            irq: InterruptController::new(config.interrupt_enables),
            staged: GpioInputs::default(),
        }
    }

    /// Configuration this controller was built with.
    #[must_use]
    pub const fn config(&self) -> &GpioConfig {
        &self.config
    }

    /// Synchronized input sample.
    #[must_use]
    pub const fn data_in(&self) -> u32 {
        self.sync.sampled()
    }

    /// Output-data register.
    #[must_use]
    pub const fn data_out(&self) -> u32 {
        self.data_out.value()
    }

    /// Output-enable register.
    #[must_use]
    pub const fn data_oe(&self) -> u32 {
        self.data_oe.value()
    }

    /// Interrupt status register.
    #[must_use]
    pub const fn interrupt_status(&self) -> u32 {
        self.irq.status()
    }

    /// Interrupt enable sets.
    #[must_use]
    pub const fn interrupt_enables(&self) -> &InterruptEnables {
        self.irq.enables()
    }

    /// Current output vectors.
    #[must_use]
    pub const fn outputs(&self) -> GpioOutputs {
        GpioOutputs {
            pad_out: self.data_out.value(),
            pad_oe: self.data_oe.value(),
            interrupt_status: self.irq.status(),
        }
    }

    /// Drive phase: computes every next value from the current registers.
    pub fn drive(&mut self, inputs: &GpioInputs) {
        let level = self.sync.sampled();
        let edges = edge::detect(level, self.sync.previous());
        let detected = self.irq.drive(edges, level, inputs.interrupt_clear);
        if detected != 0 {
            tracing::trace!(detected, "gpio interrupt condition");
        }

        self.data_out.drive(&inputs.data_out);
        self.data_oe.drive(&inputs.data_oe);
        self.sync.drive(inputs.pads);
    }

    /// Applies `inputs` as one clock edge and returns the committed outputs.
    pub fn step(&mut self, inputs: &GpioInputs) -> GpioOutputs {
        self.drive(inputs);
        self.update();
        self.outputs()
    }

    /// Clocks the controller with `pads` and whatever the register bus staged
    /// since the previous tick.
    pub fn tick(&mut self, pads: u32) -> GpioOutputs {
        let inputs = self.take_staged().merge(GpioInputs::pads(pads));
        self.step(&inputs)
    }

    /// Mutable access to the writes staged for the next [`Self::tick`].
    #[allow(clippy::missing_const_for_fn)]
    pub fn staged_mut(&mut self) -> &mut GpioInputs {
        &mut self.staged
    }

    /// Removes and returns the staged writes, leaving none pending.
    pub fn take_staged(&mut self) -> GpioInputs {
        mem::take(&mut self.staged)
    }

    /// Asserts reset: every register clears to its reset value immediately.
    ///
    /// Staged bus writes are discarded.
    pub fn assert_reset(&mut self) {
        tracing::debug!("gpio reset asserted");
        self.sync.assert_reset();
        self.data_out.assert_reset();
        self.data_oe.assert_reset();
        self.irq.assert_reset();
        self.staged = GpioInputs::default();
    }

    /// Releases reset on every register.
    pub fn release_reset(&mut self) {
        tracing::debug!("gpio reset released");
        self.sync.release_reset();
        self.data_out.release_reset();
        self.data_oe.release_reset();
        self.irq.release_reset();
    }

    /// Captures every register value.
    #[must_use]
    pub const fn snapshot(&self) -> GpioSnapshot {
        GpioSnapshot {
            sync_stages: self.sync.stages(),
            data_out: self.data_out.value(),
            data_oe: self.data_oe.value(),
            interrupt_status: self.irq.status(),
        }
    }

    /// Loads every register from `snapshot`; staged writes are dropped.
    pub fn restore(&mut self, snapshot: &GpioSnapshot) {
        self.sync.restore(snapshot.sync_stages);
        self.data_out.restore(snapshot.data_out);
        self.data_oe.restore(snapshot.data_oe);
        self.irq.restore(snapshot.interrupt_status);
        self.staged = GpioInputs::default();
    }
}

impl Clocked for Gpio {
    fn update(&mut self) {
        self.sync.update();
        self.data_out.update();
        self.data_oe.update();
        self.irq.update();
    }
}
