//! Synchronized-input, interrupt-capable GPIO controller.

/// Edge/level interrupt detection and sticky status.
pub mod interrupt;
/// Peripheral composition and per-tick input/output vectors.
pub mod peripheral;
/// Priority-ordered masked register writes.
pub mod regfile;
/// Memory-mapped register interface.
pub mod regmap;

pub use interrupt::{next_status, InterruptController, InterruptEnables};
pub use peripheral::{Gpio, GpioConfig, GpioInputs, GpioOutputs, GpioSnapshot};
pub use regfile::{compute_next, MaskedHalf, MaskedRegister, WriteRequest, WriteSet};
pub use regmap::GpioRegister;
