//! Cycle-stepped behavioral models of a GPIO controller and a dual-port
//! memory block.
//!
//! Every component advances in two phases per clock edge: a drive phase
//! computes next state from the frozen current state, then
//! [`Clocked::update`] commits it. Contract violations are reported as
//! [`ModelError`] before anything is driven.

/// Model error taxonomy.
pub mod error;
pub use error::{BusError, ErrorClass, ModelError};

/// Fixed-width bit-vector helpers.
pub mod bits;
pub use bits::{fit_word, half_write, masked_select, word_mask, Half, MAX_WORD_WIDTH};

/// Two-phase clocking trait and the reset-aware register primitive.
pub mod clock;
pub use clock::{Clocked, ClockedRegister};

/// Pad input synchronizer.
pub mod synchronizer;
pub use synchronizer::InputSynchronizer;

/// Rising/falling edge detection.
pub mod edge;
pub use edge::Edges;

/// GPIO controller: masked output registers, interrupts and register map.
pub mod gpio;
pub use gpio::{
    compute_next, next_status, Gpio, GpioConfig, GpioInputs, GpioOutputs, GpioRegister,
    GpioSnapshot, InterruptController, InterruptEnables, MaskedHalf, MaskedRegister,
    WriteRequest, WriteSet,
};

/// Dual-port memory with configurable read latency.
pub mod memory;
pub use memory::{
    validate_address, validate_port_input, Collision, CollisionKind, DualPortRam, LatencyMode,
    MemoryConfig, MemoryInit, MemoryOutputs, MemorySnapshot, OutputStage, PortId, PortInput,
    PortOutput, PortPipeline, DEFAULT_DEPTH, DEFAULT_WORD_WIDTH,
};

/// Host-facing bus, configuration and snapshot contracts.
pub mod api;
pub use api::{BusWriteResult, ModelConfig, ModelSnapshot, RegisterBus, SnapshotVersion};

/// GPIO and memory composed on one clock.
pub mod model;
pub use model::{ModelInputs, ModelOutputs, PeripheralModel};

#[cfg(test)]
use proptest as _;
