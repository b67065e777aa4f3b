//! Dual-port memory model.
//!
//! Each port reads first and writes after the read within its own tick. The
//! array is shared; everything else (read-data register, optional output
//! register) is per port.

/// Port input validation.
pub mod access;
/// Memory shape, latency mode and initial contents.
pub mod config;
/// High-performance output register.
pub mod latency;
/// Port identifiers, inputs and read pipelines.
pub mod port;
/// The shared array and its two ports.
pub mod ram;

pub use access::{validate_address, validate_port_input};
pub use config::{LatencyMode, MemoryConfig, MemoryInit, DEFAULT_DEPTH, DEFAULT_WORD_WIDTH};
pub use latency::OutputStage;
pub use port::{PortId, PortInput, PortOutput, PortPipeline};
pub use ram::{Collision, CollisionKind, DualPortRam, MemoryOutputs, MemorySnapshot};
