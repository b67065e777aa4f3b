use thiserror::Error;

/// Contract violations reported at the model boundary.
///
/// None of these are raised mid-tick: inputs are validated before any
/// component is driven, so a failed call leaves every register and cell as
/// it was.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum ModelError {
    /// A memory access named an address outside `[0, depth)`.
    #[error("address {address:#x} is outside memory depth {depth}")]
    OutOfRange {
        /// Address supplied by the caller.
        address: usize,
        /// Configured memory depth.
        depth: usize,
    },
    /// A supplied word has bits set above the configured word width.
    #[error("value {value:#x} does not fit in a {width}-bit word")]
    WidthMismatch {
        /// Value supplied by the caller.
        value: u64,
        /// Configured word width in bits.
        width: u8,
    },
    /// Construction-time configuration was rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ModelError {
    /// Returns the error class used by hosts to group violations.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::OutOfRange { .. } => ErrorClass::Address,
            Self::WidthMismatch { .. } => ErrorClass::Width,
            Self::InvalidConfig(_) => ErrorClass::Config,
        }
    }
}

/// Coarse grouping of [`ModelError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ErrorClass {
    /// Address bounds violation.
    Address,
    /// Word width violation.
    Width,
    /// Configuration rejected at construction or restore.
    Config,
}

/// Register-bus access failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum BusError {
    /// Offset is word-aligned but past the end of the register map.
    #[error("no register mapped at offset {offset:#x}")]
    Unmapped {
        /// Offending byte offset.
        offset: u32,
    },
    /// Offset is not a multiple of four.
    #[error("register offset {offset:#x} is not word aligned")]
    Misaligned {
        /// Offending byte offset.
        offset: u32,
    },
}
