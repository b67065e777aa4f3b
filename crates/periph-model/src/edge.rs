//! Per-bit edge detection over consecutive synchronized samples.

/// Rising and falling pulse vectors for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Edges {
    /// Bits that went from 0 to 1.
    pub rising: u32,
    /// Bits that went from 1 to 0.
    pub falling: u32,
}

/// Compares the current sample against the previous one.
///
/// A bit is never both rising and falling in the same tick.
#[must_use]
pub const fn detect(current: u32, previous: u32) -> Edges {
    Edges {
        rising: current & !previous,
        falling: !current & previous,
    }
}
