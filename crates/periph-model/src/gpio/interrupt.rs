//! Edge/level interrupt detection feeding a sticky write-1-to-clear status register.

use crate::edge::Edges;
use crate::{Clocked, ClockedRegister};

/// Per-line interrupt enables, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct InterruptEnables {
    /// Lines that raise an interrupt on a rising edge.
    pub rising: u32,
    /// Lines that raise an interrupt on a falling edge.
    pub falling: u32,
    /// Lines that raise an interrupt while high.
    pub level_high: u32,
    /// Lines that raise an interrupt while low.
    pub level_low: u32,
}

impl InterruptEnables {
    /// Enables with every condition disabled on every line.
    pub const NONE: Self = Self {
        rising: 0,
        falling: 0,
        level_high: 0,
        level_low: 0,
    };

    /// Combinational detect vector for one tick.
    #[must_use]
    pub const fn detect(&self, edges: Edges, level: u32) -> u32 {
        (self.rising & edges.rising)
            | (self.falling & edges.falling)
            | (self.level_high & level)
            | (self.level_low & !level)
    }
}

/// Next status value: freshly detected bits are ORed in first, then the
/// clear mask is applied, so a bit detected and cleared on the same tick
/// ends up cleared.
#[must_use]
pub const fn next_status(status: u32, detected: u32, clear_mask: u32) -> u32 {
    (status | detected) & !clear_mask
}

/// Sticky interrupt status register with write-1-to-clear semantics.
///
/// The status value doubles as the interrupt output; there is no separate
/// output stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptController {
    enables: InterruptEnables,
    status: ClockedRegister<u32>,
}

impl InterruptController {
    /// Creates a controller with the given enables and a cleared status.
    #[must_use]
    pub const fn new(enables: InterruptEnables) -> Self {
        Self {
            enables,
            status: ClockedRegister::new(0),
        }
    }

    /// Configured enable sets.
    #[must_use]
    pub const fn enables(&self) -> &InterruptEnables {
        &self.enables
    }

    /// Current status register value (also the interrupt line vector).
    #[must_use]
    pub const fn status(&self) -> u32 {
        self.status.value()
    }

    /// Drives the next status from this tick's edges, level and clear mask.
    ///
    /// Returns the detect vector so the caller can trace it.
    pub fn drive(&mut self, edges: Edges, level: u32, clear_mask: u32) -> u32 {
        let detected = self.enables.detect(edges, level);
        self.status
            .drive(next_status(self.status.value(), detected, clear_mask));
        detected
    }

    /// Runs one clock edge and returns the committed status.
    pub fn tick(&mut self, edges: Edges, level: u32, clear_mask: u32) -> u32 {
        self.drive(edges, level, clear_mask);
        self.update();
        self.status()
    }

    /// Clears the status immediately and holds it clear.
    pub fn assert_reset(&mut self) {
        self.status.assert_reset();
    }

    /// Releases reset on the status register.
    pub fn release_reset(&mut self) {
        self.status.release_reset();
    }

    pub(crate) fn restore(&mut self, status: u32) {
        self.status.force(status);
    }
}

impl Clocked for InterruptController {
    fn update(&mut self) {
        self.status.update();
    }
}
