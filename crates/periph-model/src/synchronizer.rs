//! Double-flop input synchronizer with one extra stage for edge comparison.

use crate::{Clocked, ClockedRegister};

/// Three-stage delay chain sampling raw pad inputs.
///
/// Observed between edges, `sampled()` holds the raw input delivered two
/// edges ago and `previous()` the one delivered three edges ago, for any
/// input width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSynchronizer {
    stage1: ClockedRegister<u32>,
    stage2: ClockedRegister<u32>,
    stage3: ClockedRegister<u32>,
}

impl InputSynchronizer {
    /// Creates a synchronizer with every stage cleared.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stage1: ClockedRegister::new(0),
            stage2: ClockedRegister::new(0),
            stage3: ClockedRegister::new(0),
        }
    }

    /// Metastability-safe current sample (stage 2).
    #[must_use]
    pub const fn sampled(&self) -> u32 {
        self.stage2.value()
    }

    /// Sample one edge older than [`Self::sampled`] (stage 3).
    #[must_use]
    pub const fn previous(&self) -> u32 {
        self.stage3.value()
    }

    /// All three stages, first to last.
    #[must_use]
    pub const fn stages(&self) -> [u32; 3] {
        [
            self.stage1.value(),
            self.stage2.value(),
            self.stage3.value(),
        ]
    }

    /// Drives every stage from the current values; nothing moves until
    /// [`Clocked::update`].
    pub fn drive(&mut self, raw: u32) {
        self.stage3.drive(self.stage2.value());
        self.stage2.drive(self.stage1.value());
        self.stage1.drive(raw);
    }

    /// Shifts `raw` into the chain as one clock edge.
    pub fn tick(&mut self, raw: u32) {
        self.drive(raw);
        self.update();
    }

    /// Clears all stages immediately and holds them clear.
    pub fn assert_reset(&mut self) {
        self.stage1.assert_reset();
        self.stage2.assert_reset();
        self.stage3.assert_reset();
    }

    /// Releases reset on all stages.
    pub fn release_reset(&mut self) {
        self.stage1.release_reset();
        self.stage2.release_reset();
        self.stage3.release_reset();
    }

    pub(crate) fn restore(&mut self, stages: [u32; 3]) {
        self.stage1.force(stages[0]);
        self.stage2.force(stages[1]);
        self.stage3.force(stages[2]);
    }
}

impl Clocked for InputSynchronizer {
    fn update(&mut self) {
        self.stage1.update();
        self.stage2.update();
        self.stage3.update();
    }
}
