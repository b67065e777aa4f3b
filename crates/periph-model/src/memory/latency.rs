//! Optional extra registered stage on a port's read output.

use super::LatencyMode;
use crate::{Clocked, ClockedRegister};

/// Output stage wrapping a port's read-data register.
///
/// In [`LatencyMode::LowLatency`] the read-data register is passed through
/// untouched. In [`LatencyMode::HighPerformance`] it feeds one more
/// register, which clears on reset independently of the array contents and
/// holds its value while its enable is low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputStage {
    mode: LatencyMode,
    reg: ClockedRegister<u64>,
}

impl OutputStage {
    /// Creates a stage for `mode` with the extra register cleared.
    #[must_use]
    pub const fn new(mode: LatencyMode) -> Self {
        Self {
            mode,
            reg: ClockedRegister::new(0),
        }
    }

    /// Configured latency mode.
    #[must_use]
    pub const fn mode(&self) -> LatencyMode {
        self.mode
    }

    /// Port output for the current read-data register value.
    #[must_use]
    pub const fn output(&self, read_data: u64) -> u64 {
        match self.mode {
            LatencyMode::LowLatency => read_data,
            LatencyMode::HighPerformance => self.reg.value(),
        }
    }

    /// Value held by the extra register; always zero in low-latency mode.
    #[must_use]
    pub const fn register_value(&self) -> u64 {
        self.reg.value()
    }

    /// Drives the extra register from the read-data register's current value.
    pub fn drive(&mut self, read_data: u64, enable: bool) {
        if self.mode == LatencyMode::HighPerformance && enable {
            self.reg.drive(read_data);
        } else {
            self.reg.hold();
        }
    }

    /// Clears the extra register immediately and holds it clear.
    pub fn assert_reset(&mut self) {
        self.reg.assert_reset();
    }

    /// Releases reset on the extra register.
    pub fn release_reset(&mut self) {
        self.reg.release_reset();
    }

    pub(crate) fn restore(&mut self, value: u64) {
        if self.mode == LatencyMode::HighPerformance {
            self.reg.force(value);
        }
    }
}

impl Clocked for OutputStage {
    fn update(&mut self) {
        self.reg.update();
    }
}

#[cfg(test)]
mod tests {
    use super::OutputStage;
    use crate::memory::LatencyMode;
    use crate::Clocked;

    #[test]
    fn low_latency_passes_read_data_through() {
        let mut stage = OutputStage::new(LatencyMode::LowLatency);
        stage.drive(0x55, true);
        stage.update();
        assert_eq!(stage.output(0x77), 0x77);
        assert_eq!(stage.register_value(), 0);
    }

    #[test]
    fn high_performance_adds_one_register() {
        let mut stage = OutputStage::new(LatencyMode::HighPerformance);
        assert_eq!(stage.output(0x77), 0);
        stage.drive(0x77, true);
        stage.update();
        assert_eq!(stage.output(0x99), 0x77);
    }

    #[test]
    fn disabled_redrive_withdraws_earlier_load() {
        let mut stage = OutputStage::new(LatencyMode::HighPerformance);
        stage.drive(0x11, true);
        stage.drive(0x22, false);
        stage.update();
        assert_eq!(stage.output(0), 0);
    }

    #[test]
    fn disabled_register_holds_value() {
        let mut stage = OutputStage::new(LatencyMode::HighPerformance);
        stage.drive(0x11, true);
        stage.update();
        stage.drive(0x22, false);
        stage.update();
        assert_eq!(stage.output(0), 0x11);
    }

    #[test]
    fn reset_clears_only_the_extra_register() {
        let mut stage = OutputStage::new(LatencyMode::HighPerformance);
        stage.drive(0x11, true);
        stage.update();
        stage.assert_reset();
        assert_eq!(stage.output(0x11), 0);
        stage.drive(0x22, true);
        stage.update();
        assert_eq!(stage.output(0x22), 0);
        stage.release_reset();
        stage.drive(0x22, true);
        stage.update();
        assert_eq!(stage.output(0), 0x22);
    }
}
