//! Memory-mapped register interface of the GPIO controller.
//!
//! Bus writes are staged and land on the next [`Gpio::tick`], exactly like
//! write requests passed to [`Gpio::step`].

use super::{Gpio, MaskedHalf, WriteRequest};
use crate::bits::Half;
use crate::{BusError, BusWriteResult, RegisterBus};

/// `INTR_STATE` offset (read / write-1-to-clear).
pub const INTR_STATE: u32 = 0x00;
/// `DATA_IN` offset (read-only).
pub const DATA_IN: u32 = 0x04;
/// `DIRECT_OUT` offset.
pub const DIRECT_OUT: u32 = 0x08;
/// `MASKED_OUT_LOWER` offset.
pub const MASKED_OUT_LOWER: u32 = 0x0C;
/// `MASKED_OUT_UPPER` offset.
pub const MASKED_OUT_UPPER: u32 = 0x10;
/// `DIRECT_OE` offset.
pub const DIRECT_OE: u32 = 0x14;
/// `MASKED_OE_LOWER` offset.
pub const MASKED_OE_LOWER: u32 = 0x18;
/// `MASKED_OE_UPPER` offset.
pub const MASKED_OE_UPPER: u32 = 0x1C;
/// `INTR_CTRL_EN_RISING` offset (read-only).
pub const INTR_CTRL_EN_RISING: u32 = 0x20;
/// `INTR_CTRL_EN_FALLING` offset (read-only).
pub const INTR_CTRL_EN_FALLING: u32 = 0x24;
/// `INTR_CTRL_EN_LVLHIGH` offset (read-only).
pub const INTR_CTRL_EN_LVLHIGH: u32 = 0x28;
/// `INTR_CTRL_EN_LVLLOW` offset (read-only).
pub const INTR_CTRL_EN_LVLLOW: u32 = 0x2C;
/// Last mapped offset.
pub const REGISTER_MAP_END: u32 = INTR_CTRL_EN_LVLLOW;

/// Decoded GPIO register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpioRegister {
    /// Interrupt status, write 1 to clear.
    IntrState,
    /// Synchronized pad input sample.
    DataIn,
    /// Full-width write to the output-data register.
    DirectOut,
    /// Masked half-word write to the output-data register.
    MaskedOut(Half),
    /// Full-width write to the output-enable register.
    DirectOe,
    /// Masked half-word write to the output-enable register.
    MaskedOe(Half),
    /// Rising-edge interrupt enables.
    IntrCtrlEnRising,
    /// Falling-edge interrupt enables.
    IntrCtrlEnFalling,
    /// Level-high interrupt enables.
    IntrCtrlEnLvlHigh,
    /// Level-low interrupt enables.
    IntrCtrlEnLvlLow,
}

impl GpioRegister {
    /// Decodes a byte offset into a register.
    ///
    /// # Errors
    ///
    /// Returns [`BusError::Misaligned`] for offsets that are not a multiple of
    /// four and [`BusError::Unmapped`] for aligned offsets past the map.
    pub const fn decode(offset: u32) -> Result<Self, BusError> {
        if offset % 4 != 0 {
            return Err(BusError::Misaligned { offset });
        }
        match offset {
            INTR_STATE => Ok(Self::IntrState),
            DATA_IN => Ok(Self::DataIn),
            DIRECT_OUT => Ok(Self::DirectOut),
            MASKED_OUT_LOWER => Ok(Self::MaskedOut(Half::Lower)),
            MASKED_OUT_UPPER => Ok(Self::MaskedOut(Half::Upper)),
            DIRECT_OE => Ok(Self::DirectOe),
            MASKED_OE_LOWER => Ok(Self::MaskedOe(Half::Lower)),
            MASKED_OE_UPPER => Ok(Self::MaskedOe(Half::Upper)),
            INTR_CTRL_EN_RISING => Ok(Self::IntrCtrlEnRising),
            INTR_CTRL_EN_FALLING => Ok(Self::IntrCtrlEnFalling),
            INTR_CTRL_EN_LVLHIGH => Ok(Self::IntrCtrlEnLvlHigh),
            INTR_CTRL_EN_LVLLOW => Ok(Self::IntrCtrlEnLvlLow),
            _ => Err(BusError::Unmapped { offset }),
        }
    }

    /// Returns `true` when bus writes to this register have an effect.
    #[must_use]
    pub const fn is_writable(self) -> bool {
        !matches!(
            self,
            Self::DataIn
                | Self::IntrCtrlEnRising
                | Self::IntrCtrlEnFalling
                | Self::IntrCtrlEnLvlHigh
                | Self::IntrCtrlEnLvlLow
        )
    }
}

const fn masked_request(half: Half, word: u32) -> WriteRequest {
    let MaskedHalf { data, mask } = MaskedHalf::from_bus_word(word);
    match half {
        Half::Lower => WriteRequest::MaskedWriteLower { data, mask },
        Half::Upper => WriteRequest::MaskedWriteUpper { data, mask },
    }
}

impl RegisterBus for Gpio {
    fn read32(&mut self, offset: u32) -> Result<u32, BusError> {
        let value = match GpioRegister::decode(offset)? {
            GpioRegister::IntrState => self.interrupt_status(),
            GpioRegister::DataIn => self.data_in(),
            GpioRegister::DirectOut => self.data_out(),
            GpioRegister::MaskedOut(half) => u32::from(half.extract(self.data_out())),
            GpioRegister::DirectOe => self.data_oe(),
            GpioRegister::MaskedOe(half) => u32::from(half.extract(self.data_oe())),
            GpioRegister::IntrCtrlEnRising => self.interrupt_enables().rising,
            GpioRegister::IntrCtrlEnFalling => self.interrupt_enables().falling,
            GpioRegister::IntrCtrlEnLvlHigh => self.interrupt_enables().level_high,
            GpioRegister::IntrCtrlEnLvlLow => self.interrupt_enables().level_low,
        };
        Ok(value)
    }

    fn write32(&mut self, offset: u32, value: u32) -> Result<BusWriteResult, BusError> {
        let register = GpioRegister::decode(offset)?;
        let staged = self.staged_mut();
        match register {
            GpioRegister::IntrState => staged.interrupt_clear |= value,
            GpioRegister::DirectOut => staged.data_out.push(WriteRequest::DirectWrite(value)),
            GpioRegister::MaskedOut(half) => staged.data_out.push(masked_request(half, value)),
            GpioRegister::DirectOe => staged.data_oe.push(WriteRequest::DirectWrite(value)),
            GpioRegister::MaskedOe(half) => staged.data_oe.push(masked_request(half, value)),
            GpioRegister::DataIn
            | GpioRegister::IntrCtrlEnRising
            | GpioRegister::IntrCtrlEnFalling
            | GpioRegister::IntrCtrlEnLvlHigh
            | GpioRegister::IntrCtrlEnLvlLow => {
                tracing::debug!(offset, value, "write to read-only gpio register ignored");
                return Ok(BusWriteResult::DeniedReadOnly);
            }
        }
        Ok(BusWriteResult::Applied)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{
        GpioRegister, DATA_IN, DIRECT_OE, DIRECT_OUT, INTR_CTRL_EN_FALLING,
        INTR_CTRL_EN_LVLHIGH, INTR_CTRL_EN_LVLLOW, INTR_CTRL_EN_RISING, INTR_STATE,
        MASKED_OE_LOWER, MASKED_OE_UPPER, MASKED_OUT_LOWER, MASKED_OUT_UPPER, REGISTER_MAP_END,
    };
    use crate::gpio::{Gpio, GpioConfig, InterruptEnables};
    use crate::{BusError, BusWriteResult, RegisterBus};

    #[rstest]
    #[case(INTR_STATE, true)]
    #[case(DATA_IN, false)]
    #[case(DIRECT_OUT, true)]
    #[case(MASKED_OUT_LOWER, true)]
    #[case(MASKED_OUT_UPPER, true)]
    #[case(DIRECT_OE, true)]
    #[case(MASKED_OE_LOWER, true)]
    #[case(MASKED_OE_UPPER, true)]
    #[case(INTR_CTRL_EN_RISING, false)]
    #[case(INTR_CTRL_EN_FALLING, false)]
    #[case(INTR_CTRL_EN_LVLHIGH, false)]
    #[case(INTR_CTRL_EN_LVLLOW, false)]
    fn every_mapped_offset_decodes(#[case] offset: u32, #[case] writable: bool) {
        let register = GpioRegister::decode(offset).expect("offset is mapped");
        assert_eq!(register.is_writable(), writable);
    }

    #[test]
    fn unmapped_and_misaligned_offsets_are_rejected() {
        assert_eq!(
            GpioRegister::decode(REGISTER_MAP_END + 4),
            Err(BusError::Unmapped {
                offset: REGISTER_MAP_END + 4
            })
        );
        assert_eq!(
            GpioRegister::decode(0x0A),
            Err(BusError::Misaligned { offset: 0x0A })
        );
    }

    #[test]
    fn bus_writes_land_on_next_tick() {
        let mut gpio = Gpio::default();
        assert_eq!(
            gpio.write32(DIRECT_OUT, 0xCAFE_F00D),
            Ok(BusWriteResult::Applied)
        );
        assert_eq!(gpio.read32(DIRECT_OUT), Ok(0));

        gpio.tick(0);
        assert_eq!(gpio.read32(DIRECT_OUT), Ok(0xCAFE_F00D));
        assert_eq!(gpio.read32(MASKED_OUT_UPPER), Ok(0xCAFE));
        assert_eq!(gpio.read32(MASKED_OUT_LOWER), Ok(0xF00D));
    }

    #[test]
    fn masked_bus_write_uses_upper_half_as_mask() {
        let mut gpio = Gpio::default();
        gpio.write32(MASKED_OE_UPPER, 0x00FF_ABCD).expect("mapped");
        gpio.write32(MASKED_OE_LOWER, 0xFFFF_1234).expect("mapped");
        gpio.tick(0);
        assert_eq!(gpio.data_oe(), 0x00CD_1234);
    }

    #[test]
    fn intr_state_write_clears_set_bits() {
        let mut gpio = Gpio::new(GpioConfig {
            interrupt_enables: InterruptEnables {
                level_low: 0b11,
                ..InterruptEnables::NONE
            },
            ..GpioConfig::default()
        });
        gpio.tick(0);
        assert_eq!(gpio.read32(INTR_STATE), Ok(0b11));

        // level-low re-detects every tick; the clear applies after the
        // detect OR, so bit 0 reads clear for exactly one tick
        gpio.write32(INTR_STATE, 0b01).expect("mapped");
        gpio.tick(0);
        assert_eq!(gpio.read32(INTR_STATE), Ok(0b10));
        gpio.tick(0);
        assert_eq!(gpio.read32(INTR_STATE), Ok(0b11));
    }

    #[test]
    fn read_only_registers_deny_writes() {
        let enables = InterruptEnables {
            rising: 0x10,
            falling: 0x20,
            level_high: 0x40,
            level_low: 0x80,
        };
        let mut gpio = Gpio::new(GpioConfig {
            interrupt_enables: enables,
            ..GpioConfig::default()
        });
        assert_eq!(
            gpio.write32(INTR_CTRL_EN_RISING, 0xFFFF_FFFF),
            Ok(BusWriteResult::DeniedReadOnly)
        );
        assert_eq!(
            gpio.write32(DATA_IN, 0xFFFF_FFFF),
            Ok(BusWriteResult::DeniedReadOnly)
        );
        gpio.tick(0);
        assert_eq!(gpio.read32(INTR_CTRL_EN_RISING), Ok(0x10));
        assert_eq!(gpio.read32(INTR_CTRL_EN_FALLING), Ok(0x20));
        assert_eq!(gpio.read32(INTR_CTRL_EN_LVLHIGH), Ok(0x40));
        assert_eq!(gpio.read32(INTR_CTRL_EN_LVLLOW), Ok(0x80));
        assert_eq!(gpio.read32(DATA_IN), Ok(0));
    }

    #[test]
    fn direct_bus_write_shadows_masked_bus_write_in_same_tick() {
        let mut gpio = Gpio::default();
        gpio.write32(MASKED_OUT_LOWER, 0xFFFF_FFFF).expect("mapped");
        gpio.write32(DIRECT_OUT, 0).expect("mapped");
        gpio.tick(0);
        assert_eq!(gpio.data_out(), 0);
    }
}
