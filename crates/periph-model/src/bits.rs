//! Fixed-width bit-vector helpers shared by every component.

use crate::ModelError;

/// Width of a full GPIO register in bits.
pub const WORD_BITS: u32 = 32;
/// Width of a half-word masked-write operand in bits.
pub const HALF_BITS: u32 = 16;
/// Widest memory word the model can hold.
pub const MAX_WORD_WIDTH: u8 = 64;

/// Half-word lane selected by a masked write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Half {
    /// Bits `[0, 16)`.
    Lower,
    /// Bits `[16, 32)`.
    Upper,
}

impl Half {
    /// Bit position of the lane's least significant bit.
    #[must_use]
    pub const fn shift(self) -> u32 {
        match self {
            Self::Lower => 0,
            Self::Upper => HALF_BITS,
        }
    }

    /// Extracts this lane from a full word.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn extract(self, word: u32) -> u16 {
        (word >> self.shift()) as u16
    }
}

/// Per-bit select: bits set in `mask` come from `data`, the rest from `current`.
#[must_use]
pub const fn masked_select(current: u32, data: u32, mask: u32) -> u32 {
    (current & !mask) | (data & mask)
}

/// Applies a 16-bit masked write to one half-word lane of `current`.
///
/// Bits outside the selected lane are never touched, whatever `mask` holds.
#[must_use]
pub const fn half_write(current: u32, half: Half, data: u16, mask: u16) -> u32 {
    let shift = half.shift();
    masked_select(current, (data as u32) << shift, (mask as u32) << shift)
}

/// Returns the all-ones mask for a memory word of `width` bits.
///
/// `width` must already be validated to `1..=64`.
#[must_use]
pub const fn word_mask(width: u8) -> u64 {
    if width >= MAX_WORD_WIDTH {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Checks that `value` fits in a `width`-bit word.
///
/// # Errors
///
/// Returns [`ModelError::WidthMismatch`] when `value` has bits set at or
/// above `width`.
pub const fn fit_word(value: u64, width: u8) -> Result<u64, ModelError> {
    if value & !word_mask(width) == 0 {
        Ok(value)
    } else {
        Err(ModelError::WidthMismatch { value, width })
    }
}
