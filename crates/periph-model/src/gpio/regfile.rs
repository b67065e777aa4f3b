//! Priority-ordered write policy for the output-data and output-enable registers.

use crate::bits::{half_write, Half};
use crate::{Clocked, ClockedRegister};

/// A single write request against one 32-bit register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum WriteRequest {
    /// No write this tick.
    #[default]
    NoWrite,
    /// Full-width overwrite.
    DirectWrite(u32),
    /// Masked write to bits `[16, 32)`.
    MaskedWriteUpper {
        /// Half-word data.
        data: u16,
        /// Half-word bit-select mask.
        mask: u16,
    },
    /// Masked write to bits `[0, 16)`.
    MaskedWriteLower {
        /// Half-word data.
        data: u16,
        /// Half-word bit-select mask.
        mask: u16,
    },
}

/// Masked write payload for one half-word lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MaskedHalf {
    /// Half-word data.
    pub data: u16,
    /// Half-word bit-select mask.
    pub mask: u16,
}

impl MaskedHalf {
    /// Splits a bus word laid out as `[31:16]` mask, `[15:0]` data.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_bus_word(word: u32) -> Self {
        Self {
            data: word as u16,
            mask: (word >> 16) as u16,
        }
    }
}

/// Every request asserted against one register in a single tick.
///
/// Upper and lower masked writes touch disjoint lanes and both apply. A
/// direct write dominates both of them; the set is never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct WriteSet {
    /// Pending direct write, if any.
    pub direct: Option<u32>,
    /// Pending masked write to the upper lane, if any.
    pub upper: Option<MaskedHalf>,
    /// Pending masked write to the lower lane, if any.
    pub lower: Option<MaskedHalf>,
}

impl WriteSet {
    /// Empty set; committing it leaves the register unchanged.
    pub const NONE: Self = Self {
        direct: None,
        upper: None,
        lower: None,
    };

    /// Adds a request, replacing any earlier request of the same kind.
    pub const fn push(&mut self, request: WriteRequest) {
        match request {
            WriteRequest::NoWrite => {}
            WriteRequest::DirectWrite(value) => self.direct = Some(value),
            WriteRequest::MaskedWriteUpper { data, mask } => {
                self.upper = Some(MaskedHalf { data, mask });
            }
            WriteRequest::MaskedWriteLower { data, mask } => {
                self.lower = Some(MaskedHalf { data, mask });
            }
        }
    }

    /// Builder form of [`Self::push`].
    #[must_use]
    pub const fn with(mut self, request: WriteRequest) -> Self {
        self.push(request);
        self
    }

    /// Combines two sets; requests in `later` replace those of the same kind.
    #[must_use]
    pub const fn merge(self, later: Self) -> Self {
        Self {
            direct: if later.direct.is_some() { later.direct } else { self.direct },
            upper: if later.upper.is_some() { later.upper } else { self.upper },
            lower: if later.lower.is_some() { later.lower } else { self.lower },
        }
    }

    /// Returns `true` when no request is pending.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.direct.is_none() && self.upper.is_none() && self.lower.is_none()
    }

    /// Returns `true` when a direct and a masked request were both asserted.
    ///
    /// Callers are expected never to do this; when they do the direct write
    /// wins.
    #[must_use]
    pub const fn has_direct_masked_conflict(&self) -> bool {
        self.direct.is_some() && (self.upper.is_some() || self.lower.is_some())
    }
}

impl From<WriteRequest> for WriteSet {
    fn from(request: WriteRequest) -> Self {
        Self::NONE.with(request)
    }
}

impl FromIterator<WriteRequest> for WriteSet {
    fn from_iter<I: IntoIterator<Item = WriteRequest>>(iter: I) -> Self {
        let mut set = Self::NONE;
        for request in iter {
            set.push(request);
        }
        set
    }
}

/// Next register value under the direct-over-masked priority policy.
#[must_use]
pub const fn compute_next(current: u32, writes: &WriteSet) -> u32 {
    if let Some(value) = writes.direct {
        return value;
    }
    let mut next = current;
    if let Some(lower) = writes.lower {
        next = half_write(next, Half::Lower, lower.data, lower.mask);
    }
    if let Some(upper) = writes.upper {
        next = half_write(next, Half::Upper, upper.data, upper.mask);
    }
    next
}

/// One 32-bit register updated through [`compute_next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaskedRegister {
    reg: ClockedRegister<u32>,
}

impl MaskedRegister {
    /// Creates a register that resets to `reset_value`.
    #[must_use]
    pub const fn new(reset_value: u32) -> Self {
        Self {
            reg: ClockedRegister::new(reset_value),
        }
    }

    /// Current register value.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.reg.value()
    }

    /// Drives the next value for this tick's write set.
    pub fn drive(&mut self, writes: &WriteSet) {
        if writes.has_direct_masked_conflict() {
            tracing::debug!(?writes, "direct write shadows masked write");
        }
        self.reg.drive(compute_next(self.reg.value(), writes));
    }

    /// Applies `writes` as one clock edge.
    pub fn tick(&mut self, writes: &WriteSet) {
        self.drive(writes);
        self.update();
    }

    /// Asserts reset on the underlying register.
    pub fn assert_reset(&mut self) {
        self.reg.assert_reset();
    }

    /// Releases reset on the underlying register.
    pub fn release_reset(&mut self) {
        self.reg.release_reset();
    }

    pub(crate) fn restore(&mut self, value: u32) {
        self.reg.force(value);
    }
}

impl Clocked for MaskedRegister {
    fn update(&mut self) {
        self.reg.update();
    }
}
