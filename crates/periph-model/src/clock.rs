//! Two-phase clocking substrate.
//!
//! Every stateful component is advanced in two phases. During the drive
//! phase it computes its next state from the frozen current state of the
//! whole model and this tick's inputs. During the commit phase
//! ([`Clocked::update`]) the pending next state becomes current. Because no
//! component commits before every component has been driven, no output for
//! tick N can depend on another component's post-tick-N state.

/// A component that holds state across clock edges.
pub trait Clocked {
    /// Commits whatever next state was driven since the last edge.
    fn update(&mut self);
}

/// A register with an asynchronous, active-while-asserted reset.
///
/// Reset has priority over any driven value: asserting it clears the held
/// value immediately (not at the next edge) and every commit while it stays
/// asserted keeps the reset value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ClockedRegister<T: Copy> {
    value: T,
    next: Option<T>,
    reset_value: T,
    in_reset: bool,
}

impl<T: Copy> ClockedRegister<T> {
    /// Creates a register holding `reset_value`, with reset released.
    #[must_use]
    pub const fn new(reset_value: T) -> Self {
        Self {
            value: reset_value,
            next: None,
            reset_value,
            in_reset: false,
        }
    }

    /// Current held value.
    #[must_use]
    pub const fn value(&self) -> T {
        self.value
    }

    /// Value the register returns to on reset.
    #[must_use]
    pub const fn reset_value(&self) -> T {
        self.reset_value
    }

    /// Whether reset is currently asserted.
    #[must_use]
    pub const fn in_reset(&self) -> bool {
        self.in_reset
    }

    /// Drives the value to commit at the next edge.
    #[allow(clippy::missing_const_for_fn)]
    pub fn drive(&mut self, next: T) {
        self.next = Some(next);
    }

    /// Withdraws any driven value so the next edge holds the current one.
    #[allow(clippy::missing_const_for_fn)]
    pub fn hold(&mut self) {
        self.next = None;
    }

    /// Drives `next` and commits it in one call.
    pub fn tick(&mut self, next: T) {
        self.drive(next);
        self.update();
    }

    /// Asserts reset: the held value becomes the reset value right away.
    #[allow(clippy::missing_const_for_fn)]
    pub fn assert_reset(&mut self) {
        self.in_reset = true;
        self.value = self.reset_value;
        self.next = None;
    }

    /// Releases reset; the register resumes loading driven values.
    #[allow(clippy::missing_const_for_fn)]
    pub fn release_reset(&mut self) {
        self.in_reset = false;
    }

    /// Overwrites the held value outside of clocking, used by snapshot restore.
    #[allow(clippy::missing_const_for_fn)]
    pub(crate) fn force(&mut self, value: T) {
        self.value = value;
        self.next = None;
    }
}

impl<T: Copy + Default> Default for ClockedRegister<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Copy> Clocked for ClockedRegister<T> {
    fn update(&mut self) {
        let next = self.next.take();
        if self.in_reset {
            self.value = self.reset_value;
        } else if let Some(next) = next {
            self.value = next;
        }
    }
}
