//! Display mode state machine.
//!
//! Three modes cycled by the mode button:
//!
//! ```text
//!   Current ──press──▶ Max ──press──▶ Min ──press──▶ Current
//! ```
//!
//! The mode lives in a single atomic byte ([`ModeSelector`]).  The button
//! ISR is its only writer; the main loop reads it once per tick.

use core::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DisplayMode {
    /// Latest corrected temperature.
    Current = 0,
    /// Highest corrected temperature seen.
    Max = 1,
    /// Lowest corrected temperature seen.
    Min = 2,
}

impl DisplayMode {
    pub const COUNT: u8 = 3;

    /// Next mode, wrapping modulo 3.
    pub const fn advance(self) -> Self {
        Self::from_index(self as u8 + 1)
    }

    /// Any byte maps to a mode (modulo 3).
    pub const fn from_index(raw: u8) -> Self {
        match raw % Self::COUNT {
            0 => Self::Current,
            1 => Self::Max,
            _ => Self::Min,
        }
    }
}

/// Single-slot, lock-free holder of the current [`DisplayMode`].
#[derive(Debug)]
pub struct ModeSelector {
    mode: AtomicU8,
}

impl ModeSelector {
    pub const fn new() -> Self {
        Self {
            mode: AtomicU8::new(DisplayMode::Current as u8),
        }
    }

    /// Step to the next mode.
    ///
    /// ISR-safe: one load and one store, no lock.  Correct only while the
    /// trigger handler is the sole writer.
    pub fn advance(&self) -> DisplayMode {
        let next = DisplayMode::from_index(self.mode.load(Ordering::Relaxed)).advance();
        self.mode.store(next as u8, Ordering::Release);
        next
    }

    pub fn current(&self) -> DisplayMode {
        DisplayMode::from_index(self.mode.load(Ordering::Acquire))
    }
}

impl Default for ModeSelector {
    fn default() -> Self {
        Self::new()
    }
}
