//! State shared between the main loop and asynchronous contexts.
//!
//! ```text
//! ┌──────────────┐  advance()  ┌─────────────┐
//! │ Button ISR   │────────────▶│             │   current()
//! └──────────────┘             │ SharedState │─────────────▶ Main loop
//! ┌──────────────┐  set(bool)  │  (atomics)  │   is_up()
//! │ MQTT events  │────────────▶│             │
//! └──────────────┘             └─────────────┘
//! ```
//!
//! Every field is one word with exactly one writer, so plain atomic
//! load/store is enough.  A read may be up to one tick stale.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::display_mode::ModeSelector;

/// "Telemetry channel ready" flag maintained by the MQTT event callback.
#[derive(Debug)]
pub struct LinkFlag {
    up: AtomicBool,
}

impl LinkFlag {
    pub const fn new() -> Self {
        Self {
            up: AtomicBool::new(false),
        }
    }

    pub fn set(&self, up: bool) {
        self.up.store(up, Ordering::Release);
    }

    pub fn is_up(&self) -> bool {
        self.up.load(Ordering::Acquire)
    }
}

impl Default for LinkFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide mutable state; usually placed in a `static`.
#[derive(Debug, Default)]
pub struct SharedState {
    pub mode: ModeSelector,
    pub link: LinkFlag,
}

impl SharedState {
    pub const fn new() -> Self {
        Self {
            mode: ModeSelector::new(),
            link: LinkFlag::new(),
        }
    }
}
