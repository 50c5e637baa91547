//! Mode button: debounced edge trigger for the display mode selector.
//!
//! ## Hardware
//!
//! Momentary switch on GPIO15 with the internal pull-up, interrupt on the
//! rising edge.  The ISR calls [`ModeButton::press`], which does a lock-free
//! debounce check and then a single [`ModeSelector::advance`].  Nothing else
//! runs in interrupt context.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::display_mode::{DisplayMode, ModeSelector};

/// Edges closer than this to the last accepted edge are contact bounce.
pub const DEBOUNCE_MS: u32 = 50;

#[derive(Debug)]
pub struct ModeButton {
    /// Timestamp of the last accepted edge (ms since boot, wrapping).
    last_edge_ms: AtomicU32,
    seen_edge: AtomicBool,
}

impl ModeButton {
    pub const fn new() -> Self {
        Self {
            last_edge_ms: AtomicU32::new(0),
            seen_edge: AtomicBool::new(false),
        }
    }

    /// ISR entry point.  Returns the new mode if the edge was accepted.
    pub fn press(&self, now_ms: u32, mode: &ModeSelector) -> Option<DisplayMode> {
        if self.accept(now_ms) {
            Some(mode.advance())
        } else {
            None
        }
    }

    fn accept(&self, now_ms: u32) -> bool {
        if self.seen_edge.load(Ordering::Relaxed) {
            let last = self.last_edge_ms.load(Ordering::Relaxed);
            if now_ms.wrapping_sub(last) < DEBOUNCE_MS {
                return false;
            }
        }
        self.last_edge_ms.store(now_ms, Ordering::Relaxed);
        self.seen_edge.store(true, Ordering::Relaxed);
        true
    }
}

impl Default for ModeButton {
    fn default() -> Self {
        Self::new()
    }
}

/// A debouncer wired to the selector it advances.  Lives in a `static` so
/// its address can be handed to the GPIO ISR as the handler argument.
#[derive(Debug)]
pub struct ButtonBinding {
    button: ModeButton,
    mode: &'static ModeSelector,
}

impl ButtonBinding {
    pub const fn new(mode: &'static ModeSelector) -> Self {
        Self {
            button: ModeButton::new(),
            mode,
        }
    }

    pub fn on_edge(&self, now_ms: u32) -> Option<DisplayMode> {
        self.button.press(now_ms, self.mode)
    }
}
