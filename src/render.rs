//! Render composer: the three OLED text lines for one tick.
//!
//! ```text
//!   (10,10)  Temp. PT100
//!   (22,30)  Atual: 4.30C | Max: 4.30C | Min: -1.00C | Falha Leitura
//!   (30,50)  OK | ABAIXO | ACIMA | ERRO
//! ```
//!
//! Lines are fixed-capacity strings.  Formatting never overruns: text past
//! the capacity is dropped at a character boundary.  Every value in
//! -99.99 … 999.99 fits untruncated.

use core::fmt::{self, Write};

use heapless::String;

use crate::app::ports::DisplayPort;
use crate::calibration::{RangeStatus, Reading};
use crate::display_mode::DisplayMode;
use crate::error::DisplayFault;
use crate::extremes::Extremes;

/// Maximum characters per display line.
pub const LINE_CAPACITY: usize = 20;

pub type Line = String<LINE_CAPACITY>;

pub const TITLE: &str = "Temp. PT100";
pub const READ_FAILURE: &str = "Falha Leitura";

/// Top-left pixel of each line.
pub const TITLE_POS: (i32, i32) = (10, 10);
pub const VALUE_POS: (i32, i32) = (22, 30);
pub const STATUS_POS: (i32, i32) = (30, 50);

/// Text for one display refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFrame {
    pub line1: Line,
    pub line2: Line,
    pub line3: Line,
}

impl RenderFrame {
    /// Clear, draw the three lines, flush.
    ///
    /// Stops at the first failing display call.
    pub fn draw_on(&self, display: &mut impl DisplayPort) -> Result<(), DisplayFault> {
        display.clear()?;
        display.draw_text(TITLE_POS.0, TITLE_POS.1, &self.line1, false)?;
        display.draw_text(VALUE_POS.0, VALUE_POS.1, &self.line2, false)?;
        display.draw_text(STATUS_POS.0, STATUS_POS.1, &self.line3, false)?;
        display.flush()
    }
}

/// Build the frame for this tick.
///
/// `extremes` is always `Some` once a valid reading has been tracked, which
/// the main loop does before composing.
pub fn compose(
    reading: &Reading,
    status: RangeStatus,
    extremes: Option<Extremes>,
    mode: DisplayMode,
) -> RenderFrame {
    let mut line2 = Line::new();
    {
        let mut w = Truncating::new(&mut line2);
        match (reading.corrected(), mode) {
            (None, _) => w.put(READ_FAILURE),
            (Some(t), DisplayMode::Current) => w.put_fmt(format_args!("Atual: {:.2}C", t)),
            (Some(_), DisplayMode::Max) => match extremes {
                Some(e) => w.put_fmt(format_args!("Max: {:.2}C", e.max_c)),
                None => w.put("Max: --"),
            },
            (Some(_), DisplayMode::Min) => match extremes {
                Some(e) => w.put_fmt(format_args!("Min: {:.2}C", e.min_c)),
                None => w.put("Min: --"),
            },
        }
    }

    RenderFrame {
        line1: bounded(TITLE),
        line2,
        line3: bounded(status.label()),
    }
}

/// MQTT payload for a corrected temperature (two decimals).
pub fn telemetry_payload(corrected_c: f32) -> Line {
    let mut out = Line::new();
    Truncating::new(&mut out).put_fmt(format_args!("{:.2}", corrected_c));
    out
}

/// Copy `text` into a line, truncating if needed.
pub fn bounded(text: &str) -> Line {
    let mut out = Line::new();
    Truncating::new(&mut out).put(text);
    out
}

// ── Internal ──────────────────────────────────────────────────

/// `fmt::Write` adapter that drops whatever does not fit.
struct Truncating<'a, const N: usize> {
    buf: &'a mut String<N>,
    full: bool,
}

impl<'a, const N: usize> Truncating<'a, N> {
    fn new(buf: &'a mut String<N>) -> Self {
        Self { buf, full: false }
    }

    fn put(&mut self, text: &str) {
        let _ = self.write_str(text);
    }

    fn put_fmt(&mut self, args: fmt::Arguments<'_>) {
        let _ = self.write_fmt(args);
    }
}

impl<const N: usize> Write for Truncating<'_, N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.full {
            return Ok(());
        }
        for ch in s.chars() {
            if self.buf.push(ch).is_err() {
                self.full = true;
                break;
            }
        }
        Ok(())
    }
}
