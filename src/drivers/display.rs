//! OLED text adapter.
//!
//! Bridges [`DisplayPort`] onto any monochrome `embedded-graphics` draw
//! target that can also present its frame buffer ([`FrameFlush`]).  On the
//! device that is an SSD1306 128x64 in buffered-graphics mode; tests use an
//! in-memory canvas.
//!
//! Text is drawn with the 6x10 ASCII font, top-left anchored.  `inverted`
//! draws dark glyphs on a lit background.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::{DisplaySize, WriteOnlyDataCommand};
use ssd1306::Ssd1306;

use crate::app::ports::DisplayPort;
use crate::error::DisplayFault;

/// Present a buffered frame on the panel.
pub trait FrameFlush {
    fn flush_frame(&mut self) -> Result<(), DisplayFault>;
}

impl<DI, SIZE> FrameFlush for Ssd1306<DI, SIZE, BufferedGraphicsMode<SIZE>>
where
    DI: WriteOnlyDataCommand,
    SIZE: DisplaySize,
{
    fn flush_frame(&mut self) -> Result<(), DisplayFault> {
        self.flush().map_err(|_| DisplayFault::Flush)
    }
}

pub struct OledDisplay<D> {
    target: D,
    normal: MonoTextStyle<'static, BinaryColor>,
    inverted: MonoTextStyle<'static, BinaryColor>,
}

impl<D> OledDisplay<D>
where
    D: DrawTarget<Color = BinaryColor> + FrameFlush,
{
    pub fn new(target: D) -> Self {
        Self {
            target,
            normal: MonoTextStyleBuilder::new()
                .font(&FONT_6X10)
                .text_color(BinaryColor::On)
                .build(),
            inverted: MonoTextStyleBuilder::new()
                .font(&FONT_6X10)
                .text_color(BinaryColor::Off)
                .background_color(BinaryColor::On)
                .build(),
        }
    }

    pub fn target(&self) -> &D {
        &self.target
    }
}

impl<D> DisplayPort for OledDisplay<D>
where
    D: DrawTarget<Color = BinaryColor> + FrameFlush,
{
    fn clear(&mut self) -> Result<(), DisplayFault> {
        self.target
            .clear(BinaryColor::Off)
            .map_err(|_| DisplayFault::Draw)
    }

    fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        inverted: bool,
    ) -> Result<(), DisplayFault> {
        let style = if inverted { self.inverted } else { self.normal };
        Text::with_baseline(text, Point::new(x, y), style, Baseline::Top)
            .draw(&mut self.target)
            .map(|_| ())
            .map_err(|_| DisplayFault::Draw)
    }

    fn flush(&mut self) -> Result<(), DisplayFault> {
        self.target.flush_frame()
    }
}
