//! Alert LED driver.
//!
//! Any `embedded-hal` output pin (an ESP-IDF `PinDriver<Output>` on the
//! device).  Active HIGH.  Pin errors are logged and otherwise ignored: the
//! level is rewritten on the next tick anyway.

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::AlertPort;

pub struct AlertLed<P> {
    pin: P,
    active: bool,
}

impl<P: OutputPin> AlertLed<P> {
    /// Take the pin and drive it LOW.
    pub fn new(pin: P) -> Self {
        let mut led = Self { pin, active: true };
        led.set_alert(false);
        led
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl<P: OutputPin> AlertPort for AlertLed<P> {
    fn set_alert(&mut self, active: bool) {
        let res = if active {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        match res {
            Ok(()) => self.active = active,
            Err(e) => warn!("Alert LED write failed: {:?}", e),
        }
    }
}
