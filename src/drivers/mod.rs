//! Peripheral drivers and one-shot hardware initialisation.

pub mod alert_led;
pub mod button;
pub mod display;
pub mod hw_init;
