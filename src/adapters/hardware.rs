//! Hardware adapter: bridges the real peripherals to the domain port traits.
//!
//! Owns the RTD converter and the alert output, exposing them through
//! [`SensorPort`] and [`AlertPort`] so the monitor takes one `&mut` for
//! "the board".  The display stays a separate port because it is drawn
//! through the render pass rather than written once per decision.

use crate::app::ports::{AlertPort, SensorPort};
use crate::error::SensorFault;

/// Concrete adapter that combines the sensing and alert hardware.
pub struct HardwareAdapter<S, A> {
    sensor: S,
    alert: A,
}

impl<S: SensorPort, A: AlertPort> HardwareAdapter<S, A> {
    pub fn new(sensor: S, alert: A) -> Self {
        Self { sensor, alert }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<S: SensorPort, A> SensorPort for HardwareAdapter<S, A> {
    fn read(&mut self) -> Result<f32, SensorFault> {
        self.sensor.read()
    }
}

// ── AlertPort implementation ──────────────────────────────────

impl<S, A: AlertPort> AlertPort for HardwareAdapter<S, A> {
    fn set_alert(&mut self, active: bool) {
        self.alert.set_alert(active);
    }
}
