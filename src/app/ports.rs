//! Port traits: the hexagonal boundary between the decision loop and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MonitorService (domain)
//! ```
//!
//! Driven adapters (RTD converter, OLED, alert LED, MQTT, log) implement
//! these traits.  The [`MonitorService`](super::service::MonitorService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::error::{CommsError, DisplayFault, SensorFault};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// One blocking acquisition from the RTD converter.
pub trait SensorPort {
    /// Raw temperature in Celsius, or why there is none this tick.
    fn read(&mut self) -> Result<f32, SensorFault>;
}

// ───────────────────────────────────────────────────────────────
// Alert port (driven adapter: domain → GPIO)
// ───────────────────────────────────────────────────────────────

/// Single binary alert output, written every tick.
pub trait AlertPort {
    fn set_alert(&mut self, active: bool);
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → OLED)
// ───────────────────────────────────────────────────────────────

/// Text-only view of the OLED.
pub trait DisplayPort {
    /// Blank the frame buffer.
    fn clear(&mut self) -> Result<(), DisplayFault>;

    /// Draw `text` with its top-left corner at (`x`, `y`).
    fn draw_text(&mut self, x: i32, y: i32, text: &str, inverted: bool)
    -> Result<(), DisplayFault>;

    /// Push the frame buffer to the panel.
    fn flush(&mut self) -> Result<(), DisplayFault>;
}

// ───────────────────────────────────────────────────────────────
// Telemetry port (driven adapter: domain → MQTT)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget publisher.  Callers only log a returned error.
pub trait TelemetryPort {
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
