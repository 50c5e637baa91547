//! Monitor service: the hexagonal core.
//!
//! [`MonitorService`] owns the calibration policy and the extremes tracker,
//! and reads the ISR/callback-written [`SharedState`].  Each call to
//! [`MonitorService::tick`] is one pass of the main loop:
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ AlertPort
//!                 │        MonitorService        │ ──▶ DisplayPort
//!  SharedState ──▶│ calibrate · track · classify │ ──▶ TelemetryPort
//!                 └──────────────────────────────┘ ──▶ EventSink
//! ```
//!
//! The caller sleeps between ticks; the service never blocks beyond the
//! sensor read itself.

use log::warn;

use crate::calibration::{Calibration, RangeStatus, Reading};
use crate::config::{MQTT_TOPIC_STATUS, MQTT_TOPIC_TEMPERATURE, MonitorConfig};
use crate::display_mode::DisplayMode;
use crate::extremes::{Extremes, ExtremesTracker};
use crate::render::{self, RenderFrame};
use crate::shared::SharedState;

use super::events::AppEvent;
use super::ports::{AlertPort, DisplayPort, EventSink, SensorPort, TelemetryPort};

/// Everything one tick decided.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub reading: Reading,
    pub status: RangeStatus,
    pub alert_active: bool,
    pub mode: DisplayMode,
    pub frame: RenderFrame,
    /// Whether the temperature/status pair was handed to the publisher.
    pub published: bool,
}

pub struct MonitorService<'a> {
    calibration: Calibration,
    extremes: ExtremesTracker,
    shared: &'a SharedState,
    last_status: Option<RangeStatus>,
    last_mode: DisplayMode,
    tick_count: u64,
}

impl<'a> MonitorService<'a> {
    pub fn new(config: &MonitorConfig, shared: &'a SharedState) -> Self {
        Self {
            calibration: Calibration::from_config(config),
            extremes: ExtremesTracker::new(),
            shared,
            last_status: None,
            last_mode: shared.mode.current(),
            tick_count: 0,
        }
    }

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one cycle: read → decide → alert → render → publish.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`AlertPort`] so a single board adapter can own both pins.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + AlertPort),
        display: &mut impl DisplayPort,
        telemetry: &mut impl TelemetryPort,
        sink: &mut impl EventSink,
    ) -> TickReport {
        self.tick_count += 1;

        // 1. Acquire
        let reading = Reading::acquire(hw.read(), &self.calibration);

        // 2. Decide (extremes only move on a valid reading)
        match reading {
            Reading::Valid {
                corrected_celsius, ..
            } => self.track_extremes(corrected_celsius, sink),
            Reading::Invalid(fault) => sink.emit(&AppEvent::SensorFault(fault)),
        }
        let status = reading.status(&self.calibration);
        if self.last_status != Some(status) {
            sink.emit(&AppEvent::StatusChanged {
                from: self.last_status,
                to: status,
            });
            self.last_status = Some(status);
        }

        // 3. Alert output, unconditionally
        let alert_active = status.alert_active();
        hw.set_alert(alert_active);

        // 4. Render for the mode as of this tick
        let mode = self.shared.mode.current();
        if mode != self.last_mode {
            sink.emit(&AppEvent::ModeChanged {
                from: self.last_mode,
                to: mode,
            });
            self.last_mode = mode;
        }
        let frame = render::compose(&reading, status, self.extremes.current(), mode);
        if let Err(e) = frame.draw_on(display) {
            warn!("Display refresh failed: {}", e);
        }

        // 5. Publish when both the reading and the link allow it
        let published = self.publish(&reading, status, telemetry, sink);

        TickReport {
            reading,
            status,
            alert_active,
            mode,
            frame,
            published,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn extremes(&self) -> Option<Extremes> {
        self.extremes.current()
    }

    /// Total ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // ── Internal ──────────────────────────────────────────────

    fn track_extremes(&mut self, corrected_c: f32, sink: &mut impl EventSink) {
        let upd = self.extremes.update(corrected_c);
        if upd.new_max {
            sink.emit(&AppEvent::NewMaximum(corrected_c));
        }
        if upd.new_min {
            sink.emit(&AppEvent::NewMinimum(corrected_c));
        }
    }

    fn publish(
        &self,
        reading: &Reading,
        status: RangeStatus,
        telemetry: &mut impl TelemetryPort,
        sink: &mut impl EventSink,
    ) -> bool {
        let Some(celsius) = reading.corrected() else {
            return false;
        };
        if !self.shared.link.is_up() {
            return false;
        }

        let payload = render::telemetry_payload(celsius);
        let temp_sent = telemetry.publish(MQTT_TOPIC_TEMPERATURE, &payload);
        if let Err(e) = temp_sent {
            warn!("Publish to '{}' failed: {}", MQTT_TOPIC_TEMPERATURE, e);
        }
        let status_sent = telemetry.publish(MQTT_TOPIC_STATUS, status.label());
        if let Err(e) = status_sent {
            warn!("Publish to '{}' failed: {}", MQTT_TOPIC_STATUS, e);
        }
        if temp_sent.is_ok() && status_sent.is_ok() {
            sink.emit(&AppEvent::Published { celsius, status });
        }
        true
    }
}
