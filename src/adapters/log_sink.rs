//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (the ESP-IDF logger on the device, which goes to UART).

use log::{error, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | monitor loop running");
            }
            AppEvent::SensorFault(fault) => {
                error!("SENSOR | read failed: {}", fault);
            }
            AppEvent::StatusChanged { from, to } => match from {
                Some(from) => info!("STATUS | {} -> {}", from.label(), to.label()),
                None => info!("STATUS | initial={}", to.label()),
            },
            AppEvent::ModeChanged { from, to } => {
                info!("MODE | {:?} -> {:?}", from, to);
            }
            AppEvent::NewMaximum(t) => {
                info!("EXTREME | max={:.2}\u{00b0}C", t);
            }
            AppEvent::NewMinimum(t) => {
                info!("EXTREME | min={:.2}\u{00b0}C", t);
            }
            AppEvent::Published { celsius, status } => {
                info!("TELEM | T={:.2}\u{00b0}C status={}", celsius, status.label());
            }
        }
    }
}
