//! Outbound application events.
//!
//! The [`MonitorService`](super::service::MonitorService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.

use crate::calibration::RangeStatus;
use crate::display_mode::DisplayMode;
use crate::error::SensorFault;

/// Structured events emitted by the decision loop.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service is about to run its first tick.
    Started,

    /// An acquisition failed this tick.
    SensorFault(SensorFault),

    /// The range status differs from the previous tick's.
    StatusChanged {
        from: Option<RangeStatus>,
        to: RangeStatus,
    },

    /// The mode button changed what the display shows.
    ModeChanged { from: DisplayMode, to: DisplayMode },

    /// A new running maximum (Celsius).
    NewMaximum(f32),

    /// A new running minimum (Celsius).
    NewMinimum(f32),

    /// Temperature and status were handed to the telemetry channel.
    Published { celsius: f32, status: RangeStatus },
}
