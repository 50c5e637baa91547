//! System configuration parameters
//!
//! Every tunable of the monitor is a compile-time constant.  [`MonitorConfig`]
//! gathers the ones the decision loop consumes so they can be validated once
//! at startup and passed around as a value.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// --- Calibration & ideal band ---

/// Fixed correction added to every raw RTD reading (Celsius).
pub const TEMP_OFFSET_C: f32 = -5.70;
/// Lower bound of the ideal band (Celsius, inclusive).
pub const TEMP_MIN_IDEAL_C: f32 = -6.0;
/// Upper bound of the ideal band (Celsius, inclusive).
pub const TEMP_MAX_IDEAL_C: f32 = 5.0;

const _: () = assert!(TEMP_MIN_IDEAL_C < TEMP_MAX_IDEAL_C);

// --- Timing ---

/// Main loop period (milliseconds).
pub const TICK_PERIOD_MS: u32 = 1000;
/// Delay before the first tick so the converter settles after configuration.
pub const STARTUP_DELAY_MS: u32 = 1000;

// --- RTD converter (MAX31865) ---

/// Reference resistor fitted on the MAX31865 board (ohms).
pub const RTD_REFERENCE_OHMS: f32 = 430.0;
/// PT100 nominal resistance at 0 °C (ohms).
pub const RTD_NOMINAL_OHMS: f32 = 100.0;

// --- Network ---

pub const WIFI_SSID: &str = "pt100-monitor";
pub const WIFI_PASSWORD: &str = "change-me-please";

pub const MQTT_BROKER_URL: &str = "mqtt://192.168.0.10:1883";
pub const MQTT_CLIENT_ID: &str = "pt100-monitor";
/// Corrected temperature, two decimals.
pub const MQTT_TOPIC_TEMPERATURE: &str = "sensor/pt100/temperatura";
/// Status text (`ABAIXO` / `ACIMA` / `OK`).
pub const MQTT_TOPIC_STATUS: &str = "sensor/pt100/status";

/// Parameters consumed by the decision loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    // --- Calibration ---
    /// Offset added to raw readings (Celsius)
    pub temp_offset_c: f32,
    /// Ideal band lower bound (Celsius)
    pub temp_min_ideal_c: f32,
    /// Ideal band upper bound (Celsius)
    pub temp_max_ideal_c: f32,

    // --- Timing ---
    /// Loop period (milliseconds)
    pub tick_period_ms: u32,
    /// One-off delay before the first tick (milliseconds)
    pub startup_delay_ms: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            temp_offset_c: TEMP_OFFSET_C,
            temp_min_ideal_c: TEMP_MIN_IDEAL_C,
            temp_max_ideal_c: TEMP_MAX_IDEAL_C,
            tick_period_ms: TICK_PERIOD_MS,
            startup_delay_ms: STARTUP_DELAY_MS,
        }
    }
}

impl MonitorConfig {
    /// Reject values that would make the loop misbehave.
    ///
    /// Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<()> {
        if !self.temp_offset_c.is_finite() {
            return Err(Error::Config("temp_offset_c must be finite"));
        }
        if !self.temp_min_ideal_c.is_finite() || !self.temp_max_ideal_c.is_finite() {
            return Err(Error::Config("ideal band bounds must be finite"));
        }
        if self.temp_min_ideal_c >= self.temp_max_ideal_c {
            return Err(Error::Config("temp_min_ideal_c must be below temp_max_ideal_c"));
        }
        if self.tick_period_ms == 0 {
            return Err(Error::Config("tick_period_ms must be non-zero"));
        }
        Ok(())
    }
}
