//! Calibration and range policy.
//!
//! A raw RTD temperature becomes a [`Reading`] by adding the fixed offset;
//! the corrected value is then classified against the ideal band.  The band
//! is inclusive on both ends: only values strictly outside it raise an alert.

use crate::config::MonitorConfig;
use crate::error::SensorFault;

/// Classification of one tick's reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeStatus {
    BelowIdeal,
    AboveIdeal,
    Ok,
    SensorError,
}

impl RangeStatus {
    /// Status text shown on the display and published over MQTT.
    pub const fn label(self) -> &'static str {
        match self {
            Self::BelowIdeal => "ABAIXO",
            Self::AboveIdeal => "ACIMA",
            Self::Ok => "OK",
            Self::SensorError => "ERRO",
        }
    }

    /// Level of the alert output for this status.
    pub const fn alert_active(self) -> bool {
        match self {
            Self::BelowIdeal | Self::AboveIdeal | Self::SensorError => true,
            Self::Ok => false,
        }
    }
}

/// One acquisition after calibration.
///
/// The corrected temperature only exists for a valid reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Valid {
        raw_celsius: f32,
        corrected_celsius: f32,
    },
    Invalid(SensorFault),
}

impl Reading {
    /// Build a reading from the sensor port's result.
    pub fn acquire(raw: Result<f32, SensorFault>, calibration: &Calibration) -> Self {
        match raw {
            Ok(raw_celsius) if raw_celsius.is_finite() => Self::Valid {
                raw_celsius,
                corrected_celsius: calibration.correct(raw_celsius),
            },
            Ok(_) => Self::Invalid(SensorFault::Implausible),
            Err(fault) => Self::Invalid(fault),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    pub fn corrected(&self) -> Option<f32> {
        match *self {
            Self::Valid {
                corrected_celsius, ..
            } => Some(corrected_celsius),
            Self::Invalid(_) => None,
        }
    }

    /// Status of this reading.  An invalid reading is always `SensorError`.
    pub fn status(&self, calibration: &Calibration) -> RangeStatus {
        match self.corrected() {
            Some(t) => calibration.classify(t),
            None => RangeStatus::SensorError,
        }
    }
}

/// Offset plus ideal band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    offset_c: f32,
    ideal_min_c: f32,
    ideal_max_c: f32,
}

impl Calibration {
    pub const fn new(offset_c: f32, ideal_min_c: f32, ideal_max_c: f32) -> Self {
        Self {
            offset_c,
            ideal_min_c,
            ideal_max_c,
        }
    }

    pub fn from_config(config: &MonitorConfig) -> Self {
        Self::new(
            config.temp_offset_c,
            config.temp_min_ideal_c,
            config.temp_max_ideal_c,
        )
    }

    pub fn correct(&self, raw_celsius: f32) -> f32 {
        raw_celsius + self.offset_c
    }

    pub fn classify(&self, corrected_celsius: f32) -> RangeStatus {
        if corrected_celsius < self.ideal_min_c {
            RangeStatus::BelowIdeal
        } else if corrected_celsius > self.ideal_max_c {
            RangeStatus::AboveIdeal
        } else {
            RangeStatus::Ok
        }
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::from_config(&MonitorConfig::default())
    }
}
