//! Sensor drivers.
//!
//! The RTD converter is the only sensor; it implements
//! [`SensorPort`](crate::app::ports::SensorPort) directly.

pub mod max31865;
