//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements          | Connects to               |
//! |------------|---------------------|---------------------------|
//! | `hardware` | SensorPort          | MAX31865 over SPI         |
//! |            | AlertPort           | Alert LED GPIO            |
//! | `log_sink` | EventSink           | Serial log output         |
//! | `mqtt`     | TelemetryPort       | ESP-IDF MQTT client       |
//! |            | Broker              |                           |
//! | `wifi`     | Station             | ESP-IDF WiFi STA          |
//!
//! `supervisor` drives the last two from the main thread.

pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod supervisor;
pub mod wifi;
