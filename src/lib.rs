//! PT100 temperature monitor firmware library.
//!
//! Exposes the pure-logic modules for integration testing. All
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod calibration;
pub mod config;
pub mod display_mode;
pub mod error;
pub mod extremes;
pub mod render;
pub mod shared;

pub mod adapters;
pub mod drivers;
pub mod sensors;

pub mod pins;
