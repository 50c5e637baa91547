//! PT100 Monitor Firmware: main entry point
//!
//! Hexagonal architecture: one periodic monitor task, one GPIO ISR, one
//! MQTT connection-poll thread.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter      OledDisplay     MqttTelemetry            │
//! │  (Sensor + Alert)     (DisplayPort)   (TelemetryPort)          │
//! │  LogEventSink         WifiStation     ButtonBinding (ISR)      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            MonitorService (pure logic)                 │    │
//! │  │  calibrate · track extremes · classify · compose       │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  SharedState (atomics): display mode · MQTT link flag          │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::thread;
use std::time::Duration;

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::mqtt::client::EspMqttClient;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{debug, error, info};

use pt100_monitor::adapters::hardware::HardwareAdapter;
use pt100_monitor::adapters::log_sink::LogEventSink;
use pt100_monitor::adapters::mqtt::{EspBroker, MqttTelemetry};
use pt100_monitor::adapters::supervisor::LinkSupervisor;
use pt100_monitor::adapters::wifi::{WifiCredentials, WifiStation};
use pt100_monitor::app::ports::{AlertPort, DisplayPort, SensorPort, TelemetryPort};
use pt100_monitor::app::service::MonitorService;
use pt100_monitor::config::MonitorConfig;
use pt100_monitor::drivers::button::ButtonBinding;
use pt100_monitor::drivers::hw_init;
use pt100_monitor::error::CommsError;
use pt100_monitor::shared::SharedState;

// ── Process-wide state ────────────────────────────────────────

static SHARED: SharedState = SharedState::new();
static MODE_BUTTON: ButtonBinding = ButtonBinding::new(&SHARED.mode);

const MONITOR_STACK_SIZE: usize = 8192;
const NETWORK_SUPERVISE_PERIOD: Duration = Duration::from_secs(10);

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PT100 Monitor v{}                ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = MonitorConfig::default();
    config.validate()?;
    info!(
        "Config: offset={:+.2}C band=[{:.1}, {:.1}]C period={}ms",
        config.temp_offset_c, config.temp_min_ideal_c, config.temp_max_ideal_c, config.tick_period_ms
    );

    // The typed pin set is dropped unused: hw_init claims every pin by its
    // number in `pins.rs`.
    let Peripherals {
        modem, spi3, i2c0, ..
    } = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // ── 2. Peripherals (fatal on failure) ─────────────────────
    let rtd = hw_init::init_rtd(spi3)?;
    let oled = hw_init::init_oled(i2c0)?;
    let alert = hw_init::init_alert_led()?;
    hw_init::init_mode_button(&MODE_BUTTON)?;

    // ── 3. Monitor task ───────────────────────────────────────
    //
    // Owns the SPI and I2C drivers.  Telemetry goes through an empty slot
    // until the MQTT client is installed below.
    let telemetry: MqttTelemetry<EspMqttClient<'static>> = MqttTelemetry::new();
    let monitor_telemetry = telemetry.clone();
    thread::Builder::new()
        .name("monitor".to_string())
        .stack_size(MONITOR_STACK_SIZE)
        .spawn(move || {
            run_monitor(&config, HardwareAdapter::new(rtd, alert), oled, monitor_telemetry);
        })?;

    // ── 4. Network (non-fatal) ────────────────────────────────
    //
    // Only a driver that cannot even start leaves the device offline for
    // good.  An absent AP or broker is retried every period.
    let creds = WifiCredentials::from_config()?;
    let wifi = match WifiStation::new(modem, sysloop, nvs, &creds) {
        Ok(w) => w,
        Err(e) => {
            error!("{}: {:#}; MQTT publishing will not work", CommsError::WifiConnectFailed, e);
            loop {
                thread::park();
            }
        }
    };

    let mut network = LinkSupervisor::new(wifi, EspBroker::new(&SHARED, telemetry));
    loop {
        let state = network.step();
        debug!("network: {:?}", state);
        thread::sleep(NETWORK_SUPERVISE_PERIOD);
    }
}

/// The periodic decision loop.  Never returns.
fn run_monitor<H, D, T>(config: &MonitorConfig, mut hw: H, mut display: D, mut telemetry: T)
where
    H: SensorPort + AlertPort,
    D: DisplayPort,
    T: TelemetryPort,
{
    let mut sink = LogEventSink::new();
    let mut service = MonitorService::new(config, &SHARED);

    FreeRtos::delay_ms(config.startup_delay_ms);
    service.start(&mut sink);

    loop {
        let report = service.tick(&mut hw, &mut display, &mut telemetry, &mut sink);
        debug!(
            "tick {} status={} mode={:?} published={}",
            service.tick_count(),
            report.status.label(),
            report.mode,
            report.published
        );
        FreeRtos::delay_ms(config.tick_period_ms);
    }
}
