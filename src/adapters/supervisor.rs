//! Network bring-up supervisor.
//!
//! Runs on the main thread at a fixed period.  Each [`LinkSupervisor::step`]
//! associates the station if it is down and, once it is up, starts the MQTT
//! client.  A failed association or a failed client start is retried on the
//! next step; there is no backoff.
//!
//! ```text
//!   StationDown ──assoc ok──▶ BrokerPending ──start ok──▶ Online
//!        ▲                         │ start err: stay          │
//!        └──────── assoc lost ─────┴──────────────────────────┘
//! ```
//!
//! Once started, the MQTT client is never started again: its own reconnect
//! logic and the link flag cover broker drops.

use log::{error, info, warn};

/// The station side: associate on demand.
pub trait Station {
    /// Associate if not associated.  Returns whether the link is up.
    fn ensure_connected(&mut self) -> bool;
}

/// The broker side: bring up the MQTT client once.
pub trait Broker {
    fn start(&mut self) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkState {
    StationDown,
    BrokerPending,
    Online,
}

pub struct LinkSupervisor<S, B> {
    station: S,
    broker: B,
    broker_started: bool,
}

impl<S: Station, B: Broker> LinkSupervisor<S, B> {
    pub fn new(station: S, broker: B) -> Self {
        Self {
            station,
            broker,
            broker_started: false,
        }
    }

    pub fn step(&mut self) -> NetworkState {
        if !self.station.ensure_connected() {
            warn!("NET | station down; telemetry paused");
            return NetworkState::StationDown;
        }
        if self.broker_started {
            return NetworkState::Online;
        }
        match self.broker.start() {
            Ok(()) => {
                info!("NET | MQTT client started");
                self.broker_started = true;
                NetworkState::Online
            }
            Err(e) => {
                error!("NET | MQTT start failed: {:#}; retrying", e);
                NetworkState::BrokerPending
            }
        }
    }

    pub fn broker_started(&self) -> bool {
        self.broker_started
    }
}
