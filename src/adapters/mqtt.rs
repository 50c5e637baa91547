//! MQTT telemetry adapter.
//!
//! [`MqttTelemetry`] implements [`TelemetryPort`] over a shared client
//! slot.  The slot starts empty; `main` installs the ESP-IDF client once WiFi
//! is up, and the monitor task only ever sees the port.  Until then every
//! publish returns [`CommsError::MqttNotStarted`].
//!
//! The link flag in [`SharedState`](crate::shared::SharedState) is driven
//! by [`apply_link_event`] from the connection-poll thread:
//!
//! ```text
//!   EspMqttConnection::next() ──▶ LinkEvent ──▶ LinkFlag::set()
//! ```
//!
//! All publishes are QoS 1, not retained.

use std::sync::{Arc, Mutex, PoisonError};

use log::info;

use crate::app::ports::TelemetryPort;
use crate::error::CommsError;
use crate::shared::LinkFlag;

/// The one client operation the port needs.
pub trait MqttPublisher {
    /// Enqueue `payload` on `topic` at QoS 1 without the retain flag.
    fn publish_qos1(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError>;
}

/// Shared, initially empty client slot.  Clones share the same slot.
pub struct MqttTelemetry<C> {
    slot: Arc<Mutex<Option<C>>>,
}

impl<C> Clone for MqttTelemetry<C> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<C> Default for MqttTelemetry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> MqttTelemetry<C> {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Put a started client into the slot, replacing any previous one.
    pub fn install(&self, client: C) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(client);
    }

    pub fn is_installed(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl<C: MqttPublisher> TelemetryPort for MqttTelemetry<C> {
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), CommsError> {
        let mut guard = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut() {
            Some(client) => client.publish_qos1(topic, payload.as_bytes()),
            None => Err(CommsError::MqttNotStarted),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Connection events
// ───────────────────────────────────────────────────────────────

/// The connection events the firmware reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    Connected,
    Disconnected,
    Published(u32),
    Other,
}

pub fn apply_link_event(link: &LinkFlag, event: LinkEvent) {
    match event {
        LinkEvent::Connected => {
            info!("MQTT | connected to broker");
            link.set(true);
        }
        LinkEvent::Disconnected => {
            info!("MQTT | disconnected from broker");
            link.set(false);
        }
        LinkEvent::Published(msg_id) => info!("MQTT | published msg_id={}", msg_id),
        LinkEvent::Other => {}
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF client
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use esp::{start, EspBroker};

#[cfg(target_os = "espidf")]
mod esp {
    use std::thread;

    use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration, QoS};

    use super::{apply_link_event, CommsError, LinkEvent, MqttPublisher, MqttTelemetry};
    use crate::adapters::supervisor::Broker;
    use crate::config::{MQTT_BROKER_URL, MQTT_CLIENT_ID};
    use crate::shared::SharedState;

    const POLL_STACK_SIZE: usize = 6144;

    impl MqttPublisher for EspMqttClient<'static> {
        fn publish_qos1(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError> {
            self.publish(topic, QoS::AtLeastOnce, false, payload)
                .map(|_| ())
                .map_err(|e| {
                    log::warn!("MQTT | publish on '{}' failed: {:?}", topic, e);
                    CommsError::MqttPublishFailed
                })
        }
    }

    /// Create the client, spawn the connection-poll thread, and install the
    /// client into `telemetry`.
    pub fn start(
        shared: &'static SharedState,
        telemetry: &MqttTelemetry<EspMqttClient<'static>>,
    ) -> anyhow::Result<()> {
        let conf = MqttClientConfiguration {
            client_id: Some(MQTT_CLIENT_ID),
            ..Default::default()
        };
        let (client, mut conn) = EspMqttClient::new(MQTT_BROKER_URL, &conf)?;

        thread::Builder::new()
            .name("mqtt-poll".to_string())
            .stack_size(POLL_STACK_SIZE)
            .spawn(move || {
                while let Ok(event) = conn.next() {
                    let ev = match event.payload() {
                        EventPayload::Connected(_) => LinkEvent::Connected,
                        EventPayload::Disconnected => LinkEvent::Disconnected,
                        EventPayload::Published(id) => LinkEvent::Published(id),
                        _ => LinkEvent::Other,
                    };
                    apply_link_event(&shared.link, ev);
                }
                apply_link_event(&shared.link, LinkEvent::Disconnected);
                log::warn!("MQTT | connection closed, poll thread exiting");
            })?;

        telemetry.install(client);
        log::info!("MQTT | client started ({})", MQTT_BROKER_URL);
        Ok(())
    }

    /// [`start`] bound to the process-wide state, for the link supervisor.
    pub struct EspBroker {
        shared: &'static SharedState,
        telemetry: MqttTelemetry<EspMqttClient<'static>>,
    }

    impl EspBroker {
        pub fn new(shared: &'static SharedState, telemetry: MqttTelemetry<EspMqttClient<'static>>) -> Self {
            Self { shared, telemetry }
        }
    }

    impl Broker for EspBroker {
        fn start(&mut self) -> anyhow::Result<()> {
            start(self.shared, &self.telemetry)
        }
    }
}
