//! WiFi station-mode adapter.
//!
//! Validates the compiled-in credentials and, on the device, brings the
//! ESP-IDF station up through `esp_idf_svc::wifi::BlockingWifi`.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver via [`WifiStation`].
//! - **all other targets**: only [`WifiCredentials`] and validation, for tests.
//!
//! ## Reconnection policy
//!
//! None beyond "associate again when the link is down".  [`WifiStation::new`]
//! only starts the driver; the first association and every later one go
//! through `Station::ensure_connected`, called by
//! [`LinkSupervisor`](crate::adapters::supervisor::LinkSupervisor) on a
//! fixed period.

use core::fmt;

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
        }
    }
}

impl core::error::Error for ConnectivityError {}

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(ConnectivityError::InvalidSsid);
    }
    if !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// Credentials
// ───────────────────────────────────────────────────────────────

/// Station credentials, sized to the ESP-IDF `wifi_sta_config_t` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
}

impl WifiCredentials {
    pub fn new(ssid: &str, password: &str) -> Result<Self, ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        let mut creds = Self {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
        };
        creds.ssid.push_str(ssid).map_err(|_| ConnectivityError::InvalidSsid)?;
        creds.password.push_str(password).map_err(|_| ConnectivityError::InvalidPassword)?;
        Ok(creds)
    }

    /// Credentials compiled in from [`crate::config`].
    pub fn from_config() -> Result<Self, ConnectivityError> {
        Self::new(crate::config::WIFI_SSID, crate::config::WIFI_PASSWORD)
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// An empty password means an open network.
    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF station
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
pub use station::WifiStation;

#[cfg(target_os = "espidf")]
mod station {
    use esp_idf_hal::modem::Modem;
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::nvs::EspDefaultNvsPartition;
    use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
    use log::{info, warn};

    use super::{ConnectivityError, WifiCredentials};
    use crate::adapters::supervisor::Station;

    pub struct WifiStation {
        wifi: BlockingWifi<EspWifi<'static>>,
        ssid: heapless::String<32>,
    }

    impl WifiStation {
        /// Configure and start the driver.  Does not associate; that is
        /// [`Station::ensure_connected`]'s job, so an absent AP at boot is
        /// just the first failed attempt.
        pub fn new(
            modem: Modem,
            sysloop: EspSystemEventLoop,
            nvs: EspDefaultNvsPartition,
            creds: &WifiCredentials,
        ) -> anyhow::Result<Self> {
            let esp_wifi = EspWifi::new(modem, sysloop.clone(), Some(nvs))?;
            let mut wifi = BlockingWifi::wrap(esp_wifi, sysloop)?;

            let auth_method = if creds.is_open() {
                AuthMethod::None
            } else {
                AuthMethod::WPA2Personal
            };
            wifi.set_configuration(&Configuration::Client(ClientConfiguration {
                ssid: creds.ssid().try_into().map_err(|_| ConnectivityError::InvalidSsid)?,
                password: creds
                    .password()
                    .try_into()
                    .map_err(|_| ConnectivityError::InvalidPassword)?,
                auth_method,
                ..Default::default()
            }))?;

            wifi.start()?;
            info!("WiFi: driver started for '{}'", creds.ssid());

            Ok(Self {
                wifi,
                ssid: creds.ssid.clone(),
            })
        }

        /// Associated and holding an IP.
        pub fn is_up(&self) -> bool {
            self.wifi.is_up().unwrap_or(false)
        }
    }

    impl Station for WifiStation {
        fn ensure_connected(&mut self) -> bool {
            if self.is_up() {
                return true;
            }
            info!("WiFi: associating with '{}'", self.ssid);
            let res = self.wifi.connect().and_then(|()| self.wifi.wait_netif_up());
            match res {
                Ok(()) => {
                    match self.wifi.wifi().sta_netif().get_ip_info() {
                        Ok(ip) => info!("WiFi: connected, IP {}", ip.ip),
                        Err(_) => info!("WiFi: connected"),
                    }
                    true
                }
                Err(e) => {
                    warn!("WiFi: {}: {:?}", ConnectivityError::ConnectionFailed, e);
                    let _ = self.wifi.disconnect();
                    false
                }
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
