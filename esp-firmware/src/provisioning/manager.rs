// WifiManager - bekanntes Netz oder Setup-Portal
use core::net::Ipv4Addr;

use defmt::{Debug2Format, error, info, warn};
use embassy_net::Stack;
use embassy_time::{Duration, Instant, TimeoutError, with_timeout};
use esp_core::{NetworkProvisioner, ProvisioningError, WifiCredentials};
use esp_radio::wifi::{ModeConfig, WifiController};

use super::portal::collect_credentials;
use crate::config::{AP_IP, KNOWN_WIFI_PASSWORD, KNOWN_WIFI_SSID, STA_CONNECT_TIMEOUT_SECS};
use crate::tasks::wifi::{access_point_mode, client_mode, wait_for_ipv4};

/// Ergebnis einer erfolgreichen Bereitstellung
///
/// Der Controller wird an den Link-Monitor weitergereicht, der Stack
/// an den HTTP-Server.
pub struct Uplink {
    pub stack: Stack<'static>,
    pub address: Ipv4Addr,
    pub controller: WifiController<'static>,
    pub credentials: WifiCredentials,
}

/// Verbindet mit einem bekannten Netz oder öffnet das Setup-Portal
///
/// Beide Stacks laufen dauerhaft (siehe `net_task`); umgeschaltet wird
/// nur der Modus des Funk-Controllers.
pub struct WifiManager {
    controller: WifiController<'static>,
    sta_stack: Stack<'static>,
    ap_stack: Stack<'static>,
}

impl WifiManager {
    pub fn new(
        controller: WifiController<'static>,
        sta_stack: Stack<'static>,
        ap_stack: Stack<'static>,
    ) -> Self {
        Self {
            controller,
            sta_stack,
            ap_stack,
        }
    }

    /// Zugangsdaten aus der Build-Zeit, falls vorhanden und gültig
    fn known_credentials() -> Option<WifiCredentials> {
        let ssid = KNOWN_WIFI_SSID?;
        match WifiCredentials::new(ssid, KNOWN_WIFI_PASSWORD.unwrap_or("")) {
            Ok(credentials) => Some(credentials),
            Err(e) => {
                warn!("WiFi: Ignoring build-time credentials: {}", e);
                None
            }
        }
    }

    /// Stoppt den Controller (falls gestartet) und startet ihn im neuen Modus
    async fn switch_mode(&mut self, mode: &ModeConfig) -> Result<(), ProvisioningError> {
        if matches!(self.controller.is_started(), Ok(true)) {
            if let Err(e) = self.controller.stop_async().await {
                warn!("WiFi: Failed to stop: {}", Debug2Format(&e));
            }
        }

        self.controller.set_config(mode).map_err(|e| {
            error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
            ProvisioningError::Radio
        })?;

        self.controller.start_async().await.map_err(|e| {
            error!("WiFi: Failed to start: {}", Debug2Format(&e));
            ProvisioningError::Radio
        })
    }

    /// Verbindet im Station-Modus, begrenzt durch STA_CONNECT_TIMEOUT_SECS
    async fn join(&mut self, credentials: &WifiCredentials) -> Result<Ipv4Addr, ProvisioningError> {
        self.switch_mode(&client_mode(credentials)).await?;
        info!("WiFi: Connecting to '{}'...", credentials.ssid.as_str());

        let stack = self.sta_stack;
        let controller = &mut self.controller;
        let attempt = async move {
            controller.connect_async().await.map_err(|e| {
                warn!("WiFi: Connection failed: {}", Debug2Format(&e));
            })?;
            Ok::<_, ()>(wait_for_ipv4(stack).await)
        };

        match with_timeout(Duration::from_secs(STA_CONNECT_TIMEOUT_SECS), attempt).await {
            Ok(Ok(address)) => Ok(address),
            Ok(Err(())) => Err(ProvisioningError::Timeout),
            Err(TimeoutError) => {
                warn!("WiFi: No connection after {} s", STA_CONNECT_TIMEOUT_SECS);
                Err(ProvisioningError::Timeout)
            }
        }
    }

    fn into_uplink(self, credentials: WifiCredentials, address: Ipv4Addr) -> Uplink {
        Uplink {
            stack: self.sta_stack,
            address,
            controller: self.controller,
            credentials,
        }
    }
}

impl NetworkProvisioner for WifiManager {
    type Network = Uplink;

    async fn acquire_network(
        mut self,
        ap_identifier: &str,
        timeout_secs: u64,
    ) -> Result<Uplink, ProvisioningError> {
        // 1. Bekanntes Netz
        match Self::known_credentials() {
            Some(credentials) => match self.join(&credentials).await {
                Ok(address) => return Ok(self.into_uplink(credentials, address)),
                Err(ProvisioningError::Radio) => return Err(ProvisioningError::Radio),
                Err(ProvisioningError::Timeout) => {
                    warn!("WiFi: Known network unreachable, starting setup portal");
                }
            },
            None => info!("WiFi: No known network, starting setup portal"),
        }

        // 2. Setup-Portal bis zum Erfolg oder bis zur Deadline
        let deadline = Instant::now() + Duration::from_secs(timeout_secs);
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.as_ticks() == 0 {
                return Err(ProvisioningError::Timeout);
            }

            self.switch_mode(&access_point_mode(ap_identifier)).await?;
            info!(
                "Portal: '{}' open at http://{} for {} s",
                ap_identifier,
                Debug2Format(&AP_IP),
                remaining.as_secs()
            );

            let portal = collect_credentials(self.ap_stack);
            let credentials = match with_timeout(remaining, portal).await {
                Ok(credentials) => credentials,
                Err(TimeoutError) => {
                    warn!("Portal: No credentials within {} s", timeout_secs);
                    return Err(ProvisioningError::Timeout);
                }
            };

            info!("Portal: Credentials received for '{}'", credentials.ssid.as_str());
            match self.join(&credentials).await {
                Ok(address) => return Ok(self.into_uplink(credentials, address)),
                Err(ProvisioningError::Radio) => return Err(ProvisioningError::Radio),
                Err(ProvisioningError::Timeout) => {
                    warn!(
                        "Portal: Could not join '{}', reopening portal",
                        credentials.ssid.as_str()
                    );
                }
            }
        }
    }
}
