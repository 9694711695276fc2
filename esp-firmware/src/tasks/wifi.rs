// WiFi Tasks und Helfer - Netzwerk-Stack, IP-Adresse, Reconnect
use core::net::Ipv4Addr;

use defmt::{Debug2Format, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_core::WifiCredentials;
use esp_radio::wifi::{
    AccessPointConfig, AuthMethod, ClientConfig, ModeConfig, WifiController, WifiDevice,
    WifiEvent,
};

use crate::config::RECONNECT_DELAY_SECS;

/// Network Task
///
/// Überwacht einen Netzwerk-Stack:
/// - Prozessiert Netzwerk-Pakete
/// - Managed TCP/IP Stack
///
/// **Task Pool:** 2 Instanzen - eine für STA (Heimnetz), eine für AP (Portal)
#[embassy_executor::task(pool_size = 2)]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// WiFi Link Monitor Task
///
/// Läuft nach erfolgreicher Bereitstellung:
/// - Wartet auf Verbindungsabbruch
/// - Verbindet mit denselben Zugangsdaten neu (Controller bleibt konfiguriert)
#[embassy_executor::task]
pub async fn link_monitor_task(
    mut controller: WifiController<'static>,
    ssid: heapless::String<32>,
) {
    info!("WiFi: Link monitor started for '{}'", ssid.as_str());

    loop {
        controller.wait_for_event(WifiEvent::StaDisconnected).await;
        warn!("WiFi: Disconnected from '{}', will retry...", ssid.as_str());

        loop {
            Timer::after(Duration::from_secs(RECONNECT_DELAY_SECS)).await;
            match controller.connect_async().await {
                Ok(_) => {
                    info!("WiFi: Reconnected successfully!");
                    break;
                }
                Err(e) => {
                    warn!("WiFi: Reconnect failed: {}", Debug2Format(&e));
                }
            }
        }
    }
}

/// Wartet bis der Stack Link und eine IPv4-Adresse hat
///
/// Loggt danach die Netzwerk-Konfiguration und gibt die Adresse zurück.
pub async fn wait_for_ipv4(stack: Stack<'static>) -> Ipv4Addr {
    while !stack.is_link_up() {
        Timer::after(Duration::from_millis(500)).await;
    }

    info!("WiFi: Link is up, waiting for IP address...");

    loop {
        if let Some(config) = stack.config_v4() {
            let address = config.address.address();
            info!("WiFi: Got IP address!");
            info!("  IP:      {}", Debug2Format(&address));
            info!("  Gateway: {}", Debug2Format(&config.gateway));
            info!("  DNS:     {}", Debug2Format(&config.dns_servers));
            return address;
        }
        Timer::after(Duration::from_millis(500)).await;
    }
}

/// Aktuelle IPv4-Adresse des Stacks (None ohne DHCP-Lease)
pub fn current_ipv4(stack: Stack<'_>) -> Option<Ipv4Addr> {
    stack.config_v4().map(|config| config.address.address())
}

/// Station-Modus für die angegebenen Zugangsdaten
pub fn client_mode(credentials: &WifiCredentials) -> ModeConfig {
    let config = ClientConfig::default().with_ssid(credentials.ssid.as_str().into());
    let config = if credentials.is_open_network() {
        config.with_auth_method(AuthMethod::None)
    } else {
        config.with_password(credentials.password.as_str().into())
    };
    ModeConfig::Client(config)
}

/// Offener Access Point für das Setup-Portal
pub fn access_point_mode(ssid: &str) -> ModeConfig {
    ModeConfig::AccessPoint(
        AccessPointConfig::default()
            .with_ssid(ssid.into())
            .with_auth_method(AuthMethod::None),
    )
}
