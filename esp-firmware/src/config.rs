// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen

use core::net::Ipv4Addr;

// ============================================================================
// LED Konfiguration
// ============================================================================

/// GPIO-Pin für die LED (active-high: HIGH = an)
/// Achtung: in `bin/main.rs` wird das Peripheral `GPIO2` direkt übergeben
pub const LED_GPIO_PIN: u8 = 2;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// Name des Setup-Access-Points (offenes Netz, kein Passwort)
pub const AP_SSID: &str = "ESP32_AP";

/// Bekanntes Netz: SSID aus der Build-Zeit (.env oder Environment Variable)
/// Fehlt der Wert, startet die Firmware direkt das Setup-Portal
pub const KNOWN_WIFI_SSID: Option<&str> = option_env!("WIFI_SSID");

/// Bekanntes Netz: Passwort (leer = offenes Netz)
pub const KNOWN_WIFI_PASSWORD: Option<&str> = option_env!("WIFI_PASSWORD");

/// Maximale Dauer des Setup-Portals in Sekunden, danach Neustart
pub const PORTAL_TIMEOUT_SECS: u64 = 180;

/// Maximale Dauer eines Verbindungsversuchs (Link + DHCP-Lease) in Sekunden
pub const STA_CONNECT_TIMEOUT_SECS: u64 = 20;

/// Wartezeit vor dem Neustart nach gescheiterter Bereitstellung
pub const RESTART_DELAY_SECS: u64 = 3;

/// Wartezeit nach Verbindungsabbruch bis zum erneuten Verbinden
pub const RECONNECT_DELAY_SECS: u64 = 5;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// ============================================================================
// Setup-Portal Netz (Access Point)
// ============================================================================

/// Adresse des Access Points (Gateway, DNS und Portal)
pub const AP_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 4, 1);

/// Präfix-Länge des Setup-Netzes (/24)
pub const AP_PREFIX_LEN: u8 = 24;

/// Erste vergebene Client-Adresse: 192.168.4.2
pub const DHCP_POOL_START: u8 = 2;

/// Anzahl vergebbarer Adressen (192.168.4.2 - 192.168.4.50)
pub const DHCP_POOL_SIZE: u8 = 49;

/// Lease-Dauer für Portal-Clients in Sekunden
/// Kurz, damit Clients nach dem Setup schnell wieder das Heimnetz fragen
pub const DHCP_LEASE_SECS: u32 = 30;

/// DHCP Server/Client Ports
pub const DHCP_SERVER_PORT: u16 = 67;
pub const DHCP_CLIENT_PORT: u16 = 68;

/// DNS Port für den Catch-all Responder
pub const DNS_PORT: u16 = 53;

/// UDP Buffer-Größen für DHCP/DNS (RX und TX je Socket)
pub const UDP_BUFFER_SIZE: usize = 1024;

/// Maximale Paketgröße für DHCP (576 = minimale IPv4 MTU laut RFC 2131)
pub const DHCP_PACKET_SIZE: usize = 576;

/// Maximale DNS-Paketgröße über UDP ohne EDNS
pub const DNS_PACKET_SIZE: usize = 512;

// ============================================================================
// HTTP Server Konfiguration
// ============================================================================

/// HTTP-Port für Panel und Portal
pub const HTTP_PORT: u16 = 80;

/// HTTP Buffer-Größe in Bytes
/// Für HTTP Request/Response Headers und Body (Formular-Daten des Portals)
pub const HTTP_BUFFER_SIZE: usize = 1024;

/// TCP RX Buffer-Größe in Bytes
/// Für eingehende TCP-Daten vom Client
pub const TCP_RX_BUFFER_SIZE: usize = 1024;

/// TCP TX Buffer-Größe in Bytes
/// Für ausgehende TCP-Daten zum Client
pub const TCP_TX_BUFFER_SIZE: usize = 1024;
