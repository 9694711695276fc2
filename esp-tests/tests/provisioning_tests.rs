//! Integration Tests für den Start (Provisioning → Serving)
//!
//! MockProvisioner ersetzt WiFi und Setup-Portal; die async Methoden
//! werden mit `embassy_futures::block_on` auf dem Host ausgeführt.

use core::net::Ipv4Addr;

use embassy_futures::block_on;
use esp_core::dhcp::{DHCP_ACK, DHCP_DISCOVER, DHCP_REQUEST, DhcpRequest, MIN_REPLY_LEN};
use esp_core::{
    CredentialsError, DhcpServer, NetworkProvisioner, OutputPin, PinLevel, Provisioning,
    ProvisioningError, WifiCredentials, build_captive_response, get_ip, get_state, toggle,
};

// ============================================================================
// Mocks
// ============================================================================

#[derive(Default)]
pub struct MockPin {
    pub level: PinLevel,
}

impl OutputPin for MockPin {
    fn level(&self) -> PinLevel {
        self.level
    }

    fn set_level(&mut self, level: PinLevel) {
        self.level = level;
    }
}

/// Fake-Netzwerk: nur die zugewiesene Adresse
#[derive(Debug, PartialEq)]
pub struct MockNetwork {
    pub address: Ipv4Addr,
}

pub struct MockProvisioner {
    pub result: Result<Ipv4Addr, ProvisioningError>,
    pub expected_ap: &'static str,
}

impl NetworkProvisioner for MockProvisioner {
    type Network = MockNetwork;

    async fn acquire_network(
        self,
        ap_identifier: &str,
        timeout_secs: u64,
    ) -> Result<MockNetwork, ProvisioningError> {
        assert_eq!(ap_identifier, self.expected_ap);
        assert!(timeout_secs > 0);
        self.result.map(|address| MockNetwork { address })
    }
}

fn provisioner(result: Result<Ipv4Addr, ProvisioningError>) -> MockProvisioner {
    MockProvisioner {
        result,
        expected_ap: "ESP32_AP",
    }
}

// ============================================================================
// Tests: Provisioning → Serving
// ============================================================================

#[test]
fn test_successful_provisioning_enters_serving() {
    let address = Ipv4Addr::new(192, 168, 1, 42);
    let provisioning = Provisioning::new(MockPin {
        level: PinLevel::High,
    });

    let serving = block_on(provisioning.acquire_network(provisioner(Ok(address)), "ESP32_AP", 180))
        .unwrap();

    assert_eq!(serving.network(), &MockNetwork { address });
    // LED ist nach der Bereitstellung noch aus
    assert_eq!(get_state(serving.led()).state, 0);

    let (mut led, network) = serving.into_parts();
    assert_eq!(toggle(&mut led).state, 1);
    assert_eq!(get_ip(Some(network.address)).ip.as_str(), "192.168.1.42");
}

#[test]
fn test_timeout_is_reported() {
    let provisioning = Provisioning::new(MockPin::default());
    let result = block_on(provisioning.acquire_network(
        provisioner(Err(ProvisioningError::Timeout)),
        "ESP32_AP",
        180,
    ));
    assert!(matches!(result, Err(ProvisioningError::Timeout)));
}

#[test]
fn test_radio_error_is_reported() {
    let provisioning = Provisioning::new(MockPin::default());
    let result = block_on(provisioning.acquire_network(
        provisioner(Err(ProvisioningError::Radio)),
        "ESP32_AP",
        180,
    ));
    assert!(matches!(result, Err(ProvisioningError::Radio)));
}

// ============================================================================
// Tests: WifiCredentials
// ============================================================================

#[test]
fn test_credentials_accept_wpa_password() {
    let credentials = WifiCredentials::new("Heimnetz", "geheim123").unwrap();
    assert_eq!(credentials.ssid.as_str(), "Heimnetz");
    assert!(!credentials.is_open_network());
}

#[test]
fn test_credentials_reject_invalid_input() {
    assert_eq!(
        WifiCredentials::new("", ""),
        Err(CredentialsError::EmptySsid)
    );
    assert_eq!(
        WifiCredentials::new("Heimnetz", "kurz"),
        Err(CredentialsError::InvalidPasswordLength)
    );
    assert_eq!(
        WifiCredentials::new(&"x".repeat(33), ""),
        Err(CredentialsError::SsidTooLong)
    );
}

#[test]
fn test_credentials_error_messages_are_distinct() {
    let messages = [
        CredentialsError::EmptySsid.message(),
        CredentialsError::SsidTooLong.message(),
        CredentialsError::InvalidPasswordLength.message(),
    ];
    assert_ne!(messages[0], messages[1]);
    assert_ne!(messages[1], messages[2]);
    assert_ne!(messages[0], messages[2]);
}

// ============================================================================
// Tests: Captive Portal (DHCP + DNS)
// ============================================================================

fn portal_dhcp() -> DhcpServer {
    DhcpServer::new(Ipv4Addr::new(192, 168, 4, 1), 2, 49, 30)
}

fn dhcp_packet(message_type: u8, mac: [u8; 6]) -> Vec<u8> {
    let mut packet = vec![0u8; 300];
    packet[0] = 1; // BOOTREQUEST
    packet[1] = 1;
    packet[2] = 6;
    packet[4..8].copy_from_slice(&[1, 2, 3, 4]);
    packet[28..34].copy_from_slice(&mac);
    packet[236..240].copy_from_slice(&[99, 130, 83, 99]);
    packet[240..243].copy_from_slice(&[53, 1, message_type]);
    packet[243] = 255;
    packet
}

fn yiaddr(reply: &[u8]) -> Ipv4Addr {
    Ipv4Addr::new(reply[16], reply[17], reply[18], reply[19])
}

#[test]
fn test_dhcp_discover_then_request_get_same_address() {
    let mut dhcp = portal_dhcp();
    let mac = [0x02, 0x11, 0x22, 0x33, 0x44, 0x55];
    let mut offer = [0u8; 576];
    let mut ack = [0u8; 576];

    let offer_len = dhcp
        .respond(&dhcp_packet(DHCP_DISCOVER, mac), 0, &mut offer)
        .unwrap();
    let ack_len = dhcp
        .respond(&dhcp_packet(DHCP_REQUEST, mac), 1, &mut ack)
        .unwrap();

    assert!(offer_len >= MIN_REPLY_LEN);
    assert!(ack_len >= MIN_REPLY_LEN);
    assert_eq!(yiaddr(&offer), yiaddr(&ack));
    assert_eq!(dhcp.lease_for(&mac), Some(yiaddr(&ack)));
    // Option 53 steht als erste Option hinter dem Magic Cookie
    assert_eq!(&ack[240..243], &[53, 1, DHCP_ACK]);
}

#[test]
fn test_dhcp_phones_with_same_mac_residue_get_distinct_leases() {
    // Letzte MAC-Bytes 0x07 und 0x38 (56) sind modulo 49 gleich
    let mut dhcp = portal_dhcp();
    let first_mac = [0x02, 0, 0, 0, 0, 0x07];
    let second_mac = [0x02, 0, 0, 0, 0, 0x38];
    let mut first = [0u8; 576];
    let mut second = [0u8; 576];

    dhcp.respond(&dhcp_packet(DHCP_DISCOVER, first_mac), 0, &mut first)
        .unwrap();
    dhcp.respond(&dhcp_packet(DHCP_DISCOVER, second_mac), 0, &mut second)
        .unwrap();
    assert_ne!(yiaddr(&first), yiaddr(&second));

    // Auch nach REQUEST bleiben beide Adressen getrennt
    dhcp.respond(&dhcp_packet(DHCP_REQUEST, first_mac), 1, &mut first)
        .unwrap();
    dhcp.respond(&dhcp_packet(DHCP_REQUEST, second_mac), 1, &mut second)
        .unwrap();
    assert_ne!(yiaddr(&first), yiaddr(&second));
    assert_ne!(dhcp.lease_for(&first_mac), dhcp.lease_for(&second_mac));
}

#[test]
fn test_dhcp_reply_keeps_client_flags() {
    let mut dhcp = portal_dhcp();
    let mut unicast = dhcp_packet(DHCP_DISCOVER, [0x02, 0, 0, 0, 0, 1]);
    unicast[10] = 0x00;
    let mut reply = [0u8; 576];

    dhcp.respond(&unicast, 0, &mut reply).unwrap();
    assert_eq!(&reply[10..12], &[0, 0]);
}

#[test]
fn test_dhcp_reply_is_not_parsed_as_request() {
    let mut dhcp = portal_dhcp();
    let mut reply = [0u8; 576];
    let len = dhcp
        .respond(&dhcp_packet(DHCP_DISCOVER, [0; 6]), 0, &mut reply)
        .unwrap();
    assert_eq!(DhcpRequest::parse(&reply[..len]), None);
}

#[test]
fn test_dns_answers_any_host_with_portal_address() {
    // Anfrage nach "connectivitycheck.gstatic.com", Typ A
    let mut query = vec![0xab, 0xcd, 0x01, 0x00, 0, 1, 0, 0, 0, 0, 0, 0];
    for label in ["connectivitycheck", "gstatic", "com"] {
        query.push(label.len() as u8);
        query.extend_from_slice(label.as_bytes());
    }
    query.extend_from_slice(&[0, 0, 1, 0, 1]);

    let mut out = [0u8; 512];
    let len = build_captive_response(&query, portal_dhcp().server_ip(), &mut out).unwrap();

    assert_eq!(&out[..2], &[0xab, 0xcd]);
    assert_eq!(&out[6..8], &[0, 1]);
    assert_eq!(&out[len - 4..len], &[192, 168, 4, 1]);
}
