// DHCP Server - vergibt Adressen im Setup-Netz
use defmt::{Debug2Format, debug, error, info, warn};
use embassy_net::Stack;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_time::{Duration, Instant, Timer};
use esp_core::DhcpServer;

use core::net::Ipv4Addr;

use crate::config::{DHCP_CLIENT_PORT, DHCP_PACKET_SIZE, DHCP_SERVER_PORT, UDP_BUFFER_SIZE};

/// DHCP Server Loop auf dem AP-Stack
///
/// Antwortet per Broadcast, weil die Clients noch keine Adresse haben.
/// Die Lease-Tabelle lebt im `server` und endet mit dem Portal-Future.
pub async fn dhcp_server(stack: Stack<'static>, mut server: DhcpServer) -> ! {
    let mut rx_meta = [PacketMetadata::EMPTY; 8];
    let mut rx_buffer = [0u8; UDP_BUFFER_SIZE];
    let mut tx_meta = [PacketMetadata::EMPTY; 8];
    let mut tx_buffer = [0u8; UDP_BUFFER_SIZE];

    let mut socket = UdpSocket::new(
        stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );

    if let Err(e) = socket.bind(DHCP_SERVER_PORT) {
        error!(
            "DHCP: Failed to bind port {}: {}",
            DHCP_SERVER_PORT,
            Debug2Format(&e)
        );
        loop {
            Timer::after(Duration::from_secs(3600)).await;
        }
    }
    info!("DHCP: Listening on port {}", DHCP_SERVER_PORT);

    let mut request = [0u8; DHCP_PACKET_SIZE];
    let mut reply = [0u8; DHCP_PACKET_SIZE];

    loop {
        let len = match socket.recv_from(&mut request).await {
            Ok((len, _remote)) => len,
            Err(e) => {
                warn!("DHCP: Receive error: {}", Debug2Format(&e));
                continue;
            }
        };

        // Ungültige Pakete, RELEASE und ein voller Pool ergeben keine Antwort
        let now_secs = Instant::now().as_secs();
        let Some(reply_len) = server.respond(&request[..len], now_secs, &mut reply) else {
            continue;
        };
        debug!("DHCP: Sending {} byte reply", reply_len);

        let destination = (Ipv4Addr::BROADCAST, DHCP_CLIENT_PORT);
        if let Err(e) = socket.send_to(&reply[..reply_len], destination).await {
            warn!("DHCP: Send error: {}", Debug2Format(&e));
        }
    }
}
