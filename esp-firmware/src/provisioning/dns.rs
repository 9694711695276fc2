// DNS Responder - leitet jeden Hostnamen auf das Portal
use core::net::Ipv4Addr;

use defmt::{Debug2Format, error, info, warn};
use embassy_net::Stack;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_time::{Duration, Timer};
use esp_core::build_captive_response;

use crate::config::{DNS_PACKET_SIZE, DNS_PORT, UDP_BUFFER_SIZE};

/// Catch-all DNS Loop auf dem AP-Stack
///
/// Jede A-Abfrage wird mit `portal_ip` beantwortet.
pub async fn dns_server(stack: Stack<'static>, portal_ip: Ipv4Addr) -> ! {
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

    if let Err(e) = socket.bind(DNS_PORT) {
        error!("DNS: Failed to bind port {}: {}", DNS_PORT, Debug2Format(&e));
        loop {
            Timer::after(Duration::from_secs(3600)).await;
        }
    }
    info!("DNS: Answering all queries with {}", Debug2Format(&portal_ip));

    let mut query = [0u8; DNS_PACKET_SIZE];
    let mut response = [0u8; DNS_PACKET_SIZE];

    loop {
        let (len, remote) = match socket.recv_from(&mut query).await {
            Ok(received) => received,
            Err(e) => {
                warn!("DNS: Receive error: {}", Debug2Format(&e));
                continue;
            }
        };

        let Some(response_len) = build_captive_response(&query[..len], portal_ip, &mut response)
        else {
            continue;
        };

        if let Err(e) = socket.send_to(&response[..response_len], remote).await {
            warn!("DNS: Send error: {}", Debug2Format(&e));
        }
    }
}
