//! Minimaler DHCP-Server für das Setup-Portal
//!
//! Hält eine kleine Lease-Tabelle (MAC → Adresse). Ein Client behält seine
//! Adresse, solange die Lease läuft; neue Clients bekommen die erste freie
//! Adresse im Pool. Die Zeit kommt vom Aufrufer, damit die Logik ohne
//! Timer testbar bleibt.

use core::net::Ipv4Addr;

/// DHCP Message Types (Option 53)
pub const DHCP_DISCOVER: u8 = 1;
pub const DHCP_OFFER: u8 = 2;
pub const DHCP_REQUEST: u8 = 3;
pub const DHCP_ACK: u8 = 5;
pub const DHCP_RELEASE: u8 = 7;

const OPTION_PAD: u8 = 0;
const OPTION_SUBNET_MASK: u8 = 1;
const OPTION_ROUTER: u8 = 3;
const OPTION_DNS: u8 = 6;
const OPTION_REQUESTED_IP: u8 = 50;
const OPTION_LEASE_TIME: u8 = 51;
const OPTION_MESSAGE_TYPE: u8 = 53;
const OPTION_SERVER_ID: u8 = 54;
const OPTION_RENEWAL_TIME: u8 = 58;
const OPTION_REBINDING_TIME: u8 = 59;
const OPTION_END: u8 = 255;

const MAGIC_COOKIE: [u8; 4] = [99, 130, 83, 99];
const BOOTREQUEST: u8 = 1;
const BOOTREPLY: u8 = 2;
const HTYPE_ETHERNET: u8 = 1;
const HLEN_ETHERNET: u8 = 6;

/// BOOTP-Header (236 Bytes) + Magic Cookie
const HEADER_LEN: usize = 240;
/// Mindestgröße einer BOOTP-Nachricht (RFC 951), kürzere Antworten werden gepaddet
pub const MIN_REPLY_LEN: usize = 300;

/// Gleichzeitige Clients im Setup-Netz
pub const MAX_LEASES: usize = 8;

/// Relevante Felder einer DHCP-Anfrage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DhcpRequest {
    pub xid: [u8; 4],
    /// Flags (Broadcast-Bit) werden in der Antwort gespiegelt
    pub flags: [u8; 2],
    /// Relay-Agent-Adresse, ebenfalls gespiegelt
    pub giaddr: [u8; 4],
    pub client_mac: [u8; 6],
    pub message_type: u8,
    /// Option 50
    pub requested_ip: Option<Ipv4Addr>,
    /// Option 54
    pub server_id: Option<Ipv4Addr>,
}

impl DhcpRequest {
    /// Parst eine BOOTREQUEST-Nachricht von einem Ethernet-Client
    ///
    /// Gibt `None` zurück bei zu kurzen Paketen, falschem Op-Code oder
    /// Hardware-Typ, fehlendem Magic Cookie oder fehlender Option 53.
    pub fn parse(packet: &[u8]) -> Option<Self> {
        if packet.len() < HEADER_LEN || packet[0] != BOOTREQUEST {
            return None;
        }
        if packet[1] != HTYPE_ETHERNET || packet[2] != HLEN_ETHERNET {
            return None;
        }
        if packet[236..240] != MAGIC_COOKIE {
            return None;
        }

        let mut xid = [0u8; 4];
        xid.copy_from_slice(&packet[4..8]);
        let mut flags = [0u8; 2];
        flags.copy_from_slice(&packet[10..12]);
        let mut giaddr = [0u8; 4];
        giaddr.copy_from_slice(&packet[24..28]);
        let mut client_mac = [0u8; 6];
        client_mac.copy_from_slice(&packet[28..34]);

        let options = &packet[HEADER_LEN..];
        let message_type = find_option(options, OPTION_MESSAGE_TYPE)
            .and_then(|data| data.first().copied())?;

        Some(Self {
            xid,
            flags,
            giaddr,
            client_mac,
            message_type,
            requested_ip: find_option(options, OPTION_REQUESTED_IP).and_then(ipv4_from),
            server_id: find_option(options, OPTION_SERVER_ID).and_then(ipv4_from),
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct DhcpLease {
    mac: [u8; 6],
    ip: Ipv4Addr,
    expires_at_secs: u64,
}

/// DHCP-Server des Setup-Netzes mit Lease-Tabelle
#[derive(Debug, Clone)]
pub struct DhcpServer {
    /// Adresse des Access Points (auch Gateway und DNS)
    server_ip: Ipv4Addr,
    /// Letztes Oktett der ersten vergebenen Adresse
    pool_start: u8,
    /// Anzahl vergebbarer Adressen ab `pool_start`
    pool_size: u8,
    lease_secs: u32,
    leases: heapless::Vec<DhcpLease, MAX_LEASES>,
}

impl DhcpServer {
    pub const fn new(server_ip: Ipv4Addr, pool_start: u8, pool_size: u8, lease_secs: u32) -> Self {
        Self {
            server_ip,
            pool_start,
            pool_size,
            lease_secs,
            leases: heapless::Vec::new(),
        }
    }

    pub fn server_ip(&self) -> Ipv4Addr {
        self.server_ip
    }

    /// Aktuelle Lease eines Clients (auch abgelaufene, bis sie verdrängt wird)
    pub fn lease_for(&self, mac: &[u8; 6]) -> Option<Ipv4Addr> {
        self.leases
            .iter()
            .find(|lease| lease.mac == *mac)
            .map(|lease| lease.ip)
    }

    /// Beantwortet DISCOVER mit OFFER und REQUEST mit ACK
    ///
    /// `now_secs` ist eine monotone Zeit in Sekunden. Schreibt die Antwort
    /// nach `out` und gibt deren Länge zurück. RELEASE gibt die Lease frei.
    /// Andere Nachrichtentypen, Anfragen an fremde Server, ungültige Pakete
    /// und ein erschöpfter Pool ergeben `None`.
    pub fn respond(&mut self, packet: &[u8], now_secs: u64, out: &mut [u8]) -> Option<usize> {
        let request = DhcpRequest::parse(packet)?;
        if request.server_id.is_some_and(|id| id != self.server_ip) {
            return None;
        }

        let reply_type = match request.message_type {
            DHCP_DISCOVER => DHCP_OFFER,
            DHCP_REQUEST => DHCP_ACK,
            DHCP_RELEASE => {
                self.leases.retain(|lease| lease.mac != request.client_mac);
                return None;
            }
            _ => return None,
        };
        if out.len() < MIN_REPLY_LEN {
            return None;
        }

        let offered = self.ensure_lease(&request, now_secs)?;
        Some(self.build_reply(&request, reply_type, offered, out))
    }

    fn in_pool(&self, ip: Ipv4Addr) -> bool {
        let [a, b, c, host] = ip.octets();
        let [sa, sb, sc, _] = self.server_ip.octets();
        let start = u16::from(self.pool_start);
        let end = start + u16::from(self.pool_size);
        [a, b, c] == [sa, sb, sc] && (start..end).contains(&u16::from(host))
    }

    fn pool_address(&self, offset: u8) -> Ipv4Addr {
        let [a, b, c, _] = self.server_ip.octets();
        Ipv4Addr::new(a, b, c, self.pool_start.saturating_add(offset))
    }

    /// Vorhandene Lease verlängern oder eine freie Adresse vergeben
    fn ensure_lease(&mut self, request: &DhcpRequest, now_secs: u64) -> Option<Ipv4Addr> {
        let mac = request.client_mac;
        // Abgelaufene Leases fremder Clients freigeben, die eigene bleibt reserviert
        self.leases
            .retain(|lease| lease.mac == mac || lease.expires_at_secs > now_secs);

        let expires_at_secs = now_secs + u64::from(self.lease_secs);
        let wanted = request
            .requested_ip
            .filter(|ip| self.in_pool(*ip))
            .filter(|ip| {
                self.leases
                    .iter()
                    .all(|lease| lease.mac == mac || lease.ip != *ip)
            });

        if let Some(existing) = self.leases.iter_mut().find(|lease| lease.mac == mac) {
            if let Some(ip) = wanted {
                existing.ip = ip;
            }
            existing.expires_at_secs = expires_at_secs;
            return Some(existing.ip);
        }

        let ip = wanted.or_else(|| {
            (0..self.pool_size)
                .map(|offset| self.pool_address(offset))
                .find(|candidate| self.leases.iter().all(|lease| lease.ip != *candidate))
        })?;

        self.leases
            .push(DhcpLease {
                mac,
                ip,
                expires_at_secs,
            })
            .ok()?;
        Some(ip)
    }

    fn build_reply(
        &self,
        request: &DhcpRequest,
        reply_type: u8,
        offered: Ipv4Addr,
        out: &mut [u8],
    ) -> usize {
        let server_ip = self.server_ip.octets();

        out.fill(0);
        out[0] = BOOTREPLY;
        out[1] = HTYPE_ETHERNET;
        out[2] = HLEN_ETHERNET;
        out[4..8].copy_from_slice(&request.xid);
        out[10..12].copy_from_slice(&request.flags);
        out[16..20].copy_from_slice(&offered.octets()); // yiaddr
        out[20..24].copy_from_slice(&server_ip); // siaddr
        out[24..28].copy_from_slice(&request.giaddr);
        out[28..34].copy_from_slice(&request.client_mac);
        out[236..240].copy_from_slice(&MAGIC_COOKIE);

        let renewal = self.lease_secs / 2;
        let rebinding = (u64::from(self.lease_secs) * 7 / 8) as u32;

        let mut options = OptionWriter {
            buf: out,
            pos: HEADER_LEN,
        };
        options.put(OPTION_MESSAGE_TYPE, &[reply_type]);
        options.put(OPTION_SERVER_ID, &server_ip);
        options.put(OPTION_LEASE_TIME, &self.lease_secs.to_be_bytes());
        options.put(OPTION_RENEWAL_TIME, &renewal.to_be_bytes());
        options.put(OPTION_REBINDING_TIME, &rebinding.to_be_bytes());
        options.put(OPTION_SUBNET_MASK, &[255, 255, 255, 0]);
        options.put(OPTION_ROUTER, &server_ip);
        // Captive Portal: der AP ist auch DNS-Server
        options.put(OPTION_DNS, &server_ip);
        options.end().max(MIN_REPLY_LEN)
    }
}

struct OptionWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl OptionWriter<'_> {
    fn put(&mut self, code: u8, data: &[u8]) {
        self.buf[self.pos] = code;
        self.buf[self.pos + 1] = data.len() as u8;
        self.buf[self.pos + 2..self.pos + 2 + data.len()].copy_from_slice(data);
        self.pos += 2 + data.len();
    }

    fn end(self) -> usize {
        self.buf[self.pos] = OPTION_END;
        self.pos + 1
    }
}

fn ipv4_from(data: &[u8]) -> Option<Ipv4Addr> {
    let octets: [u8; 4] = data.try_into().ok()?;
    Some(Ipv4Addr::from(octets))
}

/// Sucht eine Option im Bereich hinter dem Magic Cookie
pub fn find_option(options: &[u8], wanted: u8) -> Option<&[u8]> {
    let mut i = 0;
    while i < options.len() {
        match options[i] {
            OPTION_END => break,
            OPTION_PAD => i += 1,
            code => {
                let len = *options.get(i + 1)? as usize;
                let data = options.get(i + 2..i + 2 + len)?;
                if code == wanted {
                    return Some(data);
                }
                i += 2 + len;
            }
        }
    }
    None
}
