//! Catch-all DNS-Responder für das Setup-Portal
//!
//! Beantwortet jede A-Abfrage mit der Adresse des Access Points. Dadurch
//! landet jeder Hostname auf dem Portal und Betriebssysteme öffnen die
//! Captive-Portal-Ansicht.

use core::net::Ipv4Addr;

const HEADER_LEN: usize = 12;
const TYPE_A: u16 = 1;
const TYPE_ANY: u16 = 255;
const CLASS_IN: u16 = 1;
/// Kurze TTL, damit Clients nach dem Setup nicht am Portal hängen bleiben
const ANSWER_TTL_SECS: u32 = 60;
/// Name-Pointer auf die Frage direkt hinter dem Header (Offset 12)
const NAME_POINTER: [u8; 2] = [0xC0, 0x0C];
const ANSWER_LEN: usize = 16;

/// Erste Frage einer DNS-Anfrage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnsQuestion {
    /// Ende der Frage (Header + Name + Typ + Klasse) im Paket
    pub end: usize,
    pub qtype: u16,
    pub qclass: u16,
}

/// Parst Header und erste Frage einer Standard-Abfrage
///
/// `None` für Antworten, andere Opcodes, Anfragen ohne Frage und
/// unvollständige oder komprimierte Namen.
pub fn parse_query(packet: &[u8]) -> Option<DnsQuestion> {
    let header = packet.get(..HEADER_LEN)?;
    let is_response = header[2] & 0x80 != 0;
    let opcode = (header[2] >> 3) & 0x0F;
    let qdcount = u16::from_be_bytes([header[4], header[5]]);
    if is_response || opcode != 0 || qdcount == 0 {
        return None;
    }

    let mut pos = HEADER_LEN;
    loop {
        let len = *packet.get(pos)? as usize;
        pos += 1;
        if len == 0 {
            break;
        }
        // Kompression ist in der ersten Frage nicht erlaubt
        if len & 0xC0 != 0 {
            return None;
        }
        pos += len;
    }

    let fields = packet.get(pos..pos + 4)?;
    Some(DnsQuestion {
        end: pos + 4,
        qtype: u16::from_be_bytes([fields[0], fields[1]]),
        qclass: u16::from_be_bytes([fields[2], fields[3]]),
    })
}

/// Baut die Antwort auf `query` nach `out` und gibt deren Länge zurück
///
/// A/ANY-Fragen der Klasse IN bekommen `answer` als einzigen Record,
/// alle anderen Typen eine leere Antwort ohne Fehlercode.
pub fn build_captive_response(query: &[u8], answer: Ipv4Addr, out: &mut [u8]) -> Option<usize> {
    let question = parse_query(query)?;
    let answers = question.qclass == CLASS_IN
        && (question.qtype == TYPE_A || question.qtype == TYPE_ANY);
    let len = question.end + if answers { ANSWER_LEN } else { 0 };
    if out.len() < len {
        return None;
    }

    // Header + erste Frage übernehmen, weitere Fragen verwerfen
    out[..question.end].copy_from_slice(&query[..question.end]);
    out[2] = 0x84 | (query[2] & 0x01); // QR, AA, RD übernehmen
    out[3] = 0x00; // RA=0, RCODE=NOERROR
    out[4..6].copy_from_slice(&1u16.to_be_bytes());
    out[6..8].copy_from_slice(&u16::from(answers).to_be_bytes());
    out[8..12].fill(0);

    if answers {
        let record = &mut out[question.end..len];
        record[0..2].copy_from_slice(&NAME_POINTER);
        record[2..4].copy_from_slice(&TYPE_A.to_be_bytes());
        record[4..6].copy_from_slice(&CLASS_IN.to_be_bytes());
        record[6..10].copy_from_slice(&ANSWER_TTL_SECS.to_be_bytes());
        record[10..12].copy_from_slice(&4u16.to_be_bytes());
        record[12..16].copy_from_slice(&answer.octets());
    }
    Some(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Anfrage nach "a.io", Typ A, Klasse IN, RD gesetzt
    const QUERY_A: [u8; 22] = [
        0x12, 0x34, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, //
        1, b'a', 2, b'i', b'o', 0, //
        0x00, 0x01, 0x00, 0x01,
    ];

    #[test]
    fn test_parse_query() {
        let question = parse_query(&QUERY_A).unwrap();
        assert_eq!(question.end, 22);
        assert_eq!(question.qtype, TYPE_A);
    }

    #[test]
    fn test_a_query_points_to_portal() {
        let mut out = [0u8; 64];
        let len = build_captive_response(&QUERY_A, Ipv4Addr::new(192, 168, 4, 1), &mut out).unwrap();
        assert_eq!(len, 38);
        assert_eq!(&out[0..2], &[0x12, 0x34]);
        assert_eq!(out[2], 0x85);
        assert_eq!(&out[6..8], &[0, 1]);
        assert_eq!(&out[34..38], &[192, 168, 4, 1]);
    }

    #[test]
    fn test_aaaa_query_gets_empty_answer() {
        let mut query = QUERY_A;
        query[19] = 28; // AAAA
        let mut out = [0u8; 64];
        let len = build_captive_response(&query, Ipv4Addr::new(192, 168, 4, 1), &mut out).unwrap();
        assert_eq!(len, 22);
        assert_eq!(&out[6..8], &[0, 0]);
    }

    #[test]
    fn test_response_packet_is_ignored() {
        let mut packet = QUERY_A;
        packet[2] |= 0x80;
        assert_eq!(parse_query(&packet), None);
    }

    #[test]
    fn test_truncated_name_is_ignored() {
        assert_eq!(parse_query(&QUERY_A[..15]), None);
    }
}
