//! Core Types für die LED-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies

use core::fmt::Write;
use core::net::Ipv4Addr;

/// Maximale Länge einer IPv4-Adresse in Punktnotation ("255.255.255.255")
pub const IPV4_TEXT_LEN: usize = 15;

/// Logischer Pegel des LED-Pins
///
/// LOW = aus, HIGH = an (active-high).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PinLevel {
    /// Boot-Zustand: LED aus
    #[default]
    Low,
    High,
}

impl PinLevel {
    /// Liefert den entgegengesetzten Pegel
    pub fn inverted(self) -> Self {
        match self {
            PinLevel::Low => PinLevel::High,
            PinLevel::High => PinLevel::Low,
        }
    }

    /// 0 für LOW, 1 für HIGH (Format der JSON-API)
    pub fn as_bit(self) -> u8 {
        match self {
            PinLevel::Low => 0,
            PinLevel::High => 1,
        }
    }

    pub fn is_on(self) -> bool {
        self == PinLevel::High
    }
}

impl From<bool> for PinLevel {
    fn from(on: bool) -> Self {
        if on { PinLevel::High } else { PinLevel::Low }
    }
}

/// Antwort von `/state` und `/toggle`: `{"state":0|1}`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StateResponse {
    pub state: u8,
}

impl From<PinLevel> for StateResponse {
    fn from(level: PinLevel) -> Self {
        Self {
            state: level.as_bit(),
        }
    }
}

/// Antwort von `/ip`: `{"ip":"a.b.c.d"}` oder `{"ip":""}` ohne Adresse
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IpResponse {
    pub ip: heapless::String<IPV4_TEXT_LEN>,
}

impl IpResponse {
    /// Erstellt die Antwort aus der aktuell zugewiesenen Adresse
    ///
    /// Ohne Adresse bleibt das Feld leer - das ist kein Fehler.
    pub fn from_address(address: Option<Ipv4Addr>) -> Self {
        let mut ip = heapless::String::new();
        if let Some(address) = address {
            // Passt immer: längste Darstellung hat genau 15 Zeichen
            let _ = write!(ip, "{}", address);
        }
        Self { ip }
    }

    pub fn is_assigned(&self) -> bool {
        !self.ip.is_empty()
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for PinLevel {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PinLevel::Low => defmt::write!(fmt, "LOW"),
            PinLevel::High => defmt::write!(fmt, "HIGH"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StateResponse {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "StateResponse {{ state: {} }}", self.state)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for IpResponse {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "IpResponse {{ ip: {} }}", self.ip.as_str())
    }
}
