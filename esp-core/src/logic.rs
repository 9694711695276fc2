//! Pure Business Logic der HTTP-Handler
//!
//! Funktionen ohne Hardware-Dependencies (testbar!).
//! Die Firmware bindet sie an die Routen des HTTP-Servers.

use core::net::Ipv4Addr;

use crate::led::LedController;
use crate::traits::OutputPin;
use crate::types::{IpResponse, StateResponse};

/// Route der eingebetteten Web-Oberfläche
pub const ROOT_PATH: &str = "/";
/// Route für den aktuellen LED-Zustand
pub const STATE_PATH: &str = "/state";
/// Route zum Umschalten der LED
pub const TOGGLE_PATH: &str = "/toggle";
/// Route für die zugewiesene IP-Adresse
pub const IP_PATH: &str = "/ip";

/// Liest den aktuellen LED-Zustand (keine Seiteneffekte)
///
/// # Beispiele
///
/// ```
/// # use esp_core::{LedController, OutputPin, PinLevel, get_state};
/// # struct Pin(PinLevel);
/// # impl OutputPin for Pin {
/// #     fn level(&self) -> PinLevel { self.0 }
/// #     fn set_level(&mut self, level: PinLevel) { self.0 = level }
/// # }
/// let led = LedController::new(Pin(PinLevel::High));
/// assert_eq!(get_state(&led).state, 0); // new() schaltet die LED aus
/// ```
pub fn get_state<P: OutputPin>(led: &LedController<P>) -> StateResponse {
    StateResponse::from(led.level())
}

/// Schaltet die LED um und meldet den Zustand NACH dem Umschalten
pub fn toggle<P: OutputPin>(led: &mut LedController<P>) -> StateResponse {
    StateResponse::from(led.toggle())
}

/// Meldet die aktuell zugewiesene IPv4-Adresse (leer, wenn keine)
pub fn get_ip(address: Option<Ipv4Addr>) -> IpResponse {
    IpResponse::from_address(address)
}

/// Die vier Routen des Panels
///
/// Einzige Stelle, an der Pfad und Handler verbunden werden. Der HTTP-Server
/// registriert `ALL` und ruft für jede Route `dispatch` auf; Pfade außerhalb
/// dieser Tabelle beantwortet er mit 404.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelRoute {
    Root,
    State,
    Toggle,
    Ip,
}

impl PanelRoute {
    pub const ALL: [PanelRoute; 4] = [
        PanelRoute::Root,
        PanelRoute::State,
        PanelRoute::Toggle,
        PanelRoute::Ip,
    ];

    pub fn path(self) -> &'static str {
        match self {
            PanelRoute::Root => ROOT_PATH,
            PanelRoute::State => STATE_PATH,
            PanelRoute::Toggle => TOGGLE_PATH,
            PanelRoute::Ip => IP_PATH,
        }
    }

    /// Exakter Vergleich, ohne Query-String oder Schrägstrich-Toleranz
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|route| route.path() == path)
    }
}

/// Ergebnis eines Panel-Handlers, vom HTTP-Server in eine Antwort übersetzt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelReply {
    /// Eingebettete HTML-Seite
    Page,
    State(StateResponse),
    Ip(IpResponse),
}

/// Führt den Handler einer Route aus
///
/// `address` wird nur für `/ip` abgefragt; nur `/toggle` schreibt den Pin.
pub fn dispatch<P: OutputPin>(
    route: PanelRoute,
    led: &mut LedController<P>,
    address: impl FnOnce() -> Option<Ipv4Addr>,
) -> PanelReply {
    match route {
        PanelRoute::Root => PanelReply::Page,
        PanelRoute::State => PanelReply::State(get_state(led)),
        PanelRoute::Toggle => PanelReply::State(toggle(led)),
        PanelRoute::Ip => PanelReply::Ip(get_ip(address())),
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PanelRoute {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.path())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PanelReply {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PanelReply::Page => defmt::write!(fmt, "page"),
            PanelReply::State(state) => defmt::write!(fmt, "{}", state),
            PanelReply::Ip(ip) => defmt::write!(fmt, "{}", ip),
        }
    }
}
