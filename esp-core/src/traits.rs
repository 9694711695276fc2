//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.

use crate::types::PinLevel;

/// Trait für einen digitalen Ausgangs-Pin
///
/// Abstrahiert die LED-Leitung (active-high: HIGH = an).
/// Der Pin selbst ist die einzige Quelle der Wahrheit - es gibt
/// keine Schattenkopie des Zustands.
///
/// # Implementierungen
/// - **Production:** GpioLed (esp-hal `Output`)
/// - **Testing:** MockPin (in-memory Mock)
pub trait OutputPin {
    /// Liest den aktuell getriebenen Pegel
    fn level(&self) -> PinLevel;

    /// Treibt den Pin auf den angegebenen Pegel
    fn set_level(&mut self, level: PinLevel);
}

/// Fehler-Typ für die Netzwerk-Bereitstellung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningError {
    /// Weder bekanntes Netz noch Portal haben rechtzeitig zu einer IP geführt
    Timeout,
    /// Funk-Controller ließ sich nicht konfigurieren oder starten
    Radio,
}

/// Trait für die Netzwerk-Bereitstellung (Wi-Fi oder Setup-Portal)
///
/// Verbindet mit einem bekannten Netz oder öffnet einen Access Point mit
/// Setup-Portal namens `ap_identifier`. Kehrt erst zurück, wenn eine
/// IP-Verbindung steht oder `timeout_secs` abgelaufen ist.
///
/// Konsumiert `self`: ein Provisioner wird pro Boot genau einmal benutzt.
#[allow(async_fn_in_trait)]
pub trait NetworkProvisioner {
    /// Handle auf das fertig konfigurierte Netzwerk
    type Network;

    async fn acquire_network(
        self,
        ap_identifier: &str,
        timeout_secs: u64,
    ) -> Result<Self::Network, ProvisioningError>;
}

#[cfg(feature = "defmt")]
impl defmt::Format for ProvisioningError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ProvisioningError::Timeout => defmt::write!(fmt, "Timeout"),
            ProvisioningError::Radio => defmt::write!(fmt, "Radio"),
        }
    }
}
