//! Zweiphasiger Start: `Provisioning → Serving`
//!
//! Der LED-Controller ist erst nach erfolgreicher Netzwerk-Bereitstellung
//! erreichbar. Code der Serving-Phase kann also nicht vor dem Übergang
//! laufen - das erzwingt der Typ, nicht eine Laufzeitprüfung.

use crate::led::LedController;
use crate::traits::{NetworkProvisioner, OutputPin, ProvisioningError};

/// Phase 1: LED ist aus, Netzwerk fehlt noch
pub struct Provisioning<P: OutputPin> {
    led: LedController<P>,
}

impl<P: OutputPin> Provisioning<P> {
    /// Übernimmt den LED-Pin und schaltet die LED aus
    pub fn new(pin: P) -> Self {
        Self {
            led: LedController::new(pin),
        }
    }

    /// Blockiert bis der Provisioner ein Netzwerk liefert oder aufgibt
    ///
    /// Bei Erfolg entsteht die Serving-Phase mit LED und Netzwerk.
    /// Bei Fehler bleibt nur der Fehler übrig - die Firmware startet neu.
    pub async fn acquire_network<N: NetworkProvisioner>(
        self,
        provisioner: N,
        ap_identifier: &str,
        timeout_secs: u64,
    ) -> Result<Serving<P, N::Network>, ProvisioningError> {
        let network = provisioner
            .acquire_network(ap_identifier, timeout_secs)
            .await?;
        Ok(Serving {
            led: self.led,
            network,
        })
    }
}

/// Phase 2: Netzwerk steht, HTTP-Server darf starten
pub struct Serving<P: OutputPin, N> {
    led: LedController<P>,
    network: N,
}

impl<P: OutputPin, N> Serving<P, N> {
    pub fn network(&self) -> &N {
        &self.network
    }

    pub fn led(&self) -> &LedController<P> {
        &self.led
    }

    /// Zerlegt die Phase für den Server-Kontext
    pub fn into_parts(self) -> (LedController<P>, N) {
        (self.led, self.network)
    }
}
