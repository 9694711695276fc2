//! LED-Zustand über einen einzelnen Ausgangs-Pin

use crate::traits::OutputPin;
use crate::types::PinLevel;

/// Besitzt den LED-Pin und ist der einzige Schreibzugriff darauf
///
/// Liest bei jeder Abfrage direkt vom Pin, damit der gemeldete Zustand
/// nie hinter dem tatsächlichen Pegel zurückliegt.
pub struct LedController<P: OutputPin> {
    pin: P,
}

impl<P: OutputPin> LedController<P> {
    /// Übernimmt den Pin und treibt ihn auf LOW (LED aus)
    pub fn new(mut pin: P) -> Self {
        pin.set_level(PinLevel::Low);
        Self { pin }
    }

    pub fn level(&self) -> PinLevel {
        self.pin.level()
    }

    /// Invertiert den Pegel und liefert den NEUEN Pegel zurück
    pub fn toggle(&mut self) -> PinLevel {
        let next = self.pin.level().inverted();
        self.pin.set_level(next);
        self.pin.level()
    }

    /// Zugriff auf den Pin (z.B. für Assertions in Tests)
    pub fn pin(&self) -> &P {
        &self.pin
    }
}
