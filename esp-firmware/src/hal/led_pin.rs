// LED-Pin Implementierung für esp-hal
//
// Verbindet den OutputPin-Trait aus esp-core mit einem echten GPIO,
// damit die Handler-Logik ohne Hardware testbar bleibt.

use esp_core::{OutputPin, PinLevel};
use esp_hal::gpio::{Level, Output, OutputConfig};

/// Real Hardware LED Pin
///
/// Nutzt einen esp-hal `Output`. Der Zustand wird immer vom Output-Register
/// gelesen, nie aus einer Kopie.
pub struct GpioLed<'a> {
    output: Output<'a>,
}

impl<'a> GpioLed<'a> {
    /// Konfiguriert den GPIO als Ausgang, initial LOW (LED aus)
    ///
    /// # Parameter
    /// - `pin`: GPIO Peripheral für die LED (siehe `LED_GPIO_PIN`)
    pub fn new(pin: impl esp_hal::gpio::OutputPin + 'a) -> Self {
        let output = Output::new(pin, Level::Low, OutputConfig::default());
        Self { output }
    }
}

impl OutputPin for GpioLed<'_> {
    fn level(&self) -> PinLevel {
        PinLevel::from(self.output.is_set_high())
    }

    fn set_level(&mut self, level: PinLevel) {
        let level = match level {
            PinLevel::Low => Level::Low,
            PinLevel::High => Level::High,
        };
        self.output.set_level(level);
    }
}
