// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// esp-radio Konfigurationen nutzen alloc::string::String
extern crate alloc;

// Module
pub mod config;
pub mod hal;
pub mod provisioning;
pub mod tasks;
pub mod web;

use core::cell::RefCell;

// Re-exports von esp-core
pub use esp_core::{
    LedController, NetworkProvisioner, OutputPin, PinLevel, Provisioning, ProvisioningError,
    Serving, WifiCredentials,
};

// Embassy Mutex-Typen
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;

use crate::hal::GpioLed;

// ============================================================================
// Type-Aliase
// ============================================================================

/// LED-Controller der Firmware (esp-hal GPIO)
pub type Led = LedController<GpioLed<'static>>;

/// Zustands-Zelle für die HTTP-Handler
///
/// Die Handler sind `Fn`-Closures und brauchen daher Interior Mutability.
/// NoopRawMutex genügt: nur der eine HTTP-Task greift zu, synchron und
/// ohne `.await` während des Zugriffs.
pub type LedCell = Mutex<NoopRawMutex, RefCell<Led>>;
