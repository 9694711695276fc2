// Provisioning: bekanntes Netz oder Setup-Portal, Neustart bei Fehlschlag

mod dhcp;
mod dns;
pub mod manager;
mod portal;

pub use manager::{Uplink, WifiManager};

use defmt::error;
use embassy_time::{Duration, Timer};
use esp_core::ProvisioningError;

use crate::config::RESTART_DELAY_SECS;

/// Loggt den Fehlschlag, wartet kurz und startet den Chip neu
///
/// Kehrt nie zurück; nach dem Neustart beginnt die Bereitstellung von vorn.
pub async fn restart_after_failure(error: ProvisioningError) -> ! {
    error!("Failed to connect and hit timeout ({})", error);
    Timer::after(Duration::from_secs(RESTART_DELAY_SECS)).await;
    esp_hal::system::software_reset()
}
