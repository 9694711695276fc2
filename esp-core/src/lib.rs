//! ESP Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert nur Traits, Protokoll-Logik und Pure Functions.

#![cfg_attr(not(test), no_std)]

pub mod boot;
pub mod credentials;
pub mod dhcp;
pub mod dns;
pub mod led;
pub mod logic;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use boot::{Provisioning, Serving};
pub use credentials::{CredentialsError, WifiCredentials};
pub use dhcp::DhcpServer;
pub use dns::build_captive_response;
pub use led::LedController;
pub use logic::{
    IP_PATH, PanelReply, PanelRoute, ROOT_PATH, STATE_PATH, TOGGLE_PATH, dispatch, get_ip,
    get_state, toggle,
};
pub use traits::{NetworkProvisioner, OutputPin, ProvisioningError};
pub use types::{IpResponse, PinLevel, StateResponse};
