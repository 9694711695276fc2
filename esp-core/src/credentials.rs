//! Wi-Fi Zugangsdaten und deren Prüfung

/// Maximale SSID-Länge laut IEEE 802.11
pub const SSID_MAX_LEN: usize = 32;
/// WPA2-Passphrase: 8..=63 Zeichen
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 63;

/// Fehler bei ungültigen Zugangsdaten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsError {
    EmptySsid,
    SsidTooLong,
    /// Passwort gesetzt, aber außerhalb 8..=63 Zeichen
    InvalidPasswordLength,
}

impl CredentialsError {
    /// Kurzer Text für die Portal-Antwort
    pub fn message(self) -> &'static str {
        match self {
            CredentialsError::EmptySsid => "SSID fehlt",
            CredentialsError::SsidTooLong => "SSID ist länger als 32 Zeichen",
            CredentialsError::InvalidPasswordLength => {
                "Passwort muss leer sein oder 8 bis 63 Zeichen haben"
            }
        }
    }
}

/// SSID und Passwort eines Netzes
///
/// Lebt nur im RAM für die Dauer eines Boots. Ein leeres Passwort
/// bedeutet ein offenes Netz.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct WifiCredentials {
    pub ssid: heapless::String<SSID_MAX_LEN>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub password: heapless::String<PASSWORD_MAX_LEN>,
}

impl WifiCredentials {
    /// Erstellt geprüfte Zugangsdaten aus zwei Strings
    pub fn new(ssid: &str, password: &str) -> Result<Self, CredentialsError> {
        if ssid.is_empty() {
            return Err(CredentialsError::EmptySsid);
        }
        let ssid = heapless::String::try_from(ssid).map_err(|_| CredentialsError::SsidTooLong)?;
        let password = heapless::String::try_from(password)
            .map_err(|_| CredentialsError::InvalidPasswordLength)?;

        let credentials = Self { ssid, password };
        credentials.validate()?;
        Ok(credentials)
    }

    /// Prüft die Längenregeln (auch nach Deserialisierung aus dem Portal-Formular)
    pub fn validate(&self) -> Result<(), CredentialsError> {
        if self.ssid.is_empty() {
            return Err(CredentialsError::EmptySsid);
        }
        let password_len = self.password.len();
        if password_len != 0 && !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&password_len) {
            return Err(CredentialsError::InvalidPasswordLength);
        }
        Ok(())
    }

    pub fn is_open_network(&self) -> bool {
        self.password.is_empty()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CredentialsError {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.message())
    }
}
