// Web-Modul: eingebettete HTML-Seiten
// Die Dateien werden zur Compile-Zeit direkt ins Binary eingebettet

/// LED-Panel (Serving)
pub const INDEX_HTML: &str = include_str!("index.html");

/// Formular des Setup-Portals (Provisioning)
pub const PORTAL_HTML: &str = include_str!("portal.html");
