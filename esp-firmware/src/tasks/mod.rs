// Task-Modul: Embassy Tasks und Server-Loops
//
// net_task läuft je Netzwerk-Stack, link_monitor_task nach der Bereitstellung.
// Der HTTP-Server läuft direkt im Serving-Kontext von main().

pub mod http;
pub mod wifi;

// Re-export für einfachen Import
pub use http::http_server;
pub use wifi::{link_monitor_task, net_task};
