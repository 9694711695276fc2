// Setup-Portal - HTTP Formular, DHCP und DNS auf dem Access Point
use defmt::{info, warn};
use embassy_futures::select::{Either4, select4};
use embassy_net::Stack;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use esp_core::{DhcpServer, WifiCredentials};
use picoserve::extract::Form;
use picoserve::io::embedded_io_async;
use picoserve::response::{IntoResponse, Response, StatusCode};
use picoserve::routing::{get, post};

use super::dhcp::dhcp_server;
use super::dns::dns_server;
use crate::config::*;
use crate::web::PORTAL_HTML;

/// Zeit, die der Browser nach dem Absenden noch für die Bestätigung bekommt
const SUBMIT_GRACE_MS: u64 = 750;

/// Ziel der Captive-Portal-Weiterleitungen
const PORTAL_URL: &str = "http://192.168.4.1/";

/// Pfade, mit denen Betriebssysteme nach einem Captive Portal suchen
const PROBE_PATHS: [&str; 4] = [
    "/generate_204",
    "/hotspot-detect.html",
    "/connecttest.txt",
    "/ncsi.txt",
];

/// Sammelt Zugangsdaten über das Setup-Portal
///
/// Startet HTTP, DHCP und DNS auf dem AP-Stack und wartet auf eine gültige
/// Formular-Übermittlung. Alle Server enden, sobald das Future fertig ist
/// (oder vom Aufrufer per Timeout gedroppt wird).
pub async fn collect_credentials(stack: Stack<'static>) -> WifiCredentials {
    let submitted = Signal::<NoopRawMutex, WifiCredentials>::new();

    let dhcp = DhcpServer::new(AP_IP, DHCP_POOL_START, DHCP_POOL_SIZE, DHCP_LEASE_SECS);

    let received = async {
        let credentials = submitted.wait().await;
        // Bestätigungsseite ausliefern lassen, bevor der AP abgeschaltet wird
        Timer::after(Duration::from_millis(SUBMIT_GRACE_MS)).await;
        credentials
    };

    match select4(
        portal_server(stack, &submitted),
        dhcp_server(stack, dhcp),
        dns_server(stack, AP_IP),
        received,
    )
    .await
    {
        Either4::First(never) | Either4::Second(never) | Either4::Third(never) => match never {},
        Either4::Fourth(credentials) => credentials,
    }
}

/// Antwort auf das Absenden des Formulars
enum SaveResponse {
    Accepted,
    Rejected(&'static str),
}

impl IntoResponse for SaveResponse {
    async fn write_to<
        R: embedded_io_async::Read,
        W: picoserve::response::ResponseWriter<Error = R::Error>,
    >(
        self,
        connection: picoserve::response::Connection<'_, R>,
        response_writer: W,
    ) -> Result<picoserve::ResponseSent, W::Error> {
        match self {
            SaveResponse::Accepted => {
                Response::new(StatusCode::OK, SAVED_HTML)
                    .with_header("Content-Type", "text/html; charset=utf-8")
                    .write_to(connection, response_writer)
                    .await
            }
            SaveResponse::Rejected(message) => {
                Response::new(StatusCode::new(400), message)
                    .with_header("Content-Type", "text/plain; charset=utf-8")
                    .write_to(connection, response_writer)
                    .await
            }
        }
    }
}

const SAVED_HTML: &str = "<!DOCTYPE html><html lang=\"de\"><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>ESP32 Setup</title></head><body style=\"font-family:sans-serif;text-align:center\">\
<h1>Gespeichert</h1><p>Der ESP32 verbindet sich jetzt mit dem WLAN.</p></body></html>";

/// HTTP-Teil des Portals: Formular, Übernahme und Weiterleitungen
async fn portal_server(
    stack: Stack<'static>,
    submitted: &Signal<NoopRawMutex, WifiCredentials>,
) -> ! {
    info!("Portal: HTTP server starting on port {}...", HTTP_PORT);

    let redirect = || async {
        Response::new(StatusCode::new(302), "").with_header("Location", PORTAL_URL)
    };

    let app = picoserve::Router::new()
        .route("/", get(serve_portal))
        .route(
            "/save",
            post(move |Form(credentials): Form<WifiCredentials>| async move {
                match credentials.validate() {
                    Ok(()) => {
                        info!("Portal: Form submitted for '{}'", credentials.ssid.as_str());
                        submitted.signal(credentials);
                        SaveResponse::Accepted
                    }
                    Err(e) => {
                        warn!("Portal: Rejected form: {}", e);
                        SaveResponse::Rejected(e.message())
                    }
                }
            }),
        )
        .route(PROBE_PATHS[0], get(redirect))
        .route(PROBE_PATHS[1], get(redirect))
        .route(PROBE_PATHS[2], get(redirect))
        .route(PROBE_PATHS[3], get(redirect));

    // Keine Keep-Alive Verbindungen: ein Listener bedient nacheinander alle Clients
    let config = picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(5)),
        read_request: Some(Duration::from_secs(1)),
        write: Some(Duration::from_secs(1)),
        persistent_start_read_request: Some(Duration::from_secs(5)),
    });

    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);
    let _ = server
        .listen_and_serve(0, stack, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await;

    warn!("Portal: HTTP server ended");
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}

/// Serviert das Formular
async fn serve_portal() -> impl IntoResponse {
    Response::new(StatusCode::OK, PORTAL_HTML)
        .with_header("Content-Type", "text/html; charset=utf-8")
}
