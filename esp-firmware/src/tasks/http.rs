// HTTP Server - LED-Panel mit JSON-API
use core::cell::RefCell;

use defmt::{info, warn};
use embassy_net::Stack;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Duration, Timer};
use esp_core::{PanelReply, PanelRoute, dispatch};
use picoserve::io::embedded_io_async;
use picoserve::response::{IntoResponse, Json, Response, StatusCode};
use picoserve::routing::get;

use super::wifi::current_ipv4;
use crate::config::*;
use crate::web::INDEX_HTML;
use crate::{Led, LedCell};

/// HTTP-Antwort für ein `PanelReply`
struct PanelResponse(PanelReply);

impl IntoResponse for PanelResponse {
    async fn write_to<
        R: embedded_io_async::Read,
        W: picoserve::response::ResponseWriter<Error = R::Error>,
    >(
        self,
        connection: picoserve::response::Connection<'_, R>,
        response_writer: W,
    ) -> Result<picoserve::ResponseSent, W::Error> {
        match self.0 {
            PanelReply::Page => {
                Response::new(StatusCode::OK, INDEX_HTML)
                    .with_header("Content-Type", "text/html; charset=utf-8")
                    .write_to(connection, response_writer)
                    .await
            }
            PanelReply::State(state) => Json(state).write_to(connection, response_writer).await,
            PanelReply::Ip(ip) => Json(ip).write_to(connection, response_writer).await,
        }
    }
}

/// HTTP Server für das LED-Panel
///
/// Läuft nach erfolgreicher Bereitstellung im Serving-Kontext:
/// - GET /       → eingebettete Web-Oberfläche
/// - GET /state  → `{"state":0|1}`
/// - GET /toggle → schaltet um, `{"state":0|1}` (Zustand danach)
/// - GET /ip     → `{"ip":"..."}`
///
/// Pfade und Handler kommen aus `PanelRoute`/`dispatch` in esp-core.
/// Ein einziger Listener, keine Keep-Alive Verbindungen: Anfragen werden
/// nacheinander bearbeitet, jeder Toggle sieht den Pegel des vorherigen.
/// Unbekannte Pfade beantwortet picoserve mit 404.
pub async fn http_server(stack: Stack<'static>, led: Led) -> ! {
    info!("HTTP: Panel server starting on port {}...", HTTP_PORT);

    let led: LedCell = Mutex::new(RefCell::new(led));
    let led = &led;

    let handle = move |route: PanelRoute| {
        let reply = led.lock(|cell| {
            dispatch(route, &mut cell.borrow_mut(), || current_ipv4(stack))
        });
        info!("HTTP: GET {} -> {}", route, reply);
        PanelResponse(reply)
    };

    let app = picoserve::Router::new()
        .route(
            PanelRoute::Root.path(),
            get(move || async move { handle(PanelRoute::Root) }),
        )
        .route(
            PanelRoute::State.path(),
            get(move || async move { handle(PanelRoute::State) }),
        )
        .route(
            PanelRoute::Toggle.path(),
            get(move || async move { handle(PanelRoute::Toggle) }),
        )
        .route(
            PanelRoute::Ip.path(),
            get(move || async move { handle(PanelRoute::Ip) }),
        );

    let config = picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(5)),
        read_request: Some(Duration::from_secs(1)),
        write: Some(Duration::from_secs(1)),
        persistent_start_read_request: Some(Duration::from_secs(5)),
    });

    // HTTP-Buffer für Requests/Responses
    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];

    // TCP-Buffers für Socket
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);
    let _ = server
        .listen_and_serve(0, stack, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await;

    warn!("HTTP: Panel server ended");
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
