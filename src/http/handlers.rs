use super::state::AppState;
use crate::relay;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Host, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use tracing::info;

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// GET|POST /incoming-call
/// Answer an inbound call with a call-control document that points the
/// platform's media stream at this relay's WebSocket endpoint
pub async fn incoming_call(State(state): State<AppState>, Host(host): Host) -> impl IntoResponse {
    info!("Incoming call, directing media stream to {}", host);

    let document = connect_document(&host, &state.config.service.greeting);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/xml")],
        document,
    )
}

/// GET /media-stream
/// Upgrade to the media-stream WebSocket and run the per-call relay
pub async fn media_stream(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let settings = state.config.engine_settings();
    let relay_config = state.config.relay();

    ws.on_upgrade(move |socket| relay::run_call(socket, settings, relay_config))
}

/// Build the call-control document for an inbound call
pub fn connect_document(host: &str, greeting: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Response>
    <Say>{greeting}</Say>
    <Pause length="1"/>
    <Say>O.K. you can start talking!</Say>
    <Connect>
        <Stream url="wss://{host}/media-stream" />
    </Connect>
</Response>"#
    )
}
