// Router and call-control document tests.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;
use voice_bridge::config::{AudioConfig, Config, EngineConfig, HttpConfig, ServiceConfig};
use voice_bridge::{connect_document, create_router, AppState};

fn test_config() -> Config {
    Config {
        service: ServiceConfig {
            name: "voice-bridge".to_string(),
            greeting: "Connecting you now.".to_string(),
            http: HttpConfig {
                bind: "127.0.0.1".to_string(),
                port: 5050,
            },
        },
        engine: EngineConfig {
            url: "wss://api.openai.com/v1/realtime".to_string(),
            model: "gpt-4o-realtime-preview-2024-10-01".to_string(),
            api_key: "test-key".to_string(),
            voice: "alloy".to_string(),
            temperature: 0.8,
            instructions: "Be helpful.".to_string(),
            settle_delay_ms: 200,
        },
        audio: AudioConfig {
            codec: "g711_ulaw".to_string(),
        },
    }
}

#[test]
fn connect_document_embeds_media_stream_endpoint() {
    let doc = connect_document("relay.example.com", "Hello caller.");

    assert!(doc.starts_with("<?xml"));
    assert!(doc.contains("wss://relay.example.com/media-stream"));
    assert!(doc.contains("<Say>Hello caller.</Say>"));
    assert!(doc.contains("<Connect>"));
}

#[tokio::test]
async fn health_endpoint_responds_ok() {
    let router = create_router(AppState::new(Arc::new(test_config())));

    let response = router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn incoming_call_returns_call_control_document() {
    let router = create_router(AppState::new(Arc::new(test_config())));

    let response = router
        .oneshot(
            Request::post("/incoming-call")
                .header(header::HOST, "relay.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/xml"
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let doc = String::from_utf8(body.to_vec()).unwrap();
    assert!(doc.contains("wss://relay.example.com/media-stream"));
    assert!(doc.contains("Connecting you now."));
}

#[tokio::test]
async fn media_stream_requires_websocket_upgrade() {
    let router = create_router(AppState::new(Arc::new(test_config())));

    // A plain GET without upgrade headers must not be treated as a call
    let response = router
        .oneshot(Request::get("/media-stream").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_ne!(response.status(), StatusCode::OK);
}
