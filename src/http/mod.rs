//! HTTP bootstrap for the telephony platform
//!
//! This module provides the endpoints the platform needs before and
//! during a call:
//! - GET|POST /incoming-call - call-control document (media stream address)
//! - GET /media-stream - WebSocket upgrade, one relay session per call
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::connect_document;
pub use routes::create_router;
pub use state::AppState;
