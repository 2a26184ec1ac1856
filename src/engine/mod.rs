//! Speech-engine transport
//!
//! This module provides the engine-facing half of the relay:
//! - JSON envelope types for the realtime protocol (`type` discriminator)
//! - `EngineSink` for the two outbound operations (append/truncate)
//! - The WebSocket client: connect, await the ready signal, settle,
//!   send the one-shot session configuration, then pump events
//!
//! Lifecycle events other than the audio delta and the speech-started
//! notification are log-only and never touch relay state.

mod client;
mod messages;

pub use client::{connect, EngineHandle, EngineSettings, EngineSink};
pub use messages::{ClientEvent, ServerEvent, SessionUpdate, TurnDetection};
