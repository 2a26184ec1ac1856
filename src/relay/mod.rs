//! Per-call duplex relay
//!
//! This module provides the core of the bridge:
//! - `CallSession`: the state machine that forwards audio both ways,
//!   anchors utterance timing on the caller's clock, tracks playback
//!   markers FIFO, and fires barge-in (truncate + clear + reset)
//! - `RelayConfig`: explicit per-call configuration record
//! - `run_call`: the single-actor event pump joining the telephony
//!   WebSocket and the engine event stream
//! - `CallStats`: per-call counters logged at teardown

mod config;
mod pump;
mod session;
mod stats;

pub use config::RelayConfig;
pub use pump::run_call;
pub use session::CallSession;
pub use stats::CallStats;
