//! Telephony media-stream transport
//!
//! This module provides the caller-facing half of the relay:
//! - JSON envelope types for the media-stream protocol (start/media/mark/stop)
//! - `TelephonySink` for the three outbound frame kinds (media/mark/clear)
//! - The WebSocket-backed production sink
//!
//! Malformed frames are logged and dropped by the relay pump; they never
//! close the connection.

mod messages;
mod sink;

pub use messages::{
    MarkFrame, MediaFrame, OutboundMedia, StreamStart, TelephonyInbound, TelephonyOutbound,
};
pub use sink::{TelephonySink, WsTelephonySink};
