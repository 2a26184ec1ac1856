use super::messages::{MarkFrame, OutboundMedia, TelephonyOutbound};
use anyhow::{Context, Result};
use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitSink;
use futures::SinkExt;

/// Outbound half of the telephony transport
///
/// The relay only ever emits three frame kinds toward the caller:
/// audio to play, a playback boundary marker, and a clear command that
/// flushes audio queued for playback. Sends are fire-and-forget; a
/// failed send is a dropped frame, never a retry.
#[async_trait::async_trait]
pub trait TelephonySink: Send {
    /// Send synthesized audio for playback
    async fn send_audio(&mut self, stream_sid: &str, payload: &str) -> Result<()>;

    /// Send a playback boundary marker
    async fn send_mark(&mut self, stream_sid: &str, token: &str) -> Result<()>;

    /// Discard audio the platform has buffered but not yet played
    async fn send_clear(&mut self, stream_sid: &str) -> Result<()>;
}

/// `TelephonySink` backed by the write half of the media-stream WebSocket
pub struct WsTelephonySink {
    writer: SplitSink<WebSocket, Message>,
}

impl WsTelephonySink {
    pub fn new(writer: SplitSink<WebSocket, Message>) -> Self {
        Self { writer }
    }

    async fn send(&mut self, frame: &TelephonyOutbound) -> Result<()> {
        let text = serde_json::to_string(frame).context("Failed to encode telephony frame")?;
        self.writer
            .send(Message::Text(text))
            .await
            .context("Failed to send telephony frame")
    }
}

#[async_trait::async_trait]
impl TelephonySink for WsTelephonySink {
    async fn send_audio(&mut self, stream_sid: &str, payload: &str) -> Result<()> {
        self.send(&TelephonyOutbound::Media {
            stream_sid: stream_sid.to_string(),
            media: OutboundMedia {
                payload: payload.to_string(),
            },
        })
        .await
    }

    async fn send_mark(&mut self, stream_sid: &str, token: &str) -> Result<()> {
        self.send(&TelephonyOutbound::Mark {
            stream_sid: stream_sid.to_string(),
            mark: MarkFrame {
                name: token.to_string(),
            },
        })
        .await
    }

    async fn send_clear(&mut self, stream_sid: &str) -> Result<()> {
        self.send(&TelephonyOutbound::Clear {
            stream_sid: stream_sid.to_string(),
        })
        .await
    }
}
