use super::messages::{ClientEvent, ServerEvent};
use crate::relay::RelayConfig;
use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

/// Queue depth for both directions; a full queue drops frames rather
/// than buffering (real-time stream, not a reliable log)
const EVENT_QUEUE_DEPTH: usize = 64;

/// Connection settings for the speech engine
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub url: String,
    pub model: String,
    pub api_key: String,
}

/// Outbound half of the speech-engine transport
#[async_trait::async_trait]
pub trait EngineSink: Send {
    /// Append caller audio to the engine's input buffer
    async fn append_audio(&mut self, audio: &str) -> Result<()>;

    /// Truncate the in-flight utterance at `audio_end_ms`
    async fn truncate(&mut self, item_id: &str, content_index: u32, audio_end_ms: u64)
        -> Result<()>;

    /// Whether the connection can still accept events
    fn is_open(&self) -> bool;

    /// Close the connection; safe to call more than once
    async fn close(&mut self);
}

/// Handle to a live engine connection
///
/// Cheap to move into the per-call pump. Dropping the handle (or
/// calling `close`) ends the writer task, which closes the socket.
pub struct EngineHandle {
    tx: Option<mpsc::Sender<ClientEvent>>,
    open: Arc<AtomicBool>,
}

impl EngineHandle {
    fn submit(&mut self, event: ClientEvent) -> Result<()> {
        let Some(tx) = &self.tx else {
            anyhow::bail!("engine connection closed");
        };

        match tx.try_send(event) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                // Fire-and-forget: drop rather than buffer
                debug!("Engine send queue full, dropping event");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.open.store(false, Ordering::SeqCst);
                self.tx = None;
                anyhow::bail!("engine connection closed")
            }
        }
    }
}

#[async_trait::async_trait]
impl EngineSink for EngineHandle {
    async fn append_audio(&mut self, audio: &str) -> Result<()> {
        self.submit(ClientEvent::InputAudioBufferAppend {
            audio: audio.to_string(),
        })
    }

    async fn truncate(
        &mut self,
        item_id: &str,
        content_index: u32,
        audio_end_ms: u64,
    ) -> Result<()> {
        self.submit(ClientEvent::ConversationItemTruncate {
            item_id: item_id.to_string(),
            content_index,
            audio_end_ms,
        })
    }

    fn is_open(&self) -> bool {
        self.tx.is_some() && self.open.load(Ordering::SeqCst)
    }

    async fn close(&mut self) {
        // Dropping the sender ends the writer task and closes the socket
        self.tx = None;
        self.open.store(false, Ordering::SeqCst);
    }
}

/// Connect to the speech engine and configure the session
///
/// Returns a sink handle plus the stream of server events. The reader
/// task waits for the engine's ready signal, settles for
/// `relay.settle_delay_ms`, then sends the one-shot configuration;
/// sending it earlier is a protocol violation the remote rejects.
pub async fn connect(
    settings: &EngineSettings,
    relay: &RelayConfig,
) -> Result<(EngineHandle, mpsc::Receiver<ServerEvent>)> {
    let url = format!("{}?model={}", settings.url, settings.model);
    info!("Connecting to speech engine at {}", settings.url);

    let mut request = url
        .into_client_request()
        .context("Invalid engine endpoint URL")?;
    request.headers_mut().insert(
        "Authorization",
        format!("Bearer {}", settings.api_key)
            .parse()
            .context("Invalid API key header value")?,
    );
    request.headers_mut().insert(
        "OpenAI-Beta",
        "realtime=v1".parse().context("Invalid beta header value")?,
    );

    let (socket, _) = connect_async(request)
        .await
        .context("Failed to connect to speech engine")?;

    info!("Connected to speech engine");

    let (mut writer, mut reader) = socket.split();
    let (out_tx, mut out_rx) = mpsc::channel::<ClientEvent>(EVENT_QUEUE_DEPTH);
    let (evt_tx, evt_rx) = mpsc::channel::<ServerEvent>(EVENT_QUEUE_DEPTH);
    let open = Arc::new(AtomicBool::new(true));

    // Writer task: drains client events onto the socket
    let writer_open = Arc::clone(&open);
    tokio::spawn(async move {
        while let Some(event) = out_rx.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(err) => {
                    error!("Failed to encode engine event: {}", err);
                    continue;
                }
            };

            if writer.send(Message::Text(text)).await.is_err() {
                break;
            }
        }

        let _ = writer.close().await;
        writer_open.store(false, Ordering::SeqCst);
        debug!("Engine writer task stopped");
    });

    // Reader task: handles ready + configuration, forwards events
    let reader_open = Arc::clone(&open);
    let config_tx = out_tx.clone();
    let relay = relay.clone();
    tokio::spawn(async move {
        let mut configured = false;

        while let Some(message) = reader.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let event: ServerEvent = match serde_json::from_str(&text) {
                        Ok(event) => event,
                        Err(err) => {
                            warn!("Malformed engine event dropped: {}", err);
                            continue;
                        }
                    };

                    if matches!(event, ServerEvent::SessionCreated) && !configured {
                        debug!(
                            "Engine ready, settling {}ms before configuration",
                            relay.settle_delay_ms
                        );
                        tokio::time::sleep(Duration::from_millis(relay.settle_delay_ms)).await;

                        let update = ClientEvent::SessionUpdate {
                            session: relay.session_update(),
                        };
                        if config_tx.send(update).await.is_err() {
                            break;
                        }
                        configured = true;
                    }

                    if evt_tx.send(event).await.is_err() {
                        // Relay pump is gone
                        break;
                    }
                }
                Ok(Message::Close(frame)) => {
                    info!("Engine closed the connection: {:?}", frame);
                    break;
                }
                Ok(_) => {}
                Err(err) => {
                    error!("Engine socket error: {}", err);
                    break;
                }
            }
        }

        reader_open.store(false, Ordering::SeqCst);
        debug!("Engine reader task stopped");
    });

    Ok((EngineHandle { tx: Some(out_tx), open }, evt_rx))
}
