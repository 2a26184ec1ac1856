use super::config::RelayConfig;
use super::session::CallSession;
use crate::engine::{self, EngineSettings, ServerEvent};
use crate::telephony::{TelephonyInbound, WsTelephonySink};
use axum::extract::ws::{Message, WebSocket};
use futures::StreamExt;
use tracing::{debug, error, info, warn};

enum Flow {
    Continue,
    End,
}

/// Run one call: connect the engine, then pump both transports until
/// either side goes away
///
/// A single select loop serializes all event handling for the call, so
/// session state needs no locking. Tearing down one transport promptly
/// closes the other; the two connections have no independent lifetime.
pub async fn run_call(socket: WebSocket, settings: EngineSettings, config: RelayConfig) {
    info!("Caller connected to media stream");

    let (engine, mut engine_events) = match engine::connect(&settings, &config).await {
        Ok(pair) => pair,
        Err(err) => {
            error!("Engine connection failed, ending call: {:#}", err);
            return;
        }
    };

    let (ws_writer, mut ws_reader) = socket.split();
    let telephony = WsTelephonySink::new(ws_writer);
    let mut session = CallSession::new(Box::new(telephony), Box::new(engine));

    loop {
        tokio::select! {
            frame = ws_reader.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        if let Flow::End = dispatch_telephony(&mut session, &text).await {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("Telephony connection closed");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!("Telephony socket error: {}", err);
                        break;
                    }
                }
            }
            event = engine_events.recv() => {
                match event {
                    Some(event) => {
                        if let Flow::End = dispatch_engine(&mut session, event).await {
                            break;
                        }
                    }
                    None => {
                        warn!("Engine connection closed, ending call");
                        break;
                    }
                }
            }
        }
    }

    session.teardown().await;
}

async fn dispatch_telephony(session: &mut CallSession, text: &str) -> Flow {
    let frame: TelephonyInbound = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(err) => {
            warn!("Malformed telephony frame dropped: {}", err);
            return Flow::Continue;
        }
    };

    match frame {
        TelephonyInbound::Connected => {
            debug!("Telephony handshake received");
        }
        TelephonyInbound::Start { start } => {
            session.handle_stream_start(start.stream_sid);
        }
        TelephonyInbound::Media { media } => {
            session.handle_media(media.timestamp, &media.payload).await;
        }
        TelephonyInbound::Mark { .. } => {
            session.handle_mark_ack();
        }
        TelephonyInbound::Stop => {
            info!("Media stream stopped");
            return Flow::End;
        }
        TelephonyInbound::Other => {
            debug!("Unhandled telephony event ignored");
        }
    }

    Flow::Continue
}

async fn dispatch_engine(session: &mut CallSession, event: ServerEvent) -> Flow {
    match event {
        ServerEvent::ResponseAudioDelta { item_id, delta } => {
            session.handle_audio_delta(&item_id, &delta).await;
        }
        ServerEvent::InputAudioBufferSpeechStarted => {
            session.handle_speech_started().await;
        }
        ServerEvent::Error { error } => {
            error!("Engine reported an error, ending call: {}", error);
            return Flow::End;
        }
        // Log-only lifecycle events, no state effect
        other => {
            debug!("Engine lifecycle event: {:?}", other);
        }
    }

    Flow::Continue
}
