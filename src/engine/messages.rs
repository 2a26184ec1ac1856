use serde::{Deserialize, Serialize};

/// Event sent to the speech engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// One-shot session configuration, sent after the ready signal
    #[serde(rename = "session.update")]
    SessionUpdate { session: SessionUpdate },

    /// Caller audio appended to the engine's input buffer
    #[serde(rename = "input_audio_buffer.append")]
    InputAudioBufferAppend { audio: String },

    /// Truncate the in-flight utterance to what the caller actually
    /// heard, so the engine's transcript matches played audio
    #[serde(rename = "conversation.item.truncate")]
    ConversationItemTruncate {
        item_id: String,
        content_index: u32,
        audio_end_ms: u64,
    },
}

/// Session configuration payload
///
/// The audio format fields must match the telephony codec exactly; the
/// relay performs no transcoding. Turn detection is server-side VAD:
/// the engine, not the relay, decides when the caller starts speaking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUpdate {
    pub turn_detection: TurnDetection,
    pub input_audio_format: String,
    pub output_audio_format: String,
    pub voice: String,
    pub instructions: String,
    pub modalities: Vec<String>,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnDetection {
    #[serde(rename = "type")]
    pub kind: String,
}

impl TurnDetection {
    pub fn server_vad() -> Self {
        Self {
            kind: "server_vad".to_string(),
        }
    }
}

/// Event received from the speech engine
///
/// Only the audio delta and the speech-started notification affect
/// relay state. Every other lifecycle event deserializes to a unit
/// variant (or `Other`) and is log-only.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    /// Ready signal; configuration may be sent after this (plus a
    /// settle delay, see `EngineSettings`)
    #[serde(rename = "session.created")]
    SessionCreated,

    #[serde(rename = "session.updated")]
    SessionUpdated,

    /// A chunk of synthesized audio for the current utterance
    #[serde(rename = "response.audio.delta")]
    ResponseAudioDelta { item_id: String, delta: String },

    /// Server-side VAD detected the caller speaking
    #[serde(rename = "input_audio_buffer.speech_started")]
    InputAudioBufferSpeechStarted,

    #[serde(rename = "response.done")]
    ResponseDone,

    #[serde(rename = "error")]
    Error {
        #[serde(default)]
        error: serde_json::Value,
    },

    #[serde(other)]
    Other,
}
