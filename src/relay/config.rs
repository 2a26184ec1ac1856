use crate::engine::{SessionUpdate, TurnDetection};

/// Configuration for one relayed call
///
/// An explicit per-call record rather than process-wide state, so calls
/// can vary voice or persona independently.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Engine voice identity
    pub voice: String,

    /// Persona instructions for the engine session
    pub instructions: String,

    /// Engine sampling temperature
    pub temperature: f32,

    /// Codec on both legs (telephony fixes this to 8kHz G.711 ulaw);
    /// the relay never transcodes
    pub audio_format: String,

    /// Delay after the engine's ready signal before configuration is sent
    pub settle_delay_ms: u64,
}

impl RelayConfig {
    /// Build the one-shot engine session configuration
    pub fn session_update(&self) -> SessionUpdate {
        SessionUpdate {
            turn_detection: TurnDetection::server_vad(),
            input_audio_format: self.audio_format.clone(),
            output_audio_format: self.audio_format.clone(),
            voice: self.voice.clone(),
            instructions: self.instructions.clone(),
            modalities: vec!["text".to_string(), "audio".to_string()],
            temperature: self.temperature,
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            voice: "alloy".to_string(),
            instructions: "You are a helpful and bubbly AI assistant who loves to chat."
                .to_string(),
            temperature: 0.8,
            audio_format: "g711_ulaw".to_string(),
            settle_delay_ms: 200,
        }
    }
}
