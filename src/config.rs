use crate::engine::EngineSettings;
use crate::relay::RelayConfig;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub engine: EngineConfig,
    pub audio: AudioConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    /// Spoken greeting embedded in the call-control document
    pub greeting: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Speech engine WebSocket endpoint
    pub url: String,
    pub model: String,
    /// Bearer token; expected from the environment, never from the config file
    #[serde(default)]
    pub api_key: String,
    pub voice: String,
    pub temperature: f32,
    /// Persona instructions sent in the one-shot session configuration
    pub instructions: String,
    /// Delay after the engine's ready signal before configuration is sent.
    /// The remote rejects configuration sent too early; "ready" and
    /// "ready to accept configuration" are indistinguishable on the wire.
    pub settle_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// Codec on both legs; the relay never transcodes
    pub codec: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "voice-bridge")?
            .set_default(
                "service.greeting",
                "Please wait while we connect your call to the A. I. voice assistant.",
            )?
            .set_default("service.http.bind", "0.0.0.0")?
            .set_default("service.http.port", 5050)?
            .set_default("engine.url", "wss://api.openai.com/v1/realtime")?
            .set_default("engine.model", "gpt-4o-realtime-preview-2024-10-01")?
            .set_default("engine.voice", "alloy")?
            .set_default("engine.temperature", 0.8)?
            .set_default(
                "engine.instructions",
                "You are a helpful and bubbly AI assistant who loves to chat.",
            )?
            .set_default("engine.settle_delay_ms", 200)?
            .set_default("audio.codec", "g711_ulaw")?
            .add_source(config::File::with_name(path).required(false))
            // VOICE_BRIDGE__ENGINE__API_KEY etc.
            .add_source(config::Environment::with_prefix("VOICE_BRIDGE").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Per-call relay configuration record
    pub fn relay(&self) -> RelayConfig {
        RelayConfig {
            voice: self.engine.voice.clone(),
            instructions: self.engine.instructions.clone(),
            temperature: self.engine.temperature,
            audio_format: self.audio.codec.clone(),
            settle_delay_ms: self.engine.settle_delay_ms,
        }
    }

    /// Connection settings for the speech engine client
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            url: self.engine.url.clone(),
            model: self.engine.model.clone(),
            api_key: self.engine.api_key.clone(),
        }
    }
}
