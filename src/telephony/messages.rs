use serde::{Deserialize, Deserializer, Serialize};

/// Frame received from the telephony media stream
///
/// JSON envelope discriminated by `event`. Events the relay does not
/// handle (`dtmf`, future additions) deserialize to `Other` and are
/// ignored rather than treated as malformed.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum TelephonyInbound {
    /// Handshake frame sent once after the socket opens
    Connected,
    /// Media stream started; carries the per-call session identifier
    Start { start: StreamStart },
    /// Caller audio: millisecond timestamp + base64 payload
    Media { media: MediaFrame },
    /// Echo of a playback marker the relay previously emitted
    Mark { mark: MarkFrame },
    /// Media stream ended
    Stop,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamStart {
    #[serde(rename = "streamSid")]
    pub stream_sid: String,
    #[serde(rename = "callSid", default)]
    pub call_sid: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MediaFrame {
    /// Milliseconds since stream start. The platform sends this as a
    /// JSON string; accept either string or number.
    #[serde(deserialize_with = "lenient_millis")]
    pub timestamp: u64,
    /// Base64-encoded G.711 ulaw audio
    pub payload: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkFrame {
    pub name: String,
}

/// Frame sent to the telephony media stream
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum TelephonyOutbound {
    /// Synthesized audio for playback
    Media {
        #[serde(rename = "streamSid")]
        stream_sid: String,
        media: OutboundMedia,
    },
    /// Playback boundary marker; echoed back by the platform once the
    /// preceding media has actually been played
    Mark {
        #[serde(rename = "streamSid")]
        stream_sid: String,
        mark: MarkFrame,
    },
    /// Discard audio buffered for playback but not yet played
    Clear {
        #[serde(rename = "streamSid")]
        stream_sid: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct OutboundMedia {
    pub payload: String,
}

fn lenient_millis<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}
