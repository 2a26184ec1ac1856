use chrono::{DateTime, Utc};

/// Counters for one relayed call, logged at teardown
#[derive(Debug, Clone)]
pub struct CallStats {
    /// When the relay session was created
    pub started_at: DateTime<Utc>,

    /// Caller audio frames forwarded to the engine
    pub caller_frames: usize,

    /// Engine audio deltas forwarded to the caller
    pub engine_deltas: usize,

    /// Playback markers acknowledged by the telephony platform
    pub marks_acked: usize,

    /// Barge-ins that actually fired (guard met)
    pub barge_ins: usize,
}

impl CallStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            caller_frames: 0,
            engine_deltas: 0,
            marks_acked: 0,
            barge_ins: 0,
        }
    }
}

impl Default for CallStats {
    fn default() -> Self {
        Self::new()
    }
}
