use super::stats::CallStats;
use crate::engine::EngineSink;
use crate::telephony::TelephonySink;
use base64::Engine;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// The per-call duplex relay state machine
///
/// Owns the outbound half of both transports for the lifetime of one
/// call and tracks the timing state barge-in depends on:
/// - `latest_media_ts`: caller clock, from the newest caller frame
/// - `response_start_ts`: caller-clock anchor of the current utterance,
///   `Some` iff AI audio is streaming
/// - `mark_queue`: playback markers emitted but not yet echoed back,
///   strictly FIFO; non-empty only while an utterance is streaming
///
/// All sends are fire-and-forget: a failed send is a dropped frame.
/// Audio bytes are never buffered beyond single-frame forwarding.
pub struct CallSession {
    telephony: Box<dyn TelephonySink>,
    engine: Box<dyn EngineSink>,

    /// Session identifier assigned by the telephony platform at stream
    /// start; absent until then
    stream_sid: Option<String>,

    /// Timestamp (ms since call start) of the newest caller frame
    latest_media_ts: u64,

    /// Caller-clock time at which the current utterance started
    response_start_ts: Option<u64>,

    /// Engine item id of the utterance currently streaming
    active_item_id: Option<String>,

    /// Playback markers awaiting acknowledgement, oldest first
    mark_queue: VecDeque<String>,

    engine_closed: bool,

    stats: CallStats,
}

impl CallSession {
    pub fn new(telephony: Box<dyn TelephonySink>, engine: Box<dyn EngineSink>) -> Self {
        Self {
            telephony,
            engine,
            stream_sid: None,
            latest_media_ts: 0,
            response_start_ts: None,
            active_item_id: None,
            mark_queue: VecDeque::new(),
            engine_closed: false,
            stats: CallStats::new(),
        }
    }

    /// Media stream started: record the session id and reset timing state
    pub fn handle_stream_start(&mut self, stream_sid: String) {
        info!("Media stream started: {}", stream_sid);

        self.stream_sid = Some(stream_sid);
        self.latest_media_ts = 0;
        self.response_start_ts = None;
        self.active_item_id = None;
        self.mark_queue.clear();
    }

    /// Caller audio frame: update the caller clock, forward to the engine
    ///
    /// The timestamp is tracked in every state. Forwarding is a pure
    /// pass-through: if the engine connection is not open the frame is
    /// dropped, never queued.
    pub async fn handle_media(&mut self, timestamp_ms: u64, payload: &str) {
        if base64::engine::general_purpose::STANDARD
            .decode(payload)
            .is_err()
        {
            warn!("Malformed media payload dropped (not base64)");
            return;
        }

        self.latest_media_ts = timestamp_ms;

        if !self.engine.is_open() {
            debug!("Engine not open, dropping caller frame at {}ms", timestamp_ms);
            return;
        }

        if let Err(err) = self.engine.append_audio(payload).await {
            debug!("Dropped caller frame: {}", err);
            return;
        }

        self.stats.caller_frames += 1;
    }

    /// Engine audio delta: forward to the caller, anchor the utterance,
    /// emit a playback marker
    ///
    /// The anchor is the current caller-clock value, not wall-clock
    /// time: only the caller-side clock is comparable to the later
    /// caller-speech timestamps barge-in subtracts against. A delta
    /// arriving while an anchor is already set does not re-anchor, even
    /// if it belongs to a new utterance whose predecessor's marks are
    /// still draining.
    pub async fn handle_audio_delta(&mut self, item_id: &str, delta: &str) {
        let Some(stream_sid) = self.stream_sid.clone() else {
            warn!("Audio delta before stream start, dropping");
            return;
        };

        if let Err(err) = self.telephony.send_audio(&stream_sid, delta).await {
            warn!("Failed to forward audio delta: {}", err);
            return;
        }

        if self.response_start_ts.is_none() {
            self.response_start_ts = Some(self.latest_media_ts);
            debug!(
                "Utterance {} anchored at caller clock {}ms",
                item_id, self.latest_media_ts
            );
        }
        self.active_item_id = Some(item_id.to_string());

        let token = uuid::Uuid::new_v4().to_string();
        if let Err(err) = self.telephony.send_mark(&stream_sid, &token).await {
            warn!("Failed to send playback marker: {}", err);
        }
        self.mark_queue.push_back(token);

        self.stats.engine_deltas += 1;
    }

    /// Playback marker echoed back: pop the oldest pending marker
    ///
    /// Acks arrive in emission order; anything else is a protocol
    /// anomaly, handled by popping the front regardless.
    pub fn handle_mark_ack(&mut self) {
        if self.mark_queue.pop_front().is_some() {
            self.stats.marks_acked += 1;
        } else {
            debug!("Marker ack with empty queue, ignoring");
        }
    }

    /// Caller started speaking: barge in on the current utterance
    ///
    /// Only fires with markers pending and an anchor set; a spurious
    /// signal with nothing to interrupt is a no-op. Truncates the
    /// engine's transcript to the elapsed caller-clock time (a lower
    /// bound on what was heard) and tells the telephony platform to
    /// discard audio queued for playback, since already-delivered audio
    /// cannot be revoked engine-side.
    pub async fn handle_speech_started(&mut self) {
        if self.mark_queue.is_empty() || self.response_start_ts.is_none() {
            debug!("Speech started with nothing to interrupt, ignoring");
            return;
        }

        let started = self.response_start_ts.unwrap_or(0);
        let played_ms = self.latest_media_ts.saturating_sub(started);

        info!(
            "Barge-in: caller spoke {}ms into the response",
            played_ms
        );

        if let Some(item_id) = self.active_item_id.clone() {
            if let Err(err) = self.engine.truncate(&item_id, 0, played_ms).await {
                warn!("Failed to truncate utterance {}: {}", item_id, err);
            }
        }

        if let Some(stream_sid) = self.stream_sid.clone() {
            if let Err(err) = self.telephony.send_clear(&stream_sid).await {
                warn!("Failed to clear playback buffer: {}", err);
            }
        }

        self.mark_queue.clear();
        self.active_item_id = None;
        self.response_start_ts = None;

        self.stats.barge_ins += 1;
    }

    /// Tear down the session: close the engine connection exactly once
    ///
    /// Called when the telephony side goes away. No reconnect is
    /// attempted; a call is a single unit of work.
    pub async fn teardown(&mut self) {
        if self.engine_closed {
            return;
        }
        self.engine_closed = true;

        self.engine.close().await;

        info!(
            "Call torn down: sid={:?} frames={} deltas={} acks={} barge_ins={}",
            self.stream_sid,
            self.stats.caller_frames,
            self.stats.engine_deltas,
            self.stats.marks_acked,
            self.stats.barge_ins
        );
    }

    pub fn stream_sid(&self) -> Option<&str> {
        self.stream_sid.as_deref()
    }

    pub fn latest_media_ts(&self) -> u64 {
        self.latest_media_ts
    }

    pub fn response_start_ts(&self) -> Option<u64> {
        self.response_start_ts
    }

    pub fn active_item_id(&self) -> Option<&str> {
        self.active_item_id.as_deref()
    }

    /// Pending playback markers, oldest first
    pub fn pending_marks(&self) -> Vec<String> {
        self.mark_queue.iter().cloned().collect()
    }

    /// Whether AI audio is currently streaming to the caller
    pub fn is_responding(&self) -> bool {
        self.response_start_ts.is_some()
    }

    pub fn stats(&self) -> &CallStats {
        &self.stats
    }
}
