// Wire-format tests for both transport envelopes.

use serde_json::json;
use voice_bridge::engine::{ClientEvent, ServerEvent};
use voice_bridge::relay::RelayConfig;
use voice_bridge::telephony::{MarkFrame, OutboundMedia, TelephonyInbound, TelephonyOutbound};

#[test]
fn parses_start_frame() {
    let text = r#"{
        "event": "start",
        "sequenceNumber": "1",
        "start": {
            "streamSid": "MZ1234567890",
            "accountSid": "AC000",
            "callSid": "CA123",
            "tracks": ["inbound"],
            "mediaFormat": {"encoding": "audio/x-mulaw", "sampleRate": 8000, "channels": 1}
        },
        "streamSid": "MZ1234567890"
    }"#;

    let frame: TelephonyInbound = serde_json::from_str(text).unwrap();
    match frame {
        TelephonyInbound::Start { start } => {
            assert_eq!(start.stream_sid, "MZ1234567890");
            assert_eq!(start.call_sid.as_deref(), Some("CA123"));
        }
        other => panic!("Expected start frame, got {:?}", other),
    }
}

#[test]
fn parses_media_frame_with_string_timestamp() {
    // The platform sends the millisecond timestamp as a JSON string
    let text = r#"{
        "event": "media",
        "media": {"track": "inbound", "chunk": "2", "timestamp": "160", "payload": "AAAA"}
    }"#;

    let frame: TelephonyInbound = serde_json::from_str(text).unwrap();
    match frame {
        TelephonyInbound::Media { media } => {
            assert_eq!(media.timestamp, 160);
            assert_eq!(media.payload, "AAAA");
        }
        other => panic!("Expected media frame, got {:?}", other),
    }
}

#[test]
fn parses_media_frame_with_numeric_timestamp() {
    let text = r#"{"event": "media", "media": {"timestamp": 800, "payload": "AAAA"}}"#;

    let frame: TelephonyInbound = serde_json::from_str(text).unwrap();
    match frame {
        TelephonyInbound::Media { media } => assert_eq!(media.timestamp, 800),
        other => panic!("Expected media frame, got {:?}", other),
    }
}

#[test]
fn rejects_media_frame_with_bad_timestamp() {
    let text = r#"{"event": "media", "media": {"timestamp": "soon", "payload": "AAAA"}}"#;
    assert!(serde_json::from_str::<TelephonyInbound>(text).is_err());
}

#[test]
fn parses_mark_echo() {
    let text = r#"{"event": "mark", "streamSid": "MZ1", "mark": {"name": "f8a1"}}"#;

    let frame: TelephonyInbound = serde_json::from_str(text).unwrap();
    match frame {
        TelephonyInbound::Mark { mark } => assert_eq!(mark.name, "f8a1"),
        other => panic!("Expected mark frame, got {:?}", other),
    }
}

#[test]
fn parses_lifecycle_and_unknown_events() {
    let connected = r#"{"event": "connected", "protocol": "Call", "version": "1.0.0"}"#;
    assert!(matches!(
        serde_json::from_str::<TelephonyInbound>(connected).unwrap(),
        TelephonyInbound::Connected
    ));

    let stop = r#"{"event": "stop", "streamSid": "MZ1"}"#;
    assert!(matches!(
        serde_json::from_str::<TelephonyInbound>(stop).unwrap(),
        TelephonyInbound::Stop
    ));

    let dtmf = r#"{"event": "dtmf", "dtmf": {"digit": "5"}}"#;
    assert!(matches!(
        serde_json::from_str::<TelephonyInbound>(dtmf).unwrap(),
        TelephonyInbound::Other
    ));
}

#[test]
fn rejects_malformed_telephony_frame() {
    assert!(serde_json::from_str::<TelephonyInbound>("{not json").is_err());
    assert!(serde_json::from_str::<TelephonyInbound>(r#"{"media": {}}"#).is_err());
}

#[test]
fn serializes_outbound_media_frame() {
    let frame = TelephonyOutbound::Media {
        stream_sid: "MZ1".to_string(),
        media: OutboundMedia {
            payload: "AAAA".to_string(),
        },
    };

    let value = serde_json::to_value(&frame).unwrap();
    assert_eq!(
        value,
        json!({"event": "media", "streamSid": "MZ1", "media": {"payload": "AAAA"}})
    );
}

#[test]
fn serializes_outbound_mark_frame() {
    let frame = TelephonyOutbound::Mark {
        stream_sid: "MZ1".to_string(),
        mark: MarkFrame {
            name: "f8a1".to_string(),
        },
    };

    let value = serde_json::to_value(&frame).unwrap();
    assert_eq!(
        value,
        json!({"event": "mark", "streamSid": "MZ1", "mark": {"name": "f8a1"}})
    );
}

#[test]
fn serializes_outbound_clear_frame() {
    let frame = TelephonyOutbound::Clear {
        stream_sid: "MZ1".to_string(),
    };

    let value = serde_json::to_value(&frame).unwrap();
    assert_eq!(value, json!({"event": "clear", "streamSid": "MZ1"}));
}

#[test]
fn parses_engine_audio_delta() {
    let text = r#"{
        "type": "response.audio.delta",
        "event_id": "ev_1",
        "response_id": "resp_1",
        "item_id": "item_A",
        "output_index": 0,
        "content_index": 0,
        "delta": "AAAA"
    }"#;

    let event: ServerEvent = serde_json::from_str(text).unwrap();
    match event {
        ServerEvent::ResponseAudioDelta { item_id, delta } => {
            assert_eq!(item_id, "item_A");
            assert_eq!(delta, "AAAA");
        }
        other => panic!("Expected audio delta, got {:?}", other),
    }
}

#[test]
fn parses_engine_speech_started() {
    let text = r#"{"type": "input_audio_buffer.speech_started", "audio_start_ms": 120}"#;
    assert!(matches!(
        serde_json::from_str::<ServerEvent>(text).unwrap(),
        ServerEvent::InputAudioBufferSpeechStarted
    ));
}

#[test]
fn parses_engine_lifecycle_events() {
    assert!(matches!(
        serde_json::from_str::<ServerEvent>(r#"{"type": "session.created", "session": {}}"#)
            .unwrap(),
        ServerEvent::SessionCreated
    ));

    assert!(matches!(
        serde_json::from_str::<ServerEvent>(r#"{"type": "response.done", "response": {}}"#)
            .unwrap(),
        ServerEvent::ResponseDone
    ));

    // Anything unenumerated is log-only
    assert!(matches!(
        serde_json::from_str::<ServerEvent>(r#"{"type": "rate_limits.updated"}"#).unwrap(),
        ServerEvent::Other
    ));
}

#[test]
fn serializes_append_event() {
    let event = ClientEvent::InputAudioBufferAppend {
        audio: "AAAA".to_string(),
    };

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(
        value,
        json!({"type": "input_audio_buffer.append", "audio": "AAAA"})
    );
}

#[test]
fn serializes_truncate_event() {
    let event = ClientEvent::ConversationItemTruncate {
        item_id: "item_A".to_string(),
        content_index: 0,
        audio_end_ms: 800,
    };

    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(
        value,
        json!({
            "type": "conversation.item.truncate",
            "item_id": "item_A",
            "content_index": 0,
            "audio_end_ms": 800
        })
    );
}

#[test]
fn session_update_carries_relay_config() {
    let config = RelayConfig {
        voice: "verse".to_string(),
        instructions: "Be terse.".to_string(),
        temperature: 0.6,
        audio_format: "g711_ulaw".to_string(),
        settle_delay_ms: 200,
    };

    let event = ClientEvent::SessionUpdate {
        session: config.session_update(),
    };
    let value = serde_json::to_value(&event).unwrap();

    assert_eq!(value["type"], "session.update");
    assert_eq!(value["session"]["voice"], "verse");
    assert_eq!(value["session"]["instructions"], "Be terse.");
    assert_eq!(value["session"]["turn_detection"]["type"], "server_vad");
    assert_eq!(value["session"]["input_audio_format"], "g711_ulaw");
    assert_eq!(value["session"]["output_audio_format"], "g711_ulaw");
    assert_eq!(value["session"]["modalities"], json!(["text", "audio"]));
}
