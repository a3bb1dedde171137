//! Exact wire-shape tests for the egress codec.
//!
//! The engine on the other side of the channel dispatches on these field
//! names and value encodings, so they are pinned literally here.

use serde_json::json;

use aria_types::{
    Command, LoadRequest, LoopConfig, NodeGroupId, OscillatorInstance, OscillatorKind,
    OutgoingMessage, SoundInstance, Source, Timestamp, VolumePoint,
};
use aria_wire::{encode_command, encode_outgoing};

fn sound(buffer_id: u32, start_ms: i64) -> SoundInstance {
    SoundInstance {
        source: Source::new(buffer_id),
        start_time: Timestamp::from_millis(start_ms),
        start_at_ms: 0.0,
        volume: 1.0,
        volume_timelines: Vec::new(),
        loop_config: None,
        playback_rate: 1.0,
    }
}

#[test]
fn start_sound_shape() {
    let mut instance = sound(1, 100_000);
    instance.start_at_ms = 250.0;
    instance.volume = 0.5;
    instance.loop_config = Some(LoopConfig {
        loop_start_ms: 0.0,
        loop_end_ms: 10_000.0,
    });
    instance.playback_rate = 1.5;
    instance.volume_timelines = vec![vec![
        VolumePoint {
            time: Timestamp::from_millis(100_000),
            volume: 1.0,
        },
        VolumePoint {
            time: Timestamp::from_millis(102_000),
            volume: 0.0,
        },
    ]];

    let encoded = encode_command(&Command::StartSound {
        node_group_id: NodeGroupId::new(0),
        sound: instance,
    });

    assert_eq!(
        encoded,
        json!({
            "action": "startSound",
            "nodeGroupId": 0,
            "bufferId": 1,
            "startTime": 100000,
            "startAt": 250.0,
            "volume": 0.5,
            "volumeTimelines": [[
                { "time": 100000, "volume": 1.0 },
                { "time": 102000, "volume": 0.0 },
            ]],
            "loop": { "loopStart": 0.0, "loopEnd": 10000.0 },
            "playbackRate": 1.5,
        })
    );
}

#[test]
fn start_sound_without_loop_encodes_null() {
    let encoded = encode_command(&Command::StartSound {
        node_group_id: NodeGroupId::new(3),
        sound: sound(2, 5_000),
    });
    assert_eq!(encoded["loop"], json!(null));
}

#[test]
fn start_oscillator_shape() {
    let encoded = encode_command(&Command::StartOscillator {
        node_group_id: NodeGroupId::new(1),
        oscillator: OscillatorInstance {
            kind: OscillatorKind::Sine(440.0),
            start_time: Timestamp::from_millis(7_000),
            volume: 1.0,
            volume_timelines: Vec::new(),
        },
    });

    assert_eq!(
        encoded,
        json!({
            "action": "startOscillator",
            "nodeGroupId": 1,
            "oscillatorType": "sine",
            "startTime": 7000,
            "volume": 1.0,
            "volumeTimelines": [],
            "frequency": 440.0,
        })
    );
}

#[test]
fn noise_oscillators_encode_zero_frequency() {
    for (kind, name) in [
        (OscillatorKind::WhiteNoise, "whiteNoise"),
        (OscillatorKind::PinkNoise, "pinkNoise"),
        (OscillatorKind::BrownNoise, "brownNoise"),
    ] {
        let encoded = encode_command(&Command::StartOscillator {
            node_group_id: NodeGroupId::new(0),
            oscillator: OscillatorInstance {
                kind,
                start_time: Timestamp::from_millis(0),
                volume: 1.0,
                volume_timelines: Vec::new(),
            },
        });
        assert_eq!(encoded["oscillatorType"], json!(name));
        assert_eq!(encoded["frequency"], json!(0.0));
    }
}

#[test]
fn periodic_oscillator_type_names() {
    for (kind, name) in [
        (OscillatorKind::Square(220.0), "square"),
        (OscillatorKind::Sawtooth(220.0), "sawtooth"),
        (OscillatorKind::Triangle(220.0), "triangle"),
    ] {
        let encoded = encode_command(&Command::StartOscillator {
            node_group_id: NodeGroupId::new(0),
            oscillator: OscillatorInstance {
                kind,
                start_time: Timestamp::from_millis(0),
                volume: 1.0,
                volume_timelines: Vec::new(),
            },
        });
        assert_eq!(encoded["oscillatorType"], json!(name));
        assert_eq!(encoded["frequency"], json!(220.0));
    }
}

#[test]
fn mutation_command_shapes() {
    let id = NodeGroupId::new(4);

    assert_eq!(
        encode_command(&Command::StopSound { node_group_id: id }),
        json!({ "action": "stopSound", "nodeGroupId": 4 })
    );
    assert_eq!(
        encode_command(&Command::SetVolume {
            node_group_id: id,
            volume: 0.25,
        }),
        json!({ "action": "setVolume", "nodeGroupId": 4, "volume": 0.25 })
    );
    assert_eq!(
        encode_command(&Command::SetPlaybackRate {
            node_group_id: id,
            playback_rate: 2.0,
        }),
        json!({ "action": "setPlaybackRate", "nodeGroupId": 4, "playbackRate": 2.0 })
    );
    assert_eq!(
        encode_command(&Command::SetLoopConfig {
            node_group_id: id,
            loop_config: Some(LoopConfig {
                loop_start_ms: 0.0,
                loop_end_ms: 10_000.0,
            }),
        }),
        json!({
            "action": "setLoopConfig",
            "nodeGroupId": 4,
            "loop": { "loopStart": 0.0, "loopEnd": 10000.0 },
        })
    );
    assert_eq!(
        encode_command(&Command::SetLoopConfig {
            node_group_id: id,
            loop_config: None,
        }),
        json!({ "action": "setLoopConfig", "nodeGroupId": 4, "loop": null })
    );
    assert_eq!(
        encode_command(&Command::SetVolumeAt {
            node_group_id: id,
            timelines: vec![vec![VolumePoint {
                time: Timestamp::from_millis(1_000),
                volume: 0.5,
            }]],
        }),
        json!({
            "action": "setVolumeAt",
            "nodeGroupId": 4,
            "volumeAt": [[{ "time": 1000, "volume": 0.5 }]],
        })
    );
}

#[test]
fn outgoing_message_shape() {
    let message = OutgoingMessage {
        audio: vec![Command::StopSound {
            node_group_id: NodeGroupId::new(2),
        }],
        audio_cmds: vec![LoadRequest {
            audio_url: "song.mp3".to_string(),
            request_id: 0,
        }],
    };

    assert_eq!(
        encode_outgoing(&message),
        json!({
            "audio": [{ "action": "stopSound", "nodeGroupId": 2 }],
            "audioCmds": [{ "audioUrl": "song.mp3", "requestId": 0 }],
        })
    );
}

#[test]
fn empty_tick_still_has_both_fields() {
    assert_eq!(
        encode_outgoing(&OutgoingMessage::default()),
        json!({ "audio": [], "audioCmds": [] })
    );
}
