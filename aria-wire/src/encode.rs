//! Egress codec: commands and load requests to engine JSON.
//!
//! Every command object carries an `"action"` discriminant and a
//! `"nodeGroupId"`. Wall-clock times encode as integer milliseconds,
//! buffer offsets and loop bounds as floating-point milliseconds.

use serde_json::{json, Value};

use aria_types::{Command, LoadRequest, LoopConfig, OscillatorKind, OutgoingMessage, VolumePoint};

/// Serialize one tick's outgoing batch to the engine wire format.
pub fn encode_outgoing(message: &OutgoingMessage) -> Value {
    json!({
        "audio": message.audio.iter().map(encode_command).collect::<Vec<_>>(),
        "audioCmds": message.audio_cmds.iter().map(encode_load_request).collect::<Vec<_>>(),
    })
}

fn encode_load_request(request: &LoadRequest) -> Value {
    json!({
        "audioUrl": request.audio_url,
        "requestId": request.request_id,
    })
}

/// Serialize one command to its tagged JSON object.
pub fn encode_command(command: &Command) -> Value {
    match command {
        Command::StartSound {
            node_group_id,
            sound,
        } => json!({
            "action": "startSound",
            "nodeGroupId": node_group_id.get(),
            "bufferId": sound.source.buffer_id(),
            "startTime": sound.start_time.millis(),
            "startAt": sound.start_at_ms,
            "volume": sound.volume,
            "volumeTimelines": encode_timelines(&sound.volume_timelines),
            "loop": encode_loop(sound.loop_config),
            "playbackRate": sound.playback_rate,
        }),
        Command::StartOscillator {
            node_group_id,
            oscillator,
        } => json!({
            "action": "startOscillator",
            "nodeGroupId": node_group_id.get(),
            "oscillatorType": oscillator_type_name(oscillator.kind),
            "startTime": oscillator.start_time.millis(),
            "volume": oscillator.volume,
            "volumeTimelines": encode_timelines(&oscillator.volume_timelines),
            "frequency": oscillator.kind.frequency(),
        }),
        Command::StopSound { node_group_id } => json!({
            "action": "stopSound",
            "nodeGroupId": node_group_id.get(),
        }),
        Command::SetVolume {
            node_group_id,
            volume,
        } => json!({
            "action": "setVolume",
            "nodeGroupId": node_group_id.get(),
            "volume": volume,
        }),
        Command::SetVolumeAt {
            node_group_id,
            timelines,
        } => json!({
            "action": "setVolumeAt",
            "nodeGroupId": node_group_id.get(),
            "volumeAt": encode_timelines(timelines),
        }),
        Command::SetLoopConfig {
            node_group_id,
            loop_config,
        } => json!({
            "action": "setLoopConfig",
            "nodeGroupId": node_group_id.get(),
            "loop": encode_loop(*loop_config),
        }),
        Command::SetPlaybackRate {
            node_group_id,
            playback_rate,
        } => json!({
            "action": "setPlaybackRate",
            "nodeGroupId": node_group_id.get(),
            "playbackRate": playback_rate,
        }),
    }
}

fn encode_timelines(timelines: &[Vec<VolumePoint>]) -> Value {
    Value::Array(
        timelines
            .iter()
            .map(|timeline| Value::Array(timeline.iter().map(encode_point).collect()))
            .collect(),
    )
}

fn encode_point(point: &VolumePoint) -> Value {
    json!({
        "time": point.time.millis(),
        "volume": point.volume,
    })
}

fn encode_loop(config: Option<LoopConfig>) -> Value {
    match config {
        Some(region) => json!({
            "loopStart": region.loop_start_ms,
            "loopEnd": region.loop_end_ms,
        }),
        None => Value::Null,
    }
}

fn oscillator_type_name(kind: OscillatorKind) -> &'static str {
    match kind {
        OscillatorKind::Sine(_) => "sine",
        OscillatorKind::Square(_) => "square",
        OscillatorKind::Sawtooth(_) => "sawtooth",
        OscillatorKind::Triangle(_) => "triangle",
        OscillatorKind::WhiteNoise => "whiteNoise",
        OscillatorKind::PinkNoise => "pinkNoise",
        OscillatorKind::BrownNoise => "brownNoise",
    }
}
