//! Declarative audio tree: a value describing what should be audible.
//!
//! Hosts build a fresh tree from their state on every update and never say
//! "start" or "stop"; the reconciler in aria-core diffs successive trees
//! and infers the imperative commands. Constructing a tree has no side
//! effects.

use serde::{Deserialize, Serialize};

use crate::{Source, Timestamp};

/// A point on a scheduled volume ramp: at `time`, gain reaches `volume`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumePoint {
    pub time: Timestamp,
    pub volume: f32,
}

/// Loop region within a buffer, in milliseconds from the buffer start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoopConfig {
    pub loop_start_ms: f64,
    pub loop_end_ms: f64,
}

/// Per-file playback settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Offset into the buffer at which playback begins, in milliseconds.
    pub start_at_ms: f64,
    pub playback_rate: f32,
    pub loop_config: Option<LoopConfig>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            start_at_ms: 0.0,
            playback_rate: 1.0,
            loop_config: None,
        }
    }
}

/// Oscillator waveforms. Periodic kinds carry a frequency in cycles per
/// second; the noise kinds have none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OscillatorKind {
    Sine(f32),
    Square(f32),
    Sawtooth(f32),
    Triangle(f32),
    WhiteNoise,
    PinkNoise,
    BrownNoise,
}

impl OscillatorKind {
    /// Frequency in cycles per second. The noise kinds report 0.
    pub fn frequency(self) -> f32 {
        match self {
            OscillatorKind::Sine(f)
            | OscillatorKind::Square(f)
            | OscillatorKind::Sawtooth(f)
            | OscillatorKind::Triangle(f) => f,
            OscillatorKind::WhiteNoise
            | OscillatorKind::PinkNoise
            | OscillatorKind::BrownNoise => 0.0,
        }
    }
}

/// Volume effects distribute through groups and compose by nesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Multiply the volume of every instance underneath.
    ScaleVolume(f32),
    /// Schedule a volume ramp through the given points.
    ScaleVolumeAt(Vec<VolumePoint>),
}

/// Declarative description of currently-desired sound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Audio {
    /// Ordered children. The empty group is silence.
    Group(Vec<Audio>),
    /// Play a decoded buffer starting at a wall-clock instant.
    File {
        source: Source,
        start_time: Timestamp,
        config: PlaybackConfig,
    },
    /// A generated waveform starting at a wall-clock instant.
    Oscillator {
        kind: OscillatorKind,
        start_time: Timestamp,
    },
    /// A volume effect applied to everything underneath.
    Effect { kind: EffectKind, inner: Box<Audio> },
}

/// Play `source` from its beginning at `start_time` with default settings.
pub fn audio(source: Source, start_time: Timestamp) -> Audio {
    audio_with_config(PlaybackConfig::default(), source, start_time)
}

/// Play `source` at `start_time` with explicit playback settings.
pub fn audio_with_config(config: PlaybackConfig, source: Source, start_time: Timestamp) -> Audio {
    Audio::File {
        source,
        start_time,
        config,
    }
}

/// Nothing should be playing.
pub fn silence() -> Audio {
    Audio::Group(Vec::new())
}

pub fn group(children: Vec<Audio>) -> Audio {
    Audio::Group(children)
}

pub fn sine(frequency: f32, start_time: Timestamp) -> Audio {
    oscillator(OscillatorKind::Sine(frequency), start_time)
}

pub fn square(frequency: f32, start_time: Timestamp) -> Audio {
    oscillator(OscillatorKind::Square(frequency), start_time)
}

pub fn sawtooth(frequency: f32, start_time: Timestamp) -> Audio {
    oscillator(OscillatorKind::Sawtooth(frequency), start_time)
}

pub fn triangle(frequency: f32, start_time: Timestamp) -> Audio {
    oscillator(OscillatorKind::Triangle(frequency), start_time)
}

pub fn white_noise(start_time: Timestamp) -> Audio {
    oscillator(OscillatorKind::WhiteNoise, start_time)
}

pub fn pink_noise(start_time: Timestamp) -> Audio {
    oscillator(OscillatorKind::PinkNoise, start_time)
}

pub fn brown_noise(start_time: Timestamp) -> Audio {
    oscillator(OscillatorKind::BrownNoise, start_time)
}

fn oscillator(kind: OscillatorKind, start_time: Timestamp) -> Audio {
    Audio::Oscillator { kind, start_time }
}

/// Scale the volume of everything in `inner`. The factor is clamped to
/// be non-negative.
pub fn scale_volume(factor: f32, inner: Audio) -> Audio {
    Audio::Effect {
        kind: EffectKind::ScaleVolume(factor.max(0.0)),
        inner: Box::new(inner),
    }
}

/// Schedule a volume ramp over everything in `inner`.
///
/// Point volumes are clamped to be non-negative and points are sorted by
/// ascending time. An empty list is replaced by the safe default point
/// `(time = 0, volume = 1)` so a ramp always has at least one point.
pub fn scale_volume_at(points: Vec<VolumePoint>, inner: Audio) -> Audio {
    let mut points: Vec<VolumePoint> = points
        .into_iter()
        .map(|p| VolumePoint {
            time: p.time,
            volume: p.volume.max(0.0),
        })
        .collect();
    points.sort_by_key(|p| p.time);
    if points.is_empty() {
        points.push(VolumePoint {
            time: Timestamp::from_millis(0),
            volume: 1.0,
        });
    }
    Audio::Effect {
        kind: EffectKind::ScaleVolumeAt(points),
        inner: Box::new(inner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_is_the_empty_group() {
        assert_eq!(silence(), Audio::Group(Vec::new()));
    }

    #[test]
    fn scale_volume_clamps_negative_factors() {
        let tree = scale_volume(-0.5, silence());
        match tree {
            Audio::Effect {
                kind: EffectKind::ScaleVolume(factor),
                ..
            } => assert_eq!(factor, 0.0),
            other => panic!("unexpected tree: {:?}", other),
        }
    }

    #[test]
    fn scale_volume_at_sorts_and_clamps_points() {
        let tree = scale_volume_at(
            vec![
                VolumePoint {
                    time: Timestamp::from_millis(2_000),
                    volume: -1.0,
                },
                VolumePoint {
                    time: Timestamp::from_millis(1_000),
                    volume: 0.5,
                },
            ],
            silence(),
        );
        match tree {
            Audio::Effect {
                kind: EffectKind::ScaleVolumeAt(points),
                ..
            } => {
                assert_eq!(points[0].time, Timestamp::from_millis(1_000));
                assert_eq!(points[0].volume, 0.5);
                assert_eq!(points[1].time, Timestamp::from_millis(2_000));
                assert_eq!(points[1].volume, 0.0);
            }
            other => panic!("unexpected tree: {:?}", other),
        }
    }

    #[test]
    fn scale_volume_at_substitutes_a_default_point_for_empty_input() {
        let tree = scale_volume_at(Vec::new(), silence());
        match tree {
            Audio::Effect {
                kind: EffectKind::ScaleVolumeAt(points),
                ..
            } => {
                assert_eq!(points.len(), 1);
                assert_eq!(points[0].time, Timestamp::from_millis(0));
                assert_eq!(points[0].volume, 1.0);
            }
            other => panic!("unexpected tree: {:?}", other),
        }
    }

    #[test]
    fn noise_kinds_have_zero_frequency() {
        assert_eq!(OscillatorKind::Sine(440.0).frequency(), 440.0);
        assert_eq!(OscillatorKind::WhiteNoise.frequency(), 0.0);
        assert_eq!(OscillatorKind::PinkNoise.frequency(), 0.0);
        assert_eq!(OscillatorKind::BrownNoise.frequency(), 0.0);
    }
}
