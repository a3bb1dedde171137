//! Flattened instances: normalized records for one running sound or
//! oscillator after groups and effects have been collapsed.
//!
//! These records are both the flattener's output and the reconciler's unit
//! of diffing. Field-wise equality drives the perfect-match shortcut;
//! `same_identity` decides whether two records describe the same running
//! thing even when mutable fields differ.

use serde::{Deserialize, Serialize};

use crate::tree::{LoopConfig, OscillatorKind, VolumePoint};
use crate::{Source, Timestamp};

/// One file-backed sound that should currently be audible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundInstance {
    pub source: Source,
    pub start_time: Timestamp,
    /// Offset into the buffer at which playback begins, in milliseconds.
    pub start_at_ms: f64,
    /// Product of every enclosing ScaleVolume factor.
    pub volume: f32,
    /// Enclosing ScaleVolumeAt ramps, innermost first.
    pub volume_timelines: Vec<Vec<VolumePoint>>,
    pub loop_config: Option<LoopConfig>,
    pub playback_rate: f32,
}

impl SoundInstance {
    /// Two records describe "the same sound" when they play the same buffer
    /// from the same offset starting at the same instant. Volume, loop and
    /// rate changes do not change identity, so a fade never restarts a song.
    pub fn same_identity(&self, other: &Self) -> bool {
        self.source == other.source
            && self.start_time == other.start_time
            && self.start_at_ms == other.start_at_ms
    }
}

/// One oscillator that should currently be audible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OscillatorInstance {
    pub kind: OscillatorKind,
    pub start_time: Timestamp,
    pub volume: f32,
    pub volume_timelines: Vec<Vec<VolumePoint>>,
}

impl OscillatorInstance {
    /// Oscillator identity is the start instant alone: two oscillators
    /// started at the exact same instant are not individually
    /// distinguishable.
    pub fn same_identity(&self, other: &Self) -> bool {
        self.start_time == other.start_time
    }
}
