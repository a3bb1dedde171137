//! # aria-types
//!
//! Shared type definitions for the aria declarative audio runtime.
//! This crate contains the data structures used across aria-core and
//! aria-wire: the declarative audio tree, the flattened instance records
//! the reconciler diffs, the engine command set, and the events the engine
//! reports back.

pub mod command;
mod error;
pub mod event;
pub mod instance;
pub mod tree;

pub use command::{Command, LoadRequest, OutgoingMessage};
pub use error::LoadError;
pub use event::EngineEvent;
pub use instance::{OscillatorInstance, SoundInstance};
pub use tree::{
    audio, audio_with_config, brown_noise, group, pink_noise, sawtooth, scale_volume,
    scale_volume_at, silence, sine, square, triangle, white_noise, Audio, EffectKind, LoopConfig,
    OscillatorKind, PlaybackConfig, VolumePoint,
};

/// Unique identifier for a decoded audio buffer, assigned by the engine
/// when a load completes.
pub type BufferId = u32;

/// Unique identifier for an in-flight load request, assigned by the load
/// tracker.
pub type RequestId = u32;

/// Newtype for node group identifiers: the stable handle for one running
/// sound or oscillator across ticks. Ids are allocated from a monotonic
/// counter and never reused, so ascending id order is insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct NodeGroupId(u32);

impl NodeGroupId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Extract the raw u32 value.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeGroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wall-clock instant in milliseconds since the Unix epoch. Opaque to the
/// core: timestamps are compared and serialized, never computed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub fn millis(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Opaque handle to a decoded audio buffer.
///
/// Hosts are expected to take sources from successful load callbacks,
/// which is where the engine reports the buffer ids it knows about. The
/// constructors accept a raw id, so nothing stops a caller fabricating a
/// handle for a buffer the engine never loaded; declaring such a source is
/// a host bug, not something this type can rule out. Equality and hashing
/// consider the buffer id alone; the duration is load-time metadata and
/// must never split an identity match.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Source {
    buffer_id: BufferId,
    duration_secs: Option<f64>,
}

impl Source {
    pub fn new(buffer_id: BufferId) -> Self {
        Self {
            buffer_id,
            duration_secs: None,
        }
    }

    pub fn with_duration(buffer_id: BufferId, duration_secs: f64) -> Self {
        Self {
            buffer_id,
            duration_secs: Some(duration_secs),
        }
    }

    pub fn buffer_id(self) -> BufferId {
        self.buffer_id
    }

    /// Decoded buffer length reported by the engine at load time, if known.
    pub fn duration_secs(self) -> Option<f64> {
        self.duration_secs
    }
}

impl PartialEq for Source {
    fn eq(&self, other: &Self) -> bool {
        self.buffer_id == other.buffer_id
    }
}

impl Eq for Source {}

impl std::hash::Hash for Source {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.buffer_id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_equality_ignores_duration_metadata() {
        let bare = Source::new(7);
        let with_meta = Source::with_duration(7, 123.0);
        assert_eq!(bare, with_meta);

        let other = Source::new(8);
        assert_ne!(bare, other);
    }

    #[test]
    fn node_group_id_is_transparent_in_json() {
        let id = NodeGroupId::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
    }

    #[test]
    fn timestamp_is_transparent_in_json() {
        let t = Timestamp::from_millis(100_000);
        assert_eq!(serde_json::to_string(&t).unwrap(), "100000");
        let back: Timestamp = serde_json::from_str("100000").unwrap();
        assert_eq!(back, t);
    }
}
