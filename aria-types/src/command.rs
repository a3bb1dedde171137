//! Engine commands: the imperative messages the reconciler emits.
//!
//! Commands are the wire protocol to the engine. Within a tick the
//! reconciler guarantees oscillator commands precede sound commands, and
//! stop/mutate commands for existing node groups precede starts for new
//! ones. The engine executes them in order.

use serde::{Deserialize, Serialize};

use crate::instance::{OscillatorInstance, SoundInstance};
use crate::tree::{LoopConfig, VolumePoint};
use crate::{NodeGroupId, RequestId};

/// One imperative message to the engine. Every command targets a node
/// group that is either created by this batch or live at the moment the
/// command is processed.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ── Lifecycle ─────────────────────────────────────────────────
    StartSound {
        node_group_id: NodeGroupId,
        sound: SoundInstance,
    },
    StartOscillator {
        node_group_id: NodeGroupId,
        oscillator: OscillatorInstance,
    },
    /// Stops a sound or an oscillator; node groups of either kind are
    /// released with the same command.
    StopSound { node_group_id: NodeGroupId },

    // ── Targeted mutations ────────────────────────────────────────
    SetVolume {
        node_group_id: NodeGroupId,
        volume: f32,
    },
    SetVolumeAt {
        node_group_id: NodeGroupId,
        timelines: Vec<Vec<VolumePoint>>,
    },
    SetLoopConfig {
        node_group_id: NodeGroupId,
        loop_config: Option<LoopConfig>,
    },
    SetPlaybackRate {
        node_group_id: NodeGroupId,
        playback_rate: f32,
    },
}

impl Command {
    /// The node group this command targets.
    pub fn node_group_id(&self) -> NodeGroupId {
        match self {
            Command::StartSound { node_group_id, .. }
            | Command::StartOscillator { node_group_id, .. }
            | Command::StopSound { node_group_id }
            | Command::SetVolume { node_group_id, .. }
            | Command::SetVolumeAt { node_group_id, .. }
            | Command::SetLoopConfig { node_group_id, .. }
            | Command::SetPlaybackRate { node_group_id, .. } => *node_group_id,
        }
    }
}

/// Request for the engine to fetch and decode a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadRequest {
    pub audio_url: String,
    pub request_id: RequestId,
}

/// One tick's worth of outgoing traffic: the reconciler's command list plus
/// any load requests registered during the tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutgoingMessage {
    pub audio: Vec<Command>,
    pub audio_cmds: Vec<LoadRequest>,
}

impl OutgoingMessage {
    pub fn is_empty(&self) -> bool {
        self.audio.is_empty() && self.audio_cmds.is_empty()
    }
}
