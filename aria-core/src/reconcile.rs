//! Diffs the previous flattened state against a new declaration and emits
//! the minimal command sequence that brings the engine in line.
//!
//! The reconciler owns the only long-lived mutable state in the system:
//! which node groups are live and what the engine believes about each.
//! Reconciling the same declaration twice in a row emits nothing, and a
//! sound whose identity survives a state change keeps its node group, so
//! a fade never restarts a song.

use std::collections::BTreeMap;

use aria_types::{Audio, Command, NodeGroupId, OscillatorInstance, SoundInstance};

use crate::flatten::{flatten, Flattened};

/// Live node groups and the monotonic id counter.
///
/// Both maps are keyed by [`NodeGroupId`]; ids come from a shared counter
/// and are never reused, so the two key sets stay disjoint and ascending
/// key order equals insertion order.
#[derive(Debug, Clone, Default)]
pub struct ReconcilerState {
    sounds: BTreeMap<NodeGroupId, SoundInstance>,
    oscillators: BTreeMap<NodeGroupId, OscillatorInstance>,
    node_group_counter: u32,
}

impl ReconcilerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diff the live state against a new declaration. After the caller
    /// delivers the returned commands, the engine's playing set matches
    /// the declaration.
    ///
    /// Command order is part of the engine contract: oscillator commands
    /// precede sound commands, and within each category stop/mutate
    /// commands for existing groups (in ascending id order) precede starts
    /// for new groups (in declaration order). Fresh oscillator ids are
    /// allocated before fresh sound ids.
    pub fn reconcile(&mut self, tree: &Audio) -> Vec<Command> {
        let Flattened {
            sounds,
            oscillators,
        } = flatten(tree);

        let mut commands = self.reconcile_oscillators(oscillators);
        commands.extend(self.reconcile_sounds(sounds));
        commands
    }

    /// Node groups currently believed to be playing a buffer.
    pub fn live_sounds(&self) -> impl Iterator<Item = (NodeGroupId, &SoundInstance)> {
        self.sounds.iter().map(|(&id, sound)| (id, sound))
    }

    /// Node groups currently believed to be running an oscillator.
    pub fn live_oscillators(&self) -> impl Iterator<Item = (NodeGroupId, &OscillatorInstance)> {
        self.oscillators.iter().map(|(&id, osc)| (id, osc))
    }

    /// Total number of live node groups.
    pub fn live_count(&self) -> usize {
        self.sounds.len() + self.oscillators.len()
    }

    /// Next id the counter would hand out. Strictly greater than every id
    /// ever used.
    pub fn node_group_counter(&self) -> u32 {
        self.node_group_counter
    }

    fn next_node_group_id(&mut self) -> NodeGroupId {
        let id = NodeGroupId::new(self.node_group_counter);
        self.node_group_counter += 1;
        id
    }

    fn reconcile_sounds(&mut self, mut incoming: Vec<SoundInstance>) -> Vec<Command> {
        let mut commands = Vec::new();
        let mut replaced: Vec<(NodeGroupId, SoundInstance)> = Vec::new();
        let mut stopped: Vec<NodeGroupId> = Vec::new();

        for (&id, old) in &self.sounds {
            if let Some(idx) = incoming.iter().position(|new| new == old) {
                // Perfect match: the engine already does exactly this.
                incoming.remove(idx);
            } else if let Some(idx) = incoming.iter().position(|new| new.same_identity(old)) {
                let new = incoming.remove(idx);
                commands.extend(sound_mutations(id, old, &new));
                replaced.push((id, new));
            } else {
                commands.push(Command::StopSound { node_group_id: id });
                stopped.push(id);
            }
        }

        for (id, new) in replaced {
            self.sounds.insert(id, new);
        }
        for id in stopped {
            self.sounds.remove(&id);
        }

        // Whatever remains in declaration order becomes a fresh node group.
        for sound in incoming {
            let id = self.next_node_group_id();
            log::debug!(target: "audio::reconcile", "starting sound group {} (buffer {})", id, sound.source.buffer_id());
            commands.push(Command::StartSound {
                node_group_id: id,
                sound: sound.clone(),
            });
            self.sounds.insert(id, sound);
        }

        commands
    }

    fn reconcile_oscillators(&mut self, mut incoming: Vec<OscillatorInstance>) -> Vec<Command> {
        let mut commands = Vec::new();
        let mut replaced: Vec<(NodeGroupId, OscillatorInstance)> = Vec::new();
        let mut stopped: Vec<NodeGroupId> = Vec::new();

        for (&id, old) in &self.oscillators {
            if let Some(idx) = incoming.iter().position(|new| new == old) {
                incoming.remove(idx);
            } else if let Some(idx) = incoming.iter().position(|new| new.same_identity(old)) {
                let new = incoming.remove(idx);
                commands.extend(oscillator_mutations(id, old, &new));
                replaced.push((id, new));
            } else {
                commands.push(Command::StopSound { node_group_id: id });
                stopped.push(id);
            }
        }

        for (id, new) in replaced {
            self.oscillators.insert(id, new);
        }
        for id in stopped {
            self.oscillators.remove(&id);
        }

        for oscillator in incoming {
            let id = self.next_node_group_id();
            log::debug!(target: "audio::reconcile", "starting oscillator group {}", id);
            commands.push(Command::StartOscillator {
                node_group_id: id,
                oscillator: oscillator.clone(),
            });
            self.oscillators.insert(id, oscillator);
        }

        commands
    }
}

/// One command per changed mutable field, in the fixed table order:
/// volume, loop, playback rate, volume timelines.
fn sound_mutations(id: NodeGroupId, old: &SoundInstance, new: &SoundInstance) -> Vec<Command> {
    let mut commands = Vec::new();
    if new.volume != old.volume {
        commands.push(Command::SetVolume {
            node_group_id: id,
            volume: new.volume,
        });
    }
    if new.loop_config != old.loop_config {
        commands.push(Command::SetLoopConfig {
            node_group_id: id,
            loop_config: new.loop_config,
        });
    }
    if new.playback_rate != old.playback_rate {
        commands.push(Command::SetPlaybackRate {
            node_group_id: id,
            playback_rate: new.playback_rate,
        });
    }
    if new.volume_timelines != old.volume_timelines {
        commands.push(Command::SetVolumeAt {
            node_group_id: id,
            timelines: new.volume_timelines.clone(),
        });
    }
    commands
}

fn oscillator_mutations(
    id: NodeGroupId,
    old: &OscillatorInstance,
    new: &OscillatorInstance,
) -> Vec<Command> {
    let mut commands = Vec::new();
    if new.volume != old.volume {
        commands.push(Command::SetVolume {
            node_group_id: id,
            volume: new.volume,
        });
    }
    if new.volume_timelines != old.volume_timelines {
        commands.push(Command::SetVolumeAt {
            node_group_id: id,
            timelines: new.volume_timelines.clone(),
        });
    }
    // No command exists for the waveform itself: identity is the start
    // instant, so a kind change on a matching instant is adopted in the
    // map and the engine keeps the running node.
    if new.kind != old.kind {
        log::debug!(target: "audio::reconcile", "oscillator group {} changed kind without a new start time", id);
    }
    commands
}
