//! Collapses an audio tree into normalized instance lists.
//!
//! Flattening is total and deterministic: it never allocates node group
//! ids (the reconciler's job) and never inspects engine state. Declaration
//! order is preserved so the reconciler's tie-breaking is stable.

use aria_types::{Audio, EffectKind, OscillatorInstance, SoundInstance};

/// Result of collapsing a tree: every sound and oscillator that should be
/// audible, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flattened {
    pub sounds: Vec<SoundInstance>,
    pub oscillators: Vec<OscillatorInstance>,
}

/// Flatten a declaration into its instance lists.
pub fn flatten(tree: &Audio) -> Flattened {
    let mut out = Flattened::default();
    collect(tree, &mut out);
    out
}

fn collect(tree: &Audio, out: &mut Flattened) {
    match tree {
        Audio::Group(children) => {
            for child in children {
                collect(child, out);
            }
        }
        Audio::File {
            source,
            start_time,
            config,
        } => out.sounds.push(SoundInstance {
            source: *source,
            start_time: *start_time,
            start_at_ms: config.start_at_ms,
            volume: 1.0,
            volume_timelines: Vec::new(),
            loop_config: config.loop_config,
            playback_rate: config.playback_rate,
        }),
        Audio::Oscillator { kind, start_time } => out.oscillators.push(OscillatorInstance {
            kind: *kind,
            start_time: *start_time,
            volume: 1.0,
            volume_timelines: Vec::new(),
        }),
        Audio::Effect { kind, inner } => {
            // Remember where this subtree's instances begin so the effect
            // only touches its own descendants.
            let first_sound = out.sounds.len();
            let first_oscillator = out.oscillators.len();
            collect(inner, out);
            match kind {
                EffectKind::ScaleVolume(factor) => {
                    for sound in &mut out.sounds[first_sound..] {
                        sound.volume *= factor;
                    }
                    for oscillator in &mut out.oscillators[first_oscillator..] {
                        oscillator.volume *= factor;
                    }
                }
                // Inner effects have already pushed their ramps, so
                // appending here keeps timelines in inner-to-outer order.
                EffectKind::ScaleVolumeAt(points) => {
                    for sound in &mut out.sounds[first_sound..] {
                        sound.volume_timelines.push(points.clone());
                    }
                    for oscillator in &mut out.oscillators[first_oscillator..] {
                        oscillator.volume_timelines.push(points.clone());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aria_types::{
        audio, group, scale_volume, scale_volume_at, silence, sine, Source, Timestamp, VolumePoint,
    };

    fn t(ms: i64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    #[test]
    fn silence_flattens_to_nothing() {
        let flat = flatten(&silence());
        assert!(flat.sounds.is_empty());
        assert!(flat.oscillators.is_empty());
    }

    #[test]
    fn file_playback_defaults() {
        let flat = flatten(&audio(Source::new(1), t(100_000)));
        assert_eq!(flat.sounds.len(), 1);
        let sound = &flat.sounds[0];
        assert_eq!(sound.volume, 1.0);
        assert!(sound.volume_timelines.is_empty());
        assert_eq!(sound.start_at_ms, 0.0);
        assert_eq!(sound.playback_rate, 1.0);
        assert!(sound.loop_config.is_none());
    }

    #[test]
    fn group_order_is_declaration_order() {
        let flat = flatten(&group(vec![
            audio(Source::new(1), t(10)),
            audio(Source::new(2), t(20)),
            sine(440.0, t(30)),
            audio(Source::new(3), t(30)),
        ]));
        let buffers: Vec<u32> = flat.sounds.iter().map(|s| s.source.buffer_id()).collect();
        assert_eq!(buffers, vec![1, 2, 3]);
        assert_eq!(flat.oscillators.len(), 1);
    }

    #[test]
    fn nested_scale_volume_multiplies() {
        let tree = scale_volume(0.5, scale_volume(0.5, audio(Source::new(1), t(0))));
        let flat = flatten(&tree);
        assert_eq!(flat.sounds[0].volume, 0.25);
    }

    #[test]
    fn scale_volume_applies_to_oscillators_too() {
        let tree = scale_volume(0.25, sine(440.0, t(0)));
        let flat = flatten(&tree);
        assert_eq!(flat.oscillators[0].volume, 0.25);
    }

    #[test]
    fn scale_volume_zero_keeps_the_instance() {
        let tree = scale_volume(0.0, audio(Source::new(1), t(0)));
        let flat = flatten(&tree);
        assert_eq!(flat.sounds.len(), 1);
        assert_eq!(flat.sounds[0].volume, 0.0);
    }

    #[test]
    fn effect_only_touches_its_own_subtree() {
        let tree = group(vec![
            audio(Source::new(1), t(0)),
            scale_volume(0.5, audio(Source::new(2), t(0))),
        ]);
        let flat = flatten(&tree);
        assert_eq!(flat.sounds[0].volume, 1.0);
        assert_eq!(flat.sounds[1].volume, 0.5);
    }

    #[test]
    fn nested_timelines_stack_innermost_first() {
        let inner = vec![VolumePoint {
            time: t(1_000),
            volume: 0.1,
        }];
        let outer = vec![VolumePoint {
            time: t(2_000),
            volume: 0.9,
        }];
        let tree = scale_volume_at(
            outer.clone(),
            scale_volume_at(inner.clone(), audio(Source::new(1), t(0))),
        );
        let flat = flatten(&tree);
        assert_eq!(flat.sounds[0].volume_timelines, vec![inner, outer]);
    }

    #[test]
    fn flatten_is_deterministic() {
        let tree = group(vec![
            scale_volume(0.7, group(vec![sine(220.0, t(5)), audio(Source::new(9), t(5))])),
            audio(Source::new(1), t(6)),
        ]);
        assert_eq!(flatten(&tree), flatten(&tree));
    }
}
