//! Non-destructive time rescaling.
//!
//! Relocates every keyframe in a contiguous frame range by a scale factor.
//! Expansion walks the range descending so not-yet-moved keyframes are never
//! clobbered; contraction walks ascending and probes forward past occupied
//! destination slots. Rescaling is lossy: integer rounding means
//! `scale(s)` then `scale(1/s)` need not reproduce the original frames.

use log::warn;

use crate::frame::FrameIndex;
use crate::keyframe::NamedKey;
use crate::store::{Keyed, KeyframeStore};

/// `from + round((i - from) * scale)`, or `None` when the result leaves the
/// frame domain.
fn scaled_destination(from: FrameIndex, i: FrameIndex, scale_factor: f32) -> Option<FrameIndex> {
    let dest = f64::from(from) + (f64::from(i - from) * f64::from(scale_factor)).round();
    (dest <= f64::from(FrameIndex::MAX)).then(|| dest as FrameIndex)
}

/// First unoccupied slot at or after `dest`. Termination holds because every
/// probe strictly increases the candidate and the domain is bounded; `None`
/// means the domain ran out.
fn probe_free_slot<T: Keyed>(
    store: &KeyframeStore<T>,
    mut key: T::Key,
    advance: impl Fn(&T::Key) -> Option<T::Key>,
) -> Option<T::Key> {
    loop {
        if !store.contains(&key) {
            return Some(key);
        }
        key = advance(&key)?;
    }
}

pub(crate) fn scale_frame_channel<T: Keyed<Key = FrameIndex>>(
    store: &mut KeyframeStore<T>,
    from: FrameIndex,
    to: FrameIndex,
    scale_factor: f32,
) {
    if from >= to || !(scale_factor > 0.0) {
        return;
    }
    if scale_factor > 1.0 {
        let mut i = to;
        while i > from {
            if let Some(mut keyframe) = store.remove(&i) {
                match scaled_destination(from, i, scale_factor) {
                    Some(dest) => {
                        keyframe.set_frame_index(dest);
                        store.replace(keyframe);
                    }
                    None => warn!("time scale dropped keyframe at {i}: destination out of range"),
                }
            }
            i -= 1;
        }
    } else if scale_factor < 1.0 {
        let start_from = from + 1;
        for i in start_from..=to {
            let Some(dest) = scaled_destination(from, i, scale_factor) else {
                continue;
            };
            if dest == start_from {
                continue;
            }
            if let Some(mut keyframe) = store.remove(&i) {
                match probe_free_slot(store, dest, |k| k.checked_add(1)) {
                    Some(slot) => {
                        keyframe.set_frame_index(slot);
                        let _ = store.insert(keyframe);
                    }
                    None => warn!("time scale dropped keyframe at {i}: no free destination slot"),
                }
            }
        }
    }
}

pub(crate) fn scale_named_channel<T: Keyed<Key = NamedKey>>(
    store: &mut KeyframeStore<T>,
    names: &[String],
    from: FrameIndex,
    to: FrameIndex,
    scale_factor: f32,
) {
    if from >= to || !(scale_factor > 0.0) {
        return;
    }
    if scale_factor > 1.0 {
        let mut i = to;
        while i > from {
            for name in names {
                if let Some(mut keyframe) = store.remove(&(i, name.clone())) {
                    match scaled_destination(from, i, scale_factor) {
                        Some(dest) => {
                            keyframe.set_frame_index(dest);
                            store.replace(keyframe);
                        }
                        None => {
                            warn!("time scale dropped keyframe '{name}'@{i}: destination out of range")
                        }
                    }
                }
            }
            i -= 1;
        }
    } else if scale_factor < 1.0 {
        let start_from = from + 1;
        for i in start_from..=to {
            let Some(dest) = scaled_destination(from, i, scale_factor) else {
                continue;
            };
            if dest == start_from {
                continue;
            }
            for name in names {
                if let Some(mut keyframe) = store.remove(&(i, name.clone())) {
                    let advance = |key: &NamedKey| {
                        key.0.checked_add(1).map(|frame| (frame, key.1.clone()))
                    };
                    match probe_free_slot(store, (dest, name.clone()), advance) {
                        Some((slot, _)) => {
                            keyframe.set_frame_index(slot);
                            let _ = store.insert(keyframe);
                        }
                        None => {
                            warn!("time scale dropped keyframe '{name}'@{i}: no free destination slot")
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::{LightKeyframe, MorphKeyframe};

    fn light_store(frames: &[FrameIndex]) -> KeyframeStore<LightKeyframe> {
        let mut store = KeyframeStore::new();
        for &frame in frames {
            store.insert(LightKeyframe::new(frame)).unwrap();
        }
        store
    }

    #[test]
    fn expansion_moves_keyframes_outward() {
        let mut store = light_store(&[0, 25, 50, 100]);
        scale_frame_channel(&mut store, 0, 100, 2.0);
        let frames: Vec<_> = store.iter().map(|k| k.frame_index).collect();
        assert_eq!(frames, vec![0, 50, 100, 200]);
    }

    #[test]
    fn contraction_moves_keyframes_inward() {
        let mut store = light_store(&[0, 50, 100]);
        scale_frame_channel(&mut store, 0, 100, 0.5);
        let frames: Vec<_> = store.iter().map(|k| k.frame_index).collect();
        assert_eq!(frames, vec![0, 25, 50]);
    }

    #[test]
    fn contraction_probes_past_collisions() {
        // 10 and 11 both land on 4; the second probes forward to 5.
        let mut store = light_store(&[10, 11]);
        scale_frame_channel(&mut store, 0, 20, 0.4);
        let frames: Vec<_> = store.iter().map(|k| k.frame_index).collect();
        assert_eq!(frames, vec![4, 5]);
    }

    #[test]
    fn named_scale_only_touches_listed_names() {
        let mut store = KeyframeStore::new();
        store.insert(MorphKeyframe::new("smile", 50)).unwrap();
        store.insert(MorphKeyframe::new("blink", 50)).unwrap();
        scale_named_channel(&mut store, &["smile".to_string()], 0, 100, 2.0);
        assert!(store.contains(&(100, "smile".to_string())));
        assert!(store.contains(&(50, "blink".to_string())));
    }
}
