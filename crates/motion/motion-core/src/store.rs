//! Sparse ordered keyframe storage.
//!
//! One generic container replaces the original per-channel sort/find
//! duplication: the key type carries the total order (frame index ascending,
//! name tie-break for the name-partitioned channels), and a single `Keyed`
//! accessor trait parameterizes everything else.

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::error::MotionError;
use crate::frame::FrameIndex;
use crate::keyframe::NamedKey;

/// Access to the store key of a keyframe value. The key is derived from the
/// keyframe itself; relocation updates the frame index and re-inserts.
pub trait Keyed {
    type Key: Ord + Clone + std::fmt::Debug;

    fn key(&self) -> Self::Key;
    fn frame_index(&self) -> FrameIndex;
    fn set_frame_index(&mut self, value: FrameIndex);
}

/// Sparse associative container for one channel's keyframes.
#[derive(Clone, Debug)]
pub struct KeyframeStore<T: Keyed> {
    entries: BTreeMap<T::Key, T>,
}

impl<T: Keyed> Default for KeyframeStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Keyed> KeyframeStore<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert a keyframe, rejecting duplicates. Overwriting is a distinct,
    /// explicit operation (`replace`).
    pub fn insert(&mut self, keyframe: T) -> Result<(), MotionError> {
        match self.entries.entry(keyframe.key()) {
            std::collections::btree_map::Entry::Occupied(_) => Err(MotionError::AlreadyExists),
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(keyframe);
                Ok(())
            }
        }
    }

    /// Insert or overwrite, returning the previous keyframe if any.
    pub fn replace(&mut self, keyframe: T) -> Option<T> {
        self.entries.insert(keyframe.key(), keyframe)
    }

    pub fn find(&self, key: &T::Key) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn find_mut(&mut self, key: &T::Key) -> Option<&mut T> {
        self.entries.get_mut(key)
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &T::Key) -> Option<T> {
        self.entries.remove(key)
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Keyframes in ascending key order (frame index, then name).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn iter_descending(&self) -> impl Iterator<Item = &T> {
        self.entries.values().rev()
    }

    /// Highest occupied frame index, `None` when empty.
    pub fn max_frame_index(&self) -> Option<FrameIndex> {
        self.entries.values().next_back().map(|k| k.frame_index())
    }
}

impl<T: Keyed<Key = FrameIndex>> KeyframeStore<T> {
    /// Nearest keyframe at-or-before and nearest strictly-after the query
    /// frame; either side may be absent.
    pub fn search_closest(&self, frame_index: FrameIndex) -> (Option<&T>, Option<&T>) {
        let prev = self.entries.range(..=frame_index).next_back().map(|(_, v)| v);
        let next = self
            .entries
            .range((Bound::Excluded(frame_index), Bound::Unbounded))
            .next()
            .map(|(_, v)| v);
        (prev, next)
    }
}

impl<T: Keyed<Key = NamedKey>> KeyframeStore<T> {
    /// Per-name closest-pair search. The frame-primary key order interleaves
    /// names, so this walks the channel; keyframe counts per motion keep that
    /// acceptable.
    pub fn search_closest_named(
        &self,
        name: &str,
        frame_index: FrameIndex,
    ) -> (Option<&T>, Option<&T>) {
        let mut prev: Option<&T> = None;
        let mut next: Option<&T> = None;
        for ((frame, key_name), keyframe) in &self.entries {
            if key_name.as_str() != name {
                continue;
            }
            if *frame <= frame_index {
                prev = Some(keyframe);
            } else {
                next = Some(keyframe);
                break;
            }
        }
        (prev, next)
    }

    /// Distinct names present in this channel, in first-seen (frame) order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for (_, key_name) in self.entries.keys() {
            if !names.iter().any(|n| n == key_name) {
                names.push(key_name.clone());
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::{BoneKeyframe, LightKeyframe};

    #[test]
    fn insert_rejects_duplicates() {
        let mut store = KeyframeStore::new();
        store.insert(LightKeyframe::new(4)).unwrap();
        assert_eq!(
            store.insert(LightKeyframe::new(4)),
            Err(MotionError::AlreadyExists)
        );
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn iteration_orders_by_frame_then_name() {
        let mut store = KeyframeStore::new();
        store.insert(BoneKeyframe::new("b", 10)).unwrap();
        store.insert(BoneKeyframe::new("a", 10)).unwrap();
        store.insert(BoneKeyframe::new("c", 2)).unwrap();
        let keys: Vec<_> = store.iter().map(|k| (k.frame_index, k.name.clone())).collect();
        assert_eq!(
            keys,
            vec![
                (2, "c".to_string()),
                (10, "a".to_string()),
                (10, "b".to_string())
            ]
        );
        let reversed: Vec<_> = store.iter_descending().map(|k| k.frame_index).collect();
        assert_eq!(reversed, vec![10, 10, 2]);
    }

    #[test]
    fn closest_pair_straddles_query() {
        let mut store = KeyframeStore::new();
        for frame in [0u32, 10, 20] {
            store.insert(LightKeyframe::new(frame)).unwrap();
        }
        let (prev, next) = store.search_closest(12);
        assert_eq!(prev.map(|k| k.frame_index), Some(10));
        assert_eq!(next.map(|k| k.frame_index), Some(20));
        let (prev, next) = store.search_closest(25);
        assert_eq!(prev.map(|k| k.frame_index), Some(20));
        assert!(next.is_none());
    }

    #[test]
    fn named_search_ignores_other_names() {
        let mut store = KeyframeStore::new();
        store.insert(BoneKeyframe::new("arm", 0)).unwrap();
        store.insert(BoneKeyframe::new("leg", 5)).unwrap();
        store.insert(BoneKeyframe::new("arm", 30)).unwrap();
        let (prev, next) = store.search_closest_named("arm", 10);
        assert_eq!(prev.map(|k| k.frame_index), Some(0));
        assert_eq!(next.map(|k| k.frame_index), Some(30));
    }
}
