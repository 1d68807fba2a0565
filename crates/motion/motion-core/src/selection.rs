//! Keyframe selection state and its durable snapshot.
//!
//! Selection is channel-partitioned and stores plain keys (frame index, plus
//! name for bone/morph) rather than references into the stores, so a snapshot
//! survives a destructive reload and restore simply re-resolves each tuple,
//! silently dropping the ones that no longer exist.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::frame::FrameIndex;
use crate::keyframe::{Channel, ChannelMask, NamedKey};

/// Live selection of a motion's keyframes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionSet {
    accessory: BTreeSet<FrameIndex>,
    bone: BTreeSet<NamedKey>,
    camera: BTreeSet<FrameIndex>,
    light: BTreeSet<FrameIndex>,
    model: BTreeSet<FrameIndex>,
    morph: BTreeSet<NamedKey>,
    self_shadow: BTreeSet<FrameIndex>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn frame_set(&self, channel: Channel) -> Option<&BTreeSet<FrameIndex>> {
        match channel {
            Channel::Accessory => Some(&self.accessory),
            Channel::Camera => Some(&self.camera),
            Channel::Light => Some(&self.light),
            Channel::Model => Some(&self.model),
            Channel::SelfShadow => Some(&self.self_shadow),
            Channel::Bone | Channel::Morph => None,
        }
    }

    fn frame_set_mut(&mut self, channel: Channel) -> Option<&mut BTreeSet<FrameIndex>> {
        match channel {
            Channel::Accessory => Some(&mut self.accessory),
            Channel::Camera => Some(&mut self.camera),
            Channel::Light => Some(&mut self.light),
            Channel::Model => Some(&mut self.model),
            Channel::SelfShadow => Some(&mut self.self_shadow),
            Channel::Bone | Channel::Morph => None,
        }
    }

    /// Select one keyframe of a frame-keyed channel. Bone/morph go through
    /// [`SelectionSet::add_named`].
    pub fn add_frame(&mut self, channel: Channel, frame_index: FrameIndex) {
        if let Some(set) = self.frame_set_mut(channel) {
            set.insert(frame_index);
        }
    }

    pub fn remove_frame(&mut self, channel: Channel, frame_index: FrameIndex) {
        if let Some(set) = self.frame_set_mut(channel) {
            set.remove(&frame_index);
        }
    }

    pub fn contains_frame(&self, channel: Channel, frame_index: FrameIndex) -> bool {
        self.frame_set(channel)
            .map(|set| set.contains(&frame_index))
            .unwrap_or(false)
    }

    fn named_set_mut(&mut self, channel: Channel) -> Option<&mut BTreeSet<NamedKey>> {
        match channel {
            Channel::Bone => Some(&mut self.bone),
            Channel::Morph => Some(&mut self.morph),
            _ => None,
        }
    }

    /// Select one keyframe of a name-partitioned channel (bone, morph).
    pub fn add_named(&mut self, channel: Channel, name: &str, frame_index: FrameIndex) {
        if let Some(set) = self.named_set_mut(channel) {
            set.insert((frame_index, name.to_string()));
        }
    }

    pub fn remove_named(&mut self, channel: Channel, name: &str, frame_index: FrameIndex) {
        if let Some(set) = self.named_set_mut(channel) {
            set.remove(&(frame_index, name.to_string()));
        }
    }

    pub fn contains_named(&self, channel: Channel, name: &str, frame_index: FrameIndex) -> bool {
        let set = match channel {
            Channel::Bone => &self.bone,
            Channel::Morph => &self.morph,
            _ => return false,
        };
        set.contains(&(frame_index, name.to_string()))
    }

    /// Selected frames of a frame-keyed channel, ascending.
    pub fn frames(&self, channel: Channel) -> impl Iterator<Item = FrameIndex> + '_ {
        self.frame_set(channel).into_iter().flatten().copied()
    }

    /// Selected (frame, name) keys of a name-partitioned channel, ascending by
    /// frame then name.
    pub fn named_keys(&self, channel: Channel) -> impl Iterator<Item = &NamedKey> + '_ {
        let set = match channel {
            Channel::Bone => Some(&self.bone),
            Channel::Morph => Some(&self.morph),
            _ => None,
        };
        set.into_iter().flatten()
    }

    /// Earliest selected frame of a channel, used by copy/paste to zero-base
    /// pasted keyframes.
    pub fn first_selected_frame(&self, channel: Channel) -> Option<FrameIndex> {
        match channel {
            Channel::Bone => self.bone.iter().next().map(|(frame, _)| *frame),
            Channel::Morph => self.morph.iter().next().map(|(frame, _)| *frame),
            _ => self
                .frame_set(channel)
                .and_then(|set| set.iter().next().copied()),
        }
    }

    pub fn count(&self, channel: Channel) -> usize {
        match channel {
            Channel::Bone => self.bone.len(),
            Channel::Morph => self.morph.len(),
            _ => self.frame_set(channel).map(BTreeSet::len).unwrap_or(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        Channel::ALL.iter().all(|&c| self.count(c) == 0)
    }

    /// Deselect every keyframe of the masked channels.
    pub fn clear(&mut self, mask: ChannelMask) {
        if mask.contains(Channel::Accessory) {
            self.accessory.clear();
        }
        if mask.contains(Channel::Bone) {
            self.bone.clear();
        }
        if mask.contains(Channel::Camera) {
            self.camera.clear();
        }
        if mask.contains(Channel::Light) {
            self.light.clear();
        }
        if mask.contains(Channel::Model) {
            self.model.clear();
        }
        if mask.contains(Channel::Morph) {
            self.morph.clear();
        }
        if mask.contains(Channel::SelfShadow) {
            self.self_shadow.clear();
        }
    }

    /// Durable copy of the current selection, decoupled from the stores.
    pub fn save_snapshot(&self) -> SelectionSnapshot {
        let mut snapshot = SelectionSnapshot {
            accessory: self.accessory.clone(),
            camera: self.camera.clone(),
            light: self.light.clone(),
            model: self.model.clone(),
            self_shadow: self.self_shadow.clone(),
            ..SelectionSnapshot::default()
        };
        for (frame, name) in &self.bone {
            snapshot.bone.entry(name.clone()).or_default().insert(*frame);
        }
        for (frame, name) in &self.morph {
            snapshot
                .morph
                .entry(name.clone())
                .or_default()
                .insert(*frame);
        }
        snapshot
    }
}

/// Per-channel selected key tuples, persistable across a destructive reload.
/// Restoring re-resolves against the motion's stores; see
/// `Motion::restore_selection_snapshot`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    pub accessory: BTreeSet<FrameIndex>,
    pub bone: BTreeMap<String, BTreeSet<FrameIndex>>,
    pub camera: BTreeSet<FrameIndex>,
    pub light: BTreeSet<FrameIndex>,
    pub model: BTreeSet<FrameIndex>,
    pub morph: BTreeMap<String, BTreeSet<FrameIndex>>,
    pub self_shadow: BTreeSet<FrameIndex>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_masks_clear_independently() {
        let mut selection = SelectionSet::new();
        selection.add_frame(Channel::Camera, 3);
        selection.add_named(Channel::Bone, "arm", 5);
        selection.clear(ChannelMask::CAMERA);
        assert!(!selection.contains_frame(Channel::Camera, 3));
        assert!(selection.contains_named(Channel::Bone, "arm", 5));
        selection.clear(ChannelMask::ALL);
        assert!(selection.is_empty());
    }

    #[test]
    fn first_selected_frame_is_minimum() {
        let mut selection = SelectionSet::new();
        selection.add_named(Channel::Morph, "smile", 20);
        selection.add_named(Channel::Morph, "blink", 7);
        assert_eq!(selection.first_selected_frame(Channel::Morph), Some(7));
        assert_eq!(selection.first_selected_frame(Channel::Light), None);
    }

    #[test]
    fn snapshot_groups_named_keys_by_name() {
        let mut selection = SelectionSet::new();
        selection.add_named(Channel::Bone, "arm", 1);
        selection.add_named(Channel::Bone, "arm", 9);
        selection.add_frame(Channel::Model, 4);
        let snapshot = selection.save_snapshot();
        assert_eq!(snapshot.bone["arm"].len(), 2);
        assert!(snapshot.model.contains(&4));
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: SelectionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
