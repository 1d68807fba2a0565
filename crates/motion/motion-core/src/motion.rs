//! Motion facade.
//!
//! A motion owns exactly seven keyframe stores, one bezier-curve cache, one
//! selection set, an annotation map, and format/dirty state. The owning
//! context creates it empty, populates it through the programmatic API or an
//! external codec, and serializes all access; nothing here is internally
//! concurrent.

use hashbrown::HashMap;

use crate::codec::{MotionCodec, MotionFormat};
use crate::curve::BezierCurveCache;
use crate::error::MotionError;
use crate::frame::{add_frame_index_delta, FrameIndex, MAX_DURATION};
use crate::interp::{self, CameraPose};
use crate::keyframe::{
    AccessoryKeyframe, BoneKeyframe, CameraKeyframe, Channel, ChannelMask, CurvePoints,
    LightKeyframe, ModelKeyframe, MorphKeyframe, NamedKey, SelfShadowKeyframe,
};
use crate::merge::merge_motions;
use crate::model::ModelObjects;
use crate::remap::{scale_frame_channel, scale_named_channel};
use crate::selection::{SelectionSet, SelectionSnapshot};
use crate::store::{Keyed, KeyframeStore};

/// Multiply-then-add correction applied to a scalar property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Correction {
    pub mul: f32,
    pub add: f32,
}

impl Default for Correction {
    fn default() -> Self {
        Self { mul: 1.0, add: 0.0 }
    }
}

/// Component-wise multiply-then-add correction for a vector property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VectorCorrection {
    pub mul: [f32; 3],
    pub add: [f32; 3],
}

impl Default for VectorCorrection {
    fn default() -> Self {
        Self {
            mul: [1.0; 3],
            add: [0.0; 3],
        }
    }
}

#[inline]
fn correct_vec3(value: [f32; 3], factor: &VectorCorrection) -> [f32; 3] {
    [
        value[0] * factor.mul[0] + factor.add[0],
        value[1] * factor.mul[1] + factor.add[1],
        value[2] * factor.mul[2] + factor.add[2],
    ]
}

fn copy_channel<T: Keyed + Clone>(
    source: &KeyframeStore<T>,
    dest: &mut KeyframeStore<T>,
    offset: i32,
    keep: impl Fn(&T) -> bool,
) {
    for keyframe in source.iter() {
        if !keep(keyframe) {
            continue;
        }
        // An offset that pushes the keyframe out of the frame domain drops
        // just that keyframe, never the batch.
        let Some(frame_index) = add_frame_index_delta(offset, keyframe.frame_index()) else {
            continue;
        };
        let mut copy = keyframe.clone();
        copy.set_frame_index(frame_index);
        let _ = dest.insert(copy);
    }
}

/// Sparse multi-channel keyframe timeline.
pub struct Motion {
    pub(crate) accessory: KeyframeStore<AccessoryKeyframe>,
    pub(crate) bone: KeyframeStore<BoneKeyframe>,
    pub(crate) camera: KeyframeStore<CameraKeyframe>,
    pub(crate) light: KeyframeStore<LightKeyframe>,
    pub(crate) model: KeyframeStore<ModelKeyframe>,
    pub(crate) morph: KeyframeStore<MorphKeyframe>,
    pub(crate) self_shadow: KeyframeStore<SelfShadowKeyframe>,
    curves: BezierCurveCache,
    selection: SelectionSet,
    annotations: HashMap<String, String>,
    format: MotionFormat,
    handle: u16,
    dirty: bool,
}

impl Motion {
    /// Create an empty motion owned by the context that assigned `handle`.
    pub fn new(handle: u16) -> Self {
        Self {
            accessory: KeyframeStore::new(),
            bone: KeyframeStore::new(),
            camera: KeyframeStore::new(),
            light: KeyframeStore::new(),
            model: KeyframeStore::new(),
            morph: KeyframeStore::new(),
            self_shadow: KeyframeStore::new(),
            curves: BezierCurveCache::new(),
            selection: SelectionSet::new(),
            annotations: HashMap::new(),
            format: MotionFormat::default(),
            handle,
            dirty: false,
        }
    }

    pub fn handle(&self) -> u16 {
        self.handle
    }

    pub fn format(&self) -> MotionFormat {
        self.format
    }

    pub fn set_format(&mut self, value: MotionFormat) {
        self.format = value;
    }

    pub fn annotations(&self) -> &HashMap<String, String> {
        &self.annotations
    }

    pub fn set_annotations(&mut self, value: HashMap<String, String>) {
        self.annotations = value;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_dirty(&mut self, value: bool) {
        self.dirty = value;
    }

    /// Rebuild the motion from encoded bytes, shifting every decoded keyframe
    /// by `offset`. A codec failure aborts the whole load and leaves the
    /// previous contents untouched.
    pub fn load(
        &mut self,
        codec: &dyn MotionCodec,
        bytes: &[u8],
        offset: FrameIndex,
    ) -> Result<(), MotionError> {
        let data = codec.decode(bytes, offset)?;
        self.clear_all_keyframes();
        for keyframe in data.accessory_keyframes {
            self.accessory.replace(keyframe);
        }
        for keyframe in data.bone_keyframes {
            self.bone.replace(keyframe);
        }
        for keyframe in data.camera_keyframes {
            self.camera.replace(keyframe);
        }
        for keyframe in data.light_keyframes {
            self.light.replace(keyframe);
        }
        for keyframe in data.model_keyframes {
            self.model.replace(keyframe);
        }
        for keyframe in data.morph_keyframes {
            self.morph.replace(keyframe);
        }
        for keyframe in data.self_shadow_keyframes {
            self.self_shadow.replace(keyframe);
        }
        self.annotations = data.annotations;
        self.format = codec.format();
        self.dirty = false;
        Ok(())
    }

    /// Serialize the masked channels through the codec. Generator annotations
    /// are stamped first, as the original writer did.
    pub fn save(
        &mut self,
        codec: &dyn MotionCodec,
        mask: ChannelMask,
    ) -> Result<Vec<u8>, MotionError> {
        self.annotations
            .insert("generator.name".to_string(), "motion-core".to_string());
        self.annotations.insert(
            "generator.version".to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        );
        Ok(codec.encode(self, mask)?)
    }

    /// Add-only merge: existing destination keyframes always win.
    pub fn merge_all_keyframes(&mut self, source: &Motion) {
        merge_motions(self, source, false, false);
        self.dirty = true;
    }

    /// Override merge: source payloads replace destination keyframes in
    /// place. With `mirror`, bone keyframes whose names carry a left/right
    /// marker additionally produce a sagittal-mirrored counterpart.
    pub fn override_all_keyframes(&mut self, source: &Motion, mirror: bool) {
        merge_motions(self, source, true, mirror);
        self.dirty = true;
    }

    /// Release every store, the curve cache, and the selection, then start
    /// over empty.
    pub fn clear_all_keyframes(&mut self) {
        self.accessory.clear();
        self.bone.clear();
        self.camera.clear();
        self.light.clear();
        self.model.clear();
        self.morph.clear();
        self.self_shadow.clear();
        self.curves.clear();
        self.selection.clear(ChannelMask::ALL);
        self.dirty = false;
    }

    /// Highest occupied frame across all channels, capped at the project-wide
    /// maximum duration.
    pub fn duration(&self) -> FrameIndex {
        self.max_frame_index().min(MAX_DURATION)
    }

    /// Highest occupied frame across all channels, `0` when empty.
    pub fn max_frame_index(&self) -> FrameIndex {
        [
            self.accessory.max_frame_index(),
            self.bone.max_frame_index(),
            self.camera.max_frame_index(),
            self.light.max_frame_index(),
            self.model.max_frame_index(),
            self.morph.max_frame_index(),
            self.self_shadow.max_frame_index(),
        ]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(0)
    }

    pub fn count_all_keyframes(&self) -> usize {
        self.accessory.count()
            + self.bone.count()
            + self.camera.count()
            + self.light.count()
            + self.model.count()
            + self.morph.count()
            + self.self_shadow.count()
    }
}

// Per-channel store access.
impl Motion {
    pub fn add_accessory_keyframe(&mut self, keyframe: AccessoryKeyframe) -> Result<(), MotionError> {
        self.accessory.insert(keyframe)?;
        self.dirty = true;
        Ok(())
    }

    pub fn add_bone_keyframe(&mut self, keyframe: BoneKeyframe) -> Result<(), MotionError> {
        self.bone.insert(keyframe)?;
        self.dirty = true;
        Ok(())
    }

    pub fn add_camera_keyframe(&mut self, keyframe: CameraKeyframe) -> Result<(), MotionError> {
        self.camera.insert(keyframe)?;
        self.dirty = true;
        Ok(())
    }

    pub fn add_light_keyframe(&mut self, keyframe: LightKeyframe) -> Result<(), MotionError> {
        self.light.insert(keyframe)?;
        self.dirty = true;
        Ok(())
    }

    pub fn add_model_keyframe(&mut self, keyframe: ModelKeyframe) -> Result<(), MotionError> {
        self.model.insert(keyframe)?;
        self.dirty = true;
        Ok(())
    }

    pub fn add_morph_keyframe(&mut self, keyframe: MorphKeyframe) -> Result<(), MotionError> {
        self.morph.insert(keyframe)?;
        self.dirty = true;
        Ok(())
    }

    pub fn add_self_shadow_keyframe(
        &mut self,
        keyframe: SelfShadowKeyframe,
    ) -> Result<(), MotionError> {
        self.self_shadow.insert(keyframe)?;
        self.dirty = true;
        Ok(())
    }

    pub fn find_accessory_keyframe(&self, frame_index: FrameIndex) -> Option<&AccessoryKeyframe> {
        self.accessory.find(&frame_index)
    }

    pub fn find_bone_keyframe(&self, name: &str, frame_index: FrameIndex) -> Option<&BoneKeyframe> {
        self.bone.find(&(frame_index, name.to_string()))
    }

    pub fn find_camera_keyframe(&self, frame_index: FrameIndex) -> Option<&CameraKeyframe> {
        self.camera.find(&frame_index)
    }

    pub fn find_light_keyframe(&self, frame_index: FrameIndex) -> Option<&LightKeyframe> {
        self.light.find(&frame_index)
    }

    pub fn find_model_keyframe(&self, frame_index: FrameIndex) -> Option<&ModelKeyframe> {
        self.model.find(&frame_index)
    }

    pub fn find_morph_keyframe(&self, name: &str, frame_index: FrameIndex) -> Option<&MorphKeyframe> {
        self.morph.find(&(frame_index, name.to_string()))
    }

    pub fn find_self_shadow_keyframe(&self, frame_index: FrameIndex) -> Option<&SelfShadowKeyframe> {
        self.self_shadow.find(&frame_index)
    }

    pub fn remove_accessory_keyframe(&mut self, frame_index: FrameIndex) -> bool {
        let removed = self.accessory.remove(&frame_index).is_some();
        self.dirty |= removed;
        removed
    }

    pub fn remove_bone_keyframe(&mut self, name: &str, frame_index: FrameIndex) -> bool {
        let removed = self.bone.remove(&(frame_index, name.to_string())).is_some();
        self.dirty |= removed;
        removed
    }

    pub fn remove_camera_keyframe(&mut self, frame_index: FrameIndex) -> bool {
        let removed = self.camera.remove(&frame_index).is_some();
        self.dirty |= removed;
        removed
    }

    pub fn remove_light_keyframe(&mut self, frame_index: FrameIndex) -> bool {
        let removed = self.light.remove(&frame_index).is_some();
        self.dirty |= removed;
        removed
    }

    pub fn remove_model_keyframe(&mut self, frame_index: FrameIndex) -> bool {
        let removed = self.model.remove(&frame_index).is_some();
        self.dirty |= removed;
        removed
    }

    pub fn remove_morph_keyframe(&mut self, name: &str, frame_index: FrameIndex) -> bool {
        let removed = self.morph.remove(&(frame_index, name.to_string())).is_some();
        self.dirty |= removed;
        removed
    }

    pub fn remove_self_shadow_keyframe(&mut self, frame_index: FrameIndex) -> bool {
        let removed = self.self_shadow.remove(&frame_index).is_some();
        self.dirty |= removed;
        removed
    }

    pub fn all_accessory_keyframes(&self) -> impl Iterator<Item = &AccessoryKeyframe> {
        self.accessory.iter()
    }

    pub fn all_bone_keyframes(&self) -> impl Iterator<Item = &BoneKeyframe> {
        self.bone.iter()
    }

    pub fn all_camera_keyframes(&self) -> impl Iterator<Item = &CameraKeyframe> {
        self.camera.iter()
    }

    pub fn all_light_keyframes(&self) -> impl Iterator<Item = &LightKeyframe> {
        self.light.iter()
    }

    pub fn all_model_keyframes(&self) -> impl Iterator<Item = &ModelKeyframe> {
        self.model.iter()
    }

    pub fn all_morph_keyframes(&self) -> impl Iterator<Item = &MorphKeyframe> {
        self.morph.iter()
    }

    pub fn all_self_shadow_keyframes(&self) -> impl Iterator<Item = &SelfShadowKeyframe> {
        self.self_shadow.iter()
    }
}

// Playback interpolation queries.
impl Motion {
    /// Evaluate an easing curve through the per-motion cache.
    pub fn curve_value(&mut self, points: CurvePoints, interval: FrameIndex, t: f32) -> f32 {
        self.curves.evaluate(points, interval, t)
    }

    /// Number of distinct curve shapes interned so far.
    pub fn curve_count(&self) -> usize {
        self.curves.count()
    }

    /// Interpolated pose (translation, orientation) of a bone at a frame, or
    /// `None` when the bone has no keyframes at all.
    pub fn sample_bone(&mut self, name: &str, frame_index: FrameIndex) -> Option<([f32; 3], [f32; 4])> {
        let (prev, next) = self.bone.search_closest_named(name, frame_index);
        match (prev, next) {
            (Some(prev), Some(next)) => {
                let coef = interp::coefficient(prev.frame_index, next.frame_index, frame_index);
                Some(interp::interpolate_bone(prev, next, coef, &mut self.curves))
            }
            (Some(only), None) | (None, Some(only)) => Some((only.translation, only.orientation)),
            (None, None) => None,
        }
    }

    /// Interpolated camera state at a frame, or `None` when the camera
    /// channel is empty.
    pub fn sample_camera(&mut self, frame_index: FrameIndex) -> Option<CameraPose> {
        let (prev, next) = self.camera.search_closest(frame_index);
        match (prev, next) {
            (Some(prev), Some(next)) => {
                let coef = interp::coefficient(prev.frame_index, next.frame_index, frame_index);
                Some(interp::interpolate_camera(prev, next, coef, &mut self.curves))
            }
            (Some(only), None) | (None, Some(only)) => Some(CameraPose {
                look_at: only.look_at,
                angle: only.angle,
                distance: only.distance,
                fov: only.fov as f32,
            }),
            (None, None) => None,
        }
    }

    /// Interpolated morph weight at a frame, or `None` when the morph has no
    /// keyframes.
    pub fn sample_morph_weight(&mut self, name: &str, frame_index: FrameIndex) -> Option<f32> {
        let (prev, next) = self.morph.search_closest_named(name, frame_index);
        match (prev, next) {
            (Some(prev), Some(next)) => {
                let coef = interp::coefficient(prev.frame_index, next.frame_index, frame_index);
                Some(interp::lerp_f32(prev.weight, next.weight, coef))
            }
            (Some(only), None) | (None, Some(only)) => Some(only.weight),
            (None, None) => None,
        }
    }
}

// Time rescaling. Selection for the affected channel is cleared up front;
// stale frame references would otherwise point at relocated keyframes.
impl Motion {
    pub fn scale_all_accessory_keyframes_in(
        &mut self,
        from: FrameIndex,
        to: FrameIndex,
        scale_factor: f32,
    ) {
        self.selection.clear(ChannelMask::ACCESSORY);
        scale_frame_channel(&mut self.accessory, from, to, scale_factor);
        self.dirty = true;
    }

    pub fn scale_all_bone_keyframes_in(
        &mut self,
        model: &dyn ModelObjects,
        from: FrameIndex,
        to: FrameIndex,
        scale_factor: f32,
    ) {
        let names: Vec<String> = self
            .bone
            .names()
            .into_iter()
            .filter(|name| model.contains_bone(name))
            .collect();
        self.selection.clear(ChannelMask::BONE);
        scale_named_channel(&mut self.bone, &names, from, to, scale_factor);
        self.dirty = true;
    }

    pub fn scale_all_camera_keyframes_in(
        &mut self,
        from: FrameIndex,
        to: FrameIndex,
        scale_factor: f32,
    ) {
        self.selection.clear(ChannelMask::CAMERA);
        scale_frame_channel(&mut self.camera, from, to, scale_factor);
        self.dirty = true;
    }

    pub fn scale_all_light_keyframes_in(
        &mut self,
        from: FrameIndex,
        to: FrameIndex,
        scale_factor: f32,
    ) {
        self.selection.clear(ChannelMask::LIGHT);
        scale_frame_channel(&mut self.light, from, to, scale_factor);
        self.dirty = true;
    }

    pub fn scale_all_model_keyframes_in(
        &mut self,
        from: FrameIndex,
        to: FrameIndex,
        scale_factor: f32,
    ) {
        self.selection.clear(ChannelMask::MODEL);
        scale_frame_channel(&mut self.model, from, to, scale_factor);
        self.dirty = true;
    }

    pub fn scale_all_morph_keyframes_in(
        &mut self,
        model: &dyn ModelObjects,
        from: FrameIndex,
        to: FrameIndex,
        scale_factor: f32,
    ) {
        let names: Vec<String> = self
            .morph
            .names()
            .into_iter()
            .filter(|name| model.contains_morph(name))
            .collect();
        self.selection.clear(ChannelMask::MORPH);
        scale_named_channel(&mut self.morph, &names, from, to, scale_factor);
        self.dirty = true;
    }

    pub fn scale_all_self_shadow_keyframes_in(
        &mut self,
        from: FrameIndex,
        to: FrameIndex,
        scale_factor: f32,
    ) {
        self.selection.clear(ChannelMask::SELF_SHADOW);
        scale_frame_channel(&mut self.self_shadow, from, to, scale_factor);
        self.dirty = true;
    }
}

// Offset-applying copy between motions, the paste half of copy/paste.
// Duplicate destination keys keep the first writer, as the original copy
// loops did.
impl Motion {
    pub fn copy_all_accessory_keyframes(&mut self, source: &Motion, offset: i32) {
        copy_channel(&source.accessory, &mut self.accessory, offset, |_| true);
        self.dirty = true;
    }

    pub fn copy_all_bone_keyframes(
        &mut self,
        source: &Motion,
        model: &dyn ModelObjects,
        offset: i32,
    ) {
        copy_channel(&source.bone, &mut self.bone, offset, |keyframe| {
            model.contains_bone(&keyframe.name)
        });
        self.dirty = true;
    }

    pub fn copy_all_camera_keyframes(&mut self, source: &Motion, offset: i32) {
        copy_channel(&source.camera, &mut self.camera, offset, |_| true);
        self.dirty = true;
    }

    pub fn copy_all_light_keyframes(&mut self, source: &Motion, offset: i32) {
        copy_channel(&source.light, &mut self.light, offset, |_| true);
        self.dirty = true;
    }

    pub fn copy_all_model_keyframes(&mut self, source: &Motion, offset: i32) {
        copy_channel(&source.model, &mut self.model, offset, |_| true);
        self.dirty = true;
    }

    pub fn copy_all_morph_keyframes(
        &mut self,
        source: &Motion,
        model: &dyn ModelObjects,
        offset: i32,
    ) {
        copy_channel(&source.morph, &mut self.morph, offset, |keyframe| {
            model.contains_morph(&keyframe.name)
        });
        self.dirty = true;
    }

    pub fn copy_all_self_shadow_keyframes(&mut self, source: &Motion, offset: i32) {
        copy_channel(&source.self_shadow, &mut self.self_shadow, offset, |_| true);
        self.dirty = true;
    }

    /// Bone and morph names this motion animates that a target model does not
    /// define. Both lists empty means the motion fits the model.
    pub fn test_all_missing_model_objects(
        &self,
        model: &dyn ModelObjects,
    ) -> (Vec<String>, Vec<String>) {
        let bones = self
            .bone
            .names()
            .into_iter()
            .filter(|name| !model.contains_bone(name))
            .collect();
        let morphs = self
            .morph
            .names()
            .into_iter()
            .filter(|name| !model.contains_morph(name))
            .collect();
        (bones, morphs)
    }
}

// Selection coordination.
impl Motion {
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionSet {
        &mut self.selection
    }

    /// Select every stored keyframe of the masked channels.
    pub fn select_all_keyframes(&mut self, mask: ChannelMask) {
        if mask.contains(Channel::Accessory) {
            for keyframe in self.accessory.iter() {
                self.selection.add_frame(Channel::Accessory, keyframe.frame_index);
            }
        }
        if mask.contains(Channel::Bone) {
            for keyframe in self.bone.iter() {
                self.selection
                    .add_named(Channel::Bone, &keyframe.name, keyframe.frame_index);
            }
        }
        if mask.contains(Channel::Camera) {
            for keyframe in self.camera.iter() {
                self.selection.add_frame(Channel::Camera, keyframe.frame_index);
            }
        }
        if mask.contains(Channel::Light) {
            for keyframe in self.light.iter() {
                self.selection.add_frame(Channel::Light, keyframe.frame_index);
            }
        }
        if mask.contains(Channel::Model) {
            for keyframe in self.model.iter() {
                self.selection.add_frame(Channel::Model, keyframe.frame_index);
            }
        }
        if mask.contains(Channel::Morph) {
            for keyframe in self.morph.iter() {
                self.selection
                    .add_named(Channel::Morph, &keyframe.name, keyframe.frame_index);
            }
        }
        if mask.contains(Channel::SelfShadow) {
            for keyframe in self.self_shadow.iter() {
                self.selection
                    .add_frame(Channel::SelfShadow, keyframe.frame_index);
            }
        }
    }

    /// Whether every stored keyframe of the masked channels is selected.
    pub fn has_all_keyframes(&self, mask: ChannelMask) -> bool {
        let covered = |channel: Channel, count: usize| {
            !mask.contains(channel) || self.selection.count(channel) == count
        };
        covered(Channel::Accessory, self.accessory.count())
            && covered(Channel::Bone, self.bone.count())
            && covered(Channel::Camera, self.camera.count())
            && covered(Channel::Light, self.light.count())
            && covered(Channel::Model, self.model.count())
            && covered(Channel::Morph, self.morph.count())
            && covered(Channel::SelfShadow, self.self_shadow.count())
    }

    /// Select the stored keyframes of a frame-keyed channel inside
    /// `[start, end]` (inclusive).
    pub fn select_keyframes_in(&mut self, channel: Channel, start: FrameIndex, end: FrameIndex) {
        let frames: Vec<FrameIndex> = match channel {
            Channel::Accessory => self.accessory.iter().map(|k| k.frame_index).collect(),
            Channel::Camera => self.camera.iter().map(|k| k.frame_index).collect(),
            Channel::Light => self.light.iter().map(|k| k.frame_index).collect(),
            Channel::Model => self.model.iter().map(|k| k.frame_index).collect(),
            Channel::SelfShadow => self.self_shadow.iter().map(|k| k.frame_index).collect(),
            Channel::Bone | Channel::Morph => return,
        };
        for frame_index in frames {
            if frame_index >= start && frame_index <= end {
                self.selection.add_frame(channel, frame_index);
            }
        }
    }

    /// Select one bone's stored keyframes inside `[start, end]` (inclusive).
    pub fn select_bone_keyframes_in(&mut self, name: &str, start: FrameIndex, end: FrameIndex) {
        let frames: Vec<FrameIndex> = self
            .bone
            .iter()
            .filter(|k| k.name == name && k.frame_index >= start && k.frame_index <= end)
            .map(|k| k.frame_index)
            .collect();
        for frame_index in frames {
            self.selection.add_named(Channel::Bone, name, frame_index);
        }
    }

    /// Select one morph's stored keyframes inside `[start, end]` (inclusive).
    pub fn select_morph_keyframes_in(&mut self, name: &str, start: FrameIndex, end: FrameIndex) {
        let frames: Vec<FrameIndex> = self
            .morph
            .iter()
            .filter(|k| k.name == name && k.frame_index >= start && k.frame_index <= end)
            .map(|k| k.frame_index)
            .collect();
        for frame_index in frames {
            self.selection.add_named(Channel::Morph, name, frame_index);
        }
    }

    /// Selected bone keyframes in store order, plus the earliest selected
    /// frame (the copy/paste zero-basing offset). Stale selection entries are
    /// skipped.
    pub fn selected_bone_keyframes(&self) -> (Vec<&BoneKeyframe>, Option<FrameIndex>) {
        let keyframes: Vec<&BoneKeyframe> = self
            .selection
            .named_keys(Channel::Bone)
            .filter_map(|key| self.bone.find(key))
            .collect();
        (keyframes, self.selection.first_selected_frame(Channel::Bone))
    }

    pub fn selected_morph_keyframes(&self) -> (Vec<&MorphKeyframe>, Option<FrameIndex>) {
        let keyframes: Vec<&MorphKeyframe> = self
            .selection
            .named_keys(Channel::Morph)
            .filter_map(|key| self.morph.find(key))
            .collect();
        (keyframes, self.selection.first_selected_frame(Channel::Morph))
    }

    pub fn selected_accessory_keyframes(&self) -> (Vec<&AccessoryKeyframe>, Option<FrameIndex>) {
        let keyframes: Vec<&AccessoryKeyframe> = self
            .selection
            .frames(Channel::Accessory)
            .filter_map(|frame| self.accessory.find(&frame))
            .collect();
        (
            keyframes,
            self.selection.first_selected_frame(Channel::Accessory),
        )
    }

    pub fn selected_camera_keyframes(&self) -> (Vec<&CameraKeyframe>, Option<FrameIndex>) {
        let keyframes: Vec<&CameraKeyframe> = self
            .selection
            .frames(Channel::Camera)
            .filter_map(|frame| self.camera.find(&frame))
            .collect();
        (
            keyframes,
            self.selection.first_selected_frame(Channel::Camera),
        )
    }

    pub fn selected_light_keyframes(&self) -> (Vec<&LightKeyframe>, Option<FrameIndex>) {
        let keyframes: Vec<&LightKeyframe> = self
            .selection
            .frames(Channel::Light)
            .filter_map(|frame| self.light.find(&frame))
            .collect();
        (
            keyframes,
            self.selection.first_selected_frame(Channel::Light),
        )
    }

    pub fn selected_model_keyframes(&self) -> (Vec<&ModelKeyframe>, Option<FrameIndex>) {
        let keyframes: Vec<&ModelKeyframe> = self
            .selection
            .frames(Channel::Model)
            .filter_map(|frame| self.model.find(&frame))
            .collect();
        (
            keyframes,
            self.selection.first_selected_frame(Channel::Model),
        )
    }

    pub fn selected_self_shadow_keyframes(&self) -> (Vec<&SelfShadowKeyframe>, Option<FrameIndex>) {
        let keyframes: Vec<&SelfShadowKeyframe> = self
            .selection
            .frames(Channel::SelfShadow)
            .filter_map(|frame| self.self_shadow.find(&frame))
            .collect();
        (
            keyframes,
            self.selection.first_selected_frame(Channel::SelfShadow),
        )
    }

    /// Durable selection state, decoupled from live keyframes.
    pub fn save_selection_snapshot(&self) -> SelectionSnapshot {
        self.selection.save_snapshot()
    }

    /// Re-resolve a snapshot against the current stores. Tuples that no
    /// longer resolve are silently dropped.
    pub fn restore_selection_snapshot(&mut self, snapshot: &SelectionSnapshot) {
        for &frame_index in &snapshot.accessory {
            if self.accessory.contains(&frame_index) {
                self.selection.add_frame(Channel::Accessory, frame_index);
            }
        }
        for (name, frames) in &snapshot.bone {
            for &frame_index in frames {
                if self.bone.contains(&(frame_index, name.clone())) {
                    self.selection.add_named(Channel::Bone, name, frame_index);
                }
            }
        }
        for &frame_index in &snapshot.camera {
            if self.camera.contains(&frame_index) {
                self.selection.add_frame(Channel::Camera, frame_index);
            }
        }
        for &frame_index in &snapshot.light {
            if self.light.contains(&frame_index) {
                self.selection.add_frame(Channel::Light, frame_index);
            }
        }
        for &frame_index in &snapshot.model {
            if self.model.contains(&frame_index) {
                self.selection.add_frame(Channel::Model, frame_index);
            }
        }
        for (name, frames) in &snapshot.morph {
            for &frame_index in frames {
                if self.morph.contains(&(frame_index, name.clone())) {
                    self.selection.add_named(Channel::Morph, name, frame_index);
                }
            }
        }
        for &frame_index in &snapshot.self_shadow {
            if self.self_shadow.contains(&frame_index) {
                self.selection.add_frame(Channel::SelfShadow, frame_index);
            }
        }
    }
}

// In-place correction of selected keyframes.
impl Motion {
    /// Apply multiply/add factors to every selected bone keyframe's
    /// translation and orientation (the latter through Euler degrees).
    pub fn correct_all_selected_bone_keyframes(
        &mut self,
        translation: VectorCorrection,
        orientation: VectorCorrection,
    ) {
        let keys: Vec<NamedKey> = self.selection.named_keys(Channel::Bone).cloned().collect();
        for key in keys {
            if let Some(keyframe) = self.bone.find_mut(&key) {
                keyframe.translation = correct_vec3(keyframe.translation, &translation);
                let angles = interp::euler_angles(keyframe.orientation);
                let degrees = [
                    angles[0].to_degrees(),
                    angles[1].to_degrees(),
                    angles[2].to_degrees(),
                ];
                let corrected = correct_vec3(degrees, &orientation);
                keyframe.orientation = interp::quat_from_euler([
                    corrected[0].to_radians(),
                    corrected[1].to_radians(),
                    corrected[2].to_radians(),
                ]);
            }
        }
        self.dirty = true;
    }

    pub fn correct_all_selected_camera_keyframes(
        &mut self,
        look_at: VectorCorrection,
        angle: VectorCorrection,
        distance: Correction,
    ) {
        let frames: Vec<FrameIndex> = self.selection.frames(Channel::Camera).collect();
        for frame_index in frames {
            if let Some(keyframe) = self.camera.find_mut(&frame_index) {
                keyframe.look_at = correct_vec3(keyframe.look_at, &look_at);
                keyframe.angle = correct_vec3(keyframe.angle, &angle);
                keyframe.distance = keyframe.distance * distance.mul + distance.add;
            }
        }
        self.dirty = true;
    }

    pub fn correct_all_selected_morph_keyframes(&mut self, weight: Correction) {
        let keys: Vec<NamedKey> = self.selection.named_keys(Channel::Morph).cloned().collect();
        for key in keys {
            if let Some(keyframe) = self.morph.find_mut(&key) {
                keyframe.weight = keyframe.weight * weight.mul + weight.add;
            }
        }
        self.dirty = true;
    }
}
