//! Channel keyframe payloads.
//!
//! One value struct per channel. Every keyframe carries its own frame index
//! (and name, for the two name-partitioned channels) so ordered listings and
//! selection snapshots never need a side lookup; the owning store's key is
//! derived from these fields and stays authoritative.

use serde::{Deserialize, Serialize};

use crate::frame::FrameIndex;
use crate::store::Keyed;

/// Cubic-bezier easing control points as stored on the wire: (x1, y1, x2, y2),
/// each axis in `[0, 127]`.
pub type CurvePoints = [u8; 4];

/// The identity easing used when a property has no authored curve.
pub const LINEAR_CURVE_POINTS: CurvePoints = [20, 20, 107, 107];

/// One of the seven keyframe kinds a motion stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Accessory,
    Bone,
    Camera,
    Light,
    Model,
    Morph,
    SelfShadow,
}

impl Channel {
    pub const ALL: [Channel; 7] = [
        Channel::Accessory,
        Channel::Bone,
        Channel::Camera,
        Channel::Light,
        Channel::Model,
        Channel::Morph,
        Channel::SelfShadow,
    ];
}

/// Bit set of channels, used by selection clearing and partial export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMask(u32);

impl ChannelMask {
    pub const NONE: Self = Self(0);
    pub const ACCESSORY: Self = Self(1 << 0);
    pub const BONE: Self = Self(1 << 1);
    pub const CAMERA: Self = Self(1 << 2);
    pub const LIGHT: Self = Self(1 << 3);
    pub const MODEL: Self = Self(1 << 4);
    pub const MORPH: Self = Self(1 << 5);
    pub const SELF_SHADOW: Self = Self(1 << 6);
    pub const ALL: Self = Self(0x7f);

    #[inline]
    pub fn contains(self, channel: Channel) -> bool {
        self.0 & ChannelMask::from(channel).0 != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<Channel> for ChannelMask {
    fn from(channel: Channel) -> Self {
        match channel {
            Channel::Accessory => Self::ACCESSORY,
            Channel::Bone => Self::BONE,
            Channel::Camera => Self::CAMERA,
            Channel::Light => Self::LIGHT,
            Channel::Model => Self::MODEL,
            Channel::Morph => Self::MORPH,
            Channel::SelfShadow => Self::SELF_SHADOW,
        }
    }
}

impl std::ops::BitOr for ChannelMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Key of the name-partitioned channels (bone, morph). Tuple order gives the
/// required total order: frame index first, name as the tie-break.
pub type NamedKey = (FrameIndex, String);

/// Parented-transform delegation target carried by accessory keyframes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OutsideParent {
    pub object_name: String,
    pub bone_name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EffectParameterValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vector4([f32; 4]),
}

/// Named shader parameter recorded on accessory keyframes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectParameter {
    pub name: String,
    pub value: EffectParameterValue,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccessoryKeyframe {
    pub frame_index: FrameIndex,
    pub translation: [f32; 3],
    /// Quaternion (x, y, z, w).
    pub orientation: [f32; 4],
    pub opacity: f32,
    pub scale_factor: f32,
    pub visible: bool,
    pub shadow_enabled: bool,
    pub add_blend_enabled: bool,
    pub outside_parent: Option<OutsideParent>,
    pub effect_parameters: Vec<EffectParameter>,
}

impl AccessoryKeyframe {
    pub fn new(frame_index: FrameIndex) -> Self {
        Self {
            frame_index,
            translation: [0.0; 3],
            orientation: [0.0, 0.0, 0.0, 1.0],
            opacity: 1.0,
            scale_factor: 1.0,
            visible: true,
            shadow_enabled: true,
            add_blend_enabled: false,
            outside_parent: None,
            effect_parameters: Vec::new(),
        }
    }
}

/// Which of a bone keyframe's interpolatable properties a curve applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoneInterpolationType {
    TranslationX,
    TranslationY,
    TranslationZ,
    Orientation,
}

/// Per-property easing curves of a bone keyframe segment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneInterpolation {
    pub translation_x: CurvePoints,
    pub translation_y: CurvePoints,
    pub translation_z: CurvePoints,
    pub orientation: CurvePoints,
}

impl BoneInterpolation {
    #[inline]
    pub fn get(&self, value: BoneInterpolationType) -> CurvePoints {
        match value {
            BoneInterpolationType::TranslationX => self.translation_x,
            BoneInterpolationType::TranslationY => self.translation_y,
            BoneInterpolationType::TranslationZ => self.translation_z,
            BoneInterpolationType::Orientation => self.orientation,
        }
    }
}

impl Default for BoneInterpolation {
    fn default() -> Self {
        Self {
            translation_x: LINEAR_CURVE_POINTS,
            translation_y: LINEAR_CURVE_POINTS,
            translation_z: LINEAR_CURVE_POINTS,
            orientation: LINEAR_CURVE_POINTS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneKeyframe {
    pub name: String,
    pub frame_index: FrameIndex,
    pub translation: [f32; 3],
    /// Quaternion (x, y, z, w).
    pub orientation: [f32; 4],
    pub interpolation: BoneInterpolation,
    pub stage_index: u32,
    pub physics_simulation_enabled: bool,
}

impl BoneKeyframe {
    pub fn new(name: impl Into<String>, frame_index: FrameIndex) -> Self {
        Self {
            name: name.into(),
            frame_index,
            translation: [0.0; 3],
            orientation: [0.0, 0.0, 0.0, 1.0],
            interpolation: BoneInterpolation::default(),
            stage_index: 0,
            physics_simulation_enabled: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CameraInterpolationType {
    LookAt,
    Angle,
    Fov,
    Distance,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraInterpolation {
    pub look_at: CurvePoints,
    pub angle: CurvePoints,
    pub fov: CurvePoints,
    pub distance: CurvePoints,
}

impl CameraInterpolation {
    #[inline]
    pub fn get(&self, value: CameraInterpolationType) -> CurvePoints {
        match value {
            CameraInterpolationType::LookAt => self.look_at,
            CameraInterpolationType::Angle => self.angle,
            CameraInterpolationType::Fov => self.fov,
            CameraInterpolationType::Distance => self.distance,
        }
    }
}

impl Default for CameraInterpolation {
    fn default() -> Self {
        Self {
            look_at: LINEAR_CURVE_POINTS,
            angle: LINEAR_CURVE_POINTS,
            fov: LINEAR_CURVE_POINTS,
            distance: LINEAR_CURVE_POINTS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraKeyframe {
    pub frame_index: FrameIndex,
    pub look_at: [f32; 3],
    /// Euler angles in radians.
    pub angle: [f32; 3],
    pub distance: f32,
    /// Field of view in degrees, kept integral as on the wire.
    pub fov: i32,
    pub perspective: bool,
    pub interpolation: CameraInterpolation,
}

impl CameraKeyframe {
    pub fn new(frame_index: FrameIndex) -> Self {
        Self {
            frame_index,
            look_at: [0.0; 3],
            angle: [0.0; 3],
            distance: 45.0,
            fov: 30,
            perspective: true,
            interpolation: CameraInterpolation::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightKeyframe {
    pub frame_index: FrameIndex,
    pub color: [f32; 3],
    pub direction: [f32; 3],
}

impl LightKeyframe {
    pub fn new(frame_index: FrameIndex) -> Self {
        Self {
            frame_index,
            color: [0.6; 3],
            direction: [-0.5, -1.0, 0.5],
        }
    }
}

/// Per-constraint enable state recorded on model keyframes, ordered as the
/// model declares its constraints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstraintState {
    pub bone_name: String,
    pub enabled: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelKeyframe {
    pub frame_index: FrameIndex,
    pub visible: bool,
    pub physics_simulation_enabled: bool,
    pub add_blend_enabled: bool,
    pub edge_color: [f32; 4],
    pub edge_scale_factor: f32,
    pub constraint_states: Vec<ConstraintState>,
}

impl ModelKeyframe {
    pub fn new(frame_index: FrameIndex) -> Self {
        Self {
            frame_index,
            visible: true,
            physics_simulation_enabled: true,
            add_blend_enabled: false,
            edge_color: [0.0, 0.0, 0.0, 1.0],
            edge_scale_factor: 1.0,
            constraint_states: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MorphKeyframe {
    pub name: String,
    pub frame_index: FrameIndex,
    pub weight: f32,
}

impl MorphKeyframe {
    pub fn new(name: impl Into<String>, frame_index: FrameIndex) -> Self {
        Self {
            name: name.into(),
            frame_index,
            weight: 0.0,
        }
    }
}

/// Self-shadow coverage mode, matching the wire values 0/1/2.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoverageMode {
    Disabled,
    #[default]
    Mode1,
    Mode2,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelfShadowKeyframe {
    pub frame_index: FrameIndex,
    pub distance: f32,
    pub mode: CoverageMode,
}

impl SelfShadowKeyframe {
    pub fn new(frame_index: FrameIndex) -> Self {
        Self {
            frame_index,
            distance: 8875.0,
            mode: CoverageMode::default(),
        }
    }
}

macro_rules! frame_keyed {
    ($($ty:ty),* $(,)?) => {
        $(impl Keyed for $ty {
            type Key = FrameIndex;

            fn key(&self) -> FrameIndex {
                self.frame_index
            }

            fn frame_index(&self) -> FrameIndex {
                self.frame_index
            }

            fn set_frame_index(&mut self, value: FrameIndex) {
                self.frame_index = value;
            }
        })*
    };
}

macro_rules! name_keyed {
    ($($ty:ty),* $(,)?) => {
        $(impl Keyed for $ty {
            type Key = NamedKey;

            fn key(&self) -> NamedKey {
                (self.frame_index, self.name.clone())
            }

            fn frame_index(&self) -> FrameIndex {
                self.frame_index
            }

            fn set_frame_index(&mut self, value: FrameIndex) {
                self.frame_index = value;
            }
        })*
    };
}

frame_keyed!(
    AccessoryKeyframe,
    CameraKeyframe,
    LightKeyframe,
    ModelKeyframe,
    SelfShadowKeyframe,
);
name_keyed!(BoneKeyframe, MorphKeyframe);
