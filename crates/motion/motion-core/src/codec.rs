//! Codec boundary.
//!
//! The binary wire formats live outside this crate. The core holds a format
//! tag, hands the codec a decoded-channel bundle to fill (load) or a motion
//! plus channel mask to serialize (save), and treats every failure as opaque.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::frame::FrameIndex;
use crate::keyframe::{
    AccessoryKeyframe, BoneKeyframe, CameraKeyframe, ChannelMask, LightKeyframe, ModelKeyframe,
    MorphKeyframe, SelfShadowKeyframe,
};
use crate::motion::Motion;

/// Wire format tag; selects which external codec implementation applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionFormat {
    /// The older fixed-layout format.
    Legacy,
    /// The current chunked format.
    #[default]
    Current,
}

/// Channel contents produced by `MotionCodec::decode`, consumed by
/// `Motion::load` to rebuild the seven stores. Keyframe ordering within each
/// vector is not significant; the stores re-establish the total order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelData {
    pub accessory_keyframes: Vec<AccessoryKeyframe>,
    pub bone_keyframes: Vec<BoneKeyframe>,
    pub camera_keyframes: Vec<CameraKeyframe>,
    pub light_keyframes: Vec<LightKeyframe>,
    pub model_keyframes: Vec<ModelKeyframe>,
    pub morph_keyframes: Vec<MorphKeyframe>,
    pub self_shadow_keyframes: Vec<SelfShadowKeyframe>,
    pub annotations: HashMap<String, String>,
}

/// One implementation per supported wire format. Decoding applies the caller's
/// frame offset; keyframes the offset would push out of the frame domain are
/// the codec's to drop.
pub trait MotionCodec {
    fn format(&self) -> MotionFormat;
    fn decode(&self, bytes: &[u8], offset: FrameIndex) -> Result<ChannelData, CodecError>;
    fn encode(&self, motion: &Motion, mask: ChannelMask) -> Result<Vec<u8>, CodecError>;
}
