//! Motion keyframe timeline core (engine-agnostic).
//!
//! A sparse, multi-channel, frame-indexed keyframe store with deterministic
//! bezier interpolation, cross-motion merge (optionally mirroring left/right
//! bones), non-destructive time rescaling, and persistable selection state.
//! Binary codecs, model data, and the orchestration layer live outside this
//! crate and are reached through the narrow traits in [`codec`] and [`model`].

pub mod codec;
pub mod curve;
pub mod error;
pub mod frame;
pub mod interp;
pub mod keyframe;
mod merge;
pub mod model;
pub mod motion;
mod remap;
pub mod selection;
pub mod store;

// Re-exports for consumers (adapters)
pub use codec::{ChannelData, MotionCodec, MotionFormat};
pub use curve::{BezierCurve, BezierCurveCache};
pub use error::{CodecError, MotionError};
pub use frame::{
    add_frame_index_delta, subtract_frame_index_delta, FrameIndex, MAX_DURATION, MAX_FRAME_INDEX,
};
pub use interp::{coefficient, CameraPose};
pub use keyframe::{
    AccessoryKeyframe, BoneInterpolation, BoneInterpolationType, BoneKeyframe,
    CameraInterpolation, CameraInterpolationType, CameraKeyframe, Channel, ChannelMask,
    ConstraintState, CoverageMode, CurvePoints, EffectParameter, EffectParameterValue,
    LightKeyframe, ModelKeyframe, MorphKeyframe, NamedKey, OutsideParent, SelfShadowKeyframe,
    LINEAR_CURVE_POINTS,
};
pub use model::ModelObjects;
pub use motion::{Correction, Motion, VectorCorrection};
pub use selection::{SelectionSet, SelectionSnapshot};
pub use store::{Keyed, KeyframeStore};
