//! Error kinds shared across the motion core.

use thiserror::Error;

/// Opaque failure propagated from an external codec implementation. The core
/// never inspects the reason beyond carrying it to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("codec error: {reason}")]
pub struct CodecError {
    reason: String,
}

impl CodecError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Errors produced by keyframe store mutation and frame-index arithmetic.
/// Absent keys are reported as `Option`/`bool`, not as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MotionError {
    #[error("a keyframe already exists at the destination key")]
    AlreadyExists,
    #[error("frame index arithmetic would leave the valid domain")]
    OutOfRange,
    #[error(transparent)]
    Codec(#[from] CodecError),
}
