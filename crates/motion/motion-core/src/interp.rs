//! Playback interpolation.
//!
//! `coefficient` turns a keyframe pair plus a query frame into normalized
//! progress; the per-property easing curves then reshape that progress through
//! the motion's curve cache before the payload blend (component lerp, quat
//! NLERP with shortest-arc correction).

use crate::curve::{BezierCurve, BezierCurveCache};
use crate::frame::FrameIndex;
use crate::keyframe::{
    BoneInterpolationType, BoneKeyframe, CameraInterpolationType, CameraKeyframe,
};

/// Normalized progress of `frame_index` between two bounding frames.
///
/// A zero-length segment yields `1.0` (the next keyframe already applies), so
/// no division by zero is possible. The result is deliberately unclamped:
/// queries outside the segment extrapolate linearly.
#[inline]
pub fn coefficient(
    prev_frame: FrameIndex,
    next_frame: FrameIndex,
    frame_index: FrameIndex,
) -> f32 {
    if prev_frame == next_frame {
        1.0
    } else {
        let interval = next_frame.wrapping_sub(prev_frame);
        (frame_index as f64 - prev_frame as f64) as f32 / interval as f32
    }
}

#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
    ]
}

#[inline]
fn dot4(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

#[inline]
fn normalize4(mut q: [f32; 4]) -> [f32; 4] {
    let len2 = dot4(q, q);
    if len2 > 0.0 {
        let inv_len = len2.sqrt().recip();
        q[0] *= inv_len;
        q[1] *= inv_len;
        q[2] *= inv_len;
        q[3] *= inv_len;
    }
    q
}

/// Quaternion NLERP with shortest-arc correction: if the dot is negative the
/// second quaternion is negated before the blend. Returns a normalized
/// quaternion (x, y, z, w).
#[inline]
pub fn nlerp_quat(a: [f32; 4], mut b: [f32; 4], t: f32) -> [f32; 4] {
    if dot4(a, b) < 0.0 {
        b = [-b[0], -b[1], -b[2], -b[3]];
    }
    normalize4([
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
        lerp_f32(a[3], b[3], t),
    ])
}

/// Euler angles (x, y, z, radians, ZYX composition) from a quaternion.
pub fn euler_angles(q: [f32; 4]) -> [f32; 3] {
    let (x, y, z, w) = (q[0], q[1], q[2], q[3]);
    let sinp = (2.0 * (w * y - z * x)).clamp(-1.0, 1.0);
    [
        (2.0 * (w * x + y * z)).atan2(1.0 - 2.0 * (x * x + y * y)),
        sinp.asin(),
        (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (y * y + z * z)),
    ]
}

/// Quaternion (x, y, z, w) from Euler angles (radians, ZYX composition);
/// inverse of [`euler_angles`].
pub fn quat_from_euler(angles: [f32; 3]) -> [f32; 4] {
    let (cr, sr) = ((angles[0] * 0.5).cos(), (angles[0] * 0.5).sin());
    let (cp, sp) = ((angles[1] * 0.5).cos(), (angles[1] * 0.5).sin());
    let (cy, sy) = ((angles[2] * 0.5).cos(), (angles[2] * 0.5).sin());
    [
        sr * cp * cy - cr * sp * sy,
        cr * sp * cy + sr * cp * sy,
        cr * cp * sy - sr * sp * cy,
        cr * cp * cy + sr * sp * sy,
    ]
}

#[inline]
fn eased(
    cache: &mut BezierCurveCache,
    points: crate::keyframe::CurvePoints,
    interval: FrameIndex,
    coef: f32,
) -> f32 {
    if BezierCurve::is_linear(points) {
        coef
    } else {
        cache.evaluate(points, interval, coef)
    }
}

/// Blend two adjacent bone keyframes at the given progress coefficient,
/// easing each property through the segment's authored curve. Returns
/// (translation, orientation).
pub fn interpolate_bone(
    prev: &BoneKeyframe,
    next: &BoneKeyframe,
    coef: f32,
    cache: &mut BezierCurveCache,
) -> ([f32; 3], [f32; 4]) {
    let interval = next.frame_index.saturating_sub(prev.frame_index);
    let interpolation = &next.interpolation;
    let tx = eased(
        cache,
        interpolation.get(BoneInterpolationType::TranslationX),
        interval,
        coef,
    );
    let ty = eased(
        cache,
        interpolation.get(BoneInterpolationType::TranslationY),
        interval,
        coef,
    );
    let tz = eased(
        cache,
        interpolation.get(BoneInterpolationType::TranslationZ),
        interval,
        coef,
    );
    let to = eased(
        cache,
        interpolation.get(BoneInterpolationType::Orientation),
        interval,
        coef,
    );
    let translation = [
        lerp_f32(prev.translation[0], next.translation[0], tx),
        lerp_f32(prev.translation[1], next.translation[1], ty),
        lerp_f32(prev.translation[2], next.translation[2], tz),
    ];
    let orientation = nlerp_quat(prev.orientation, next.orientation, to);
    (translation, orientation)
}

/// Interpolated camera state between two adjacent camera keyframes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub look_at: [f32; 3],
    pub angle: [f32; 3],
    pub distance: f32,
    pub fov: f32,
}

pub fn interpolate_camera(
    prev: &CameraKeyframe,
    next: &CameraKeyframe,
    coef: f32,
    cache: &mut BezierCurveCache,
) -> CameraPose {
    let interval = next.frame_index.saturating_sub(prev.frame_index);
    let interpolation = &next.interpolation;
    let t_look_at = eased(
        cache,
        interpolation.get(CameraInterpolationType::LookAt),
        interval,
        coef,
    );
    let t_angle = eased(
        cache,
        interpolation.get(CameraInterpolationType::Angle),
        interval,
        coef,
    );
    let t_fov = eased(
        cache,
        interpolation.get(CameraInterpolationType::Fov),
        interval,
        coef,
    );
    let t_distance = eased(
        cache,
        interpolation.get(CameraInterpolationType::Distance),
        interval,
        coef,
    );
    CameraPose {
        look_at: lerp_vec3(prev.look_at, next.look_at, t_look_at),
        angle: lerp_vec3(prev.angle, next.angle, t_angle),
        distance: lerp_f32(prev.distance, next.distance, t_distance),
        fov: lerp_f32(prev.fov as f32, next.fov as f32, t_fov),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coefficient_degenerate_segment_is_one() {
        for f in [0u32, 1, 30, crate::frame::MAX_FRAME_INDEX] {
            assert_eq!(coefficient(f, f, f), 1.0);
        }
    }

    #[test]
    fn coefficient_is_linear_and_unclamped() {
        assert_eq!(coefficient(10, 20, 15), 0.5);
        assert_eq!(coefficient(10, 20, 10), 0.0);
        assert_eq!(coefficient(10, 20, 25), 1.5);
    }

    #[test]
    fn nlerp_takes_shortest_arc() {
        let a = [0.0, 0.0, 0.0, 1.0];
        let b = [0.0, 0.0, 0.0, -1.0];
        let half = nlerp_quat(a, b, 0.5);
        // Antipodal representation of the identity blends back to identity.
        assert!((half[3].abs() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn euler_round_trip() {
        let angles = [0.3f32, -0.7, 1.1];
        let q = quat_from_euler(angles);
        let back = euler_angles(q);
        for i in 0..3 {
            assert!((angles[i] - back[i]).abs() < 1e-4, "axis {i}");
        }
    }

    #[test]
    fn bone_midpoint_with_linear_curves() {
        let mut cache = BezierCurveCache::new();
        let mut prev = BoneKeyframe::new("arm", 0);
        prev.translation = [0.0, 0.0, 0.0];
        let mut next = BoneKeyframe::new("arm", 10);
        next.translation = [2.0, 4.0, -6.0];
        let coef = coefficient(prev.frame_index, next.frame_index, 5);
        let (translation, orientation) = interpolate_bone(&prev, &next, coef, &mut cache);
        assert_eq!(translation, [1.0, 2.0, -3.0]);
        assert!((orientation[3] - 1.0).abs() < 1e-6);
        // Linear curves never touch the cache.
        assert_eq!(cache.count(), 0);
    }
}
