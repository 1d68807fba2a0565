//! Interned cubic-bezier easing curves.
//!
//! The same (control points, interval) pair recurs across long runs of
//! keyframes sharing an interpolation preset, so curves are built once per
//! distinct shape and shared through a per-motion cache. Identity is the
//! curve's content (control points plus interval), never the keyframe that
//! referenced it.

use hashbrown::HashMap;

use crate::frame::FrameIndex;
use crate::keyframe::CurvePoints;

/// Wire control-point axes span `[0, 127]`.
const CONTROL_POINT_SCALE: f32 = 127.0;

const MIN_LUT_POINTS: usize = 16;
const MAX_LUT_POINTS: usize = 128;

/// Content hash key of an interned curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CurveKey {
    points: CurvePoints,
    interval: FrameIndex,
}

/// Cubic-bezier easing evaluator with a precomputed (x, y) table.
///
/// The parametric curve runs from (0, 0) to (1, 1) through the two normalized
/// control points. Evaluation inverts x to find y; the table granularity
/// follows the frame interval the curve spans, so short segments stay cheap
/// and long ones stay smooth.
#[derive(Clone, Debug)]
pub struct BezierCurve {
    c0: [f32; 2],
    c1: [f32; 2],
    interval: FrameIndex,
    lut: Vec<[f32; 2]>,
}

#[inline]
fn cubic_bezier(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

impl BezierCurve {
    pub fn new(points: CurvePoints, interval: FrameIndex) -> Self {
        let c0 = [
            f32::from(points[0]) / CONTROL_POINT_SCALE,
            f32::from(points[1]) / CONTROL_POINT_SCALE,
        ];
        let c1 = [
            f32::from(points[2]) / CONTROL_POINT_SCALE,
            f32::from(points[3]) / CONTROL_POINT_SCALE,
        ];
        let interval = interval.max(1);
        let lut = if Self::is_linear(points) {
            Vec::new()
        } else {
            let segments = (interval as usize).clamp(MIN_LUT_POINTS, MAX_LUT_POINTS);
            let mut lut = Vec::with_capacity(segments + 1);
            for i in 0..=segments {
                let u = i as f32 / segments as f32;
                lut.push([
                    cubic_bezier(0.0, c0[0], c1[0], 1.0, u),
                    cubic_bezier(0.0, c0[1], c1[1], 1.0, u),
                ]);
            }
            lut
        };
        Self {
            c0,
            c1,
            interval,
            lut,
        }
    }

    /// A curve whose control points sit on the diagonal is exactly `y = x`.
    #[inline]
    pub fn is_linear(points: CurvePoints) -> bool {
        points[0] == points[1] && points[2] == points[3]
    }

    /// First control point, normalized to `[0, 1]`.
    pub fn c0(&self) -> [f32; 2] {
        self.c0
    }

    /// Second control point, normalized to `[0, 1]`.
    pub fn c1(&self) -> [f32; 2] {
        self.c1
    }

    pub fn interval(&self) -> FrameIndex {
        self.interval
    }

    /// Eased output in `[0, 1]` for a normalized progress `t`.
    pub fn value(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        if self.lut.is_empty() {
            return t;
        }
        // x is monotone non-decreasing for control x-axes in [0, 1], so the
        // table is ordered and the segment containing t can be bisected.
        let idx = self.lut.partition_point(|p| p[0] < t);
        if idx == 0 {
            return self.lut[0][1];
        }
        if idx >= self.lut.len() {
            return self.lut[self.lut.len() - 1][1];
        }
        let left = self.lut[idx - 1];
        let right = self.lut[idx];
        let span = right[0] - left[0];
        if span <= f32::EPSILON {
            return right[1];
        }
        let local = (t - left[0]) / span;
        left[1] + (right[1] - left[1]) * local
    }
}

/// Per-motion interning cache from curve content to evaluator.
#[derive(Debug, Default)]
pub struct BezierCurveCache {
    curves: HashMap<CurveKey, BezierCurve>,
}

impl BezierCurveCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate the easing for (points, interval) at normalized `t`,
    /// interning the curve on first sight.
    pub fn evaluate(&mut self, points: CurvePoints, interval: FrameIndex, t: f32) -> f32 {
        let key = CurveKey { points, interval };
        self.curves
            .entry(key)
            .or_insert_with(|| BezierCurve::new(points, interval))
            .value(t)
    }

    /// Number of distinct curve shapes currently interned.
    pub fn count(&self) -> usize {
        self.curves.len()
    }

    /// Drop every interned curve and the lookup structure.
    pub fn clear(&mut self) {
        self.curves.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::LINEAR_CURVE_POINTS;

    #[test]
    fn linear_points_pass_through() {
        let curve = BezierCurve::new(LINEAR_CURVE_POINTS, 10);
        assert_eq!(curve.value(0.25), 0.25);
        assert_eq!(curve.value(1.5), 1.0);
    }

    #[test]
    fn ease_in_stays_below_diagonal() {
        // Strong ease-in: first control point pulled to the lower right.
        let curve = BezierCurve::new([100, 0, 107, 107], 30);
        let mid = curve.value(0.5);
        assert!(mid < 0.5, "expected ease-in below diagonal, got {mid}");
        assert!(curve.value(0.0) <= 1e-3);
        assert!(curve.value(1.0) >= 1.0 - 1e-3);
    }

    #[test]
    fn evaluation_is_monotone() {
        let curve = BezierCurve::new([10, 80, 60, 20], 60);
        let mut last = 0.0f32;
        for i in 0..=20 {
            let v = curve.value(i as f32 / 20.0);
            assert!(v >= last - 1e-4, "non-monotone at step {i}: {v} < {last}");
            last = v;
        }
    }

    #[test]
    fn cache_interns_by_content() {
        let mut cache = BezierCurveCache::new();
        cache.evaluate([100, 0, 107, 107], 30, 0.5);
        cache.evaluate([100, 0, 107, 107], 30, 0.75);
        assert_eq!(cache.count(), 1);
        cache.evaluate([100, 0, 107, 107], 60, 0.5);
        assert_eq!(cache.count(), 2);
        cache.clear();
        assert_eq!(cache.count(), 0);
    }
}
