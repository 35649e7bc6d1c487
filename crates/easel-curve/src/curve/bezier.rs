//! Cubic Bezier segment shape.

use easel_math::{dvec2, lerp, DVec2, Point2};
use serde::{Deserialize, Serialize};

use crate::frame::SegmentFrame;
use crate::handle::{BezierHandle, HandleSide};

const SOLVE_EPSILON: f64 = 1e-12;
const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 64;

/// Cubic Bezier from the segment start to its end, shaped by two handles
/// whose offsets are stored in graph units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BezierCurve {
    pub handle_left: BezierHandle,
    pub handle_right: BezierHandle,
}

impl BezierCurve {
    /// Handles on the diagonal of `frame`.
    pub fn new(frame: &SegmentFrame) -> Self {
        Self {
            handle_left: BezierHandle::canonical(HandleSide::Left, frame),
            handle_right: BezierHandle::canonical(HandleSide::Right, frame),
        }
    }

    pub fn from_offsets(frame: &SegmentFrame, left: DVec2, right: DVec2) -> Self {
        let mut curve = Self {
            handle_left: BezierHandle::new(HandleSide::Left, left),
            handle_right: BezierHandle::new(HandleSide::Right, right),
        };
        curve.refit(frame);
        curve
    }

    pub fn handle(&self, side: HandleSide) -> &BezierHandle {
        match side {
            HandleSide::Left => &self.handle_left,
            HandleSide::Right => &self.handle_right,
        }
    }

    pub fn handle_mut(&mut self, side: HandleSide) -> &mut BezierHandle {
        match side {
            HandleSide::Left => &mut self.handle_left,
            HandleSide::Right => &mut self.handle_right,
        }
    }

    pub fn clear(&mut self, frame: &SegmentFrame) {
        *self = Self::new(frame);
    }

    /// Re-limit both handles to the frame's horizontal span.
    pub fn refit(&mut self, frame: &SegmentFrame) {
        self.handle_left.refit(frame);
        self.handle_right.refit(frame);
    }

    /// Control points in graph space.
    pub fn control_points(&self, frame: &SegmentFrame) -> [Point2; 4] {
        [
            frame.start,
            frame.start + self.handle_left.offset(),
            frame.end + self.handle_right.offset(),
            frame.end,
        ]
    }

    /// Evaluate at segment-local `progress` with the end values replaced by
    /// `start` and `end`.
    ///
    /// Handle heights are rescaled by the ratio of the requested value span
    /// to the frame's own span; a flat frame keeps them in graph units.
    pub fn evaluate(&self, frame: &SegmentFrame, progress: f64, start: f64, end: f64) -> f64 {
        let w = frame.width();
        if w <= 0.0 {
            return lerp(start, end, progress);
        }
        let k = if frame.is_flat() {
            1.0
        } else {
            (end - start) / frame.height()
        };
        let left = self.handle_left.offset();
        let right = self.handle_right.offset();
        let xs = [0.0, left.x / w, 1.0 + right.x / w, 1.0];
        let ys = [start, start + left.y * k, end + right.y * k, end];
        let t = solve_parameter(&xs, progress);
        bernstein(&ys, t)
    }

    /// Split at graph x, returning the new boundary point and the two halves.
    /// The halves trace exactly the original curve.
    pub fn split_at(&self, frame: &SegmentFrame, x: f64) -> (Point2, BezierCurve, BezierCurve) {
        let points = self.control_points(frame);
        let w = frame.width();
        let xs = points.map(|p| (p.x - frame.start.x) / w);
        let t = solve_parameter(&xs, (x - frame.start.x) / w);
        let (left, right) = split_points(&points, t);
        let boundary = dvec2(x, left[3].y);

        let left_frame = SegmentFrame::new(frame.start, boundary);
        let right_frame = SegmentFrame::new(boundary, frame.end);
        let first = Self::from_offsets(&left_frame, left[1] - left[0], left[2] - boundary);
        let second = Self::from_offsets(&right_frame, right[1] - boundary, right[2] - right[3]);
        (boundary, first, second)
    }

    /// Same curve traversed backwards in time; the frame mirrors with it.
    pub fn mirrored(&self) -> Self {
        Self {
            handle_left: self.handle_right.mirrored(),
            handle_right: self.handle_left.mirrored(),
        }
    }
}

/// Cubic Bernstein polynomial over four coefficients.
fn bernstein(c: &[f64; 4], t: f64) -> f64 {
    let s = 1.0 - t;
    s * s * s * c[0] + 3.0 * s * s * t * c[1] + 3.0 * s * t * t * c[2] + t * t * t * c[3]
}

fn bernstein_derivative(c: &[f64; 4], t: f64) -> f64 {
    let s = 1.0 - t;
    3.0 * s * s * (c[1] - c[0]) + 6.0 * s * t * (c[2] - c[1]) + 3.0 * t * t * (c[3] - c[2])
}

/// Find `t` with `x(t) = x` for a Bezier whose x coefficients are
/// non-decreasing from 0 to 1. Newton first, bisection if it stalls.
fn solve_parameter(xs: &[f64; 4], x: f64) -> f64 {
    if x <= xs[0] {
        return 0.0;
    }
    if x >= xs[3] {
        return 1.0;
    }

    let mut t = x;
    for _ in 0..NEWTON_ITERATIONS {
        let err = bernstein(xs, t) - x;
        if err.abs() < SOLVE_EPSILON {
            return t;
        }
        let d = bernstein_derivative(xs, t);
        if d.abs() < 1e-9 {
            break;
        }
        t -= err / d;
        if !(0.0..=1.0).contains(&t) {
            break;
        }
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    t = x;
    for _ in 0..BISECTION_ITERATIONS {
        let v = bernstein(xs, t);
        if (v - x).abs() < SOLVE_EPSILON {
            break;
        }
        if v < x {
            lo = t;
        } else {
            hi = t;
        }
        t = 0.5 * (lo + hi);
    }
    t
}

/// De Casteljau subdivision at `t`.
fn split_points(p: &[Point2; 4], t: f64) -> ([Point2; 4], [Point2; 4]) {
    let p01 = p[0].lerp(p[1], t);
    let p12 = p[1].lerp(p[2], t);
    let p23 = p[2].lerp(p[3], t);
    let p012 = p01.lerp(p12, t);
    let p123 = p12.lerp(p23, t);
    let mid = p012.lerp(p123, t);
    ([p[0], p01, p012, mid], [mid, p123, p23, p[3]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_frame() -> SegmentFrame {
        SegmentFrame::new(dvec2(0.0, 0.0), dvec2(1.0, 1.0))
    }

    #[test]
    fn test_bezier_endpoints() {
        let frame = unit_frame();
        let curve = BezierCurve::from_offsets(&frame, dvec2(0.6, -0.4), dvec2(-0.1, 0.9));
        assert_eq!(curve.evaluate(&frame, 0.0, 0.3, 0.8), 0.3);
        assert_eq!(curve.evaluate(&frame, 1.0, 0.3, 0.8), 0.8);
    }

    #[test]
    fn test_canonical_bezier_is_straight() {
        let frame = unit_frame();
        let curve = BezierCurve::new(&frame);
        for i in 0..=10 {
            let p = i as f64 / 10.0;
            assert_abs_diff_eq!(curve.evaluate(&frame, p, 0.0, 1.0), p, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_solve_parameter_matches_x() {
        let xs = [0.0, 0.9, 0.1, 1.0];
        for i in 1..20 {
            let x = i as f64 / 20.0;
            let t = solve_parameter(&xs, x);
            assert_abs_diff_eq!(bernstein(&xs, t), x, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_ease_in_out_is_symmetric() {
        let frame = unit_frame();
        let curve = BezierCurve::from_offsets(&frame, dvec2(0.42, 0.0), dvec2(-0.42, 0.0));
        assert_abs_diff_eq!(curve.evaluate(&frame, 0.5, 0.0, 1.0), 0.5, epsilon = 1e-9);
        let a = curve.evaluate(&frame, 0.2, 0.0, 1.0);
        let b = curve.evaluate(&frame, 0.8, 0.0, 1.0);
        assert_abs_diff_eq!(a + b, 1.0, epsilon = 1e-9);
        assert!(a < 0.2);
    }

    #[test]
    fn test_split_preserves_shape() {
        let frame = unit_frame();
        let curve = BezierCurve::from_offsets(&frame, dvec2(0.5, 0.0), dvec2(-0.1, -0.6));
        let x = 0.35;
        let (boundary, first, second) = curve.split_at(&frame, x);
        assert_abs_diff_eq!(boundary.y, curve.evaluate(&frame, x, 0.0, 1.0), epsilon = 1e-9);

        let left_frame = SegmentFrame::new(frame.start, boundary);
        let right_frame = SegmentFrame::new(boundary, frame.end);
        for i in 0..=10 {
            let gx = x * i as f64 / 10.0;
            let expected = curve.evaluate(&frame, gx, 0.0, 1.0);
            let local = left_frame.local_progress(gx);
            let got = first.evaluate(&left_frame, local, left_frame.start.y, left_frame.end.y);
            assert_abs_diff_eq!(got, expected, epsilon = 1e-7);

            let gx = x + (1.0 - x) * i as f64 / 10.0;
            let expected = curve.evaluate(&frame, gx, 0.0, 1.0);
            let local = right_frame.local_progress(gx);
            let got = second.evaluate(&right_frame, local, right_frame.start.y, right_frame.end.y);
            assert_abs_diff_eq!(got, expected, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_mirrored_runs_backwards() {
        let frame = unit_frame();
        let curve = BezierCurve::from_offsets(&frame, dvec2(0.2, 0.7), dvec2(-0.5, 0.1));
        let mirrored_frame = frame.mirrored();
        let mirrored = curve.mirrored();
        for i in 0..=10 {
            let p = i as f64 / 10.0;
            let forward = curve.evaluate(&frame, p, 0.0, 1.0);
            let backward = mirrored.evaluate(&mirrored_frame, 1.0 - p, 1.0, 0.0);
            assert_abs_diff_eq!(forward, backward, epsilon = 1e-8);
        }
    }
}
