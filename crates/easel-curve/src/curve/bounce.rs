//! A ball dropped onto the end value, bouncing with a fixed restitution.

use easel_math::{dvec2, lerp, Point2};
use serde::{Deserialize, Serialize};

use super::Curve;
use crate::frame::SegmentFrame;

const MAX_ELASTICITY: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BounceCurve {
    /// Coefficient of restitution in `[0, 0.95]`
    pub elasticity: f64,
    pub bounces: u32,
    pub reversed: bool,
}

impl BounceCurve {
    pub const DEFAULT_ELASTICITY: f64 = 0.5;
    pub const DEFAULT_BOUNCES: u32 = 3;

    pub fn new(elasticity: f64, bounces: u32) -> Self {
        Self {
            elasticity: elasticity.clamp(0.0, MAX_ELASTICITY),
            bounces,
            reversed: false,
        }
    }

    /// Duration of the initial fall; bounce `k` lasts `2 * fall * e^k`.
    fn fall_time(&self) -> f64 {
        let e = self.elasticity;
        let sum: f64 = (1..=self.bounces).map(|k| e.powi(k as i32)).sum();
        1.0 / (1.0 + 2.0 * sum)
    }

    fn forward(&self, p: f64) -> f64 {
        if p <= 0.0 {
            return 0.0;
        }
        if p >= 1.0 {
            return 1.0;
        }
        let e = self.elasticity;
        if e <= 0.0 || self.bounces == 0 {
            return p * p;
        }
        let t0 = self.fall_time();
        if p < t0 {
            let u = p / t0;
            return u * u;
        }
        let mut t = t0;
        for k in 1..=self.bounces {
            let half = t0 * e.powi(k as i32);
            if p <= t + 2.0 * half || k == self.bounces {
                let u = ((p - (t + half)) / half).clamp(-1.0, 1.0);
                return 1.0 - e.powi(2 * k as i32) * (1.0 - u * u);
            }
            t += 2.0 * half;
        }
        1.0
    }

    pub fn shape(&self, p: f64) -> f64 {
        if self.reversed {
            1.0 - self.forward(1.0 - p)
        } else {
            self.forward(p)
        }
    }

    pub fn reverse(&mut self) {
        self.reversed = !self.reversed;
    }

    /// Position of the parameter handle: the apex of the first bounce.
    pub fn tip(&self, frame: &SegmentFrame) -> Point2 {
        let t0 = self.fall_time();
        let e = self.elasticity;
        let apex = dvec2(t0 * (1.0 + e), 1.0 - e * e);
        let unit = if self.reversed {
            dvec2(1.0 - apex.x, 1.0 - apex.y)
        } else {
            apex
        };
        frame.from_unit(unit)
    }

    /// Set the elasticity from the dragged apex height; x is ignored.
    pub fn drag_tip(&mut self, frame: &SegmentFrame, point: Point2) {
        let u = frame.to_unit(point);
        let drop = if self.reversed { u.y } else { 1.0 - u.y };
        self.elasticity = drop.clamp(0.0, MAX_ELASTICITY * MAX_ELASTICITY).sqrt();
    }
}

impl Default for BounceCurve {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ELASTICITY, Self::DEFAULT_BOUNCES)
    }
}

impl Curve for BounceCurve {
    fn curve_function(&self, progress: f64, start: f64, end: f64) -> f64 {
        lerp(start, end, self.shape(progress))
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_bounce_endpoints() {
        for reversed in [false, true] {
            let mut curve = BounceCurve::default();
            curve.reversed = reversed;
            assert_eq!(curve.get_value(0.0, 3.0, 5.0), 3.0);
            assert_eq!(curve.get_value(1.0, 3.0, 5.0), 5.0);
        }
    }

    #[test]
    fn test_bounce_never_passes_end() {
        let curve = BounceCurve::new(0.7, 4);
        for i in 0..=200 {
            let v = curve.shape(i as f64 / 200.0);
            assert!(v <= 1.0 + 1e-12);
            assert!(v >= 0.0);
        }
    }

    #[test]
    fn test_bounce_touches_end_between_bounces() {
        let curve = BounceCurve::new(0.5, 2);
        let t0 = curve.fall_time();
        assert_abs_diff_eq!(curve.shape(t0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.shape(t0 * 2.0), 1.0, epsilon = 1e-12);
        // apex of the first bounce drops by e^2
        assert_abs_diff_eq!(curve.shape(t0 * 1.5), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_inelastic_bounce_is_a_fall() {
        let curve = BounceCurve::new(0.0, 3);
        assert_abs_diff_eq!(curve.shape(0.5), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_drag_tip_sets_elasticity() {
        let frame = SegmentFrame::new(dvec2(0.0, 0.0), dvec2(1.0, 1.0));
        let mut curve = BounceCurve::default();
        curve.drag_tip(&frame, dvec2(0.3, 1.0 - 0.36));
        assert_abs_diff_eq!(curve.elasticity, 0.6, epsilon = 1e-9);
        let tip = curve.tip(&frame);
        assert_abs_diff_eq!(tip.y, 0.64, epsilon = 1e-9);
    }
}
