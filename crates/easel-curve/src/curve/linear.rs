//! Straight-line segment shape.

use easel_math::lerp;
use serde::{Deserialize, Serialize};

use super::Curve;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearCurve;

impl Curve for LinearCurve {
    fn curve_function(&self, progress: f64, start: f64, end: f64) -> f64 {
        lerp(start, end, progress)
    }

    fn clear(&mut self) {}
}
