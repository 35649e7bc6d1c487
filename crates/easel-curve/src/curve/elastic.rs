//! Damped oscillation settling onto the end value.

use std::f64::consts::TAU;

use easel_math::{dvec2, lerp, Point2};
use serde::{Deserialize, Serialize};

use super::Curve;
use crate::frame::SegmentFrame;

/// Shortest half period the parameter handle can set, as a fraction of the segment.
const MIN_HALF_PERIOD: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElasticCurve {
    /// Share of the motion that oscillates, in `[0, 1]`
    pub amplitude: f64,
    /// Oscillations over the whole segment
    pub frequency: f64,
    /// Exponential damping rate
    pub decay: f64,
    /// Time-reversed shape: oscillation before reaching the end value
    pub reversed: bool,
}

impl ElasticCurve {
    pub const DEFAULT_AMPLITUDE: f64 = 1.0;
    pub const DEFAULT_FREQUENCY: f64 = 3.0;
    pub const DEFAULT_DECAY: f64 = 3.0;

    pub fn new(amplitude: f64, frequency: f64, decay: f64) -> Self {
        Self {
            amplitude: amplitude.clamp(0.0, 1.0),
            frequency: frequency.max(f64::EPSILON),
            decay: decay.max(0.0),
            reversed: false,
        }
    }

    fn forward(&self, p: f64) -> f64 {
        if p <= 0.0 {
            return 0.0;
        }
        if p >= 1.0 {
            return 1.0;
        }
        let wave = (1.0 - self.amplitude) + self.amplitude * (TAU * self.frequency * p).cos();
        1.0 - (1.0 - p) * (-self.decay * p).exp() * wave
    }

    /// Normalized shape: 0 at `p = 0`, 1 at `p = 1`.
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

    fn half_period(&self) -> f64 {
        (0.5 / self.frequency).clamp(MIN_HALF_PERIOD, 1.0)
    }

    /// Position of the parameter handle: the first overshoot peak, with
    /// height given by the amplitude.
    pub fn tip(&self, frame: &SegmentFrame) -> Point2 {
        let hp = self.half_period();
        let unit = if self.reversed {
            dvec2(1.0 - hp, -self.amplitude)
        } else {
            dvec2(hp, 1.0 + self.amplitude)
        };
        frame.from_unit(unit)
    }

    /// Set frequency and amplitude from a dragged handle position.
    pub fn drag_tip(&mut self, frame: &SegmentFrame, point: Point2) {
        let u = frame.to_unit(point);
        let (hp, amplitude) = if self.reversed {
            (1.0 - u.x, -u.y)
        } else {
            (u.x, u.y - 1.0)
        };
        self.frequency = 0.5 / hp.clamp(MIN_HALF_PERIOD, 1.0);
        self.amplitude = amplitude.clamp(0.0, 1.0);
    }
}

impl Default for ElasticCurve {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_AMPLITUDE,
            Self::DEFAULT_FREQUENCY,
            Self::DEFAULT_DECAY,
        )
    }
}

impl Curve for ElasticCurve {
    fn curve_function(&self, progress: f64, start: f64, end: f64) -> f64 {
        lerp(start, end, self.shape(progress))
    }

    fn clear(&mut self) {
        *self = Self::default();
    }
}
