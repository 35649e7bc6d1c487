//! The curve evaluation contract and the segment shapes that implement it.

mod bezier;
mod bounce;
mod elastic;
mod linear;

pub use bezier::BezierCurve;
pub use bounce::BounceCurve;
pub use elastic::ElasticCurve;
pub use linear::LinearCurve;

/// Step of the symmetric difference used by [`Curve::get_velocity`].
pub const VELOCITY_STEP: f64 = 1e-4;

/// Maps normalized progress to a value between `start` and `end`.
pub trait Curve {
    /// Evaluate the curve at `progress` in `[0, 1]`.
    fn curve_function(&self, progress: f64, start: f64, end: f64) -> f64;

    /// Evaluate the curve with `progress` saturated to `[0, 1]`.
    fn get_value(&self, progress: f64, start: f64, end: f64) -> f64 {
        self.curve_function(progress.clamp(0.0, 1.0), start, end)
    }

    /// Rate of change of [`Curve::get_value`] at `progress`.
    ///
    /// Sample points are clamped to `[0, 1]`, so the difference becomes
    /// one-sided at either end of the domain.
    fn get_velocity(&self, progress: f64, start: f64, end: f64) -> f64 {
        let lo = (progress - VELOCITY_STEP).clamp(0.0, 1.0);
        let hi = (progress + VELOCITY_STEP).clamp(0.0, 1.0);
        if hi <= lo {
            return 0.0;
        }
        (self.get_value(hi, start, end) - self.get_value(lo, start, end)) / (hi - lo)
    }

    /// Reset to the default shape.
    fn clear(&mut self);
}
