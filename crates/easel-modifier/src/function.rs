use std::fmt;
use std::sync::Arc;

use easel_curve::Curve;

type CurveFn = dyn Fn(f64, f64, f64) -> f64 + Send + Sync;

/// A detached evaluation function `(progress, start, end) -> value`.
///
/// Cloning is cheap; clones share the same closure. A function built from a
/// curve holds a snapshot, so later edits to the curve do not leak into it.
#[derive(Clone)]
pub struct CurveFunction {
    inner: Arc<CurveFn>,
}

impl CurveFunction {
    pub fn new(f: impl Fn(f64, f64, f64) -> f64 + Send + Sync + 'static) -> Self {
        Self { inner: Arc::new(f) }
    }

    /// Snapshot of `curve`, evaluated through [`Curve::get_value`].
    pub fn from_curve<C>(curve: &C) -> Self
    where
        C: Curve + Clone + Send + Sync + 'static,
    {
        let curve = curve.clone();
        Self::new(move |progress, start, end| curve.get_value(progress, start, end))
    }

    /// Straight interpolation from `start` to `end`.
    pub fn linear() -> Self {
        Self::new(|progress, start, end| {
            let p = progress.clamp(0.0, 1.0);
            start * (1.0 - p) + end * p
        })
    }

    pub fn call(&self, progress: f64, start: f64, end: f64) -> f64 {
        (self.inner)(progress, start, end)
    }

    /// `n` evenly spaced values over `[0, 1]`.
    pub fn sample(&self, n: usize, start: f64, end: f64) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![self.call(0.0, start, end)],
            _ => (0..n)
                .map(|i| self.call(i as f64 / (n - 1) as f64, start, end))
                .collect(),
        }
    }
}

impl fmt::Debug for CurveFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurveFunction").finish_non_exhaustive()
    }
}
