//! The closed set of modifiers. Each one wraps a [`CurveFunction`] in a new
//! function and leaves the original untouched.

use std::f64::consts::TAU;

use easel_core::traits::Validate;
use easel_core::{EaselError, Result};
use serde::{Deserialize, Serialize};

use crate::function::CurveFunction;

/// A pure transform from one curve function to another.
pub trait Convert {
    fn convert(&self, function: &CurveFunction) -> CurveFunction;
}

/// Samples progress on a fixed grid and rounds the output to fixed levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Discretizer {
    pub sampling_resolution: u32,
    pub quantization_resolution: u32,
}

impl Discretizer {
    pub const DEFAULT_RESOLUTION: u32 = 10;

    pub fn new(sampling_resolution: u32, quantization_resolution: u32) -> Self {
        Self {
            sampling_resolution,
            quantization_resolution,
        }
    }

    /// Progress held at the start of its sampling step. Step `i` of `n` maps
    /// to `i / (n - 1)`, so the last step reaches 1.
    pub fn step_progress(&self, progress: f64) -> f64 {
        let n = self.sampling_resolution.max(1);
        if n == 1 {
            return 0.0;
        }
        let p = progress.clamp(0.0, 1.0);
        let index = ((p * n as f64).floor() as u32).min(n - 1);
        index as f64 / (n - 1) as f64
    }

    /// Round `value` to the nearest of `quantization_resolution` levels
    /// spread evenly from `start` to `end`. Values outside the range snap
    /// to the same grid extended past it.
    pub fn quantize(&self, value: f64, start: f64, end: f64) -> f64 {
        let span = end - start;
        if span == 0.0 {
            return value;
        }
        let q = self.quantization_resolution.max(1);
        if q == 1 {
            return start;
        }
        let steps = (q - 1) as f64;
        let level = ((value - start) / span * steps).round();
        start + span * level / steps
    }
}

impl Default for Discretizer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RESOLUTION, Self::DEFAULT_RESOLUTION)
    }
}

impl Convert for Discretizer {
    fn convert(&self, function: &CurveFunction) -> CurveFunction {
        let this = *self;
        let function = function.clone();
        CurveFunction::new(move |progress, start, end| {
            let value = function.call(this.step_progress(progress), start, end);
            this.quantize(value, start, end)
        })
    }
}

impl Validate for Discretizer {
    fn validate(&self) -> Result<()> {
        if self.sampling_resolution == 0 || self.quantization_resolution == 0 {
            return Err(EaselError::OutOfRange(format!(
                "discretizer resolutions must be positive, got {} x {}",
                self.sampling_resolution, self.quantization_resolution
            )));
        }
        Ok(())
    }
}

/// Deterministic smooth value noise added on top of the curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Noise {
    /// Fraction of the value range
    pub amplitude: f64,
    /// Lattice cells over `[0, 1]`
    pub frequency: f64,
    pub seed: u32,
}

impl Noise {
    pub fn new(amplitude: f64, frequency: f64, seed: u32) -> Self {
        Self {
            amplitude,
            frequency,
            seed,
        }
    }

    /// Noise in `[-1, 1]` at `x` lattice units.
    pub fn sample(&self, x: f64) -> f64 {
        let cell = x.floor();
        let t = x - cell;
        let s = t * t * (3.0 - 2.0 * t);
        let i = cell as i64;
        let a = lattice(i, self.seed);
        let b = lattice(i.wrapping_add(1), self.seed);
        a + (b - a) * s
    }
}

impl Default for Noise {
    fn default() -> Self {
        Self::new(0.1, 8.0, 0)
    }
}

impl Convert for Noise {
    fn convert(&self, function: &CurveFunction) -> CurveFunction {
        let this = *self;
        let function = function.clone();
        CurveFunction::new(move |progress, start, end| {
            let offset = this.sample(progress * this.frequency);
            function.call(progress, start, end) + (end - start) * this.amplitude * offset
        })
    }
}

/// Hash of a lattice index, mapped to `[-1, 1]`.
fn lattice(i: i64, seed: u32) -> f64 {
    let mut h = (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ u64::from(seed).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
    h ^= h >> 33;
    h = h.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    h ^= h >> 33;
    h = h.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    h ^= h >> 33;
    (h >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SineWave {
    pub amplitude: f64,
    /// Periods over `[0, 1]`
    pub frequency: f64,
    /// In periods
    pub phase: f64,
}

impl SineWave {
    pub fn new(amplitude: f64, frequency: f64, phase: f64) -> Self {
        Self {
            amplitude,
            frequency,
            phase,
        }
    }

    pub fn sample(&self, progress: f64) -> f64 {
        (TAU * (self.frequency * progress + self.phase)).sin()
    }
}

impl Default for SineWave {
    fn default() -> Self {
        Self::new(0.1, 4.0, 0.0)
    }
}

impl Convert for SineWave {
    fn convert(&self, function: &CurveFunction) -> CurveFunction {
        let this = *self;
        let function = function.clone();
        CurveFunction::new(move |progress, start, end| {
            let offset = (end - start) * this.amplitude * this.sample(progress);
            function.call(progress, start, end) + offset
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SquareWave {
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
}

impl SquareWave {
    pub fn new(amplitude: f64, frequency: f64, phase: f64) -> Self {
        Self {
            amplitude,
            frequency,
            phase,
        }
    }

    /// +1 over the first half of each period, -1 over the second.
    pub fn sample(&self, progress: f64) -> f64 {
        let cycle = self.frequency * progress + self.phase;
        if cycle - cycle.floor() < 0.5 {
            1.0
        } else {
            -1.0
        }
    }
}

impl Default for SquareWave {
    fn default() -> Self {
        Self::new(0.1, 4.0, 0.0)
    }
}

impl Convert for SquareWave {
    fn convert(&self, function: &CurveFunction) -> CurveFunction {
        let this = *self;
        let function = function.clone();
        CurveFunction::new(move |progress, start, end| {
            let offset = (end - start) * this.amplitude * this.sample(progress);
            function.call(progress, start, end) + offset
        })
    }
}

fn check_wave(name: &str, amplitude: f64, frequency: f64, phase: f64) -> Result<()> {
    if !(amplitude.is_finite() && phase.is_finite()) {
        return Err(EaselError::OutOfRange(format!("{} parameters must be finite", name)));
    }
    if !(frequency.is_finite() && frequency > 0.0) {
        return Err(EaselError::OutOfRange(format!(
            "{} frequency must be positive, got {}",
            name, frequency
        )));
    }
    Ok(())
}

/// Tagged union of every modifier, as stored in a chain and on disk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Modifier {
    Discretizer(Discretizer),
    Noise(Noise),
    SineWave(SineWave),
    SquareWave(SquareWave),
}

impl Modifier {
    pub fn name(&self) -> &'static str {
        match self {
            Modifier::Discretizer(_) => "Discretizer",
            Modifier::Noise(_) => "Noise",
            Modifier::SineWave(_) => "SineWave",
            Modifier::SquareWave(_) => "SquareWave",
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| EaselError::Serialization(e.to_string()))
    }

    /// Decode and validate a modifier written by [`Modifier::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let modifier: Modifier =
            bincode::deserialize(bytes).map_err(|e| EaselError::Serialization(e.to_string()))?;
        modifier.validate()?;
        Ok(modifier)
    }
}

impl Convert for Modifier {
    fn convert(&self, function: &CurveFunction) -> CurveFunction {
        match self {
            Modifier::Discretizer(m) => m.convert(function),
            Modifier::Noise(m) => m.convert(function),
            Modifier::SineWave(m) => m.convert(function),
            Modifier::SquareWave(m) => m.convert(function),
        }
    }
}

impl Validate for Modifier {
    fn validate(&self) -> Result<()> {
        match self {
            Modifier::Discretizer(m) => m.validate(),
            Modifier::Noise(m) => check_wave("noise", m.amplitude, m.frequency, 0.0),
            Modifier::SineWave(m) => check_wave("sine wave", m.amplitude, m.frequency, m.phase),
            Modifier::SquareWave(m) => check_wave("square wave", m.amplitude, m.frequency, m.phase),
        }
    }
}

impl From<Discretizer> for Modifier {
    fn from(m: Discretizer) -> Self {
        Modifier::Discretizer(m)
    }
}

impl From<Noise> for Modifier {
    fn from(m: Noise) -> Self {
        Modifier::Noise(m)
    }
}

impl From<SineWave> for Modifier {
    fn from(m: SineWave) -> Self {
        Modifier::SineWave(m)
    }
}

impl From<SquareWave> for Modifier {
    fn from(m: SquareWave) -> Self {
        Modifier::SquareWave(m)
    }
}
