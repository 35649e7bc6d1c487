/// Tolerances for comparisons in graph (domain) space.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Distance below which two graph coordinates are considered equal
    pub linear: f64,
    /// Narrowest segment a dragged boundary may leave behind
    pub gap: f64,
}

impl Tolerance {
    pub const DEFAULT_LINEAR: f64 = 1e-9;
    pub const DEFAULT_GAP: f64 = 1e-4;

    pub fn new(linear: f64, gap: f64) -> Self {
        Self { linear, gap }
    }

    /// Check if a value is zero within linear tolerance
    pub fn is_zero(self, v: f64) -> bool {
        v.abs() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LINEAR, Self::DEFAULT_GAP)
    }
}
