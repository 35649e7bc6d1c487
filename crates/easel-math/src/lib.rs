pub mod color;
pub mod view;

pub use glam::{dvec2, DVec2};
pub use color::ColorF;
pub use view::{GraphView, View};

pub type Point2 = DVec2;
pub type Vector2 = DVec2;

/// Sign of `v` with zero mapped to zero.
pub fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Interpolate between `a` and `b`; exact at both `t = 0` and `t = 1`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}
