use crate::{DVec2, Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Domain-to-screen scaling of the graph area.
///
/// Hit testing and the visual angle/length of handles are computed in
/// screen units, so that a circular hover zone stays circular when the
/// two axes are zoomed independently.
pub trait View {
    /// Screen pixels per graph unit along x.
    fn scale_x(&self) -> f64;

    /// Screen pixels per graph unit along y.
    fn scale_y(&self) -> f64;

    /// Scale a graph-space vector into screen units (y keeps its sign).
    fn to_screen_vector(&self, v: Vector2) -> Vector2 {
        DVec2::new(v.x * self.scale_x(), v.y * self.scale_y())
    }

    /// Inverse of [`View::to_screen_vector`].
    fn to_graph_vector(&self, v: Vector2) -> Vector2 {
        DVec2::new(v.x / self.scale_x(), v.y / self.scale_y())
    }

    /// Length of a graph-space vector as it appears on screen.
    fn screen_length(&self, v: Vector2) -> f64 {
        self.to_screen_vector(v).length()
    }

    /// Angle of a graph-space vector as it appears on screen.
    fn screen_angle(&self, v: Vector2) -> f64 {
        let s = self.to_screen_vector(v);
        s.y.atan2(s.x)
    }

    /// Graph-space vector with the given on-screen length and angle.
    fn from_screen_polar(&self, length: f64, angle: f64) -> Vector2 {
        self.to_graph_vector(DVec2::new(length * angle.cos(), length * angle.sin()))
    }

    /// Distance between two graph-space points, measured on screen.
    fn screen_distance(&self, a: Point2, b: Point2) -> f64 {
        self.screen_length(b - a)
    }
}

/// Concrete view of the graph area: `origin` is where graph (0, 0) lands
/// on screen, `scale` is pixels per graph unit. Screen y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    pub origin: Point2,
    pub scale: Vector2,
}

impl GraphView {
    pub fn new(origin: Point2, scale: Vector2) -> Self {
        Self { origin, scale }
    }

    /// A view with the graph square fitted into a `width` x `height` client
    /// area and `padding` pixels on every side.
    pub fn fit(width: f64, height: f64, padding: f64) -> Self {
        let inner = DVec2::new(width - 2.0 * padding, height - 2.0 * padding).max(DVec2::ONE);
        Self {
            origin: DVec2::new(padding, height - padding),
            scale: inner,
        }
    }

    pub fn to_screen(&self, p: Point2) -> Point2 {
        DVec2::new(
            self.origin.x + p.x * self.scale.x,
            self.origin.y - p.y * self.scale.y,
        )
    }

    pub fn to_graph(&self, p: Point2) -> Point2 {
        DVec2::new(
            (p.x - self.origin.x) / self.scale.x,
            (self.origin.y - p.y) / self.scale.y,
        )
    }

    /// Zoom each axis independently around a fixed screen point.
    pub fn zoom(&mut self, factor: Vector2, anchor: Point2) {
        let graph_anchor = self.to_graph(anchor);
        self.scale *= factor;
        let moved = self.to_screen(graph_anchor);
        self.origin += anchor - moved;
    }
}

impl Default for GraphView {
    fn default() -> Self {
        Self::new(DVec2::ZERO, DVec2::ONE)
    }
}

impl View for GraphView {
    fn scale_x(&self) -> f64 {
        self.scale.x
    }

    fn scale_y(&self) -> f64 {
        self.scale.y
    }
}
