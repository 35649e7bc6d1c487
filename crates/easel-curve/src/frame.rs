//! The rectangle a segment occupies in graph space.

use easel_core::Tolerance;
use easel_math::{DVec2, Point2};

/// Start and end points of a segment, in graph coordinates
/// (x = normalized time, y = value).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentFrame {
    pub start: Point2,
    pub end: Point2,
}

impl SegmentFrame {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    pub fn width(&self) -> f64 {
        self.end.x - self.start.x
    }

    pub fn height(&self) -> f64 {
        self.end.y - self.start.y
    }

    pub fn is_flat(&self) -> bool {
        Tolerance::default().is_zero(self.height())
    }

    /// Height of the frame, or one when the frame is flat. Used wherever a
    /// value offset has to be expressed relative to the segment.
    pub fn value_span(&self) -> f64 {
        if self.is_flat() {
            1.0
        } else {
            self.height()
        }
    }

    /// Segment-local progress of graph x, clamped to `[0, 1]`.
    pub fn local_progress(&self, x: f64) -> f64 {
        let w = self.width();
        if w <= 0.0 {
            return 0.0;
        }
        ((x - self.start.x) / w).clamp(0.0, 1.0)
    }

    /// Graph point for a position given in the unit box of the frame.
    pub fn from_unit(&self, u: DVec2) -> Point2 {
        DVec2::new(
            self.start.x + u.x * self.width(),
            self.start.y + u.y * self.value_span(),
        )
    }

    /// Inverse of [`SegmentFrame::from_unit`].
    pub fn to_unit(&self, p: Point2) -> DVec2 {
        let w = self.width();
        let ux = if w > 0.0 { (p.x - self.start.x) / w } else { 0.0 };
        DVec2::new(ux, (p.y - self.start.y) / self.value_span())
    }

    /// Frame after mirroring time (`x -> 1 - x`): the old end becomes the start.
    pub fn mirrored(&self) -> Self {
        Self {
            start: DVec2::new(1.0 - self.end.x, self.end.y),
            end: DVec2::new(1.0 - self.start.x, self.start.y),
        }
    }
}
