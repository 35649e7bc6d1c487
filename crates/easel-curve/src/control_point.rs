//! A draggable point with a hover zone measured in screen space.

use easel_math::{Point2, View};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlPoint {
    point: Point2,
    #[serde(skip)]
    controlled: bool,
}

impl ControlPoint {
    pub fn new(point: Point2) -> Self {
        Self {
            point,
            controlled: false,
        }
    }

    pub fn point(&self) -> Point2 {
        self.point
    }

    pub fn x(&self) -> f64 {
        self.point.x
    }

    pub fn y(&self) -> f64 {
        self.point.y
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled
    }

    pub fn move_to(&mut self, point: Point2) {
        self.point = point;
    }

    /// Whether `point` lies within `radius` screen pixels of this point.
    pub fn is_hovered(&self, point: Point2, radius: f64, view: &(impl View + ?Sized)) -> bool {
        view.screen_distance(self.point, point) <= radius
    }

    /// Start controlling the point if `point` hovers it.
    pub fn check_hover(&mut self, point: Point2, radius: f64, view: &(impl View + ?Sized)) -> bool {
        self.controlled = self.is_hovered(point, radius, view);
        self.controlled
    }

    pub fn begin_control(&mut self) {
        self.controlled = true;
    }

    pub fn end_control(&mut self) {
        self.controlled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_math::{dvec2, GraphView};

    #[test]
    fn test_hover_zone_is_circular_on_screen() {
        // x zoomed 10x more than y: the same 5px reach covers 0.05 in x but 0.5 in y
        let view = GraphView::new(dvec2(0.0, 0.0), dvec2(100.0, 10.0));
        let cp = ControlPoint::new(dvec2(0.0, 0.0));
        assert!(cp.is_hovered(dvec2(0.05, 0.0), 5.0, &view));
        assert!(cp.is_hovered(dvec2(0.0, 0.5), 5.0, &view));
        assert!(!cp.is_hovered(dvec2(0.06, 0.0), 5.0, &view));
        assert!(!cp.is_hovered(dvec2(0.04, 0.4), 5.0, &view));
    }

    #[test]
    fn test_check_hover_sets_control() {
        let view = GraphView::new(dvec2(0.0, 0.0), dvec2(100.0, 100.0));
        let mut cp = ControlPoint::new(dvec2(0.5, 0.5));
        assert!(!cp.check_hover(dvec2(0.0, 0.0), 5.0, &view));
        assert!(!cp.is_controlled());
        assert!(cp.check_hover(dvec2(0.52, 0.5), 5.0, &view));
        assert!(cp.is_controlled());
        cp.end_control();
        assert!(!cp.is_controlled());
    }
}
