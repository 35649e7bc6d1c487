//! One piece of a composite curve: a frame in graph space plus a shape.
//!
//! Segments are owned by a [`NormalCurve`](crate::NormalCurve), which keeps
//! the neighbour links (`prev`/`next`, indices into its segment list) up to
//! date across every structural change.

use easel_math::{dvec2, GraphView, Point2, View};
use serde::{Deserialize, Serialize};

use crate::curve::{BezierCurve, BounceCurve, Curve, ElasticCurve, LinearCurve};
use crate::draw::{Graphics, HandleStyle};
use crate::frame::SegmentFrame;
use crate::handle::{BezierHandle, HandleSide};
use crate::input::KeyState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    Linear,
    Bezier,
    Elastic,
    Bounce,
}

impl SegmentKind {
    pub const ALL: [SegmentKind; 4] = [
        SegmentKind::Linear,
        SegmentKind::Bezier,
        SegmentKind::Elastic,
        SegmentKind::Bounce,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Linear(LinearCurve),
    Bezier(BezierCurve),
    Elastic(ElasticCurve),
    Bounce(BounceCurve),
}

impl Shape {
    pub fn kind(&self) -> SegmentKind {
        match self {
            Shape::Linear(_) => SegmentKind::Linear,
            Shape::Bezier(_) => SegmentKind::Bezier,
            Shape::Elastic(_) => SegmentKind::Elastic,
            Shape::Bounce(_) => SegmentKind::Bounce,
        }
    }

    fn default_for(kind: SegmentKind, frame: &SegmentFrame) -> Self {
        match kind {
            SegmentKind::Linear => Shape::Linear(LinearCurve),
            SegmentKind::Bezier => Shape::Bezier(BezierCurve::new(frame)),
            SegmentKind::Elastic => Shape::Elastic(ElasticCurve::default()),
            SegmentKind::Bounce => Shape::Bounce(BounceCurve::default()),
        }
    }
}

/// Which handle of a segment: a Bezier side, or the single parameter
/// handle of an elastic or bounce segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlePosition {
    Left,
    Right,
    Center,
}

impl From<HandleSide> for HandlePosition {
    fn from(side: HandleSide) -> Self {
        match side {
            HandleSide::Left => HandlePosition::Left,
            HandleSide::Right => HandlePosition::Right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    point_start: Point2,
    point_end: Point2,
    #[serde(skip)]
    prev: Option<usize>,
    #[serde(skip)]
    next: Option<usize>,
    shape: Shape,
}

impl Segment {
    pub fn new(kind: SegmentKind, point_start: Point2, point_end: Point2) -> Self {
        let frame = SegmentFrame::new(point_start, point_end);
        Self::with_shape(point_start, point_end, Shape::default_for(kind, &frame))
    }

    pub fn with_shape(point_start: Point2, point_end: Point2, shape: Shape) -> Self {
        let mut segment = Self {
            point_start,
            point_end,
            prev: None,
            next: None,
            shape,
        };
        segment.refit_handles();
        segment
    }

    pub fn kind(&self) -> SegmentKind {
        self.shape.kind()
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn shape_mut(&mut self) -> &mut Shape {
        &mut self.shape
    }

    pub fn point_start(&self) -> Point2 {
        self.point_start
    }

    pub fn point_end(&self) -> Point2 {
        self.point_end
    }

    pub fn frame(&self) -> SegmentFrame {
        SegmentFrame::new(self.point_start, self.point_end)
    }

    pub fn prev(&self) -> Option<usize> {
        self.prev
    }

    pub fn next(&self) -> Option<usize> {
        self.next
    }

    pub(crate) fn set_links(&mut self, prev: Option<usize>, next: Option<usize>) {
        self.prev = prev;
        self.next = next;
    }

    pub(crate) fn set_point_start(&mut self, point: Point2) {
        self.point_start = point;
        self.refit_handles();
    }

    pub(crate) fn set_point_end(&mut self, point: Point2) {
        self.point_end = point;
        self.refit_handles();
    }

    fn refit_handles(&mut self) {
        let frame = self.frame();
        if let Shape::Bezier(bezier) = &mut self.shape {
            bezier.refit(&frame);
        }
    }

    pub fn contains_x(&self, x: f64) -> bool {
        self.point_start.x <= x && x <= self.point_end.x
    }

    /// Value at graph x (clamped into the segment), in graph units.
    pub fn value_at(&self, x: f64) -> f64 {
        let frame = self.frame();
        self.curve_function(frame.local_progress(x), frame.start.y, frame.end.y)
    }

    /// Slope at graph x, in graph units.
    pub fn slope_at(&self, x: f64) -> f64 {
        let frame = self.frame();
        let w = frame.width();
        if w <= 0.0 {
            return 0.0;
        }
        self.get_velocity(frame.local_progress(x), frame.start.y, frame.end.y) / w
    }

    pub fn bezier(&self) -> Option<&BezierCurve> {
        match &self.shape {
            Shape::Bezier(bezier) => Some(bezier),
            _ => None,
        }
    }

    pub fn bezier_mut(&mut self) -> Option<&mut BezierCurve> {
        match &mut self.shape {
            Shape::Bezier(bezier) => Some(bezier),
            _ => None,
        }
    }

    pub fn bezier_handle(&self, side: HandleSide) -> Option<&BezierHandle> {
        self.bezier().map(|b| b.handle(side))
    }

    pub fn bezier_handle_mut(&mut self, side: HandleSide) -> Option<&mut BezierHandle> {
        self.bezier_mut().map(|b| b.handle_mut(side))
    }

    /// Split at graph x into two segments of the same kind. The boundary
    /// takes the curve's value at x. Returns `None` unless x lies strictly
    /// inside the segment.
    pub fn split_at(&self, x: f64) -> Option<(Segment, Segment)> {
        if !(self.point_start.x < x && x < self.point_end.x) {
            return None;
        }
        let frame = self.frame();
        let (first, second) = match &self.shape {
            Shape::Bezier(bezier) => {
                let (boundary, a, b) = bezier.split_at(&frame, x);
                (
                    Segment::with_shape(self.point_start, boundary, Shape::Bezier(a)),
                    Segment::with_shape(boundary, self.point_end, Shape::Bezier(b)),
                )
            }
            shape => {
                let boundary = dvec2(x, self.value_at(x));
                (
                    Segment::with_shape(self.point_start, boundary, shape.clone()),
                    Segment::with_shape(boundary, self.point_end, shape.clone()),
                )
            }
        };
        Some((first, second))
    }

    /// Join with the following segment. The result keeps this segment's
    /// kind; a Bezier keeps the outer handles of the pair where present.
    pub fn merged_with(&self, next: &Segment) -> Segment {
        let frame = SegmentFrame::new(self.point_start, next.point_end);
        let shape = match &self.shape {
            Shape::Bezier(bezier) => {
                let right = next
                    .bezier_handle(HandleSide::Right)
                    .map(|h| h.offset())
                    .unwrap_or_else(|| BezierHandle::canonical(HandleSide::Right, &frame).offset());
                Shape::Bezier(BezierCurve::from_offsets(
                    &frame,
                    bezier.handle_left.offset(),
                    right,
                ))
            }
            shape => shape.clone(),
        };
        Segment::with_shape(self.point_start, next.point_end, shape)
    }

    /// Mirror in time: the segment moves to `[1 - end.x, 1 - start.x]` and
    /// runs backwards.
    pub fn reverse(&mut self) {
        let frame = self.frame().mirrored();
        self.point_start = frame.start;
        self.point_end = frame.end;
        match &mut self.shape {
            Shape::Linear(_) => {}
            Shape::Bezier(bezier) => *bezier = bezier.mirrored(),
            Shape::Elastic(elastic) => elastic.reverse(),
            Shape::Bounce(bounce) => bounce.reverse(),
        }
    }

    /// Graph position of a handle tip, if the segment has that handle.
    pub fn handle_tip(&self, position: HandlePosition) -> Option<Point2> {
        let frame = self.frame();
        match (&self.shape, position) {
            (Shape::Bezier(b), HandlePosition::Left) => Some(b.handle_left.tip(&frame)),
            (Shape::Bezier(b), HandlePosition::Right) => Some(b.handle_right.tip(&frame)),
            (Shape::Elastic(e), HandlePosition::Center) => Some(e.tip(&frame)),
            (Shape::Bounce(b), HandlePosition::Center) => Some(b.tip(&frame)),
            _ => None,
        }
    }

    pub fn handle_positions(&self) -> &'static [HandlePosition] {
        match self.shape {
            Shape::Linear(_) => &[],
            Shape::Bezier(_) => &[HandlePosition::Left, HandlePosition::Right],
            Shape::Elastic(_) | Shape::Bounce(_) => &[HandlePosition::Center],
        }
    }

    /// First handle whose tip lies within `radius` screen pixels of `point`.
    pub fn hovered_handle(
        &self,
        point: Point2,
        radius: f64,
        view: &(impl View + ?Sized),
    ) -> Option<HandlePosition> {
        self.handle_positions().iter().copied().find(|&position| {
            self.handle_tip(position)
                .is_some_and(|tip| view.screen_distance(tip, point) <= radius)
        })
    }

    pub fn is_handle_hovered(
        &self,
        point: Point2,
        radius: f64,
        view: &(impl View + ?Sized),
    ) -> bool {
        self.hovered_handle(point, radius, view).is_some()
    }

    /// Begin dragging the handle under `point`, if any.
    pub fn handle_check_hover(
        &mut self,
        point: Point2,
        radius: f64,
        view: &(impl View + ?Sized),
        keys: KeyState,
    ) -> Option<HandlePosition> {
        let frame = self.frame();
        match &mut self.shape {
            Shape::Bezier(bezier) => {
                if bezier.handle_left.check_hover(point, &frame, radius, view, keys) {
                    Some(HandlePosition::Left)
                } else if bezier.handle_right.check_hover(point, &frame, radius, view, keys) {
                    Some(HandlePosition::Right)
                } else {
                    None
                }
            }
            Shape::Elastic(_) | Shape::Bounce(_) => self.hovered_handle(point, radius, view),
            Shape::Linear(_) => None,
        }
    }

    /// Drag a handle to `point`. Bezier handles only move while controlled.
    pub fn handle_update(
        &mut self,
        position: HandlePosition,
        point: Point2,
        view: &(impl View + ?Sized),
        keys: KeyState,
    ) -> bool {
        let frame = self.frame();
        match (&mut self.shape, position) {
            (Shape::Bezier(b), HandlePosition::Left) => {
                b.handle_left.update(point, &frame, view, keys)
            }
            (Shape::Bezier(b), HandlePosition::Right) => {
                b.handle_right.update(point, &frame, view, keys)
            }
            (Shape::Elastic(e), HandlePosition::Center) => {
                e.drag_tip(&frame, point);
                true
            }
            (Shape::Bounce(b), HandlePosition::Center) => {
                b.drag_tip(&frame, point);
                true
            }
            _ => false,
        }
    }

    pub fn handle_end_control(&mut self) {
        if let Shape::Bezier(bezier) = &mut self.shape {
            bezier.handle_left.end_control();
            bezier.handle_right.end_control();
        }
    }

    /// Emit the segment's handles in screen space.
    pub fn draw_handle(&self, graphics: &mut dyn Graphics, view: &GraphView, style: &HandleStyle) {
        if !style.visible {
            return;
        }
        let frame = self.frame();
        match &self.shape {
            Shape::Bezier(bezier) => {
                for handle in [&bezier.handle_left, &bezier.handle_right] {
                    let root = view.to_screen(handle.anchor(&frame));
                    let tip = view.to_screen(handle.tip(&frame));
                    draw_stick(graphics, root, tip, style);
                }
            }
            Shape::Elastic(_) | Shape::Bounce(_) => {
                if let Some(tip) = self.handle_tip(HandlePosition::Center) {
                    let tip = view.to_screen(tip);
                    graphics.draw_circle(tip, style.tip_radius, style.tip_thickness, style.color);
                }
            }
            Shape::Linear(_) => {}
        }
    }
}

/// Line from root to tip, a filled root dot and an outlined tip circle.
fn draw_stick(graphics: &mut dyn Graphics, root: Point2, tip: Point2, style: &HandleStyle) {
    let reach = tip - root;
    let length = reach.length();
    let line_end = if style.cutoff_line && length > style.tip_radius as f64 {
        tip - reach / length * style.tip_radius as f64
    } else {
        tip
    };
    if !style.cutoff_line || length > style.tip_radius as f64 {
        graphics.draw_line(root, line_end, style.thickness, style.color);
    }
    graphics.fill_circle(root, style.root_radius, style.color);
    graphics.draw_circle(tip, style.tip_radius, style.tip_thickness, style.color);
}

impl Curve for Segment {
    /// `progress` is local to the segment; `start`/`end` replace the
    /// segment's own end values.
    fn curve_function(&self, progress: f64, start: f64, end: f64) -> f64 {
        match &self.shape {
            Shape::Linear(linear) => linear.curve_function(progress, start, end),
            Shape::Bezier(bezier) => bezier.evaluate(&self.frame(), progress, start, end),
            Shape::Elastic(elastic) => elastic.curve_function(progress, start, end),
            Shape::Bounce(bounce) => bounce.curve_function(progress, start, end),
        }
    }

    fn clear(&mut self) {
        let frame = self.frame();
        match &mut self.shape {
            Shape::Linear(linear) => linear.clear(),
            Shape::Bezier(bezier) => bezier.clear(&frame),
            Shape::Elastic(elastic) => elastic.clear(),
            Shape::Bounce(bounce) => bounce.clear(),
        }
    }
}
