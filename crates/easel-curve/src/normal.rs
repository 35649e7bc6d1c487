//! Composite curve: an ordered run of segments covering `[0, 1]`.
//!
//! Segment `i` ends exactly where segment `i + 1` starts, the first segment
//! starts at x = 0 and the last ends at x = 1. Every structural mutation
//! either keeps this partition intact or is rejected without touching the
//! curve.

use easel_core::traits::Validate;
use easel_core::{EaselError, EditorConfig, Result, Tolerance};
use easel_math::{dvec2, lerp, GraphView, Point2, View};
use serde::{Deserialize, Serialize};

use crate::curve::Curve;
use crate::draw::{Graphics, HandleStyle};
use crate::handle::{BezierHandle, HandleSide};
use crate::input::KeyState;
use crate::segment::{HandlePosition, Segment, SegmentKind, Shape};

/// Suggested `min_width_px` for [`NormalCurve::try_add_curve_min_width`].
pub const MIN_SEGMENT_WIDTH_PX: f64 = 1.0;

/// Identifies one handle of one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleAddress {
    pub index: usize,
    pub position: HandlePosition,
}

impl HandleAddress {
    pub fn new(index: usize, position: HandlePosition) -> Self {
        Self { index, position }
    }

    fn side(self) -> Option<HandleSide> {
        match self.position {
            HandlePosition::Left => Some(HandleSide::Left),
            HandlePosition::Right => Some(HandleSide::Right),
            HandlePosition::Center => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Segment>", into = "Vec<Segment>")]
pub struct NormalCurve {
    segments: Vec<Segment>,
    /// Boundary index being dragged (0 = start of the curve, `len()` = end)
    active_point: Option<usize>,
    active_handle: Option<HandleAddress>,
}

impl NormalCurve {
    /// A single Bezier segment from (0, 0) to (1, 1).
    pub fn new() -> Self {
        Self::with_kind(SegmentKind::Bezier)
    }

    pub fn with_kind(kind: SegmentKind) -> Self {
        Self::single(Segment::new(kind, dvec2(0.0, 0.0), dvec2(1.0, 1.0)))
    }

    fn single(segment: Segment) -> Self {
        let mut curve = Self {
            segments: vec![segment],
            active_point: None,
            active_handle: None,
        };
        curve.relink();
        curve
    }

    /// Build from explicit segments, rejecting anything that is not a
    /// partition of `[0, 1]`.
    pub fn from_segments(segments: Vec<Segment>) -> Result<Self> {
        let mut curve = Self {
            segments,
            active_point: None,
            active_handle: None,
        };
        curve.validate()?;
        curve.relink();
        Ok(curve)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Mutable access for editing a segment's shape parameters.
    pub fn segment_mut(&mut self, index: usize) -> Option<&mut Segment> {
        self.segments.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// All boundary points, from x = 0 to x = 1.
    pub fn boundaries(&self) -> Vec<Point2> {
        (0..=self.segments.len())
            .filter_map(|j| self.boundary(j))
            .collect()
    }

    fn boundary(&self, j: usize) -> Option<Point2> {
        if j == 0 {
            self.segments.first().map(|s| s.point_start())
        } else {
            self.segments.get(j - 1).map(|s| s.point_end())
        }
    }

    /// Index of the segment whose x range contains `x`. A shared boundary
    /// belongs to the later segment, except x = 1 which belongs to the last.
    pub fn segment_index_at(&self, x: f64) -> usize {
        let last = self.segments.len().saturating_sub(1);
        self.segments
            .partition_point(|s| s.point_end().x <= x)
            .min(last)
    }

    pub fn active_point(&self) -> Option<usize> {
        self.active_point
    }

    pub fn active_handle(&self) -> Option<HandleAddress> {
        self.active_handle
    }

    /// `n` evenly spaced values over `[0, 1]`, for drawing the curve.
    pub fn sample(&self, n: usize, start: f64, end: f64) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![self.get_value(0.0, start, end)],
            _ => (0..n)
                .map(|i| self.get_value(i as f64 / (n - 1) as f64, start, end))
                .collect(),
        }
    }

    /// Recompute neighbour links and the handle pairs across each joint.
    fn relink(&mut self) {
        let n = self.segments.len();
        let kinds: Vec<SegmentKind> = self.segments.iter().map(|s| s.kind()).collect();
        for (i, segment) in self.segments.iter_mut().enumerate() {
            let prev = i.checked_sub(1);
            let next = (i + 1 < n).then_some(i + 1);
            segment.set_links(prev, next);

            let left_opposite = prev
                .filter(|&p| kinds[p] == SegmentKind::Bezier)
                .map(|p| HandleAddress::new(p, HandlePosition::Right));
            let right_opposite = next
                .filter(|&q| kinds[q] == SegmentKind::Bezier)
                .map(|q| HandleAddress::new(q, HandlePosition::Left));
            if let Some(bezier) = segment.bezier_mut() {
                bezier.handle_left.set_opposite(left_opposite);
                bezier.handle_right.set_opposite(right_opposite);
            }
        }
    }

    /// Drop any drag in progress; indices may be stale after a structural change.
    fn reset_interaction(&mut self) {
        self.active_point = None;
        if self.active_handle.take().is_some() {
            for segment in &mut self.segments {
                segment.handle_end_control();
            }
        }
    }

    /// Split the segment under `point.x` in two at that x. Fails only when
    /// x is outside `(0, 1)` or lands on an existing boundary.
    pub fn try_add_curve(&mut self, point: Point2, view: &(impl View + ?Sized)) -> Result<usize> {
        self.try_add_curve_min_width(point, 0.0, view)
    }

    /// Like [`Self::try_add_curve`], and also rejects splits that leave a
    /// segment narrower than `min_width_px` screen pixels at the current
    /// zoom. [`MIN_SEGMENT_WIDTH_PX`] is the usual choice for interactive
    /// clicks.
    pub fn try_add_curve_min_width(
        &mut self,
        point: Point2,
        min_width_px: f64,
        view: &(impl View + ?Sized),
    ) -> Result<usize> {
        let x = point.x;
        if !(0.0 < x && x < 1.0) {
            return Err(EaselError::OutOfRange(format!("x = {} is outside (0, 1)", x)));
        }
        let index = self.segment_index_at(x);
        let segment = &self.segments[index];
        let (left, right) = (x - segment.point_start().x, segment.point_end().x - x);
        let linear = Tolerance::default().linear;
        if left < linear || right < linear {
            return Err(EaselError::InvalidOperation(format!(
                "x = {} coincides with a boundary of segment {}",
                x, index
            )));
        }
        if min_width_px > 0.0 && view.scale_x() > 0.0 {
            let min_width = min_width_px / view.scale_x();
            if left < min_width || right < min_width {
                return Err(EaselError::InvalidOperation(format!(
                    "x = {} is within {} px of a boundary of segment {}",
                    x, min_width_px, index
                )));
            }
        }
        let (first, second) = segment.split_at(x).ok_or_else(|| {
            EaselError::Geometry(format!("segment {} cannot split at {}", index, x))
        })?;

        self.reset_interaction();
        self.segments.splice(index..=index, [first, second]);
        self.relink();
        log::debug!("split segment {} at x = {}", index, x);
        Ok(index + 1)
    }

    pub fn add_curve(&mut self, point: Point2, view: &(impl View + ?Sized)) -> bool {
        match self.try_add_curve(point, view) {
            Ok(_) => true,
            Err(e) => {
                log::debug!("add_curve rejected: {}", e);
                false
            }
        }
    }

    /// Remove the interior boundary nearest `point` within `hit_radius`
    /// screen pixels, merging its two segments. Returns the merged index.
    pub fn try_delete_curve(
        &mut self,
        point: Point2,
        hit_radius: f64,
        view: &(impl View + ?Sized),
    ) -> Result<usize> {
        if self.segments.len() <= 1 {
            return Err(EaselError::InvalidOperation(
                "cannot delete the only segment".into(),
            ));
        }
        let (j, _) = (1..self.segments.len())
            .map(|j| (j, view.screen_distance(self.segments[j].point_start(), point)))
            .filter(|&(_, d)| d <= hit_radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or_else(|| EaselError::NotFound("no boundary within hit radius".into()))?;

        let merged = self.segments[j - 1].merged_with(&self.segments[j]);
        self.reset_interaction();
        self.segments.splice(j - 1..=j, [merged]);
        self.relink();
        log::debug!("merged segments {} and {}", j - 1, j);
        Ok(j - 1)
    }

    pub fn delete_curve(
        &mut self,
        point: Point2,
        hit_radius: f64,
        view: &(impl View + ?Sized),
    ) -> bool {
        match self.try_delete_curve(point, hit_radius, view) {
            Ok(_) => true,
            Err(e) => {
                log::debug!("delete_curve rejected: {}", e);
                false
            }
        }
    }

    /// Swap the segment at `index` for a default segment of `kind` over the
    /// same frame.
    pub fn try_replace_curve(&mut self, index: usize, kind: SegmentKind) -> Result<()> {
        let segment = self.segments.get(index).ok_or_else(|| {
            EaselError::OutOfRange(format!(
                "segment index {} out of {}",
                index,
                self.segments.len()
            ))
        })?;
        let replacement = Segment::new(kind, segment.point_start(), segment.point_end());
        self.reset_interaction();
        self.segments[index] = replacement;
        self.relink();
        log::debug!("replaced segment {} with {:?}", index, kind);
        Ok(())
    }

    pub fn replace_curve(&mut self, index: usize, kind: SegmentKind) -> bool {
        match self.try_replace_curve(index, kind) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("replace_curve rejected: {}", e);
                false
            }
        }
    }

    /// Mirror the whole curve in time: `new.get_value(p) == old.get_value(1 - p)`.
    pub fn reverse(&mut self) {
        self.reset_interaction();
        self.segments.reverse();
        for segment in &mut self.segments {
            segment.reverse();
        }
        self.relink();
        log::debug!("reversed curve with {} segments", self.segments.len());
    }

    // ── Points ─────────────────────────────────────────────────────

    fn hovered_point(
        &self,
        point: Point2,
        radius: f64,
        view: &(impl View + ?Sized),
    ) -> Option<usize> {
        (0..=self.segments.len())
            .filter_map(|j| self.boundary(j).map(|p| (j, view.screen_distance(p, point))))
            .filter(|&(_, d)| d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(j, _)| j)
    }

    pub fn is_point_hovered(
        &self,
        point: Point2,
        radius: f64,
        view: &(impl View + ?Sized),
    ) -> bool {
        self.hovered_point(point, radius, view).is_some()
    }

    /// Begin dragging the boundary under `point`, if any.
    pub fn point_check_hover(
        &mut self,
        point: Point2,
        radius: f64,
        view: &(impl View + ?Sized),
    ) -> Option<usize> {
        self.active_point = self.hovered_point(point, radius, view);
        self.active_point
    }

    pub fn point_begin_move(&mut self, j: usize) -> bool {
        if j > self.segments.len() {
            return false;
        }
        self.active_point = Some(j);
        true
    }

    /// Move the dragged boundary towards `point`.
    pub fn point_update(&mut self, point: Point2) -> Option<usize> {
        let j = self.active_point?;
        self.point_move(j, point).then_some(j)
    }

    /// Move boundary `j`. Interior boundaries stay strictly between their
    /// neighbours; the outer ends only move vertically.
    pub fn point_move(&mut self, j: usize, point: Point2) -> bool {
        let n = self.segments.len();
        if j > n || n == 0 {
            return false;
        }
        let x = if j == 0 {
            0.0
        } else if j == n {
            1.0
        } else {
            let gap = Tolerance::default().gap;
            let lo = self.segments[j - 1].point_start().x + gap;
            let hi = self.segments[j].point_end().x - gap;
            if lo <= hi {
                point.x.clamp(lo, hi)
            } else {
                self.segments[j].point_start().x
            }
        };
        let p = dvec2(x, point.y);
        if j > 0 {
            self.segments[j - 1].set_point_end(p);
        }
        if j < n {
            self.segments[j].set_point_start(p);
        }
        true
    }

    pub fn point_end_move(&mut self) {
        self.active_point = None;
    }

    // ── Handles ────────────────────────────────────────────────────

    pub fn handle_addresses(&self) -> Vec<HandleAddress> {
        self.segments
            .iter()
            .enumerate()
            .flat_map(|(i, s)| {
                s.handle_positions()
                    .iter()
                    .map(move |&position| HandleAddress::new(i, position))
            })
            .collect()
    }

    pub fn handle_tip(&self, address: HandleAddress) -> Option<Point2> {
        self.segments.get(address.index)?.handle_tip(address.position)
    }

    pub fn is_handle_hovered(
        &self,
        point: Point2,
        radius: f64,
        view: &(impl View + ?Sized),
    ) -> bool {
        self.segments
            .iter()
            .any(|s| s.is_handle_hovered(point, radius, view))
    }

    fn opposite_of(&self, address: HandleAddress) -> Option<HandleAddress> {
        let side = address.side()?;
        self.segments
            .get(address.index)?
            .bezier_handle(side)?
            .opposite()
    }

    /// Begin dragging the handle under `point`, if any. With alignment on,
    /// the paired handle across the joint keeps its length for the drag.
    pub fn handle_check_hover(
        &mut self,
        point: Point2,
        radius: f64,
        view: &(impl View + ?Sized),
        keys: KeyState,
        config: &EditorConfig,
    ) -> bool {
        let hit = self
            .segments
            .iter_mut()
            .enumerate()
            .find_map(|(i, s)| {
                s.handle_check_hover(point, radius, view, keys)
                    .map(|position| HandleAddress::new(i, position))
            });
        let Some(address) = hit else {
            return false;
        };
        self.active_handle = Some(address);
        if config.align_handle {
            if let Some(opposite) = self.opposite_of(address) {
                if let Some(handle) = self.bezier_handle_mut(opposite) {
                    handle.lock_length(view);
                }
            }
        }
        true
    }

    fn bezier_handle_mut(&mut self, address: HandleAddress) -> Option<&mut BezierHandle> {
        let side = address.side()?;
        self.segments.get_mut(address.index)?.bezier_handle_mut(side)
    }

    /// Drag the active handle to `point`, mirroring it onto its partner
    /// across the joint when alignment is on.
    pub fn handle_update(
        &mut self,
        point: Point2,
        view: &(impl View + ?Sized),
        keys: KeyState,
        config: &EditorConfig,
    ) -> bool {
        let Some(address) = self.active_handle else {
            return false;
        };
        let Some(segment) = self.segments.get_mut(address.index) else {
            return false;
        };
        if !segment.handle_update(address.position, point, view, keys) {
            return false;
        }
        if config.align_handle {
            self.align_opposite(address, view);
        }
        true
    }

    fn align_opposite(&mut self, address: HandleAddress, view: &(impl View + ?Sized)) {
        let (Some(side), Some(opposite)) = (address.side(), self.opposite_of(address)) else {
            return;
        };
        let Some(opposite_side) = opposite.side() else {
            return;
        };
        let segment = &self.segments[address.index];
        let frame = segment.frame();
        let Some(handle) = segment.bezier_handle(side) else {
            return;
        };
        let mirrored = handle.anchor(&frame) - handle.offset();
        let target = &mut self.segments[opposite.index];
        let target_frame = target.frame();
        if let Some(partner) = target.bezier_handle_mut(opposite_side) {
            partner.move_aligned(mirrored, &target_frame, view);
        }
    }

    /// Finish the handle drag; positions stay where they are.
    pub fn handle_end_control(&mut self) {
        let Some(address) = self.active_handle.take() else {
            return;
        };
        let opposite = self.opposite_of(address);
        if let Some(segment) = self.segments.get_mut(address.index) {
            segment.handle_end_control();
        }
        if let Some(opposite) = opposite {
            if let Some(handle) = self.bezier_handle_mut(opposite) {
                handle.end_move();
            }
        }
    }

    /// Turn a Bezier handle to match the neighbouring segment's tangent at
    /// their shared joint. No neighbour: nothing happens.
    pub fn adjust_handle_angle(
        &mut self,
        address: HandleAddress,
        view: &(impl View + ?Sized),
    ) -> bool {
        let Some(side) = address.side() else {
            return false;
        };
        let Some(segment) = self.segments.get(address.index) else {
            return false;
        };
        let (neighbor, joint) = match side {
            HandleSide::Left => (segment.prev(), segment.point_start()),
            HandleSide::Right => (segment.next(), segment.point_end()),
        };
        let Some(neighbor) = neighbor else {
            return false;
        };
        let slope = self.segments[neighbor].slope_at(joint.x);
        let segment = &mut self.segments[address.index];
        let frame = segment.frame();
        match segment.bezier_handle_mut(side) {
            Some(handle) => {
                handle.adjust_angle(slope, &frame, view);
                true
            }
            None => false,
        }
    }

    pub fn move_handle_to_root(&mut self, address: HandleAddress) -> bool {
        match self.bezier_handle_mut(address) {
            Some(handle) => {
                handle.move_to_root();
                true
            }
            None => false,
        }
    }

    /// Place a handle tip at `point` directly.
    pub fn set_handle_position(&mut self, address: HandleAddress, point: Point2) -> bool {
        let Some(segment) = self.segments.get_mut(address.index) else {
            return false;
        };
        let frame = segment.frame();
        match (address.side(), segment.shape_mut()) {
            (Some(side), Shape::Bezier(bezier)) => {
                bezier.handle_mut(side).set_position(point, &frame);
                true
            }
            (None, Shape::Elastic(elastic)) => {
                elastic.drag_tip(&frame, point);
                true
            }
            (None, Shape::Bounce(bounce)) => {
                bounce.drag_tip(&frame, point);
                true
            }
            _ => false,
        }
    }

    pub fn draw_handle(&self, graphics: &mut dyn Graphics, view: &GraphView, style: &HandleStyle) {
        if !style.visible {
            return;
        }
        for segment in &self.segments {
            segment.draw_handle(graphics, view, style);
        }
    }
}

impl Default for NormalCurve {
    fn default() -> Self {
        Self::new()
    }
}

impl Curve for NormalCurve {
    fn curve_function(&self, progress: f64, start: f64, end: f64) -> f64 {
        let Some(segment) = self.segments.get(self.segment_index_at(progress)) else {
            return start;
        };
        let frame = segment.frame();
        let y = segment.curve_function(frame.local_progress(progress), frame.start.y, frame.end.y);
        lerp(start, end, y)
    }

    fn clear(&mut self) {
        *self = Self::new();
    }
}

impl Validate for NormalCurve {
    fn validate(&self) -> Result<()> {
        let (Some(first), Some(last)) = (self.segments.first(), self.segments.last()) else {
            return Err(EaselError::Partition("curve has no segments".into()));
        };
        if first.point_start().x != 0.0 {
            return Err(EaselError::Partition(format!(
                "first segment starts at x = {}",
                first.point_start().x
            )));
        }
        if last.point_end().x != 1.0 {
            return Err(EaselError::Partition(format!(
                "last segment ends at x = {}",
                last.point_end().x
            )));
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if segment.point_end().x <= segment.point_start().x {
                return Err(EaselError::Partition(format!("segment {} has no width", i)));
            }
        }
        for (i, pair) in self.segments.windows(2).enumerate() {
            if pair[0].point_end() != pair[1].point_start() {
                return Err(EaselError::Partition(format!(
                    "gap between segments {} and {}",
                    i,
                    i + 1
                )));
            }
        }
        Ok(())
    }
}

impl TryFrom<Vec<Segment>> for NormalCurve {
    type Error = EaselError;

    fn try_from(segments: Vec<Segment>) -> Result<Self> {
        Self::from_segments(segments)
    }
}

impl From<NormalCurve> for Vec<Segment> {
    fn from(curve: NormalCurve) -> Self {
        curve.segments
    }
}
