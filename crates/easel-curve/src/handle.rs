//! Draggable tangent handle of a Bezier segment.
//!
//! A handle is stored as an offset from its anchor: the segment's start
//! point for the left handle, the end point for the right handle. While a
//! handle is dragged, modifier keys switch it between free movement,
//! snapping to an endpoint's value, and keeping its on-screen angle or
//! length. Keys are edge-triggered: holding a key has no repeated effect.

use easel_math::{sign, Point2, Vector2, View};
use serde::{Deserialize, Serialize};

use crate::control_point::ControlPoint;
use crate::frame::SegmentFrame;
use crate::input::KeyState;
use crate::normal::HandleAddress;

/// Fraction of the segment diagonal at which default handles sit.
pub const DEFAULT_HANDLE_RATIO: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleSide {
    Left,
    Right,
}

impl HandleSide {
    pub fn opposite(self) -> Self {
        match self {
            HandleSide::Left => HandleSide::Right,
            HandleSide::Right => HandleSide::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapState {
    #[default]
    Unsnapped,
    SnapStart,
    SnapEnd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BezierHandle {
    side: HandleSide,
    point_offset: ControlPoint,
    #[serde(skip)]
    snap_state: SnapState,
    #[serde(skip)]
    locked_angle: bool,
    #[serde(skip)]
    locked_length: bool,
    #[serde(skip)]
    buffer_angle: f64,
    #[serde(skip)]
    buffer_length: f64,
    #[serde(skip)]
    flag_prev_snap: bool,
    #[serde(skip)]
    flag_prev_lock_angle: bool,
    #[serde(skip)]
    flag_prev_lock_length: bool,
    /// Handle across the joint sharing this handle's anchor
    #[serde(skip)]
    opposite: Option<HandleAddress>,
}

impl BezierHandle {
    pub fn new(side: HandleSide, offset: Vector2) -> Self {
        Self {
            side,
            point_offset: ControlPoint::new(offset),
            snap_state: SnapState::Unsnapped,
            locked_angle: false,
            locked_length: false,
            buffer_angle: 0.0,
            buffer_length: 0.0,
            flag_prev_snap: false,
            flag_prev_lock_angle: false,
            flag_prev_lock_length: false,
            opposite: None,
        }
    }

    /// Handle on the segment diagonal, [`DEFAULT_HANDLE_RATIO`] away from its anchor.
    pub fn canonical(side: HandleSide, frame: &SegmentFrame) -> Self {
        let diagonal = frame.end - frame.start;
        let offset = match side {
            HandleSide::Left => diagonal * DEFAULT_HANDLE_RATIO,
            HandleSide::Right => -diagonal * DEFAULT_HANDLE_RATIO,
        };
        Self::new(side, offset)
    }

    pub fn side(&self) -> HandleSide {
        self.side
    }

    pub fn offset(&self) -> Vector2 {
        self.point_offset.point()
    }

    pub fn snap_state(&self) -> SnapState {
        self.snap_state
    }

    pub fn is_locked_angle(&self) -> bool {
        self.locked_angle
    }

    pub fn is_locked_length(&self) -> bool {
        self.locked_length
    }

    pub fn is_controlled(&self) -> bool {
        self.point_offset.is_controlled()
    }

    pub fn opposite(&self) -> Option<HandleAddress> {
        self.opposite
    }

    pub(crate) fn set_opposite(&mut self, opposite: Option<HandleAddress>) {
        self.opposite = opposite;
    }

    /// The endpoint this handle hangs off.
    pub fn anchor(&self, frame: &SegmentFrame) -> Point2 {
        match self.side {
            HandleSide::Left => frame.start,
            HandleSide::Right => frame.end,
        }
    }

    fn far_point(&self, frame: &SegmentFrame) -> Point2 {
        match self.side {
            HandleSide::Left => frame.end,
            HandleSide::Right => frame.start,
        }
    }

    /// Absolute position of the handle tip.
    pub fn tip(&self, frame: &SegmentFrame) -> Point2 {
        self.anchor(frame) + self.offset()
    }

    /// Same handle after mirroring time: sides swap and x flips.
    pub fn mirrored(&self) -> Self {
        let offset = self.offset();
        Self::new(self.side.opposite(), Vector2::new(-offset.x, offset.y))
    }

    pub fn update_flags(
        &mut self,
        keys: KeyState,
        view: &(impl View + ?Sized),
        frame: &SegmentFrame,
    ) {
        let ks_snap = keys.wants_snap();
        let ks_lock_angle = keys.wants_lock_angle();
        let ks_lock_length = keys.wants_lock_length();

        if !self.flag_prev_snap && ks_snap {
            self.snap(frame);
        } else if !self.flag_prev_lock_angle && ks_lock_angle {
            self.lock_angle(view);
        } else if !self.flag_prev_lock_length && ks_lock_length {
            self.lock_length(view);
        }
        if self.flag_prev_snap && !ks_snap {
            self.unsnap();
        }
        if self.flag_prev_lock_angle && !ks_lock_angle {
            self.unlock_angle();
        }
        if self.flag_prev_lock_length && !ks_lock_length {
            self.unlock_length();
        }

        self.flag_prev_snap = ks_snap;
        self.flag_prev_lock_angle = ks_lock_angle;
        self.flag_prev_lock_length = ks_lock_length;
    }

    fn store_flags(&mut self, keys: KeyState) {
        self.flag_prev_snap = keys.wants_snap();
        self.flag_prev_lock_angle = keys.wants_lock_angle();
        self.flag_prev_lock_length = keys.wants_lock_length();
    }

    /// Snap the value offset to whichever endpoint is closer; ties go to the end.
    pub fn snap(&mut self, frame: &SegmentFrame) {
        let y = self.offset().y;
        let h = frame.height();
        let (distance_start, distance_end) = match self.side {
            HandleSide::Left => (y.abs(), (h - y).abs()),
            HandleSide::Right => ((h + y).abs(), y.abs()),
        };
        self.snap_state = if distance_end <= distance_start {
            SnapState::SnapEnd
        } else {
            SnapState::SnapStart
        };
    }

    pub fn unsnap(&mut self) {
        self.snap_state = SnapState::Unsnapped;
    }

    pub fn lock_angle(&mut self, view: &(impl View + ?Sized)) {
        self.buffer_angle = self.handle_angle(view);
        self.locked_angle = true;
    }

    pub fn unlock_angle(&mut self) {
        self.buffer_angle = 0.0;
        self.locked_angle = false;
    }

    pub fn lock_length(&mut self, view: &(impl View + ?Sized)) {
        self.buffer_length = self.handle_length(view);
        self.locked_length = true;
    }

    pub fn unlock_length(&mut self) {
        self.buffer_length = 0.0;
        self.locked_length = false;
    }

    /// On-screen angle of the handle.
    pub fn handle_angle(&self, view: &(impl View + ?Sized)) -> f64 {
        view.screen_angle(self.offset())
    }

    /// On-screen length of the handle.
    pub fn handle_length(&self, view: &(impl View + ?Sized)) -> f64 {
        view.screen_length(self.offset())
    }

    fn cursor_angle(
        &self,
        point: Point2,
        frame: &SegmentFrame,
        view: &(impl View + ?Sized),
    ) -> f64 {
        view.screen_angle(point - self.anchor(frame))
    }

    fn cursor_length(
        &self,
        point: Point2,
        frame: &SegmentFrame,
        view: &(impl View + ?Sized),
    ) -> f64 {
        view.screen_length(point - self.anchor(frame))
    }

    /// Offset the handle should take when the cursor is at `point`.
    pub fn get_dest_point(
        &self,
        point: Point2,
        frame: &SegmentFrame,
        view: &(impl View + ?Sized),
        keep_angle: bool,
    ) -> Vector2 {
        let origin = self.anchor(frame);
        let offset = match self.snap_state {
            SnapState::SnapStart => Vector2::new(point.x - origin.x, frame.start.y - origin.y),
            SnapState::SnapEnd => Vector2::new(point.x - origin.x, frame.end.y - origin.y),
            SnapState::Unsnapped if self.locked_angle => {
                view.from_screen_polar(self.cursor_length(point, frame, view), self.buffer_angle)
            }
            SnapState::Unsnapped if self.locked_length => {
                view.from_screen_polar(self.buffer_length, self.cursor_angle(point, frame, view))
            }
            SnapState::Unsnapped => point - origin,
        };
        self.limit_range(
            offset,
            frame,
            self.locked_angle || self.locked_length || keep_angle,
        )
    }

    /// Keep the x offset between the anchor and the far end of the segment.
    ///
    /// When the x offset is shortened and `keep_angle` is set, y is scaled by
    /// the same factor so the handle keeps its direction.
    pub fn limit_range(
        &self,
        mut offset: Vector2,
        frame: &SegmentFrame,
        keep_angle: bool,
    ) -> Vector2 {
        let width = self.far_point(frame).x - self.anchor(frame).x;
        if offset.x * sign(width) < 0.0 {
            offset.x = 0.0;
        } else if width.abs() < offset.x.abs() {
            let x = offset.x;
            offset.x = width;
            if keep_angle {
                offset.y *= width / x;
            }
        }
        offset
    }

    pub fn is_hovered(
        &self,
        point: Point2,
        frame: &SegmentFrame,
        radius: f64,
        view: &(impl View + ?Sized),
    ) -> bool {
        self.point_offset
            .is_hovered(point - self.anchor(frame), radius, view)
    }

    /// Start controlling the handle if `point` hovers it. Keys already held
    /// when the drag starts take effect immediately.
    pub fn check_hover(
        &mut self,
        point: Point2,
        frame: &SegmentFrame,
        radius: f64,
        view: &(impl View + ?Sized),
        keys: KeyState,
    ) -> bool {
        self.store_flags(keys);
        let origin = self.anchor(frame);
        if !self.point_offset.check_hover(point - origin, radius, view) {
            return false;
        }
        self.apply_held_keys(keys, frame, view);
        true
    }

    /// Start controlling the handle without a hover test. Held keys apply
    /// in the order length lock, snap, angle lock.
    pub fn begin_move(
        &mut self,
        frame: &SegmentFrame,
        view: &(impl View + ?Sized),
        keys: KeyState,
    ) {
        self.store_flags(keys);
        self.point_offset.begin_control();
        if keys.wants_lock_length() {
            self.lock_length(view);
        } else if keys.wants_snap() {
            self.snap(frame);
        } else if keys.wants_lock_angle() {
            self.lock_angle(view);
        }
    }

    /// Held keys on hover apply in the order snap, angle lock, length lock.
    fn apply_held_keys(
        &mut self,
        keys: KeyState,
        frame: &SegmentFrame,
        view: &(impl View + ?Sized),
    ) {
        if keys.wants_snap() {
            self.snap(frame);
        } else if keys.wants_lock_angle() {
            self.lock_angle(view);
        } else if keys.wants_lock_length() {
            self.lock_length(view);
        }
    }

    /// Follow the cursor while controlled. Returns false when the handle is
    /// not the one being dragged.
    pub fn update(
        &mut self,
        point: Point2,
        frame: &SegmentFrame,
        view: &(impl View + ?Sized),
        keys: KeyState,
    ) -> bool {
        if !self.is_controlled() {
            return false;
        }
        self.update_flags(keys, view, frame);
        let dest = self.get_dest_point(point, frame, view, false);
        self.point_offset.move_to(dest);
        true
    }

    /// Move as the aligned partner of a dragged handle: no key handling, the
    /// locks set when the drag began still apply.
    pub fn move_aligned(
        &mut self,
        point: Point2,
        frame: &SegmentFrame,
        view: &(impl View + ?Sized),
    ) {
        let dest = self.get_dest_point(point, frame, view, true);
        self.point_offset.move_to(dest);
    }

    /// Place the tip at `point` directly, keeping its direction if it has
    /// to be shortened.
    pub fn set_position(&mut self, point: Point2, frame: &SegmentFrame) {
        let offset = self.limit_range(point - self.anchor(frame), frame, true);
        self.point_offset.move_to(offset);
    }

    pub fn set_offset(&mut self, offset: Vector2, frame: &SegmentFrame) {
        let offset = self.limit_range(offset, frame, true);
        self.point_offset.move_to(offset);
    }

    /// Re-apply the range limit after the segment's endpoints moved.
    pub fn refit(&mut self, frame: &SegmentFrame) {
        self.set_offset(self.offset(), frame);
    }

    pub fn move_to_root(&mut self) {
        self.point_offset.move_to(Vector2::ZERO);
    }

    /// Rotate the handle to follow a neighbouring slope (graph units) while
    /// keeping its on-screen length.
    pub fn adjust_angle(&mut self, slope: f64, frame: &SegmentFrame, view: &(impl View + ?Sized)) {
        let length = self.handle_length(view);
        let angle = (slope * view.scale_y() / view.scale_x()).atan();
        let along = view.from_screen_polar(length, angle);
        let origin = self.anchor(frame);
        let dest = match self.side {
            HandleSide::Left => origin + along,
            HandleSide::Right => origin - along,
        };
        let offset = self.get_dest_point(dest, frame, view, true);
        self.point_offset.move_to(offset);
    }

    /// Drop snap and lock state; the position is kept.
    pub fn end_move(&mut self) {
        self.unsnap();
        self.unlock_angle();
        self.unlock_length();
    }

    pub fn end_control(&mut self) {
        self.point_offset.end_control();
        self.end_move();
    }
}
