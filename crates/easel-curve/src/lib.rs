//! Easel curves: segment shapes, Bezier handles and the composite curve
//! that partitions `[0, 1]` into segments.

pub mod control_point;
pub mod curve;
pub mod draw;
pub mod frame;
pub mod handle;
pub mod input;
pub mod normal;
pub mod segment;

pub use control_point::ControlPoint;
pub use curve::{BezierCurve, BounceCurve, Curve, ElasticCurve, LinearCurve, VELOCITY_STEP};
pub use draw::{DrawCommand, Graphics, HandleStyle, RecordingGraphics};
pub use frame::SegmentFrame;
pub use handle::{BezierHandle, HandleSide, SnapState};
pub use input::KeyState;
pub use normal::{HandleAddress, NormalCurve, MIN_SEGMENT_WIDTH_PX};
pub use segment::{HandlePosition, Segment, SegmentKind, Shape};
