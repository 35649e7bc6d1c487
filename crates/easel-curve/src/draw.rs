//! Drawing interface: the curve decides what to draw, the host draws it.

use easel_core::EditorConfig;
use easel_math::{ColorF, Point2};

/// Primitive sink implemented by the rendering backend. Coordinates are in
/// screen pixels.
pub trait Graphics {
    fn draw_line(&mut self, from: Point2, to: Point2, thickness: f32, color: ColorF);
    fn fill_circle(&mut self, center: Point2, radius: f32, color: ColorF);
    fn draw_circle(&mut self, center: Point2, radius: f32, thickness: f32, color: ColorF);
}

/// Visual parameters of handle drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleStyle {
    /// Draw nothing when false
    pub visible: bool,
    pub thickness: f32,
    pub root_radius: f32,
    pub tip_radius: f32,
    pub tip_thickness: f32,
    pub cutoff_line: bool,
    pub color: ColorF,
}

impl HandleStyle {
    pub fn from_config(config: &EditorConfig, color: ColorF) -> Self {
        Self {
            visible: config.show_handle,
            thickness: config.handle_thickness,
            root_radius: config.root_radius,
            tip_radius: config.tip_radius,
            tip_thickness: config.tip_thickness,
            cutoff_line: config.cutoff_line,
            color,
        }
    }
}

impl Default for HandleStyle {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default(), ColorF::WHITE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Line {
        from: Point2,
        to: Point2,
        thickness: f32,
        color: ColorF,
    },
    FillCircle {
        center: Point2,
        radius: f32,
        color: ColorF,
    },
    Circle {
        center: Point2,
        radius: f32,
        thickness: f32,
        color: ColorF,
    },
}

/// Collects primitives for hosts that batch their drawing.
#[derive(Debug, Clone, Default)]
pub struct RecordingGraphics {
    pub commands: Vec<DrawCommand>,
}

impl RecordingGraphics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }
}

impl Graphics for RecordingGraphics {
    fn draw_line(&mut self, from: Point2, to: Point2, thickness: f32, color: ColorF) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            thickness,
            color,
        });
    }

    fn fill_circle(&mut self, center: Point2, radius: f32, color: ColorF) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn draw_circle(&mut self, center: Point2, radius: f32, thickness: f32, color: ColorF) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            thickness,
            color,
        });
    }
}
