//! The drawing surface seen by the renderers.
//!
//! Coordinates passed to a [`Surface`] are CSS pixels; the surface maps them to device pixels
//! using the scale set by [`Surface::set_transform`].

use crate::theme::Rgb8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Alphabetic,
}

/// How one label is placed relative to its anchor point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    pub color: Rgb8,
    pub font_px: f64,
    pub align: TextAlign,
    pub baseline: TextBaseline,
    /// Rotation about the anchor in radians; negative turns counter-clockwise on screen.
    pub rotation: f64,
}

/// Minimal 2D drawing API the bar renderers need.
pub trait Surface {
    /// Colour that `clear_rect` and `resize` paint with. Surfaces without pixels ignore it.
    fn set_background(&mut self, _color: Rgb8) {}
    /// Reallocate the backing buffer to `pixel_width x pixel_height` device pixels.
    fn resize(&mut self, pixel_width: u32, pixel_height: u32);
    /// Replace the CSS→device transform with a uniform scale.
    fn set_transform(&mut self, scale: f64);
    fn clear_rect(&mut self, rect: Rect);
    fn fill_rect(&mut self, rect: Rect, color: Rgb8, alpha: f64);
    fn stroke_line(&mut self, from: Point, to: Point, color: Rgb8, width: f64);
    fn fill_text(&mut self, text: &str, at: Point, style: &LabelStyle);
}

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Resize {
        pixel_width: u32,
        pixel_height: u32,
    },
    SetTransform {
        scale: f64,
    },
    ClearRect(Rect),
    FillRect {
        rect: Rect,
        color: Rgb8,
        alpha: f64,
    },
    StrokeLine {
        from: Point,
        to: Point,
        color: Rgb8,
        width: f64,
    },
    FillText {
        text: String,
        at: Point,
        style: LabelStyle,
    },
}

/// Surface that keeps a log of draw calls instead of pixels. A resize starts a new log,
/// mirroring how resizing a canvas discards its content.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn fill_rects(&self) -> Vec<(Rect, f64)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillRect { rect, alpha, .. } => Some((*rect, *alpha)),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<(&str, Point, &LabelStyle)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, at, style } => Some((text.as_str(), *at, style)),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, pixel_width: u32, pixel_height: u32) {
        self.commands.clear();
        self.commands.push(DrawCommand::Resize {
            pixel_width,
            pixel_height,
        });
    }

    fn set_transform(&mut self, scale: f64) {
        self.commands.push(DrawCommand::SetTransform { scale });
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::ClearRect(rect));
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb8, alpha: f64) {
        self.commands.push(DrawCommand::FillRect { rect, color, alpha });
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgb8, width: f64) {
        self.commands.push(DrawCommand::StrokeLine {
            from,
            to,
            color,
            width,
        });
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &LabelStyle) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            at,
            style: *style,
        });
    }
}
