//! Plotters-backed implementations of [`Surface`].
//!
//! - [`PixelCanvas`]: an owned, resizable RGB buffer (in-memory rendering, pixel inspection).
//! - [`PlottersSurface`]: any fixed-size plotters backend (PNG or SVG files).
//!
//! Draw failures (typically: no font registered for labels) are counted and logged, never
//! returned from the draw call itself.

use crate::error::ChartError;
use crate::geometry::MAX_BACKING_DIMENSION;
use crate::surface::{LabelStyle, Point, Rect, Surface, TextAlign, TextBaseline};
use crate::theme::Rgb8;

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{PathElement, Rectangle};
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{Color, FontDesc, FontFamily, FontStyle, RGBAColor, RGBColor};
use plotters_bitmap::BitMapBackend;

use super::text::glyph_offsets;

fn rgb(c: Rgb8) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

fn rgba(c: Rgb8, alpha: f64) -> RGBAColor {
    rgb(c).mix(alpha.clamp(0.0, 1.0))
}

fn px(v: f64, scale: f64) -> i32 {
    (v * scale).round() as i32
}

/// Map a CSS rectangle to device-pixel corners; `None` when nothing would be covered.
///
/// The far corner is exclusive: a filled plotters rectangle stops one pixel short of it.
fn device_rect(rect: Rect, scale: f64) -> Option<[(i32, i32); 2]> {
    if rect.is_empty() {
        return None;
    }
    let (x0, y0) = (px(rect.x, scale), px(rect.y, scale));
    let x1 = px(rect.x + rect.width, scale);
    let y1 = px(rect.y + rect.height, scale);
    if x1 <= x0 || y1 <= y0 {
        None
    } else {
        Some([(x0, y0), (x1, y1)])
    }
}

fn backend_err<E: std::fmt::Debug>(e: E) -> ChartError {
    ChartError::Backend(format!("{e:?}"))
}

fn draw_rect<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scale: f64,
    rect: Rect,
    color: RGBAColor,
) -> Result<(), ChartError> {
    match device_rect(rect, scale) {
        Some(corners) => area
            .draw(&Rectangle::new(corners, color.filled()))
            .map_err(backend_err),
        None => Ok(()),
    }
}

fn draw_line<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scale: f64,
    from: Point,
    to: Point,
    color: Rgb8,
    width: f64,
) -> Result<(), ChartError> {
    let stroke = ((width * scale).round() as u32).max(1);
    let path = vec![(px(from.x, scale), px(from.y, scale)), (px(to.x, scale), px(to.y, scale))];
    area.draw(&PathElement::new(path, rgb(color).stroke_width(stroke)))
        .map_err(backend_err)
}

fn anchor_pos(align: TextAlign, baseline: TextBaseline) -> Pos {
    let h = match align {
        TextAlign::Left => HPos::Left,
        TextAlign::Center => HPos::Center,
        TextAlign::Right => HPos::Right,
    };
    // Plotters anchors on the glyph box; its bottom stands in for the alphabetic baseline.
    let v = match baseline {
        TextBaseline::Top => VPos::Top,
        TextBaseline::Alphabetic => VPos::Bottom,
    };
    Pos::new(h, v)
}

fn draw_label<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    scale: f64,
    text: &str,
    at: Point,
    style: &LabelStyle,
) -> Result<(), ChartError> {
    if text.is_empty() {
        return Ok(());
    }
    let font = FontDesc::new(FontFamily::SansSerif, style.font_px * scale, FontStyle::Normal);
    let color = rgb(style.color);

    if style.rotation == 0.0 {
        let ts = font.color(&color).pos(anchor_pos(style.align, style.baseline));
        return area
            .draw_text(text, &ts, (px(at.x, scale), px(at.y, scale)))
            .map_err(backend_err);
    }

    // Plotters only rotates text in quarter turns, so arbitrary angles are laid out glyph by
    // glyph along the rotated baseline, each glyph upright.
    let (dx, dy) = (style.rotation.cos(), style.rotation.sin());
    let (offsets, total) = glyph_offsets(text, style.font_px);
    let shift = match style.align {
        TextAlign::Left => 0.0,
        TextAlign::Center => total / 2.0,
        TextAlign::Right => total,
    };
    let ts = font.color(&color).pos(anchor_pos(TextAlign::Left, style.baseline));
    for (ch, off) in text.chars().zip(offsets) {
        if ch.is_whitespace() {
            continue;
        }
        let d = off - shift;
        let p = (px(at.x + d * dx, scale), px(at.y + d * dy, scale));
        let mut buf = [0u8; 4];
        area.draw_text(ch.encode_utf8(&mut buf), &ts, p)
            .map_err(backend_err)?;
    }
    Ok(())
}

/// Cap an in-memory buffer at [`MAX_BACKING_DIMENSION`] per side; anything beyond is clipped.
fn clamp_backing_size(width: u32, height: u32) -> (u32, u32) {
    let capped = (width.min(MAX_BACKING_DIMENSION), height.min(MAX_BACKING_DIMENSION));
    if capped != (width, height) {
        log::warn!(
            "backing buffer {}x{} exceeds the limit, using {}x{}",
            width,
            height,
            capped.0,
            capped.1
        );
    }
    capped
}

fn note_failure(failures: &mut usize, result: Result<(), ChartError>) {
    if let Err(e) = result {
        if *failures == 0 {
            log::debug!("draw call failed: {e}");
        }
        *failures += 1;
    }
}

/// An owned RGB pixel buffer that plotters draws into.
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    scale: f64,
    background: Rgb8,
    pixels: Vec<u8>,
    failures: usize,
}

impl PixelCanvas {
    /// An empty (0×0) canvas that clears to `background`.
    pub fn new(background: Rgb8) -> Self {
        Self {
            width: 0,
            height: 0,
            scale: 1.0,
            background,
            pixels: Vec::new(),
            failures: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major RGB bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + x as usize) * 3;
        Some(Rgb8::new(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]))
    }

    /// Number of draw calls the backend rejected since the last resize.
    pub fn failures(&self) -> usize {
        self.failures
    }

    fn with_area<F>(&mut self, op: F)
    where
        F: for<'b> FnOnce(&DrawingArea<BitMapBackend<'b>, Shift>, f64) -> Result<(), ChartError>,
    {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let scale = self.scale;
        let result = {
            let area =
                BitMapBackend::with_buffer(&mut self.pixels, (self.width, self.height))
                    .into_drawing_area();
            op(&area, scale)
        };
        note_failure(&mut self.failures, result);
    }
}

impl Surface for PixelCanvas {
    fn set_background(&mut self, color: Rgb8) {
        self.background = color;
    }

    fn resize(&mut self, pixel_width: u32, pixel_height: u32) {
        let (pixel_width, pixel_height) = clamp_backing_size(pixel_width, pixel_height);
        self.width = pixel_width;
        self.height = pixel_height;
        let bg = self.background;
        self.pixels = [bg.r, bg.g, bg.b].repeat(pixel_width as usize * pixel_height as usize);
        self.failures = 0;
    }

    fn set_transform(&mut self, scale: f64) {
        self.scale = scale;
    }

    fn clear_rect(&mut self, rect: Rect) {
        let bg = rgba(self.background, 1.0);
        self.with_area(|area, scale| draw_rect(area, scale, rect, bg));
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb8, alpha: f64) {
        self.with_area(|area, scale| draw_rect(area, scale, rect, rgba(color, alpha)));
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgb8, width: f64) {
        self.with_area(|area, scale| draw_line(area, scale, from, to, color, width));
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &LabelStyle) {
        self.with_area(|area, scale| draw_label(area, scale, text, at, style));
    }
}

/// A [`Surface`] over a fixed-size plotters drawing area (file backends).
pub struct PlottersSurface<DB: DrawingBackend> {
    area: DrawingArea<DB, Shift>,
    scale: f64,
    background: Rgb8,
    failures: usize,
}

impl<DB: DrawingBackend> PlottersSurface<DB> {
    pub fn new(backend: DB, background: Rgb8) -> Self {
        Self {
            area: backend.into_drawing_area(),
            scale: 1.0,
            background,
            failures: 0,
        }
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Flush the backend (writes the output file).
    pub fn present(self) -> Result<(), ChartError> {
        self.area.present().map_err(backend_err)
    }
}

impl<DB: DrawingBackend> Surface for PlottersSurface<DB> {
    fn set_background(&mut self, color: Rgb8) {
        self.background = color;
    }

    fn resize(&mut self, pixel_width: u32, pixel_height: u32) {
        // File backends are sized at construction.
        let dim = self.area.dim_in_pixel();
        if dim != (pixel_width, pixel_height) {
            log::warn!(
                "backend is {}x{}, render asked for {}x{}",
                dim.0,
                dim.1,
                pixel_width,
                pixel_height
            );
        }
        self.failures = 0;
    }

    fn set_transform(&mut self, scale: f64) {
        self.scale = scale;
    }

    fn clear_rect(&mut self, rect: Rect) {
        let r = draw_rect(&self.area, self.scale, rect, rgba(self.background, 1.0));
        note_failure(&mut self.failures, r);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb8, alpha: f64) {
        let r = draw_rect(&self.area, self.scale, rect, rgba(color, alpha));
        note_failure(&mut self.failures, r);
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgb8, width: f64) {
        let r = draw_line(&self.area, self.scale, from, to, color, width);
        note_failure(&mut self.failures, r);
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &LabelStyle) {
        let r = draw_label(&self.area, self.scale, text, at, style);
        note_failure(&mut self.failures, r);
    }
}
