//! Single-series bar renderer.

use crate::geometry::{SlotLayout, SurfaceGeometry};
use crate::models::ChartSeries;
use crate::surface::{LabelStyle, Point, Rect, Surface, TextAlign, TextBaseline};
use crate::theme::ThemeColors;

use super::{LABEL_FONT_PX, begin_frame, draw_baseline};

pub const BAR_MIN_GAP: f64 = 6.0;
pub const BAR_GAP_FRACTION: f64 = 0.04;
pub const BAR_ALPHA: f64 = 0.9;
/// Label baseline distance from the bottom edge of the surface.
const LABEL_BOTTOM_OFFSET: f64 = 6.0;

/// Draw `series` as vertical bars normalised to the series maximum (floored at 1).
///
/// A `None` surface is a no-op. The surface is fully redrawn on every call.
pub fn draw_bars<S: Surface + ?Sized>(
    surface: Option<&mut S>,
    series: &ChartSeries,
    geometry: &SurfaceGeometry,
    theme: &ThemeColors,
) {
    let Some(surface) = surface else {
        return;
    };
    begin_frame(surface, geometry, theme);
    draw_baseline(surface, geometry, theme);

    let n = series.len();
    let slots = SlotLayout::fit(geometry.inner_width, n, BAR_MIN_GAP, BAR_GAP_FRACTION);
    let max = series.max_value().max(1.0);
    let inner_h = geometry.inner_height;

    for (i, v) in series.values.iter().enumerate() {
        let h = (v.max(0.0) / max) * inner_h;
        let x = geometry.padding.left + slots.offset(i);
        let y = geometry.padding.top + (inner_h - h);
        surface.fill_rect(Rect::new(x, y, slots.slot_width, h), theme.accent, BAR_ALPHA);
    }

    if series.is_labeled() {
        let style = LabelStyle {
            color: theme.text,
            font_px: LABEL_FONT_PX,
            align: TextAlign::Center,
            baseline: TextBaseline::Alphabetic,
            rotation: 0.0,
        };
        let y = geometry.css_height - LABEL_BOTTOM_OFFSET;
        for i in 0..n {
            let label = series.labels.get(i).map(String::as_str).unwrap_or("");
            let x = geometry.padding.left + slots.center(i);
            surface.fill_text(label, Point::new(x, y), &style);
        }
    }
}
