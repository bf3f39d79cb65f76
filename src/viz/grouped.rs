//! Paired-series bar renderer.
//!
//! Both series share one maximum so heights compare across the pair. They share the accent
//! colour and differ only in opacity; the legend explaining that lives outside the chart.

use crate::geometry::{SlotLayout, SurfaceGeometry};
use crate::models::PairedSeries;
use crate::surface::{LabelStyle, Point, Rect, Surface, TextAlign, TextBaseline};
use crate::theme::ThemeColors;

use super::{LABEL_FONT_PX, begin_frame, draw_baseline};

pub const GROUP_MIN_GAP: f64 = 10.0;
pub const GROUP_GAP_FRACTION: f64 = 0.03;
pub const BAR_MIN_GAP: f64 = 4.0;
pub const BAR_GAP_FRACTION: f64 = 0.10;
pub const FIRST_ALPHA: f64 = 0.90;
pub const SECOND_ALPHA: f64 = 0.45;
/// Below this per-category width, rotated labels are thinned to every second one.
pub const MIN_LEGIBLE_SLOT: f64 = 34.0;
/// Gap between the baseline and the label anchor.
const LABEL_TOP_OFFSET: f64 = 10.0;
/// Extra drop for unrotated labels (alphabetic baseline).
const LABEL_BASELINE_DROP: f64 = 12.0;

/// Layout of one category group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupLayout {
    pub groups: SlotLayout,
    pub bar_gap: f64,
    pub bar_width: f64,
}

impl GroupLayout {
    pub fn fit(inner_width: f64, count: usize) -> Self {
        let groups = SlotLayout::fit(inner_width, count, GROUP_MIN_GAP, GROUP_GAP_FRACTION);
        let bar_gap = BAR_MIN_GAP.max(groups.slot_width * BAR_GAP_FRACTION);
        let bar_width = ((groups.slot_width - bar_gap) / 2.0).max(0.0);
        Self {
            groups,
            bar_gap,
            bar_width,
        }
    }
}

/// Label stride: 2 when rotated labels would get less than [`MIN_LEGIBLE_SLOT`] each.
pub fn label_stride(inner_width: f64, count: usize, rotated: bool) -> usize {
    if count == 0 {
        return 1;
    }
    let approx_slot = inner_width / count as f64;
    if rotated && approx_slot < MIN_LEGIBLE_SLOT { 2 } else { 1 }
}

/// Draw `pair.first` and `pair.second` as adjacent bars per category.
///
/// Labels rotate by −45° when `geometry.rotate_labels` is set. A `None` surface is a no-op.
pub fn draw_grouped_bars<S: Surface + ?Sized>(
    surface: Option<&mut S>,
    pair: &PairedSeries,
    geometry: &SurfaceGeometry,
    theme: &ThemeColors,
) {
    let Some(surface) = surface else {
        return;
    };
    begin_frame(surface, geometry, theme);
    draw_baseline(surface, geometry, theme);

    let n = pair.category_count();
    let layout = GroupLayout::fit(geometry.inner_width, n);
    let max = pair.shared_max();
    let inner_h = geometry.inner_height;
    let y_base = geometry.baseline_y();

    for i in 0..n {
        let a = pair.first.get(i).copied().unwrap_or(0.0).max(0.0);
        let b = pair.second.get(i).copied().unwrap_or(0.0).max(0.0);
        let ha = (a / max) * inner_h;
        let hb = (b / max) * inner_h;
        let x0 = geometry.padding.left + layout.groups.offset(i);

        surface.fill_rect(
            Rect::new(x0, y_base - ha, layout.bar_width, ha),
            theme.accent,
            FIRST_ALPHA,
        );
        surface.fill_rect(
            Rect::new(x0 + layout.bar_width + layout.bar_gap, y_base - hb, layout.bar_width, hb),
            theme.accent,
            SECOND_ALPHA,
        );
    }

    let rotated = geometry.rotate_labels;
    let step = label_stride(geometry.inner_width, n, rotated);
    let label_y = y_base + LABEL_TOP_OFFSET;
    let style = if rotated {
        LabelStyle {
            color: theme.text,
            font_px: LABEL_FONT_PX,
            align: TextAlign::Right,
            baseline: TextBaseline::Top,
            rotation: -std::f64::consts::FRAC_PI_4,
        }
    } else {
        LabelStyle {
            color: theme.text,
            font_px: LABEL_FONT_PX,
            align: TextAlign::Center,
            baseline: TextBaseline::Alphabetic,
            rotation: 0.0,
        }
    };

    for i in (0..n).step_by(step) {
        let label = pair.labels.get(i).map(String::as_str).unwrap_or("");
        let cx = geometry.padding.left + layout.groups.center(i);
        let at = if rotated {
            Point::new(cx, label_y)
        } else {
            Point::new(cx, label_y + LABEL_BASELINE_DROP)
        };
        surface.fill_text(label, at, &style);
    }
}
