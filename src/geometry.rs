//! Surface geometry: CSS size from container width, device pixel scaling, padding, inner
//! rectangle, and the bar/group slot arithmetic shared by the renderers.

/// Width used when the container reports none.
pub const FALLBACK_CONTAINER_WIDTH: f64 = 260.0;
/// Narrowest chart ever laid out, in CSS pixels.
pub const MIN_CSS_WIDTH: f64 = 240.0;
/// Rotated X labels below this CSS width (strict).
pub const ROTATE_BELOW_WIDTH: f64 = 420.0;
/// Largest backing buffer side, in device pixels.
pub const MAX_BACKING_DIMENSION: u32 = 8192;

/// Chart style: selects aspect heuristic and padding table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartStyle {
    /// Single series, one bar per category.
    Bars,
    /// Two series, paired bars per category, rotatable labels.
    GroupedBars,
}

/// Fixed layout constants for a [`ChartStyle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleMetrics {
    /// `height = round(width / ref_width * ref_height)`
    pub ref_width: f64,
    pub ref_height: f64,
    pub min_height: f64,
    /// Added to the height when labels are rotated.
    pub rotated_extra_height: f64,
    pub pad_left: f64,
    pub pad_right: f64,
    pub pad_top: f64,
    pub pad_bottom_unlabeled: f64,
    pub pad_bottom_labeled: f64,
    pub pad_bottom_rotated: f64,
    pub rotates_labels: bool,
}

impl ChartStyle {
    pub const fn metrics(self) -> StyleMetrics {
        match self {
            ChartStyle::Bars => StyleMetrics {
                ref_width: 260.0,
                ref_height: 140.0,
                min_height: 0.0,
                rotated_extra_height: 0.0,
                pad_left: 10.0,
                pad_right: 10.0,
                pad_top: 10.0,
                pad_bottom_unlabeled: 12.0,
                pad_bottom_labeled: 22.0,
                pad_bottom_rotated: 22.0,
                rotates_labels: false,
            },
            ChartStyle::GroupedBars => StyleMetrics {
                ref_width: 260.0,
                ref_height: 150.0,
                min_height: 170.0,
                rotated_extra_height: 55.0,
                pad_left: 12.0,
                pad_right: 12.0,
                pad_top: 10.0,
                pad_bottom_unlabeled: 30.0,
                pad_bottom_labeled: 30.0,
                pad_bottom_rotated: 60.0,
                rotates_labels: true,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Padding {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// Derived layout for one render pass. Recomputed every render, never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    pub css_width: f64,
    pub css_height: f64,
    pub device_pixel_ratio: f64,
    pub padding: Padding,
    pub inner_width: f64,
    pub inner_height: f64,
    pub rotate_labels: bool,
}

/// Inputs to [`resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryRequest {
    /// Container layout width in CSS pixels, if known.
    pub container_width: Option<f64>,
    pub device_pixel_ratio: f64,
    pub style: ChartStyle,
    pub has_labels: bool,
}

/// Whether a chart of this CSS width gets rotated labels.
pub fn needs_rotation(css_width: f64) -> bool {
    css_width < ROTATE_BELOW_WIDTH
}

/// Clamp the reported container width: absent, zero or non-finite → fallback; floor; ≥ 240.
///
/// Negative widths count as reported and clamp to the minimum.
pub fn css_width_for(container_width: Option<f64>) -> f64 {
    let w = container_width
        .filter(|w| w.is_finite() && *w != 0.0)
        .unwrap_or(FALLBACK_CONTAINER_WIDTH);
    w.floor().max(MIN_CSS_WIDTH)
}

/// Device pixel ratio clamped to ≥ 1.
pub fn effective_dpr(dpr: f64) -> f64 {
    if dpr.is_finite() { dpr.max(1.0) } else { 1.0 }
}

pub fn resolve(req: GeometryRequest) -> SurfaceGeometry {
    let m = req.style.metrics();
    let css_width = css_width_for(req.container_width);
    let rotate_labels = m.rotates_labels && needs_rotation(css_width);

    let base_height = (css_width / m.ref_width * m.ref_height).round();
    let extra = if rotate_labels { m.rotated_extra_height } else { 0.0 };
    let css_height = (base_height + extra).max(m.min_height);

    let bottom = if rotate_labels {
        m.pad_bottom_rotated
    } else if req.has_labels {
        m.pad_bottom_labeled
    } else {
        m.pad_bottom_unlabeled
    };
    let padding = Padding {
        left: m.pad_left,
        right: m.pad_right,
        top: m.pad_top,
        bottom,
    };

    SurfaceGeometry {
        css_width,
        css_height,
        device_pixel_ratio: effective_dpr(req.device_pixel_ratio),
        inner_width: (css_width - padding.left - padding.right).max(0.0),
        inner_height: (css_height - padding.top - padding.bottom).max(0.0),
        padding,
        rotate_labels,
    }
}

impl SurfaceGeometry {
    /// Backing buffer size in device pixels: CSS size times the pixel ratio, floored, each side
    /// capped at [`MAX_BACKING_DIMENSION`].
    pub fn pixel_size(&self) -> (u32, u32) {
        let cap = MAX_BACKING_DIMENSION as f64;
        (
            (self.css_width * self.device_pixel_ratio).floor().min(cap) as u32,
            (self.css_height * self.device_pixel_ratio).floor().min(cap) as u32,
        )
    }

    /// Whether [`pixel_size`](Self::pixel_size) had to cap either side.
    pub fn exceeds_backing_limit(&self) -> bool {
        let cap = MAX_BACKING_DIMENSION as f64;
        (self.css_width * self.device_pixel_ratio).floor() > cap
            || (self.css_height * self.device_pixel_ratio).floor() > cap
    }

    /// Y of the baseline rule (bottom edge of the inner rectangle).
    pub fn baseline_y(&self) -> f64 {
        self.padding.top + self.inner_height
    }
}

/// Horizontal slot layout: `n` slots and `n - 1` gaps filling a width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotLayout {
    pub count: usize,
    pub slot_width: f64,
    pub gap: f64,
}

impl SlotLayout {
    /// Gap is `max(min_gap, width * gap_fraction)`. Slot width never goes below 0.
    pub fn fit(width: f64, count: usize, min_gap: f64, gap_fraction: f64) -> Self {
        let gap = min_gap.max(width * gap_fraction);
        let slot_width = if count == 0 {
            0.0
        } else {
            ((width - gap * (count as f64 - 1.0)) / count as f64).max(0.0)
        };
        Self {
            count,
            slot_width,
            gap,
        }
    }

    /// Left edge of slot `i`, relative to the start of the fitted width.
    pub fn offset(&self, i: usize) -> f64 {
        i as f64 * (self.slot_width + self.gap)
    }

    pub fn center(&self, i: usize) -> f64 {
        self.offset(i) + self.slot_width / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_fallbacks() {
        assert_eq!(css_width_for(None), 260.0);
        assert_eq!(css_width_for(Some(0.0)), 260.0);
        assert_eq!(css_width_for(Some(f64::NAN)), 260.0);
        assert_eq!(css_width_for(Some(100.0)), 240.0);
        assert_eq!(css_width_for(Some(-50.0)), 240.0);
        assert_eq!(css_width_for(Some(f64::NEG_INFINITY)), 260.0);
        assert_eq!(css_width_for(Some(640.9)), 640.0);
    }

    #[test]
    fn dpr_is_clamped() {
        assert_eq!(effective_dpr(0.5), 1.0);
        assert_eq!(effective_dpr(f64::INFINITY), 1.0);
        assert_eq!(effective_dpr(2.0), 2.0);
    }

    #[test]
    fn slots_fill_width_exactly() {
        let s = SlotLayout::fit(500.0, 4, 6.0, 0.04);
        assert_eq!(s.gap, 20.0);
        let total = s.slot_width * 4.0 + s.gap * 3.0;
        assert!((total - 500.0).abs() < 1e-9);
    }

    #[test]
    fn gap_floor_applies_on_narrow_widths() {
        let s = SlotLayout::fit(100.0, 2, 6.0, 0.04);
        assert_eq!(s.gap, 6.0);
        assert_eq!(s.slot_width, 47.0);
    }

    #[test]
    fn zero_slots_have_zero_width() {
        let s = SlotLayout::fit(300.0, 0, 6.0, 0.04);
        assert_eq!(s.slot_width, 0.0);
    }
}
