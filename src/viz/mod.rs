//! Chart rendering: bar and grouped-bar renderers, surface backends, and the
//! records → series → geometry → pixels pipeline.
//!
//! - Device-independent layout: everything is computed in CSS pixels and scaled once per render
//! - Full clear-and-redraw on every call, no retained state between renders
//! - Output to an in-memory [`PixelCanvas`], or to **PNG** / **SVG** files via plotters

pub mod backend;
pub mod bars;
pub mod grouped;
pub mod text;

pub use backend::{PixelCanvas, PlottersSurface};
pub use bars::draw_bars;
pub use grouped::draw_grouped_bars;

use crate::aggregate::{self, DEFAULT_MAX_YEARS, DEFAULT_TOP_N};
use crate::error::ChartError;
use crate::geometry::{self, ChartStyle, GeometryRequest, SurfaceGeometry};
use crate::models::{ChartSeries, PairedSeries, Record};
use crate::surface::{Point, Rect, Surface};
use crate::theme::ThemeColors;

use anyhow::{Context, Result};
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;
use std::sync::Once;

/// Font size of axis labels, CSS pixels.
pub const LABEL_FONT_PX: f64 = 12.0;
pub const BASELINE_WIDTH: f64 = 1.0;

/// Size the buffer, install the device scale (once), and clear the whole surface.
pub(crate) fn begin_frame<S: Surface + ?Sized>(
    surface: &mut S,
    geometry: &SurfaceGeometry,
    theme: &ThemeColors,
) {
    if geometry.exceeds_backing_limit() {
        log::warn!(
            "{}x{} css px at x{} is larger than the backing limit; the chart will be clipped",
            geometry.css_width,
            geometry.css_height,
            geometry.device_pixel_ratio
        );
    }
    surface.set_background(theme.background);
    let (pw, ph) = geometry.pixel_size();
    surface.resize(pw, ph);
    surface.set_transform(geometry.device_pixel_ratio);
    surface.clear_rect(Rect::new(0.0, 0.0, geometry.css_width, geometry.css_height));
}

pub(crate) fn draw_baseline<S: Surface + ?Sized>(
    surface: &mut S,
    geometry: &SurfaceGeometry,
    theme: &ThemeColors,
) {
    let y = geometry.baseline_y();
    surface.stroke_line(
        Point::new(geometry.padding.left, y),
        Point::new(geometry.padding.left + geometry.inner_width, y),
        theme.border,
        BASELINE_WIDTH,
    );
}

/// The charts the site shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// Works per year, most recent years.
    PapersPerYear,
    /// Citation counts of the most cited works.
    TopCited,
    /// Citation histogram, citable vs published.
    CitationHistogram,
}

impl ChartKind {
    pub fn style(self) -> ChartStyle {
        match self {
            ChartKind::PapersPerYear | ChartKind::TopCited => ChartStyle::Bars,
            ChartKind::CitationHistogram => ChartStyle::GroupedBars,
        }
    }
}

/// Aggregated data for one chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Bars(ChartSeries),
    Grouped(PairedSeries),
}

impl ChartData {
    pub fn has_labels(&self) -> bool {
        match self {
            ChartData::Bars(s) => s.is_labeled(),
            ChartData::Grouped(p) => !p.labels.is_empty(),
        }
    }
}

/// Per-render inputs. Rebuilt by the caller before every redraw (width and theme may change).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub container_width: Option<f64>,
    pub device_pixel_ratio: f64,
    pub theme: ThemeColors,
    pub max_years: usize,
    pub top_n: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            container_width: None,
            device_pixel_ratio: 1.0,
            theme: ThemeColors::default(),
            max_years: DEFAULT_MAX_YEARS,
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Aggregate `records` for `kind`.
pub fn prepare(kind: ChartKind, records: &[Record], opts: &RenderOptions) -> ChartData {
    match kind {
        ChartKind::PapersPerYear => {
            ChartData::Bars(aggregate::aggregate_by_year(records, opts.max_years))
        }
        ChartKind::TopCited => ChartData::Bars(aggregate::top_by_metric(records, opts.top_n)),
        ChartKind::CitationHistogram => ChartData::Grouped(aggregate::histogram(records)),
    }
}

pub fn resolve_geometry(kind: ChartKind, data: &ChartData, opts: &RenderOptions) -> SurfaceGeometry {
    geometry::resolve(GeometryRequest {
        container_width: opts.container_width,
        device_pixel_ratio: opts.device_pixel_ratio,
        style: kind.style(),
        has_labels: data.has_labels(),
    })
}

/// Draw already-aggregated data with the matching renderer.
pub fn draw<S: Surface + ?Sized>(
    surface: Option<&mut S>,
    data: &ChartData,
    geometry: &SurfaceGeometry,
    theme: &ThemeColors,
) {
    match data {
        ChartData::Bars(series) => draw_bars(surface, series, geometry, theme),
        ChartData::Grouped(pair) => draw_grouped_bars(surface, pair, geometry, theme),
    }
}

/// Full pipeline onto an existing surface: aggregate, resolve geometry, render.
///
/// Returns the geometry used, or `None` when there is no surface to draw on.
pub fn redraw<S: Surface + ?Sized>(
    surface: Option<&mut S>,
    kind: ChartKind,
    records: &[Record],
    opts: &RenderOptions,
) -> Option<SurfaceGeometry> {
    let surface = surface?;
    let data = prepare(kind, records, opts);
    let geometry = resolve_geometry(kind, &data, opts);
    draw(Some(surface), &data, &geometry, &opts.theme);
    Some(geometry)
}

/// Render into a fresh in-memory canvas.
pub fn render_to_canvas(kind: ChartKind, records: &[Record], opts: &RenderOptions) -> PixelCanvas {
    let mut canvas = PixelCanvas::new(opts.theme.background);
    redraw(Some(&mut canvas), kind, records, opts);
    canvas
}

/// Render to `out_path`; `.svg` selects the SVG backend, anything else writes a bitmap
/// (format from the extension, PNG recommended).
pub fn render_to_file<P: AsRef<Path>>(
    out_path: P,
    kind: ChartKind,
    records: &[Record],
    opts: &RenderOptions,
) -> Result<SurfaceGeometry> {
    let out_path = out_path.as_ref();
    let data = prepare(kind, records, opts);
    let geometry = resolve_geometry(kind, &data, opts);
    let size = geometry.pixel_size();

    let outcome = if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let mut surface =
            PlottersSurface::new(SVGBackend::new(out_path, size), opts.theme.background);
        draw(Some(&mut surface), &data, &geometry, &opts.theme);
        let skipped = surface.failures();
        surface.present().map(|()| skipped)
    } else {
        let mut surface =
            PlottersSurface::new(BitMapBackend::new(out_path, size), opts.theme.background);
        draw(Some(&mut surface), &data, &geometry, &opts.theme);
        let skipped = surface.failures();
        surface.present().map(|()| skipped)
    };
    let skipped = outcome.with_context(|| format!("write chart {}", out_path.display()))?;
    if skipped > 0 {
        log::info!(
            "{} draw call(s) skipped for {} (labels need a font, see --font)",
            skipped,
            out_path.display()
        );
    }
    Ok(geometry)
}

static INIT_FONTS: Once = Once::new();

/// Candidate locations of a sans-serif TTF when none is configured.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Register a "sans-serif" font for the `ab_glyph` text path, which does not discover OS fonts.
///
/// Uses `font_path` when given, otherwise the first readable system candidate. Only the first
/// call has any effect. Returns whether a font was registered by this call.
pub fn ensure_fonts_registered(font_path: Option<&Path>) -> bool {
    let mut registered = false;
    INIT_FONTS.call_once(|| {
        let candidates: Vec<&Path> = match font_path {
            Some(p) => vec![p],
            None => SYSTEM_FONT_CANDIDATES.iter().map(Path::new).collect(),
        };
        for path in candidates {
            match try_register_font(path) {
                Ok(()) => {
                    log::debug!("registered label font {}", path.display());
                    registered = true;
                    return;
                }
                Err(e) => log::debug!("font {} not usable: {e}", path.display()),
            }
        }
        log::warn!("no label font registered; charts will be drawn without text");
    });
    registered
}

fn try_register_font(path: &Path) -> std::result::Result<(), ChartError> {
    let bytes = std::fs::read(path).map_err(|e| ChartError::Backend(e.to_string()))?;
    // The font registry keeps `'static` data for the lifetime of the process.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font("sans-serif", plotters::style::FontStyle::Normal, bytes)
        .map_err(|_| ChartError::Backend(format!("invalid font file {}", path.display())))
}
