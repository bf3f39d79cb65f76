use pubcharts::geometry::{ChartStyle, GeometryRequest, resolve};
use pubcharts::models::{ChartSeries, Record};
use pubcharts::surface::Surface;
use pubcharts::theme::ThemeColors;
use pubcharts::viz::{self, ChartKind, PixelCanvas, RenderOptions};
use std::fs;

fn sample_records() -> Vec<Record> {
    (0..30u64)
        .map(|i| Record {
            year: Some(2015 + (i % 8) as i32),
            cited_by_count: Some(i * i),
            is_published: Some(i % 3 != 0),
            ..Record::default()
        })
        .collect()
}

fn opts(width: f64, dpr: f64) -> RenderOptions {
    RenderOptions {
        container_width: Some(width),
        device_pixel_ratio: dpr,
        ..RenderOptions::default()
    }
}

#[test]
fn rendering_twice_is_bit_identical() {
    let records = sample_records();
    for kind in [
        ChartKind::PapersPerYear,
        ChartKind::TopCited,
        ChartKind::CitationHistogram,
    ] {
        for (w, dpr) in [(400.0, 1.0), (800.0, 2.0)] {
            let o = opts(w, dpr);
            let mut canvas = PixelCanvas::new(o.theme.background);
            viz::redraw(Some(&mut canvas), kind, &records, &o);
            let first = canvas.pixels().to_vec();
            viz::redraw(Some(&mut canvas), kind, &records, &o);
            assert_eq!(canvas.pixels(), first.as_slice(), "{kind:?} at {w}px x{dpr}");

            let fresh = viz::render_to_canvas(kind, &records, &o);
            assert_eq!(fresh.pixels(), first.as_slice());
        }
    }
}

#[test]
fn buffer_size_matches_scaled_geometry() {
    let canvas = viz::render_to_canvas(ChartKind::CitationHistogram, &sample_records(), &opts(801.0, 1.5));
    assert_eq!(canvas.width(), 1201);
    assert_eq!(canvas.pixels().len(), (canvas.width() * canvas.height() * 3) as usize);
}

#[test]
fn baseline_and_bars_reach_pixels() {
    let o = opts(520.0, 1.0);
    let theme = o.theme;
    let canvas = viz::render_to_canvas(ChartKind::PapersPerYear, &sample_records(), &o);

    // inner height = 280 - 10 - 22 = 248, baseline at y = 258
    assert_eq!(canvas.pixel(15, 258), Some(theme.border));
    // top padding stays background
    assert_eq!(canvas.pixel(5, 5), Some(theme.background));
    // the first bar (left edge at x = 10) is filled just above the baseline
    let inside = canvas.pixel(12, 250).unwrap();
    assert_ne!(inside, theme.background);
}

#[test]
fn bar_meets_baseline_and_fills_its_last_column() {
    let o = opts(520.0, 1.0);
    let records: Vec<Record> = (0..4)
        .map(|_| Record {
            year: Some(2020),
            ..Record::default()
        })
        .collect();
    let canvas = viz::render_to_canvas(ChartKind::PapersPerYear, &records, &o);
    let bg = o.theme.background;

    // one bar spanning x 10..510, y 10..258
    assert_ne!(canvas.pixel(12, 257), Some(bg));
    assert_ne!(canvas.pixel(509, 257), Some(bg));
    assert_ne!(canvas.pixel(509, 10), Some(bg));
    assert_eq!(canvas.pixel(510, 200), Some(bg));
    assert_eq!(canvas.pixel(200, 9), Some(bg));
}

#[test]
fn one_device_pixel_bar_is_painted() {
    let theme = ThemeColors::default();
    let g = resolve(GeometryRequest {
        container_width: Some(520.0),
        device_pixel_ratio: 1.0,
        style: ChartStyle::Bars,
        has_labels: false,
    });
    assert_eq!(g.inner_height, 258.0);

    let mut canvas = PixelCanvas::new(theme.background);
    viz::draw_bars(
        Some(&mut canvas),
        &ChartSeries::unlabeled(vec![258.0, 1.0]),
        &g,
        &theme,
    );

    // second slot starts at x = 10 + 240 + 20; its bar is the single row above the baseline
    assert_ne!(canvas.pixel(300, 267), Some(theme.background));
    assert_eq!(canvas.pixel(300, 266), Some(theme.background));
    assert_eq!(canvas.pixel(300, 268), Some(theme.border));
}

#[test]
fn reused_canvas_picks_up_new_background() {
    let records = sample_records();
    let mut o = opts(520.0, 1.0);
    let mut canvas = PixelCanvas::new(o.theme.background);
    viz::redraw(Some(&mut canvas), ChartKind::PapersPerYear, &records, &o);

    o.theme.background = pubcharts::theme::Rgb8::new(250, 250, 250);
    viz::redraw(Some(&mut canvas), ChartKind::PapersPerYear, &records, &o);
    assert_eq!(canvas.pixel(5, 5), Some(o.theme.background));
    // bottom-right corner is cleared too
    let (w, h) = (canvas.width(), canvas.height());
    assert_eq!(canvas.pixel(w - 1, h - 1), Some(o.theme.background));
}

#[test]
fn previous_content_does_not_leak_into_redraw() {
    let records = sample_records();
    let mut canvas = PixelCanvas::new(ThemeColors::default().background);
    viz::redraw(Some(&mut canvas), ChartKind::TopCited, &records, &opts(640.0, 1.0));
    viz::redraw(Some(&mut canvas), ChartKind::PapersPerYear, &records, &opts(640.0, 1.0));

    let direct = viz::render_to_canvas(ChartKind::PapersPerYear, &records, &opts(640.0, 1.0));
    assert_eq!(canvas.pixels(), direct.pixels());
}

#[test]
fn empty_records_render_empty_chart() {
    let o = opts(400.0, 1.0);
    let canvas = viz::render_to_canvas(ChartKind::CitationHistogram, &[], &o);
    assert!(canvas.width() > 0 && canvas.height() > 0);

    let mut c = PixelCanvas::new(o.theme.background);
    assert!(viz::redraw(Some(&mut c), ChartKind::PapersPerYear, &[], &o).is_some());
    assert!(viz::redraw::<PixelCanvas>(None, ChartKind::PapersPerYear, &[], &o).is_none());
}

#[test]
fn theme_change_shows_on_next_render() {
    let records = sample_records();
    let mut o = opts(520.0, 1.0);
    let mut canvas = PixelCanvas::new(o.theme.background);
    viz::redraw(Some(&mut canvas), ChartKind::PapersPerYear, &records, &o);

    o.theme.border = pubcharts::theme::Rgb8::new(255, 0, 255);
    viz::redraw(Some(&mut canvas), ChartKind::PapersPerYear, &records, &o);
    assert_eq!(canvas.pixel(15, 258), Some(o.theme.border));
}

#[test]
fn writes_png_and_svg_files() {
    let dir = tempfile::tempdir().unwrap();
    let records = sample_records();
    for name in ["hist.png", "hist.svg"] {
        let path = dir.path().join(name);
        let g = viz::render_to_file(&path, ChartKind::CitationHistogram, &records, &opts(400.0, 2.0))
            .unwrap();
        assert!(g.rotate_labels);
        let meta = fs::metadata(&path).unwrap();
        assert!(meta.len() > 0, "{name} is empty");
    }
    let svg = fs::read_to_string(dir.path().join("hist.svg")).unwrap();
    assert!(svg.contains("<svg"));
}

#[test]
fn resize_discards_pixels() {
    let mut c = PixelCanvas::new(ThemeColors::default().background);
    c.resize(10, 10);
    c.fill_rect(
        pubcharts::surface::Rect::new(0.0, 0.0, 10.0, 10.0),
        pubcharts::theme::Rgb8::new(255, 255, 255),
        1.0,
    );
    c.resize(10, 10);
    assert_eq!(c.pixel(5, 5), Some(ThemeColors::default().background));
}
