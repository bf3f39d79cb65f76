use pubcharts::aggregate::histogram;
use pubcharts::geometry::{ChartStyle, GeometryRequest, SurfaceGeometry, resolve};
use pubcharts::models::{PairedSeries, Record};
use pubcharts::surface::{RecordingSurface, TextAlign, TextBaseline};
use pubcharts::theme::ThemeColors;
use pubcharts::viz::draw_grouped_bars;
use pubcharts::viz::grouped::{FIRST_ALPHA, SECOND_ALPHA};

fn geometry(width: f64) -> SurfaceGeometry {
    resolve(GeometryRequest {
        container_width: Some(width),
        device_pixel_ratio: 1.0,
        style: ChartStyle::GroupedBars,
        has_labels: true,
    })
}

fn sample_pair() -> PairedSeries {
    let recs: Vec<Record> = [0u64, 3, 3, 20, 75, 150, 300, 900]
        .into_iter()
        .enumerate()
        .map(|(i, c)| Record {
            cited_by_count: Some(c),
            is_published: Some(i % 2 == 0),
            ..Record::default()
        })
        .collect();
    histogram(&recs)
}

#[test]
fn two_bars_per_category_with_alpha_distinction() {
    let pair = sample_pair();
    let g = geometry(800.0);
    let mut s = RecordingSurface::new();
    draw_grouped_bars(Some(&mut s), &pair, &g, &ThemeColors::default());

    let rects = s.fill_rects();
    assert_eq!(rects.len(), 2 * pair.labels.len());
    for chunk in rects.chunks(2) {
        assert_eq!(chunk[0].1, FIRST_ALPHA);
        assert_eq!(chunk[1].1, SECOND_ALPHA);
        assert_eq!(chunk[0].0.width, chunk[1].0.width);
        assert!(chunk[1].0.x > chunk[0].0.x + chunk[0].0.width);
    }
}

#[test]
fn series_share_one_maximum() {
    let pair = PairedSeries {
        labels: vec!["a".into(), "b".into()],
        first: vec![2.0, 1.0],
        second: vec![4.0, 0.0],
    };
    let g = geometry(800.0);
    let mut s = RecordingSurface::new();
    draw_grouped_bars(Some(&mut s), &pair, &g, &ThemeColors::default());

    let rects = s.fill_rects();
    // second series' 4 is the shared max
    assert!((rects[1].0.height - g.inner_height).abs() < 1e-9);
    assert!((rects[0].0.height - g.inner_height / 2.0).abs() < 1e-9);
    assert_eq!(rects[3].0.height, 0.0);
}

#[test]
fn wide_chart_draws_every_label_unrotated() {
    let pair = sample_pair();
    let g = geometry(800.0);
    assert!(!g.rotate_labels);
    let mut s = RecordingSurface::new();
    draw_grouped_bars(Some(&mut s), &pair, &g, &ThemeColors::default());

    let texts = s.texts();
    assert_eq!(texts.len(), 7);
    for (_, at, style) in &texts {
        assert_eq!(style.rotation, 0.0);
        assert_eq!(style.align, TextAlign::Center);
        assert_eq!(style.baseline, TextBaseline::Alphabetic);
        assert_eq!(at.y, g.baseline_y() + 10.0 + 12.0);
    }
}

#[test]
fn narrow_chart_rotates_and_thins_labels() {
    let pair = sample_pair();
    let g = geometry(240.0);
    assert!(g.rotate_labels);
    // 216 / 7 < 34 → every second label
    let mut s = RecordingSurface::new();
    draw_grouped_bars(Some(&mut s), &pair, &g, &ThemeColors::default());

    let texts = s.texts();
    let labels: Vec<&str> = texts.iter().map(|(t, _, _)| *t).collect();
    assert_eq!(labels, vec!["0", "10-49", "100-249", "500+"]);
    for (_, at, style) in &texts {
        assert!((style.rotation + std::f64::consts::FRAC_PI_4).abs() < 1e-12);
        assert_eq!(style.align, TextAlign::Right);
        assert_eq!(style.baseline, TextBaseline::Top);
        assert_eq!(at.y, g.baseline_y() + 10.0);
    }
}

#[test]
fn rotated_but_roomy_chart_keeps_all_labels() {
    let pair = sample_pair();
    // 400 wide: rotated, inner 376 / 7 ≈ 53.7 ≥ 34
    let g = geometry(400.0);
    assert!(g.rotate_labels);
    let mut s = RecordingSurface::new();
    draw_grouped_bars(Some(&mut s), &pair, &g, &ThemeColors::default());
    assert_eq!(s.texts().len(), 7);
}

#[test]
fn labels_centered_on_groups() {
    let pair = sample_pair();
    let g = geometry(800.0);
    let mut s = RecordingSurface::new();
    draw_grouped_bars(Some(&mut s), &pair, &g, &ThemeColors::default());

    let rects = s.fill_rects();
    for (i, (_, at, _)) in s.texts().iter().enumerate() {
        let left = rects[2 * i].0;
        let right = rects[2 * i + 1].0;
        let center = (left.x + right.x + right.width) / 2.0;
        assert!((at.x - center).abs() < 1e-9);
    }
}

#[test]
fn unlabeled_pair_uses_longest_series() {
    let pair = PairedSeries {
        labels: vec![],
        first: vec![1.0, 2.0, 3.0],
        second: vec![1.0],
    };
    let g = geometry(800.0);
    let mut s = RecordingSurface::new();
    draw_grouped_bars(Some(&mut s), &pair, &g, &ThemeColors::default());
    assert_eq!(s.fill_rects().len(), 6);
}

#[test]
fn empty_pair_draws_nothing_but_frame() {
    let g = geometry(800.0);
    let mut s = RecordingSurface::new();
    draw_grouped_bars(Some(&mut s), &PairedSeries::default(), &g, &ThemeColors::default());
    assert!(s.fill_rects().is_empty());
    assert!(s.texts().is_empty());
}

#[test]
fn absent_surface_is_a_noop() {
    draw_grouped_bars::<RecordingSurface>(
        None,
        &sample_pair(),
        &geometry(400.0),
        &ThemeColors::default(),
    );
}
