//! Text measurement heuristics (plotters has no layout-independent text metrics).

/// Average glyph advance as a fraction of the font size.
const ADVANCE_EM: f64 = 0.60;

/// Heuristic: estimate the CSS-pixel width of `text` at `font_px`.
pub fn estimate_text_width_px(text: &str, font_px: f64) -> f64 {
    (text.chars().count() as f64) * font_px * ADVANCE_EM
}

/// Per-character offsets along the text direction for a label of `text`, measured from the
/// start of the string, plus the total advance.
pub fn glyph_offsets(text: &str, font_px: f64) -> (Vec<f64>, f64) {
    let advance = font_px * ADVANCE_EM;
    let offsets: Vec<f64> = (0..text.chars().count())
        .map(|i| i as f64 * advance)
        .collect();
    (offsets, estimate_text_width_px(text, font_px))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_scales_with_length_and_size() {
        assert_eq!(estimate_text_width_px("", 12.0), 0.0);
        assert!((estimate_text_width_px("2024", 12.0) - 28.8).abs() < 1e-9);
        assert!(estimate_text_width_px("100-249", 24.0) > estimate_text_width_px("100-249", 12.0));
    }

    #[test]
    fn offsets_cover_total_width() {
        let (offs, total) = glyph_offsets("500+", 10.0);
        assert_eq!(offs, vec![0.0, 6.0, 12.0, 18.0]);
        assert!((total - estimate_text_width_px("500+", 10.0)).abs() < 1e-9);
    }
}
