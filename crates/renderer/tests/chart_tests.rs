//! Tests for chart rendering and backend fallback.

use image::RgbaImage;
use renderer::chart::{
    prepare_series, ChartBackend, ChartError, ChartRenderer, ChartStyle, PlotArea,
    RasterChartBackend, SvgChartBackend,
};
use renderer::font::FontCascade;
use report_common::{ChartBackendPreference, ChartMetric, SeriesDescriptor};
use std::sync::Arc;
use test_utils::require_system_font;

fn series(metric: ChartMetric, values: &[f32]) -> SeriesDescriptor {
    let points = values
        .iter()
        .enumerate()
        .map(|(i, v)| (format!("P{}", i), *v))
        .collect();
    SeriesDescriptor::new(metric, points)
}

fn fonts() -> Arc<FontCascade> {
    Arc::new(FontCascade::bitmap_only())
}

fn non_white_pixels(img: &RgbaImage) -> usize {
    img.pixels()
        .filter(|p| p.0[0] < 250 || p.0[1] < 250 || p.0[2] < 250)
        .count()
}

/// A backend that always fails, to exercise the fallback path.
struct FailingBackend;

impl ChartBackend for FailingBackend {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn render(&self, _: &SeriesDescriptor, _: u32, _: u32) -> Result<RgbaImage, ChartError> {
        Err(ChartError::Svg("forced failure".to_string()))
    }
}

/// A backend that ignores the requested size.
struct WrongSizeBackend;

impl ChartBackend for WrongSizeBackend {
    fn name(&self) -> &'static str {
        "wrong-size"
    }

    fn render(&self, _: &SeriesDescriptor, _: u32, _: u32) -> Result<RgbaImage, ChartError> {
        Ok(RgbaImage::new(17, 9))
    }
}

// ============================================================================
// Fallback behavior
// ============================================================================

#[test]
fn test_raster_fallback_exact_size() {
    let backend = RasterChartBackend::new(fonts());
    for (w, h) in [(300, 150), (1, 1), (726, 114), (37, 500)] {
        let img = backend
            .render(&series(ChartMetric::WindSpeed, &[3.0, 9.0, 23.0]), w, h)
            .unwrap();
        assert_eq!(img.dimensions(), (w, h));
    }
}

#[test]
fn test_failing_backend_falls_back() {
    let renderer = ChartRenderer::with_backend(Box::new(FailingBackend), fonts());
    let img = renderer.render_chart(&series(ChartMetric::Temperature, &[22.0, 30.0, 41.0]), 240, 120);
    assert_eq!(img.dimensions(), (240, 120));
    assert!(non_white_pixels(&img) > 0);
}

#[test]
fn test_wrong_size_output_is_resized() {
    let renderer = ChartRenderer::with_backend(Box::new(WrongSizeBackend), fonts());
    let img = renderer.render_chart(&series(ChartMetric::FireRisk, &[1.0]), 200, 80);
    assert_eq!(img.dimensions(), (200, 80));
}

#[test]
fn test_zero_sized_request() {
    let renderer = ChartRenderer::raster_only(fonts());
    let img = renderer.render_chart(&series(ChartMetric::WindSpeed, &[1.0]), 0, 50);
    assert_eq!(img.dimensions(), (0, 50));
}

#[test]
fn test_raster_preference() {
    let renderer = ChartRenderer::select(ChartBackendPreference::Raster, fonts());
    assert_eq!(renderer.backend_name(), "raster");
}

// ============================================================================
// Truncation
// ============================================================================

#[test]
fn test_weekly_series_truncated_to_seven() {
    let values: Vec<f32> = (0..10).map(|i| i as f32 * 2.0).collect();
    let long = series(ChartMetric::WindSpeed, &values);

    let prepared = prepare_series(&long);
    assert_eq!(prepared.len(), 7);
    let labels: Vec<&str> = prepared.labels().collect();
    assert_eq!(labels, vec!["P0", "P1", "P2", "P3", "P4", "P5", "P6"]);
    assert_eq!(prepared.values().last(), Some(12.0));

    let renderer = ChartRenderer::raster_only(fonts());
    assert_eq!(renderer.render_chart(&long, 350, 140).dimensions(), (350, 140));
}

#[test]
fn test_yearly_series_keeps_twelve() {
    let values: Vec<f32> = (0..12).map(|i| i as f32 / 2.0).collect();
    assert_eq!(prepare_series(&series(ChartMetric::LandslideRisk, &values)).len(), 12);
    assert_eq!(ChartStyle::for_metric(ChartMetric::Temperature).max_points(), 7);
}

// ============================================================================
// SVG backend
// ============================================================================

fn svg_backend() -> SvgChartBackend {
    let candidates: Vec<_> = test_utils::find_system_font().into_iter().collect();
    SvgChartBackend::new(&candidates)
}

/// Dark pixels above the plot area, where the chart title sits.
fn title_ink(img: &RgbaImage) -> usize {
    let top = PlotArea::new(img.width(), img.height()).top as u32;
    img.enumerate_pixels()
        .filter(|(_, y, p)| *y < top && p.0[0] < 150 && p.0[1] < 150 && p.0[2] < 150)
        .count()
}

#[test]
fn test_svg_backend_self_test() {
    let _ = require_system_font!();
    svg_backend().self_test().unwrap();
}

#[test]
fn test_svg_backend_without_fonts_fails_self_test() {
    let backend = SvgChartBackend::with_fontdb(usvg::fontdb::Database::new());
    assert!(matches!(backend.self_test(), Err(ChartError::NoFonts)));
}

#[test]
fn test_auto_preference_rejects_backend_without_fonts() {
    let empty = SvgChartBackend::with_fontdb(usvg::fontdb::Database::new());
    let renderer = ChartRenderer::select_with(ChartBackendPreference::Auto, Some(empty), fonts());
    assert_eq!(renderer.backend_name(), "raster");

    // The raster backend still labels the chart through the font cascade
    let img = renderer.render_chart(&series(ChartMetric::FireRisk, &[2.0, 5.0, 8.0]), 320, 110);
    assert!(title_ink(&img) > 0);
}

#[test]
fn test_svg_backend_draws_title_with_candidate_font_only() {
    let font_path = require_system_font!();
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_font_file(&font_path).unwrap();
    let with_font = SvgChartBackend::with_fontdb(fontdb);
    with_font.self_test().unwrap();

    let s = series(ChartMetric::Temperature, &[3.0, 7.0, 5.0]);
    let labeled = with_font.render(&s, 320, 110).unwrap();
    let bare = SvgChartBackend::with_fontdb(usvg::fontdb::Database::new())
        .render(&s, 320, 110)
        .unwrap();

    assert_eq!(title_ink(&bare), 0);
    assert!(title_ink(&labeled) > 0);
}

#[test]
fn test_select_loads_cascade_candidates_into_svg_backend() {
    let font_path = require_system_font!();
    let cascade = Arc::new(FontCascade::new(vec![font_path]));
    let renderer = ChartRenderer::select(ChartBackendPreference::Svg, cascade);
    assert_eq!(renderer.backend_name(), "svg");
}

#[test]
fn test_svg_backend_exact_size_for_every_metric() {
    let backend = SvgChartBackend::default();
    for metric in ChartMetric::ALL {
        let s = series(metric, &[1.0, 4.0, 9.0, 2.0, 7.0, 3.0, 8.0]);
        let img = backend.render(&s, 320, 110).unwrap();
        assert_eq!(img.dimensions(), (320, 110), "{:?}", metric);
        assert!(non_white_pixels(&img) > 0, "{:?} drew nothing", metric);
    }
}

#[test]
fn test_svg_bars_use_mapped_colors() {
    let backend = SvgChartBackend::default();
    let img = backend
        .render(&series(ChartMetric::WindSpeed, &[24.0, 24.0]), 300, 150)
        .unwrap();
    let red = renderer::color::ColorClass::Red.rgb().0;
    let matches = img
        .pixels()
        .filter(|p| p.0[0] == red[0] && p.0[1] == red[1] && p.0[2] == red[2])
        .count();
    assert!(matches > 100, "found {} red pixels", matches);
}

#[test]
fn test_auto_preference_picks_a_backend() {
    let renderer = ChartRenderer::select(ChartBackendPreference::Auto, fonts());
    assert!(["svg", "raster"].contains(&renderer.backend_name()));
}
