//! Preferred chart backend: SVG description rasterized with resvg.
//!
//! The document is sized in inches and parsed at a fixed DPI, then scaled
//! onto a pixmap of exactly the requested size.

use image::{Rgba, RgbaImage};
use report_common::{ChartMetric, SeriesDescriptor};
use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;

use super::{theme_for, ChartBackend, ChartError, ChartStyle, PlotArea};
use crate::color::{map_color, to_hex};

/// Resolution at which chart documents are rasterized.
pub const CHART_DPI: f32 = 100.0;

const FONT_FAMILY: &str = "DejaVu Sans, Liberation Sans, Arial, sans-serif";

/// SVG → resvg chart renderer.
#[derive(Clone)]
pub struct SvgChartBackend {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for SvgChartBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgChartBackend")
            .field("font_faces", &self.fontdb.len())
            .finish()
    }
}

impl Default for SvgChartBackend {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl SvgChartBackend {
    /// Backend using the system fonts plus every readable file in `candidates`.
    pub fn new(candidates: &[PathBuf]) -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        for path in candidates.iter().filter(|p| p.is_file()) {
            if let Err(e) = fontdb.load_font_file(path) {
                tracing::debug!(path = %path.display(), error = %e, "Skipping chart font");
            }
        }
        tracing::debug!(faces = fontdb.len(), "Loaded chart font faces");
        Self::with_fontdb(fontdb)
    }

    pub fn with_fontdb(fontdb: usvg::fontdb::Database) -> Self {
        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Check the backend can draw labeled charts in this process.
    ///
    /// Without any font face usvg silently drops every text node, so an
    /// empty database counts as a failure.
    pub fn self_test(&self) -> Result<(), ChartError> {
        if self.fontdb.is_empty() {
            return Err(ChartError::NoFonts);
        }
        let sample = SeriesDescriptor::new(
            ChartMetric::RainProbability,
            vec![("a".to_string(), 10.0), ("b".to_string(), 90.0)],
        );
        let img = self.rasterize(&build_svg(&sample, 32, 24), 32, 24)?;
        if img.dimensions() != (32, 24) {
            return Err(ChartError::Pixmap {
                width: 32,
                height: 24,
            });
        }
        Ok(())
    }

    /// Parse `svg` at [`CHART_DPI`] and rasterize to `width` x `height`.
    pub fn rasterize(&self, svg: &str, width: u32, height: u32) -> Result<RgbaImage, ChartError> {
        let mut opt = usvg::Options::default();
        opt.dpi = CHART_DPI;
        opt.fontdb = Arc::clone(&self.fontdb);

        let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| ChartError::Svg(e.to_string()))?;

        let mut pixmap =
            tiny_skia::Pixmap::new(width, height).ok_or(ChartError::Pixmap { width, height })?;

        let size = tree.size();
        let transform = tiny_skia::Transform::from_scale(
            width as f32 / size.width(),
            height as f32 / size.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        Ok(pixmap_to_image(&pixmap))
    }
}

impl ChartBackend for SvgChartBackend {
    fn name(&self) -> &'static str {
        "svg"
    }

    fn render(
        &self,
        series: &SeriesDescriptor,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, ChartError> {
        let svg = build_svg(series, width, height);
        self.rasterize(&svg, width, height)
    }
}

/// Convert a premultiplied tiny-skia pixmap to a straight-alpha image.
fn pixmap_to_image(pixmap: &tiny_skia::Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

/// Build the SVG chart description for `series` at `width` x `height` pixels.
pub fn build_svg(series: &SeriesDescriptor, width: u32, height: u32) -> String {
    let area = PlotArea::new(width, height);
    let (w, h) = (width.max(1) as f32, height.max(1) as f32);
    let title_size = (h * 0.1).clamp(6.0, 16.0);
    let label_size = (h * 0.075).clamp(5.0, 11.0);

    let mut svg = String::with_capacity(4096);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.4}in" height="{:.4}in" viewBox="0 0 {} {}">"#,
        w / CHART_DPI,
        h / CHART_DPI,
        w,
        h
    );
    svg.push_str(r##"<rect width="100%" height="100%" fill="#FFFFFF"/>"##);

    write_grid(&mut svg, &area, series.y_domain, label_size);

    match ChartStyle::for_metric(series.metric) {
        ChartStyle::Area => write_area(&mut svg, &area, series),
        ChartStyle::CategoricalBar => write_bars(&mut svg, &area, series),
        ChartStyle::Line => write_line(&mut svg, &area, series),
    }

    let count = series.len();
    for (i, label) in series.labels().enumerate() {
        let _ = write!(
            svg,
            r##"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}" text-anchor="middle" fill="#333333">{}</text>"##,
            area.band_center(i, count),
            area.bottom + label_size + 2.0,
            FONT_FAMILY,
            label_size,
            escape_xml(label)
        );
    }

    let _ = write!(
        svg,
        r##"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}" font-weight="bold" text-anchor="middle" fill="#222222">{}</text>"##,
        w / 2.0,
        title_size + 1.0,
        FONT_FAMILY,
        title_size,
        escape_xml(&series.title)
    );

    svg.push_str("</svg>");
    svg
}

/// Horizontal gridlines at the domain bounds and midpoint, plus axes.
fn write_grid(svg: &mut String, area: &PlotArea, domain: (f32, f32), label_size: f32) {
    let (lo, hi) = domain;
    for value in [lo, (lo + hi) / 2.0, hi] {
        let y = area.y_for(value, domain);
        let _ = write!(
            svg,
            r##"<line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="#DDDDDD" stroke-width="0.8"/>"##,
            area.left, area.right
        );
        let _ = write!(
            svg,
            r##"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.1}" text-anchor="end" fill="#555555">{}</text>"##,
            area.left - 2.0,
            y + label_size / 3.0,
            FONT_FAMILY,
            label_size,
            format_tick(value)
        );
    }
    let _ = write!(
        svg,
        r##"<path d="M {l:.2} {t:.2} L {l:.2} {b:.2} L {r:.2} {b:.2}" fill="none" stroke="#777777" stroke-width="1"/>"##,
        l = area.left,
        t = area.top,
        b = area.bottom,
        r = area.right
    );
}

fn write_area(svg: &mut String, area: &PlotArea, series: &SeriesDescriptor) {
    let points = data_points(area, series);
    let Some(first) = points.first() else {
        return;
    };
    let Some(last) = points.last() else {
        return;
    };

    let theme = theme_for(series.metric);
    let curve = smooth_path(&points, area);

    let _ = write!(
        svg,
        r#"<path d="M {:.2} {:.2} L {:.2} {:.2} {} L {:.2} {:.2} Z" fill="{}" fill-opacity="0.55" stroke="none"/>"#,
        first.0,
        area.bottom,
        first.0,
        first.1,
        curve,
        last.0,
        area.bottom,
        to_hex(theme.fill)
    );
    let _ = write!(
        svg,
        r#"<path d="M {:.2} {:.2} {}" fill="none" stroke="{}" stroke-width="2"/>"#,
        first.0,
        first.1,
        curve,
        to_hex(theme.stroke)
    );
}

fn write_bars(svg: &mut String, area: &PlotArea, series: &SeriesDescriptor) {
    let count = series.len();
    let bar_width = area.band_width(count) * 0.7;

    for (i, value) in series.values().enumerate() {
        let top = area.y_for(value, series.y_domain);
        let _ = write!(
            svg,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
            area.band_center(i, count) - bar_width / 2.0,
            top,
            bar_width,
            area.bottom - top,
            to_hex(map_color(value, series.metric))
        );
    }
}

fn write_line(svg: &mut String, area: &PlotArea, series: &SeriesDescriptor) {
    let points = data_points(area, series);
    if points.is_empty() {
        return;
    }

    let color = to_hex(theme_for(series.metric).stroke);
    let coords: Vec<String> = points
        .iter()
        .map(|(x, y)| format!("{:.2},{:.2}", x, y))
        .collect();
    let _ = write!(
        svg,
        r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
        coords.join(" "),
        color
    );
    for (x, y) in &points {
        let _ = write!(
            svg,
            r#"<circle cx="{:.2}" cy="{:.2}" r="2.5" fill="{}"/>"#,
            x, y, color
        );
    }
}

fn data_points(area: &PlotArea, series: &SeriesDescriptor) -> Vec<(f32, f32)> {
    let count = series.len();
    series
        .values()
        .enumerate()
        .map(|(i, v)| (area.band_center(i, count), area.y_for(v, series.y_domain)))
        .collect()
}

/// Catmull-Rom spline through `points` as cubic Bézier segments.
///
/// Control points are clamped to the plot area so the curve never leaves
/// the y-domain.
pub fn smooth_path(points: &[(f32, f32)], area: &PlotArea) -> String {
    let mut d = String::new();
    let clamp_y = |y: f32| y.clamp(area.top, area.bottom);

    for i in 0..points.len().saturating_sub(1) {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(points.len() - 1)];

        let c1 = (p1.0 + (p2.0 - p0.0) / 6.0, clamp_y(p1.1 + (p2.1 - p0.1) / 6.0));
        let c2 = (p2.0 - (p3.0 - p1.0) / 6.0, clamp_y(p2.1 - (p3.1 - p1.1) / 6.0));

        let _ = write!(
            d,
            "C {:.2} {:.2} {:.2} {:.2} {:.2} {:.2} ",
            c1.0, c1.1, c2.0, c2.1, p2.0, p2.1
        );
    }

    d.trim_end().to_string()
}

fn format_tick(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weekly(metric: ChartMetric, values: &[f32]) -> SeriesDescriptor {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("D{}", i), *v))
            .collect();
        SeriesDescriptor::new(metric, points)
    }

    #[test]
    fn test_self_test_fails_without_font_faces() {
        let backend = SvgChartBackend::with_fontdb(usvg::fontdb::Database::new());
        assert!(matches!(backend.self_test(), Err(ChartError::NoFonts)));
    }

    #[test]
    fn test_missing_candidates_are_skipped() {
        let backend = SvgChartBackend::new(&[PathBuf::from("/nonexistent/font.ttf")]);
        assert!(format!("{:?}", backend).contains("font_faces"));
    }

    #[test]
    fn test_bar_svg_colors_each_bar() {
        let svg = build_svg(&weekly(ChartMetric::WindSpeed, &[3.0, 23.0]), 300, 150);
        assert!(svg.contains(&to_hex(map_color(3.0, ChartMetric::WindSpeed))));
        assert!(svg.contains(&to_hex(map_color(23.0, ChartMetric::WindSpeed))));
        assert_eq!(svg.matches("<rect").count(), 1 + 2);
    }

    #[test]
    fn test_line_svg_has_no_fill() {
        let svg = build_svg(&weekly(ChartMetric::RainProbability, &[10.0, 50.0, 90.0]), 300, 150);
        assert!(svg.contains("<polyline"));
        assert!(!svg.contains("fill-opacity"));
        assert_eq!(svg.matches("<circle").count(), 3);
    }

    #[test]
    fn test_area_svg_is_smoothed_and_filled() {
        let svg = build_svg(&weekly(ChartMetric::FireRisk, &[1.0, 5.0, 2.0, 9.0]), 300, 150);
        assert!(svg.contains("fill-opacity"));
        assert!(svg.contains(" C "));
    }

    #[test]
    fn test_document_sized_in_inches_at_fixed_dpi() {
        let svg = build_svg(&weekly(ChartMetric::Temperature, &[25.0]), 250, 100);
        assert!(svg.contains(r#"width="2.5000in""#));
        assert!(svg.contains(r#"height="1.0000in""#));
        assert!(svg.contains(r#"viewBox="0 0 250 100""#));
    }

    #[test]
    fn test_labels_are_escaped() {
        let mut series = weekly(ChartMetric::WindSpeed, &[1.0]);
        series.points[0].0 = "<Mon & Tue>".into();
        let svg = build_svg(&series, 200, 100);
        assert!(svg.contains("&lt;Mon &amp; Tue&gt;"));
    }

    #[test]
    fn test_smooth_path_stays_in_area() {
        let area = PlotArea::new(200, 100);
        let points = vec![(20.0, area.bottom), (60.0, area.top), (100.0, area.bottom), (140.0, area.top)];
        let d = smooth_path(&points, &area);
        let numbers: Vec<f32> = d
            .split_whitespace()
            .filter_map(|t| t.parse().ok())
            .collect();
        for pair in numbers.chunks(2) {
            assert!(pair[1] >= area.top - 0.01 && pair[1] <= area.bottom + 0.01);
        }
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(25.0), "25");
        assert_eq!(format_tick(12.5), "12.5");
    }
}
