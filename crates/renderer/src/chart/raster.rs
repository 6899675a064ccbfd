//! Fallback chart backend drawing straight onto an RGBA buffer.
//!
//! Every style is approximated by bars whose height is proportional to
//! `value / max(values)`, with the chart title as a plain text label.

use image::{ImageBuffer, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use report_common::SeriesDescriptor;
use std::sync::Arc;

use super::{theme_for, ChartBackend, ChartError, ChartStyle, PlotArea};
use crate::color::map_color;
use crate::font::FontCascade;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const AXIS: Rgba<u8> = Rgba([90, 90, 90, 255]);
const LABEL: Rgba<u8> = Rgba([40, 40, 40, 255]);

/// Bar approximation renderer. Infallible.
#[derive(Debug, Clone)]
pub struct RasterChartBackend {
    fonts: Arc<FontCascade>,
}

impl RasterChartBackend {
    pub fn new(fonts: Arc<FontCascade>) -> Self {
        Self { fonts }
    }

    /// Draw the chart at exactly `width` x `height`.
    pub fn draw(&self, series: &SeriesDescriptor, width: u32, height: u32) -> RgbaImage {
        let mut img: RgbaImage = ImageBuffer::from_pixel(width, height, BACKGROUND);
        if width == 0 || height == 0 {
            return img;
        }

        let area = PlotArea::new(width, height);
        let values: Vec<f32> = series
            .values()
            .map(|v| if v.is_finite() { v.max(0.0) } else { 0.0 })
            .collect();
        let max = values.iter().cloned().fold(0.0f32, f32::max);

        if max > 0.0 {
            let style = ChartStyle::for_metric(series.metric);
            let theme = theme_for(series.metric);
            let band = area.band_width(values.len());
            let bar_width = (band * 0.7).max(1.0);

            for (i, &value) in values.iter().enumerate() {
                let bar_height = (value / max * area.height()).round();
                if bar_height < 1.0 {
                    continue;
                }

                let rgb = match style {
                    ChartStyle::CategoricalBar => map_color(value, series.metric),
                    ChartStyle::Area | ChartStyle::Line => theme.fill,
                };
                let color = Rgba([rgb.0[0], rgb.0[1], rgb.0[2], 255]);

                let x = (area.band_center(i, values.len()) - bar_width / 2.0).round() as i32;
                let y = (area.bottom - bar_height).round() as i32;
                let rect = Rect::at(x, y).of_size(bar_width.round().max(1.0) as u32, bar_height as u32);
                draw_filled_rect_mut(&mut img, rect, color);
            }
        }

        draw_line_segment_mut(&mut img, (area.left, area.bottom), (area.right, area.bottom), AXIS);
        draw_line_segment_mut(&mut img, (area.left, area.top), (area.left, area.bottom), AXIS);

        let font = self.fonts.resolve((height as f32 * 0.1).clamp(6.0, 16.0));
        font.draw_text(&mut img, LABEL, area.left.round() as i32 + 2, 1, &series.title);

        img
    }
}

impl ChartBackend for RasterChartBackend {
    fn name(&self) -> &'static str {
        "raster"
    }

    fn render(
        &self,
        series: &SeriesDescriptor,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, ChartError> {
        Ok(self.draw(series, width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_common::ChartMetric;

    fn backend() -> RasterChartBackend {
        RasterChartBackend::new(Arc::new(FontCascade::bitmap_only()))
    }

    fn series(metric: ChartMetric, values: &[f32]) -> SeriesDescriptor {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("p{}", i), *v))
            .collect();
        SeriesDescriptor::new(metric, points)
    }

    #[test]
    fn test_exact_size() {
        for (w, h) in [(300, 120), (17, 9), (1, 1), (640, 480)] {
            let img = backend().draw(&series(ChartMetric::WindSpeed, &[3.0, 12.0, 23.0]), w, h);
            assert_eq!(img.dimensions(), (w, h));
        }
    }

    #[test]
    fn test_zero_series_draws_no_bars() {
        let img = backend().draw(&series(ChartMetric::RainProbability, &[0.0, 0.0]), 200, 100);
        let theme = theme_for(ChartMetric::RainProbability).fill;
        let bar_pixels = img
            .pixels()
            .filter(|p| p.0[..3] == theme.0)
            .count();
        assert_eq!(bar_pixels, 0);
    }

    #[test]
    fn test_tallest_bar_reaches_top_of_plot() {
        let (w, h) = (200, 100);
        let img = backend().draw(&series(ChartMetric::LandslideRisk, &[2.0, 8.0]), w, h);
        let area = PlotArea::new(w, h);
        let fill = theme_for(ChartMetric::LandslideRisk).fill;

        let x = area.band_center(1, 2).round() as u32;
        let top = area.top.round() as u32 + 1;
        assert_eq!(img.get_pixel(x, top).0[..3], fill.0);

        let short_x = area.band_center(0, 2).round() as u32;
        assert_ne!(img.get_pixel(short_x, top).0[..3], fill.0);
    }

    #[test]
    fn test_bar_colors_follow_values() {
        let (w, h) = (280, 140);
        let img = backend().draw(&series(ChartMetric::WindSpeed, &[3.0, 23.0]), w, h);
        let area = PlotArea::new(w, h);
        let y = (area.bottom - 3.0) as u32;

        let low = img.get_pixel(area.band_center(0, 2) as u32, y);
        let high = img.get_pixel(area.band_center(1, 2) as u32, y);
        assert_eq!(low.0[..3], map_color(3.0, ChartMetric::WindSpeed).0);
        assert_eq!(high.0[..3], map_color(23.0, ChartMetric::WindSpeed).0);
    }
}
