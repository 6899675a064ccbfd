//! Composition of the full report raster.
//!
//! Draw order: background, header, then each panel (fill, border, icon,
//! text, chart). Every resource has a drawn fallback, so composing only
//! fails when the canvas itself cannot be allocated.

use chrono::{DateTime, Utc};
use image::{imageops, imageops::FilterType, Rgb, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use report_common::{PanelDescriptor, RenderConfig, ReportError, ReportRequest, ReportResult};
use std::sync::Arc;

use crate::assets::load_image;
use crate::chart::ChartRenderer;
use crate::color::interpolate_color;
use crate::font::FontCascade;
use crate::layout::{layout, LayoutGrid, PanelRegions, Rect};

/// Largest canvas the composer will allocate, in pixels.
const MAX_CANVAS_PIXELS: u64 = 64 * 1024 * 1024;

const GRADIENT_TOP: Rgb<u8> = Rgb([18, 52, 86]);
const GRADIENT_BOTTOM: Rgb<u8> = Rgb([120, 180, 200]);
const PANEL_FILL: Rgba<u8> = Rgba([255, 255, 255, 190]);
const PANEL_BORDER: Rgba<u8> = Rgba([60, 60, 60, 255]);
const ICON_PLACEHOLDER: Rgba<u8> = Rgba([170, 170, 170, 255]);
const HEADER_TEXT: Rgba<u8> = Rgba([255, 255, 255, 255]);
const TITLE_TEXT: Rgba<u8> = Rgba([45, 45, 45, 255]);
const VALUE_TEXT: Rgba<u8> = Rgba([15, 15, 15, 255]);
const DESCRIPTION_TEXT: Rgba<u8> = Rgba([90, 90, 90, 255]);

/// Draws panel descriptors onto a fixed-size canvas.
#[derive(Debug)]
pub struct Composer {
    config: RenderConfig,
    fonts: Arc<FontCascade>,
    charts: ChartRenderer,
}

impl Composer {
    pub fn new(config: RenderConfig, fonts: Arc<FontCascade>, charts: ChartRenderer) -> Self {
        Self {
            config,
            fonts,
            charts,
        }
    }

    pub fn charts(&self) -> &ChartRenderer {
        &self.charts
    }

    pub fn compose(
        &self,
        request: &ReportRequest,
        panels: &[PanelDescriptor],
        timestamp: DateTime<Utc>,
    ) -> ReportResult<RgbaImage> {
        let (width, height) = (self.config.canvas_width, self.config.canvas_height);
        let mut canvas = self.background(width, height)?;
        let grid = layout(width, height);

        self.draw_header(&mut canvas, &grid, request, timestamp);

        for (panel, cell) in panels.iter().zip(grid.cells.iter()) {
            self.draw_panel(&mut canvas, panel, cell);
        }

        Ok(canvas)
    }

    fn background(&self, width: u32, height: u32) -> ReportResult<RgbaImage> {
        let pixels = width as u64 * height as u64;
        if pixels == 0 || pixels > MAX_CANVAS_PIXELS {
            return Err(ReportError::Canvas(format!(
                "cannot allocate {}x{} canvas",
                width, height
            )));
        }

        if let Some(image) = load_image(&self.config.background_path()) {
            tracing::debug!(
                width = image.width(),
                height = image.height(),
                "Scaling background image to canvas"
            );
            return Ok(imageops::resize(&image, width, height, FilterType::Lanczos3));
        }

        Ok(vertical_gradient(width, height, GRADIENT_TOP, GRADIENT_BOTTOM))
    }

    fn draw_header(
        &self,
        canvas: &mut RgbaImage,
        grid: &LayoutGrid,
        request: &ReportRequest,
        timestamp: DateTime<Utc>,
    ) {
        let header = grid.header;
        if header.is_empty() {
            return;
        }

        let title_font = self.fonts.resolve(header.height as f32 * 0.4);
        let title = format!("Site Report: {}", request.coordinates_label());
        let title_y = header.y as i32 + (header.height as i32 - title_font.line_height()) / 2;
        title_font.draw_text(canvas, HEADER_TEXT, header.x as i32, title_y, &title);

        let stamp_font = self.fonts.resolve(header.height as f32 * 0.25);
        let stamp = timestamp.format("Generated: %Y-%m-%d %H:%M UTC").to_string();
        let stamp_x = header.right() as i32 - stamp_font.text_width(&stamp);
        let stamp_y = header.y as i32 + (header.height as i32 - stamp_font.line_height()) / 2;
        stamp_font.draw_text(canvas, HEADER_TEXT, stamp_x.max(0), stamp_y, &stamp);
    }

    fn draw_panel(&self, canvas: &mut RgbaImage, panel: &PanelDescriptor, cell: &Rect) {
        if cell.is_empty() {
            return;
        }
        let regions = PanelRegions::for_cell(cell);

        let fill = RgbaImage::from_pixel(cell.width, cell.height, PANEL_FILL);
        imageops::overlay(canvas, &fill, cell.x as i64, cell.y as i64);
        draw_hollow_rect_mut(canvas, to_imageproc(cell), PANEL_BORDER);

        self.draw_icon(canvas, panel, &regions.icon);
        self.draw_text(canvas, panel, &regions);

        if let Some(series) = &panel.series {
            let area = regions.chart;
            if !area.is_empty() {
                let chart = self.charts.render_chart(series, area.width, area.height);
                let chart = if chart.dimensions() == (area.width, area.height) {
                    chart
                } else {
                    imageops::resize(&chart, area.width, area.height, FilterType::Lanczos3)
                };
                imageops::overlay(canvas, &chart, area.x as i64, area.y as i64);
            }
        }
    }

    fn draw_icon(&self, canvas: &mut RgbaImage, panel: &PanelDescriptor, slot: &Rect) {
        if slot.is_empty() {
            return;
        }

        match load_image(&self.config.icon_path(panel.kind.icon_name())) {
            Some(icon) => {
                let icon = imageops::resize(&icon, slot.width, slot.height, FilterType::Lanczos3);
                imageops::overlay(canvas, &icon, slot.x as i64, slot.y as i64);
            }
            None => draw_filled_rect_mut(canvas, to_imageproc(slot), ICON_PLACEHOLDER),
        }
    }

    fn draw_text(&self, canvas: &mut RgbaImage, panel: &PanelDescriptor, regions: &PanelRegions) {
        let area = regions.text;
        if area.is_empty() {
            return;
        }

        let lines = [
            (regions.title_size(), TITLE_TEXT, panel.title.as_str()),
            (regions.value_size(), VALUE_TEXT, panel.value.as_str()),
            (regions.description_size(), DESCRIPTION_TEXT, panel.description.as_str()),
        ];

        let spacing = (regions.padding / 2) as i32;
        let mut y = area.y as i32;
        for (size, color, text) in lines {
            let font = self.fonts.resolve(size);
            if y + font.line_height() > area.bottom() as i32 {
                break;
            }
            font.draw_text(canvas, color, area.x as i32, y, text);
            y += font.line_height() + spacing;
        }
    }
}

/// Top-to-bottom linear blend between two colors.
pub fn vertical_gradient(width: u32, height: u32, top: Rgb<u8>, bottom: Rgb<u8>) -> RgbaImage {
    let span = height.saturating_sub(1).max(1) as f32;
    let mut img = RgbaImage::new(width, height);
    for (y, row) in img.enumerate_rows_mut() {
        let Rgb([r, g, b]) = interpolate_color(top, bottom, y as f32 / span);
        for (_, _, px) in row {
            *px = Rgba([r, g, b, 255]);
        }
    }
    img
}

fn to_imageproc(rect: &Rect) -> imageproc::rect::Rect {
    imageproc::rect::Rect::at(rect.x as i32, rect.y as i32).of_size(rect.width, rect.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_endpoints() {
        let img = vertical_gradient(3, 10, Rgb([0, 0, 0]), Rgb([200, 100, 50]));
        assert_eq!(img.get_pixel(1, 0).0, [0, 0, 0, 255]);
        assert_eq!(img.get_pixel(1, 9).0, [200, 100, 50, 255]);
        assert_eq!(img.get_pixel(0, 4), img.get_pixel(2, 4));
    }

    #[test]
    fn test_single_row_gradient() {
        let img = vertical_gradient(4, 1, Rgb([10, 20, 30]), Rgb([200, 100, 50]));
        assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }
}
