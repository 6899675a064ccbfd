//! Small embedded charts for the report panels.
//!
//! Two interchangeable backends implement [`ChartBackend`]:
//! - [`SvgChartBackend`]: builds an SVG chart description and rasterizes it with resvg
//! - [`RasterChartBackend`]: draws a proportional bar approximation directly
//!
//! [`ChartRenderer`] picks the backend once, when it is constructed. The raster
//! backend cannot fail, so [`ChartRenderer::render_chart`] always returns an
//! image of exactly the requested size.

pub mod raster;
pub mod svg;

use image::{imageops, imageops::FilterType, Rgb, Rgba, RgbaImage};
use report_common::{ChartBackendPreference, ChartMetric, SeriesDescriptor};
use std::sync::Arc;
use thiserror::Error;

use crate::font::FontCascade;

pub use raster::RasterChartBackend;
pub use svg::SvgChartBackend;

/// Errors from a chart backend. Never surfaced past [`ChartRenderer`].
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("SVG parse failed: {0}")]
    Svg(String),

    #[error("Cannot allocate {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },

    #[error("No font faces available for chart text")]
    NoFonts,
}

/// Visual style of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartStyle {
    /// Smoothed filled curve (yearly risk)
    Area,
    /// One bar per time bucket, each colored by its own value
    CategoricalBar,
    /// Unsmoothed polyline without fill
    Line,
}

impl ChartStyle {
    pub fn for_metric(metric: ChartMetric) -> Self {
        match metric {
            ChartMetric::FireRisk | ChartMetric::LandslideRisk => ChartStyle::Area,
            ChartMetric::WindSpeed | ChartMetric::Temperature => ChartStyle::CategoricalBar,
            ChartMetric::RainProbability => ChartStyle::Line,
        }
    }

    /// Most points a chart of this style shows; longer series are truncated.
    pub fn max_points(&self) -> usize {
        match self {
            ChartStyle::Area => 12,
            ChartStyle::CategoricalBar | ChartStyle::Line => 7,
        }
    }
}

/// Fill and stroke colors of a single-color chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartTheme {
    pub fill: Rgb<u8>,
    pub stroke: Rgb<u8>,
}

/// Fixed theme per metric. Landslide owns the brown; fire uses orange/red.
pub fn theme_for(metric: ChartMetric) -> ChartTheme {
    match metric {
        ChartMetric::FireRisk => ChartTheme {
            fill: Rgb([255, 140, 0]),
            stroke: Rgb([200, 40, 0]),
        },
        ChartMetric::LandslideRisk => ChartTheme {
            fill: Rgb([160, 110, 60]),
            stroke: Rgb([101, 58, 20]),
        },
        ChartMetric::RainProbability => ChartTheme {
            fill: Rgb([30, 110, 220]),
            stroke: Rgb([30, 110, 220]),
        },
        ChartMetric::WindSpeed | ChartMetric::Temperature => ChartTheme {
            fill: Rgb([70, 130, 180]),
            stroke: Rgb([40, 40, 40]),
        },
    }
}

/// A chart backend turns a prepared series into a raster of the given size.
pub trait ChartBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn render(
        &self,
        series: &SeriesDescriptor,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, ChartError>;
}

/// Truncate a series to what its chart style displays.
pub fn prepare_series(series: &SeriesDescriptor) -> SeriesDescriptor {
    let style = ChartStyle::for_metric(series.metric);
    series.truncated(style.max_points())
}

/// Inner plotting rectangle shared by both backends, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PlotArea {
    /// Margins leave room for the title above and labels below/left.
    pub fn new(width: u32, height: u32) -> Self {
        let (w, h) = (width as f32, height as f32);
        let left = (w * 0.08).clamp(2.0, 40.0);
        let right = w - (w * 0.03).clamp(1.0, 12.0);
        let top = (h * 0.18).clamp(2.0, 26.0);
        let bottom = h - (h * 0.16).clamp(2.0, 22.0);

        Self {
            left,
            top,
            right: right.max(left + 1.0),
            bottom: bottom.max(top + 1.0),
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Width of one category band when `count` categories share the area.
    pub fn band_width(&self, count: usize) -> f32 {
        self.width() / count.max(1) as f32
    }

    /// Center x of category `index` of `count`.
    pub fn band_center(&self, index: usize, count: usize) -> f32 {
        self.left + self.band_width(count) * (index as f32 + 0.5)
    }

    /// Map a value in `domain` to a y pixel, clamped inside the area.
    pub fn y_for(&self, value: f32, (lo, hi): (f32, f32)) -> f32 {
        let span = if (hi - lo).abs() < f32::EPSILON { 1.0 } else { hi - lo };
        let t = ((value - lo) / span).clamp(0.0, 1.0);
        let t = if t.is_nan() { 0.0 } else { t };
        self.bottom - t * self.height()
    }
}

/// Chart rendering with a backend chosen once and a raster safety net.
pub struct ChartRenderer {
    primary: Box<dyn ChartBackend>,
    fallback: RasterChartBackend,
}

impl ChartRenderer {
    /// Choose a backend according to `preference`.
    ///
    /// The SVG backend draws text with the system fonts plus the cascade's
    /// candidate files.
    pub fn select(preference: ChartBackendPreference, fonts: Arc<FontCascade>) -> Self {
        let svg = match preference {
            ChartBackendPreference::Raster => None,
            _ => Some(SvgChartBackend::new(fonts.candidates())),
        };
        Self::select_with(preference, svg, fonts)
    }

    /// Like [`ChartRenderer::select`] with a prebuilt SVG backend.
    ///
    /// `Auto` keeps the SVG backend only if its self-test passes.
    pub fn select_with(
        preference: ChartBackendPreference,
        svg: Option<SvgChartBackend>,
        fonts: Arc<FontCascade>,
    ) -> Self {
        let fallback = RasterChartBackend::new(Arc::clone(&fonts));

        let primary: Box<dyn ChartBackend> = match (preference, svg) {
            (ChartBackendPreference::Raster, _) | (_, None) => Box::new(fallback.clone()),
            (ChartBackendPreference::Svg, Some(svg)) => Box::new(svg),
            (ChartBackendPreference::Auto, Some(svg)) => match svg.self_test() {
                Ok(()) => Box::new(svg),
                Err(e) => {
                    tracing::warn!(error = %e, "SVG chart backend unavailable, using raster charts");
                    Box::new(fallback.clone())
                }
            },
        };

        tracing::info!(backend = primary.name(), "Chart backend selected");

        Self { primary, fallback }
    }

    /// Renderer using the raster backend only.
    pub fn raster_only(fonts: Arc<FontCascade>) -> Self {
        Self::select(ChartBackendPreference::Raster, fonts)
    }

    /// Renderer using a caller-supplied primary backend.
    pub fn with_backend(primary: Box<dyn ChartBackend>, fonts: Arc<FontCascade>) -> Self {
        Self {
            primary,
            fallback: RasterChartBackend::new(fonts),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.primary.name()
    }

    /// Render `series` into an image of exactly `width` x `height`.
    pub fn render_chart(&self, series: &SeriesDescriptor, width: u32, height: u32) -> RgbaImage {
        if width == 0 || height == 0 {
            return RgbaImage::new(width, height);
        }

        let prepared = prepare_series(series);

        let image = match self.primary.render(&prepared, width, height) {
            Ok(image) => image,
            Err(e) => {
                tracing::warn!(
                    backend = self.primary.name(),
                    chart = prepared.metric.slug(),
                    error = %e,
                    "Chart backend failed, using raster fallback"
                );
                self.fallback.draw(&prepared, width, height)
            }
        };

        fit_to_size(image, width, height)
    }
}

impl std::fmt::Debug for ChartRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartRenderer")
            .field("primary", &self.primary.name())
            .finish()
    }
}

/// Resize with Lanczos3 if a backend returned the wrong size.
fn fit_to_size(image: RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.dimensions() == (width, height) {
        return image;
    }
    if image.width() == 0 || image.height() == 0 {
        return RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    }
    imageops::resize(&image, width, height, FilterType::Lanczos3)
}
