//! End-to-end report rendering.

use chrono::{DateTime, Utc};
use image::RgbaImage;
use report_common::{RenderConfig, ReportError, ReportRequest, ReportResult};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use crate::chart::ChartRenderer;
use crate::compose::Composer;
use crate::font::FontCascade;
use crate::png::encode_png;

/// Renders site reports. Build once and share; safe to use from many threads.
#[derive(Debug)]
pub struct ReportRenderer {
    composer: Composer,
}

impl ReportRenderer {
    /// Validate `config`, resolve fonts lazily and pick the chart backend.
    pub fn new(config: RenderConfig) -> ReportResult<Self> {
        config.validate()?;

        let fonts = Arc::new(FontCascade::new(config.font_candidates.clone()));
        let charts = ChartRenderer::select(config.chart_backend, Arc::clone(&fonts));

        Ok(Self::with_parts(config, fonts, charts))
    }

    /// Assemble a renderer from already-built parts.
    pub fn with_parts(config: RenderConfig, fonts: Arc<FontCascade>, charts: ChartRenderer) -> Self {
        Self {
            composer: Composer::new(config, fonts, charts),
        }
    }

    pub fn chart_backend(&self) -> &'static str {
        self.composer.charts().backend_name()
    }

    /// Render a PNG stamped with the current time.
    pub fn render(&self, request: &ReportRequest) -> ReportResult<Vec<u8>> {
        self.render_at(request, Utc::now())
    }

    /// Render a PNG stamped with `timestamp`. Identical arguments give
    /// identical bytes.
    pub fn render_at(
        &self,
        request: &ReportRequest,
        timestamp: DateTime<Utc>,
    ) -> ReportResult<Vec<u8>> {
        let start = Instant::now();
        let image = self.render_image(request, timestamp)?;

        let png = encode_png(&image).map_err(|e| ReportError::Encode(e.to_string()))?;

        tracing::info!(
            latitude = request.latitude(),
            longitude = request.longitude(),
            bytes = png.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Rendered site report"
        );

        Ok(png)
    }

    /// Compose the report raster without encoding it.
    pub fn render_image(
        &self,
        request: &ReportRequest,
        timestamp: DateTime<Utc>,
    ) -> ReportResult<RgbaImage> {
        let span = tracing::info_span!(
            "render_report",
            latitude = request.latitude(),
            longitude = request.longitude()
        );
        let _guard = span.enter();

        let (metrics, series) = synthesis::synthesize(request);
        let panels = synthesis::build_panels(request, &metrics, &series);

        self.composer.compose(request, &panels, timestamp)
    }
}

static DEFAULT_RENDERER: OnceLock<ReportRenderer> = OnceLock::new();

/// Process-wide renderer with the default configuration, built on first use.
///
/// Only a successful build is kept; an error is returned and the next call
/// tries again.
pub fn default_renderer() -> ReportResult<&'static ReportRenderer> {
    if let Some(renderer) = DEFAULT_RENDERER.get() {
        return Ok(renderer);
    }
    let renderer = ReportRenderer::new(RenderConfig::default())?;
    Ok(DEFAULT_RENDERER.get_or_init(|| renderer))
}

/// Validate the inputs and render a report with the default configuration.
pub fn render(latitude: f64, longitude: f64, scalar: f64) -> ReportResult<Vec<u8>> {
    let request = ReportRequest::new(latitude, longitude, scalar)?;
    default_renderer()?.render(&request)
}
