//! Site report renderer CLI.
//!
//! Renders one infographic PNG for a location and writes it to disk.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use report_common::{ChartBackendPreference, ReportRequest};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use renderer::ReportRenderer;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Site report renderer
#[derive(Parser, Debug)]
#[command(name = "report-render")]
#[command(about = "Render a site report infographic for a location")]
struct Args {
    /// Latitude in degrees, -90 to 90
    #[arg(long, allow_hyphen_values = true)]
    latitude: f64,

    /// Longitude in degrees, -180 to 180
    #[arg(long, allow_hyphen_values = true)]
    longitude: f64,

    /// Free scalar mixed into the metric seed
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    scalar: f64,

    /// Output PNG path
    #[arg(short, long, default_value = "report.png")]
    output: PathBuf,

    /// Configuration file (.yaml, .yml or .json)
    #[arg(short, long, env = "REPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding background.png and icons/
    #[arg(long, env = "REPORT_ASSET_DIR")]
    asset_dir: Option<PathBuf>,

    /// Chart backend: auto, svg or raster
    #[arg(long, env = "REPORT_CHART_BACKEND")]
    chart_backend: Option<ChartBackendPreference>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,

    /// Print the synthesized metrics as JSON
    #[arg(long)]
    metrics_json: bool,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_format);

    let request = ReportRequest::new(args.latitude, args.longitude, args.scalar)
        .context("invalid report request")?;

    let config = config::resolve(&config::Overrides {
        config_file: args.config.clone(),
        asset_dir: args.asset_dir.clone(),
        chart_backend: args.chart_backend,
    })?;

    let renderer = ReportRenderer::new(config).context("failed to initialize renderer")?;
    info!(backend = renderer.chart_backend(), "Renderer ready");

    if args.metrics_json {
        let (metrics, _) = synthesis::synthesize(&request);
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    }

    let png = renderer.render(&request).context("failed to render report")?;
    std::fs::write(&args.output, &png)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    info!(
        path = %args.output.display(),
        bytes = png.len(),
        "Wrote site report"
    );

    Ok(())
}

fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = fmt().with_env_filter(filter).with_target(true).with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}
