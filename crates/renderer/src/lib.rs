//! Site report rendering.
//!
//! Turns a validated [`ReportRequest`](report_common::ReportRequest) into a
//! 1600x1200 PNG infographic:
//! - Panel grid layout
//! - Charts (SVG via resvg, with a raster fallback)
//! - Threshold color mapping
//! - Font resolution with a built-in bitmap fallback
//! - Lossless PNG encoding

pub mod assets;
pub mod chart;
pub mod color;
pub mod compose;
pub mod font;
pub mod layout;
pub mod png;
pub mod report;

pub use chart::{ChartBackend, ChartRenderer};
pub use report::{default_renderer, render, ReportRenderer};
