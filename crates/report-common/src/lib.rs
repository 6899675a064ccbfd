//! Common types shared by the site report synthesizer, renderer and CLI.

pub mod config;
pub mod error;
pub mod metrics;
pub mod panel;
pub mod request;
pub mod series;

pub use config::{ChartBackendPreference, RenderConfig};
pub use error::{ReportError, ReportResult};
pub use metrics::MetricSet;
pub use panel::{PanelDescriptor, PanelKind, PANEL_COUNT};
pub use request::ReportRequest;
pub use series::{ChartMetric, SeriesDescriptor, SeriesKind, SeriesSet};
