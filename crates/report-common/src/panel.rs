//! Panel descriptors for the 2x4 report grid.

use serde::{Deserialize, Serialize};

use crate::series::{ChartMetric, SeriesDescriptor};

/// Number of panels on every report.
pub const PANEL_COUNT: usize = 8;

/// Semantic identity of a panel; also keys its icon resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelKind {
    Gps,
    Fire,
    Elevation,
    Landslide,
    Slope,
    Wind,
    Temperature,
    Rain,
}

impl PanelKind {
    /// Panels in grid order (row-major, two per row).
    pub const ORDER: [PanelKind; PANEL_COUNT] = [
        PanelKind::Gps,
        PanelKind::Fire,
        PanelKind::Elevation,
        PanelKind::Landslide,
        PanelKind::Slope,
        PanelKind::Wind,
        PanelKind::Temperature,
        PanelKind::Rain,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            PanelKind::Gps => "GPS Position",
            PanelKind::Fire => "Fire Risk",
            PanelKind::Elevation => "Elevation",
            PanelKind::Landslide => "Landslide Risk",
            PanelKind::Slope => "Slope",
            PanelKind::Wind => "Wind Speed",
            PanelKind::Temperature => "Temperature",
            PanelKind::Rain => "Rain Probability",
        }
    }

    /// File stem of the icon resource, e.g. `icons/wind.png`.
    pub fn icon_name(&self) -> &'static str {
        match self {
            PanelKind::Gps => "gps",
            PanelKind::Fire => "fire",
            PanelKind::Elevation => "elevation",
            PanelKind::Landslide => "landslide",
            PanelKind::Slope => "slope",
            PanelKind::Wind => "wind",
            PanelKind::Temperature => "temperature",
            PanelKind::Rain => "rain",
        }
    }

    /// The chart shown in this panel, if any.
    pub fn chart_metric(&self) -> Option<ChartMetric> {
        match self {
            PanelKind::Fire => Some(ChartMetric::FireRisk),
            PanelKind::Landslide => Some(ChartMetric::LandslideRisk),
            PanelKind::Wind => Some(ChartMetric::WindSpeed),
            PanelKind::Temperature => Some(ChartMetric::Temperature),
            PanelKind::Rain => Some(ChartMetric::RainProbability),
            PanelKind::Gps | PanelKind::Elevation | PanelKind::Slope => None,
        }
    }

    /// Grid position of this panel.
    pub fn index(&self) -> usize {
        Self::ORDER
            .iter()
            .position(|k| k == self)
            .unwrap_or_default()
    }
}

/// Everything needed to draw one panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelDescriptor {
    pub kind: PanelKind,
    pub title: String,
    pub value: String,
    pub description: String,
    pub series: Option<SeriesDescriptor>,
}
