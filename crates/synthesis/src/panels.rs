//! Assembly of the eight panel descriptors.

use report_common::{MetricSet, PanelDescriptor, PanelKind, ReportRequest, SeriesSet, PANEL_COUNT};

/// Build the panels in grid order, attaching each charted panel's series.
pub fn build_panels(
    request: &ReportRequest,
    metrics: &MetricSet,
    series: &SeriesSet,
) -> [PanelDescriptor; PANEL_COUNT] {
    PanelKind::ORDER.map(|kind| PanelDescriptor {
        kind,
        title: kind.title().to_string(),
        value: format_value(kind, request, metrics),
        description: describe(kind, metrics).to_string(),
        series: kind.chart_metric().map(|metric| series.get(metric).clone()),
    })
}

fn format_value(kind: PanelKind, request: &ReportRequest, metrics: &MetricSet) -> String {
    match kind {
        PanelKind::Gps => request.coordinates_label(),
        PanelKind::Fire => format!("{}%", metrics.fire_risk),
        PanelKind::Elevation => format!("{} m", metrics.elevation),
        PanelKind::Landslide => format!("{}%", metrics.landslide_risk),
        PanelKind::Slope => format!("{}°", metrics.slope),
        PanelKind::Wind => format!("{} kn", metrics.wind_speed),
        PanelKind::Temperature => format!("{:.1}°C", metrics.temperature),
        PanelKind::Rain => format!("{}%", metrics.rain_probability),
    }
}

fn describe(kind: PanelKind, metrics: &MetricSet) -> &'static str {
    match kind {
        PanelKind::Gps => "Report location (WGS84)",
        PanelKind::Fire | PanelKind::Landslide => {
            let risk = if kind == PanelKind::Fire {
                metrics.fire_risk
            } else {
                metrics.landslide_risk
            };
            match risk {
                0..=1 => "Low risk",
                2..=3 => "Moderate risk",
                _ => "Elevated risk",
            }
        }
        PanelKind::Elevation => "Height above sea level",
        PanelKind::Slope => match metrics.slope {
            0..=15 => "Gentle terrain",
            16..=45 => "Moderate incline",
            _ => "Steep terrain",
        },
        PanelKind::Wind => "Current wind speed",
        PanelKind::Temperature => "Current air temperature",
        PanelKind::Rain => "Chance of rain today",
    }
}
