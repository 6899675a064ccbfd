//! Chart series backing the report panels.

use serde::{Deserialize, Serialize};

/// Time granularity of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    /// Twelve monthly points
    Yearly,
    /// Seven daily points
    Weekly,
}

impl SeriesKind {
    /// Number of points a chart of this kind displays.
    pub fn max_points(&self) -> usize {
        match self {
            SeriesKind::Yearly => 12,
            SeriesKind::Weekly => 7,
        }
    }
}

/// The quantity a series plots. Chart style and color theme follow from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartMetric {
    FireRisk,
    LandslideRisk,
    WindSpeed,
    Temperature,
    RainProbability,
}

impl ChartMetric {
    pub const ALL: [ChartMetric; 5] = [
        ChartMetric::FireRisk,
        ChartMetric::LandslideRisk,
        ChartMetric::WindSpeed,
        ChartMetric::Temperature,
        ChartMetric::RainProbability,
    ];

    pub fn kind(&self) -> SeriesKind {
        match self {
            ChartMetric::FireRisk | ChartMetric::LandslideRisk => SeriesKind::Yearly,
            _ => SeriesKind::Weekly,
        }
    }

    /// Fixed y-axis domain (min, max).
    pub fn y_domain(&self) -> (f32, f32) {
        match self {
            ChartMetric::FireRisk | ChartMetric::LandslideRisk => (0.0, 10.0),
            ChartMetric::WindSpeed => (0.0, 25.0),
            ChartMetric::Temperature => (20.0, 42.0),
            ChartMetric::RainProbability => (0.0, 100.0),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartMetric::FireRisk => "Yearly Fire Risk",
            ChartMetric::LandslideRisk => "Yearly Landslide Risk",
            ChartMetric::WindSpeed => "Wind Forecast (kn)",
            ChartMetric::Temperature => "Temperature Forecast (°C)",
            ChartMetric::RainProbability => "Rain Probability (%)",
        }
    }

    /// Short identifier used in logs and file names.
    pub fn slug(&self) -> &'static str {
        match self {
            ChartMetric::FireRisk => "fire_risk",
            ChartMetric::LandslideRisk => "landslide_risk",
            ChartMetric::WindSpeed => "wind_speed",
            ChartMetric::Temperature => "temperature",
            ChartMetric::RainProbability => "rain_probability",
        }
    }
}

/// Ordered (label, value) pairs with a fixed domain and title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDescriptor {
    pub kind: SeriesKind,
    pub metric: ChartMetric,
    pub points: Vec<(String, f32)>,
    pub y_domain: (f32, f32),
    pub title: String,
}

impl SeriesDescriptor {
    /// Build a series whose kind, domain and title come from `metric`.
    pub fn new(metric: ChartMetric, points: Vec<(String, f32)>) -> Self {
        Self {
            kind: metric.kind(),
            metric,
            points,
            y_domain: metric.y_domain(),
            title: metric.title().to_string(),
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|(label, _)| label.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.points.iter().map(|(_, value)| *value)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Copy of the series keeping only the first `max` points and labels.
    pub fn truncated(&self, max: usize) -> Self {
        Self {
            points: self.points.iter().take(max).cloned().collect(),
            ..self.clone()
        }
    }
}

/// The five series of a report, one per chart metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSet {
    pub fire: SeriesDescriptor,
    pub landslide: SeriesDescriptor,
    pub wind: SeriesDescriptor,
    pub temperature: SeriesDescriptor,
    pub rain: SeriesDescriptor,
}

impl SeriesSet {
    pub fn get(&self, metric: ChartMetric) -> &SeriesDescriptor {
        match metric {
            ChartMetric::FireRisk => &self.fire,
            ChartMetric::LandslideRisk => &self.landslide,
            ChartMetric::WindSpeed => &self.wind,
            ChartMetric::Temperature => &self.temperature,
            ChartMetric::RainProbability => &self.rain,
        }
    }

    /// All five series in draw order.
    pub fn as_array(&self) -> [&SeriesDescriptor; 5] {
        [
            &self.fire,
            &self.landslide,
            &self.wind,
            &self.temperature,
            &self.rain,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_keeps_labels_in_step() {
        let points = (0..10).map(|i| (format!("d{}", i), i as f32)).collect();
        let series = SeriesDescriptor::new(ChartMetric::RainProbability, points);
        let cut = series.truncated(7);

        assert_eq!(cut.len(), 7);
        assert_eq!(cut.labels().last(), Some("d6"));
        assert_eq!(cut.values().last(), Some(6.0));
        assert_eq!(cut.y_domain, (0.0, 100.0));
    }

    #[test]
    fn test_metric_kinds() {
        assert_eq!(ChartMetric::FireRisk.kind().max_points(), 12);
        assert_eq!(ChartMetric::Temperature.kind().max_points(), 7);
        assert_eq!(ChartMetric::Temperature.y_domain(), (20.0, 42.0));
    }
}
