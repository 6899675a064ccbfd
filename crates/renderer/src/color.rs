//! Threshold color tables for chart values.
//!
//! Each table is an ascending list of `(upper_bound, class)` pairs. A value
//! takes the class of the first bound it is strictly below; the last entry
//! is a catch-all, so every value (including NaN) maps to exactly one color.

use image::Rgb;
use report_common::ChartMetric;

/// Named color buckets used by the threshold tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorClass {
    Blue,
    Cyan,
    Green,
    YellowGreen,
    Yellow,
    Orange,
    Red,
    /// Used for metrics without a threshold table
    Default,
}

impl ColorClass {
    pub fn rgb(&self) -> Rgb<u8> {
        match self {
            ColorClass::Blue => Rgb([52, 101, 214]),
            ColorClass::Cyan => Rgb([38, 186, 214]),
            ColorClass::Green => Rgb([46, 170, 70]),
            ColorClass::YellowGreen => Rgb([154, 205, 50]),
            ColorClass::Yellow => Rgb([240, 200, 20]),
            ColorClass::Orange => Rgb([245, 130, 30]),
            ColorClass::Red => Rgb([214, 39, 40]),
            ColorClass::Default => Rgb([70, 130, 180]),
        }
    }
}

/// Wind speed in knots, spanning green to red over [0, 25].
const WIND_THRESHOLDS: &[(f32, ColorClass)] = &[
    (5.0, ColorClass::Green),
    (10.0, ColorClass::YellowGreen),
    (15.0, ColorClass::Yellow),
    (20.0, ColorClass::Orange),
    (f32::INFINITY, ColorClass::Red),
];

/// Temperature in °C, spanning blue to red over [20, 42].
const TEMPERATURE_THRESHOLDS: &[(f32, ColorClass)] = &[
    (24.0, ColorClass::Blue),
    (28.0, ColorClass::Cyan),
    (32.0, ColorClass::Green),
    (37.0, ColorClass::Yellow),
    (40.0, ColorClass::Orange),
    (f32::INFINITY, ColorClass::Red),
];

fn thresholds(metric: ChartMetric) -> Option<&'static [(f32, ColorClass)]> {
    match metric {
        ChartMetric::WindSpeed => Some(WIND_THRESHOLDS),
        ChartMetric::Temperature => Some(TEMPERATURE_THRESHOLDS),
        _ => None,
    }
}

/// Bucket a value for the given chart metric.
pub fn classify(value: f32, metric: ChartMetric) -> ColorClass {
    let Some(table) = thresholds(metric) else {
        return ColorClass::Default;
    };

    table
        .iter()
        .find(|(bound, _)| value < *bound)
        .or_else(|| table.last())
        .map(|(_, class)| *class)
        .unwrap_or(ColorClass::Default)
}

/// Map a value to its display color.
pub fn map_color(value: f32, metric: ChartMetric) -> Rgb<u8> {
    classify(value, metric).rgb()
}

/// Hex string (`#RRGGBB`) for embedding a color in SVG.
pub fn to_hex(color: Rgb<u8>) -> String {
    let [r, g, b] = color.0;
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

/// Linear color interpolation, `t` clamped to [0, 1].
pub fn interpolate_color(from: Rgb<u8>, to: Rgb<u8>, t: f32) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;
    let channel = |i: usize| (from.0[i] as f32 * t_inv + to.0[i] as f32 * t).round() as u8;
    Rgb([channel(0), channel(1), channel(2)])
}
