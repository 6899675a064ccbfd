//! Deterministic synthesis of report metrics and chart series.
//!
//! Every value is a uniform draw from a seeded generator, so the same
//! request always produces the same report. Metrics and series are seeded
//! independently:
//!
//! - `seed_a = floor((lat*1000 + lon*1000 + scalar*100) mod 1000)` drives the [`MetricSet`]
//! - `seed_b = floor(lat*lon*1000)` drives all five series
//!
//! As a consequence a panel's headline value is not correlated with its chart.

pub mod panels;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use report_common::{ChartMetric, MetricSet, ReportRequest, SeriesDescriptor, SeriesSet};

pub use panels::build_panels;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Derive the (metrics, series) seeds for a request.
pub fn seeds(request: &ReportRequest) -> (i64, i64) {
    let lat = request.latitude();
    let lon = request.longitude();

    let mixed = lat * 1000.0 + lon * 1000.0 + request.scalar() * 100.0;
    // rem_euclid may round up to exactly 1000.0 for tiny negative inputs.
    // A scalar past about 1.8e306 overflows `mixed` to infinity, rem_euclid
    // then yields NaN and the saturating cast maps it to seed 0.
    let seed_a = (mixed.rem_euclid(1000.0).floor() as i64).rem_euclid(1000);
    let seed_b = (lat * lon * 1000.0).floor() as i64;

    (seed_a, seed_b)
}

/// Synthesize the metrics and the five chart series for a request.
pub fn synthesize(request: &ReportRequest) -> (MetricSet, SeriesSet) {
    let (seed_a, seed_b) = seeds(request);
    tracing::debug!(seed_a, seed_b, "Synthesizing report data");

    (synthesize_metrics(seed_a), synthesize_series(seed_b))
}

/// Draw a [`MetricSet`] from `seed`.
///
/// Draw order: fire, landslide, elevation, slope, temperature, rain, wind.
pub fn synthesize_metrics(seed: i64) -> MetricSet {
    let mut rng = generator(seed);

    let fire_risk = rng.gen_range(MetricSet::RISK_RANGE.0..=MetricSet::RISK_RANGE.1);
    let landslide_risk = rng.gen_range(MetricSet::RISK_RANGE.0..=MetricSet::RISK_RANGE.1);
    let elevation = rng.gen_range(MetricSet::ELEVATION_RANGE.0..=MetricSet::ELEVATION_RANGE.1);
    let slope = rng.gen_range(MetricSet::SLOPE_RANGE.0..=MetricSet::SLOPE_RANGE.1);
    let (t_lo, t_hi) = MetricSet::TEMPERATURE_RANGE;
    let temperature = one_decimal(rng.gen_range(t_lo..=t_hi));
    let rain_probability = rng.gen_range(MetricSet::RAIN_RANGE.0..=MetricSet::RAIN_RANGE.1);
    let wind_speed = rng.gen_range(MetricSet::WIND_RANGE.0..=MetricSet::WIND_RANGE.1);

    MetricSet {
        fire_risk,
        landslide_risk,
        elevation,
        slope,
        temperature,
        rain_probability,
        wind_speed,
    }
}

/// Draw the five chart series from `seed`, in [`ChartMetric::ALL`] order.
pub fn synthesize_series(seed: i64) -> SeriesSet {
    let mut rng = generator(seed);

    let fire = yearly(&mut rng, ChartMetric::FireRisk);
    let landslide = yearly(&mut rng, ChartMetric::LandslideRisk);
    let wind = weekly(&mut rng, ChartMetric::WindSpeed, |rng, (lo, hi)| {
        rng.gen_range(lo as u32..=hi as u32) as f32
    });
    let temperature = weekly(&mut rng, ChartMetric::Temperature, |rng, (lo, hi)| {
        one_decimal(rng.gen_range(lo..=hi))
    });
    let rain = weekly(&mut rng, ChartMetric::RainProbability, |rng, (lo, hi)| {
        rng.gen_range(lo as u32..=hi as u32) as f32
    });

    SeriesSet {
        fire,
        landslide,
        wind,
        temperature,
        rain,
    }
}

fn generator(seed: i64) -> StdRng {
    // Negative seeds keep their two's-complement bit pattern
    StdRng::seed_from_u64(seed as u64)
}

fn yearly(rng: &mut StdRng, metric: ChartMetric) -> SeriesDescriptor {
    let (lo, hi) = metric.y_domain();
    let points = MONTH_LABELS
        .iter()
        .map(|label| (label.to_string(), one_decimal(rng.gen_range(lo..=hi))))
        .collect();
    SeriesDescriptor::new(metric, points)
}

fn weekly<F>(rng: &mut StdRng, metric: ChartMetric, draw: F) -> SeriesDescriptor
where
    F: Fn(&mut StdRng, (f32, f32)) -> f32,
{
    let domain = metric.y_domain();
    let points = WEEKDAY_LABELS
        .iter()
        .map(|label| (label.to_string(), draw(rng, domain)))
        .collect();
    SeriesDescriptor::new(metric, points)
}

fn one_decimal(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_a_is_non_negative() {
        let request = ReportRequest::new(-89.5, -179.9, -3.0).unwrap();
        let (seed_a, _) = seeds(&request);
        assert!((0..1000).contains(&seed_a));
    }

    #[test]
    fn test_seed_a_is_zero_when_mix_overflows() {
        for scalar in [f64::MAX, -f64::MAX, 1e307] {
            let request = ReportRequest::new(10.0, 20.0, scalar).unwrap();
            assert_eq!(seeds(&request).0, 0, "scalar {}", scalar);
        }

        let finite = ReportRequest::new(10.0, 20.0, 1e300).unwrap();
        assert!((0..1000).contains(&seeds(&finite).0));
    }

    #[test]
    fn test_seed_b_keeps_sign() {
        let request = ReportRequest::new(40.7128, -74.0060, 1.5).unwrap();
        let (_, seed_b) = seeds(&request);
        assert_eq!(seed_b, (40.7128f64 * -74.0060 * 1000.0).floor() as i64);
        assert!(seed_b < 0);
    }

    #[test]
    fn test_one_decimal() {
        assert_eq!(one_decimal(31.46), 31.5);
        assert_eq!(one_decimal(20.0), 20.0);
    }
}
