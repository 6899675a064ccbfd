//! Tests for deterministic report data synthesis.

use report_common::{ChartMetric, MetricSet, PanelKind, SeriesKind};
use synthesis::{build_panels, seeds, synthesize, synthesize_metrics, synthesize_series};
use test_utils::{assert_approx_eq, locations, request, sample_requests};

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_identical_requests_give_identical_data() {
    for req in sample_requests() {
        let (metrics_a, series_a) = synthesize(&req);
        let (metrics_b, series_b) = synthesize(&req);
        assert_eq!(metrics_a, metrics_b);
        assert_eq!(series_a, series_b);
    }
}

#[test]
fn test_metrics_depend_only_on_seed_a() {
    let req = request(locations::NEW_YORK);
    let (seed_a, seed_b) = seeds(&req);
    let (metrics, series) = synthesize(&req);

    assert_eq!(metrics, synthesize_metrics(seed_a));
    assert_eq!(series, synthesize_series(seed_b));
}

#[test]
fn test_seed_a_wraps_modulo_1000() {
    // lat*1000 + lon*1000 differs by exactly 1000 between these requests
    let a = request((10.0, 20.0, 0.0));
    let b = request((11.0, 20.0, 0.0));
    assert_eq!(seeds(&a).0, seeds(&b).0);
    assert_eq!(synthesize(&a).0, synthesize(&b).0);
}

#[test]
fn test_scalar_only_affects_metrics() {
    let a = request((12.34, 56.78, 1.0));
    let b = request((12.34, 56.78, 4.0));
    assert_eq!(seeds(&a).1, seeds(&b).1);
    assert_eq!(synthesize(&a).1, synthesize(&b).1);
}

// ============================================================================
// Ranges
// ============================================================================

#[test]
fn test_metrics_within_domain() {
    for req in sample_requests() {
        let (metrics, _) = synthesize(&req);
        assert!(metrics.is_within_domain(), "{:?} out of domain for {:?}", metrics, req);
        assert!(metrics.fire_risk <= 5);
        assert!(metrics.landslide_risk <= 5);
        assert!(metrics.elevation <= 300);
        assert!(metrics.slope <= 100);
        assert!((20.0..=42.0).contains(&metrics.temperature));
        assert!(metrics.rain_probability <= 100);
        assert!(metrics.wind_speed <= 25);
    }
}

#[test]
fn test_every_seed_a_in_domain() {
    for seed in 0..1000 {
        let metrics = synthesize_metrics(seed);
        assert!(metrics.is_within_domain(), "seed {} gave {:?}", seed, metrics);
        let tenths = metrics.temperature * 10.0;
        assert_approx_eq!(tenths, tenths.round(), 1e-3);
    }
}

#[test]
fn test_series_shapes_and_domains() {
    for req in sample_requests() {
        let (_, series) = synthesize(&req);

        for s in series.as_array() {
            let expected = match s.kind {
                SeriesKind::Yearly => 12,
                SeriesKind::Weekly => 7,
            };
            assert_eq!(s.len(), expected, "{}", s.title);

            let (lo, hi) = s.y_domain;
            assert!(s.values().all(|v| v >= lo && v <= hi), "{} out of {:?}", s.title, s.y_domain);
        }

        assert_eq!(series.fire.metric, ChartMetric::FireRisk);
        assert_eq!(series.rain.y_domain, (0.0, 100.0));
        assert!(series.wind.values().all(|v| v.fract() == 0.0));
        assert!(series.rain.values().all(|v| v.fract() == 0.0));
    }
}

#[test]
fn test_series_labels() {
    let (_, series) = synthesize(&request(locations::LONDON));
    let months: Vec<&str> = series.landslide.labels().collect();
    assert_eq!(months.first(), Some(&"Jan"));
    assert_eq!(months.last(), Some(&"Dec"));

    let days: Vec<&str> = series.temperature.labels().collect();
    assert_eq!(days, vec!["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
}

#[test]
fn test_different_locations_differ() {
    let (_, ny) = synthesize(&request(locations::NEW_YORK));
    let (_, tokyo) = synthesize(&request(locations::TOKYO));
    assert_ne!(ny, tokyo);
}

// ============================================================================
// Panels
// ============================================================================

#[test]
fn test_build_panels_order_and_series() {
    let req = request(locations::TOKYO);
    let (metrics, series) = synthesize(&req);
    let panels = build_panels(&req, &metrics, &series);

    assert_eq!(panels.len(), 8);
    for (panel, kind) in panels.iter().zip(PanelKind::ORDER) {
        assert_eq!(panel.kind, kind);
        assert_eq!(
            panel.series.as_ref().map(|s| s.metric),
            kind.chart_metric()
        );
        assert!(!panel.value.is_empty());
    }

    assert_eq!(panels[0].value, "35.6762, 139.6503");
    assert_eq!(panels[1].series.as_ref(), Some(&series.fire));
    assert_eq!(panels[7].value, format!("{}%", metrics.rain_probability));
}

#[test]
fn test_metric_set_domain_check_rejects_outliers() {
    let mut metrics = synthesize_metrics(1);
    assert!(metrics.is_within_domain());
    metrics.temperature = 42.5;
    assert!(!metrics.is_within_domain());
    metrics.temperature = MetricSet::TEMPERATURE_RANGE.0;
    metrics.wind_speed = 26;
    assert!(!metrics.is_within_domain());
}
