//! Common request fixtures.

use report_common::ReportRequest;

/// Well-known (latitude, longitude, scalar) inputs.
pub mod locations {
    pub const NEW_YORK: (f64, f64, f64) = (40.7128, -74.0060, 1.5);
    pub const LONDON: (f64, f64, f64) = (51.5074, -0.1278, 2.0);
    pub const TOKYO: (f64, f64, f64) = (35.6762, 139.6503, 0.5);

    /// Inclusive upper corner of the coordinate domain
    pub const NORTH_EAST_LIMIT: (f64, f64, f64) = (90.0, 180.0, 0.0);

    /// Inclusive lower corner of the coordinate domain
    pub const SOUTH_WEST_LIMIT: (f64, f64, f64) = (-90.0, -180.0, 0.0);

    /// Origin, where the series seed is zero
    pub const NULL_ISLAND: (f64, f64, f64) = (0.0, 0.0, 0.0);
}

/// Build a validated request from a location tuple.
///
/// Panics if the fixture is outside the coordinate domain.
pub fn request((lat, lon, scalar): (f64, f64, f64)) -> ReportRequest {
    ReportRequest::new(lat, lon, scalar).expect("fixture must be a valid request")
}

/// A spread of valid requests covering hemispheres, bounds and scalar signs.
pub fn sample_requests() -> Vec<ReportRequest> {
    let mut requests: Vec<ReportRequest> = [
        locations::NEW_YORK,
        locations::LONDON,
        locations::TOKYO,
        locations::NORTH_EAST_LIMIT,
        locations::SOUTH_WEST_LIMIT,
        locations::NULL_ISLAND,
    ]
    .into_iter()
    .map(request)
    .collect();

    // Deterministic sweep over the domain
    for i in 0..40 {
        let lat = -90.0 + (i as f64) * 4.5;
        let lon = 180.0 - (i as f64) * 9.0;
        let scalar = (i as f64 - 20.0) * 0.75;
        requests.push(request((lat, lon, scalar)));
    }

    requests
}
