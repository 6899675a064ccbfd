//! Validated report request.

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

/// Inputs of a single report render.
///
/// Only constructible through [`ReportRequest::new`], so a value of this type
/// always satisfies the coordinate domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRequest")]
pub struct ReportRequest {
    latitude: f64,
    longitude: f64,
    scalar: f64,
}

#[derive(Deserialize)]
struct RawRequest {
    latitude: f64,
    longitude: f64,
    scalar: f64,
}

impl TryFrom<RawRequest> for ReportRequest {
    type Error = ReportError;

    fn try_from(raw: RawRequest) -> Result<Self, Self::Error> {
        ReportRequest::new(raw.latitude, raw.longitude, raw.scalar)
    }
}

impl ReportRequest {
    pub const MIN_LATITUDE: f64 = -90.0;
    pub const MAX_LATITUDE: f64 = 90.0;
    pub const MIN_LONGITUDE: f64 = -180.0;
    pub const MAX_LONGITUDE: f64 = 180.0;

    /// Validate and build a request. Bounds are inclusive.
    pub fn new(latitude: f64, longitude: f64, scalar: f64) -> ReportResult<Self> {
        // NaN fails both comparisons and is rejected here too
        if !(Self::MIN_LATITUDE..=Self::MAX_LATITUDE).contains(&latitude) {
            return Err(ReportError::InvalidLatitude(latitude));
        }
        if !(Self::MIN_LONGITUDE..=Self::MAX_LONGITUDE).contains(&longitude) {
            return Err(ReportError::InvalidLongitude(longitude));
        }
        if !scalar.is_finite() {
            return Err(ReportError::NonFiniteScalar(scalar));
        }

        Ok(Self {
            latitude,
            longitude,
            scalar,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn scalar(&self) -> f64 {
        self.scalar
    }

    /// Coordinates formatted to four decimals, e.g. `40.7128, -74.0060`.
    pub fn coordinates_label(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
