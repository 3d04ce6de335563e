// Common types used across multiple domains and layers
//
// Coordinates are shared by the organization model, the geocoding pipeline
// and the map clustering engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;
pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinatesError {
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
}

/// A validated geographic point.
///
/// Serialized GeoJSON-style as `[longitude, latitude]`, longitude first.
/// Construction goes through [`Coordinates::new`], so an instance is always
/// finite and in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    longitude: f64,
    latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, CoordinatesError> {
        // NaN fails both range checks
        if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
            return Err(CoordinatesError::LongitudeOutOfRange(longitude));
        }
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
            return Err(CoordinatesError::LatitudeOutOfRange(latitude));
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    /// Build from a nullable database column pair.
    ///
    /// Returns `None` unless both columns are set and the pair is in range.
    pub fn from_columns(longitude: Option<f64>, latitude: Option<f64>) -> Option<Self> {
        match (longitude, latitude) {
            (Some(lon), Some(lat)) => Self::new(lon, lat).ok(),
            _ => None,
        }
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }
}

impl TryFrom<[f64; 2]> for Coordinates {
    type Error = CoordinatesError;

    fn try_from([longitude, latitude]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(longitude, latitude)
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(coordinates: Coordinates) -> Self {
        [coordinates.longitude, coordinates.latitude]
    }
}

/// Trimmed value, or `None` if absent or blank
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_range_edges() {
        assert!(Coordinates::new(-180.0, -90.0).is_ok());
        assert!(Coordinates::new(180.0, 90.0).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_and_nan() {
        assert_eq!(
            Coordinates::new(180.5, 0.0),
            Err(CoordinatesError::LongitudeOutOfRange(180.5))
        );
        assert_eq!(
            Coordinates::new(0.0, -91.0),
            Err(CoordinatesError::LatitudeOutOfRange(-91.0))
        );
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_serializes_longitude_first() {
        let toronto = Coordinates::new(-79.3832, 43.6532).unwrap();
        assert_eq!(
            serde_json::to_value(toronto).unwrap(),
            serde_json::json!([-79.3832, 43.6532])
        );
    }

    #[test]
    fn test_deserialize_rejects_malformed_pairs() {
        assert!(serde_json::from_str::<Coordinates>("[200.0, 10.0]").is_err());
        assert!(serde_json::from_str::<Coordinates>("[1.0]").is_err());
        assert!(serde_json::from_str::<Coordinates>("[]").is_err());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  Toronto ")), Some("Toronto"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_from_columns_requires_both_values() {
        assert!(Coordinates::from_columns(Some(1.0), None).is_none());
        assert!(Coordinates::from_columns(None, Some(1.0)).is_none());
        assert!(Coordinates::from_columns(None, None).is_none());
        assert_eq!(
            Coordinates::from_columns(Some(2.3514), Some(48.8575)),
            Coordinates::new(2.3514, 48.8575).ok()
        );
    }
}
