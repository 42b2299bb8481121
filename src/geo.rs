// Geographic helpers: bounding boxes and calendar-day ranges

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CanaryError;

pub const MILES_TO_KM: f64 = 1.60934;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Degrees of latitude per kilometer, inverted. Together with the
/// cosine-scaled longitude delta this is a flat-earth approximation of the
/// search radius, not a geodesic buffer; the sensor directory accepts the
/// resulting rectangle as-is.
const KM_PER_LAT_DEGREE: f64 = 111.2;

/// Rectangular lat/long region used to scope the sensor-directory query.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub east: f64,
    pub north: f64,
    pub west: f64,
}

impl BoundingBox {
    /// Corner order expected by the sensor directory: south-east latitude,
    /// south-east longitude, north-west latitude, north-west longitude.
    pub fn directory_corners(&self) -> (f64, f64, f64, f64) {
        (self.south, self.east, self.north, self.west)
    }
}

/// Computes the bounding box around a coordinate for a radius in kilometers.
///
/// The longitude delta is `|cos(latitude)|` degrees regardless of the radius.
/// That matches the box the sensor directory has always been queried with,
/// so it is kept for output parity.
pub fn bounds_from_lat_long(latitude: f64, longitude: f64, radius_km: f64) -> BoundingBox {
    let lat_change = radius_km / KM_PER_LAT_DEGREE;
    let long_change = latitude.to_radians().cos().abs();

    BoundingBox {
        south: latitude - lat_change,
        east: longitude + long_change,
        north: latitude + lat_change,
        west: longitude - long_change,
    }
}

/// Expands a start/end date pair into the inclusive list of ISO calendar
/// days between them. An end date before the start date yields an empty
/// list.
pub fn days_array(start: &str, end: &str) -> Result<Vec<String>, CanaryError> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;

    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        days.push(day.format(DATE_FORMAT).to_string());
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    Ok(days)
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, CanaryError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| CanaryError::InvalidDate {
        value: value.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_ten_mile_radius() {
        // 10 miles expressed in kilometers
        let bounds = bounds_from_lat_long(35.0, -111.0, 16.0934);

        assert!((bounds.south - 34.8552).abs() < 1e-3);
        assert!((bounds.north - 35.1448).abs() < 1e-3);

        let long_change = (35.0_f64).to_radians().cos().abs();
        assert!((bounds.east - (-111.0 + long_change)).abs() < 1e-9);
        assert!((bounds.west - (-111.0 - long_change)).abs() < 1e-9);
    }

    #[test]
    fn test_bounds_directory_corner_order() {
        let bounds = bounds_from_lat_long(35.0, -111.0, 16.0934);
        let (selat, selng, nwlat, nwlng) = bounds.directory_corners();

        assert_eq!(selat, bounds.south);
        assert_eq!(selng, bounds.east);
        assert_eq!(nwlat, bounds.north);
        assert_eq!(nwlng, bounds.west);
    }

    #[test]
    fn test_bounds_longitude_delta_ignores_radius() {
        let near = bounds_from_lat_long(35.0, -111.0, 1.0);
        let far = bounds_from_lat_long(35.0, -111.0, 100.0);

        assert_eq!(near.east, far.east);
        assert_eq!(near.west, far.west);
        assert!(far.north > near.north);
    }

    #[test]
    fn test_days_array_single_day() {
        let days = days_array("2022-03-21", "2022-03-21").unwrap();
        assert_eq!(days, vec!["2022-03-21"]);
    }

    #[test]
    fn test_days_array_inclusive_span() {
        let days = days_array("2022-03-21", "2022-03-23").unwrap();
        assert_eq!(days, vec!["2022-03-21", "2022-03-22", "2022-03-23"]);
    }

    #[test]
    fn test_days_array_crosses_month_boundary() {
        let days = days_array("2022-02-27", "2022-03-02").unwrap();
        assert_eq!(
            days,
            vec!["2022-02-27", "2022-02-28", "2022-03-01", "2022-03-02"]
        );
    }

    #[test]
    fn test_days_array_reversed_range_is_empty() {
        let days = days_array("2022-03-23", "2022-03-21").unwrap();
        assert!(days.is_empty());
    }

    #[test]
    fn test_days_array_rejects_malformed_date() {
        assert!(matches!(
            days_array("03/21/2022", "2022-03-21"),
            Err(CanaryError::InvalidDate { .. })
        ));
    }
}
