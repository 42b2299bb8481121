// Session context: the user's current location, date range, and fetch options

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::errors::CanaryError;
use crate::geo::{self, BoundingBox, MILES_TO_KM};
use crate::geocoding::LocationFix;

pub const DEFAULT_RADIUS_MILES: f64 = 10.0;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Owned session context threaded through the search and collection flows.
///
/// A 0,0 coordinate pair is the "no location selected" sentinel. A real
/// location at exactly 0,0 is indistinguishable from an unset one; that
/// ambiguity is long-standing observable behavior and is kept as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub bounding_box: Option<BoundingBox>,
    pub radius_miles: f64,
    pub start_date: String,
    pub end_date: String,
    pub averaging_minutes: u32,
    pub sensor_limit: usize,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            city: String::new(),
            region: String::new(),
            postal_code: String::new(),
            bounding_box: None,
            radius_miles: DEFAULT_RADIUS_MILES,
            start_date: String::new(),
            end_date: String::new(),
            averaging_minutes: 0,
            sensor_limit: 0,
        }
    }
}

impl SessionState {
    /// Fresh session with both dates stamped to today, ready for a fetch
    /// once a location is selected.
    pub fn initialize() -> Self {
        let today = Local::now().format(DATE_FORMAT).to_string();
        Self {
            start_date: today.clone(),
            end_date: today,
            ..Self::default()
        }
    }

    /// Restores the static default record. Dates are cleared, not
    /// re-stamped.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Stores a resolved location and recomputes the bounding box from the
    /// current radius.
    pub fn set_location(&mut self, fix: &LocationFix) {
        self.city = fix.city.clone();
        self.region = fix.region.clone();
        self.postal_code = fix.postal_code.clone();
        self.latitude = fix.latitude;
        self.longitude = fix.longitude;
        self.refresh_bounding_box();
    }

    pub fn clear_location(&mut self) {
        self.city.clear();
        self.region.clear();
        self.postal_code.clear();
        self.latitude = 0.0;
        self.longitude = 0.0;
        self.bounding_box = None;
    }

    /// Updates the search radius and the bounding box derived from it.
    /// Refuses to run before a location has been selected.
    pub fn change_radius(&mut self, radius_miles: f64) -> Result<(), CanaryError> {
        if self.latitude == 0.0 || self.longitude == 0.0 {
            return Err(CanaryError::MissingLocation);
        }
        self.radius_miles = radius_miles;
        self.refresh_bounding_box();
        Ok(())
    }

    /// Whether a location has been committed to the session. An empty city
    /// or the 0,0 sentinel both count as unset.
    pub fn location_selected(&self) -> bool {
        !(self.city.is_empty() || (self.latitude == 0.0 && self.longitude == 0.0))
    }

    fn refresh_bounding_box(&mut self) {
        self.bounding_box = Some(geo::bounds_from_lat_long(
            self.latitude,
            self.longitude,
            self.radius_miles * MILES_TO_KM,
        ));
    }
}
