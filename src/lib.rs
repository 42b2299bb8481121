// Library interface for canary
// This allows integration tests to access internal modules

pub mod aqi;
pub mod autocomplete;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod geo;
pub mod geocoding;
pub mod sensors;
pub mod session;

// Re-export commonly used types
pub use aqi::{Aqi, aqi_description, aqi_from_pm};
pub use autocomplete::{AutocompleteSession, AutocompleteWidget, WidgetEffect, WidgetEvent};
pub use config::ApiConfig;
pub use dataset::{DatasetConsumer, JsonLinesConsumer, dataset_description};
pub use errors::CanaryError;
pub use geo::{BoundingBox, bounds_from_lat_long, days_array};
pub use geocoding::{
    GeoapifyClient, GeonamesClient, LocationFix, PlaceCandidate, PlaceSearch, search_location,
};
pub use sensors::{
    MeasurementRecord, PurpleAirClient, Sensor, SensorDirectory, SensorHistory, collect_air_quality,
};
pub use session::SessionState;
