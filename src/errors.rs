// Error types for canary

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum CanaryError {
    // User-input validation errors; the pipeline refuses to start on these
    #[snafu(display("Please fetch & search your desired location before moving forward"))]
    MissingLocation,
    #[snafu(display("Please select start date before moving forward"))]
    MissingStartDate,
    #[snafu(display("Please select end date before moving forward"))]
    MissingEndDate,
    #[snafu(display("Please select averaging minutes before moving forward"))]
    MissingAveragingInterval,
    #[snafu(display("Please enter city name to search for"))]
    EmptyLocationQuery,
    #[snafu(display("Invalid date value: {value}"))]
    InvalidDate {
        value: String,
        source: chrono::ParseError,
    },

    // Errors for the geocoding clients
    #[snafu(display("No geocoding result for \"{query}\""))]
    LocationNotFound { query: String },
    #[snafu(display("Geocoding request failed"))]
    GeocodingRequestError { source: reqwest::Error },

    // Errors for the sensor network clients
    #[snafu(display("Sensor directory request failed"))]
    SensorDirectoryError { source: reqwest::Error },
    #[snafu(display("Sensor history request failed for sensor {sensor_index}"))]
    SensorHistoryError {
        sensor_index: i64,
        source: reqwest::Error,
    },
    #[snafu(display("Malformed service response: {description}"))]
    MalformedResponse { description: String },

    // Config management errors
    #[snafu(display("Could not find application data directory to save config file"))]
    NoConfigDir,
    #[snafu(display("Error writing config file"))]
    ConfigIOError { source: io::Error },
    #[snafu(display("Error serializing config file"))]
    ConfigSerializeError { source: serde_json::Error },

    // Errors for the dataset writer
    #[snafu(display("Error writing dataset records"))]
    DatasetWriterError { source: io::Error },
}
