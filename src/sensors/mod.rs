// Sensor network types and trait seams

pub(crate) mod client;
pub(crate) mod collector;

pub use client::PurpleAirClient;
pub use collector::collect_air_quality;
use serde::{Deserialize, Serialize};

use crate::aqi::Aqi;
use crate::errors::CanaryError;
use crate::geo::BoundingBox;

/// Raw sensor-directory row: sensor index, name, latitude, longitude.
pub type SensorRow = (i64, String, f64, f64);

/// Raw history row: epoch seconds, humidity, temperature °F, PM2.5, PM10.0.
pub type HistoryRow = (i64, f64, f64, f64, f64);

/// One outdoor sensor discovered inside the session's bounding box, tagged
/// with the location label it was found under.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub sensor_index: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "Location")]
    pub location: String,
}

/// One time-bucketed reading, flattened together with its owning sensor.
/// Field names match the attribute names declared in the dataset schema.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub created_at: String,
    #[serde(rename = "Humidity")]
    pub humidity: f64,
    /// Rendered with the `°F` suffix; the case table displays it verbatim.
    #[serde(rename = "Temperature")]
    pub temperature: String,
    #[serde(rename = "PM 2.5")]
    pub pm2_5: f64,
    #[serde(rename = "PM 10.0")]
    pub pm10_0: f64,
    #[serde(rename = "AQI")]
    pub aqi: Aqi,
    #[serde(flatten)]
    pub sensor: Sensor,
}

/// Directory lookup of sensors inside a bounding box.
#[allow(async_fn_in_trait)]
pub trait SensorDirectory {
    async fn sensors_in(&self, bounds: &BoundingBox) -> Result<Vec<SensorRow>, CanaryError>;
}

/// Per-sensor history over one time window, bucketed to `average_minutes`.
#[allow(async_fn_in_trait)]
pub trait SensorHistory {
    async fn history(
        &self,
        sensor_index: i64,
        start_timestamp: i64,
        end_timestamp: i64,
        average_minutes: u32,
    ) -> Result<Vec<HistoryRow>, CanaryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_record_serializes_with_declared_attribute_names() {
        let record = MeasurementRecord {
            created_at: "2022-03-21T07:00:00.000Z".to_string(),
            humidity: 31.0,
            temperature: "68 °F".to_string(),
            pm2_5: 4.2,
            pm10_0: 6.1,
            aqi: crate::aqi::aqi_from_pm(6.1),
            sensor: Sensor {
                sensor_index: 11235,
                name: "Downtown".to_string(),
                latitude: 35.19,
                longitude: -111.65,
                location: "Flagstaff".to_string(),
            },
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["created_at"], "2022-03-21T07:00:00.000Z");
        assert_eq!(value["Humidity"], 31.0);
        assert_eq!(value["Temperature"], "68 °F");
        assert_eq!(value["PM 2.5"], 4.2);
        assert_eq!(value["PM 10.0"], 6.1);
        assert_eq!(value["AQI"], 25);
        assert_eq!(value["sensor_index"], 11235);
        assert_eq!(value["Location"], "Flagstaff");

        let round_trip: MeasurementRecord =
            serde_json::from_value(value).unwrap();
        assert_eq!(round_trip, record);
    }
}
