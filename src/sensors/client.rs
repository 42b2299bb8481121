// PurpleAir API client for sensor discovery and history retrieval

use reqwest::Client;
use serde::Deserialize;

use super::{HistoryRow, SensorDirectory, SensorHistory, SensorRow};
use crate::errors::CanaryError;
use crate::geo::BoundingBox;

const SENSORS_URL: &str = "https://api.purpleair.com/v1/sensors";
const DIRECTORY_FIELDS: &str = "name,latitude,longitude";
const HISTORY_FIELDS: &str = "temperature,humidity,pm2.5_cf_1,pm10.0_atm";

pub struct PurpleAirClient {
    http: Client,
    api_key: String,
}

impl PurpleAirClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
        }
    }
}

impl SensorDirectory for PurpleAirClient {
    async fn sensors_in(&self, bounds: &BoundingBox) -> Result<Vec<SensorRow>, CanaryError> {
        let (selat, selng, nwlat, nwlng) = bounds.directory_corners();
        let response = self
            .http
            .get(SENSORS_URL)
            .query(&[
                ("api_key", self.api_key.clone()),
                ("fields", DIRECTORY_FIELDS.to_string()),
                ("selat", selat.to_string()),
                ("selng", selng.to_string()),
                ("nwlat", nwlat.to_string()),
                ("nwlng", nwlng.to_string()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| CanaryError::SensorDirectoryError { source: e })?;

        let data: DirectoryResponse = response
            .json()
            .await
            .map_err(|e| CanaryError::SensorDirectoryError { source: e })?;
        Ok(data.data)
    }
}

impl SensorHistory for PurpleAirClient {
    // The history endpoint authenticates through the X-API-Key header
    // rather than a query parameter.
    async fn history(
        &self,
        sensor_index: i64,
        start_timestamp: i64,
        end_timestamp: i64,
        average_minutes: u32,
    ) -> Result<Vec<HistoryRow>, CanaryError> {
        let response = self
            .http
            .get(format!("{SENSORS_URL}/{sensor_index}/history"))
            .header("X-API-Key", &self.api_key)
            .query(&[
                ("fields", HISTORY_FIELDS.to_string()),
                ("start_timestamp", start_timestamp.to_string()),
                ("end_timestamp", end_timestamp.to_string()),
                ("average", average_minutes.to_string()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| CanaryError::SensorHistoryError {
                sensor_index,
                source: e,
            })?;

        let data: HistoryResponse = response.json().await.map_err(|e| {
            CanaryError::SensorHistoryError {
                sensor_index,
                source: e,
            }
        })?;
        Ok(data.data)
    }
}

#[derive(Debug, Deserialize)]
struct DirectoryResponse {
    #[serde(default)]
    data: Vec<SensorRow>,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    data: Vec<HistoryRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directory_response_rows() {
        let payload = r#"{
            "fields": ["sensor_index", "name", "latitude", "longitude"],
            "data": [
                [11235, "Downtown", 35.19, -111.65],
                [58321, "East Side", 35.21, -111.58]
            ]
        }"#;

        let response: DirectoryResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].0, 11235);
        assert_eq!(response.data[0].1, "Downtown");
        assert!((response.data[1].3 - (-111.58)).abs() < 1e-9);
    }

    #[test]
    fn test_parse_history_response_rows() {
        let payload = r#"{
            "data": [
                [1647846000, 31.0, 68.0, 4.2, 6.1],
                [1647849600, 29.5, 71.0, 4.8, 7.0]
            ]
        }"#;

        let response: HistoryResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].0, 1647846000);
        assert!((response.data[1].4 - 7.0).abs() < 1e-9);
    }
}
