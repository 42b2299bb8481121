// geonames.org client: prefix search and nearby-place lookup
//
// API documented at https://www.geonames.org/export/geonames-search.html

use log::debug;
use reqwest::Client;
use serde::{Deserialize, Deserializer};

use super::{PlaceCandidate, PlaceSearch};
use crate::errors::CanaryError;

const GEONAMES_SEARCH_URL: &str = "https://secure.geonames.org/search";
const GEONAMES_NEARBY_URL: &str = "https://secure.geonames.org/findNearbyPlaceNameJSON";

pub struct GeonamesClient {
    http: Client,
    username: String,
}

impl GeonamesClient {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            username: username.into(),
        }
    }

    /// Resolves a coordinate to the nearest known place name.
    pub async fn find_nearby(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<PlaceCandidate>, CanaryError> {
        let response = self
            .http
            .get(GEONAMES_NEARBY_URL)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("username", self.username.clone()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| CanaryError::GeocodingRequestError { source: e })?;

        let data: GeonamesResponse = response
            .json()
            .await
            .map_err(|e| CanaryError::GeocodingRequestError { source: e })?;

        Ok(data.geonames.into_iter().next().map(PlaceCandidate::from))
    }
}

impl PlaceSearch for GeonamesClient {
    /// Prefix search restricted to US places, in server-returned order.
    /// Zero results and non-success statuses both mean "no candidates".
    async fn search(
        &self,
        prefix: &str,
        max_rows: usize,
    ) -> Result<Vec<PlaceCandidate>, CanaryError> {
        let response = self
            .http
            .get(GEONAMES_SEARCH_URL)
            .query(&[
                ("username", self.username.clone()),
                ("country", "US".to_string()),
                ("maxRows", max_rows.to_string()),
                ("lang", "en".to_string()),
                ("type", "json".to_string()),
                ("isNameRequired", "true".to_string()),
                ("name_startsWith", prefix.to_string()),
            ])
            .send()
            .await
            .map_err(|e| CanaryError::GeocodingRequestError { source: e })?;

        if !response.status().is_success() {
            debug!("geonames search returned {}", response.status());
            return Ok(Vec::new());
        }

        let data: GeonamesResponse = response
            .json()
            .await
            .map_err(|e| CanaryError::GeocodingRequestError { source: e })?;

        if data.total_results_count == 0 {
            return Ok(Vec::new());
        }
        Ok(data.geonames.into_iter().map(PlaceCandidate::from).collect())
    }
}

#[derive(Debug, Deserialize)]
struct GeonamesResponse {
    #[serde(rename = "totalResultsCount", default)]
    total_results_count: i64,
    #[serde(default)]
    geonames: Vec<GeonamesPlace>,
}

#[derive(Debug, Deserialize)]
struct GeonamesPlace {
    name: String,
    #[serde(rename = "adminCode1", default)]
    admin_code1: String,
    #[serde(deserialize_with = "lenient_f64")]
    lat: f64,
    #[serde(deserialize_with = "lenient_f64")]
    lng: f64,
}

impl From<GeonamesPlace> for PlaceCandidate {
    fn from(place: GeonamesPlace) -> Self {
        Self {
            name: format!("{}, {}", place.name, place.admin_code1),
            latitude: place.lat,
            longitude: place.lng,
        }
    }
}

/// geonames encodes coordinates as JSON strings; accept both forms.
fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}
