// geoapify.com client: forward city geocoding and reverse postcode lookup

use reqwest::Client;
use serde::Deserialize;

use super::LocationFix;
use crate::errors::CanaryError;

const FORWARD_GEOCODE_URL: &str = "https://api.geoapify.com/v1/geocode/autocomplete";
const REVERSE_GEOCODE_URL: &str = "https://api.geoapify.com/v1/geocode/reverse";

pub struct GeoapifyClient {
    http: Client,
    api_key: String,
}

impl GeoapifyClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
        }
    }

    /// Resolves a free-form city query to the best-ranked US city match.
    pub async fn forward_geocode(&self, text: &str) -> Result<Option<LocationFix>, CanaryError> {
        let response = self
            .http
            .get(FORWARD_GEOCODE_URL)
            .query(&[
                ("apiKey", self.api_key.clone()),
                ("text", text.to_string()),
                ("type", "city".to_string()),
                ("lang", "en".to_string()),
                ("filter", "countrycode:us".to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| CanaryError::GeocodingRequestError { source: e })?;

        let data: ForwardGeocodeResponse = response
            .json()
            .await
            .map_err(|e| CanaryError::GeocodingRequestError { source: e })?;

        Ok(data.results.into_iter().next().map(LocationFix::from))
    }

    /// Looks up the postcode recorded for a coordinate.
    pub async fn reverse_postcode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Option<String>, CanaryError> {
        let response = self
            .http
            .get(REVERSE_GEOCODE_URL)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("apiKey", self.api_key.clone()),
            ])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| CanaryError::GeocodingRequestError { source: e })?;

        let data: ReverseGeocodeResponse = response
            .json()
            .await
            .map_err(|e| CanaryError::GeocodingRequestError { source: e })?;

        Ok(data
            .features
            .into_iter()
            .next()
            .and_then(|feature| feature.properties.postcode))
    }
}

#[derive(Debug, Deserialize)]
struct ForwardGeocodeResponse {
    #[serde(default)]
    results: Vec<ForwardGeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct ForwardGeocodeResult {
    city: Option<String>,
    state_code: Option<String>,
    postcode: Option<String>,
    lat: f64,
    lon: f64,
}

impl From<ForwardGeocodeResult> for LocationFix {
    fn from(result: ForwardGeocodeResult) -> Self {
        Self {
            city: result.city.unwrap_or_default(),
            region: result.state_code.unwrap_or_default(),
            // a missing postcode has always been reported as a literal 0
            postal_code: result.postcode.unwrap_or_else(|| "0".to_string()),
            latitude: result.lat,
            longitude: result.lon,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ReverseGeocodeResponse {
    #[serde(default)]
    features: Vec<ReverseGeocodeFeature>,
}

#[derive(Debug, Deserialize)]
struct ReverseGeocodeFeature {
    properties: ReverseGeocodeProperties,
}

#[derive(Debug, Deserialize)]
struct ReverseGeocodeProperties {
    postcode: Option<String>,
}
