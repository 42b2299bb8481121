// Geocoding: place-name search and coordinate resolution

pub(crate) mod geoapify;
pub(crate) mod geonames;

use log::{info, warn};
use serde::{Deserialize, Serialize};

pub use geoapify::GeoapifyClient;
pub use geonames::GeonamesClient;

use crate::errors::CanaryError;
use crate::session::SessionState;

/// One ranked candidate produced by a place-name search. Held only for the
/// duration of one autocomplete interaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A resolved location ready to be committed into the session.
#[derive(Clone, Debug, PartialEq)]
pub struct LocationFix {
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Prefix search against a geocoding service. The autocomplete widget and
/// the CLI run against this seam; tests substitute a canned implementation.
#[allow(async_fn_in_trait)]
pub trait PlaceSearch {
    async fn search(
        &self,
        prefix: &str,
        max_rows: usize,
    ) -> Result<Vec<PlaceCandidate>, CanaryError>;
}

/// Resolves a free-form city query to a location and commits it into the
/// session, recomputing the bounding box from the session radius.
///
/// The postal code is refined with a second, reverse lookup; that lookup is
/// best-effort and its failures are only logged.
pub async fn search_location(
    client: &GeoapifyClient,
    session: &mut SessionState,
    query: &str,
) -> Result<LocationFix, CanaryError> {
    if query.is_empty() {
        return Err(CanaryError::EmptyLocationQuery);
    }

    info!("searching location: {query}");
    let mut fix = client
        .forward_geocode(query)
        .await?
        .ok_or_else(|| CanaryError::LocationNotFound {
            query: query.to_string(),
        })?;

    match client.reverse_postcode(fix.latitude, fix.longitude).await {
        Ok(Some(postcode)) => fix.postal_code = postcode,
        Ok(None) => {}
        Err(e) => warn!("reverse geocode failed: {e}"),
    }

    session.set_location(&fix);
    Ok(fix)
}
