use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::LookupError;
use crate::geocode::Coordinate;

pub const DEFAULT_OVERPASS_URL: &str = "http://overpass-api.de/api/interpreter";

/// Only the first few matches are shown to the user
pub const MAX_HOSPITALS: usize = 5;

const OVERPASS_TIMEOUT: Duration = Duration::from_secs(10);

const UNNAMED: &str = "Unnamed Hospital";
const NO_ADDRESS: &str = "Address not available";
const NO_CONTACT: &str = "Not available";

/// A hospital as presented to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HospitalRecord {
    pub name: String,
    pub address: String,
    pub contact: String,
}

/// Overpass API response
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

/// A node from the Overpass result set. Tags are free-form OSM key/values.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassElement {
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
}

impl OverpassElement {
    fn tag(&self, key: &str) -> Option<&str> {
        self.tags.as_ref()?.get(key).map(String::as_str)
    }

    pub fn to_record(&self) -> HospitalRecord {
        HospitalRecord {
            name: self.tag("name").unwrap_or(UNNAMED).to_string(),
            address: self.tag("addr:full").unwrap_or(NO_ADDRESS).to_string(),
            contact: self.tag("phone").unwrap_or(NO_CONTACT).to_string(),
        }
    }
}

/// Searches the Overpass API for hospital nodes around a point
pub struct HospitalFinder {
    client: Client,
    base_url: String,
}

impl HospitalFinder {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Hospitals within `radius_meters` of `coordinate`, in response order.
    pub fn find_nearby(
        &self,
        coordinate: Coordinate,
        radius_meters: u64,
    ) -> Result<Vec<HospitalRecord>, LookupError> {
        let query = build_query(coordinate, radius_meters);
        debug!("Overpass query:\n{}", query);

        let response: OverpassResponse = self
            .client
            .post(&self.base_url)
            .form(&[("data", query.as_str())])
            .timeout(OVERPASS_TIMEOUT)
            .send()?
            .error_for_status()?
            .json()?;

        info!("Overpass returned {} elements", response.elements.len());
        top_records(response, radius_meters)
    }
}

/// Overpass QL selecting hospital nodes inside the search circle
pub fn build_query(coordinate: Coordinate, radius_meters: u64) -> String {
    format!(
        "[out:json];\nnode[\"amenity\"=\"hospital\"](around:{},{},{});\nout;\n",
        radius_meters, coordinate.latitude, coordinate.longitude
    )
}

/// Normalize the first `MAX_HOSPITALS` elements of a response.
pub fn top_records(
    response: OverpassResponse,
    radius_meters: u64,
) -> Result<Vec<HospitalRecord>, LookupError> {
    if response.elements.is_empty() {
        return Err(LookupError::EmptyResult { radius_meters });
    }

    Ok(response
        .elements
        .iter()
        .take(MAX_HOSPITALS)
        .map(OverpassElement::to_record)
        .collect())
}
