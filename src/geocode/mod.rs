use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::LookupError;

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

const GEOCODE_TIMEOUT: Duration = Duration::from_secs(5);

/// A resolved point on the map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// One candidate from the geocoder. Nominatim encodes both values as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Resolves free-text locations (city names, postal codes) to coordinates
pub struct Geocoder {
    client: Client,
    base_url: String,
}

impl Geocoder {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Ask the geocoder for the single best match of `query`.
    pub fn resolve(&self, query: &str) -> Result<Coordinate, LookupError> {
        debug!("Geocoding {:?} via {}", query, self.base_url);

        let places: Vec<Place> = self
            .client
            .get(&self.base_url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .timeout(GEOCODE_TIMEOUT)
            .send()?
            .error_for_status()?
            .json()?;

        let coordinate = first_coordinate(places);
        match &coordinate {
            Ok(c) => info!("Resolved {:?} to ({}, {})", query, c.latitude, c.longitude),
            Err(e) => debug!("Could not resolve {:?}: {}", query, e),
        }
        coordinate
    }
}

/// Take the first candidate and parse its coordinates.
pub fn first_coordinate(places: Vec<Place>) -> Result<Coordinate, LookupError> {
    let place = places.into_iter().next().ok_or(LookupError::NotFound)?;

    if let Some(name) = &place.display_name {
        debug!("Best match: {}", name);
    }

    Ok(Coordinate {
        latitude: parse_degrees("lat", &place.lat)?,
        longitude: parse_degrees("lon", &place.lon)?,
    })
}

fn parse_degrees(field: &str, raw: &str) -> Result<f64, LookupError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| LookupError::MalformedResponse(format!("{} is not a number: {:?}", field, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, serve_once, serve_silence};
    use std::time::Instant;

    fn places(json: &str) -> Vec<Place> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn takes_first_candidate() {
        let body = r#"[
            {"lat": "40.7127281", "lon": "-74.0060152", "display_name": "New York"},
            {"lat": "1.0", "lon": "2.0"}
        ]"#;

        let c = first_coordinate(places(body)).unwrap();
        assert_eq!(c.latitude, 40.7127281);
        assert_eq!(c.longitude, -74.0060152);
    }

    #[test]
    fn empty_array_is_not_found() {
        assert!(matches!(
            first_coordinate(places("[]")),
            Err(LookupError::NotFound)
        ));
    }

    #[test]
    fn extra_fields_are_ignored() {
        let body = r#"[{"place_id": 1, "lat": "51.5", "lon": "-0.12", "importance": 0.9}]"#;
        let c = first_coordinate(places(body)).unwrap();
        assert_eq!(c, Coordinate { latitude: 51.5, longitude: -0.12 });
    }

    #[test]
    fn non_numeric_latitude_is_malformed() {
        let body = r#"[{"lat": "north", "lon": "-74.0"}]"#;
        match first_coordinate(places(body)) {
            Err(LookupError::MalformedResponse(msg)) => assert!(msg.contains("lat")),
            other => panic!("expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn unreachable_endpoint_is_transport_error() {
        let geocoder = Geocoder::new(test_support::client(), "http://127.0.0.1:9/search");
        assert!(matches!(
            geocoder.resolve("Springfield"),
            Err(LookupError::Transport(_))
        ));
    }

    #[test]
    fn resolve_sends_nominatim_query_with_user_agent() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"[{"lat": "40.7484", "lon": "-73.9967", "display_name": "Midtown, New York"}]"#,
        );
        let geocoder = Geocoder::new(test_support::client(), format!("{}/search", base_url));

        let c = geocoder.resolve("New York 10001").unwrap();
        assert_eq!(c, Coordinate { latitude: 40.7484, longitude: -73.9967 });

        let request = server.join().unwrap();
        assert_eq!(
            request.request_line,
            "GET /search?q=New+York+10001&format=json&limit=1 HTTP/1.1"
        );
        assert_eq!(request.header("user-agent"), Some("SimpleHospitalFinder/1.0"));
        assert_eq!(request.body, "");
    }

    #[test]
    fn resolve_maps_empty_answer_to_not_found() {
        let (base_url, server) = serve_once("200 OK", "[]");
        let geocoder = Geocoder::new(test_support::client(), base_url);

        assert!(matches!(geocoder.resolve("Atlantis"), Err(LookupError::NotFound)));
        server.join().unwrap();
    }

    #[test]
    fn resolve_treats_error_status_as_transport() {
        let (base_url, server) = serve_once("503 Service Unavailable", "[]");
        let geocoder = Geocoder::new(test_support::client(), base_url);

        assert!(matches!(geocoder.resolve("Oslo"), Err(LookupError::Transport(_))));
        server.join().unwrap();
    }

    #[test]
    fn silent_geocoder_times_out_after_five_seconds() {
        let geocoder = Geocoder::new(test_support::client(), serve_silence());

        let started = Instant::now();
        let result = geocoder.resolve("Lagos");
        let elapsed = started.elapsed();

        assert!(matches!(result, Err(LookupError::Transport(_))));
        assert!(elapsed >= GEOCODE_TIMEOUT, "gave up after {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(9), "waited {:?}", elapsed);
    }
}
