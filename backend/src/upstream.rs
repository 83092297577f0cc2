//! Clients for the two opaque upstream services: a Nominatim-style
//! geocoder (free-form query, string coordinate fields) and an
//! OpenRouteService-style directions endpoint (GeoJSON, lon/lat order).
//! Response parsing is split into pure functions so it can be tested
//! against canned payloads.

use serde_json::Value;
use shared::Coordinate;
use thiserror::Error;

const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";
const DEFAULT_DIRECTIONS_URL: &str =
    "https://api.openrouteservice.org/v2/directions/foot-walking/geojson";
const USER_AGENT: &str = "safe-route-finder";

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed upstream response: {0}")]
    Parse(String),
}

/// Walking geometry plus the summary figures the upstream reports.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkingRoute {
    pub coordinates: Vec<Coordinate>,
    pub distance: Option<f64>,
    pub duration: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct DirectionsClient {
    http: reqwest::Client,
    geocoder_url: String,
    directions_url: String,
    api_key: String,
}

impl DirectionsClient {
    pub fn new(geocoder_url: String, directions_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            geocoder_url,
            directions_url,
            api_key,
        }
    }

    pub fn from_env() -> Self {
        Self::new(
            std::env::var("GEOCODER_URL").unwrap_or_else(|_| DEFAULT_GEOCODER_URL.to_string()),
            std::env::var("DIRECTIONS_URL").unwrap_or_else(|_| DEFAULT_DIRECTIONS_URL.to_string()),
            std::env::var("DIRECTIONS_API_KEY").unwrap_or_default(),
        )
    }

    /// Resolves a free-form location query to its best-matching point.
    /// `Ok(None)` means the geocoder had no match.
    pub async fn resolve(&self, query: &str) -> Result<Option<Coordinate>, UpstreamError> {
        let response = self
            .http
            .get(&self.geocoder_url)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        let body: Value = response.json().await?;
        parse_geocode_response(&body)
    }

    /// Fetches the walking geometry between two points. `Ok(None)` means
    /// the upstream found no route.
    pub async fn walking_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<Option<WalkingRoute>, UpstreamError> {
        let payload = serde_json::json!({
            "coordinates": [[start.lon, start.lat], [end.lon, end.lat]],
        });
        let response = self
            .http
            .post(&self.directions_url)
            .header(reqwest::header::AUTHORIZATION, self.api_key.as_str())
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(&payload)
            .send()
            .await?;

        let body: Value = response.json().await?;
        parse_directions_response(&body)
    }
}

fn parse_geocode_response(body: &Value) -> Result<Option<Coordinate>, UpstreamError> {
    let results = body
        .as_array()
        .ok_or_else(|| UpstreamError::Parse("geocoder response is not an array".to_string()))?;

    let Some(first) = results.first() else {
        return Ok(None);
    };

    // Nominatim serializes coordinates as strings.
    let lat = first["lat"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| UpstreamError::Parse("missing lat in geocoder hit".to_string()))?;
    let lon = first["lon"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| UpstreamError::Parse("missing lon in geocoder hit".to_string()))?;

    Ok(Some(Coordinate { lat, lon }))
}

fn parse_directions_response(body: &Value) -> Result<Option<WalkingRoute>, UpstreamError> {
    let Some(features) = body["features"].as_array() else {
        return Ok(None);
    };
    let Some(feature) = features.first() else {
        return Ok(None);
    };

    let pairs = feature["geometry"]["coordinates"]
        .as_array()
        .ok_or_else(|| UpstreamError::Parse("feature has no geometry".to_string()))?;

    let mut coordinates = Vec::with_capacity(pairs.len());
    for pair in pairs {
        // GeoJSON order is [lon, lat].
        let lon = pair[0].as_f64();
        let lat = pair[1].as_f64();
        match (lat, lon) {
            (Some(lat), Some(lon)) => coordinates.push(Coordinate { lat, lon }),
            _ => {
                return Err(UpstreamError::Parse(
                    "non-numeric coordinate pair in geometry".to_string(),
                ))
            }
        }
    }

    let summary = &feature["properties"]["summary"];
    Ok(Some(WalkingRoute {
        coordinates,
        distance: summary["distance"].as_f64(),
        duration: summary["duration"].as_f64(),
    }))
}
