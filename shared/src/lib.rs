use serde::{Deserialize, Serialize};

/// A WGS84 point. On the wire this is a two-element `[lat, lon]` array,
/// matching the shape the route and incident endpoints exchange.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl From<[f64; 2]> for Coordinate {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coord: Coordinate) -> Self {
        [coord.lat, coord.lon]
    }
}

/// Successful payload of `GET /route`.
///
/// `segment_scores`, when non-empty, carries one 0–10 risk score per
/// consecutive coordinate pair (`coordinates.len() - 1` entries).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteData {
    pub coordinates: Vec<Coordinate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segment_scores: Vec<f64>,
    pub safety_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

/// Domain-error wire shape: `{ "error": "…" }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

/// Everything `/route` can answer with. The error body is tried first so
/// that the presence of the `error` field short-circuits a route parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoutePayload {
    Failure(ApiError),
    Route(RouteData),
}

/// Incident category. The feed tags crimes explicitly; every other tag
/// collapses to `hazard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IncidentKind {
    Crime,
    Hazard,
}

impl From<String> for IncidentKind {
    fn from(tag: String) -> Self {
        if tag == "crime" {
            Self::Crime
        } else {
            Self::Hazard
        }
    }
}

impl From<IncidentKind> for String {
    fn from(kind: IncidentKind) -> Self {
        match kind {
            IncidentKind::Crime => "crime".to_string(),
            IncidentKind::Hazard => "hazard".to_string(),
        }
    }
}

/// One reported incident, as served by `GET /incidents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentRecord {
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "type")]
    pub kind: IncidentKind,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub timestamp: String,
    pub severity: f64,
}

impl IncidentRecord {
    pub fn location(&self) -> Coordinate {
        Coordinate {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// One weighted point of the density feed (`GET /safety-data`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HeatPoint {
    pub lat: f64,
    pub lon: f64,
    pub severity: f64,
}

/// Axis-aligned bounding box used for viewport framing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}
