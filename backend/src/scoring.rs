//! Route safety scoring: rates each leg of a route against the incidents
//! reported near it, then aggregates the legs into one 0–10 route score.

use chrono::{Local, Timelike};
use shared::{Coordinate, IncidentKind, IncidentRecord};

const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Incidents farther than this from a leg do not influence its score.
const NEARBY_KM: f64 = 0.3;

/// Score assigned when no incident is close enough to say anything.
const BASELINE_SCORE: f64 = 3.0;

/// Hazards weigh half as much as crimes.
const HAZARD_WEIGHT: f64 = 0.5;

/// Risk inflation applied between 18:00 and 06:00 local time.
const NIGHT_FACTOR: f64 = 1.2;

#[derive(Debug, Clone, PartialEq)]
pub struct RouteScore {
    pub safety_score: f64,
    pub segment_scores: Vec<f64>,
}

/// Scores a route against the incident set using the current local hour.
pub fn score_route(coords: &[Coordinate], incidents: &[IncidentRecord]) -> RouteScore {
    score_route_at_hour(coords, incidents, Local::now().hour())
}

/// Same as [`score_route`] with the hour injected, so the night multiplier
/// is testable.
pub fn score_route_at_hour(
    coords: &[Coordinate],
    incidents: &[IncidentRecord],
    hour: u32,
) -> RouteScore {
    let segment_scores: Vec<f64> = coords
        .windows(2)
        .map(|pair| segment_score(pair[0], pair[1], incidents))
        .collect();

    let mut overall = if segment_scores.is_empty() {
        BASELINE_SCORE
    } else {
        segment_scores.iter().sum::<f64>() / segment_scores.len() as f64
    };
    if is_night(hour) {
        overall = (overall * NIGHT_FACTOR).min(10.0);
    }

    RouteScore {
        safety_score: clamp_score(overall),
        segment_scores,
    }
}

fn is_night(hour: u32) -> bool {
    hour >= 18 || hour < 6
}

fn segment_score(start: Coordinate, end: Coordinate, incidents: &[IncidentRecord]) -> f64 {
    let mut total = 0.0;
    let mut nearby = 0u32;

    for incident in incidents {
        if point_to_segment_km(incident.location(), start, end) < NEARBY_KM {
            nearby += 1;
            total += match incident.kind {
                IncidentKind::Crime => incident.severity,
                IncidentKind::Hazard => incident.severity * HAZARD_WEIGHT,
            };
        }
    }

    if nearby == 0 {
        BASELINE_SCORE
    } else {
        clamp_score(total / f64::from(nearby))
    }
}

fn clamp_score(score: f64) -> f64 {
    score.round().clamp(0.0, 10.0)
}

pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Distance in km from `point` to the nearest point of the segment
/// `a`–`b`. The projection runs on a local equirectangular plane anchored
/// at the segment; fine at sub-kilometer leg lengths.
pub fn point_to_segment_km(point: Coordinate, a: Coordinate, b: Coordinate) -> f64 {
    let lat_scale = a.lat.to_radians().cos();
    let to_plane = |c: Coordinate| (c.lon * lat_scale, c.lat);

    let (px, py) = to_plane(point);
    let (ax, ay) = to_plane(a);
    let (bx, by) = to_plane(b);

    let (dx, dy) = (bx - ax, by - ay);
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return haversine_km(point, a);
    }

    let t = (((px - ax) * dx + (py - ay) * dy) / length_sq).clamp(0.0, 1.0);
    let closest = Coordinate {
        lat: ay + t * dy,
        lon: (ax + t * dx) / lat_scale,
    };
    haversine_km(point, closest)
}
