//! Pure builders for everything the map capability draws: the route layer
//! plan, incident markers, and the weighted heat layer. The structures here
//! serialize straight across the wasm boundary; the side-effecting push
//! lives in `lib.rs`.

use std::collections::BTreeMap;

use serde::Serialize;
use shared::{Coordinate, HeatPoint, IncidentKind, IncidentRecord, RouteBounds, RouteData};

use crate::safety::{color_for_score, SafetyLevel};

pub const ROUTE_LINE_WEIGHT: u32 = 5;
pub const ROUTE_LINE_OPACITY: f64 = 0.8;
pub const FIT_BOUNDS_PADDING: u32 = 50;

pub const INCIDENT_MARKER_RADIUS: u32 = 6;
pub const INCIDENT_FILL_OPACITY: f64 = 0.8;

pub const HEAT_RADIUS: u32 = 25;
pub const HEAT_BLUR: u32 = 15;
pub const HEAT_MAX_ZOOM: u32 = 17;

/// Gradient stops keyed by normalized weight. Weights above 1.0 saturate
/// at the top color.
pub const HEAT_GRADIENT: [(&str, &str); 5] = [
    ("0.4", "blue"),
    ("0.6", "lime"),
    ("0.7", "yellow"),
    ("0.8", "orange"),
    ("1.0", "red"),
];

/// One polyline of the route layer: a consecutive coordinate pair when
/// per-segment scores exist, or the whole path for a uniform route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentPlan {
    pub points: Vec<Coordinate>,
    pub color: &'static str,
    pub weight: u32,
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
}

/// Everything one route render needs, replaced wholesale per route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub segments: Vec<SegmentPlan>,
    pub start: Coordinate,
    pub end: Coordinate,
    pub bounds: RouteBounds,
    pub padding: u32,
}

/// Builds the layer plan for a route payload. Returns `None` when the
/// payload has fewer than two coordinates and there is nothing to draw.
pub fn plan_route(route: &RouteData) -> Option<RoutePlan> {
    let coords = &route.coordinates;
    if coords.len() < 2 {
        return None;
    }

    let segments = if route.segment_scores.is_empty() {
        vec![SegmentPlan {
            points: coords.clone(),
            color: color_for_score(route.safety_score),
            weight: ROUTE_LINE_WEIGHT,
            opacity: ROUTE_LINE_OPACITY,
            tooltip: None,
        }]
    } else {
        coords
            .windows(2)
            .zip(&route.segment_scores)
            .map(|(pair, &score)| SegmentPlan {
                points: pair.to_vec(),
                color: color_for_score(score),
                weight: ROUTE_LINE_WEIGHT,
                opacity: ROUTE_LINE_OPACITY,
                tooltip: Some(segment_tooltip(score)),
            })
            .collect()
    };

    Some(RoutePlan {
        segments,
        start: coords[0],
        end: coords[coords.len() - 1],
        bounds: bounds_of(coords),
        padding: FIT_BOUNDS_PADDING,
    })
}

pub fn bounds_of(coords: &[Coordinate]) -> RouteBounds {
    let mut bounds = RouteBounds {
        min_lat: f64::INFINITY,
        max_lat: f64::NEG_INFINITY,
        min_lon: f64::INFINITY,
        max_lon: f64::NEG_INFINITY,
    };
    for coord in coords {
        bounds.min_lat = bounds.min_lat.min(coord.lat);
        bounds.max_lat = bounds.max_lat.max(coord.lat);
        bounds.min_lon = bounds.min_lon.min(coord.lon);
        bounds.max_lon = bounds.max_lon.max(coord.lon);
    }
    bounds
}

fn segment_tooltip(score: f64) -> String {
    let level = SafetyLevel::from_score(score);
    format!(
        "<div class=\"segment-tooltip\">\
         <span class=\"safety-level {}\">{}</span>\
         <span>Score: {score}/10</span>\
         </div>",
        level.css_class(),
        level.label(),
    )
}

/// One incident circle marker with its popup markup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerPlan {
    pub lat: f64,
    pub lon: f64,
    pub color: &'static str,
    pub radius: u32,
    pub fill_opacity: f64,
    pub popup: String,
}

pub fn incident_color(kind: IncidentKind) -> &'static str {
    match kind {
        IncidentKind::Crime => "red",
        IncidentKind::Hazard => "yellow",
    }
}

pub fn plan_incident_markers(records: &[IncidentRecord]) -> Vec<MarkerPlan> {
    records
        .iter()
        .map(|record| MarkerPlan {
            lat: record.lat,
            lon: record.lon,
            color: incident_color(record.kind),
            radius: INCIDENT_MARKER_RADIUS,
            fill_opacity: INCIDENT_FILL_OPACITY,
            popup: incident_popup(record),
        })
        .collect()
}

fn incident_popup(record: &IncidentRecord) -> String {
    format!(
        "<strong>{}</strong><br>\
         📅 {}<br>\
         🔥 Severity: {}<br>\
         <a href=\"https://www.google.com/maps?q={},{}\" target=\"_blank\">🌍 View on Google Maps</a>",
        record.label, record.timestamp, record.severity, record.lat, record.lon,
    )
}

/// Fixed heat layer configuration, serialized as the options object the
/// density renderer expects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatOptions {
    pub radius: u32,
    pub blur: u32,
    pub max_zoom: u32,
    pub gradient: BTreeMap<String, String>,
}

pub fn heat_options() -> HeatOptions {
    HeatOptions {
        radius: HEAT_RADIUS,
        blur: HEAT_BLUR,
        max_zoom: HEAT_MAX_ZOOM,
        gradient: HEAT_GRADIENT
            .iter()
            .map(|&(stop, color)| (stop.to_string(), color.to_string()))
            .collect(),
    }
}

/// `[lat, lon, weight]` triples: each point contributes `severity / 10`.
pub fn weigh_heat_points(points: &[HeatPoint]) -> Vec<[f64; 3]> {
    points
        .iter()
        .map(|p| [p.lat, p.lon, p.severity / 10.0])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::RouteData;

    fn route(coords: Vec<[f64; 2]>, scores: Vec<f64>, safety: f64) -> RouteData {
        RouteData {
            coordinates: coords.into_iter().map(Coordinate::from).collect(),
            segment_scores: scores,
            safety_score: safety,
            distance: None,
            duration: None,
        }
    }

    #[test]
    fn scored_route_yields_one_segment_per_coordinate_pair() {
        let data = route(
            vec![[36.0, -80.2], [36.01, -80.21], [36.02, -80.22]],
            vec![2.0, 8.0],
            5.0,
        );
        let plan = plan_route(&data).expect("plan");

        assert_eq!(plan.segments.len(), 2);
        assert!(plan.segments.iter().all(|s| s.points.len() == 2));
        assert_eq!(plan.segments[0].color, "#34c759");
        assert_eq!(plan.segments[1].color, "#ff3b30");
        assert_eq!(plan.start, Coordinate::from([36.0, -80.2]));
        assert_eq!(plan.end, Coordinate::from([36.02, -80.22]));
    }

    #[test]
    fn segment_tooltips_carry_label_and_raw_score() {
        let data = route(vec![[36.0, -80.2], [36.01, -80.21]], vec![8.0], 8.0);
        let plan = plan_route(&data).expect("plan");
        let tooltip = plan.segments[0].tooltip.as_deref().expect("tooltip");

        assert!(tooltip.contains("Dangerous"));
        assert!(tooltip.contains("dangerous"));
        assert!(tooltip.contains("Score: 8/10"));
    }

    #[test]
    fn unscored_route_yields_one_uniform_line_over_all_coordinates() {
        let data = route(
            vec![[36.0, -80.2], [36.01, -80.21], [36.02, -80.22]],
            vec![],
            5.0,
        );
        let plan = plan_route(&data).expect("plan");

        assert_eq!(plan.segments.len(), 1);
        assert_eq!(plan.segments[0].points.len(), 3);
        assert_eq!(plan.segments[0].color, "#ff9500");
        assert_eq!(plan.segments[0].tooltip, None);
    }

    #[test]
    fn degenerate_route_produces_no_plan() {
        assert!(plan_route(&route(vec![[36.0, -80.2]], vec![], 5.0)).is_none());
        assert!(plan_route(&route(vec![], vec![], 5.0)).is_none());
    }

    #[test]
    fn bounds_cover_every_coordinate_with_fixed_padding() {
        let data = route(
            vec![[36.02, -80.2], [36.0, -80.25], [36.05, -80.22]],
            vec![],
            2.0,
        );
        let plan = plan_route(&data).expect("plan");

        assert_eq!(
            plan.bounds,
            RouteBounds {
                min_lat: 36.0,
                max_lat: 36.05,
                min_lon: -80.25,
                max_lon: -80.2,
            }
        );
        assert_eq!(plan.padding, FIT_BOUNDS_PADDING);
    }

    #[test]
    fn incident_markers_are_colored_by_category() {
        let records = vec![
            IncidentRecord {
                lat: 36.1,
                lon: -80.2,
                kind: IncidentKind::Crime,
                label: "Robbery reported".to_string(),
                timestamp: "2026-07-03 22:15".to_string(),
                severity: 7.0,
            },
            IncidentRecord {
                lat: 36.11,
                lon: -80.21,
                kind: IncidentKind::Hazard,
                label: "Broken streetlight".to_string(),
                timestamp: "2026-07-04 01:40".to_string(),
                severity: 3.0,
            },
        ];
        let markers = plan_incident_markers(&records);

        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].color, "red");
        assert_eq!(markers[1].color, "yellow");
        assert!(markers[0].popup.contains("Robbery reported"));
        assert!(markers[0].popup.contains("2026-07-03 22:15"));
        assert!(markers[0].popup.contains("Severity: 7"));
        assert!(markers[0]
            .popup
            .contains("https://www.google.com/maps?q=36.1,-80.2"));
    }

    #[test]
    fn heat_points_are_weighted_by_a_tenth_of_severity() {
        let points = vec![
            HeatPoint {
                lat: 36.1,
                lon: -80.2,
                severity: 5.0,
            },
            // Above 10 is allowed; the gradient saturates at the top stop.
            HeatPoint {
                lat: 36.2,
                lon: -80.3,
                severity: 14.0,
            },
        ];
        let weighted = weigh_heat_points(&points);

        assert_eq!(weighted, vec![[36.1, -80.2, 0.5], [36.2, -80.3, 1.4]]);
    }

    #[test]
    fn heat_options_expose_the_five_stop_gradient() {
        let options = heat_options();

        assert_eq!(options.radius, 25);
        assert_eq!(options.blur, 15);
        assert_eq!(options.max_zoom, 17);
        assert_eq!(options.gradient.len(), 5);
        assert_eq!(options.gradient["0.4"], "blue");
        assert_eq!(options.gradient["1.0"], "red");
    }
}
