//! The incident dataset behind `/incidents` and `/safety-data`: loaded
//! from a JSON file when one exists, otherwise a generated sample scatter
//! around the default map center.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{Duration, Utc};
use rand::Rng;
use shared::{Coordinate, HeatPoint, IncidentKind, IncidentRecord};
use thiserror::Error;

/// Spread of the generated sample around the center, in degrees.
const SAMPLE_SPREAD: f64 = 0.05;

const CRIME_LABELS: [&str; 5] = [
    "Robbery reported",
    "Vehicle break-in",
    "Assault reported",
    "Theft from person",
    "Vandalism",
];

const HAZARD_LABELS: [&str; 4] = [
    "Broken streetlight",
    "Flooded underpass",
    "Sidewalk closure",
    "Fallen tree",
];

#[derive(Debug, Error)]
pub enum IncidentStoreError {
    #[error("failed to read incident data: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse incident data: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct IncidentStore {
    records: Vec<IncidentRecord>,
}

impl IncidentStore {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, IncidentStoreError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, IncidentStoreError> {
        let records = serde_json::from_reader(reader)?;
        Ok(Self { records })
    }

    pub fn new(records: Vec<IncidentRecord>) -> Self {
        Self { records }
    }

    /// A labeled, timestamped scatter of `count` incidents around `center`.
    pub fn sample(center: Coordinate, count: usize) -> Self {
        let mut rng = rand::thread_rng();
        let now = Utc::now();

        let records = (0..count)
            .map(|_| {
                let is_crime = rng.gen_bool(0.5);
                let labels: &[&str] = if is_crime { &CRIME_LABELS } else { &HAZARD_LABELS };
                let reported = now - Duration::days(rng.gen_range(0..30))
                    - Duration::minutes(rng.gen_range(0..1440));

                IncidentRecord {
                    lat: center.lat + (rng.gen::<f64>() - 0.5) * SAMPLE_SPREAD,
                    lon: center.lon + (rng.gen::<f64>() - 0.5) * SAMPLE_SPREAD,
                    kind: if is_crime {
                        IncidentKind::Crime
                    } else {
                        IncidentKind::Hazard
                    },
                    label: labels[rng.gen_range(0..labels.len())].to_string(),
                    timestamp: reported.format("%Y-%m-%d %H:%M").to_string(),
                    severity: f64::from(rng.gen_range(1..=10)),
                }
            })
            .collect();

        Self { records }
    }

    pub fn all(&self) -> &[IncidentRecord] {
        &self.records
    }

    /// Crime records only, as weighted points for the density layer.
    pub fn heat_points(&self) -> Vec<HeatPoint> {
        self.records
            .iter()
            .filter(|r| r.kind == IncidentKind::Crime)
            .map(|r| HeatPoint {
                lat: r.lat,
                lon: r.lon,
                severity: r.severity,
            })
            .collect()
    }
}
