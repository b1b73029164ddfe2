//! Shared types, error enum, and the aircraft/departure data model.

use serde::Serialize;
use thiserror::Error;

/// All errors produced by planewatch-core.
#[derive(Debug, Error)]
pub enum PlanewatchError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlanewatchError>;

// ---------------------------------------------------------------------------
// Observed aircraft
// ---------------------------------------------------------------------------

/// One state vector as reported by the state source.
///
/// Every kinematic field is optional. `None` means the sensor had no value,
/// which is distinct from a reading of zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AircraftState {
    pub icao24: String,
    pub callsign: Option<String>,
    pub on_ground: bool,
    pub baro_altitude: Option<f64>,
    pub heading: Option<f64>,
    pub velocity: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl AircraftState {
    /// Airborne aircraft with every optional field unknown.
    pub fn new(icao24: impl Into<String>) -> Self {
        AircraftState {
            icao24: icao24.into(),
            callsign: None,
            on_ground: false,
            baro_altitude: None,
            heading: None,
            velocity: None,
            latitude: None,
            longitude: None,
        }
    }

    /// Callsign with padding removed, `None` when absent or blank.
    pub fn trimmed_callsign(&self) -> Option<&str> {
        self.callsign
            .as_deref()
            .map(str::trim)
            .filter(|cs| !cs.is_empty())
    }
}

/// A flight the departure source reports as having left the airport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartureRecord {
    pub icao24: String,
    pub origin: Option<String>,
    pub destination: Option<String>,
    /// Epoch seconds, UTC.
    pub first_seen: i64,
}

// ---------------------------------------------------------------------------
// Classification + matching output
// ---------------------------------------------------------------------------

/// Why an aircraft was picked out of the raw state list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    AirborneSouthwestDeparture,
    GroundReadyForTakeoff,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::AirborneSouthwestDeparture => write!(f, "departing"),
            Category::GroundReadyForTakeoff => write!(f, "ready for takeoff"),
        }
    }
}

/// An aircraft state tagged with exactly one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedAircraft {
    pub state: AircraftState,
    pub category: Category,
}

/// A classified aircraft joined against the departure list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub aircraft: ClassifiedAircraft,
    pub departure: Option<DepartureRecord>,
    pub airline: String,
}

// ---------------------------------------------------------------------------
// Geography
// ---------------------------------------------------------------------------

/// WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Rectangular lat/lon filter handed to the state source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub lamin: f64,
    pub lamax: f64,
    pub lomin: f64,
    pub lomax: f64,
}

impl BoundingBox {
    /// Tight box over the Dallas Love Field runways.
    pub fn around_dal() -> Self {
        BoundingBox {
            lamin: 32.83,
            lamax: 32.86,
            lomin: -96.87,
            lomax: -96.84,
        }
    }

    /// Square box of `half_span_deg` degrees around a point.
    pub fn around_point(lat: f64, lon: f64, half_span_deg: f64) -> Self {
        let span = half_span_deg.abs();
        BoundingBox {
            lamin: lat - span,
            lamax: lat + span,
            lomin: lon - span,
            lomax: lon + span,
        }
    }

    /// Parse `lamin,lamax,lomin,lomax`.
    pub fn parse(text: &str) -> Result<Self> {
        let parts: Vec<&str> = text.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(PlanewatchError::InvalidInput(format!(
                "bounding box needs 4 comma-separated values, got {}",
                parts.len()
            )));
        }
        let mut vals = [0.0f64; 4];
        for (slot, part) in vals.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| {
                PlanewatchError::InvalidInput(format!("not a coordinate: {part:?}"))
            })?;
        }
        let bbox = BoundingBox {
            lamin: vals[0],
            lamax: vals[1],
            lomin: vals[2],
            lomax: vals[3],
        };
        if bbox.lamin > bbox.lamax || bbox.lomin > bbox.lomax {
            return Err(PlanewatchError::InvalidInput(
                "bounding box minimum exceeds maximum".into(),
            ));
        }
        Ok(bbox)
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint {
            lat: (self.lamin + self.lamax) / 2.0,
            lon: (self.lomin + self.lomax) / 2.0,
        }
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.lamin, self.lamax, self.lomin, self.lomax
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
