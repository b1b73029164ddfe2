//! Presentation records: display-ready strings for the CLI and web map.
//!
//! Unknown values render as [`UNKNOWN_MARKER`], never as zero. Timestamps
//! render in UTC as `YYYY-MM-DD HH:MM:SS UTC`.

use chrono::DateTime;
use serde::Serialize;

use crate::types::{Category, GeoPoint, MatchResult};

/// Rendered in place of an absent heading, altitude, or timestamp.
pub const UNKNOWN_MARKER: &str = "?";

/// Rendered in place of a blank callsign or a null airport code.
pub const UNKNOWN_TEXT: &str = "Unknown";

const MAP_ZOOM: u8 = 12;

/// Route + takeoff time from a matched departure record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartureSummary {
    pub origin: String,
    pub destination: String,
    pub takeoff_time: String,
}

/// One aircraft, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PresentationRecord {
    pub icao24: String,
    pub callsign: String,
    pub airline: String,
    pub category: Category,
    pub heading: String,
    pub altitude: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub departure: Option<DepartureSummary>,
}

impl PresentationRecord {
    /// Marker position, when both coordinates are known.
    pub fn map_marker(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint { lat, lon }),
            _ => None,
        }
    }

    /// OpenStreetMap link centred on the marker.
    pub fn map_link(&self) -> Option<String> {
        self.map_marker().map(|p| {
            format!(
                "https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map={MAP_ZOOM}/{lat}/{lon}",
                lat = p.lat,
                lon = p.lon
            )
        })
    }

    /// `SWA100 (Southwest Airlines)`
    pub fn title(&self) -> String {
        format!("{} ({})", self.callsign, self.airline)
    }

    /// `KDAL -> KDEN` when a departure matched.
    pub fn route(&self) -> Option<String> {
        self.departure
            .as_ref()
            .map(|d| format!("{} -> {}", d.origin, d.destination))
    }

    /// One-line summary for logs and popups.
    pub fn summary(&self) -> String {
        format!(
            "{} hdg {}\u{b0} alt {} ft",
            self.title(),
            self.heading,
            self.altitude
        )
    }
}

/// Maps match results to presentation records. Pure.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresentationFormatter;

impl PresentationFormatter {
    pub fn format(&self, result: &MatchResult) -> PresentationRecord {
        let state = &result.aircraft.state;
        PresentationRecord {
            icao24: state.icao24.clone(),
            callsign: state
                .trimmed_callsign()
                .unwrap_or(UNKNOWN_TEXT)
                .to_string(),
            airline: result.airline.clone(),
            category: result.aircraft.category,
            heading: state
                .heading
                .map(format_heading)
                .unwrap_or_else(|| UNKNOWN_MARKER.into()),
            altitude: state
                .baro_altitude
                .map(format_altitude)
                .unwrap_or_else(|| UNKNOWN_MARKER.into()),
            latitude: state.latitude,
            longitude: state.longitude,
            departure: result.departure.as_ref().map(|d| DepartureSummary {
                origin: d.origin.clone().unwrap_or_else(|| UNKNOWN_TEXT.into()),
                destination: d
                    .destination
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_TEXT.into()),
                takeoff_time: format_timestamp(d.first_seen),
            }),
        }
    }

    pub fn format_all(&self, results: &[MatchResult]) -> Vec<PresentationRecord> {
        results.iter().map(|r| self.format(r)).collect()
    }
}

/// Heading to one decimal place.
pub fn format_heading(heading: f64) -> String {
    format!("{:.1}", (heading * 10.0).round() / 10.0)
}

/// Altitude to the nearest foot, halves away from zero.
pub fn format_altitude(altitude: f64) -> String {
    (altitude.round() as i64).to_string()
}

/// Epoch seconds as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_timestamp(epoch_secs: i64) -> String {
    DateTime::from_timestamp(epoch_secs, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| UNKNOWN_MARKER.into())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
