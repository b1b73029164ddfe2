//! Join classified aircraft against recent departures by ICAO24 address.

use crate::enrich::AirlineTable;
use crate::types::{ClassifiedAircraft, DepartureRecord, MatchResult};

/// Attaches departure records and airline names to classified aircraft.
#[derive(Debug, Clone, Default)]
pub struct DepartureMatcher {
    airlines: AirlineTable,
}

impl DepartureMatcher {
    pub fn new(airlines: AirlineTable) -> Self {
        DepartureMatcher { airlines }
    }

    /// One result per classified aircraft, in input order.
    ///
    /// Departures are not deduplicated upstream; the first record with a
    /// matching address wins.
    pub fn match_departures(
        &self,
        classified: Vec<ClassifiedAircraft>,
        departures: &[DepartureRecord],
    ) -> Vec<MatchResult> {
        classified
            .into_iter()
            .map(|aircraft| {
                let departure = departures
                    .iter()
                    .find(|d| d.icao24 == aircraft.state.icao24)
                    .cloned();
                let airline = self.airlines.resolve(aircraft.state.callsign.as_deref());
                MatchResult {
                    aircraft,
                    departure,
                    airline,
                }
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
