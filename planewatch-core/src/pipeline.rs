//! State filter → departure matcher → presentation formatter.
//!
//! Split in two steps so callers can skip the departure fetch when nothing
//! was classified.

use crate::config::Config;
use crate::enrich::AirlineTable;
use crate::filter::{ClassifierConfig, StateFilter};
use crate::matcher::DepartureMatcher;
use crate::present::{PresentationFormatter, PresentationRecord};
use crate::types::{AircraftState, ClassifiedAircraft, DepartureRecord};

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub filter: StateFilter,
    pub matcher: DepartureMatcher,
    pub formatter: PresentationFormatter,
}

impl Pipeline {
    pub fn new(classifier: ClassifierConfig, airlines: AirlineTable) -> Self {
        Pipeline {
            filter: StateFilter::new(classifier),
            matcher: DepartureMatcher::new(airlines),
            formatter: PresentationFormatter,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Pipeline::new(config.classifier.clone(), config.airline_table())
    }

    pub fn classify(&self, states: &[AircraftState]) -> Vec<ClassifiedAircraft> {
        self.filter.classify(states)
    }

    /// Match and format already-classified aircraft.
    pub fn present(
        &self,
        classified: Vec<ClassifiedAircraft>,
        departures: &[DepartureRecord],
    ) -> Vec<PresentationRecord> {
        let matched = self.matcher.match_departures(classified, departures);
        self.formatter.format_all(&matched)
    }

    pub fn run(
        &self,
        states: &[AircraftState],
        departures: &[DepartureRecord],
    ) -> Vec<PresentationRecord> {
        self.present(self.classify(states), departures)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opensky::{decode_departures, decode_states};
    use crate::types::Category;
    use serde_json::json;

    #[test]
    fn test_end_to_end_scenario() {
        let mut state = AircraftState::new("a1");
        state.callsign = Some("SWA100".into());
        state.baro_altitude = Some(1500.0);
        state.heading = Some(225.0);
        state.velocity = Some(250.0);

        let departures = vec![DepartureRecord {
            icao24: "a1".into(),
            origin: Some("KDAL".into()),
            destination: Some("KDEN".into()),
            first_seen: 1_700_000_000,
        }];

        let records = Pipeline::default().run(&[state], &departures);
        assert_eq!(records.len(), 1);
        let rec = &records[0];
        assert_eq!(rec.airline, "Southwest Airlines");
        assert_eq!(rec.category, Category::AirborneSouthwestDeparture);
        let dep = rec.departure.as_ref().unwrap();
        assert_eq!(dep.origin, "KDAL");
        assert_eq!(dep.destination, "KDEN");
        assert_eq!(dep.takeoff_time, "2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn test_end_to_end_from_wire() {
        let states = decode_states(&json!({
            "time": 1700000000,
            "states": [
                ["a1", "SWA100  ", "United States", 1, 1, -96.86, 32.84,
                 1500.0, false, 250.0, 225.0, 0.0, null, 1600.0, null, false, 0],
                ["g1", "DAL22   ", "United States", 1, 1, -96.85, 32.85,
                 null, true, 12.0, 130.0, null, null, null, null, false, 0],
                ["zz", null, "United States", 1, 1, -96.85, 32.85,
                 null, true, 0.0, null, null, null, null, null, false, 0]
            ]
        }))
        .unwrap();
        let departures = decode_departures(&json!([
            {"icao24": "a1", "firstSeen": 1700000000,
             "estDepartureAirport": "KDAL", "estArrivalAirport": "KDEN"}
        ]))
        .unwrap();

        let records = Pipeline::from_config(&Config::default()).run(&states, &departures);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].callsign, "SWA100");
        assert!(records[0].departure.is_some());
        assert_eq!(records[1].airline, "Delta Air Lines");
        assert_eq!(records[1].category, Category::GroundReadyForTakeoff);
        assert_eq!(records[1].altitude, "?");
        assert!(records[1].departure.is_none());
    }

    #[test]
    fn test_nothing_classified() {
        let pipeline = Pipeline::default();
        assert!(pipeline.classify(&[AircraftState::new("x")]).is_empty());
        assert!(pipeline.present(Vec::new(), &[]).is_empty());
    }
}
