//! One "find plane" pass: fetch states, classify, fetch departures, present.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use planewatch_core::types::BoundingBox;
use planewatch_core::{Pipeline, PresentationRecord};

use crate::source::{FetchError, FlightSource};

pub const NO_PLANES_MESSAGE: &str = "No planes currently taking off or preparing for takeoff.";

#[derive(Debug, Error)]
pub enum FindError {
    #[error("Failed to fetch aircraft state data: {0}")]
    States(#[source] FetchError),
    #[error("Failed to fetch recent departures from {airport}: {source}")]
    Departures {
        airport: String,
        #[source]
        source: FetchError,
    },
}

/// What to look for and where.
#[derive(Debug, Clone)]
pub struct FindRequest {
    pub airport: String,
    pub bbox: BoundingBox,
    pub lookback_secs: u64,
    /// Epoch seconds; end of the departure window.
    pub now: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FindOutcome {
    pub airport: String,
    pub states_seen: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub records: Vec<PresentationRecord>,
}

impl FindOutcome {
    fn new(airport: &str, states_seen: usize, records: Vec<PresentationRecord>) -> Self {
        FindOutcome {
            airport: airport.to_string(),
            states_seen,
            message: records.is_empty().then_some(NO_PLANES_MESSAGE),
            records,
        }
    }
}

pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Departures are only requested when at least one aircraft classified.
pub async fn find_planes(
    source: &dyn FlightSource,
    pipeline: &Pipeline,
    request: &FindRequest,
) -> Result<FindOutcome, FindError> {
    let states = source
        .states(&request.bbox)
        .await
        .map_err(FindError::States)?;
    let classified = pipeline.classify(&states);
    info!(
        states = states.len(),
        candidates = classified.len(),
        bbox = %request.bbox,
        "classified state vectors"
    );

    if classified.is_empty() {
        return Ok(FindOutcome::new(&request.airport, states.len(), Vec::new()));
    }

    let lookback = i64::try_from(request.lookback_secs).unwrap_or(i64::MAX);
    let begin = request.now.saturating_sub(lookback);
    let departures = source
        .departures(&request.airport, begin, request.now)
        .await
        .map_err(|source| FindError::Departures {
            airport: request.airport.clone(),
            source,
        })?;
    info!(
        airport = %request.airport,
        departures = departures.len(),
        "fetched recent departures"
    );

    let records = pipeline.present(classified, &departures);
    for rec in &records {
        debug!(icao24 = %rec.icao24, category = %rec.category, "{}", rec.summary());
    }
    Ok(FindOutcome::new(&request.airport, states.len(), records))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use planewatch_core::types::{AircraftState, DepartureRecord, PlanewatchError};

    /// In-memory source that records the departure window it was asked for.
    pub(crate) struct MockSource {
        pub states: Vec<AircraftState>,
        pub departures: Vec<DepartureRecord>,
        pub fail_states: bool,
        pub fail_departures: bool,
        pub departure_calls: AtomicUsize,
        pub last_window: Mutex<Option<(String, i64, i64)>>,
    }

    impl MockSource {
        pub(crate) fn new(states: Vec<AircraftState>, departures: Vec<DepartureRecord>) -> Self {
            MockSource {
                states,
                departures,
                fail_states: false,
                fail_departures: false,
                departure_calls: AtomicUsize::new(0),
                last_window: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl FlightSource for MockSource {
        async fn states(&self, _bbox: &BoundingBox) -> Result<Vec<AircraftState>, FetchError> {
            if self.fail_states {
                return Err(FetchError::Status {
                    endpoint: "/states/all",
                    status: 500,
                });
            }
            Ok(self.states.clone())
        }

        async fn departures(
            &self,
            airport: &str,
            begin: i64,
            end: i64,
        ) -> Result<Vec<DepartureRecord>, FetchError> {
            self.departure_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_window.lock().unwrap() = Some((airport.to_string(), begin, end));
            if self.fail_departures {
                return Err(FetchError::Decode(PlanewatchError::InvalidInput(
                    "departures response is not an array".into(),
                )));
            }
            Ok(self.departures.clone())
        }
    }

    pub(crate) fn departing_swa() -> AircraftState {
        let mut ac = AircraftState::new("a1");
        ac.callsign = Some("SWA100  ".into());
        ac.baro_altitude = Some(1500.0);
        ac.heading = Some(225.0);
        ac.velocity = Some(250.0);
        ac.latitude = Some(32.84);
        ac.longitude = Some(-96.86);
        ac
    }

    pub(crate) fn kdal_departure() -> DepartureRecord {
        DepartureRecord {
            icao24: "a1".into(),
            origin: Some("KDAL".into()),
            destination: Some("KDEN".into()),
            first_seen: 1_700_000_000,
        }
    }

    fn request() -> FindRequest {
        FindRequest {
            airport: "KDAL".into(),
            bbox: BoundingBox::around_dal(),
            lookback_secs: 3600,
            now: 1_700_001_000,
        }
    }

    #[tokio::test]
    async fn test_find_matches_departure() {
        let source = MockSource::new(vec![departing_swa()], vec![kdal_departure()]);
        let outcome = find_planes(&source, &Pipeline::default(), &request())
            .await
            .unwrap();

        assert_eq!(outcome.states_seen, 1);
        assert_eq!(outcome.records.len(), 1);
        assert!(outcome.message.is_none());
        let dep = outcome.records[0].departure.as_ref().unwrap();
        assert_eq!(dep.takeoff_time, "2023-11-14 22:13:20 UTC");
        assert_eq!(
            *source.last_window.lock().unwrap(),
            Some(("KDAL".to_string(), 1_699_997_400, 1_700_001_000))
        );
    }

    #[tokio::test]
    async fn test_find_skips_departures_when_empty() {
        let source = MockSource::new(vec![AircraftState::new("x")], vec![kdal_departure()]);
        let outcome = find_planes(&source, &Pipeline::default(), &request())
            .await
            .unwrap();

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.message, Some(NO_PLANES_MESSAGE));
        assert_eq!(source.departure_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_find_state_failure() {
        let mut source = MockSource::new(vec![departing_swa()], Vec::new());
        source.fail_states = true;
        let err = find_planes(&source, &Pipeline::default(), &request())
            .await
            .unwrap_err();
        assert!(matches!(err, FindError::States(_)));
        assert!(err
            .to_string()
            .starts_with("Failed to fetch aircraft state data"));
    }

    #[tokio::test]
    async fn test_find_departure_failure() {
        let mut source = MockSource::new(vec![departing_swa()], Vec::new());
        source.fail_departures = true;
        let err = find_planes(&source, &Pipeline::default(), &request())
            .await
            .unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Failed to fetch recent departures from KDAL"));
    }

    #[tokio::test]
    async fn test_find_huge_lookback_clamps_window() {
        let source = MockSource::new(vec![departing_swa()], vec![kdal_departure()]);
        let req = FindRequest {
            lookback_secs: 1u64 << 63,
            now: 1_700_000_000,
            ..request()
        };
        let outcome = find_planes(&source, &Pipeline::default(), &req)
            .await
            .unwrap();

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(
            *source.last_window.lock().unwrap(),
            Some(("KDAL".to_string(), 1_700_000_000 - i64::MAX, 1_700_000_000))
        );
    }

    #[test]
    fn test_outcome_json_carries_message() {
        let empty = serde_json::to_value(FindOutcome::new("KDAL", 3, Vec::new())).unwrap();
        assert_eq!(empty["message"], NO_PLANES_MESSAGE);
        assert_eq!(empty["states_seen"], 3);

        let records = Pipeline::default().run(&[departing_swa()], &[kdal_departure()]);
        let found = serde_json::to_value(FindOutcome::new("KDAL", 1, records)).unwrap();
        assert!(found.get("message").is_none());
        assert_eq!(found["records"].as_array().unwrap().len(), 1);
    }
}
