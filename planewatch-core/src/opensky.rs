//! OpenSky Network response decoding.
//!
//! `/states/all` returns positional arrays; `/flights/departure` returns an
//! array of objects. Anything shaped differently is `InvalidInput`. Nulls
//! inside a well-formed record become `None`.

use serde_json::Value;

use crate::types::{AircraftState, DepartureRecord, PlanewatchError, Result};

// State vector column indices.
const COL_ICAO24: usize = 0;
const COL_CALLSIGN: usize = 1;
const COL_LONGITUDE: usize = 5;
const COL_LATITUDE: usize = 6;
const COL_BARO_ALTITUDE: usize = 7;
const COL_ON_GROUND: usize = 8;
const COL_VELOCITY: usize = 9;
const COL_TRUE_TRACK: usize = 10;

/// Columns we need; OpenSky sends 17 (18 with `category`).
const MIN_STATE_COLUMNS: usize = COL_TRUE_TRACK + 1;

fn invalid(msg: impl Into<String>) -> PlanewatchError {
    PlanewatchError::InvalidInput(msg.into())
}

/// Parse a raw `/states/all` body.
pub fn parse_states(body: &str) -> Result<Vec<AircraftState>> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| invalid(format!("states body: {e}")))?;
    decode_states(&value)
}

/// Parse a raw `/flights/departure` body.
pub fn parse_departures(body: &str) -> Result<Vec<DepartureRecord>> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| invalid(format!("departures body: {e}")))?;
    decode_departures(&value)
}

/// Decode a `/states/all` response. `"states": null` means an empty sky.
pub fn decode_states(response: &Value) -> Result<Vec<AircraftState>> {
    let obj = response
        .as_object()
        .ok_or_else(|| invalid("states response is not an object"))?;
    match obj.get("states") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(rows)) => rows
            .iter()
            .enumerate()
            .map(|(i, row)| decode_state_row(i, row))
            .collect(),
        Some(_) => Err(invalid("`states` is not an array")),
    }
}

fn decode_state_row(index: usize, row: &Value) -> Result<AircraftState> {
    let cols = row
        .as_array()
        .ok_or_else(|| invalid(format!("state {index} is not an array")))?;
    if cols.len() < MIN_STATE_COLUMNS {
        return Err(invalid(format!(
            "state {index} has {} columns, expected at least {MIN_STATE_COLUMNS}",
            cols.len()
        )));
    }

    let icao24 = cols[COL_ICAO24]
        .as_str()
        .ok_or_else(|| invalid(format!("state {index}: icao24 is not a string")))?
        .to_string();

    let callsign = match &cols[COL_CALLSIGN] {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        _ => return Err(invalid(format!("state {index}: callsign is not a string"))),
    };

    let on_ground = cols[COL_ON_GROUND]
        .as_bool()
        .ok_or_else(|| invalid(format!("state {index}: on_ground is not a boolean")))?;

    Ok(AircraftState {
        icao24,
        callsign,
        on_ground,
        baro_altitude: optional_number(&cols[COL_BARO_ALTITUDE], index, "baro_altitude")?,
        heading: optional_number(&cols[COL_TRUE_TRACK], index, "true_track")?,
        velocity: optional_number(&cols[COL_VELOCITY], index, "velocity")?,
        latitude: optional_number(&cols[COL_LATITUDE], index, "latitude")?,
        longitude: optional_number(&cols[COL_LONGITUDE], index, "longitude")?,
    })
}

fn optional_number(val: &Value, index: usize, field: &str) -> Result<Option<f64>> {
    match val {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        _ => Err(invalid(format!("state {index}: {field} is not a number"))),
    }
}

/// Decode a `/flights/departure` response.
pub fn decode_departures(response: &Value) -> Result<Vec<DepartureRecord>> {
    let rows = response
        .as_array()
        .ok_or_else(|| invalid("departures response is not an array"))?;
    rows.iter()
        .enumerate()
        .map(|(i, row)| decode_departure(i, row))
        .collect()
}

fn decode_departure(index: usize, row: &Value) -> Result<DepartureRecord> {
    let obj = row
        .as_object()
        .ok_or_else(|| invalid(format!("departure {index} is not an object")))?;

    let icao24 = obj
        .get("icao24")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(format!("departure {index}: icao24 missing or not a string")))?
        .to_string();

    let first_seen = obj
        .get("firstSeen")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .ok_or_else(|| invalid(format!("departure {index}: firstSeen missing or not a number")))?;

    Ok(DepartureRecord {
        icao24,
        origin: optional_string(obj.get("estDepartureAirport"), index, "estDepartureAirport")?,
        destination: optional_string(obj.get("estArrivalAirport"), index, "estArrivalAirport")?,
        first_seen,
    })
}

fn optional_string(val: Option<&Value>, index: usize, field: &str) -> Result<Option<String>> {
    match val {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid(format!("departure {index}: {field} is not a string"))),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(id: &str, on_ground: bool, alt: Value, vel: Value, hdg: Value) -> Value {
        json!([
            id, "SWA100  ", "United States", 1700000000, 1700000000,
            -96.85, 32.84, alt, on_ground, vel, hdg, 0.0, null, 1600.0,
            "1200", false, 0
        ])
    }

    #[test]
    fn test_decode_states() {
        let resp = json!({
            "time": 1700000000,
            "states": [row("a1", false, json!(1500.0), json!(250.0), json!(225.0))]
        });
        let states = decode_states(&resp).unwrap();
        assert_eq!(states.len(), 1);
        let ac = &states[0];
        assert_eq!(ac.icao24, "a1");
        assert_eq!(ac.callsign.as_deref(), Some("SWA100  "));
        assert!(!ac.on_ground);
        assert_eq!(ac.baro_altitude, Some(1500.0));
        assert_eq!(ac.velocity, Some(250.0));
        assert_eq!(ac.heading, Some(225.0));
        assert_eq!(ac.latitude, Some(32.84));
        assert_eq!(ac.longitude, Some(-96.85));
    }

    #[test]
    fn test_decode_states_nulls_are_unknown() {
        let resp = json!({
            "states": [row("a1", true, Value::Null, Value::Null, Value::Null)]
        });
        let ac = &decode_states(&resp).unwrap()[0];
        assert!(ac.on_ground);
        assert!(ac.baro_altitude.is_none());
        assert!(ac.velocity.is_none());
        assert!(ac.heading.is_none());
    }

    #[test]
    fn test_decode_states_null_means_empty() {
        assert!(decode_states(&json!({"time": 1, "states": null}))
            .unwrap()
            .is_empty());
        assert!(decode_states(&json!({"time": 1})).unwrap().is_empty());
    }

    #[test]
    fn test_decode_states_invalid_shapes() {
        assert!(matches!(
            decode_states(&json!([1, 2, 3])),
            Err(PlanewatchError::InvalidInput(_))
        ));
        assert!(decode_states(&json!({"states": "nope"})).is_err());
        assert!(decode_states(&json!({"states": [{"icao24": "a1"}]})).is_err());
        assert!(decode_states(&json!({"states": [["a1", null, "US"]]})).is_err());
        assert!(decode_states(&json!({
            "states": [row("a1", false, json!("high"), json!(1.0), json!(1.0))]
        }))
        .is_err());

        let mut bad_id = row("a1", false, json!(1.0), json!(1.0), json!(1.0));
        bad_id[0] = json!(42);
        assert!(decode_states(&json!({ "states": [bad_id] })).is_err());

        let mut bad_ground = row("a1", false, json!(1.0), json!(1.0), json!(1.0));
        bad_ground[8] = Value::Null;
        assert!(decode_states(&json!({ "states": [bad_ground] })).is_err());
    }

    #[test]
    fn test_decode_departures() {
        let resp = json!([
            {
                "icao24": "a1",
                "firstSeen": 1700000000,
                "estDepartureAirport": "KDAL",
                "estArrivalAirport": "KDEN",
                "lastSeen": 1700003600,
                "callsign": "SWA100  "
            },
            {
                "icao24": "b2",
                "firstSeen": 1700000100,
                "estDepartureAirport": "KDAL",
                "estArrivalAirport": null
            }
        ]);
        let deps = decode_departures(&resp).unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].origin.as_deref(), Some("KDAL"));
        assert_eq!(deps[0].destination.as_deref(), Some("KDEN"));
        assert_eq!(deps[0].first_seen, 1_700_000_000);
        assert!(deps[1].destination.is_none());
    }

    #[test]
    fn test_decode_departures_invalid_shapes() {
        assert!(decode_departures(&json!({"icao24": "a1"})).is_err());
        assert!(decode_departures(&json!(["a1"])).is_err());
        assert!(decode_departures(&json!([{"firstSeen": 1}])).is_err());
        assert!(decode_departures(&json!([{"icao24": "a1"}])).is_err());
        assert!(decode_departures(&json!([
            {"icao24": "a1", "firstSeen": 1, "estArrivalAirport": 5}
        ]))
        .is_err());
    }

    #[test]
    fn test_parse_bodies() {
        assert!(parse_states("{\"states\":null}").unwrap().is_empty());
        assert!(parse_departures("[]").unwrap().is_empty());
        assert!(matches!(
            parse_states("not json"),
            Err(PlanewatchError::InvalidInput(_))
        ));
    }
}
