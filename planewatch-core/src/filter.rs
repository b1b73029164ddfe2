//! Departure filters: pick likely departures out of a raw state list.
//!
//! Two rules, evaluated against opposite `on_ground` values, so an aircraft
//! matches at most one. Unknown heading, altitude, or velocity never
//! satisfies a rule.

use serde::Serialize;

use crate::types::{AircraftState, Category, ClassifiedAircraft, PlanewatchError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const AIRBORNE_CEILING_FT: f64 = 3000.0;
const AIRBORNE_HEADING: HeadingBand = HeadingBand::new(210.0, 240.0);
const GROUND_HEADINGS: [HeadingBand; 2] = [
    HeadingBand::new(120.0, 140.0), // runway 13
    HeadingBand::new(300.0, 320.0), // runway 31
];
const GROUND_SPEED: SpeedRange = SpeedRange::new(2.0, 40.0);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Inclusive heading interval in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeadingBand {
    pub min: f64,
    pub max: f64,
}

impl HeadingBand {
    pub const fn new(min: f64, max: f64) -> Self {
        HeadingBand { min, max }
    }

    pub fn contains(&self, heading: f64) -> bool {
        self.min <= heading && heading <= self.max
    }

    /// Parse `min-max`, e.g. `210-240`.
    pub fn parse(text: &str) -> Result<Self> {
        let (min, max) = parse_range(text)?;
        if !(0.0..=360.0).contains(&min) || !(0.0..=360.0).contains(&max) {
            return Err(PlanewatchError::InvalidInput(format!(
                "heading band outside 0-360: {text:?}"
            )));
        }
        Ok(HeadingBand::new(min, max))
    }
}

impl std::fmt::Display for HeadingBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Exclusive ground speed interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedRange {
    pub min: f64,
    pub max: f64,
}

impl SpeedRange {
    pub const fn new(min: f64, max: f64) -> Self {
        SpeedRange { min, max }
    }

    pub fn contains(&self, speed: f64) -> bool {
        self.min < speed && speed < self.max
    }

    pub fn parse(text: &str) -> Result<Self> {
        let (min, max) = parse_range(text)?;
        Ok(SpeedRange::new(min, max))
    }
}

impl std::fmt::Display for SpeedRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

fn parse_range(text: &str) -> Result<(f64, f64)> {
    let bad = || PlanewatchError::InvalidInput(format!("expected `min-max`, got {text:?}"));
    let (lo, hi) = text.trim().split_once('-').ok_or_else(bad)?;
    let lo: f64 = lo.trim().parse().map_err(|_| bad())?;
    let hi: f64 = hi.trim().parse().map_err(|_| bad())?;
    if lo > hi {
        return Err(bad());
    }
    Ok((lo, hi))
}

/// Thresholds for both rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierConfig {
    /// Altitude must be strictly below this. `None` drops the ceiling check.
    pub airborne_ceiling_ft: Option<f64>,
    pub airborne_heading: HeadingBand,
    pub ground_headings: Vec<HeadingBand>,
    pub ground_speed: SpeedRange,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            airborne_ceiling_ft: Some(AIRBORNE_CEILING_FT),
            airborne_heading: AIRBORNE_HEADING,
            ground_headings: GROUND_HEADINGS.to_vec(),
            ground_speed: GROUND_SPEED,
        }
    }
}

// ---------------------------------------------------------------------------
// State filter
// ---------------------------------------------------------------------------

/// Classifies raw state vectors. Holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct StateFilter {
    pub config: ClassifierConfig,
}

impl StateFilter {
    pub fn new(config: ClassifierConfig) -> Self {
        StateFilter { config }
    }

    /// All airborne matches in input order, then all ground matches in
    /// input order. Aircraft matching neither rule are dropped.
    pub fn classify(&self, states: &[AircraftState]) -> Vec<ClassifiedAircraft> {
        let airborne = states
            .iter()
            .filter(|ac| self.is_airborne_departure(ac))
            .map(|ac| ClassifiedAircraft {
                state: ac.clone(),
                category: Category::AirborneSouthwestDeparture,
            });
        let ground = states
            .iter()
            .filter(|ac| self.is_ready_for_takeoff(ac))
            .map(|ac| ClassifiedAircraft {
                state: ac.clone(),
                category: Category::GroundReadyForTakeoff,
            });
        airborne.chain(ground).collect()
    }

    fn is_airborne_departure(&self, ac: &AircraftState) -> bool {
        if ac.on_ground {
            return false;
        }
        let Some(alt) = ac.baro_altitude else {
            return false;
        };
        let below_ceiling = self
            .config
            .airborne_ceiling_ft
            .map_or(true, |ceiling| alt < ceiling);
        below_ceiling
            && ac
                .heading
                .is_some_and(|h| self.config.airborne_heading.contains(h))
    }

    fn is_ready_for_takeoff(&self, ac: &AircraftState) -> bool {
        if !ac.on_ground {
            return false;
        }
        let aligned = ac.heading.is_some_and(|h| {
            self.config
                .ground_headings
                .iter()
                .any(|band| band.contains(h))
        });
        aligned
            && ac
                .velocity
                .is_some_and(|v| self.config.ground_speed.contains(v))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
