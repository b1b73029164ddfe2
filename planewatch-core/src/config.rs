//! Configuration file management for planewatch.
//!
//! Reads/writes `~/.planewatch/config.yaml` with the airport, bounding box,
//! classifier thresholds, OpenSky settings, dashboard address, and extra
//! airline prefixes.

use std::path::{Path, PathBuf};

use crate::enrich::{AirlineTable, AIRLINE_PREFIX_LEN};
use crate::filter::{ClassifierConfig, HeadingBand, SpeedRange};
use crate::types::{BoundingBox, PlanewatchError};

pub const DEFAULT_BASE_URL: &str = "https://opensky-network.org/api";

/// Full configuration structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub airport: AirportConfig,
    pub bbox: BoundingBox,
    pub classifier: ClassifierConfig,
    pub opensky: OpenSkyConfig,
    pub dashboard: DashboardConfig,
    /// Extra `(prefix, airline)` pairs layered over the built-in table.
    pub airlines: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AirportConfig {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenSkyConfig {
    pub base_url: String,
    pub lookback_secs: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            airport: AirportConfig {
                code: "KDAL".into(),
                name: "Dallas Love Field".into(),
            },
            bbox: BoundingBox::around_dal(),
            classifier: ClassifierConfig::default(),
            opensky: OpenSkyConfig {
                base_url: DEFAULT_BASE_URL.into(),
                lookback_secs: 3600,
                timeout_secs: 20,
            },
            dashboard: DashboardConfig {
                host: "127.0.0.1".into(),
                port: 8080,
            },
            airlines: Vec::new(),
        }
    }
}

impl Config {
    /// Built-in airline table plus any configured extras.
    pub fn airline_table(&self) -> AirlineTable {
        AirlineTable::default().with_overrides(
            self.airlines
                .iter()
                .map(|(k, v)| (k.as_str(), v.clone())),
        )
    }
}

/// Get the config directory path (`~/.planewatch/`).
pub fn config_dir() -> PathBuf {
    dirs_home().join(".planewatch")
}

/// Get the config file path.
pub fn config_file() -> PathBuf {
    config_dir().join("config.yaml")
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// Load config from `~/.planewatch/config.yaml`.
///
/// Returns default config if file doesn't exist.
pub fn load_config() -> Config {
    load_config_from(&config_file())
}

/// Load config from an explicit path, falling back to defaults.
pub fn load_config_from(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_config(&text),
        Err(_) => Config::default(),
    }
}

/// Write config to `path`, creating parent directories.
pub fn save_config_to(path: &Path, config: &Config) -> Result<(), PlanewatchError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| PlanewatchError::Config(e.to_string()))?;
    }
    std::fs::write(path, serialize_config(config))
        .map_err(|e| PlanewatchError::Config(e.to_string()))
}

/// Parse simple YAML-like config text. Unknown keys and unparsable values
/// keep their defaults.
pub fn parse_config(text: &str) -> Config {
    let mut config = Config::default();
    let mut current_section: Option<String> = None;

    for line in text.lines() {
        let stripped = line.trim();
        if stripped.is_empty() || stripped.starts_with('#') {
            continue;
        }

        let is_indented = line.starts_with("  ") || line.starts_with('\t');

        let Some((key, val)) = stripped.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let val = val.trim();

        if !is_indented {
            current_section = val.is_empty().then(|| key.to_string());
            continue;
        }
        let Some(section) = current_section.as_deref() else {
            continue;
        };

        match (section, key) {
            ("airport", "code") => {
                if let Some(v) = parse_string_value(val) {
                    config.airport.code = v.to_ascii_uppercase();
                }
            }
            ("airport", "name") => {
                if let Some(v) = parse_string_value(val) {
                    config.airport.name = v;
                }
            }
            ("bbox", "lamin") => set_float(&mut config.bbox.lamin, val),
            ("bbox", "lamax") => set_float(&mut config.bbox.lamax, val),
            ("bbox", "lomin") => set_float(&mut config.bbox.lomin, val),
            ("bbox", "lomax") => set_float(&mut config.bbox.lomax, val),
            ("classifier", "airborne_ceiling_ft") => {
                if is_null(val) {
                    config.classifier.airborne_ceiling_ft = None;
                } else if let Some(v) = parse_float_value(val) {
                    config.classifier.airborne_ceiling_ft = Some(v);
                }
            }
            ("classifier", "airborne_heading") => {
                if let Ok(band) = HeadingBand::parse(val) {
                    config.classifier.airborne_heading = band;
                }
            }
            ("classifier", "ground_headings") => {
                let bands: Result<Vec<_>, _> = val.split(',').map(HeadingBand::parse).collect();
                if let Ok(bands) = bands {
                    config.classifier.ground_headings = bands;
                }
            }
            ("classifier", "ground_speed") => {
                if let Ok(range) = SpeedRange::parse(val) {
                    config.classifier.ground_speed = range;
                }
            }
            ("opensky", "base_url") => {
                if let Some(v) = parse_string_value(val) {
                    config.opensky.base_url = v.trim_end_matches('/').to_string();
                }
            }
            ("opensky", "lookback_secs") => {
                if let Ok(v) = val.parse() {
                    config.opensky.lookback_secs = v;
                }
            }
            ("opensky", "timeout_secs") => {
                if let Ok(v) = val.parse() {
                    config.opensky.timeout_secs = v;
                }
            }
            ("dashboard", "host") => {
                if let Some(v) = parse_string_value(val) {
                    config.dashboard.host = v;
                }
            }
            ("dashboard", "port") => {
                if let Ok(v) = val.parse() {
                    config.dashboard.port = v;
                }
            }
            ("airlines", prefix) => {
                let prefix = prefix.trim();
                if prefix.len() != AIRLINE_PREFIX_LEN
                    || !prefix.chars().all(|c| c.is_ascii_alphanumeric())
                {
                    continue;
                }
                if let Some(name) = parse_string_value(val) {
                    config
                        .airlines
                        .push((prefix.to_ascii_uppercase(), name));
                }
            }
            _ => {}
        }
    }

    config
}

fn is_null(val: &str) -> bool {
    val == "null" || val == "~" || val.is_empty()
}

fn parse_string_value(val: &str) -> Option<String> {
    if is_null(val) {
        return None;
    }
    // Strip quotes
    if val.len() >= 2
        && ((val.starts_with('"') && val.ends_with('"'))
            || (val.starts_with('\'') && val.ends_with('\'')))
    {
        return Some(val[1..val.len() - 1].to_string());
    }
    Some(val.to_string())
}

fn parse_float_value(val: &str) -> Option<f64> {
    if is_null(val) {
        return None;
    }
    val.parse().ok()
}

fn set_float(slot: &mut f64, val: &str) {
    if let Some(v) = parse_float_value(val) {
        *slot = v;
    }
}

/// Serialize config to YAML-like text.
pub fn serialize_config(config: &Config) -> String {
    let mut lines = vec!["# planewatch configuration".to_string(), String::new()];

    lines.push("airport:".into());
    lines.push(format!("  code: \"{}\"", config.airport.code));
    lines.push(format!("  name: \"{}\"", config.airport.name));
    lines.push(String::new());

    lines.push("bbox:".into());
    lines.push(format!("  lamin: {}", config.bbox.lamin));
    lines.push(format!("  lamax: {}", config.bbox.lamax));
    lines.push(format!("  lomin: {}", config.bbox.lomin));
    lines.push(format!("  lomax: {}", config.bbox.lomax));
    lines.push(String::new());

    let classifier = &config.classifier;
    lines.push("classifier:".into());
    match classifier.airborne_ceiling_ft {
        Some(v) => lines.push(format!("  airborne_ceiling_ft: {v}")),
        None => lines.push("  airborne_ceiling_ft: null".into()),
    }
    lines.push(format!("  airborne_heading: {}", classifier.airborne_heading));
    let bands: Vec<String> = classifier
        .ground_headings
        .iter()
        .map(|b| b.to_string())
        .collect();
    lines.push(format!("  ground_headings: {}", bands.join(", ")));
    lines.push(format!("  ground_speed: {}", classifier.ground_speed));
    lines.push(String::new());

    lines.push("opensky:".into());
    lines.push(format!("  base_url: \"{}\"", config.opensky.base_url));
    lines.push(format!("  lookback_secs: {}", config.opensky.lookback_secs));
    lines.push(format!("  timeout_secs: {}", config.opensky.timeout_secs));
    lines.push(String::new());

    lines.push("dashboard:".into());
    lines.push(format!("  host: \"{}\"", config.dashboard.host));
    lines.push(format!("  port: {}", config.dashboard.port));

    if !config.airlines.is_empty() {
        lines.push(String::new());
        lines.push("airlines:".into());
        for (prefix, name) in &config.airlines {
            lines.push(format!("  {prefix}: \"{name}\""));
        }
    }

    lines.join("\n") + "\n"
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
