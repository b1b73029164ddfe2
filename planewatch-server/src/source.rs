//! Flight data sources: OpenSky REST API or saved JSON responses.
//!
//! Both implement [`FlightSource`] so the CLI, the web handlers, and the
//! tests share one code path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use planewatch_core::opensky;
use planewatch_core::types::{AircraftState, BoundingBox, DepartureRecord, PlanewatchError};

/// Errors from fetching or decoding upstream data.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },
    #[error(transparent)]
    Decode(#[from] PlanewatchError),
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Supplies state vectors and departure records.
#[async_trait]
pub trait FlightSource: Send + Sync {
    /// Aircraft inside the bounding box.
    async fn states(&self, bbox: &BoundingBox) -> Result<Vec<AircraftState>, FetchError>;

    /// Flights that left `airport` between `begin` and `end` (epoch seconds).
    async fn departures(
        &self,
        airport: &str,
        begin: i64,
        end: i64,
    ) -> Result<Vec<DepartureRecord>, FetchError>;
}

// ---------------------------------------------------------------------------
// OpenSky HTTP client
// ---------------------------------------------------------------------------

const STATES_ENDPOINT: &str = "/states/all";
const DEPARTURES_ENDPOINT: &str = "/flights/departure";

/// OpenSky Network REST client. Anonymous unless credentials are given.
#[derive(Clone)]
pub struct OpenSkyClient {
    base_url: String,
    client: reqwest::Client,
    credentials: Option<(String, String)>,
}

impl OpenSkyClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        credentials: Option<(String, String)>,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("planewatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(OpenSkyClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            credentials,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    async fn get_json(
        &self,
        endpoint: &'static str,
        query: &[(&str, String)],
    ) -> Result<Value, FetchError> {
        let url = self.url(endpoint);
        debug!(%url, ?query, "GET");

        let mut request = self.client.get(&url).query(query);
        if let Some((user, pass)) = &self.credentials {
            request = request.basic_auth(user, Some(pass));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl FlightSource for OpenSkyClient {
    async fn states(&self, bbox: &BoundingBox) -> Result<Vec<AircraftState>, FetchError> {
        let query = [
            ("lamin", bbox.lamin.to_string()),
            ("lamax", bbox.lamax.to_string()),
            ("lomin", bbox.lomin.to_string()),
            ("lomax", bbox.lomax.to_string()),
        ];
        let body = self.get_json(STATES_ENDPOINT, &query).await?;
        Ok(opensky::decode_states(&body)?)
    }

    async fn departures(
        &self,
        airport: &str,
        begin: i64,
        end: i64,
    ) -> Result<Vec<DepartureRecord>, FetchError> {
        let query = [
            ("airport", airport.to_string()),
            ("begin", begin.to_string()),
            ("end", end.to_string()),
        ];
        let body = self.get_json(DEPARTURES_ENDPOINT, &query).await?;
        Ok(opensky::decode_departures(&body)?)
    }
}

// ---------------------------------------------------------------------------
// Saved responses
// ---------------------------------------------------------------------------

/// Replays saved `/states/all` and `/flights/departure` bodies verbatim.
///
/// The bounding box and time window are ignored; the files were captured
/// with their own. A missing departures file yields no departures.
#[derive(Debug, Clone)]
pub struct FileSource {
    states_path: PathBuf,
    departures_path: Option<PathBuf>,
}

impl FileSource {
    pub fn new(states_path: PathBuf, departures_path: Option<PathBuf>) -> Self {
        FileSource {
            states_path,
            departures_path,
        }
    }
}

async fn read_body(path: &Path) -> Result<String, FetchError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FetchError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[async_trait]
impl FlightSource for FileSource {
    async fn states(&self, _bbox: &BoundingBox) -> Result<Vec<AircraftState>, FetchError> {
        let body = read_body(&self.states_path).await?;
        Ok(opensky::parse_states(&body)?)
    }

    async fn departures(
        &self,
        _airport: &str,
        _begin: i64,
        _end: i64,
    ) -> Result<Vec<DepartureRecord>, FetchError> {
        match &self.departures_path {
            Some(path) => {
                let body = read_body(path).await?;
                Ok(opensky::parse_departures(&body)?)
            }
            None => Ok(Vec::new()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
