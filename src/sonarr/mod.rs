//! Typed client for the metadata manager's REST API
//!
//! Thin request/response wrappers over the handful of Sonarr v3 endpoints a
//! sweep needs: `command`, `queue`, `history` and `release`. Recovery policy
//! lives with the callers; this module only translates transport and shape
//! failures into the crate's error taxonomy.

use crate::config::SonarrConfig;
use crate::error::{Error, Result};
use crate::types::{EpisodeId, HistoryRecord, QueueItem, SeriesId};
use serde::Serialize;
use serde_json::{Value, json};

/// Header carrying the API key on every request
const API_KEY_HEADER: &str = "X-Api-Key";

/// A release to be marked unapproved so automated search skips it
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRequest {
    /// Release title as recorded in history
    pub title: String,

    /// Release identifier from the indexer
    pub guid: String,

    /// The indexer the release came from
    pub indexer_id: i64,

    /// The series the release belongs to
    pub series_id: SeriesId,

    /// Always `false`; the whole point of the request
    pub approved: bool,
}

impl BlockRequest {
    /// Build an unapproval request for a release
    pub fn unapproved(title: String, guid: String, indexer_id: i64, series_id: SeriesId) -> Self {
        Self {
            title,
            guid,
            indexer_id,
            series_id,
            approved: false,
        }
    }
}

/// Client for the metadata manager's versioned REST API
#[derive(Clone, Debug)]
pub struct SonarrClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SonarrClient {
    /// Create a new client from connection settings
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the base URL is absent or unparseable
    /// or the API key is empty, and [`Error::Network`] if the underlying HTTP
    /// client cannot be constructed.
    pub fn new(config: &SonarrConfig, timeout: std::time::Duration) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::config("base URL must not be empty", "sonarr.base_url"));
        }
        url::Url::parse(&base_url).map_err(|e| {
            Error::config(format!("invalid base URL: {e}"), "sonarr.base_url")
        })?;
        if config.api_key.is_empty() {
            return Err(Error::config("API key must not be empty", "sonarr.api_key"));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("sample-sweep/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Request an RSS sync so the service re-evaluates available releases
    pub async fn trigger_rss_sync(&self) -> Result<()> {
        self.post_command(json!({ "name": "RssSync" })).await
    }

    /// Request a fresh search for a replacement download of an episode
    pub async fn search_episode(&self, episode_id: EpisodeId) -> Result<()> {
        self.post_command(json!({
            "name": "EpisodeSearch",
            "episodeIds": [episode_id],
        }))
        .await
    }

    /// Request a disk rescan for a series
    pub async fn rescan_series(&self, series_id: SeriesId) -> Result<()> {
        self.post_command(json!({
            "name": "RescanSeries",
            "seriesId": series_id,
        }))
        .await
    }

    /// Fetch the current queue snapshot, in service order
    ///
    /// Records that fail to decode are logged and skipped; they can never be
    /// matched or remediated, only observed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedQueue`] when the payload is not an object
    /// holding a `records` array; the caller treats that as fatal to the
    /// whole run.
    pub async fn fetch_queue(&self) -> Result<Vec<QueueItem>> {
        let endpoint = format!("{}/queue", self.base_url);
        let body = self.get_json(&endpoint, &[]).await?;

        let Some(object) = body.as_object() else {
            return Err(Error::MalformedQueue(format!(
                "payload is {}, expected an object with records",
                json_type_name(&body)
            )));
        };
        let records = match object.get("records") {
            None => return Ok(Vec::new()),
            Some(Value::Array(records)) => records,
            Some(other) => {
                return Err(Error::MalformedQueue(format!(
                    "records is {}, expected an array",
                    json_type_name(other)
                )));
            }
        };

        Ok(decode_records(records, "queue"))
    }

    /// Fetch all history entries for a series
    ///
    /// Order is whatever the service returns; callers must not rely on it.
    pub async fn fetch_series_history(&self, series_id: SeriesId) -> Result<Vec<HistoryRecord>> {
        let endpoint = format!("{}/history", self.base_url);
        let body = self
            .get_json(&endpoint, &[("seriesId", series_id.to_string())])
            .await?;

        let records = match body.get("records") {
            None => return Ok(Vec::new()),
            Some(Value::Array(records)) => records,
            Some(other) => {
                return Err(Error::UnexpectedShape(format!(
                    "history records is {}, expected an array",
                    json_type_name(other)
                )));
            }
        };

        Ok(decode_records(records, "history"))
    }

    /// Mark a release unapproved so it will not be auto-grabbed again
    pub async fn block_release(&self, release: &BlockRequest) -> Result<()> {
        let endpoint = format!("{}/release", self.base_url);
        let response = self
            .http
            .post(&endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(release)
            .send()
            .await?;

        ensure_success(response.status(), endpoint)
    }

    /// Request removal of a queue entry, returning the raw status code
    ///
    /// Unlike the other operations this reports any HTTP answer as `Ok`; the
    /// caller's retry policy decides what counts as success (200).
    pub async fn delete_queue_item(&self, queue_id: i64) -> Result<u16> {
        let endpoint = format!("{}/queue/{}", self.base_url, queue_id);
        let response = self
            .http
            .delete(&endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        Ok(response.status().as_u16())
    }

    async fn post_command(&self, payload: Value) -> Result<()> {
        let endpoint = format!("{}/command", self.base_url);
        let response = self
            .http
            .post(&endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send()
            .await?;

        ensure_success(response.status(), endpoint)
    }

    async fn get_json(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Value> {
        let response = self
            .http
            .get(endpoint)
            .query(query)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        Ok(response.json().await?)
    }
}

fn ensure_success(status: reqwest::StatusCode, endpoint: String) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(Error::UnexpectedStatus {
            status: status.as_u16(),
            endpoint,
        })
    }
}

// Lenient per-record decoding: a record the service mangled is an anomaly to
// observe, not a reason to lose the rest of the snapshot.
fn decode_records<T: serde::de::DeserializeOwned>(records: &[Value], kind: &str) -> Vec<T> {
    records
        .iter()
        .filter_map(|record| match serde_json::from_value(record.clone()) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                tracing::warn!(kind, error = %e, record = %record, "skipping malformed record");
                None
            }
        })
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
