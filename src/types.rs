//! Core types for sample-sweep
//!
//! The external record types ([`QueueItem`], [`HistoryRecord`]) are lenient by
//! construction: every field the external services might omit is an `Option`
//! with a serde default, so a sparse record decodes instead of failing. Records
//! are read-only snapshots: nothing in this crate mutates them; all state
//! changes happen through adapter calls and are observed on the next fetch.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Unique identifier for an episode in the metadata manager
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpisodeId(pub i64);

impl From<i64> for EpisodeId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a series in the metadata manager
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesId(pub i64);

impl From<i64> for SeriesId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SeriesId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One group of status messages attached to a queue item
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusMessageGroup {
    /// Group heading, usually the file the messages refer to
    pub title: Option<String>,

    /// The individual status messages, in service order
    pub messages: Vec<String>,
}

/// A download tracked by the metadata manager's queue
///
/// Snapshot of an external record; exists only within one fetch and is never
/// persisted or mutated.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueItem {
    /// Queue entry id, used for queue-entry deletion
    pub id: Option<i64>,

    /// Release title; tolerated as absent when the service sends a non-string
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,

    /// The episode this download is for
    pub episode_id: Option<EpisodeId>,

    /// The series this download belongs to
    pub series_id: Option<SeriesId>,

    /// Download-client identifier for the download group
    pub download_id: Option<String>,

    /// On-disk location of the downloaded artifact
    pub output_path: Option<PathBuf>,

    /// Status messages reported by the service for this entry
    pub status_messages: Vec<StatusMessageGroup>,
}

/// A grab/import event from the metadata manager's history, scoped to a series
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HistoryRecord {
    /// Release title as it appeared on the indexer
    pub source_title: Option<String>,

    /// Release identifier; required for blocking
    pub guid: Option<String>,

    /// The indexer the release was grabbed from
    pub indexer_id: Option<i64>,

    /// The series the event belongs to
    pub series_id: Option<SeriesId>,

    /// The episode the event belongs to
    pub episode_id: Option<EpisodeId>,
}

/// Why a queue item was judged to be a sample
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SampleEvidence {
    /// A status message contained the sample marker; carries that message
    StatusMessage(String),

    /// The item title contained the sample marker; carries the title
    Title(String),
}

impl std::fmt::Display for SampleEvidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleEvidence::StatusMessage(msg) => write!(f, "status message {msg:?}"),
            SampleEvidence::Title(title) => write!(f, "title {title:?}"),
        }
    }
}

/// Classifier decision for one queue item
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SampleVerdict {
    /// The item is a sample; carries the evidence that decided it
    Sample(SampleEvidence),

    /// The item is a real download
    Clean,
}

impl SampleVerdict {
    /// Whether the item was judged a sample
    #[must_use]
    pub fn is_sample(&self) -> bool {
        matches!(self, SampleVerdict::Sample(_))
    }
}

/// Evidence of which release was blocked during remediation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockedRelease {
    /// The blocked release's title as it appeared in history
    pub source_title: String,
}

/// Result of remediating one flagged queue item
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RemediationOutcome {
    /// The offending release was blocked; no cleanup was needed
    Blocked(BlockedRelease),

    /// No release could be blocked; the download was cleaned up instead
    Cleaned,

    /// Remediation raised an error; the run continued with the next item
    Failed {
        /// The error that stopped remediation for this item
        reason: String,
    },
}

/// Per-item record in a [`RunReport`]
#[derive(Clone, Debug)]
pub struct ItemOutcome {
    /// The flagged item's title, when it had one
    pub title: Option<String>,

    /// What remediation achieved for the item
    pub outcome: RemediationOutcome,
}

/// A sample still present in the queue after the verification pass
#[derive(Clone, Debug)]
pub struct LingeringSample {
    /// The lingering item's title, when it had one
    pub title: Option<String>,

    /// The lingering item's download-client identifier, when it had one
    pub download_id: Option<String>,
}

/// Summary of one full sweep over the queue
#[derive(Clone, Debug, Default)]
pub struct RunReport {
    /// How many queue items the pass inspected
    pub inspected: usize,

    /// How many of them the classifier flagged
    pub flagged: usize,

    /// Remediation outcome per flagged item, in queue order
    pub outcomes: Vec<ItemOutcome>,

    /// Samples still flagged after the post-run cooldown and re-fetch
    pub lingering: Vec<LingeringSample>,
}

impl RunReport {
    /// Whether the verification pass found no lingering samples
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.lingering.is_empty()
    }
}

// Decodes any JSON value, keeping only strings. The queue endpoint has been
// observed returning non-string titles; those must read as "no title" rather
// than fail the whole record.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}
