//! Matching history entries to a flagged download
//!
//! Blocking a release needs the history entry it was grabbed from. The
//! selection itself is pure (and tested as such); only [`block_first_match`]
//! talks to the metadata manager.

use crate::error::{Error, Result};
use crate::sonarr::{BlockRequest, SonarrClient};
use crate::types::{BlockedRelease, EpisodeId, HistoryRecord};

/// Scope a series' history to the entries for one episode
#[must_use]
pub fn matching_history(history: &[HistoryRecord], episode_id: EpisodeId) -> Vec<&HistoryRecord> {
    history
        .iter()
        .filter(|record| record.episode_id == Some(episode_id))
        .collect()
}

/// Pick the history entry to block for a given queue title
///
/// Scans in input order and returns the first entry whose source title
/// contains the target title case-insensitively and that carries a guid.
/// Titles are not guaranteed unique; the first occurrence is treated as
/// authoritative.
#[must_use]
pub fn select_blockable<'a>(
    matches: &[&'a HistoryRecord],
    title: &str,
) -> Option<&'a HistoryRecord> {
    let needle = title.to_lowercase();
    matches.iter().copied().find(|record| {
        record.guid.is_some()
            && record
                .source_title
                .as_ref()
                .is_some_and(|source| source.to_lowercase().contains(&needle))
    })
}

/// Block the first qualifying history entry for a title
///
/// Returns evidence of the blocked release, or `Ok(None)` when no entry
/// qualifies; the caller falls back to cleaning up the download directly.
///
/// # Errors
///
/// Propagates transport failures from the blocking call, and
/// [`Error::MissingField`] when the selected entry lacks the indexer or
/// series id the block request needs.
pub async fn block_first_match(
    sonarr: &SonarrClient,
    matches: &[&HistoryRecord],
    title: &str,
) -> Result<Option<BlockedRelease>> {
    let Some(entry) = select_blockable(matches, title) else {
        return Ok(None);
    };

    let source_title = entry.source_title.clone().ok_or(Error::MissingField {
        record: "history record",
        field: "sourceTitle",
    })?;
    let guid = entry.guid.clone().ok_or(Error::MissingField {
        record: "history record",
        field: "guid",
    })?;
    let indexer_id = entry.indexer_id.ok_or(Error::MissingField {
        record: "history record",
        field: "indexerId",
    })?;
    let series_id = entry.series_id.ok_or(Error::MissingField {
        record: "history record",
        field: "seriesId",
    })?;

    let request = BlockRequest::unapproved(source_title.clone(), guid, indexer_id, series_id);
    sonarr.block_release(&request).await?;

    Ok(Some(BlockedRelease { source_title }))
}
