//! Remediation of a single flagged queue item
//!
//! One flagged item walks a small state machine: try to block the release it
//! came from; when nothing can be blocked, fall through to cleaning the
//! download out of the client, the queue and the disk; in every case, finish
//! by requesting a fresh search for the episode.
//!
//! Remediation is at-least-once with idempotent steps: every external call is
//! safe to repeat on the next run, and each cleaning step continues past the
//! failures of the ones before it. Errors that make an item unprocessable
//! (missing ids, a failed history fetch, a rejected block) propagate to the
//! run controller's per-item boundary.

use crate::config::SweepConfig;
use crate::error::{Error, Result};
use crate::history::{block_first_match, matching_history};
use crate::nzbget::NzbgetClient;
use crate::retry::call_with_retry;
use crate::sonarr::SonarrClient;
use crate::types::{QueueItem, RemediationOutcome, SeriesId};
use crate::utils::{RemovedArtifact, remove_path};

/// Runs the remediation state machine for flagged queue items
///
/// Borrows the adapters and sweep settings; each [`remediate`](Self::remediate)
/// invocation is self-contained given one queue item.
pub struct Remediator<'a> {
    sonarr: &'a SonarrClient,
    nzbget: &'a NzbgetClient,
    config: &'a SweepConfig,
}

impl<'a> Remediator<'a> {
    /// Create a remediator over the given adapters and settings
    pub fn new(sonarr: &'a SonarrClient, nzbget: &'a NzbgetClient, config: &'a SweepConfig) -> Self {
        Self {
            sonarr,
            nzbget,
            config,
        }
    }

    /// Remediate one flagged queue item
    ///
    /// Attempts to block the offending release first; blocking is sufficient
    /// on its own, so the blocked path performs no deletions (the artifact is
    /// deliberately left for the superseding import to replace). Only when no
    /// release can be blocked is the download cleaned up. Either way the final
    /// step requests a replacement search.
    ///
    /// # Errors
    ///
    /// Returns an error when the item lacks the ids remediation needs, when
    /// the history fetch or the blocking call fails, or when the final search
    /// request fails. The caller contains these at the item boundary.
    pub async fn remediate(&self, item: &QueueItem) -> Result<RemediationOutcome> {
        let episode_id = item.episode_id.ok_or(Error::MissingField {
            record: "queue item",
            field: "episodeId",
        })?;
        let series_id = item.series_id.ok_or(Error::MissingField {
            record: "queue item",
            field: "seriesId",
        })?;
        let title = item.title.as_deref().ok_or(Error::MissingField {
            record: "queue item",
            field: "title",
        })?;

        let history = self.sonarr.fetch_series_history(series_id).await?;
        let scoped = matching_history(&history, episode_id);
        tracing::debug!(
            series_id = %series_id,
            episode_id = %episode_id,
            candidates = scoped.len(),
            "scoped history to episode"
        );

        let outcome = match block_first_match(self.sonarr, &scoped, title).await? {
            Some(release) => {
                tracing::info!(
                    source_title = %release.source_title,
                    "blocked release, no cleanup needed"
                );
                RemediationOutcome::Blocked(release)
            }
            None => {
                tracing::info!(title, "no blockable history entry, cleaning up download");
                self.clean(item, series_id).await;
                RemediationOutcome::Cleaned
            }
        };

        self.sonarr.search_episode(episode_id).await?;
        tracing::info!(episode_id = %episode_id, "requested replacement search");

        Ok(outcome)
    }

    /// Run the cleaning sequence: cancel the download, drop the queue entry,
    /// delete the artifact, re-trigger discovery
    ///
    /// Each step logs its own failure and the sequence continues regardless;
    /// the next run picks up whatever is left.
    async fn clean(&self, item: &QueueItem, series_id: SeriesId) {
        match item.download_id.as_deref() {
            Some(download_id) => match self.nzbget.delete_download(download_id).await {
                Ok(()) => tracing::info!(download_id, "cancelled download in client"),
                Err(e) => {
                    tracing::warn!(download_id, error = %e, "failed to cancel download in client");
                }
            },
            None => tracing::warn!("queue item has no download id, skipping client cancel"),
        }

        match item.id {
            Some(queue_id) => self.delete_queue_entry(queue_id).await,
            None => tracing::warn!("queue item has no id, skipping queue entry removal"),
        }

        match item.output_path.as_deref() {
            Some(path) => match remove_path(path) {
                Ok(Some(RemovedArtifact::Directory)) => {
                    tracing::info!(path = %path.display(), "deleted sample directory");
                }
                Ok(Some(RemovedArtifact::File)) => {
                    tracing::info!(path = %path.display(), "deleted sample file");
                }
                Ok(None) => {
                    tracing::warn!(path = %path.display(), "output path does not exist");
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to delete output path");
                }
            },
            None => tracing::warn!("queue item has no output path"),
        }

        match self.sonarr.trigger_rss_sync().await {
            Ok(()) => tracing::info!("triggered RSS sync"),
            Err(e) => tracing::warn!(error = %e, "failed to trigger RSS sync"),
        }
        match self.sonarr.rescan_series(series_id).await {
            Ok(()) => tracing::info!(series_id = %series_id, "triggered series rescan"),
            Err(e) => {
                tracing::warn!(series_id = %series_id, error = %e, "failed to trigger series rescan");
            }
        }
    }

    /// Remove the queue entry, retrying until the service answers 200
    async fn delete_queue_entry(&self, queue_id: i64) {
        let policy = &self.config.queue_delete;
        let sonarr = self.sonarr;
        let result = call_with_retry(policy, || async move {
            let status = sonarr.delete_queue_item(queue_id).await?;
            if status == 200 {
                Ok(())
            } else {
                Err(Error::UnexpectedStatus {
                    status,
                    endpoint: format!("queue/{queue_id}"),
                })
            }
        })
        .await;

        match result {
            Ok(()) => tracing::info!(queue_id, "removed queue entry"),
            Err(e) => tracing::error!(
                queue_id,
                error = %e,
                attempts = policy.max_attempts,
                "giving up on queue entry removal"
            ),
        }
    }
}
