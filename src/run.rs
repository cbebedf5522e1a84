//! One full sweep over the queue
//!
//! The run controller drives a single stateless pass: fetch the queue,
//! classify every item, remediate the flagged ones behind an isolating
//! per-item boundary, then wait out a cooldown and re-fetch to verify the
//! queue converged. The log stream is the system's only operational surface,
//! so every decision and outcome is traced here or in the layers below.

use crate::classifier::classify;
use crate::config::{Config, SweepConfig};
use crate::error::Result;
use crate::nzbget::NzbgetClient;
use crate::remediation::Remediator;
use crate::sonarr::SonarrClient;
use crate::types::{
    ItemOutcome, LingeringSample, QueueItem, RemediationOutcome, RunReport, SampleVerdict,
};

/// Drives one pass of sample detection and remediation
pub struct SweepRunner {
    sonarr: SonarrClient,
    nzbget: NzbgetClient,
    config: SweepConfig,
}

impl SweepRunner {
    /// Construct a runner, building both external-service clients
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] when a connection setting is invalid.
    pub fn new(config: Config) -> Result<Self> {
        let sonarr = SonarrClient::new(&config.sonarr, config.sweep.http_timeout)?;
        let nzbget = NzbgetClient::new(&config.nzbget, config.sweep.http_timeout)?;

        Ok(Self {
            sonarr,
            nzbget,
            config: config.sweep,
        })
    }

    /// Run one sweep: inspect, remediate, cool down, verify
    ///
    /// One item's failure never stops the pass; outcomes are collected in the
    /// returned [`RunReport`]. An empty `lingering` list is the run's success
    /// signal.
    ///
    /// # Errors
    ///
    /// Only a failed or structurally malformed queue fetch aborts the run; in
    /// that case zero items have been processed.
    pub async fn run(&self) -> Result<RunReport> {
        let queue = match self.sonarr.fetch_queue().await {
            Ok(queue) => queue,
            Err(e) => {
                tracing::error!(error = %e, "queue fetch failed, aborting run");
                return Err(e);
            }
        };

        let mut report = RunReport {
            inspected: queue.len(),
            ..RunReport::default()
        };
        let remediator = Remediator::new(&self.sonarr, &self.nzbget, &self.config);

        for item in &queue {
            let title = item.title.as_deref().unwrap_or("unknown");
            tracing::debug!(title, queue_id = ?item.id, "inspecting queue item");

            let SampleVerdict::Sample(evidence) = classify(item) else {
                continue;
            };
            report.flagged += 1;
            tracing::info!(title, %evidence, "sample detected");

            // Isolating boundary: an item's error is recorded, never raised
            let outcome = match remediator.remediate(item).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(title, error = %e, "remediation failed");
                    RemediationOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            report.outcomes.push(ItemOutcome {
                title: item.title.clone(),
                outcome,
            });
        }

        tracing::debug!(
            cooldown_secs = self.config.verify_cooldown.as_secs_f64(),
            "waiting for external systems to converge"
        );
        tokio::time::sleep(self.config.verify_cooldown).await;

        let queue = self.sonarr.fetch_queue().await?;
        for item in &queue {
            if classify(item).is_sample() {
                tracing::warn!(
                    title = item.title.as_deref().unwrap_or("unknown"),
                    download_id = item.download_id.as_deref().unwrap_or("unknown"),
                    "sample still present after cleanup"
                );
                report.lingering.push(LingeringSample {
                    title: item.title.clone(),
                    download_id: item.download_id.clone(),
                });
            }
        }

        log_queue_snapshot(queue.first());

        Ok(report)
    }
}

// Structure snapshot of the post-cooldown queue head, kept around because the
// queue schema has drifted between service versions before.
fn log_queue_snapshot(first: Option<&QueueItem>) {
    match first {
        Some(item) => match serde_json::to_string_pretty(item) {
            Ok(snapshot) => tracing::debug!(%snapshot, "first queue item after cleanup"),
            Err(e) => tracing::debug!(error = %e, "could not serialize queue snapshot"),
        },
        None => tracing::debug!("queue is empty after cleanup"),
    }
}
