//! # sample-sweep
//!
//! Detection and cleanup of "sample" downloads in a Sonarr-managed queue.
//!
//! Releases sometimes bundle a short preview file, and when the download
//! client grabs one instead of the real episode it sits in the queue forever.
//! A sweep finds those items, blocks the offending release so it is not
//! grabbed again, cancels the download in NZBGet, deletes the on-disk
//! artifact and asks Sonarr to search for a proper replacement.
//!
//! ## Design Philosophy
//!
//! - **Stateless** - every run re-derives its decisions from the live queue;
//!   nothing is persisted between runs
//! - **At-least-once** - remediation steps are idempotent and individually
//!   best-effort; a half-finished cleanup is completed by the next run
//! - **Library-first** - no CLI or daemon loop; scheduling belongs to the
//!   embedding application (cron, a systemd timer, a tokio interval)
//! - **Log-driven** - the `tracing` stream is the only operational surface,
//!   so every decision and external-call outcome is traced
//!
//! ## Quick Start
//!
//! ```no_run
//! use sample_sweep::{Config, run_once};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!
//!     let report = run_once(config).await?;
//!     if !report.is_clean() {
//!         eprintln!("{} sample(s) still present in the queue", report.lingering.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Sample detection over queue items
pub mod classifier;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Matching history entries to a flagged download
pub mod history;
/// JSON-RPC client for the download client
pub mod nzbget;
/// Remediation of a single flagged queue item
pub mod remediation;
/// Retry logic with fixed-delay spacing
pub mod retry;
/// One full sweep over the queue
pub mod run;
/// Typed client for the metadata manager's REST API
pub mod sonarr;
/// Core types
pub mod types;
/// On-disk artifact removal
pub mod utils;

// Re-export commonly used types
pub use classifier::classify;
pub use config::{Config, NzbgetConfig, RetryConfig, SonarrConfig, SweepConfig};
pub use error::{Error, Result};
pub use nzbget::NzbgetClient;
pub use remediation::Remediator;
pub use run::SweepRunner;
pub use sonarr::{BlockRequest, SonarrClient};
pub use types::{
    BlockedRelease, EpisodeId, HistoryRecord, ItemOutcome, LingeringSample, QueueItem,
    RemediationOutcome, RunReport, SampleEvidence, SampleVerdict, SeriesId, StatusMessageGroup,
};

/// Helper function to run a single sweep with the given configuration.
///
/// Builds the external-service clients, drives one full pass and returns its
/// report. Equivalent to constructing a [`SweepRunner`] by hand; kept for the
/// common embed-in-a-scheduler case.
///
/// # Errors
///
/// Returns [`Error::Config`] for invalid connection settings, or the error
/// that aborted the run (only a failed or malformed queue fetch does).
pub async fn run_once(config: Config) -> Result<RunReport> {
    SweepRunner::new(config)?.run().await
}
