//! Sample detection over queue items
//!
//! Pure decision logic: no side effects, no external calls, no log output.
//! The verdict carries its evidence so the caller owns how the decision is
//! reported.

use crate::types::{QueueItem, SampleEvidence, SampleVerdict};

/// Marker looked for in status messages and titles, matched case-insensitively
const SAMPLE_MARKER: &str = "sample";

/// Judge whether a queue item is a sample download
///
/// Scans every message in every status-message group for the marker; the
/// first matching message becomes the evidence. Falls back to the item title.
/// An item with no textual title and no matching messages is clean. Total
/// over any [`QueueItem`]: sparse records simply have nothing to match.
#[must_use]
pub fn classify(item: &QueueItem) -> SampleVerdict {
    for group in &item.status_messages {
        for message in &group.messages {
            if message.to_lowercase().contains(SAMPLE_MARKER) {
                return SampleVerdict::Sample(SampleEvidence::StatusMessage(message.clone()));
            }
        }
    }

    if let Some(title) = &item.title
        && title.to_lowercase().contains(SAMPLE_MARKER)
    {
        return SampleVerdict::Sample(SampleEvidence::Title(title.clone()));
    }

    SampleVerdict::Clean
}
