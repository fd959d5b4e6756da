//! Waiting for and selecting the exact release inside an album.
//!
//! After an album is added or re-monitored, Lidarr fetches its editions in
//! the background. We poll the album until the target edition shows up,
//! then monitor that edition and demonitor every sibling in one update.

use std::time::Duration;

use tracing::debug;

use super::{ProgressReporter, ReconcileError};
use crate::library::{LibraryAlbum, LibraryRelease};
use crate::traits::LibraryApi;

/// Bounds for the release-list poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Wait between two fetches
    pub interval: Duration,
    /// Total time we are willing to sleep
    pub budget: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            budget: Duration::from_secs(60),
        }
    }
}

/// Poll an album until it lists `release_id`, returning the fresh album.
///
/// Fetches at least once and never sleeps past the budget. Stops early with
/// [`ReconcileError::Cancelled`] when the reporter's consumer is gone.
pub async fn await_release(
    library: &dyn LibraryApi,
    album_id: i64,
    release_id: &str,
    policy: PollPolicy,
    reporter: &ProgressReporter,
) -> Result<LibraryAlbum, ReconcileError> {
    let mut elapsed = Duration::ZERO;
    let mut attempt = 0u32;

    loop {
        if reporter.is_cancelled() {
            return Err(ReconcileError::Cancelled);
        }

        attempt += 1;
        let album = library.get_album(album_id).await?;
        if album.release(release_id).is_some() {
            debug!(
                "Release {} listed in album {} after {} poll(s)",
                release_id, album_id, attempt
            );
            return Ok(album);
        }

        debug!(
            "Release {} not yet listed in album {} ({} editions known, attempt {})",
            release_id,
            album_id,
            album.releases.len(),
            attempt
        );

        if elapsed + policy.interval > policy.budget {
            break;
        }
        tokio::time::sleep(policy.interval).await;
        elapsed += policy.interval;
    }

    Err(ReconcileError::ReleaseNotFound {
        release_id: release_id.to_string(),
        waited_secs: elapsed.as_secs(),
    })
}

/// Monitor exactly the release matching `release_id`, demonitor the rest.
///
/// Returns true if any flag changed.
pub fn monitor_exclusively(releases: &mut [LibraryRelease], release_id: &str) -> bool {
    let mut changed = false;
    for release in releases.iter_mut() {
        let wanted = release.foreign_release_id == release_id;
        if release.monitored != wanted {
            release.monitored = wanted;
            changed = true;
        }
    }
    changed
}

pub fn monitored_count(releases: &[LibraryRelease]) -> usize {
    releases.iter().filter(|r| r.monitored).count()
}
