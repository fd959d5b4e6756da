//! Barcode reconciliation - converges the library manager onto one release.
//!
//! A run walks these states in order, stopping at the first failure:
//!
//! 1. **Resolving** - barcode to exact catalog release
//! 2. **Artist ensure** - reuse the artist by catalog ID, or create it
//! 3. **Album ensure** - reuse the album by release group (marking it
//!    monitored), or create it monitored with an immediate search
//! 4. **Release await** - poll until the manager lists the exact edition
//! 5. **Release monitor** - monitor that edition, demonitor its siblings
//!
//! Every step re-reads remote state before mutating it and skips writes that
//! would change nothing, so re-running a barcode against a converged library
//! performs no mutations. Nothing is rolled back on failure.
//!
//! # Usage
//!
//! ```ignore
//! let reconciler = Arc::new(Reconciler::from_config(&config)?);
//!
//! // Streaming: one task per barcode
//! let mut events = reconciler.spawn("602537350413");
//! while let Some(event) = events.next().await {
//!     println!("{:>3}% {}", event.progress, event.status);
//! }
//!
//! // Or just the result
//! let outcome = reconciler.reconcile("602537350413").await?;
//! ```

pub mod progress;
pub mod release;

use std::sync::Arc;

use tracing::{info, warn};

use crate::catalog::MusicBrainzClient;
use crate::config::Config;
use crate::domain::{
    BarcodeQuery, LibraryApiError, ReconcileOutcome, ResolveError, ResolvedRelease,
};
use crate::error::ResultExt;
use crate::library::{ArtistDefaults, LidarrClient, NewAlbum};
use crate::traits::{LibraryApi, ReleaseResolver};

pub use progress::{EVENT_BUFFER, EventKind, ProgressEvent, ProgressReporter, ProgressStream};
pub use release::PollPolicy;

/// Errors that end a reconciliation run
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Library(#[from] LibraryApiError),

    #[error("Exact release {release_id} not found in library after waiting {waited_secs}s")]
    ReleaseNotFound { release_id: String, waited_secs: u64 },

    /// The event consumer went away; never reported as an event
    #[error("Reconciliation cancelled")]
    Cancelled,
}

/// Settings for a reconciler, fixed for its lifetime
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconcileSettings {
    /// Applied to artists we create
    pub artist_defaults: ArtistDefaults,
    pub poll: PollPolicy,
}

/// Album found or created during the album step
struct EnsuredAlbum {
    id: i64,
    created: bool,
}

/// Drives the catalog and the library manager through one run per barcode.
///
/// Immutable and shareable: concurrent runs only share the remote manager.
pub struct Reconciler {
    resolver: Arc<dyn ReleaseResolver>,
    library: Arc<dyn LibraryApi>,
    settings: ReconcileSettings,
}

impl Reconciler {
    pub fn new(
        resolver: Arc<dyn ReleaseResolver>,
        library: Arc<dyn LibraryApi>,
        settings: ReconcileSettings,
    ) -> Self {
        Self {
            resolver,
            library,
            settings,
        }
    }

    /// Build a reconciler talking to the real MusicBrainz and Lidarr.
    pub fn from_config(config: &Config) -> crate::error::Result<Self> {
        let resolver = MusicBrainzClient::new(config.catalog.base_url.clone())
            .with_context("building MusicBrainz client")?;
        let library = LidarrClient::new(config.library.url.clone(), config.library.api_key.clone())
            .with_context("building Lidarr client")?;

        Ok(Self::new(
            Arc::new(resolver),
            Arc::new(library),
            ReconcileSettings {
                artist_defaults: config.defaults.clone(),
                poll: config.reconcile.poll_policy(),
            },
        ))
    }

    /// Run to completion without progress events.
    pub async fn reconcile(&self, barcode: &str) -> Result<ReconcileOutcome, ReconcileError> {
        self.run(barcode, &mut ProgressReporter::silent()).await
    }

    /// Start a run on its own task and return its event stream.
    ///
    /// Dropping the stream stops the run at its next step.
    pub fn spawn(self: &Arc<Self>, barcode: impl Into<String>) -> ProgressStream {
        let (reporter, stream) = ProgressReporter::channel(EVENT_BUFFER);
        let reconciler = Arc::clone(self);
        let barcode = barcode.into();
        tokio::spawn(async move {
            let _ = reconciler.run_reporting(&barcode, reporter).await;
        });
        stream
    }

    /// Run to completion, finishing with a terminal event on `reporter`.
    pub async fn run_reporting(
        &self,
        barcode: &str,
        mut reporter: ProgressReporter,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        match self.run(barcode, &mut reporter).await {
            Ok(outcome) => {
                reporter
                    .succeed(format!(
                        "Album '{}' now monitoring exact release!",
                        outcome.album
                    ))
                    .await;
                Ok(outcome)
            }
            Err(ReconcileError::Cancelled) => {
                info!("Barcode {} abandoned by its consumer", barcode.trim());
                Err(ReconcileError::Cancelled)
            }
            Err(e) => {
                warn!("Barcode {} failed: {}", barcode.trim(), e);
                reporter.fail(&e).await;
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        barcode: &str,
        reporter: &mut ProgressReporter,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        reporter.report(5, "Processing barcode...").await?;
        let barcode = BarcodeQuery::parse(barcode)?;
        let release = self.resolver.resolve(&barcode).await?;
        info!(
            "Barcode {} is release {} ('{}' by {}, group {})",
            barcode,
            release.release_id,
            release.title,
            release.artist_name,
            release.release_group_id
        );
        reporter
            .report(
                15,
                format!("Found release '{}' by {}", release.title, release.artist_name),
            )
            .await?;

        reporter
            .report(30, format!("Checking artist '{}'...", release.artist_name))
            .await?;
        let artist_id = self.ensure_artist(&release).await?;
        reporter
            .report(40, format!("Artist '{}' is in the library.", release.artist_name))
            .await?;

        let album = self.ensure_album(artist_id, &release).await?;
        let status = if album.created {
            format!("Album '{}' created in library.", release.title)
        } else {
            format!("Album '{}' already exists. Marked as monitored.", release.title)
        };
        reporter.report(60, status).await?;

        reporter
            .report(70, "Waiting for the library to list the exact release...")
            .await?;
        let mut fresh = release::await_release(
            self.library.as_ref(),
            album.id,
            &release.release_id,
            self.settings.poll,
            reporter,
        )
        .await?;

        reporter.report(90, "Monitoring exact release...").await?;
        let changed = release::monitor_exclusively(&mut fresh.releases, &release.release_id);
        if changed || !fresh.monitored {
            fresh.monitored = true;
            self.library.update_album(fresh.id, &fresh).await?;
            info!(
                "Album {} now monitors only release {}",
                fresh.id, release.release_id
            );
        } else {
            info!(
                "Album {} already monitors only release {}",
                fresh.id, release.release_id
            );
        }

        Ok(ReconcileOutcome {
            artist: release.artist_name,
            album: release.title,
            release_external_id: release.release_id,
            album_id: fresh.id,
        })
    }

    /// Find the artist by catalog ID, creating it with the configured defaults.
    async fn ensure_artist(&self, release: &ResolvedRelease) -> Result<i64, ReconcileError> {
        let artists = self.library.list_artists().await?;
        if let Some(artist) = artists
            .iter()
            .find(|a| a.foreign_artist_id == release.artist_external_id)
        {
            info!(
                "Artist '{}' already exists (id {})",
                artist.artist_name, artist.id
            );
            return Ok(artist.id);
        }

        let created = self
            .library
            .create_artist(
                &release.artist_name,
                &release.artist_external_id,
                &self.settings.artist_defaults,
            )
            .await?;
        info!("Artist '{}' created (id {})", created.artist_name, created.id);
        Ok(created.id)
    }

    /// Find the album by release group under the artist, creating it if absent.
    async fn ensure_album(
        &self,
        artist_id: i64,
        release: &ResolvedRelease,
    ) -> Result<EnsuredAlbum, ReconcileError> {
        let albums = self.library.list_albums(artist_id).await?;
        if let Some(existing) = albums
            .iter()
            .find(|a| a.foreign_album_id == release.release_group_id)
        {
            let mut album = self.library.get_album(existing.id).await?;
            if album.monitored {
                info!("Album '{}' already monitored (id {})", album.title, album.id);
            } else {
                album.monitored = true;
                self.library.update_album(album.id, &album).await?;
                info!("Album '{}' marked as monitored (id {})", album.title, album.id);
            }
            return Ok(EnsuredAlbum {
                id: album.id,
                created: false,
            });
        }

        let artist = self.library.get_artist(artist_id).await?;
        let created = self
            .library
            .create_album(&NewAlbum::monitored(artist, release))
            .await?;
        info!("Album '{}' created (id {})", created.title, created.id);
        Ok(EnsuredAlbum {
            id: created.id,
            created: true,
        })
    }
}
