//! Test utilities and fixtures for codebarr tests.
//!
//! Provides an in-memory stand-in for the library manager and a scripted
//! catalog resolver, both implementing the client traits.
//!
//! # Example
//!
//! ```ignore
//! let library = FakeLibrary::new();
//! // Editions of g-456 show up on the third album fetch
//! library.register_release_group("g-456", &["r-000", "r-123"], 2);
//!
//! let resolver = ScriptedResolver::new().with_release(EXAMPLE_BARCODE, example_release());
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Map;

use crate::domain::{BarcodeQuery, LibraryApiError, ResolveError, ResolvedRelease};
use crate::library::{ArtistDefaults, LibraryAlbum, LibraryArtist, LibraryRelease, NewAlbum};
use crate::reconcile::PollPolicy;
use crate::traits::{LibraryApi, ReleaseResolver};

/// Barcode of the reference scenario
pub const EXAMPLE_BARCODE: &str = "602537350413";

/// The release [`EXAMPLE_BARCODE`] resolves to.
pub fn example_release() -> ResolvedRelease {
    ResolvedRelease {
        release_id: "r-123".to_string(),
        release_group_id: "g-456".to_string(),
        title: "Example Album".to_string(),
        artist_name: "Example Band".to_string(),
        artist_external_id: "a-789".to_string(),
    }
}

/// Poll policy short enough for tests (50 polls, 1ms apart).
pub fn fast_poll() -> PollPolicy {
    PollPolicy {
        interval: Duration::from_millis(1),
        budget: Duration::from_millis(50),
    }
}

// ============================================================================
// Scripted resolver
// ============================================================================

/// Resolver answering from a fixed table; unknown barcodes are not found.
#[derive(Default)]
pub struct ScriptedResolver {
    answers: HashMap<String, Result<ResolvedRelease, ResolveError>>,
}

impl ScriptedResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_release(mut self, barcode: &str, release: ResolvedRelease) -> Self {
        self.answers.insert(barcode.to_string(), Ok(release));
        self
    }

    pub fn with_error(mut self, barcode: &str, error: ResolveError) -> Self {
        self.answers.insert(barcode.to_string(), Err(error));
        self
    }
}

#[async_trait]
impl ReleaseResolver for ScriptedResolver {
    async fn resolve(&self, barcode: &BarcodeQuery) -> Result<ResolvedRelease, ResolveError> {
        self.answers
            .get(barcode.as_str())
            .cloned()
            .unwrap_or_else(|| {
                Err(ResolveError::NotFound {
                    barcode: barcode.to_string(),
                })
            })
    }
}

// ============================================================================
// Fake library manager
// ============================================================================

/// A request the fake library received
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryCall {
    ListArtists,
    GetArtist(i64),
    /// Catalog artist ID
    CreateArtist(String),
    ListAlbums(i64),
    GetAlbum(i64),
    /// Catalog release group ID
    CreateAlbum(String),
    UpdateAlbum(i64),
}

/// Editions the fake will eventually list for a release group
struct ReleaseGroupScript {
    release_ids: Vec<String>,
    /// Album fetches that still see an incomplete release list
    delay_polls: u32,
}

#[derive(Default)]
struct FakeState {
    next_id: i64,
    artists: Vec<LibraryArtist>,
    albums: Vec<LibraryAlbum>,
    groups: HashMap<String, ReleaseGroupScript>,
    /// album id -> fetches left before its editions appear
    pending: HashMap<i64, u32>,
    failing: Vec<&'static str>,
    calls: Vec<LibraryCall>,
}

impl FakeState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn check(&self, operation: &'static str) -> Result<(), LibraryApiError> {
        if self.failing.contains(&operation) {
            return Err(LibraryApiError::new(operation, Some(500), "injected failure"));
        }
        Ok(())
    }

    fn schedule(&mut self, album_id: i64, group_id: &str) {
        if let Some(script) = self.groups.get(group_id) {
            self.pending.insert(album_id, script.delay_polls);
        }
    }

    /// Count down a pending album, listing its editions once due.
    ///
    /// Like Lidarr, the first edition listed comes back monitored.
    fn tick(&mut self, album_id: i64) {
        let Some(remaining) = self.pending.get_mut(&album_id) else {
            return;
        };
        if *remaining > 0 {
            *remaining -= 1;
            return;
        }
        self.pending.remove(&album_id);

        let Some(album) = self.albums.iter_mut().find(|a| a.id == album_id) else {
            return;
        };
        let Some(script) = self.groups.get(&album.foreign_album_id) else {
            return;
        };
        let first_listing = album.releases.is_empty();
        for (index, release_id) in script.release_ids.iter().enumerate() {
            if album.release(release_id).is_none() {
                let mut release =
                    LibraryRelease::new(release_id.clone(), first_listing && index == 0);
                release.id = Some(1000 * album_id + index as i64);
                album.releases.push(release);
            }
        }
    }

    fn not_found(operation: &'static str, what: &str) -> LibraryApiError {
        LibraryApiError::new(operation, Some(404), format!("{what} not found"))
    }
}

/// In-memory library manager.
///
/// Clones share state, so a test can keep a handle while the reconciler
/// owns another.
#[derive(Clone, Default)]
pub struct FakeLibrary {
    state: Arc<Mutex<FakeState>>,
}

impl FakeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake library lock poisoned")
    }

    /// Editions the manager lists for `group_id` after `delay_polls` album fetches.
    pub fn register_release_group(&self, group_id: &str, release_ids: &[&str], delay_polls: u32) {
        self.lock().groups.insert(
            group_id.to_string(),
            ReleaseGroupScript {
                release_ids: release_ids.iter().map(|s| s.to_string()).collect(),
                delay_polls,
            },
        );
    }

    /// Start listing editions for a seeded album.
    pub fn schedule_population(&self, album_id: i64) {
        let mut state = self.lock();
        let group = state
            .albums
            .iter()
            .find(|a| a.id == album_id)
            .map(|a| a.foreign_album_id.clone());
        if let Some(group) = group {
            state.schedule(album_id, &group);
        }
    }

    /// Make every future call of `operation` fail with HTTP 500.
    pub fn fail_on(&self, operation: &'static str) {
        self.lock().failing.push(operation);
    }

    pub fn seed_artist(&self, foreign_artist_id: &str, name: &str) -> i64 {
        let mut state = self.lock();
        let id = state.next_id();
        state.artists.push(LibraryArtist {
            id,
            artist_name: name.to_string(),
            foreign_artist_id: foreign_artist_id.to_string(),
            monitored: false,
            extra: Map::new(),
        });
        id
    }

    pub fn seed_album(
        &self,
        artist_id: i64,
        group_id: &str,
        title: &str,
        monitored: bool,
        releases: &[(&str, bool)],
    ) -> i64 {
        let mut state = self.lock();
        let id = state.next_id();
        state.albums.push(LibraryAlbum {
            id,
            artist_id,
            foreign_album_id: group_id.to_string(),
            title: title.to_string(),
            monitored,
            releases: releases
                .iter()
                .map(|(release_id, monitored)| LibraryRelease::new(*release_id, *monitored))
                .collect(),
            extra: Map::new(),
        });
        id
    }

    pub fn artists(&self) -> Vec<LibraryArtist> {
        self.lock().artists.clone()
    }

    pub fn album_by_group(&self, group_id: &str) -> Option<LibraryAlbum> {
        self.lock()
            .albums
            .iter()
            .find(|a| a.foreign_album_id == group_id)
            .cloned()
    }

    pub fn calls(&self) -> Vec<LibraryCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }
}

#[async_trait]
impl LibraryApi for FakeLibrary {
    async fn list_artists(&self) -> Result<Vec<LibraryArtist>, LibraryApiError> {
        let mut state = self.lock();
        state.calls.push(LibraryCall::ListArtists);
        state.check("list artists")?;
        Ok(state.artists.clone())
    }

    async fn get_artist(&self, id: i64) -> Result<LibraryArtist, LibraryApiError> {
        let mut state = self.lock();
        state.calls.push(LibraryCall::GetArtist(id));
        state.check("get artist")?;
        state
            .artists
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| FakeState::not_found("get artist", "artist"))
    }

    async fn create_artist(
        &self,
        name: &str,
        foreign_artist_id: &str,
        defaults: &ArtistDefaults,
    ) -> Result<LibraryArtist, LibraryApiError> {
        let mut state = self.lock();
        state
            .calls
            .push(LibraryCall::CreateArtist(foreign_artist_id.to_string()));
        state.check("create artist")?;
        if state
            .artists
            .iter()
            .any(|a| a.foreign_artist_id == foreign_artist_id)
        {
            return Err(LibraryApiError::new(
                "create artist",
                Some(400),
                "This artist has already been added",
            ));
        }

        let mut extra = Map::new();
        extra.insert("rootFolderPath".into(), defaults.root_folder_path.clone().into());
        extra.insert("qualityProfileId".into(), defaults.quality_profile_id.into());
        extra.insert("metadataProfileId".into(), defaults.metadata_profile_id.into());
        let artist = LibraryArtist {
            id: state.next_id(),
            artist_name: name.to_string(),
            foreign_artist_id: foreign_artist_id.to_string(),
            monitored: defaults.monitored,
            extra,
        };
        state.artists.push(artist.clone());
        Ok(artist)
    }

    async fn list_albums(&self, artist_id: i64) -> Result<Vec<LibraryAlbum>, LibraryApiError> {
        let mut state = self.lock();
        state.calls.push(LibraryCall::ListAlbums(artist_id));
        state.check("list albums")?;
        Ok(state
            .albums
            .iter()
            .filter(|a| a.artist_id == artist_id)
            .cloned()
            .collect())
    }

    async fn get_album(&self, id: i64) -> Result<LibraryAlbum, LibraryApiError> {
        let mut state = self.lock();
        state.calls.push(LibraryCall::GetAlbum(id));
        state.check("get album")?;
        state.tick(id);
        state
            .albums
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or_else(|| FakeState::not_found("get album", "album"))
    }

    async fn create_album(&self, album: &NewAlbum) -> Result<LibraryAlbum, LibraryApiError> {
        let mut state = self.lock();
        state
            .calls
            .push(LibraryCall::CreateAlbum(album.foreign_album_id.clone()));
        state.check("create album")?;
        if !state.artists.iter().any(|a| a.id == album.artist_id) {
            return Err(FakeState::not_found("create album", "artist"));
        }

        let created = LibraryAlbum {
            id: state.next_id(),
            artist_id: album.artist_id,
            foreign_album_id: album.foreign_album_id.clone(),
            title: album.title.clone(),
            monitored: album.monitored,
            releases: Vec::new(),
            extra: Map::new(),
        };
        state.albums.push(created.clone());
        state.schedule(created.id, &album.foreign_album_id);
        Ok(created)
    }

    async fn update_album(
        &self,
        id: i64,
        album: &LibraryAlbum,
    ) -> Result<LibraryAlbum, LibraryApiError> {
        let mut state = self.lock();
        state.calls.push(LibraryCall::UpdateAlbum(id));
        state.check("update album")?;
        let stored = state
            .albums
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| FakeState::not_found("update album", "album"))?;
        stored.monitored = album.monitored;
        stored.releases = album.releases.clone();
        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_created_album_lists_editions_after_delay() {
        let library = FakeLibrary::new();
        library.register_release_group("g-1", &["r-1", "r-2"], 1);
        let artist_id = library.seed_artist("a-1", "Artist");
        let artist = library.get_artist(artist_id).await.unwrap();

        let album = library
            .create_album(&NewAlbum::monitored(
                artist,
                &ResolvedRelease {
                    release_group_id: "g-1".to_string(),
                    ..example_release()
                },
            ))
            .await
            .unwrap();

        assert!(library.get_album(album.id).await.unwrap().releases.is_empty());
        let listed = library.get_album(album.id).await.unwrap();
        assert_eq!(listed.releases.len(), 2);
        assert!(listed.releases[0].monitored);
        assert!(!listed.releases[1].monitored);
    }

    #[tokio::test]
    async fn test_duplicate_artist_rejected() {
        let library = FakeLibrary::new();
        library.seed_artist("a-1", "Artist");
        let err = library
            .create_artist("Artist", "a-1", &ArtistDefaults::default())
            .await
            .unwrap_err();
        assert_eq!(err.status_code, Some(400));
    }

    #[tokio::test]
    async fn test_scripted_resolver_errors() {
        let resolver = ScriptedResolver::new()
            .with_error("1", ResolveError::resolution(Some(503), "HTTP 503: unavailable"));
        let err = resolver
            .resolve(&BarcodeQuery::parse("1").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Resolution { status: Some(503), .. }));
    }
}
