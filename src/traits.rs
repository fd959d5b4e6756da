//! Trait definitions for the external services the reconciler talks to.
//!
//! Production code uses [`MusicBrainzClient`] and [`LidarrClient`]; tests
//! substitute the in-memory fakes from `test_utils`.

use async_trait::async_trait;

use crate::catalog::MusicBrainzClient;
use crate::domain::{BarcodeQuery, LibraryApiError, ResolveError, ResolvedRelease};
use crate::library::{ArtistDefaults, LibraryAlbum, LibraryArtist, LidarrClient, NewAlbum};

/// Resolves a barcode to an exact catalog release.
#[async_trait]
pub trait ReleaseResolver: Send + Sync {
    async fn resolve(&self, barcode: &BarcodeQuery) -> Result<ResolvedRelease, ResolveError>;
}

/// The library manager operations the reconciler needs.
///
/// Each method is one request/response pair with no retry.
#[async_trait]
pub trait LibraryApi: Send + Sync {
    async fn list_artists(&self) -> Result<Vec<LibraryArtist>, LibraryApiError>;

    async fn get_artist(&self, id: i64) -> Result<LibraryArtist, LibraryApiError>;

    async fn create_artist(
        &self,
        name: &str,
        foreign_artist_id: &str,
        defaults: &ArtistDefaults,
    ) -> Result<LibraryArtist, LibraryApiError>;

    async fn list_albums(&self, artist_id: i64) -> Result<Vec<LibraryAlbum>, LibraryApiError>;

    async fn get_album(&self, id: i64) -> Result<LibraryAlbum, LibraryApiError>;

    async fn create_album(&self, album: &NewAlbum) -> Result<LibraryAlbum, LibraryApiError>;

    async fn update_album(
        &self,
        id: i64,
        album: &LibraryAlbum,
    ) -> Result<LibraryAlbum, LibraryApiError>;
}

#[async_trait]
impl ReleaseResolver for MusicBrainzClient {
    async fn resolve(&self, barcode: &BarcodeQuery) -> Result<ResolvedRelease, ResolveError> {
        self.resolve(barcode).await
    }
}

#[async_trait]
impl LibraryApi for LidarrClient {
    async fn list_artists(&self) -> Result<Vec<LibraryArtist>, LibraryApiError> {
        self.list_artists().await
    }

    async fn get_artist(&self, id: i64) -> Result<LibraryArtist, LibraryApiError> {
        self.get_artist(id).await
    }

    async fn create_artist(
        &self,
        name: &str,
        foreign_artist_id: &str,
        defaults: &ArtistDefaults,
    ) -> Result<LibraryArtist, LibraryApiError> {
        self.create_artist(name, foreign_artist_id, defaults).await
    }

    async fn list_albums(&self, artist_id: i64) -> Result<Vec<LibraryAlbum>, LibraryApiError> {
        self.list_albums(artist_id).await
    }

    async fn get_album(&self, id: i64) -> Result<LibraryAlbum, LibraryApiError> {
        self.get_album(id).await
    }

    async fn create_album(&self, album: &NewAlbum) -> Result<LibraryAlbum, LibraryApiError> {
        self.create_album(album).await
    }

    async fn update_album(
        &self,
        id: i64,
        album: &LibraryAlbum,
    ) -> Result<LibraryAlbum, LibraryApiError> {
        self.update_album(id, album).await
    }
}
