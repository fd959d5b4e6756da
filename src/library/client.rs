//! Lidarr HTTP client
//!
//! Authenticates every request with the static `X-Api-Key` header.
//! Non-2xx responses become [`LibraryApiError`] with the operation name,
//! status and (truncated) body preserved.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::model::{
    ArtistDefaults, LibraryAlbum, LibraryArtist, MetadataProfile, NewAlbum, NewArtist,
    QualityProfile, RootFolder,
};
use crate::domain::LibraryApiError;

const API_KEY_HEADER: &str = "X-Api-Key";

/// Longest error body we keep
const MAX_ERROR_BODY: usize = 500;

/// Lidarr API client
pub struct LidarrClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl LidarrClient {
    /// Create a client for the manager at `base_url` (e.g. `http://localhost:8686`).
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub async fn list_artists(&self) -> Result<Vec<LibraryArtist>, LibraryApiError> {
        self.get("list artists", "artist").await
    }

    pub async fn get_artist(&self, id: i64) -> Result<LibraryArtist, LibraryApiError> {
        self.get("get artist", &format!("artist/{id}")).await
    }

    pub async fn create_artist(
        &self,
        name: &str,
        foreign_artist_id: &str,
        defaults: &ArtistDefaults,
    ) -> Result<LibraryArtist, LibraryApiError> {
        let body = NewArtist::new(name, foreign_artist_id, defaults);
        self.send_json("create artist", Method::POST, "artist", &body).await
    }

    pub async fn list_albums(&self, artist_id: i64) -> Result<Vec<LibraryAlbum>, LibraryApiError> {
        self.get("list albums", &format!("album?artistId={artist_id}")).await
    }

    pub async fn get_album(&self, id: i64) -> Result<LibraryAlbum, LibraryApiError> {
        self.get("get album", &format!("album/{id}")).await
    }

    pub async fn create_album(&self, album: &NewAlbum) -> Result<LibraryAlbum, LibraryApiError> {
        self.send_json("create album", Method::POST, "album", album).await
    }

    pub async fn update_album(
        &self,
        id: i64,
        album: &LibraryAlbum,
    ) -> Result<LibraryAlbum, LibraryApiError> {
        self.send_json("update album", Method::PUT, &format!("album/{id}"), album).await
    }

    pub async fn list_root_folders(&self) -> Result<Vec<RootFolder>, LibraryApiError> {
        self.get("list root folders", "rootfolder").await
    }

    pub async fn list_quality_profiles(&self) -> Result<Vec<QualityProfile>, LibraryApiError> {
        self.get("list quality profiles", "qualityprofile").await
    }

    pub async fn list_metadata_profiles(&self) -> Result<Vec<MetadataProfile>, LibraryApiError> {
        self.get("list metadata profiles", "metadataprofile").await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
    ) -> Result<T, LibraryApiError> {
        let request = self.http_client.get(self.url(path));
        self.execute(operation, request).await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, LibraryApiError> {
        let request = self.http_client.request(method, self.url(path)).json(body);
        self.execute(operation, request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, LibraryApiError> {
        tracing::debug!("Lidarr {}", operation);

        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| LibraryApiError::new(operation, None, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LibraryApiError::new(
                operation,
                Some(status.as_u16()),
                body.chars().take(MAX_ERROR_BODY).collect::<String>(),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| LibraryApiError::new(operation, None, format!("invalid response: {e}")))
    }
}
