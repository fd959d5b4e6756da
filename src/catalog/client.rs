//! MusicBrainz HTTP client
//!
//! Handles communication with the MusicBrainz web service.
//! See: https://musicbrainz.org/doc/MusicBrainz_API
//!
//! IMPORTANT: MusicBrainz requires a User-Agent header and rate limits to
//! 1 req/sec. One barcode costs one request, so we don't throttle here.

use super::{adapter, dto};
use crate::domain::{BarcodeQuery, ResolveError, ResolvedRelease};

/// Public MusicBrainz web service root
pub const DEFAULT_BASE_URL: &str = "https://musicbrainz.org/ws/2";

/// User agent string - MusicBrainz requires this
const USER_AGENT: &str = concat!(
    "Codebarr/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/codebarr/codebarr)"
);

/// MusicBrainz API client
pub struct MusicBrainzClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl MusicBrainzClient {
    /// Create a client against the given web service root.
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a barcode to the exact release it belongs to.
    pub async fn resolve(&self, barcode: &BarcodeQuery) -> Result<ResolvedRelease, ResolveError> {
        let response = self.send_search_request(barcode).await?;
        adapter::to_resolved_release(barcode, response)
    }

    fn search_url(&self, barcode: &BarcodeQuery) -> String {
        format!(
            "{}/release/?query=barcode:{}&fmt=json",
            self.base_url,
            urlencoding::encode(barcode.as_str())
        )
    }

    /// Send the HTTP request and parse the response
    async fn send_search_request(
        &self,
        barcode: &BarcodeQuery,
    ) -> Result<dto::ReleaseSearchResponse, ResolveError> {
        let url = self.search_url(barcode);
        tracing::debug!("MusicBrainz barcode search: {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ResolveError::resolution(None, e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let code = Some(status.as_u16());
            // Try to parse error response
            if let Ok(error) = response.json::<dto::ApiError>().await {
                return Err(ResolveError::resolution(
                    code,
                    format!("HTTP {}: {}", status.as_u16(), error.error),
                ));
            }
            return Err(ResolveError::resolution(
                code,
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            ));
        }

        response
            .json::<dto::ReleaseSearchResponse>()
            .await
            .map_err(|e| ResolveError::resolution(None, format!("invalid response: {e}")))
    }
}
