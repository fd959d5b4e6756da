//! Internal domain models shared by the catalog, the library client and the
//! reconciler.
//!
//! These types are OUR types - they don't change when the MusicBrainz or
//! Lidarr APIs change. Catalog responses get converted into these via the
//! catalog adapter.

use serde::Serialize;

/// A product barcode (EAN/UPC) submitted by the operator.
///
/// The only validation is that it is non-empty once surrounding whitespace
/// is removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BarcodeQuery(String);

impl BarcodeQuery {
    /// Parse operator input into a barcode query.
    pub fn parse(input: &str) -> Result<Self, ResolveError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ResolveError::EmptyBarcode);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BarcodeQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The exact catalog release a barcode resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRelease {
    /// Catalog release ID (one specific edition)
    pub release_id: String,
    /// Catalog release group ID (the album across all editions)
    pub release_group_id: String,
    /// Release title
    pub title: String,
    /// Credited artist name
    pub artist_name: String,
    /// Catalog artist ID
    pub artist_external_id: String,
}

/// Result handed to non-streaming callers after a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileOutcome {
    pub artist: String,
    pub album: String,
    pub release_external_id: String,
    /// Library manager's internal album ID
    pub album_id: i64,
}

/// Errors raised while resolving a barcode against the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Barcode must not be empty")]
    EmptyBarcode,

    #[error("No release found for barcode {barcode}")]
    NotFound { barcode: String },

    #[error("Catalog lookup failed: {message}")]
    Resolution {
        /// Upstream HTTP status, when the failure came from a response
        status: Option<u16>,
        message: String,
    },
}

impl ResolveError {
    pub fn resolution(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Resolution {
            status,
            message: message.into(),
        }
    }
}

/// A non-success exchange with the library manager.
///
/// `status_code` is `None` when no response was received (transport error)
/// or when a 2xx body could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Library manager {operation} failed ({}): {body}", status_label(.status_code))]
pub struct LibraryApiError {
    pub operation: &'static str,
    pub status_code: Option<u16>,
    pub body: String,
}

impl LibraryApiError {
    pub fn new(operation: &'static str, status_code: Option<u16>, body: impl Into<String>) -> Self {
        Self {
            operation,
            status_code,
            body: body.into(),
        }
    }
}

fn status_label(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!("HTTP {code}"),
        None => "no response".to_string(),
    }
}
