//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`
//! ([`ResolveError`](crate::domain::ResolveError),
//! [`LibraryApiError`](crate::domain::LibraryApiError),
//! [`ReconcileError`](crate::reconcile::ReconcileError)). Setup code
//! (config loading, client construction) reports [`Error`], and the CLI
//! wraps everything in `anyhow`.
//!
//! # Example
//!
//! ```ignore
//! use codebarr::error::{Result, ResultExt};
//!
//! fn build() -> Result<Reconciler> {
//!     let config = config::load(None)?;          // Config errors auto-convert
//!     let client = LidarrClient::new(&url, &key)
//!         .with_context("building Lidarr client")?;
//!     ...
//! }
//! ```

use crate::config::ConfigError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// HTTP client construction error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, reqwest::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Http(e).context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, ConfigError> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Config(e).context(ctx))
    }
}
