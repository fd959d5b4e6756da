//! Codebarr - barcode to monitored release.
//!
//! Resolves a product barcode to the exact MusicBrainz release it was
//! printed on, then makes sure that release is present and the only
//! monitored edition of its album in a Lidarr library, narrating progress
//! as a stream of events.
//!
//! The entry point is [`reconcile::Reconciler`].

pub mod catalog;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod library;
pub mod reconcile;
#[cfg(test)]
pub mod test_utils;
pub mod traits;
