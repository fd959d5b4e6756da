//! MusicBrainz catalog integration
//!
//! Resolves a product barcode to the exact release it was printed on.
//! Only the first search hit is used; MusicBrainz ranks exact barcode
//! matches first, and we do no further disambiguation.
//!
//! API docs: https://musicbrainz.org/doc/MusicBrainz_API/Search

pub mod dto;
mod adapter;
mod client;

pub use adapter::to_resolved_release;
pub use client::{DEFAULT_BASE_URL, MusicBrainzClient};
