//! Lidarr library manager integration
//!
//! A thin typed wrapper over the artist, album and profile endpoints of the
//! Lidarr v1 API. Every call is a single request/response pair; nothing is
//! retried here.
//!
//! API docs: https://lidarr.audio/docs/api/

mod client;
pub mod model;

pub use client::LidarrClient;
pub use model::{
    AlbumAddOptions, ArtistAddOptions, ArtistDefaults, LibraryAlbum, LibraryArtist,
    LibraryRelease, MetadataProfile, MonitorNewItems, NewAlbum, NewArtist, QualityProfile,
    RootFolder,
};
