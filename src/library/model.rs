//! Lidarr payload types.
//!
//! Lidarr expects whole records back on update, so every record keeps the
//! fields we don't model in `extra` and writes them back untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::ResolvedRelease;

/// Artist as stored by the library manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryArtist {
    /// Library manager's internal ID
    pub id: i64,
    pub artist_name: String,
    /// Catalog artist ID
    pub foreign_artist_id: String,
    #[serde(default)]
    pub monitored: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Album (release group) as stored by the library manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryAlbum {
    /// Library manager's internal ID
    pub id: i64,
    pub artist_id: i64,
    /// Catalog release group ID
    pub foreign_album_id: String,
    pub title: String,
    #[serde(default)]
    pub monitored: bool,
    /// Known editions, in the order the manager lists them
    #[serde(default)]
    pub releases: Vec<LibraryRelease>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LibraryAlbum {
    /// Find the edition with the given catalog release ID.
    pub fn release(&self, foreign_release_id: &str) -> Option<&LibraryRelease> {
        self.releases
            .iter()
            .find(|r| r.foreign_release_id == foreign_release_id)
    }
}

/// One edition of an album
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryRelease {
    /// Library manager's internal ID (absent on records we build ourselves)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Catalog release ID
    pub foreign_release_id: String,
    #[serde(default)]
    pub monitored: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LibraryRelease {
    pub fn new(foreign_release_id: impl Into<String>, monitored: bool) -> Self {
        Self {
            id: None,
            foreign_release_id: foreign_release_id.into(),
            monitored,
            extra: Map::new(),
        }
    }
}

/// How the manager treats albums it discovers for an artist later on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorNewItems {
    All,
    #[default]
    None,
    New,
}

impl std::str::FromStr for MonitorNewItems {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "none" => Ok(Self::None),
            "new" => Ok(Self::New),
            other => Err(format!("unknown monitor mode '{other}' (expected all, none or new)")),
        }
    }
}

/// Settings applied to every artist we create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtistDefaults {
    pub root_folder_path: String,
    pub quality_profile_id: i64,
    pub metadata_profile_id: i64,
    /// Whether the artist itself is monitored
    pub monitored: bool,
    pub monitor_new_items: MonitorNewItems,
    /// Search for every missing album as soon as the artist is added
    pub search_on_add: bool,
}

impl Default for ArtistDefaults {
    fn default() -> Self {
        Self {
            root_folder_path: "/music".to_string(),
            quality_profile_id: 2,
            metadata_profile_id: 9,
            monitored: false,
            monitor_new_items: MonitorNewItems::None,
            search_on_add: false,
        }
    }
}

/// Body of an artist create request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArtist {
    pub artist_name: String,
    pub foreign_artist_id: String,
    pub root_folder_path: String,
    pub quality_profile_id: i64,
    pub metadata_profile_id: i64,
    pub monitored: bool,
    pub monitor_new_items: MonitorNewItems,
    pub add_options: ArtistAddOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistAddOptions {
    pub search_for_missing_albums: bool,
}

impl NewArtist {
    pub fn new(name: &str, foreign_artist_id: &str, defaults: &ArtistDefaults) -> Self {
        Self {
            artist_name: name.to_string(),
            foreign_artist_id: foreign_artist_id.to_string(),
            root_folder_path: defaults.root_folder_path.clone(),
            quality_profile_id: defaults.quality_profile_id,
            metadata_profile_id: defaults.metadata_profile_id,
            monitored: defaults.monitored,
            monitor_new_items: defaults.monitor_new_items,
            add_options: ArtistAddOptions {
                search_for_missing_albums: defaults.search_on_add,
            },
        }
    }
}

/// Body of an album create request.
///
/// Lidarr rejects album creation unless the full artist record is embedded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAlbum {
    pub artist_id: i64,
    pub artist: LibraryArtist,
    pub foreign_album_id: String,
    pub title: String,
    pub monitored: bool,
    pub add_options: AlbumAddOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumAddOptions {
    pub search_for_new_album: bool,
}

impl NewAlbum {
    /// A monitored album for the release's group, searched for immediately.
    pub fn monitored(artist: LibraryArtist, release: &ResolvedRelease) -> Self {
        Self {
            artist_id: artist.id,
            artist,
            foreign_album_id: release.release_group_id.clone(),
            title: release.title.clone(),
            monitored: true,
            add_options: AlbumAddOptions {
                search_for_new_album: true,
            },
        }
    }
}

/// Root folder configured in the manager
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootFolder {
    pub id: i64,
    pub path: String,
    pub name: Option<String>,
}

/// Quality profile configured in the manager
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QualityProfile {
    pub id: i64,
    pub name: String,
}

/// Metadata profile configured in the manager
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetadataProfile {
    pub id: i64,
    pub name: String,
}
