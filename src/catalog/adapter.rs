//! Adapter layer: Convert MusicBrainz DTOs to domain models
//!
//! This is the ONLY place where catalog DTO types are converted to domain
//! types.

use super::dto;
use crate::domain::{BarcodeQuery, ResolveError, ResolvedRelease};

/// Convert a barcode search response into the release it resolves to.
///
/// The first release wins. Extra candidates are logged and dropped.
pub fn to_resolved_release(
    barcode: &BarcodeQuery,
    response: dto::ReleaseSearchResponse,
) -> Result<ResolvedRelease, ResolveError> {
    let candidates = response.releases.len();
    let Some(release) = response.releases.into_iter().next() else {
        return Err(ResolveError::NotFound {
            barcode: barcode.to_string(),
        });
    };

    if candidates > 1 {
        tracing::warn!(
            "Barcode {} matched {} releases, using the first ({})",
            barcode,
            candidates,
            release.id
        );
    }

    let release_group = release.release_group.ok_or_else(|| {
        ResolveError::resolution(None, format!("release {} has no release group", release.id))
    })?;

    let credit = release.artist_credit.into_iter().next().ok_or_else(|| {
        ResolveError::resolution(None, format!("release {} has no artist credit", release.id))
    })?;

    // Credited name may differ from the official one ("Prince" vs "The Artist")
    let artist_name = credit.name.unwrap_or(credit.artist.name);

    Ok(ResolvedRelease {
        release_id: release.id,
        release_group_id: release_group.id,
        title: release.title,
        artist_name,
        artist_external_id: credit.artist.id,
    })
}
