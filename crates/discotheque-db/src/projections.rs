//! Read-side shapes returned by [`crate::AlbumStore`].
//!
//! Each use site has its own fixed projection. Joined artist data never
//! carries the artist's identifier.

use serde::Serialize;
use uuid::Uuid;

use crate::entities::{album, artist};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistInfo {
    pub name: String,
    pub info: Option<String>,
}

impl From<artist::Model> for ArtistInfo {
    fn from(a: artist::Model) -> Self {
        Self {
            name: a.name,
            info: a.info,
        }
    }
}

/// Album as it appears in listings: no identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumListing {
    pub name: String,
    pub release_year: Option<i32>,
    pub image: Option<String>,
    pub artist: Option<ArtistInfo>,
}

impl AlbumListing {
    pub fn from_models(a: album::Model, artist: Option<artist::Model>) -> Self {
        Self {
            name: a.name,
            release_year: a.release_year,
            image: a.image,
            artist: artist.map(ArtistInfo::from),
        }
    }
}

/// Single album lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumDetail {
    pub id: Uuid,
    pub name: String,
    pub release_year: Option<i32>,
    pub image: Option<String>,
    pub artist: Option<ArtistInfo>,
}

impl AlbumDetail {
    pub fn from_models(a: album::Model, artist: Option<artist::Model>) -> Self {
        Self {
            id: a.id,
            name: a.name,
            release_year: a.release_year,
            image: a.image,
            artist: artist.map(ArtistInfo::from),
        }
    }
}
