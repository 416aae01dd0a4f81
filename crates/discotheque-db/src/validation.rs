use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest album name the `albums.name` column holds, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// One rejected field of a candidate record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Candidate album exactly as submitted by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAlbum {
    pub name: Option<String>,
    pub artist: Option<String>,
    pub release_year: Option<String>,
    pub image: Option<String>,
}

/// A candidate that passed [`NewAlbum::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidAlbum {
    pub name: String,
    pub artist_id: Uuid,
    pub release_year: Option<i32>,
    pub image: Option<String>,
}

impl NewAlbum {
    /// Check every field and report all failures at once.
    pub fn validate(self) -> Result<ValidAlbum, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = match self.name.as_deref().map(str::trim) {
            Some(n) if n.chars().count() > MAX_NAME_LEN => {
                errors.push(FieldError::new(
                    "name",
                    format!("Album name must be at most {MAX_NAME_LEN} characters"),
                ));
                None
            }
            Some(n) if !n.is_empty() => Some(n.to_string()),
            _ => {
                errors.push(FieldError::new("name", "Album name is required"));
                None
            }
        };

        let artist_id = match self.artist.as_deref().map(str::trim) {
            Some(a) if !a.is_empty() => match Uuid::parse_str(a) {
                Ok(id) => Some(id),
                Err(_) => {
                    errors.push(FieldError::new("artist", format!("Invalid artist ID: {a}")));
                    None
                }
            },
            _ => {
                errors.push(FieldError::new("artist", "Artist is required"));
                None
            }
        };

        // Blank means "not given", the same as an absent field.
        let release_year = match self.release_year.as_deref().map(str::trim) {
            Some(y) if !y.is_empty() => match y.parse::<i32>() {
                Ok(year) => Some(year),
                Err(_) => {
                    errors.push(FieldError::new(
                        "release_year",
                        format!("Release year must be an integer, got \"{y}\""),
                    ));
                    None
                }
            },
            _ => None,
        };

        match (name, artist_id) {
            (Some(name), Some(artist_id)) if errors.is_empty() => Ok(ValidAlbum {
                name,
                artist_id,
                release_year,
                image: self.image,
            }),
            _ => Err(errors),
        }
    }
}
