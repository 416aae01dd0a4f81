use axum::{
    extract::{Multipart, Path, Query, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use discotheque_db::entities::album;
use discotheque_db::{AlbumDetail, AlbumListing, AppState, FieldError, NewAlbum};
use discotheque_media::ImageFormat;

/// Prefix of every stored `image` value; uploaded files are served from here.
pub const IMAGE_PREFIX: &str = "images/";

#[derive(Debug, Deserialize)]
pub struct AlbumQuery {
    pub artist: Option<String>,
}

/// Album as stored, returned from the create endpoint.
#[derive(Debug, Serialize)]
pub struct AlbumRecord {
    pub id: Uuid,
    pub name: String,
    pub artist: Uuid,
    pub release_year: Option<i32>,
    pub image: Option<String>,
}

impl From<album::Model> for AlbumRecord {
    fn from(a: album::Model) -> Self {
        Self {
            id: a.id,
            name: a.name,
            artist: a.artist_id,
            release_year: a.release_year,
            image: a.image,
        }
    }
}

fn parse_id(raw: &str, message: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidIdentifier(message.to_string()))
}

/// GET /albums
pub async fn list_albums(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AlbumQuery>,
) -> Result<Json<Vec<AlbumListing>>, ApiError> {
    let artist_id = match params.artist.as_deref().filter(|a| !a.is_empty()) {
        Some(raw) => Some(parse_id(raw, "Invalid artist ID.")?),
        None => None,
    };

    let albums = state.albums.list_albums(artist_id).await?;

    if artist_id.is_some() && albums.is_empty() {
        return Err(ApiError::NotFound(
            "No albums found for this artist".to_string(),
        ));
    }

    Ok(Json(albums))
}

/// GET /albums/{id}
pub async fn get_album(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AlbumDetail>, ApiError> {
    let id = parse_id(&id, "Invalid album ID.")?;

    let album = state
        .albums
        .find_album(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Album not found.".to_string()))?;

    Ok(Json(album))
}

#[derive(Debug)]
struct ImageUpload {
    file_name: Option<String>,
    data: Bytes,
}

#[derive(Debug, Default)]
struct AlbumForm {
    name: Option<String>,
    artist: Option<String>,
    release_year: Option<String>,
    image: Option<ImageUpload>,
}

impl AlbumForm {
    fn into_candidate(self, image: Option<String>) -> NewAlbum {
        NewAlbum {
            name: self.name,
            artist: self.artist,
            release_year: self.release_year,
            image,
        }
    }
}

async fn read_album_form(multipart: &mut Multipart) -> Result<AlbumForm, ApiError> {
    let mut form = AlbumForm::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "name" => form.name = Some(field.text().await?),
            "artist" => form.artist = Some(field.text().await?),
            "release_year" => form.release_year = Some(field.text().await?),
            "image" => {
                let file_name = field.file_name().map(str::to_string);
                let data = field.bytes().await?;
                // Browsers send an empty part when the file input is left blank.
                if data.is_empty() && file_name.as_deref().unwrap_or("").is_empty() {
                    continue;
                }
                if form.image.is_some() {
                    return Err(ApiError::ValidationFailed(vec![FieldError::new(
                        "image",
                        "Only one image may be uploaded",
                    )]));
                }
                form.image = Some(ImageUpload { file_name, data });
            }
            other => tracing::debug!(field = other, "ignoring unknown album form field"),
        }
    }

    Ok(form)
}

fn check_image(upload: &ImageUpload, max_bytes: usize) -> Result<ImageFormat, FieldError> {
    if upload.data.len() > max_bytes {
        return Err(FieldError::new(
            "image",
            format!("Image exceeds the {max_bytes} byte limit"),
        ));
    }
    ImageFormat::detect(&upload.data).ok_or_else(|| {
        FieldError::new(
            "image",
            "Unsupported image format (JPEG, PNG, GIF or WebP only)",
        )
    })
}

/// POST /albums
///
/// The image is written before the album insert and is not removed if the
/// insert fails afterwards.
pub async fn create_album(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AlbumRecord>, ApiError> {
    let mut form = read_album_form(&mut multipart).await?;

    let image = match form.image.take() {
        Some(upload) => {
            let format = match check_image(&upload, state.max_image_bytes) {
                Ok(format) => format,
                Err(image_error) => {
                    let mut errors = vec![image_error];
                    if let Err(field_errors) = form.into_candidate(None).validate() {
                        errors.extend(field_errors);
                    }
                    return Err(ApiError::ValidationFailed(errors));
                }
            };
            let file_name = state.images.store_image(format, &upload.data).await?;
            tracing::debug!(
                original = upload.file_name.as_deref().unwrap_or(""),
                stored = %file_name,
                "album image uploaded"
            );
            Some(format!("{IMAGE_PREFIX}{file_name}"))
        }
        None => None,
    };

    match state
        .albums
        .insert_album(form.into_candidate(image.clone()))
        .await
    {
        Ok(model) => Ok(Json(AlbumRecord::from(model))),
        Err(e) => {
            if let Some(path) = &image {
                tracing::warn!(image = %path, "album was not created, uploaded image left in place");
            }
            Err(e.into())
        }
    }
}
