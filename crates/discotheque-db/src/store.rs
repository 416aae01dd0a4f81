use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{album, artist};
use crate::projections::{AlbumDetail, AlbumListing};
use crate::validation::{FieldError, NewAlbum};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0:?}")]
    Validation(Vec<FieldError>),
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Albums and the artists they reference.
#[async_trait]
pub trait AlbumStore: Send + Sync {
    /// All albums in insertion order, optionally only those by `artist_id`.
    async fn list_albums(&self, artist_id: Option<Uuid>) -> Result<Vec<AlbumListing>, StoreError>;

    async fn find_album(&self, id: Uuid) -> Result<Option<AlbumDetail>, StoreError>;

    /// Validate `candidate`, then persist it with a fresh identifier.
    ///
    /// Fails with [`StoreError::Validation`] when a field is rejected or the
    /// referenced artist does not exist.
    async fn insert_album(&self, candidate: NewAlbum) -> Result<album::Model, StoreError>;
}

#[derive(Debug, Clone)]
pub struct DbAlbumStore {
    db: DatabaseConnection,
}

impl DbAlbumStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AlbumStore for DbAlbumStore {
    async fn list_albums(&self, artist_id: Option<Uuid>) -> Result<Vec<AlbumListing>, StoreError> {
        let mut query = album::Entity::find();
        if let Some(artist_id) = artist_id {
            query = query.filter(album::Column::ArtistId.eq(artist_id));
        }

        let rows = query
            .order_by_asc(album::Column::CreatedAt)
            .find_also_related(artist::Entity)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(a, ar)| AlbumListing::from_models(a, ar))
            .collect())
    }

    async fn find_album(&self, id: Uuid) -> Result<Option<AlbumDetail>, StoreError> {
        let row = album::Entity::find_by_id(id)
            .find_also_related(artist::Entity)
            .one(&self.db)
            .await?;

        Ok(row.map(|(a, ar)| AlbumDetail::from_models(a, ar)))
    }

    async fn insert_album(&self, candidate: NewAlbum) -> Result<album::Model, StoreError> {
        let valid = candidate.validate().map_err(StoreError::Validation)?;

        let artist_exists = artist::Entity::find_by_id(valid.artist_id)
            .one(&self.db)
            .await?
            .is_some();
        if !artist_exists {
            return Err(StoreError::Validation(vec![FieldError::new(
                "artist",
                format!("Artist not found: {}", valid.artist_id),
            )]));
        }

        let new_album = album::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(valid.name),
            artist_id: Set(valid.artist_id),
            release_year: Set(valid.release_year),
            image: Set(valid.image),
            created_at: Set(chrono::Utc::now().fixed_offset()),
        };

        let saved = new_album.insert(&self.db).await?;
        tracing::info!(album_id = %saved.id, artist_id = %saved.artist_id, "album created");
        Ok(saved)
    }
}
