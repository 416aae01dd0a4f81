// Shared test utilities for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use discotheque_db::entities::{album, artist};
use discotheque_db::sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use discotheque_db::{
    AlbumDetail, AlbumListing, AlbumStore, AppState, DbAlbumStore, NewAlbum, StoreError,
};
use discotheque_media::{ImageFormat, ImageStorage, LocalImageStorage, StorageError};
use discotheque_migration::{Migrator, MigratorTrait};
use discotheque_server::ServerConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;
use uuid::Uuid;

pub const BOUNDARY: &str = "discotheque-test-boundary";

pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
];

/// Album store that records how often it is consulted.
pub struct CountingStore {
    inner: DbAlbumStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl AlbumStore for CountingStore {
    async fn list_albums(&self, artist_id: Option<Uuid>) -> Result<Vec<AlbumListing>, StoreError> {
        self.hit();
        self.inner.list_albums(artist_id).await
    }

    async fn find_album(&self, id: Uuid) -> Result<Option<AlbumDetail>, StoreError> {
        self.hit();
        self.inner.find_album(id).await
    }

    async fn insert_album(&self, candidate: NewAlbum) -> Result<album::Model, StoreError> {
        self.hit();
        self.inner.insert_album(candidate).await
    }
}

/// Upload sink whose disk is always unavailable.
pub struct FailingImageStorage;

#[async_trait]
impl ImageStorage for FailingImageStorage {
    async fn store_image(&self, _format: ImageFormat, _data: &[u8]) -> Result<String, StorageError> {
        Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "image directory is read-only",
        )))
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub store: Arc<CountingStore>,
    pub images: LocalImageStorage,
    _tmp: TempDir,
}

/// Build the full router over an in-memory SQLite database and a temporary
/// image directory.
pub async fn test_app() -> TestApp {
    build_app(None).await
}

/// Same as [`test_app`], but uploads go to `sink` instead of the temporary
/// directory.
pub async fn test_app_with_sink(sink: Arc<dyn ImageStorage>) -> TestApp {
    build_app(Some(sink)).await
}

async fn build_app(sink: Option<Arc<dyn ImageStorage>>) -> TestApp {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let tmp = TempDir::new().unwrap();
    let images = LocalImageStorage::new(tmp.path().join("images"));
    let store = Arc::new(CountingStore {
        inner: DbAlbumStore::new(db.clone()),
        calls: AtomicUsize::new(0),
    });

    let sink: Arc<dyn ImageStorage> = match sink {
        Some(sink) => sink,
        None => Arc::new(images.clone()),
    };

    let config = ServerConfig {
        max_image_bytes: 4096,
        ..ServerConfig::default()
    };
    let state = Arc::new(AppState {
        albums: store.clone(),
        images: sink,
        max_image_bytes: config.max_image_bytes,
    });
    let router = discotheque_server::app(state, &config, images.base());

    TestApp {
        router,
        db,
        store,
        images,
        _tmp: tmp,
    }
}

impl TestApp {
    pub async fn seed_artist(&self, name: &str) -> artist::Model {
        artist::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            info: Set(Some(format!("{name} biography"))),
            created_at: Set(chrono::Utc::now().fixed_offset()),
        }
        .insert(&self.db)
        .await
        .unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Vec<u8>) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.get(uri).await;
        (status, serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
    }

    /// POST a multipart album form; `image` is `(file name, bytes)`.
    pub async fn create_album(
        &self,
        fields: &[(&str, &str)],
        image: Option<(&str, &[u8])>,
    ) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.post_multipart(multipart_body(fields, image)).await;
        (status, serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
    }

    /// POST an already encoded multipart body to `/albums`.
    pub async fn post_multipart(&self, body: Vec<u8>) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method("POST")
            .uri("/albums")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub fn read_stored_image(&self, image_path: &str) -> Vec<u8> {
        let file_name = image_path.strip_prefix("images/").unwrap();
        std::fs::read(self.images.full_path(file_name)).unwrap()
    }

    /// Number of files currently in the image directory.
    pub fn stored_image_count(&self) -> usize {
        std::fs::read_dir(self.images.base())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

pub fn multipart_body(fields: &[(&str, &str)], image: Option<(&str, &[u8])>) -> Vec<u8> {
    let images: Vec<_> = image.into_iter().collect();
    multipart_body_with_images(fields, &images)
}

/// Multipart body carrying any number of `image` parts.
pub fn multipart_body_with_images(fields: &[(&str, &str)], images: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (file_name, data) in images {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
