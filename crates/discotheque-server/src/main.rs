use discotheque_db::{AppState, DbAlbumStore};
use discotheque_media::LocalImageStorage;
use discotheque_server::ServerConfig;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "discotheque_server=info,tower_http=info".into()),
        )
        .init();

    let config = ServerConfig::from_env();

    // Database connection
    let db_config = discotheque_db::DatabaseConfig::from_env();
    tracing::info!("connecting to database...");
    let db = discotheque_db::connect(&db_config)
        .await
        .expect("failed to connect to database");

    // Run migrations
    tracing::info!("running database migrations...");
    discotheque_migration::Migrator::up(&db, None)
        .await
        .expect("failed to run migrations");
    tracing::info!("migrations complete");

    let images = LocalImageStorage::from_env();
    tracing::info!(path = %images.base().display(), "storing album images on local filesystem");
    let image_dir = images.base().to_path_buf();

    let state = Arc::new(AppState {
        albums: Arc::new(DbAlbumStore::new(db)),
        images: Arc::new(images),
        max_image_bytes: config.max_image_bytes,
    });

    let app = discotheque_server::app(state, &config, &image_dir);

    let addr = config.socket_addr();
    tracing::info!(%addr, "server started");

    axum::serve(
        tokio::net::TcpListener::bind(addr)
            .await
            .expect("failed to bind listener"),
        app,
    )
    .await
    .expect("server error");
}
