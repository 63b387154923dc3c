use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
};
use tower_http::cors::CorsLayer;

use crate::{
    config::{AppConfig, StorageBackend},
    database,
    error::Result,
    repo::{Catalog, PgCatalog},
    routes,
    services::ProductService,
    storage::{FileStore, LocalStore, S3Store},
};

#[derive(Clone)]
pub struct AppState {
    pub products: ProductService,
    pub catalog: Arc<dyn Catalog>,
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let pool = database::create_pool(&config.database).await?;
    let catalog: Arc<dyn Catalog> = Arc::new(PgCatalog::new(pool));

    let files: Arc<dyn FileStore> = match config.storage.backend {
        StorageBackend::Local => Arc::new(LocalStore::new(config.storage.root.clone())),
        StorageBackend::S3 => {
            let bucket = config
                .storage
                .bucket
                .clone()
                .ok_or_else(|| crate::error::AppError::ConfigError("S3_BUCKET not set".into()))?;
            Arc::new(S3Store::from_env(bucket).await?)
        }
    };

    let state = AppState {
        products: ProductService::new(catalog.clone(), files),
        catalog,
    };

    let allowed_origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|_| {
                crate::error::AppError::ConfigError(format!("Invalid CORS origin: {}", origin))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_origin(allowed_origins);

    let app = routes::create_router()
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(cors)
        .with_state(state);

    Ok(app)
}
