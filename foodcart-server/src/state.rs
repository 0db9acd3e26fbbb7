//! Application state

use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::geocoder::{GeoCache, GeoResolver, YandexGeocoder};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Address → coordinates resolver with its cache
    pub geo: GeoResolver,
    /// Public prefix for static files, with trailing slash
    pub static_url: String,
    /// Public prefix for uploaded media, with trailing slash
    pub media_url: String,
}

impl AppState {
    /// Connect, run migrations and build the geocoder
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let provider = YandexGeocoder::new(
            &config.geocoder_url,
            &config.geocoder_api_key,
            Duration::from_secs(config.geocoder_timeout_secs),
        )?;
        let geo = GeoResolver::new(
            Arc::new(provider),
            GeoCache::new(config.geocode_cache_capacity),
        );

        tracing::info!(
            cache_capacity = geo.cache().capacity(),
            "Geocoder ready"
        );

        Ok(Self {
            pool,
            geo,
            static_url: config.static_url.clone(),
            media_url: config.media_url.clone(),
        })
    }
}
