//! Address geocoding
//!
//! [`GeoResolver`] turns a free-text address into `(longitude, latitude)`:
//! cache first, then one call to the injected [`GeocodeProvider`].
//! Lookup failures never abort a save; records simply stay without
//! coordinates.

mod cache;
mod distance;
mod yandex;

pub use cache::{GeoCache, cache_key};
pub use distance::distance_km;
pub use yandex::YandexGeocoder;

use async_trait::async_trait;
use shared::models::Coordinates;
use std::sync::Arc;

/// Outbound geocoding failure
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// Connection error, timeout or non-2xx status
    #[error("geocoder request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Response did not have the expected shape
    #[error("malformed geocoder response: {0}")]
    Malformed(String),
}

/// Remote lookup of a single address
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// `Ok(None)` when the service knows no such address
    async fn fetch(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

/// Cached geocoder shared by all request handlers
#[derive(Clone)]
pub struct GeoResolver {
    provider: Arc<dyn GeocodeProvider>,
    cache: GeoCache,
}

impl GeoResolver {
    pub fn new(provider: Arc<dyn GeocodeProvider>, cache: GeoCache) -> Self {
        Self { provider, cache }
    }

    /// Resolve an address, hitting the provider only on a cache miss.
    ///
    /// Unknown addresses are not cached so a later retry can still succeed.
    pub async fn resolve(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let address = address.trim();
        if address.is_empty() {
            return Ok(None);
        }

        let key = cache_key(address);
        if let Some(point) = self.cache.get(&key) {
            tracing::debug!(address = %address, "Geocode cache hit");
            return Ok(Some(point));
        }

        let point = self.provider.fetch(address).await?;
        match point {
            Some(point) => self.cache.insert(key, point),
            None => tracing::info!(address = %address, "Geocoder found no match"),
        }
        Ok(point)
    }

    /// [`resolve`](Self::resolve) with failures logged and swallowed
    pub async fn locate(&self, address: &str) -> Option<Coordinates> {
        match self.resolve(address).await {
            Ok(point) => point,
            Err(e) => {
                tracing::warn!(address = %address, error = %e, "Geocoding failed, saving without coordinates");
                None
            }
        }
    }

    pub fn cache(&self) -> &GeoCache {
        &self.cache
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider answering from a fixed table and counting calls
    #[derive(Default)]
    pub struct MockGeocoder {
        pub points: HashMap<String, Coordinates>,
        pub fail: bool,
        pub calls: AtomicUsize,
    }

    impl MockGeocoder {
        pub fn with(entries: &[(&str, Coordinates)]) -> Self {
            Self {
                points: entries
                    .iter()
                    .map(|(a, p)| (a.to_string(), *p))
                    .collect(),
                ..Default::default()
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GeocodeProvider for MockGeocoder {
        async fn fetch(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(GeocodeError::Malformed("mock failure".into()));
            }
            Ok(self.points.get(address).copied())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockGeocoder;
    use super::*;

    const RED_SQUARE: &str = "Москва, Красная площадь";

    fn resolver(mock: Arc<MockGeocoder>) -> GeoResolver {
        GeoResolver::new(mock, GeoCache::new(16))
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let mock = Arc::new(MockGeocoder::with(&[(
            RED_SQUARE,
            Coordinates::new(37.620393, 55.75396),
        )]));
        let geo = resolver(mock.clone());

        let first = geo.resolve(RED_SQUARE).await.unwrap();
        let second = geo.resolve(&format!(" {RED_SQUARE} ")).await.unwrap();

        assert_eq!(first, Some(Coordinates::new(37.620393, 55.75396)));
        assert_eq!(second, first);
        assert_eq!(mock.calls(), 1);
    }

    #[tokio::test]
    async fn unknown_address_is_not_cached() {
        let mock = Arc::new(MockGeocoder::default());
        let geo = resolver(mock.clone());

        assert_eq!(geo.resolve("nowhere").await.unwrap(), None);
        assert_eq!(geo.resolve("nowhere").await.unwrap(), None);
        assert_eq!(mock.calls(), 2);
        assert_eq!(geo.cache().len(), 0);
    }

    #[tokio::test]
    async fn failure_is_swallowed_by_locate() {
        let mock = Arc::new(MockGeocoder::failing());
        let geo = resolver(mock.clone());

        assert!(geo.resolve(RED_SQUARE).await.is_err());
        assert_eq!(geo.locate(RED_SQUARE).await, None);
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn blank_address_skips_provider() {
        let mock = Arc::new(MockGeocoder::default());
        let geo = resolver(mock.clone());

        assert_eq!(geo.locate("   ").await, None);
        assert_eq!(mock.calls(), 0);
    }
}
