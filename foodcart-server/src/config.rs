//! Storefront server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Default geocoder endpoint (Yandex HTTP Geocoder)
const DEFAULT_GEOCODER_URL: &str = "https://geocode-maps.yandex.ru/1.x";

/// Storefront server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// Geocoder API key
    pub geocoder_api_key: String,
    /// Geocoder endpoint
    pub geocoder_url: String,
    /// Outbound geocoder request timeout
    pub geocoder_timeout_secs: u64,
    /// Max number of addresses kept in the geocode cache
    pub geocode_cache_capacity: usize,
    /// Public prefix for bundled static files (banner images)
    pub static_url: String,
    /// Public prefix for uploaded media (product images)
    pub media_url: String,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn parse_or<T: std::str::FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: Self::parse_or("HTTP_PORT", 8080),
            geocoder_api_key: Self::require_secret("GEOCODER_API_KEY", &environment)?,
            geocoder_url: std::env::var("GEOCODER_URL")
                .unwrap_or_else(|_| DEFAULT_GEOCODER_URL.into()),
            geocoder_timeout_secs: Self::parse_or("GEOCODER_TIMEOUT_SECS", 5),
            geocode_cache_capacity: Self::parse_or("GEOCODE_CACHE_CAPACITY", 10_000),
            static_url: with_trailing_slash(
                std::env::var("STATIC_URL").unwrap_or_else(|_| "/static/".into()),
            ),
            media_url: with_trailing_slash(
                std::env::var("MEDIA_URL").unwrap_or_else(|_| "/media/".into()),
            ),
            environment,
        })
    }
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_added_once() {
        assert_eq!(with_trailing_slash("/static".into()), "/static/");
        assert_eq!(with_trailing_slash("/media/".into()), "/media/");
        assert_eq!(
            with_trailing_slash("https://cdn.example.com/img".into()),
            "https://cdn.example.com/img/"
        );
    }

    #[test]
    fn secrets_get_a_placeholder_in_development() {
        let val = Config::require_secret("FOODCART_TEST_UNSET_SECRET", "development").unwrap();
        assert_eq!(val, "dev-FOODCART_TEST_UNSET_SECRET-not-for-production");

        assert!(Config::require_secret("FOODCART_TEST_UNSET_SECRET", "production").is_err());
    }
}
