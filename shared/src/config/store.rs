//! Search store connection settings.

/// Environment variable holding the store base URL.
pub const STORE_URL_ENV: &str = "FRESHCHECK_ES_URL";

/// Base URL used when none is configured.
pub const DEFAULT_STORE_URL: &str = "http://localhost:9200";

/// Connection settings for the search store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Base URL of the store, without a trailing slash.
    pub url: String,
}

impl StoreConfig {
    /// Creates a configuration for the given base URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use shared::config::StoreConfig;
    ///
    /// let config = StoreConfig::new("http://search:9200/");
    /// assert_eq!(config.url, "http://search:9200");
    /// ```
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            url: url.trim().trim_end_matches('/').to_string(),
        }
    }

    /// Loads the configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `FRESHCHECK_ES_URL`: Store base URL (default: <http://localhost:9200>)
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(std::env::var(STORE_URL_ENV).unwrap_or_else(|_| DEFAULT_STORE_URL.to_string()))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        assert_eq!(StoreConfig::default().url, "http://localhost:9200");
    }

    #[test]
    fn test_new_trims_trailing_slashes() {
        assert_eq!(StoreConfig::new(" http://es:9200// ").url, "http://es:9200");
    }
}
