use serde::Deserialize;

use crate::models::{DEFAULT_MIN_GENRES, DEFAULT_MIN_TAGS, DEFAULT_RECOMMENDATIONS};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the JSON catalog bundle (items, embeddings, clusters)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Recommendations returned when a request does not ask for a count
    #[serde(default = "default_recommendations")]
    pub default_recommendations: usize,

    /// Shared tags required by the strict tier when not given per request
    #[serde(default = "default_min_tags")]
    pub default_min_tags: usize,

    /// Shared genres required by the strict tier when not given per request
    #[serde(default = "default_min_genres")]
    pub default_min_genres: usize,

    /// Upper bound on the number of recommendations a request may ask for
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,

    /// Catalogs with at least this many games scan the strict tier in parallel
    #[serde(default = "default_parallel_scan_threshold")]
    pub parallel_scan_threshold: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_catalog_path() -> String {
    "data/catalog.json".to_string()
}

fn default_recommendations() -> usize {
    DEFAULT_RECOMMENDATIONS
}

fn default_min_tags() -> usize {
    DEFAULT_MIN_TAGS
}

fn default_min_genres() -> usize {
    DEFAULT_MIN_GENRES
}

fn default_max_recommendations() -> usize {
    50
}

fn default_parallel_scan_threshold() -> usize {
    10_000
}

/// Request-independent knobs of the recommendation service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub default_recommendations: usize,
    pub default_min_tags: usize,
    pub default_min_genres: usize,
    pub max_recommendations: usize,
    pub parallel_scan_threshold: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_recommendations: default_recommendations(),
            default_min_tags: default_min_tags(),
            default_min_genres: default_min_genres(),
            max_recommendations: default_max_recommendations(),
            parallel_scan_threshold: default_parallel_scan_threshold(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            default_recommendations: self.default_recommendations,
            default_min_tags: self.default_min_tags,
            default_min_genres: self.default_min_genres,
            max_recommendations: self.max_recommendations,
            parallel_scan_threshold: self.parallel_scan_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_env() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.catalog_path, "data/catalog.json");
        assert_eq!(config.search_settings(), SearchSettings::default());
    }

    #[test]
    fn test_overrides() {
        let vars = vec![
            ("PORT".to_string(), "8080".to_string()),
            ("DEFAULT_MIN_TAGS".to_string(), "3".to_string()),
            ("PARALLEL_SCAN_THRESHOLD".to_string(), "100".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");

        let settings = config.search_settings();
        assert_eq!(settings.default_min_tags, 3);
        assert_eq!(settings.default_min_genres, 2);
        assert_eq!(settings.parallel_scan_threshold, 100);
    }
}
