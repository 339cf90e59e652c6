use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// OMDb API key
    pub api_key: String,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// Base URL of the related-titles pages; the catalog ID is appended
    #[serde(default = "default_title_page_url")]
    pub title_page_url: String,

    /// Whether fetched metadata is read from and written to Redis
    #[serde(default)]
    pub cache_enabled: bool,

    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Maximum number of related titles taken from one page
    #[serde(default = "default_related_titles_limit")]
    pub related_titles_limit: usize,

    /// Substring of the link that opens the related-titles section
    #[serde(default = "default_related_section_marker")]
    pub related_section_marker: String,

    /// Per-title metadata fetch budget in milliseconds; 0 disables it
    #[serde(default)]
    pub fetch_timeout_ms: Option<u64>,

    /// JSON file listing the titles currently streaming
    #[serde(default = "default_streaming_list_path")]
    pub streaming_list_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_omdb_api_url() -> String {
    "http://www.omdbapi.com/".to_string()
}

fn default_title_page_url() -> String {
    "https://www.imdb.com/title".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_related_titles_limit() -> usize {
    5
}

fn default_related_section_marker() -> String {
    "discover-watch".to_string()
}

fn default_streaming_list_path() -> String {
    "movie_stream_list.json".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}
