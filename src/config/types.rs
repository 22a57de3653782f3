use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global scraper options.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    /// User agent sent with every scraper HTTP request. Empty means the
    /// client default.
    #[serde(default)]
    pub user_agent: String,

    /// Directory scraped recursively for scraper definition files.
    #[serde(default = "default_scrapers_path")]
    pub scrapers_path: PathBuf,

    /// Remote debugging endpoint for browser-backed scrapers. Either an
    /// HTTP(S) or WebSocket URL, or a path to a browser binary.
    #[serde(default)]
    pub cdp_path: String,

    /// Verify TLS certificates on scraper HTTP requests (default: true).
    #[serde(default = "default_cert_check")]
    pub cert_check: bool,

    /// External interpreter used by script-backed scraper definitions.
    #[serde(default)]
    pub interpreter_path: Option<PathBuf>,

    /// Outbound HTTP proxy URL. When unset, proxies are taken from the
    /// environment.
    #[serde(default)]
    pub proxy: Option<String>,

    /// API key for the built-in TheMovieDB scraper.
    #[serde(default)]
    pub tmdb_api_key: String,
}

fn default_scrapers_path() -> PathBuf {
    PathBuf::from("./scrapers")
}

fn default_cert_check() -> bool {
    true
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            scrapers_path: default_scrapers_path(),
            cdp_path: String::new(),
            cert_check: default_cert_check(),
            interpreter_path: None,
            proxy: None,
            tmdb_api_key: String::new(),
        }
    }
}

impl ScraperConfig {
    /// Whether the remote debugging endpoint is an HTTP(S) URL.
    pub fn is_cdp_path_http(&self) -> bool {
        self.cdp_path.starts_with("http://") || self.cdp_path.starts_with("https://")
    }

    /// Whether the remote debugging endpoint is a WebSocket URL.
    pub fn is_cdp_path_ws(&self) -> bool {
        self.cdp_path.starts_with("ws://")
    }
}
