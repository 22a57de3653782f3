//! Built-in TheMovieDB scraper.
//!
//! Queries the TMDB v3 REST API over the shared scraper client.
//!
//! Features:
//! - Token-bucket rate limiting at 4 requests / second via [`governor`].
//! - Automatic retry on HTTP 429 with `Retry-After` header support (max 3 retries).
//! - Name search for movies and URL scraping of `themoviedb.org/movie/<id>` pages.

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use regex::Regex;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ScraperConfig;
use crate::scrape::content::{ContentType, ScrapedContent, ScrapedMovie, ScrapedStudio};
use crate::scrape::scraper::{NameScraper, Scraper, ScraperSpec, UrlScraper};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Registry id of the built-in TMDB scraper.
pub const TMDB_SCRAPER_ID: &str = "builtin_tmdb";

const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const TMDB_MOVIE_URL: &str = "https://www.themoviedb.org/movie";
const MAX_RETRIES: u32 = 3;

// ---------------------------------------------------------------------------
// TMDB API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TmdbSearchResponse {
    results: Vec<TmdbMovieSearchResult>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieSearchResult {
    id: u64,
    title: Option<String>,
    release_date: Option<String>,
    overview: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieDetail {
    title: Option<String>,
    original_title: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    runtime: Option<u32>,
    production_companies: Option<Vec<TmdbCompany>>,
}

#[derive(Debug, Deserialize)]
struct TmdbCompany {
    name: String,
}

// ---------------------------------------------------------------------------
// Scraper implementation
// ---------------------------------------------------------------------------

/// Built-in movie scraper backed by the TMDB v3 REST API.
///
/// Searches movies by name and scrapes `themoviedb.org/movie/<id>` URLs. The
/// API key comes from the scraper configuration; requests without a key fail
/// with a scraper-level error.
pub struct TmdbScraper {
    api_key: String,
    base_url: String,
    movie_url: Regex,
    rate_limiter: RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl TmdbScraper {
    /// Create the scraper from global configuration. Rate limiting is
    /// configured at 4 requests per second.
    pub fn new(config: &ScraperConfig) -> Self {
        Self::with_base_url(config, TMDB_BASE_URL)
    }

    fn with_base_url(config: &ScraperConfig, base_url: &str) -> Self {
        let quota = Quota::per_second(NonZeroU32::new(4).unwrap());
        let movie_url = Regex::new(r"(?i)^https?://(?:www\.)?themoviedb\.org/movie/(\d+)")
            .expect("movie url pattern");

        Self {
            api_key: config.tmdb_api_key.clone(),
            base_url: base_url.to_string(),
            movie_url,
            rate_limiter: RateLimiter::direct(quota),
        }
    }

    /// Execute a GET request with rate limiting and 429-retry logic. Status
    /// handling is left to the caller.
    async fn get(&self, client: &reqwest::Client, url: &str) -> anyhow::Result<reqwest::Response> {
        if self.api_key.is_empty() {
            anyhow::bail!("tmdb api key is not configured");
        }

        let mut retries = 0u32;
        loop {
            self.rate_limiter.until_ready().await;

            let resp = client
                .get(url)
                .send()
                .await
                .with_context(|| format!("TMDB request failed: {url}"))?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                retries += 1;
                let wait = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!(
                    retry = retries,
                    wait_secs = wait,
                    "TMDB returned 429, backing off"
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            return Ok(resp);
        }
    }

    /// Build a full API URL with the API key and extra query parameters.
    fn url(&self, path: &str, extra_params: &[(&str, &str)]) -> String {
        let mut url = format!("{}{path}?api_key={}", self.base_url, self.api_key);
        for (key, value) in extra_params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoded(value));
        }
        url
    }

    /// Extract the numeric movie id from a themoviedb.org movie URL.
    fn movie_id(&self, url: &str) -> Option<String> {
        self.movie_url
            .captures(url)
            .map(|caps| caps[1].to_string())
    }

    async fn movie_detail(
        &self,
        client: &reqwest::Client,
        id: &str,
        url: &str,
    ) -> anyhow::Result<Option<ScrapedMovie>> {
        let api_url = self.url(&format!("/movie/{id}"), &[]);
        debug!(url = %api_url, "TMDB get movie detail");

        let resp = self.get(client, &api_url).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let detail: TmdbMovieDetail = resp
            .error_for_status()
            .with_context(|| format!("TMDB request returned error: {api_url}"))?
            .json()
            .await
            .context("failed to parse TMDB movie detail response")?;

        let mut aliases = Vec::new();
        if let (Some(original), Some(title)) = (&detail.original_title, &detail.title) {
            if original != title {
                aliases.push(original.clone());
            }
        }

        Ok(Some(ScrapedMovie {
            name: detail.title,
            aliases,
            duration: detail.runtime.map(|m| m.to_string()),
            date: detail.release_date.filter(|d| !d.is_empty()),
            director: None,
            synopsis: detail.overview,
            urls: vec![url.to_string()],
            studio: detail
                .production_companies
                .and_then(|companies| companies.into_iter().next())
                .map(|company| ScrapedStudio {
                    name: Some(company.name),
                    ..Default::default()
                }),
        }))
    }
}

impl Scraper for TmdbScraper {
    fn spec(&self) -> ScraperSpec {
        ScraperSpec::new(TMDB_SCRAPER_ID, "TheMovieDB", vec![ContentType::Movie])
    }

    fn supports(&self, ty: ContentType) -> bool {
        ty == ContentType::Movie
    }

    fn supports_url(&self, url: &str, ty: ContentType) -> bool {
        ty == ContentType::Movie && self.movie_url.is_match(url)
    }

    fn name_scraper(&self) -> Option<&dyn NameScraper> {
        Some(self)
    }

    fn url_scraper(&self) -> Option<&dyn UrlScraper> {
        Some(self)
    }
}

#[async_trait]
impl NameScraper for TmdbScraper {
    async fn via_name(
        &self,
        client: &reqwest::Client,
        query: &str,
        ty: ContentType,
    ) -> anyhow::Result<Vec<ScrapedContent>> {
        if ty != ContentType::Movie {
            anyhow::bail!("cannot search {ty} content");
        }

        let url = self.url("/search/movie", &[("query", query)]);
        debug!(url = %url, "TMDB search movie");

        let body: TmdbSearchResponse = self
            .get(client, &url)
            .await?
            .error_for_status()
            .with_context(|| format!("TMDB request returned error: {url}"))?
            .json()
            .await
            .context("failed to parse TMDB movie search response")?;

        Ok(body
            .results
            .into_iter()
            .map(|r| {
                ScrapedContent::Movie(ScrapedMovie {
                    name: r.title,
                    date: r.release_date.filter(|d| !d.is_empty()),
                    synopsis: r.overview,
                    urls: vec![format!("{TMDB_MOVIE_URL}/{}", r.id)],
                    ..Default::default()
                })
            })
            .collect())
    }
}

#[async_trait]
impl UrlScraper for TmdbScraper {
    async fn via_url(
        &self,
        client: &reqwest::Client,
        url: &str,
        ty: ContentType,
    ) -> anyhow::Result<Option<ScrapedContent>> {
        if ty != ContentType::Movie {
            anyhow::bail!("cannot scrape {ty} content");
        }

        let id = match self.movie_id(url) {
            Some(id) => id,
            None => return Ok(None),
        };

        Ok(self
            .movie_detail(client, &id, url)
            .await?
            .map(ScrapedContent::Movie))
    }
}

/// Minimal percent-encoding for query parameter values.
fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push(char::from(HEX[(b >> 4) as usize]));
                out.push(char::from(HEX[(b & 0x0f) as usize]));
            }
        }
    }
    out
}

const HEX: [u8; 16] = *b"0123456789ABCDEF";
