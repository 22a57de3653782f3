//! The scraper registry.
//!
//! [`Cache`] owns the shared HTTP client, the global scraper configuration,
//! the storage dependencies, and the map of loaded scrapers. Scrapers are
//! indexed by id; built-ins are inserted first, then the definitions
//! directory is walked recursively and each parsed file is added (so a
//! definition can shadow a built-in, and within one load pass the last file
//! processed wins on id collision).
//!
//! The map is kept as an immutable snapshot behind a lock: readers clone the
//! snapshot handle and keep operating on a stable view while a reload swaps
//! in a replacement. A failed reload leaves the registry empty rather than
//! stale, so an empty listing signals that scraping is unavailable.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, error, warn};
use walkdir::WalkDir;

use metaforge_models::{
    Gallery, GalleryFinder, MovieNameFinder, PerformerQuerier, Scene, SceneFinder, StudioQuerier,
    TagQuerier, TxnManager,
};

use super::builtin::{AutoTagScraper, TmdbScraper};
use super::client::build_client;
use super::content::{ContentType, ScrapeInput, ScrapedContent};
use super::definition::DefinitionParser;
use super::error::{Result, ScrapeError};
use super::postscrape::{DefaultPostScrape, PostScrapeFilter};
use super::scraper::{Scraper, ScraperSpec};
use crate::config::ScraperConfig;

/// Storage query ports consumed by the scraper subsystem.
#[derive(Clone)]
pub struct Repository {
    pub scenes: Arc<dyn SceneFinder>,
    pub galleries: Arc<dyn GalleryFinder>,
    pub performers: Arc<dyn PerformerQuerier>,
    pub studios: Arc<dyn StudioQuerier>,
    pub tags: Arc<dyn TagQuerier>,
    pub movies: Arc<dyn MovieNameFinder>,
}

type ScraperMap = HashMap<String, Arc<dyn Scraper>>;

/// Stores the database of scrapers
pub struct Cache {
    client: reqwest::Client,
    scrapers: RwLock<Arc<ScraperMap>>,
    config: ScraperConfig,
    txn: Arc<dyn TxnManager>,
    repository: Repository,
    parser: Arc<dyn DefinitionParser>,
    post_scrape_filter: Arc<dyn PostScrapeFilter>,
}

impl Cache {
    /// Build a new cache, loading scraper definitions from the scrapers path
    /// in the configuration.
    ///
    /// Built-in scrapers are inserted first, then definition files from the
    /// scrapers directory and its subdirectories. A file that fails to parse
    /// is logged and skipped; an unreadable directory fails the whole load.
    pub fn new(
        config: ScraperConfig,
        txn: Arc<dyn TxnManager>,
        repository: Repository,
        parser: Arc<dyn DefinitionParser>,
    ) -> Result<Self> {
        let client = build_client(&config)?;

        let cache = Self {
            client,
            scrapers: RwLock::new(Arc::new(ScraperMap::new())),
            config,
            txn,
            repository,
            parser,
            post_scrape_filter: Arc::new(DefaultPostScrape),
        };

        let scrapers = cache.load_scrapers()?;
        *cache.scrapers.write() = Arc::new(scrapers);

        Ok(cache)
    }

    /// Replace the post-scrape filter applied to successful results.
    pub fn with_post_scrape(mut self, filter: Arc<dyn PostScrapeFilter>) -> Self {
        self.post_scrape_filter = filter;
        self
    }

    /// The shared HTTP client handed to dispatched scrapers.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    fn load_scrapers(&self) -> Result<ScraperMap> {
        let path = &self.config.scrapers_path;
        let mut scrapers = ScraperMap::new();

        // Add built-in scrapers
        let tmdb: Arc<dyn Scraper> = Arc::new(TmdbScraper::new(&self.config));
        let auto_tag: Arc<dyn Scraper> =
            Arc::new(AutoTagScraper::new(self.txn.clone(), self.repository.clone()));
        scrapers.insert(tmdb.spec().id, tmdb);
        scrapers.insert(auto_tag.spec().id, auto_tag);

        debug!(path = %path.display(), "reading scraper definitions");

        for entry in WalkDir::new(path).follow_links(true) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let file_path = entry.path();
            if !self.parser.matches(file_path) {
                continue;
            }
            match self.parser.parse_file(file_path) {
                Ok(scraper) => {
                    scrapers.insert(scraper.spec().id, scraper);
                }
                Err(err) => {
                    error!(file = %file_path.display(), error = %err, "error loading scraper definition");
                }
            }
        }

        Ok(scrapers)
    }

    /// Clear the scraper cache and reload from the scrapers path. In the
    /// event of an error during loading, the cache is left empty.
    pub fn reload(&self) -> Result<()> {
        *self.scrapers.write() = Arc::new(ScraperMap::new());

        let scrapers = self.load_scrapers()?;
        *self.scrapers.write() = Arc::new(scrapers);
        Ok(())
    }

    fn snapshot(&self) -> Arc<ScraperMap> {
        self.scrapers.read().clone()
    }

    fn find_scraper(&self, id: &str) -> Option<Arc<dyn Scraper>> {
        self.snapshot().get(id).cloned()
    }

    /// List scrapers supporting at least one of the given content types,
    /// sorted case-insensitively by display name.
    pub fn list(&self, types: &[ContentType]) -> Vec<ScraperSpec> {
        let snapshot = self.snapshot();
        let mut specs: Vec<ScraperSpec> = snapshot
            .values()
            .filter(|s| types.iter().any(|ty| s.supports(*ty)))
            .map(|s| s.spec())
            .collect();

        specs.sort_by_key(|spec| spec.name.to_lowercase());
        specs
    }

    /// The spec of the scraper with the given id, if registered.
    pub fn get(&self, id: &str) -> Option<ScraperSpec> {
        self.find_scraper(id).map(|s| s.spec())
    }

    /// Search for `ty` content by a free-text query using the scraper with
    /// the given id.
    pub async fn scrape_name(
        &self,
        id: &str,
        query: &str,
        ty: ContentType,
    ) -> Result<Vec<ScrapedContent>> {
        let scraper = self
            .find_scraper(id)
            .ok_or_else(|| ScrapeError::not_found(id))?;
        if !scraper.supports(ty) {
            return Err(ScrapeError::not_supported(
                id,
                format!("cannot use as a {ty} scraper"),
            ));
        }

        let name_scraper = scraper
            .name_scraper()
            .ok_or_else(|| ScrapeError::not_supported(id, "cannot scrape by name"))?;

        name_scraper
            .via_name(&self.client, query, ty)
            .await
            .map_err(|err| ScrapeError::scraper(id, "name", err))
    }

    /// Complete the given content fragment using the scraper with the given
    /// id. Successful results pass through the post-scrape filter.
    pub async fn scrape_fragment(
        &self,
        id: &str,
        input: &ScrapeInput,
    ) -> Result<Option<ScrapedContent>> {
        let scraper = self
            .find_scraper(id)
            .ok_or_else(|| ScrapeError::not_found(id))?;

        let fragment_scraper = scraper
            .fragment_scraper()
            .ok_or_else(|| ScrapeError::not_supported(id, "cannot scrape by fragment"))?;

        let content = fragment_scraper
            .via_fragment(&self.client, input)
            .await
            .map_err(|err| ScrapeError::scraper(id, "fragment", err))?;

        Ok(self.post_scrape(content))
    }

    /// Scrape a URL for the given content type. Tests each scraper's
    /// URL-match predicate and uses the first match; which scraper wins when
    /// multiple patterns match the same URL is undefined. Returns `Ok(None)`
    /// when no scraper matches or the matching scraper found nothing.
    pub async fn scrape_url(&self, url: &str, ty: ContentType) -> Result<Option<ScrapedContent>> {
        let snapshot = self.snapshot();
        for scraper in snapshot.values() {
            if !scraper.supports_url(url, ty) {
                continue;
            }
            let id = scraper.spec().id;

            // matching the URL without implementing the capability is a
            // definition inconsistency, surfaced rather than skipped
            let url_scraper = scraper
                .url_scraper()
                .ok_or_else(|| ScrapeError::not_supported(id.as_str(), "cannot scrape by url"))?;

            let content = url_scraper
                .via_url(&self.client, url, ty)
                .await
                .map_err(|err| ScrapeError::scraper(id.as_str(), "url", err))?;

            return match content {
                None => Ok(None),
                some => Ok(self.post_scrape(some)),
            };
        }

        Ok(None)
    }

    /// Re-scrape the scene or gallery with storage id `entity_id` using the
    /// scraper with the given id. The entity is loaded under a read
    /// transaction and must exist. `Ok(None)` means the scraper found
    /// nothing, which is not an error.
    pub async fn scrape_id(
        &self,
        scraper_id: &str,
        entity_id: i64,
        ty: ContentType,
    ) -> Result<Option<ScrapedContent>> {
        let scraper = self
            .find_scraper(scraper_id)
            .ok_or_else(|| ScrapeError::not_found(scraper_id))?;
        if !scraper.supports(ty) {
            return Err(ScrapeError::not_supported(
                scraper_id,
                format!("cannot scrape {ty} content"),
            ));
        }

        let content = match ty {
            ContentType::Scene => {
                let scene_scraper = scraper.scene_scraper().ok_or_else(|| {
                    ScrapeError::not_supported(scraper_id, "cannot scrape scenes by id")
                })?;

                let scene = self.get_scene(entity_id).await?;
                scene_scraper
                    .via_scene(&self.client, &scene)
                    .await
                    .map_err(|err| ScrapeError::scraper(scraper_id, "scene", err))?
                    .map(ScrapedContent::Scene)
            }
            ContentType::Gallery => {
                let gallery_scraper = scraper.gallery_scraper().ok_or_else(|| {
                    ScrapeError::not_supported(scraper_id, "cannot scrape galleries by id")
                })?;

                let gallery = self.get_gallery(entity_id).await?;
                gallery_scraper
                    .via_gallery(&self.client, &gallery)
                    .await
                    .map_err(|err| ScrapeError::scraper(scraper_id, "gallery", err))?
                    .map(ScrapedContent::Gallery)
            }
            other => {
                return Err(ScrapeError::not_supported(
                    scraper_id,
                    format!("cannot scrape {other} content by id"),
                ));
            }
        };

        Ok(self.post_scrape(content))
    }

    /// Apply the post-scrape filter. A `None` result passes through
    /// untouched; a filter failure is logged and the unfiltered content
    /// returned, so normalization never fails a scrape that succeeded.
    fn post_scrape(&self, content: Option<ScrapedContent>) -> Option<ScrapedContent> {
        let content = content?;
        match self.post_scrape_filter.filter(content.clone()) {
            Ok(filtered) => Some(filtered),
            Err(err) => {
                warn!(error = %err, "post-scrape filter failed, returning content unfiltered");
                Some(content)
            }
        }
    }

    async fn get_scene(&self, scene_id: i64) -> Result<Scene> {
        let mut found: Option<Scene> = None;
        {
            let repository = &self.repository;
            let slot = &mut found;
            self.txn
                .with_read_txn(Box::pin(async move {
                    *slot = repository.scenes.find_scene(scene_id).await?;
                    Ok(())
                }))
                .await?;
        }

        found.ok_or(ScrapeError::EntityNotFound {
            kind: "scene",
            id: scene_id,
        })
    }

    async fn get_gallery(&self, gallery_id: i64) -> Result<Gallery> {
        let mut found: Option<Gallery> = None;
        {
            let repository = &self.repository;
            let slot = &mut found;
            self.txn
                .with_read_txn(Box::pin(async move {
                    let mut gallery = repository.galleries.find_gallery(gallery_id).await?;
                    // a gallery without its files is incompletely loaded
                    if let Some(gallery) = gallery.as_mut() {
                        repository.galleries.load_gallery_files(gallery).await?;
                    }
                    *slot = gallery;
                    Ok(())
                }))
                .await?;
        }

        found.ok_or(ScrapeError::EntityNotFound {
            kind: "gallery",
            id: gallery_id,
        })
    }
}
