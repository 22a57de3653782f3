//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which builds a [`Cache`] over a temp scrapers
//! directory, a stub definition parser, a no-op transaction manager, and an
//! in-memory repository. Stub scrapers are registered by writing a matching
//! `.yml` file per scraper id, so tests exercise the real load path.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;

use metaforge::config::ScraperConfig;
use metaforge::scrape::{
    Cache, ContentType, DefinitionParser, FragmentScraper, GalleryScraper, NameScraper,
    Repository, SceneScraper, ScrapeInput, ScrapedContent, ScrapedGallery, ScrapedScene, Scraper,
    ScraperSpec, UrlScraper,
};
use metaforge_models::{
    Gallery, GalleryFinder, MediaFile, Movie, MovieNameFinder, Performer, PerformerQuerier,
    Result as ModelResult, Scene, SceneFinder, Studio, StudioQuerier, Tag, TagQuerier,
    TxnManager, TxnWork,
};

// ---------------------------------------------------------------------------
// Transaction manager
// ---------------------------------------------------------------------------

/// Runs the unit of work directly; there is no real storage underneath.
pub struct NoopTxnManager;

#[async_trait]
impl TxnManager for NoopTxnManager {
    async fn with_read_txn<'a>(&self, work: TxnWork<'a>) -> ModelResult<()> {
        work.await
    }
}

// ---------------------------------------------------------------------------
// In-memory repository
// ---------------------------------------------------------------------------

/// Simple in-memory stand-in for the storage ports.
#[derive(Default)]
pub struct InMemoryRepository {
    pub scenes: HashMap<i64, Scene>,
    pub galleries: HashMap<i64, Gallery>,
    /// Files attached to galleries on demand, as a real backend would.
    pub gallery_files: HashMap<i64, Vec<MediaFile>>,
    pub performers: Vec<Performer>,
    pub studios: Vec<Studio>,
    pub tags: Vec<Tag>,
    pub movies: Vec<Movie>,
}

impl InMemoryRepository {
    pub fn into_repository(self) -> Repository {
        let shared = Arc::new(self);
        Repository {
            scenes: shared.clone(),
            galleries: shared.clone(),
            performers: shared.clone(),
            studios: shared.clone(),
            tags: shared.clone(),
            movies: shared,
        }
    }
}

/// Whether any word of `name` appears in the candidate word list.
fn word_hit(name: &str, words: &[String]) -> bool {
    name.split(|c: char| !c.is_alphanumeric())
        .any(|word| words.iter().any(|cand| cand.eq_ignore_ascii_case(word)))
}

#[async_trait]
impl SceneFinder for InMemoryRepository {
    async fn find_scene(&self, id: i64) -> ModelResult<Option<Scene>> {
        Ok(self.scenes.get(&id).cloned())
    }
}

#[async_trait]
impl GalleryFinder for InMemoryRepository {
    async fn find_gallery(&self, id: i64) -> ModelResult<Option<Gallery>> {
        Ok(self.galleries.get(&id).cloned())
    }

    async fn load_gallery_files(&self, gallery: &mut Gallery) -> ModelResult<()> {
        if let Some(files) = self.gallery_files.get(&gallery.id) {
            gallery.files = files.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl PerformerQuerier for InMemoryRepository {
    async fn query_auto_tag(&self, words: &[String]) -> ModelResult<Vec<Performer>> {
        Ok(self
            .performers
            .iter()
            .filter(|p| word_hit(&p.name, words) || p.aliases.iter().any(|a| word_hit(a, words)))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl StudioQuerier for InMemoryRepository {
    async fn query_auto_tag(&self, words: &[String]) -> ModelResult<Vec<Studio>> {
        Ok(self
            .studios
            .iter()
            .filter(|s| word_hit(&s.name, words) || s.aliases.iter().any(|a| word_hit(a, words)))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TagQuerier for InMemoryRepository {
    async fn query_auto_tag(&self, words: &[String]) -> ModelResult<Vec<Tag>> {
        Ok(self
            .tags
            .iter()
            .filter(|t| word_hit(&t.name, words) || t.aliases.iter().any(|a| word_hit(a, words)))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MovieNameFinder for InMemoryRepository {
    async fn find_by_names(&self, names: &[String]) -> ModelResult<Vec<Movie>> {
        Ok(self
            .movies
            .iter()
            .filter(|m| names.iter().any(|n| n.eq_ignore_ascii_case(&m.name)))
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Stub scraper
// ---------------------------------------------------------------------------

/// A configurable scraper: each capability is present exactly when a canned
/// result for it has been set. Invocations are counted so tests can assert a
/// scraper was (or was not) reached.
pub struct StubScraper {
    id: String,
    name: String,
    types: Vec<ContentType>,
    url_pattern: Option<String>,
    name_results: Option<Vec<ScrapedContent>>,
    fragment_result: Option<Option<ScrapedContent>>,
    url_result: Option<Option<ScrapedContent>>,
    scene_result: Option<Option<ScrapedScene>>,
    gallery_result: Option<Option<ScrapedGallery>>,
    pub invocations: Arc<AtomicUsize>,
    /// File count of the last gallery handed to [`GalleryScraper::via_gallery`].
    pub seen_gallery_files: Arc<AtomicUsize>,
}

impl StubScraper {
    pub fn new(id: &str, name: &str, types: Vec<ContentType>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            types,
            url_pattern: None,
            name_results: None,
            fragment_result: None,
            url_result: None,
            scene_result: None,
            gallery_result: None,
            invocations: Arc::new(AtomicUsize::new(0)),
            seen_gallery_files: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Match URLs containing `pattern`. Does not by itself add the URL
    /// capability; pair with [`StubScraper::with_url_result`] unless the test
    /// wants an inconsistent definition.
    pub fn with_url_pattern(mut self, pattern: &str) -> Self {
        self.url_pattern = Some(pattern.to_string());
        self
    }

    pub fn with_name_results(mut self, results: Vec<ScrapedContent>) -> Self {
        self.name_results = Some(results);
        self
    }

    pub fn with_fragment_result(mut self, result: Option<ScrapedContent>) -> Self {
        self.fragment_result = Some(result);
        self
    }

    pub fn with_url_result(mut self, result: Option<ScrapedContent>) -> Self {
        self.url_result = Some(result);
        self
    }

    pub fn with_scene_result(mut self, result: Option<ScrapedScene>) -> Self {
        self.scene_result = Some(result);
        self
    }

    pub fn with_gallery_result(mut self, result: Option<ScrapedGallery>) -> Self {
        self.gallery_result = Some(result);
        self
    }

    fn touch(&self) {
        self.invocations.fetch_add(1, Ordering::SeqCst);
    }
}

impl Scraper for StubScraper {
    fn spec(&self) -> ScraperSpec {
        ScraperSpec::new(self.id.clone(), self.name.clone(), self.types.clone())
    }

    fn supports(&self, ty: ContentType) -> bool {
        self.types.contains(&ty)
    }

    fn supports_url(&self, url: &str, ty: ContentType) -> bool {
        self.types.contains(&ty)
            && self
                .url_pattern
                .as_ref()
                .is_some_and(|pattern| url.contains(pattern))
    }

    fn name_scraper(&self) -> Option<&dyn NameScraper> {
        self.name_results.as_ref().map(|_| self as &dyn NameScraper)
    }

    fn fragment_scraper(&self) -> Option<&dyn FragmentScraper> {
        self.fragment_result
            .as_ref()
            .map(|_| self as &dyn FragmentScraper)
    }

    fn url_scraper(&self) -> Option<&dyn UrlScraper> {
        self.url_result.as_ref().map(|_| self as &dyn UrlScraper)
    }

    fn scene_scraper(&self) -> Option<&dyn SceneScraper> {
        self.scene_result.as_ref().map(|_| self as &dyn SceneScraper)
    }

    fn gallery_scraper(&self) -> Option<&dyn GalleryScraper> {
        self.gallery_result
            .as_ref()
            .map(|_| self as &dyn GalleryScraper)
    }
}

#[async_trait]
impl NameScraper for StubScraper {
    async fn via_name(
        &self,
        _client: &reqwest::Client,
        _query: &str,
        _ty: ContentType,
    ) -> anyhow::Result<Vec<ScrapedContent>> {
        self.touch();
        Ok(self.name_results.clone().unwrap_or_default())
    }
}

#[async_trait]
impl FragmentScraper for StubScraper {
    async fn via_fragment(
        &self,
        _client: &reqwest::Client,
        _input: &ScrapeInput,
    ) -> anyhow::Result<Option<ScrapedContent>> {
        self.touch();
        Ok(self.fragment_result.clone().flatten())
    }
}

#[async_trait]
impl UrlScraper for StubScraper {
    async fn via_url(
        &self,
        _client: &reqwest::Client,
        _url: &str,
        _ty: ContentType,
    ) -> anyhow::Result<Option<ScrapedContent>> {
        self.touch();
        Ok(self.url_result.clone().flatten())
    }
}

#[async_trait]
impl SceneScraper for StubScraper {
    async fn via_scene(
        &self,
        _client: &reqwest::Client,
        _scene: &Scene,
    ) -> anyhow::Result<Option<ScrapedScene>> {
        self.touch();
        Ok(self.scene_result.clone().flatten())
    }
}

#[async_trait]
impl GalleryScraper for StubScraper {
    async fn via_gallery(
        &self,
        _client: &reqwest::Client,
        gallery: &Gallery,
    ) -> anyhow::Result<Option<ScrapedGallery>> {
        self.touch();
        self.seen_gallery_files
            .store(gallery.files.len(), Ordering::SeqCst);
        Ok(self.gallery_result.clone().flatten())
    }
}

// ---------------------------------------------------------------------------
// Stub definition parser
// ---------------------------------------------------------------------------

/// Resolves definition files to pre-built scrapers by file stem. A file named
/// `broken.yml` always fails to parse.
pub struct StubParser {
    scrapers: HashMap<String, Arc<dyn Scraper>>,
}

impl StubParser {
    pub fn new(scrapers: Vec<Arc<dyn Scraper>>) -> Self {
        Self {
            scrapers: scrapers
                .into_iter()
                .map(|s| (s.spec().id, s))
                .collect(),
        }
    }
}

impl DefinitionParser for StubParser {
    fn parse_file(&self, path: &Path) -> anyhow::Result<Arc<dyn Scraper>> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        if stem == "broken" {
            anyhow::bail!("definition failed validation");
        }
        self.scrapers
            .get(stem)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unknown definition: {stem}"))
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// Test harness wrapping a fully-constructed [`Cache`] backed by a temp
/// scrapers directory.
pub struct TestHarness {
    pub cache: Cache,
    pub dir: TempDir,
}

impl TestHarness {
    /// Create a harness registering the given scrapers, with an empty
    /// repository.
    pub fn new(scrapers: Vec<Arc<dyn Scraper>>) -> Self {
        Self::with_repository(scrapers, InMemoryRepository::default())
    }

    /// Create a harness with a custom repository.
    pub fn with_repository(scrapers: Vec<Arc<dyn Scraper>>, repository: InMemoryRepository) -> Self {
        let dir = tempfile::tempdir().expect("failed to create scrapers dir");
        for scraper in &scrapers {
            let file = dir.path().join(format!("{}.yml", scraper.spec().id));
            std::fs::write(file, "").expect("failed to write definition file");
        }

        let config = ScraperConfig {
            scrapers_path: dir.path().to_path_buf(),
            ..Default::default()
        };
        let cache = Cache::new(
            config,
            Arc::new(NoopTxnManager),
            repository.into_repository(),
            Arc::new(StubParser::new(scrapers)),
        )
        .expect("failed to build cache");

        Self { cache, dir }
    }

    /// Add a definition file that will fail to parse on the next (re)load.
    pub fn add_broken_definition(&self) {
        std::fs::write(self.dir.path().join("broken.yml"), "").expect("failed to write file");
    }
}
