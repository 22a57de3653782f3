//! The polymorphic scraper surface.
//!
//! Every registered scraper, built-in or definition-backed, sits behind the
//! [`Scraper`] trait. A concrete scraper implements some subset of the
//! capability traits and advertises each one through the matching accessor;
//! the dispatcher queries the accessor at call time and fails distinctly from
//! "not found" when the capability is absent.

use async_trait::async_trait;

use metaforge_models::{Gallery, Scene};

use super::content::{ContentType, ScrapeInput, ScrapedContent, ScrapedGallery, ScrapedScene};

// ---------------------------------------------------------------------------
// Descriptor
// ---------------------------------------------------------------------------

/// Immutable descriptor for a registered scraper. Plain owned data, safe to
/// hand out of the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScraperSpec {
    /// Unique registry key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Content types this scraper declares support for.
    pub content_types: Vec<ContentType>,
}

impl ScraperSpec {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        content_types: Vec<ContentType>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            content_types,
        }
    }

    /// Whether this scraper declares support for `ty`.
    pub fn supports(&self, ty: ContentType) -> bool {
        self.content_types.contains(&ty)
    }
}

// ---------------------------------------------------------------------------
// Scraper trait
// ---------------------------------------------------------------------------

/// One scraper definition, queried for capabilities at dispatch time.
///
/// The capability accessors default to `None`; a concrete scraper overrides
/// the ones it implements, returning itself. Declaring a content type in the
/// spec without implementing the matching capability is an authoring
/// inconsistency the dispatcher surfaces as a NotSupported error.
pub trait Scraper: Send + Sync {
    /// Descriptor for registry listings.
    fn spec(&self) -> ScraperSpec;

    /// Whether this scraper declares support for `ty`.
    fn supports(&self, ty: ContentType) -> bool;

    /// URL-match predicate: whether this scraper can scrape `url` into `ty`
    /// content.
    fn supports_url(&self, _url: &str, _ty: ContentType) -> bool {
        false
    }

    fn name_scraper(&self) -> Option<&dyn NameScraper> {
        None
    }

    fn fragment_scraper(&self) -> Option<&dyn FragmentScraper> {
        None
    }

    fn url_scraper(&self) -> Option<&dyn UrlScraper> {
        None
    }

    fn scene_scraper(&self) -> Option<&dyn SceneScraper> {
        None
    }

    fn gallery_scraper(&self) -> Option<&dyn GalleryScraper> {
        None
    }
}

// ---------------------------------------------------------------------------
// Capability traits
// ---------------------------------------------------------------------------

/// Search by a free-text name query.
#[async_trait]
pub trait NameScraper: Send + Sync {
    async fn via_name(
        &self,
        client: &reqwest::Client,
        query: &str,
        ty: ContentType,
    ) -> anyhow::Result<Vec<ScrapedContent>>;
}

/// Complete a partial content fragment.
#[async_trait]
pub trait FragmentScraper: Send + Sync {
    async fn via_fragment(
        &self,
        client: &reqwest::Client,
        input: &ScrapeInput,
    ) -> anyhow::Result<Option<ScrapedContent>>;
}

/// Scrape a URL this scraper's predicate matched.
#[async_trait]
pub trait UrlScraper: Send + Sync {
    async fn via_url(
        &self,
        client: &reqwest::Client,
        url: &str,
        ty: ContentType,
    ) -> anyhow::Result<Option<ScrapedContent>>;
}

/// Re-scrape an existing scene.
#[async_trait]
pub trait SceneScraper: Send + Sync {
    async fn via_scene(
        &self,
        client: &reqwest::Client,
        scene: &Scene,
    ) -> anyhow::Result<Option<ScrapedScene>>;
}

/// Re-scrape an existing gallery.
#[async_trait]
pub trait GalleryScraper: Send + Sync {
    async fn via_gallery(
        &self,
        client: &reqwest::Client,
        gallery: &Gallery,
    ) -> anyhow::Result<Option<ScrapedGallery>>;
}
