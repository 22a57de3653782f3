//! Built-in auto-tag scraper.
//!
//! Matches performer, studio, and tag names against the file paths of the
//! scene or gallery being scraped. Candidates come from the repository's
//! auto-tag query ports; a candidate counts as matched when its name (or an
//! alias) appears in a path bounded by non-word separators.

use std::sync::Arc;

use async_trait::async_trait;
use regex::RegexBuilder;

use metaforge_models::{Gallery, Performer, Scene, Studio, Tag, TxnManager};

use crate::scrape::cache::Repository;
use crate::scrape::content::{
    ContentType, ScrapedGallery, ScrapedPerformer, ScrapedScene, ScrapedStudio, ScrapedTag,
};
use crate::scrape::scraper::{GalleryScraper, SceneScraper, Scraper, ScraperSpec};

/// Registry id of the built-in auto-tag scraper.
pub const AUTOTAG_SCRAPER_ID: &str = "builtin_autotag";

/// Scene/gallery scraper that tags entities from their own file paths.
pub struct AutoTagScraper {
    txn: Arc<dyn TxnManager>,
    repository: Repository,
}

struct Matches {
    performers: Vec<Performer>,
    studio: Option<Studio>,
    tags: Vec<Tag>,
}

impl Matches {
    fn is_empty(&self) -> bool {
        self.performers.is_empty() && self.studio.is_none() && self.tags.is_empty()
    }
}

impl AutoTagScraper {
    pub fn new(txn: Arc<dyn TxnManager>, repository: Repository) -> Self {
        Self { txn, repository }
    }

    /// Query candidates for the words of `paths` and keep those whose name or
    /// alias actually appears in one of the paths.
    async fn match_paths(&self, paths: &[String]) -> anyhow::Result<Matches> {
        let words = path_words(paths);

        let mut performers: Vec<Performer> = Vec::new();
        let mut studios: Vec<Studio> = Vec::new();
        let mut tags: Vec<Tag> = Vec::new();
        {
            let repository = &self.repository;
            let (p, s, t) = (&mut performers, &mut studios, &mut tags);
            self.txn
                .with_read_txn(Box::pin(async move {
                    *p = repository.performers.query_auto_tag(&words).await?;
                    *s = repository.studios.query_auto_tag(&words).await?;
                    *t = repository.tags.query_auto_tag(&words).await?;
                    Ok(())
                }))
                .await?;
        }

        let matched = |name: &str, aliases: &[String]| {
            paths.iter().any(|path| {
                name_matches_path(name, path)
                    || aliases.iter().any(|alias| name_matches_path(alias, path))
            })
        };

        performers.retain(|p| matched(&p.name, &p.aliases));
        tags.retain(|t| matched(&t.name, &t.aliases));
        let studio = studios.into_iter().find(|s| matched(&s.name, &s.aliases));

        Ok(Matches {
            performers,
            studio,
            tags,
        })
    }
}

impl Scraper for AutoTagScraper {
    fn spec(&self) -> ScraperSpec {
        ScraperSpec::new(
            AUTOTAG_SCRAPER_ID,
            "Auto Tag",
            vec![ContentType::Scene, ContentType::Gallery],
        )
    }

    fn supports(&self, ty: ContentType) -> bool {
        matches!(ty, ContentType::Scene | ContentType::Gallery)
    }

    fn scene_scraper(&self) -> Option<&dyn SceneScraper> {
        Some(self)
    }

    fn gallery_scraper(&self) -> Option<&dyn GalleryScraper> {
        Some(self)
    }
}

#[async_trait]
impl SceneScraper for AutoTagScraper {
    async fn via_scene(
        &self,
        _client: &reqwest::Client,
        scene: &Scene,
    ) -> anyhow::Result<Option<ScrapedScene>> {
        let paths: Vec<String> = scene
            .files
            .iter()
            .map(|f| f.path.to_string_lossy().into_owned())
            .collect();
        if paths.is_empty() {
            return Ok(None);
        }

        let matches = self.match_paths(&paths).await?;
        if matches.is_empty() {
            return Ok(None);
        }

        Ok(Some(ScrapedScene {
            performers: matches.performers.into_iter().map(scraped_performer).collect(),
            studio: matches.studio.map(scraped_studio),
            tags: matches.tags.into_iter().map(scraped_tag).collect(),
            ..Default::default()
        }))
    }
}

#[async_trait]
impl GalleryScraper for AutoTagScraper {
    async fn via_gallery(
        &self,
        _client: &reqwest::Client,
        gallery: &Gallery,
    ) -> anyhow::Result<Option<ScrapedGallery>> {
        let mut paths: Vec<String> = gallery
            .files
            .iter()
            .map(|f| f.path.to_string_lossy().into_owned())
            .collect();
        if let Some(folder) = &gallery.folder_path {
            paths.push(folder.to_string_lossy().into_owned());
        }
        if paths.is_empty() {
            return Ok(None);
        }

        let matches = self.match_paths(&paths).await?;
        if matches.is_empty() {
            return Ok(None);
        }

        Ok(Some(ScrapedGallery {
            performers: matches.performers.into_iter().map(scraped_performer).collect(),
            studio: matches.studio.map(scraped_studio),
            tags: matches.tags.into_iter().map(scraped_tag).collect(),
            ..Default::default()
        }))
    }
}

fn scraped_performer(performer: Performer) -> ScrapedPerformer {
    ScrapedPerformer {
        name: Some(performer.name),
        ..Default::default()
    }
}

fn scraped_studio(studio: Studio) -> ScrapedStudio {
    ScrapedStudio {
        name: Some(studio.name),
        ..Default::default()
    }
}

fn scraped_tag(tag: Tag) -> ScrapedTag {
    ScrapedTag { name: tag.name }
}

/// Distinct alphanumeric words appearing in `paths`, used to narrow the
/// candidate queries. Single characters are noise and skipped.
fn path_words(paths: &[String]) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for path in paths {
        for word in path.split(|c: char| !c.is_alphanumeric()) {
            if word.chars().count() < 2 {
                continue;
            }
            if !words.iter().any(|seen| seen.eq_ignore_ascii_case(word)) {
                words.push(word.to_string());
            }
        }
    }
    words
}

/// Whether `name` appears in `path` bounded by non-word separators. The
/// separators inside the name itself are flexible, so "Jane Doe" matches
/// "Jane.Doe" and "jane_doe".
fn name_matches_path(name: &str, path: &str) -> bool {
    let words: Vec<String> = name
        .split_whitespace()
        .map(|w| regex::escape(w))
        .collect();
    if words.is_empty() {
        return false;
    }

    let pattern = format!(r"(?:^|[\W_]){}(?:[\W_]|$)", words.join(r"[\W_]+"));
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map(|re| re.is_match(path))
        .unwrap_or(false)
}
