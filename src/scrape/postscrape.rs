//! Post-scrape normalization.
//!
//! Every successful fragment, URL, and id scrape passes through a single
//! [`PostScrapeFilter`] before being returned. The filter must be idempotent
//! and defined for every content type; cross-cutting enrichment plugs in here
//! instead of being threaded through each dispatch path.

use super::content::{
    ScrapedContent, ScrapedGallery, ScrapedMovie, ScrapedPerformer, ScrapedScene, ScrapedStudio,
    ScrapedTag,
};

/// Extension point applied to every successful scrape result.
pub trait PostScrapeFilter: Send + Sync {
    fn filter(&self, content: ScrapedContent) -> anyhow::Result<ScrapedContent>;
}

/// Default normalization: trims text fields, drops empties, deduplicates
/// URL/alias/tag lists case-insensitively (preserving first occurrence), and
/// derives a missing scene or gallery title from the last path segment of the
/// first URL. Applying it twice yields the same output.
#[derive(Debug, Default)]
pub struct DefaultPostScrape;

impl PostScrapeFilter for DefaultPostScrape {
    fn filter(&self, content: ScrapedContent) -> anyhow::Result<ScrapedContent> {
        Ok(match content {
            ScrapedContent::Scene(scene) => ScrapedContent::Scene(normalize_scene(scene)),
            ScrapedContent::Gallery(gallery) => ScrapedContent::Gallery(normalize_gallery(gallery)),
            ScrapedContent::Performer(performer) => {
                ScrapedContent::Performer(normalize_performer(performer))
            }
            ScrapedContent::Movie(movie) => ScrapedContent::Movie(normalize_movie(movie)),
            ScrapedContent::Tag(tag) => ScrapedContent::Tag(normalize_tag(tag)),
        })
    }
}

fn normalize_scene(mut scene: ScrapedScene) -> ScrapedScene {
    scene.title = derive_title(clean(scene.title), &scene.urls);
    scene.code = clean(scene.code);
    scene.details = clean(scene.details);
    scene.director = clean(scene.director);
    scene.date = clean(scene.date);
    scene.urls = dedupe(scene.urls);
    scene.studio = scene.studio.map(normalize_studio);
    scene.performers = scene.performers.into_iter().map(normalize_performer).collect();
    scene.tags = dedupe_tags(scene.tags);
    scene
}

fn normalize_gallery(mut gallery: ScrapedGallery) -> ScrapedGallery {
    gallery.title = derive_title(clean(gallery.title), &gallery.urls);
    gallery.details = clean(gallery.details);
    gallery.photographer = clean(gallery.photographer);
    gallery.date = clean(gallery.date);
    gallery.urls = dedupe(gallery.urls);
    gallery.studio = gallery.studio.map(normalize_studio);
    gallery.performers = gallery
        .performers
        .into_iter()
        .map(normalize_performer)
        .collect();
    gallery.tags = dedupe_tags(gallery.tags);
    gallery
}

fn normalize_performer(mut performer: ScrapedPerformer) -> ScrapedPerformer {
    performer.name = clean(performer.name);
    performer.gender = clean(performer.gender);
    performer.birthdate = clean(performer.birthdate);
    performer.country = clean(performer.country);
    performer.details = clean(performer.details);
    performer.urls = dedupe(performer.urls);
    performer.aliases = dedupe(performer.aliases);
    // an alias equal to the name adds nothing
    if let Some(name) = &performer.name {
        performer
            .aliases
            .retain(|alias| !alias.eq_ignore_ascii_case(name));
    }
    performer.tags = dedupe_tags(performer.tags);
    performer
}

fn normalize_movie(mut movie: ScrapedMovie) -> ScrapedMovie {
    movie.name = clean(movie.name);
    movie.duration = clean(movie.duration);
    movie.date = clean(movie.date);
    movie.director = clean(movie.director);
    movie.synopsis = clean(movie.synopsis);
    movie.urls = dedupe(movie.urls);
    movie.aliases = dedupe(movie.aliases);
    movie.studio = movie.studio.map(normalize_studio);
    movie
}

fn normalize_studio(mut studio: ScrapedStudio) -> ScrapedStudio {
    studio.name = clean(studio.name);
    studio.url = clean(studio.url);
    studio.remote_site_id = clean(studio.remote_site_id);
    studio
}

fn normalize_tag(mut tag: ScrapedTag) -> ScrapedTag {
    tag.name = tag.name.trim().to_string();
    tag
}

/// Trim, mapping empty results to `None`.
fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Order-preserving, case-insensitive deduplication.
fn dedupe(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim().to_string();
        if value.is_empty() {
            continue;
        }
        if !out.iter().any(|seen| seen.eq_ignore_ascii_case(&value)) {
            out.push(value);
        }
    }
    out
}

fn dedupe_tags(tags: Vec<ScrapedTag>) -> Vec<ScrapedTag> {
    let mut out: Vec<ScrapedTag> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = normalize_tag(tag);
        if tag.name.is_empty() {
            continue;
        }
        if !out.iter().any(|seen| seen.name.eq_ignore_ascii_case(&tag.name)) {
            out.push(tag);
        }
    }
    out
}

/// Derive a default title from the last path segment of the first URL when
/// the source did not provide one.
fn derive_title(title: Option<String>, urls: &[String]) -> Option<String> {
    if title.is_some() {
        return title;
    }

    let url = urls.first()?;
    let path = url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(url.as_str());
    let segment = path
        .split('/')
        .filter(|s| !s.is_empty())
        .last()
        .filter(|s| !s.contains('.'))?; // skip bare hosts and file names

    let derived = segment.replace(['-', '_'], " ").trim().to_string();
    (!derived.is_empty()).then_some(derived)
}
