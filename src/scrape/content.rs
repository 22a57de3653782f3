//! Content types and scraped records.
//!
//! Every dispatch path returns [`ScrapedContent`], a content-type-tagged sum
//! over the scraped record shapes. The records carry the fields the merge
//! layer consumes; dates are ISO-8601 strings as delivered by the sources.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Content types
// ---------------------------------------------------------------------------

/// The kinds of content a scraper can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Scene,
    Gallery,
    Performer,
    Movie,
    Tag,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentType::Scene => "scene",
            ContentType::Gallery => "gallery",
            ContentType::Performer => "performer",
            ContentType::Movie => "movie",
            ContentType::Tag => "tag",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Scraped records
// ---------------------------------------------------------------------------

/// A scraped tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapedTag {
    pub name: String,
}

/// A scraped studio.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapedStudio {
    pub name: Option<String>,
    pub url: Option<String>,
    /// Identifier on the remote site, when the source exposes one.
    pub remote_site_id: Option<String>,
}

/// A scraped performer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapedPerformer {
    pub name: Option<String>,
    pub aliases: Vec<String>,
    pub gender: Option<String>,
    pub urls: Vec<String>,
    /// ISO-8601 date (YYYY-MM-DD).
    pub birthdate: Option<String>,
    pub country: Option<String>,
    pub details: Option<String>,
    pub tags: Vec<ScrapedTag>,
    pub remote_site_id: Option<String>,
}

/// A scraped movie.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapedMovie {
    pub name: Option<String>,
    pub aliases: Vec<String>,
    /// Runtime in minutes, as delivered by the source.
    pub duration: Option<String>,
    /// ISO-8601 date (YYYY-MM-DD).
    pub date: Option<String>,
    pub director: Option<String>,
    pub synopsis: Option<String>,
    pub urls: Vec<String>,
    pub studio: Option<ScrapedStudio>,
}

/// A scraped scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapedScene {
    pub title: Option<String>,
    pub code: Option<String>,
    pub details: Option<String>,
    pub director: Option<String>,
    /// ISO-8601 date (YYYY-MM-DD).
    pub date: Option<String>,
    pub urls: Vec<String>,
    pub studio: Option<ScrapedStudio>,
    pub performers: Vec<ScrapedPerformer>,
    pub tags: Vec<ScrapedTag>,
}

/// A scraped gallery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapedGallery {
    pub title: Option<String>,
    pub details: Option<String>,
    pub photographer: Option<String>,
    /// ISO-8601 date (YYYY-MM-DD).
    pub date: Option<String>,
    pub urls: Vec<String>,
    pub studio: Option<ScrapedStudio>,
    pub performers: Vec<ScrapedPerformer>,
    pub tags: Vec<ScrapedTag>,
}

// ---------------------------------------------------------------------------
// Sum type
// ---------------------------------------------------------------------------

/// A normalized, content-type-tagged scrape result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScrapedContent {
    Scene(ScrapedScene),
    Gallery(ScrapedGallery),
    Performer(ScrapedPerformer),
    Movie(ScrapedMovie),
    Tag(ScrapedTag),
}

impl ScrapedContent {
    /// The content type this result is tagged with.
    pub fn content_type(&self) -> ContentType {
        match self {
            ScrapedContent::Scene(_) => ContentType::Scene,
            ScrapedContent::Gallery(_) => ContentType::Gallery,
            ScrapedContent::Performer(_) => ContentType::Performer,
            ScrapedContent::Movie(_) => ContentType::Movie,
            ScrapedContent::Tag(_) => ContentType::Tag,
        }
    }
}

// ---------------------------------------------------------------------------
// Fragment input
// ---------------------------------------------------------------------------

/// Partial content handed to a fragment scrape. A caller fills in the
/// fragment(s) it has; the scraper completes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeInput {
    pub performer: Option<ScrapedPerformer>,
    pub scene: Option<ScrapedScene>,
    pub gallery: Option<ScrapedGallery>,
}
