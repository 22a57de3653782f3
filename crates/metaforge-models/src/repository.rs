//! Repository ports consumed by the scraper engine.
//!
//! The engine treats storage as a set of opaque query ports. Finders load the
//! entity being re-scraped; the auto-tag query ports return candidate records
//! whose names could plausibly appear in a set of path words (the word-level
//! match is the caller's job, the port only narrows the candidate set).

use async_trait::async_trait;

use crate::entities::{Gallery, Movie, Performer, Scene, Studio, Tag};
use crate::error::Result;

/// Looks up scenes by id.
#[async_trait]
pub trait SceneFinder: Send + Sync {
    async fn find_scene(&self, id: i64) -> Result<Option<Scene>>;
}

/// Looks up galleries by id and resolves their files.
#[async_trait]
pub trait GalleryFinder: Send + Sync {
    async fn find_gallery(&self, id: i64) -> Result<Option<Gallery>>;

    /// Attach the gallery's files. Must be called inside the same read
    /// transaction as the find.
    async fn load_gallery_files(&self, gallery: &mut Gallery) -> Result<()>;
}

/// Candidate query port for performer auto-tagging.
#[async_trait]
pub trait PerformerQuerier: Send + Sync {
    /// Performers whose name or alias could match one of `words`.
    async fn query_auto_tag(&self, words: &[String]) -> Result<Vec<Performer>>;
}

/// Candidate query port for studio auto-tagging.
#[async_trait]
pub trait StudioQuerier: Send + Sync {
    /// Studios whose name or alias could match one of `words`.
    async fn query_auto_tag(&self, words: &[String]) -> Result<Vec<Studio>>;
}

/// Candidate query port for tag auto-tagging.
#[async_trait]
pub trait TagQuerier: Send + Sync {
    /// Tags whose name or alias could match one of `words`.
    async fn query_auto_tag(&self, words: &[String]) -> Result<Vec<Tag>>;
}

/// Movie lookup by exact names.
#[async_trait]
pub trait MovieNameFinder: Send + Sync {
    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Movie>>;
}
