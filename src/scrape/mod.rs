//! Scraper registry and dispatch.
//!
//! This module loads heterogeneous scraper definitions, indexes them by
//! capability, and routes scrape requests to the right implementation.
//!
//! # Module layout
//!
//! - [`scraper`] -- The polymorphic [`Scraper`] trait, capability traits, and
//!   [`ScraperSpec`] descriptor.
//! - [`content`] -- Content types and the [`ScrapedContent`] sum type.
//! - [`cache`] -- The registry: load/reload, listings, and dispatch.
//! - [`client`] -- Shared HTTP client factory.
//! - [`definition`] -- The injected definition-parser seam.
//! - [`postscrape`] -- Post-scrape normalization hook.
//! - [`builtin`] -- Built-in scrapers (TheMovieDB, auto-tag).
//! - [`error`] -- Dispatch-level error taxonomy.

pub mod builtin;
pub mod cache;
pub mod client;
pub mod content;
pub mod definition;
pub mod error;
pub mod postscrape;
pub mod scraper;

pub use cache::{Cache, Repository};
pub use client::{build_client, MAX_REDIRECTS};
pub use content::{
    ContentType, ScrapeInput, ScrapedContent, ScrapedGallery, ScrapedMovie, ScrapedPerformer,
    ScrapedScene, ScrapedStudio, ScrapedTag,
};
pub use definition::DefinitionParser;
pub use error::ScrapeError;
pub use postscrape::{DefaultPostScrape, PostScrapeFilter};
pub use scraper::{
    FragmentScraper, GalleryScraper, NameScraper, SceneScraper, Scraper, ScraperSpec, UrlScraper,
};
