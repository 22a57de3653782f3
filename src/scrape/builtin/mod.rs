//! Built-in scrapers registered ahead of the definitions directory.
//!
//! Each submodule implements the [`Scraper`](super::scraper::Scraper) trait
//! directly, without going through the definition parser.

pub mod autotag;
pub mod tmdb;

pub use autotag::{AutoTagScraper, AUTOTAG_SCRAPER_ID};
pub use tmdb::{TmdbScraper, TMDB_SCRAPER_ID};
