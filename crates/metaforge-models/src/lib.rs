//! Metaforge-Models: entity models and storage contracts.
//!
//! This crate provides the storage-side types consumed by the scraper engine:
//!
//! - **Entities**: Scenes, galleries, performers, studios, tags, and movies
//! - **Repository ports**: Finder and query traits the engine dispatches through
//! - **Transactions**: The read-transaction contract storage backends implement
//! - **Error Handling**: Common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use metaforge_models::{Error, Result, Scene};
//!
//! fn example() -> Result<Scene> {
//!     Err(Error::not_found("scene 42"))
//! }
//! ```

pub mod entities;
pub mod error;
pub mod repository;
pub mod txn;

pub use entities::*;
pub use error::{Error, Result};
pub use repository::{
    GalleryFinder, MovieNameFinder, PerformerQuerier, SceneFinder, StudioQuerier, TagQuerier,
};
pub use txn::{TxnManager, TxnWork};
