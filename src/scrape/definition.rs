//! The scraper-definition seam.
//!
//! Definition files are parsed by an injected [`DefinitionParser`]; the
//! registry only walks the directory tree and feeds matching files through
//! it. The definition format and its semantics are the parser's business.

use std::path::Path;
use std::sync::Arc;

use super::scraper::Scraper;

/// Parses one scraper definition file into a ready-to-dispatch scraper.
pub trait DefinitionParser: Send + Sync {
    /// Whether `path` is a definition file this parser understands.
    fn matches(&self, path: &Path) -> bool {
        matches!(path.extension().and_then(|e| e.to_str()), Some("yml"))
    }

    /// Parse the file at `path`. A parse failure skips that file; it never
    /// aborts the registry load.
    fn parse_file(&self, path: &Path) -> anyhow::Result<Arc<dyn Scraper>>;
}
