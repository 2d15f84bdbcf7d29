use std::path::{Path, PathBuf};

use nw_core::{Article, Result};
use tracing::debug;

/// Flat JSON array of articles on disk. The ingest run writes it; the
/// articles listing endpoint reads it. Independent of the vector store.
#[derive(Debug, Clone)]
pub struct ArticleSnapshot {
    path: PathBuf,
}

impl ArticleSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file reads as an empty snapshot, matching an instance that
    /// has never ingested.
    pub fn load(&self) -> Result<Vec<Article>> {
        if !self.path.exists() {
            debug!("No article snapshot at {}", self.path.display());
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, articles: &[Article]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(articles)?;
        std::fs::write(&self.path, raw)?;
        debug!(
            "Saved {} articles to {}",
            articles.len(),
            self.path.display()
        );
        Ok(())
    }
}
