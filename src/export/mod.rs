//! Markdown export of articles.
//!
//! Writes a plain Markdown copy of every article next to its rendered page,
//! so `2025/09/19/slug/index.html` gets a sibling `2025/09/19/slug.md`.
//! The copy carries a small header (title, date, description) followed by
//! the article body with its metadata block removed.
//!
//! Only articles are exported. Sources under the page directories
//! (`pages/` unless configured otherwise) are static pages, which carry no
//! date and are skipped.

mod article;
mod error;
mod pattern;

pub use article::Article;
pub use error::ExportError;
pub use pattern::{DEFAULT_ARTICLE_SAVE_AS, SaveAsPattern, markdown_path_for};

use crate::debug;
use jwalk::WalkDir;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Extension of article sources.
pub const ARTICLE_EXTENSION: &str = "md";

/// Directories under the content root that hold pages, not articles.
pub const DEFAULT_PAGE_PATHS: &[&str] = &["pages"];

/// One written Markdown file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exported {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Exports every article under a content directory.
#[derive(Debug, Clone)]
pub struct MarkdownExporter {
    content_dir: PathBuf,
    output_dir: PathBuf,
    save_as: SaveAsPattern,
    page_paths: Vec<PathBuf>,
}

impl MarkdownExporter {
    pub fn new(
        content_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        save_as: SaveAsPattern,
    ) -> Self {
        Self {
            content_dir: content_dir.into(),
            output_dir: output_dir.into(),
            save_as,
            page_paths: DEFAULT_PAGE_PATHS.iter().map(PathBuf::from).collect(),
        }
    }

    /// Replace the page directories, relative to the content directory.
    pub fn with_page_paths(mut self, page_paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.page_paths = page_paths.into_iter().collect();
        self
    }

    /// Export all articles, stopping at the first failure.
    pub fn export_all(&self) -> Result<Vec<Exported>, ExportError> {
        let sources = discover_articles(&self.content_dir, &self.page_paths)?;
        debug!("export"; "found {} article(s) in {}", sources.len(), self.content_dir.display());

        sources
            .iter()
            .map(|path| {
                let article = Article::load(path)?;
                self.write_markdown(&article)
            })
            .collect()
    }

    /// Write one article's Markdown copy under the output directory.
    pub fn write_markdown(&self, article: &Article) -> Result<Exported, ExportError> {
        let output = self.output_dir.join(self.save_as.markdown_path(article));

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|e| ExportError::Write(parent.to_path_buf(), e))?;
        }
        fs::write(&output, article.to_markdown())
            .map_err(|e| ExportError::Write(output.clone(), e))?;

        debug!("export"; "{} -> {}", article.source_path.display(), output.display());
        Ok(Exported {
            source: article.source_path.clone(),
            output,
        })
    }
}

/// Every article source under `dir`, recursively, sorted by path.
///
/// Files below any of `page_paths` (relative to `dir`) are skipped. A
/// directory that cannot be walked is an error rather than a silent gap.
pub fn discover_articles(
    dir: &Path,
    page_paths: &[PathBuf],
) -> Result<Vec<PathBuf>, ExportError> {
    fs::read_dir(dir).map_err(|e| ExportError::Read(dir.to_path_buf(), e))?;

    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| {
            ExportError::Read(dir.to_path_buf(), io::Error::other(e.to_string()))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let is_page = path
            .strip_prefix(dir)
            .is_ok_and(|rel| page_paths.iter().any(|page| rel.starts_with(page)));
        if !is_page && path.extension().is_some_and(|ext| ext == ARTICLE_EXTENSION) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
