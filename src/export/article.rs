//! Article sources: metadata header + Markdown body.
//!
//! Sources start with a block of `Key: value` lines, ended by the first blank
//! line:
//!
//! ```text
//! Title: Shipping a sprite sheet
//! Date: 2025-09-19 10:20
//! Slug: sprite-sheet
//! Summary: One file, every icon.
//!
//! Body text...
//! ```

use super::ExportError;
use crate::utils::{date::ArticleDate, slug::slugify};
use rustc_hash::FxHashMap;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// A parsed article ready for export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub source_path: PathBuf,
    pub title: String,
    pub date: ArticleDate,
    pub slug: String,
    pub description: Option<String>,
    pub summary: Option<String>,
    /// Source text after the metadata header, untouched.
    pub body: String,
}

impl Article {
    /// Read and parse an article source file.
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let raw = fs::read_to_string(path).map_err(|e| ExportError::Read(path.to_path_buf(), e))?;
        Self::parse(path, &raw)
    }

    /// Parse an article source. CRLF line endings are read as LF.
    pub fn parse(path: &Path, raw: &str) -> Result<Self, ExportError> {
        let raw = raw.replace("\r\n", "\n");
        let mut meta = parse_metadata(&raw);

        let title = meta
            .remove("title")
            .ok_or_else(|| ExportError::metadata(path, "missing `Title` metadata"))?;
        let date_str = meta
            .remove("date")
            .ok_or_else(|| ExportError::metadata(path, "missing `Date` metadata"))?;
        let date = ArticleDate::parse(&date_str).ok_or_else(|| {
            ExportError::metadata(path, format!("cannot parse `Date` value `{date_str}`"))
        })?;
        let slug = meta
            .remove("slug")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&title));

        // Metadata ends at the first blank line; without one the whole
        // source is treated as body.
        let body = raw.split_once("\n\n").map_or(raw.as_str(), |(_, body)| body);

        Ok(Self {
            source_path: path.to_path_buf(),
            title,
            date,
            slug,
            description: meta.remove("description"),
            summary: meta.remove("summary"),
            body: body.to_string(),
        })
    }

    /// Line shown under the date: description, else summary.
    pub fn description_line(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|d| !d.is_empty())
            .or_else(|| self.summary.as_deref().filter(|s| !s.is_empty()))
    }

    /// Render the exported document: title, date, optional description, rule, body.
    pub fn to_markdown(&self) -> String {
        let mut header = format!("# {}\n\n{}", self.title, self.date.ymd());
        if let Some(description) = self.description_line() {
            header.push_str("\n\n");
            header.push_str(description);
        }
        header.push_str("\n\n---");

        format!("{header}\n\n{}", self.body)
    }
}

/// Collect `Key: value` lines up to the first blank line.
///
/// Keys are lowercased. Indented lines continue the previous value.
fn parse_metadata(raw: &str) -> FxHashMap<String, String> {
    let mut meta: FxHashMap<String, String> = FxHashMap::default();
    let mut last_key: Option<String> = None;

    for line in raw.lines() {
        if line.trim().is_empty() {
            break;
        }

        if line.starts_with([' ', '\t'])
            && let Some(value) = last_key.as_ref().and_then(|k| meta.get_mut(k))
        {
            value.push(' ');
            value.push_str(line.trim());
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            break;
        };
        let key = key.trim().to_ascii_lowercase();
        meta.insert(key.clone(), value.trim().to_string());
        last_key = Some(key);
    }

    meta
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "Title: Shipping a sprite sheet\nDate: 2025-09-19 10:20\nSlug: sprite-sheet\nSummary: One file,\n  every icon.\n\nFirst paragraph.\n\nSecond paragraph.\n";

    fn article(raw: &str) -> Article {
        Article::parse(Path::new("content/post.md"), raw).unwrap()
    }

    #[test]
    fn test_parse_metadata_and_body() {
        let a = article(SOURCE);
        assert_eq!(a.title, "Shipping a sprite sheet");
        assert_eq!(a.date, ArticleDate::new(2025, 9, 19, 10, 20, 0));
        assert_eq!(a.slug, "sprite-sheet");
        assert_eq!(a.summary.as_deref(), Some("One file, every icon."));
        assert_eq!(a.description, None);
        assert_eq!(a.body, "First paragraph.\n\nSecond paragraph.\n");
    }

    #[test]
    fn test_keys_are_case_insensitive_and_slug_defaults_to_title() {
        let a = article("TITLE: Hello, World!\ndate: 2024-01-02\n\nBody");
        assert_eq!(a.slug, "hello-world");
        assert_eq!(a.body, "Body");
    }

    #[test]
    fn test_missing_required_metadata() {
        let err = Article::parse(Path::new("a.md"), "Date: 2024-01-02\n\nBody").unwrap_err();
        assert!(err.to_string().contains("Title"));

        let err = Article::parse(Path::new("a.md"), "Title: X\nDate: someday\n\nBody").unwrap_err();
        assert!(err.to_string().contains("someday"));
    }

    #[test]
    fn test_without_blank_line_whole_source_is_body() {
        let raw = "Title: X\nDate: 2024-01-02";
        assert_eq!(article(raw).body, raw);
    }

    #[test]
    fn test_crlf_source_splits_header_from_body() {
        let a = article("Title: X\r\nDate: 2024-01-02\r\n\r\nBody\r\nMore\r\n");
        assert_eq!(a.title, "X");
        assert_eq!(a.date, ArticleDate::from_ymd(2024, 1, 2));
        assert_eq!(a.body, "Body\nMore\n");
    }

    #[test]
    fn test_to_markdown_with_summary() {
        assert_eq!(
            article(SOURCE).to_markdown(),
            "# Shipping a sprite sheet\n\n2025-09-19\n\nOne file, every icon.\n\n---\n\nFirst paragraph.\n\nSecond paragraph.\n"
        );
    }

    #[test]
    fn test_description_wins_over_summary() {
        let a = article("Title: X\nDate: 2024-01-02\nDescription: Desc\nSummary: Sum\n\nBody");
        assert_eq!(a.description_line(), Some("Desc"));
    }

    #[test]
    fn test_to_markdown_without_description() {
        let a = article("Title: X\nDate: 2024-01-02\nDescription:\n\nBody");
        assert_eq!(a.description_line(), None);
        assert_eq!(a.to_markdown(), "# X\n\n2024-01-02\n\n---\n\nBody");
    }
}
