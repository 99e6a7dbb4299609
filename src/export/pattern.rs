//! Save-as patterns such as `{date:%Y}/{date:%m}/{date:%d}/{slug}/index.html`.

use super::{ExportError, article::Article};
use regex::Regex;
use std::{path::PathBuf, sync::LazyLock};

/// Default location of a rendered article, relative to the output directory.
pub const DEFAULT_ARTICLE_SAVE_AS: &str = "{date:%Y}/{date:%m}/{date:%d}/{slug}/index.html";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("placeholder regex is valid"));

/// A validated save-as pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveAsPattern {
    raw: String,
}

impl Default for SaveAsPattern {
    fn default() -> Self {
        Self {
            raw: DEFAULT_ARTICLE_SAVE_AS.to_string(),
        }
    }
}

impl SaveAsPattern {
    /// Validate every placeholder up front so rendering cannot fail.
    pub fn parse(raw: &str) -> Result<Self, ExportError> {
        let invalid = |message: String| ExportError::Pattern {
            pattern: raw.to_string(),
            message,
        };

        if raw.trim().is_empty() {
            return Err(invalid("pattern is empty".into()));
        }

        for caps in PLACEHOLDER.captures_iter(raw) {
            let name = &caps[1];
            match name.strip_prefix("date:") {
                Some(format) => check_date_format(format).map_err(invalid)?,
                None if name == "slug" => {}
                None => return Err(invalid(format!("unknown placeholder `{{{name}}}`"))),
            }
        }

        Ok(Self {
            raw: raw.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Expand the pattern for one article.
    pub fn render(&self, article: &Article) -> String {
        PLACEHOLDER
            .replace_all(&self.raw, |caps: &regex::Captures<'_>| {
                let name = &caps[1];
                match name.strip_prefix("date:") {
                    Some(format) => format_date(format, article),
                    None => article.slug.clone(),
                }
            })
            .into_owned()
    }

    /// Where the Markdown copy of an article goes, relative to the output directory.
    pub fn markdown_path(&self, article: &Article) -> PathBuf {
        markdown_path_for(&self.render(article))
    }
}

/// `2025/09/19/slug/index.html` -> `2025/09/19/slug.md`; `slug.html` -> `slug.md`.
pub fn markdown_path_for(save_as: &str) -> PathBuf {
    match save_as.strip_suffix("/index.html") {
        Some(dir) => PathBuf::from(format!("{dir}.md")),
        None => PathBuf::from(save_as).with_extension("md"),
    }
}

fn check_date_format(format: &str) -> Result<(), String> {
    let mut chars = format.chars();
    while let Some(ch) = chars.next() {
        if ch != '%' {
            continue;
        }
        match chars.next() {
            Some('Y' | 'm' | 'd' | 'H' | 'M' | 'S') => {}
            Some(other) => return Err(format!("unsupported date conversion `%{other}`")),
            None => return Err("dangling `%` in date format".into()),
        }
    }
    Ok(())
}

fn format_date(format: &str, article: &Article) -> String {
    let mut out = String::with_capacity(format.len() + 4);
    let mut chars = format.chars();
    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        if let Some(spec) = chars.next()
            && let Some(rendered) = article.date.format_spec(spec)
        {
            out.push_str(&rendered);
        }
    }
    out
}
