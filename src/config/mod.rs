//! Exporter configuration from `site.toml`.
//!
//! Only the `[export]` section is read; the file is optional.
//!
//! ```toml
//! [export]
//! content = "content"
//! output = "output"
//! article_save_as = "{date:%Y}/{date:%m}/{date:%d}/{slug}/index.html"
//! page_paths = ["pages"]
//! ```
//!
//! Precedence: CLI flag > config file > built-in default. Relative paths
//! from the file are resolved against the file's directory; relative CLI
//! paths stay relative to the working directory.

mod error;

pub use error::ConfigError;

use crate::{
    cli::ExportCli,
    export::{DEFAULT_ARTICLE_SAVE_AS, DEFAULT_PAGE_PATHS, SaveAsPattern},
    log,
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing site.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteToolsConfig {
    /// Markdown export settings
    #[serde(default)]
    pub export: ExportSection,
}

/// `[export]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// Article source directory
    pub content: PathBuf,
    /// Rendered site directory
    pub output: PathBuf,
    /// Where a rendered article lives, relative to `output`
    pub article_save_as: String,
    /// Page directories under `content`, skipped by the exporter
    pub page_paths: Vec<PathBuf>,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            content: PathBuf::from("content"),
            output: PathBuf::from("output"),
            article_save_as: DEFAULT_ARTICLE_SAVE_AS.to_string(),
            page_paths: DEFAULT_PAGE_PATHS.iter().map(PathBuf::from).collect(),
        }
    }
}

impl SiteToolsConfig {
    /// Load the config file (if present) and apply CLI overrides.
    pub fn load(cli: &ExportCli) -> Result<Self, ConfigError> {
        let mut config = if cli.config.is_file() {
            let mut config = Self::from_path(&cli.config)?;
            let root = cli.config.parent().unwrap_or(Path::new(""));
            config.normalize_paths(root);
            config
        } else {
            Self::default()
        };

        config.apply_cli(cli);
        Ok(config)
    }

    /// Parse configuration from a TOML string, returning unknown keys.
    pub fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Load configuration from file path, warning about unknown keys.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            log!("warning"; "unknown fields in {}, ignoring:", path.display());
            for field in &ignored {
                log!("warning"; "- {}", field);
            }
        }

        Ok(config)
    }

    fn normalize_paths(&mut self, root: &Path) {
        self.export.content = root.join(&self.export.content);
        self.export.output = root.join(&self.export.output);
    }

    fn apply_cli(&mut self, cli: &ExportCli) {
        Self::update_option(&mut self.export.content, cli.content.as_ref());
        Self::update_option(&mut self.export.output, cli.output.as_ref());
        Self::update_option(&mut self.export.article_save_as, cli.save_as.as_ref());
    }

    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate the save-as pattern.
    pub fn save_as(&self) -> Result<SaveAsPattern, ConfigError> {
        SaveAsPattern::parse(&self.export.article_save_as)
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }
}
