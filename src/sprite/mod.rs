//! SVG sprite sheet generation.
//!
//! Merges a directory of standalone icon files into one hidden `<svg>` that
//! pages embed inline and reference with `<use href="#id">`.
//!
//! # Pipeline
//!
//! ```text
//! icons/*.svg (sorted by name)
//!         │
//!         ▼
//!    ┌─────────┐
//!    │  parse  │ ──► owned element tree per file (parallel)
//!    └────┬────┘
//!         │
//!         ▼
//!    ┌─────────┐
//!    │ symbol  │ ──► <symbol id viewBox>, inherited paint, bare tag names
//!    └────┬────┘
//!         │
//!         ▼
//!    ┌──────────┐
//!    │ assemble │ ──► <svg xmlns style="display: none;"> written atomically
//!    └──────────┘
//! ```
//!
//! The build is all-or-nothing: any bad icon aborts the run before the output
//! file is touched.

mod error;
mod namespace;
mod symbol;
mod tree;

pub use error::SpriteError;
pub use namespace::{local_name, strip_namespaces};
pub use symbol::{INHERITED_ATTRS, MissingViewBox, XLINK_NAMESPACE, icon_to_symbol};
pub use tree::{Element, Node, XmlError, parse};

use crate::debug;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Namespace declared on the sprite root.
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Style that keeps the sprite itself from rendering.
pub const SPRITE_STYLE: &str = "display: none;";

/// Extension of icon files picked up from the input directory.
pub const ICON_EXTENSION: &str = "svg";

/// One normalized icon, tagged with the file it came from.
#[derive(Debug, Clone)]
pub struct Symbol {
    pub id: String,
    pub source: PathBuf,
    pub element: Element,
}

/// Summary of a finished build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub symbols: usize,
    pub output: PathBuf,
}

/// Builds a sprite sheet from an icon directory.
#[derive(Debug, Clone)]
pub struct SpriteBuilder {
    input: PathBuf,
    output: PathBuf,
}

impl SpriteBuilder {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Run the whole pipeline and write the sprite to the output path.
    ///
    /// Nothing is written unless every icon converts; an existing output file
    /// is replaced atomically.
    pub fn build(&self) -> Result<BuildReport, SpriteError> {
        let symbols = self.collect_symbols()?;
        let count = symbols.len();

        let bytes = assemble(symbols)
            .to_xml()
            .map_err(|e| SpriteError::Write(self.output.clone(), e))?;
        write_atomic(&self.output, &bytes)?;

        Ok(BuildReport {
            symbols: count,
            output: self.output.clone(),
        })
    }

    /// Render the sprite without writing it.
    pub fn render(&self) -> Result<Vec<u8>, SpriteError> {
        let symbols = self.collect_symbols()?;
        assemble(symbols)
            .to_xml()
            .map_err(|e| SpriteError::Write(self.output.clone(), e))
    }

    /// Parse and normalize every icon, in file-name order.
    ///
    /// When several icons are bad, the error reported is the one from the
    /// first file in that order.
    pub fn collect_symbols(&self) -> Result<Vec<Symbol>, SpriteError> {
        let files = discover_icons(&self.input)?;
        debug!("sprite"; "found {} icon(s) in {}", files.len(), self.input.display());

        let loaded: Vec<Result<Symbol, SpriteError>> =
            files.par_iter().map(|path| load_symbol(path)).collect();
        let symbols = loaded.into_iter().collect::<Result<Vec<_>, _>>()?;

        ensure_unique_ids(&symbols)?;
        Ok(symbols)
    }
}

/// List icon files directly inside `dir`, sorted by file name.
pub fn discover_icons(dir: &Path) -> Result<Vec<PathBuf>, SpriteError> {
    let entries = fs::read_dir(dir).map_err(|e| SpriteError::InputDir(dir.to_path_buf(), e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| SpriteError::InputDir(dir.to_path_buf(), e))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == ICON_EXTENSION) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Symbol id for an icon file: its name without the extension.
pub fn icon_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read, parse and normalize a single icon file.
pub fn load_symbol(path: &Path) -> Result<Symbol, SpriteError> {
    let source =
        fs::read_to_string(path).map_err(|e| SpriteError::Read(path.to_path_buf(), e))?;

    let icon = parse(&source).map_err(|e| SpriteError::Parse {
        path: path.to_path_buf(),
        position: e.position,
        message: e.message,
    })?;

    let id = icon_id(path);
    let element = icon_to_symbol(icon, &id)
        .map_err(|MissingViewBox| SpriteError::MissingViewBox(path.to_path_buf()))?;

    debug!("sprite"; "{} -> #{}", path.display(), id);
    Ok(Symbol {
        id,
        source: path.to_path_buf(),
        element,
    })
}

fn ensure_unique_ids(symbols: &[Symbol]) -> Result<(), SpriteError> {
    let mut seen: FxHashMap<&str, &Path> = FxHashMap::default();
    for symbol in symbols {
        if let Some(first) = seen.insert(&symbol.id, &symbol.source) {
            return Err(SpriteError::DuplicateId {
                id: symbol.id.clone(),
                first: first.to_path_buf(),
                second: symbol.source.clone(),
            });
        }
    }
    Ok(())
}

/// Wrap symbols in the hidden sprite root, keeping their order.
///
/// Namespace prefixes the symbols use are declared once on the root. A symbol
/// that binds a prefix the root already binds to another URI keeps its own
/// declaration.
pub fn assemble(symbols: Vec<Symbol>) -> Element {
    let mut root = Element::new("svg").with_attr("style", SPRITE_STYLE);
    root.declare_namespace("", SVG_NAMESPACE);

    for symbol in symbols {
        let mut element = symbol.element;
        element.namespaces.retain(|(prefix, uri)| match root.namespace(prefix) {
            Some(bound) => bound != uri.as_str(),
            None => {
                root.declare_namespace(prefix.as_str(), uri.as_str());
                false
            }
        });
        root.push(element);
    }
    root
}

/// Write through a sibling temp file so readers never see a partial sprite.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), SpriteError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| SpriteError::Write(parent.to_path_buf(), e))?;
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "sprite.svg".to_string());
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));

    fs::write(&tmp, bytes).map_err(|e| SpriteError::Write(tmp.clone(), e))?;
    fs::rename(&tmp, path).map_err(|e| {
        fs::remove_file(&tmp).ok();
        SpriteError::Write(path.to_path_buf(), e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HOME: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24" stroke="black">
  <path d="M3 12l9-9 9 9"/>
</svg>"#;

    const STAR: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 20 20" fill="none">
  <path d="M10 1l3 6 6 1-5 4 1 6-5-3-5 3 1-6-5-4 6-1z" fill="gold"/>
</svg>"#;

    fn icon_dir(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    fn build_to_string(input: &Path, output: &Path) -> String {
        SpriteBuilder::new(input, output).build().unwrap();
        fs::read_to_string(output).unwrap()
    }

    #[test]
    fn test_end_to_end_home_and_star() {
        let icons = icon_dir(&[("star.svg", STAR), ("home.svg", HOME)]);
        let out = TempDir::new().unwrap();
        let output = out.path().join("sprite.svg");

        let report = SpriteBuilder::new(icons.path(), &output).build().unwrap();
        assert_eq!(report.symbols, 2);

        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            concat!(
                "<svg xmlns=\"http://www.w3.org/2000/svg\" style=\"display: none;\">\n",
                "  <symbol id=\"home\" viewBox=\"0 0 24 24\">\n",
                "    <path d=\"M3 12l9-9 9 9\" stroke=\"black\"/>\n",
                "  </symbol>\n",
                "  <symbol id=\"star\" viewBox=\"0 0 20 20\">\n",
                "    <path d=\"M10 1l3 6 6 1-5 4 1 6-5-3-5 3 1-6-5-4 6-1z\" fill=\"gold\"/>\n",
                "  </symbol>\n",
                "</svg>\n",
            )
        );
    }

    #[test]
    fn test_ids_match_file_stems_in_name_order() {
        let icons = icon_dir(&[
            ("zeta.svg", HOME),
            ("alpha.svg", HOME),
            ("mid.dot.svg", STAR),
        ]);
        let symbols = SpriteBuilder::new(icons.path(), "unused.svg")
            .collect_symbols()
            .unwrap();
        let ids: Vec<_> = symbols.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["alpha", "mid.dot", "zeta"]);
    }

    #[test]
    fn test_discovery_is_flat_and_extension_exact() {
        let icons = icon_dir(&[("a.svg", HOME), ("notes.txt", "x"), ("b.SVG", HOME)]);
        fs::create_dir(icons.path().join("nested.svg")).unwrap();
        fs::write(icons.path().join("nested.svg").join("c.svg"), HOME).unwrap();

        let files = discover_icons(icons.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.svg"]);
    }

    #[test]
    fn test_missing_viewbox_aborts_without_output() {
        let icons = icon_dir(&[("ok.svg", HOME), ("bad.svg", "<svg><path d=\"M0\"/></svg>")]);
        let out = TempDir::new().unwrap();
        let output = out.path().join("sprite.svg");

        let err = SpriteBuilder::new(icons.path(), &output).build().unwrap_err();
        assert!(matches!(err, SpriteError::MissingViewBox(ref p) if p.ends_with("bad.svg")));
        assert!(!output.exists());
    }

    #[test]
    fn test_failed_run_keeps_previous_output() {
        let icons = icon_dir(&[("home.svg", HOME)]);
        let out = TempDir::new().unwrap();
        let output = out.path().join("sprite.svg");
        let first = build_to_string(icons.path(), &output);

        fs::write(icons.path().join("broken.svg"), "<svg viewBox=\"0 0 1 1\"><path></svg>").unwrap();
        let err = SpriteBuilder::new(icons.path(), &output).build().unwrap_err();
        assert!(matches!(err, SpriteError::Parse { .. }));
        assert_eq!(fs::read_to_string(&output).unwrap(), first);
    }

    #[test]
    fn test_first_bad_icon_in_name_order_is_reported() {
        let icons = icon_dir(&[
            ("a-ok.svg", HOME),
            ("b-no-viewbox.svg", "<svg><path d=\"M0\"/></svg>"),
            ("c-broken.svg", "<svg viewBox=\"0 0 1 1\"><path></svg>"),
            ("d-broken.svg", "<svg"),
        ]);
        for _ in 0..16 {
            let err = SpriteBuilder::new(icons.path(), "s.svg")
                .collect_symbols()
                .unwrap_err();
            assert!(
                matches!(err, SpriteError::MissingViewBox(ref p) if p.ends_with("b-no-viewbox.svg")),
                "unexpected error: {err}"
            );
        }
    }

    #[test]
    fn test_xlink_prefix_resolves_in_written_sprite() {
        use quick_xml::{
            NsReader,
            events::Event,
            name::{Namespace, ResolveResult},
        };

        let arrow = r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 10 10"><defs><path id="g" d="M0 0"/></defs><use xlink:href="#g"/></svg>"##;
        let icons = icon_dir(&[("arrow.svg", arrow), ("home.svg", HOME)]);
        let out = TempDir::new().unwrap();
        let written = build_to_string(icons.path(), &out.path().join("sprite.svg"));
        assert!(written.starts_with(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" style=\"display: none;\">\n"
        ));

        let mut reader = NsReader::from_str(&written);
        let mut hrefs = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) | Event::Empty(e) => {
                    for attr in e.attributes() {
                        let attr = attr.unwrap();
                        let (ns, local) = reader.resolve_attribute(attr.key);
                        if local.as_ref() == b"href" {
                            hrefs.push(matches!(
                                ns,
                                ResolveResult::Bound(Namespace(uri)) if uri == XLINK_NAMESPACE.as_bytes()
                            ));
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }
        assert_eq!(hrefs, [true]);
    }

    #[test]
    fn test_conflicting_prefix_stays_on_symbol() {
        let symbol = |id: &str, uri: &str| {
            let mut element = Element::new("symbol").with_attr("id", id);
            element.declare_namespace("x", uri);
            Symbol {
                id: id.into(),
                source: PathBuf::from(format!("{id}.svg")),
                element,
            }
        };
        let root = assemble(vec![symbol("a", "urn:one"), symbol("b", "urn:two")]);

        assert_eq!(root.namespace("x"), Some("urn:one"));
        let kids: Vec<_> = root.child_elements().collect();
        assert!(kids[0].namespaces.is_empty());
        assert_eq!(kids[1].namespace("x"), Some("urn:two"));
    }

    #[test]
    fn test_missing_input_dir() {
        let out = TempDir::new().unwrap();
        let err = SpriteBuilder::new(out.path().join("nope"), out.path().join("s.svg"))
            .build()
            .unwrap_err();
        assert!(matches!(err, SpriteError::InputDir(..)));
    }

    #[test]
    fn test_output_parent_is_created() {
        let icons = icon_dir(&[("home.svg", HOME)]);
        let out = TempDir::new().unwrap();
        let output = out.path().join("static").join("img").join("sprite.svg");
        build_to_string(icons.path(), &output);
        assert!(output.exists());
    }

    #[test]
    fn test_builds_are_byte_identical() {
        let icons = icon_dir(&[("home.svg", HOME), ("star.svg", STAR), ("a.svg", HOME)]);
        let out = TempDir::new().unwrap();
        let first = build_to_string(icons.path(), &out.path().join("one.svg"));
        let second = build_to_string(icons.path(), &out.path().join("two.svg"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_directory_yields_empty_sprite() {
        let icons = icon_dir(&[]);
        let bytes = SpriteBuilder::new(icons.path(), "s.svg").render().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "<svg xmlns=\"http://www.w3.org/2000/svg\" style=\"display: none;\"/>\n"
        );
    }

    #[test]
    fn test_no_prefixed_tags_in_output() {
        let prefixed = r#"<svg:svg xmlns:svg="http://www.w3.org/2000/svg" viewBox="0 0 1 1"><svg:g><svg:path d="M0"/></svg:g></svg:svg>"#;
        let icons = icon_dir(&[("p.svg", prefixed)]);
        let symbols = SpriteBuilder::new(icons.path(), "s.svg")
            .collect_symbols()
            .unwrap();

        let mut root = assemble(symbols);
        let mut names = Vec::new();
        root.walk_mut(&mut |e| names.push(e.name.clone()));
        assert_eq!(names, ["svg", "symbol", "g", "path"]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let element = Element::new("symbol");
        let symbols = vec![
            Symbol {
                id: "home".into(),
                source: PathBuf::from("a/home.svg"),
                element: element.clone(),
            },
            Symbol {
                id: "home".into(),
                source: PathBuf::from("b/home.svg"),
                element,
            },
        ];
        let err = ensure_unique_ids(&symbols).unwrap_err();
        assert!(matches!(err, SpriteError::DuplicateId { ref id, .. } if id == "home"));
    }

    #[test]
    fn test_icon_id() {
        assert_eq!(icon_id(Path::new("icons/home.svg")), "home");
        assert_eq!(icon_id(Path::new("arrow.left.svg")), "arrow.left");
    }
}
