//! Source-data template registry
//!
//! The palette of placeable objects: character and item definition files
//! found under the data directory. A template is classified once, by the
//! head name of the first token in its file, and placing it just stamps out
//! a default-initialized thing pointing back at that file.

use std::fs;
use std::path::{Path, PathBuf};

use brawler_core::Thing;
use brawler_token::TokenReader;
use log::warn;

/// What a template file defines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Character,
    Item,
}

/// One placeable source-data file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub path: PathBuf,
    pub kind: TemplateKind,
}

impl Template {
    /// Instantiate this template at block-local coordinates, with the
    /// placement defaults filled in so the thing serializes like any other.
    pub fn spawn(&self, x: i32, y: i32) -> Thing {
        let path = self.path.to_string_lossy().into_owned();
        match self.kind {
            TemplateKind::Character => Thing::new_character(x, y, path),
            TemplateKind::Item => Thing::new_item(x, y, path),
        }
    }
}

/// The templates available for placement
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    templates: Vec<Template>,
}

impl SourceRegistry {
    /// Recursively scan `dir` for `.txt` definition files.
    ///
    /// Files that cannot be read, parsed, or classified are skipped with a
    /// warning - an unreadable template should not keep the palette from
    /// opening.
    pub fn scan(dir: &Path) -> Self {
        let mut registry = Self::default();
        registry.scan_dir(dir);
        registry
            .templates
            .sort_by(|a, b| a.path.cmp(&b.path));
        registry
    }

    fn scan_dir(&mut self, dir: &Path) {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!("skipping {}: {}", dir.display(), err);
                return;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                self.scan_dir(&path);
            } else if path.extension().is_some_and(|ext| ext == "txt") {
                match classify(&path) {
                    Some(kind) => self.templates.push(Template { path, kind }),
                    None => warn!("not a placeable template: {}", path.display()),
                }
            }
        }
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn find(&self, path: &Path) -> Option<&Template> {
        self.templates.iter().find(|t| t.path == path)
    }
}

/// Read the head token of a definition file to decide what it defines
fn classify(path: &Path) -> Option<TemplateKind> {
    let source = fs::read_to_string(path).ok()?;
    let head = TokenReader::new(&source).next_token().ok()??;
    match head.name.as_str() {
        "character" => Some(TemplateKind::Character),
        "item" => Some(TemplateKind::Item),
        _ => None,
    }
}
