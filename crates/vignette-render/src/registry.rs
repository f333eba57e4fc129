//! Per-format template discovery over ordered search paths.
//!
//! A [`FormatRegistry`] maps resolution names to template files for one
//! output format. Template files carry the format in their name:
//! `greeting.html.jinja` resolves to `"greeting"` for the `html` format and
//! is invisible to every other format. Files in subdirectories resolve by
//! their relative path: `users/show.html.jinja` → `"users/show"`.
//!
//! # Resolution rules
//!
//! 1. Search paths are walked in configuration order; the first path that
//!    provides a name wins. Later paths cannot shadow it.
//! 2. Within one path, files sharing a base name are disambiguated by
//!    extension priority (see [`TEMPLATE_EXTENSIONS`]).
//!
//! Directory entries are visited in sorted order so registry construction
//! is deterministic regardless of filesystem enumeration order.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::RenderError;
use crate::path::TemplatePath;

/// Recognized template file extensions in priority order.
///
/// When multiple files exist with the same base name but different
/// extensions, the extension appearing earlier in this list takes
/// precedence.
pub const TEMPLATE_EXTENSIONS: &[&str] = &[".jinja", ".jinja2", ".j2", ".txt"];

/// A template file discovered during directory walking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Resolution name: relative path minus format and extension suffix.
    pub name: String,
    /// Absolute path to the file.
    pub path: PathBuf,
    /// Extension priority (index into [`TEMPLATE_EXTENSIONS`]).
    priority: usize,
}

/// Walks a directory tree, collecting template files for one format.
///
/// Only files whose name ends in `.<format>.<ext>` for a recognized
/// extension are collected. Returns files sorted by resolution name.
pub fn walk_format_dir(root: &Path, format: &str) -> io::Result<Vec<TemplateFile>> {
    let mut files = Vec::new();
    walk_into(root, root, format, &mut files)?;
    files.sort_by(|a, b| a.name.cmp(&b.name).then(a.priority.cmp(&b.priority)));
    Ok(files)
}

fn walk_into(
    root: &Path,
    dir: &Path,
    format: &str,
    files: &mut Vec<TemplateFile>,
) -> io::Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<io::Result<_>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            walk_into(root, &path, format, files)?;
        } else if let Some(file) = classify(root, &path, format) {
            files.push(file);
        }
    }
    Ok(())
}

/// Matches a file against the `.<format>.<ext>` naming scheme.
fn classify(root: &Path, path: &Path, format: &str) -> Option<TemplateFile> {
    let relative = path.strip_prefix(root).ok()?.to_string_lossy().replace('\\', "/");

    for (priority, ext) in TEMPLATE_EXTENSIONS.iter().enumerate() {
        let suffix = format!(".{format}{ext}");
        if let Some(name) = relative.strip_suffix(&suffix) {
            if name.is_empty() {
                return None;
            }
            return Some(TemplateFile {
                name: name.to_string(),
                path: path.to_path_buf(),
                priority,
            });
        }
    }
    None
}

/// Resolution map from template name to file, for one format.
#[derive(Debug, Default)]
pub struct FormatRegistry {
    entries: Vec<(String, PathBuf)>,
    index: HashMap<String, usize>,
}

impl FormatRegistry {
    /// Builds a registry by walking each search path in order.
    ///
    /// A search path that does not exist or is not a directory is an error:
    /// silently skipping it would make a misconfigured path indistinguishable
    /// from an empty one.
    pub fn from_paths(paths: &[TemplatePath], format: &str) -> Result<Self, RenderError> {
        let mut registry = Self::default();

        for path in paths {
            let dir = path.as_path();
            if !dir.is_dir() {
                return Err(RenderError::Operation(format!(
                    "template path is not a directory: {}",
                    dir.display()
                )));
            }

            let files = walk_format_dir(dir, format).map_err(|e| {
                RenderError::Operation(format!(
                    "failed to walk template path {}: {e}",
                    dir.display()
                ))
            })?;

            for file in files {
                registry.insert_if_absent(file);
            }
        }

        Ok(registry)
    }

    /// Inserts a file unless its name is already taken.
    ///
    /// `walk_format_dir` returns same-name files in extension-priority
    /// order, so within a directory the higher-priority extension lands
    /// first; across directories this makes the earlier search path win.
    fn insert_if_absent(&mut self, file: TemplateFile) {
        if self.index.contains_key(&file.name) {
            return;
        }
        self.index.insert(file.name.clone(), self.entries.len());
        self.entries.push((file.name, file.path));
    }

    /// Iterates `(name, path)` entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), p.as_path()))
    }

    /// True if the registry resolves the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of resolvable templates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no templates were discovered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_template_file(dir: &Path, relative_path: &str, content: &str) {
        let full_path = dir.join(relative_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let mut file = fs::File::create(&full_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_walk_collects_format_files_only() {
        let dir = TempDir::new().unwrap();
        create_template_file(dir.path(), "greeting.html.jinja", "hi");
        create_template_file(dir.path(), "greeting.json.jinja", "{}");
        create_template_file(dir.path(), "notes.txt", "not a template");

        let files = walk_format_dir(dir.path(), "html").unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["greeting"]);
    }

    #[test]
    fn test_walk_nested_names_use_forward_slashes() {
        let dir = TempDir::new().unwrap();
        create_template_file(dir.path(), "users/show.html.jinja", "user");
        create_template_file(dir.path(), "users/_row.html.jinja", "row");

        let files = walk_format_dir(dir.path(), "html").unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["users/_row", "users/show"]);
    }

    #[test]
    fn test_extension_priority_within_directory() {
        let dir = TempDir::new().unwrap();
        create_template_file(dir.path(), "config.html.j2", "from j2");
        create_template_file(dir.path(), "config.html.jinja", "from jinja");

        let registry =
            FormatRegistry::from_paths(&[TemplatePath::new(dir.path())], "html").unwrap();
        let (_, path) = registry.iter().next().unwrap();
        assert!(path.to_string_lossy().ends_with("config.html.jinja"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_earlier_search_path_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        create_template_file(first.path(), "greeting.html.jinja", "first");
        create_template_file(second.path(), "greeting.html.jinja", "second");
        create_template_file(second.path(), "extra.html.jinja", "only in second");

        let paths = [
            TemplatePath::new(first.path()),
            TemplatePath::new(second.path()),
        ];
        let registry = FormatRegistry::from_paths(&paths, "html").unwrap();

        assert_eq!(registry.len(), 2);
        let (_, path) = registry
            .iter()
            .find(|(name, _)| *name == "greeting")
            .unwrap();
        assert!(path.starts_with(first.path()));
        assert!(registry.contains("extra"));
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let result = FormatRegistry::from_paths(
            &[TemplatePath::new("/nonexistent/template/path")],
            "html",
        );
        assert!(matches!(result, Err(RenderError::Operation(_))));
    }

    #[test]
    fn test_bare_format_suffix_is_not_a_template() {
        let dir = TempDir::new().unwrap();
        create_template_file(dir.path(), ".html.jinja", "nameless");

        let files = walk_format_dir(dir.path(), "html").unwrap();
        assert!(files.is_empty());
    }
}
