//! Template lookup across ordered search roots.

use anyhow::Result;
use std::path::{Path, PathBuf};
use strsim::levenshtein;
use walkdir::WalkDir;

use crate::constants::{BLOCKS_DIR, BUILD_DIR, TEMPLATE_EXTENSION};
use crate::core::StrataError;

/// Maximum edit distance, as a percentage of the name length, for a "did you
/// mean" suggestion.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// One directory searched for templates, with the blocks directory checked
/// before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRoot {
    pub dir: PathBuf,
    pub blocks_dir: PathBuf,
}

impl SearchRoot {
    /// A root whose blocks live in `<dir>/blocks`.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        let blocks_dir = dir.join(BLOCKS_DIR);
        Self {
            dir,
            blocks_dir,
        }
    }

    /// A root whose blocks live in a configured directory.
    #[must_use]
    pub fn with_blocks_dir(dir: PathBuf, blocks_dir: PathBuf) -> Self {
        Self {
            dir,
            blocks_dir,
        }
    }
}

impl From<PathBuf> for SearchRoot {
    fn from(dir: PathBuf) -> Self {
        Self::new(dir)
    }
}

/// Resolves bare template names (`postgres`, `db/replica`) to source files.
///
/// Roots are tried in order. Within a root, the blocks directory (by default
/// `<root>/blocks`) is checked before `<root>/<name>.yml.tpl`, so reusable
/// blocks and top-level stacks can share one namespace.
#[derive(Debug, Clone)]
pub struct TemplateLocator {
    roots: Vec<SearchRoot>,
}

impl TemplateLocator {
    /// Create a locator over `roots`. Duplicate roots are dropped, keeping the
    /// first occurrence.
    #[must_use]
    pub fn new<R: Into<SearchRoot>>(roots: impl IntoIterator<Item = R>) -> Self {
        let mut unique: Vec<SearchRoot> = Vec::new();
        for root in roots.into_iter().map(Into::into) {
            if !unique.iter().any(|seen| seen.dir == root.dir) {
                unique.push(root);
            }
        }
        Self {
            roots: unique,
        }
    }

    /// Search roots in lookup order
    #[must_use]
    pub fn roots(&self) -> &[SearchRoot] {
        &self.roots
    }

    /// Every path checked for `name`, in lookup order.
    #[must_use]
    pub fn candidates(&self, name: &str) -> Vec<PathBuf> {
        let file_name = format!("{name}{TEMPLATE_EXTENSION}");
        self.roots
            .iter()
            .flat_map(|root| [root.blocks_dir.join(&file_name), root.dir.join(&file_name)])
            .collect()
    }

    /// Locate the source file of `name`.
    ///
    /// # Errors
    ///
    /// [`StrataError::TemplateNotFound`] listing every searched path.
    pub fn locate(&self, name: &str) -> Result<PathBuf> {
        let candidates = self.candidates(name);
        if let Some(found) = candidates.iter().find(|path| path.is_file()) {
            tracing::debug!("Located template '{}' at {}", name, found.display());
            return Ok(found.clone());
        }

        Err(StrataError::TemplateNotFound {
            name: name.to_string(),
            suggestion: self.suggest(name),
            searched: candidates,
        }
        .into())
    }

    /// Names of every template reachable from the roots.
    ///
    /// The project build workspace is skipped; the blocks directory is walked
    /// as its own base so block names carry no prefix.
    #[must_use]
    pub fn available(&self) -> Vec<String> {
        let mut names = Vec::new();
        for root in &self.roots {
            for base in [&root.blocks_dir, &root.dir] {
                collect_names(base, &root.blocks_dir, &mut names);
            }
        }
        names.sort();
        names.dedup();
        names
    }

    fn suggest(&self, name: &str) -> Option<String> {
        let limit = name.len() * SIMILARITY_THRESHOLD_PERCENT / 100;
        self.available()
            .into_iter()
            .map(|candidate| (levenshtein(name, &candidate), candidate))
            .filter(|(distance, _)| *distance <= limit)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, candidate)| candidate)
    }
}

fn collect_names(base: &Path, blocks_dir: &Path, names: &mut Vec<String>) {
    let walker = WalkDir::new(base)
        .min_depth(1)
        .max_depth(3)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() != 1
                || (entry.file_name() != BUILD_DIR
                    && entry.file_name() != BLOCKS_DIR
                    && entry.path() != blocks_dir)
        });

    for entry in walker.filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(base) else {
            continue;
        };
        let relative = relative.to_string_lossy().replace('\\', "/");
        if let Some(name) = relative.strip_suffix(TEMPLATE_EXTENSION) {
            names.push(name.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "x: 1\n").unwrap();
    }

    #[test]
    fn test_blocks_dir_wins_within_a_root() {
        let temp = tempdir().unwrap();
        touch(&temp.path().join("blocks/db.yml.tpl"));
        touch(&temp.path().join("db.yml.tpl"));

        let locator = TemplateLocator::new(vec![temp.path().to_path_buf()]);
        assert_eq!(locator.locate("db").unwrap(), temp.path().join("blocks/db.yml.tpl"));
    }

    #[test]
    fn test_earlier_root_wins() {
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        touch(&first.path().join("db.yml.tpl"));
        touch(&second.path().join("blocks/db.yml.tpl"));

        let locator =
            TemplateLocator::new(vec![first.path().to_path_buf(), second.path().to_path_buf()]);
        assert_eq!(locator.locate("db").unwrap(), first.path().join("db.yml.tpl"));
    }

    #[test]
    fn test_nested_names() {
        let temp = tempdir().unwrap();
        touch(&temp.path().join("blocks/db/replica.yml.tpl"));

        let locator = TemplateLocator::new(vec![temp.path().to_path_buf()]);
        assert_eq!(
            locator.locate("db/replica").unwrap(),
            temp.path().join("blocks/db/replica.yml.tpl")
        );
    }

    #[test]
    fn test_not_found_lists_candidates_and_suggests() {
        let temp = tempdir().unwrap();
        touch(&temp.path().join("blocks/postgres.yml.tpl"));
        touch(&temp.path().join("build/postgress.yml.tpl"));

        let locator = TemplateLocator::new(vec![temp.path().to_path_buf()]);
        let err = locator.locate("postgre").unwrap_err();
        match err.downcast_ref::<StrataError>() {
            Some(StrataError::TemplateNotFound {
                name,
                searched,
                suggestion,
            }) => {
                assert_eq!(name, "postgre");
                assert_eq!(searched.len(), 2);
                assert_eq!(suggestion.as_deref(), Some("postgres"));
            }
            other => panic!("Expected TemplateNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_roots_are_collapsed() {
        let locator = TemplateLocator::new(vec![
            PathBuf::from("/a"),
            PathBuf::from("/b"),
            PathBuf::from("/a"),
        ]);
        let dirs: Vec<&Path> = locator.roots().iter().map(|root| root.dir.as_path()).collect();
        assert_eq!(dirs, [Path::new("/a"), Path::new("/b")]);
        assert_eq!(locator.candidates("x").len(), 4);
    }

    #[test]
    fn test_configured_blocks_dir() {
        let temp = tempdir().unwrap();
        touch(&temp.path().join("lib/cache/redis.yml.tpl"));
        touch(&temp.path().join("blocks/redis.yml.tpl"));

        let root = SearchRoot::with_blocks_dir(temp.path().to_path_buf(), temp.path().join("lib"));
        let locator = TemplateLocator::new([root]);
        assert_eq!(
            locator.locate("cache/redis").unwrap(),
            temp.path().join("lib/cache/redis.yml.tpl")
        );
        assert_eq!(
            locator.candidates("redis"),
            vec![temp.path().join("lib/redis.yml.tpl"), temp.path().join("redis.yml.tpl")]
        );
        assert!(locator.available().contains(&"cache/redis".to_string()));
        assert!(!locator.available().contains(&"lib/cache/redis".to_string()));
    }
}
