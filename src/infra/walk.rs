//! Filepath: src/infra/walk.rs
//! Gitignore-aware walker for the articles tree.
//! - Respects .gitignore and global gitignore
//! - Extra ignore globs (early prune + late filter)
//! - Deterministic ordering for stable output and tests
//!
//! Backed by ripgrep's `ignore` crate and `globset`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, WalkBuilder};

/// Walker with optional extra ignore globs. Extra globs are applied in two
/// places:
///   1) Early: prune directories during traversal (filter_entry).
///   2) Late: filter out files that still slipped through.
pub struct FileWalker
{
    /// Compiled set of additional ignore patterns
    ignore_patterns: GlobSet,

    /// Maximum recursion depth; default None (unbounded)
    max_depth: Option<usize>,
}

impl FileWalker
{
    /// Build a walker with additional ignore patterns (e.g., "drafts/**").
    /// Patterns match on relative paths.
    pub fn new(additional_ignores: &[String]) -> Result<Self>
    {
        let mut builder = GlobSetBuilder::new();

        for pattern in additional_ignores
        {
            builder.add(Glob::new(pattern)?);
        }

        Ok(Self { ignore_patterns: builder.build()?, max_depth: None })
    }

    /// (Optional) Limit recursion depth (`None` = unbounded).
    pub fn with_max_depth(
        mut self,
        depth: Option<usize>,
    ) -> Self
    {
        self.max_depth = depth;
        self
    }

    fn build_walk(
        &self,
        root: &Path,
    ) -> WalkBuilder
    {
        let mut b = WalkBuilder::new(root);

        b.git_ignore(true);
        b.git_global(true);
        b.git_exclude(true);
        b.max_depth(self.max_depth);

        // Early directory pruning using extra ignores.
        let extra = self
            .ignore_patterns
            .clone();
        b.filter_entry(move |ent: &DirEntry| {
            let is_dir = ent
                .file_type()
                .map(|ft| ft.is_dir())
                .unwrap_or(false);

            !(is_dir && extra.is_match(ent.path()))
        });

        b
    }

    /// Traverse files under `root`, respecting ignore rules and extra globs.
    /// Returns a sorted list of file paths for determinism.
    pub fn walk_files<P: AsRef<Path>>(
        &self,
        root: P,
    ) -> Vec<PathBuf>
    {
        let root_path = root.as_ref();
        let walker = self
            .build_walk(root_path)
            .build();

        let mut out: Vec<PathBuf> = walker
            .filter_map(|res| res.ok())
            .filter(|entry| {
                entry
                    .file_type()
                    .is_some_and(|ft| ft.is_file())
            })
            .map(|entry| entry.into_path())
            // Late file-level filtering uses the RELATIVE path
            .filter(|abs| {
                let rel = abs
                    .strip_prefix(root_path)
                    .unwrap_or(abs);
                !self
                    .ignore_patterns
                    .is_match(rel)
            })
            .collect();

        out.sort();

        out
    }

    /// Traverse and then apply a caller-provided filter predicate.
    pub fn walk_with_filter<P, F>(
        &self,
        root: P,
        filter: F,
    ) -> Vec<PathBuf>
    where
        P: AsRef<Path>,
        F: Fn(&Path) -> bool,
    {
        self.walk_files(root)
            .into_iter()
            .filter(|p| filter(p))
            .collect()
    }
}
