//! Source tree enumeration: gitignore-aware walk filtered by glob patterns.

use crate::core::InputFile;
use crate::errors::DistillError;
use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::path::PathBuf;

pub struct SourceWalker {
    root: PathBuf,
    patterns: Vec<String>,
}

impl SourceWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            patterns: vec!["**".to_string()],
        }
    }

    /// Glob patterns relative to the source root; `!`-prefixed entries
    /// exclude.
    pub fn with_patterns(mut self, patterns: Vec<String>) -> Self {
        self.patterns = patterns;
        self
    }

    /// Enumerate source files, sorted by relative path so downstream output
    /// ordering is deterministic.
    pub fn walk(&self) -> Result<Vec<InputFile>> {
        if !self.root.is_dir() {
            return Err(DistillError::MissingSourceDir(self.root.clone()).into());
        }

        let mut includes = Vec::new();
        let mut excludes = Vec::new();
        for raw in &self.patterns {
            if let Some(negated) = raw.strip_prefix('!') {
                excludes.push(
                    glob::Pattern::new(negated)
                        .with_context(|| format!("invalid exclude pattern {raw}"))?,
                );
            } else {
                includes.push(
                    glob::Pattern::new(raw)
                        .with_context(|| format!("invalid include pattern {raw}"))?,
                );
            }
        }

        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .build();
        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let rel = path.strip_prefix(&self.root).unwrap_or(path);
            let rel_str = rel.to_string_lossy().replace('\\', "/");
            if !includes.iter().any(|p| p.matches(&rel_str)) {
                continue;
            }
            if excludes.iter().any(|p| p.matches(&rel_str)) {
                continue;
            }
            let extension = rel
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            files.push(InputFile::from_disk(rel_str, path.to_path_buf(), extension));
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }
}
