//! Resolved build configuration shared read-only across one pipeline run.

use crate::core::{DeclarationMode, Format};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Options for one build run, constructed by the CLI (or library callers)
/// and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Project root directory.
    pub root_dir: PathBuf,
    /// Source directory, relative to `root_dir`.
    pub src_dir: String,
    /// Destination directory, relative to `root_dir`.
    pub dist_dir: String,
    /// Glob patterns selecting source files; `!`-prefixed entries exclude.
    pub pattern: Vec<String>,
    /// Output module format for script artifacts.
    pub format: Format,
    /// Explicit primary output extension override.
    pub ext: Option<String>,
    /// Declaration emission policy.
    pub declaration: DeclarationMode,
    /// Loader selection and dispatch order; `None` uses the default chain.
    pub loaders: Option<Vec<String>>,
    /// Syntax transformer options.
    pub transform: TransformOptions,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            root_dir: PathBuf::from("."),
            src_dir: "src".to_string(),
            dist_dir: "dist".to_string(),
            pattern: vec!["**".to_string()],
            format: Format::default(),
            ext: None,
            declaration: DeclarationMode::default(),
            loaders: None,
            transform: TransformOptions::default(),
        }
    }
}

impl BuildOptions {
    pub fn src_root(&self) -> PathBuf {
        self.root_dir.join(&self.src_dir)
    }

    pub fn dist_root(&self) -> PathBuf {
        self.root_dir.join(&self.dist_dir)
    }
}

/// Options forwarded to the external syntax transformer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// JSX handling mode (`transform` / `preserve` / `automatic`).
    pub jsx: Option<String>,
    /// JSX factory, e.g. `h` or `React.createElement`.
    pub jsx_factory: Option<String>,
    /// JSX fragment, e.g. `Fragment`.
    pub jsx_fragment: Option<String>,
    /// Minify output files.
    pub minify: bool,
    /// Target environment, e.g. `es2020` or `node18`.
    pub target: Option<String>,
    /// Alias map forwarded to module-syntax conversion.
    pub alias: BTreeMap<String, String>,
}
