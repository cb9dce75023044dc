//! Core data model: input descriptors consumed by the loader chain and
//! output descriptors handed to the writer.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

/// Output module format for primary script artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// CommonJS calling convention (`require`/`module.exports`).
    Cjs,
    /// ES module calling convention (`import`/`export`).
    #[default]
    Esm,
}

impl Format {
    pub fn is_cjs(self) -> bool {
        matches!(self, Format::Cjs)
    }
}

/// Declaration emission policy.
///
/// `Dialects` restricts emission to sources whose bare dialect name matches
/// one of the configured entries, so `["ts"]` covers `.ts`, `.mts` and
/// `.cts` sources while leaving `.js`-family sources without declarations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationMode {
    #[default]
    Disabled,
    Enabled,
    Dialects(Vec<String>),
}

impl DeclarationMode {
    /// Whether declarations should be emitted for a source with this extension.
    pub fn wants(&self, extension: &str) -> bool {
        match self {
            DeclarationMode::Disabled => false,
            DeclarationMode::Enabled => true,
            DeclarationMode::Dialects(dialects) => {
                let dialect = crate::resolve::bare_dialect(extension);
                dialects.iter().any(|d| d == dialect)
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, DeclarationMode::Disabled)
    }
}

#[derive(Debug, Clone)]
enum ContentSource {
    /// Read from disk on first use.
    Disk(PathBuf),
    /// Synthetic content, e.g. a script block extracted from markup.
    Text(Arc<str>),
}

/// A single discovered (or synthetic) source file, consumed once by the
/// loader chain.
///
/// Contents are fetched lazily and memoized, so a loader that declines an
/// input never touches the underlying bytes, and recursive loaders share one
/// read with their caller.
#[derive(Debug)]
pub struct InputFile {
    /// Dist-relative virtual path, before output extension resolution.
    pub path: String,
    /// Original on-disk source path. For embedded content this is the
    /// enclosing file's path, which is what module-kind recovery needs.
    pub src_path: Option<PathBuf>,
    /// Source extension including the leading dot.
    pub extension: String,
    source: ContentSource,
    cache: OnceLock<String>,
}

impl InputFile {
    /// Descriptor for a file discovered by the walker.
    pub fn from_disk(
        path: impl Into<String>,
        src_path: PathBuf,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            src_path: Some(src_path.clone()),
            extension: extension.into(),
            source: ContentSource::Disk(src_path),
            cache: OnceLock::new(),
        }
    }

    /// Descriptor for synthetic content, built by a loader for embedded
    /// sub-content of another dialect.
    pub fn from_text(
        path: impl Into<String>,
        src_path: Option<PathBuf>,
        extension: impl Into<String>,
        text: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            path: path.into(),
            src_path,
            extension: extension.into(),
            source: ContentSource::Text(text.into()),
            cache: OnceLock::new(),
        }
    }

    /// Fetch the file text, reading the backing source at most once.
    pub fn read(&self) -> Result<&str> {
        if let Some(text) = self.cache.get() {
            return Ok(text.as_str());
        }
        let text = match &self.source {
            ContentSource::Disk(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
            ContentSource::Text(text) => text.to_string(),
        };
        Ok(self.cache.get_or_init(|| text))
    }
}

/// One output artifact produced by a loader, pending final extension
/// resolution by the writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub contents: String,
    /// Dist-relative path; the writer swaps its trailing extension for
    /// `extension`.
    pub path: String,
    pub extension: String,
    /// Carried through for diagnostics.
    pub src_path: Option<PathBuf>,
    /// Marks a type-declaration sidecar rather than the primary artifact.
    pub declaration: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_mode_dialect_restriction_covers_module_letter_variants() {
        let mode = DeclarationMode::Dialects(vec!["ts".to_string()]);
        assert!(mode.wants(".ts"));
        assert!(mode.wants(".mts"));
        assert!(mode.wants(".cts"));
        assert!(!mode.wants(".js"));
        assert!(!mode.wants(".mjs"));
    }

    #[test]
    fn disabled_mode_wants_nothing() {
        assert!(!DeclarationMode::Disabled.wants(".ts"));
        assert!(DeclarationMode::Enabled.wants(".js"));
    }

    #[test]
    fn synthetic_input_reads_are_memoized() {
        let input = InputFile::from_text("a.ts", None, ".ts", "export {}");
        let first = input.read().unwrap() as *const str;
        let second = input.read().unwrap() as *const str;
        assert_eq!(first, second);
    }

    #[test]
    fn disk_read_failure_surfaces_the_path() {
        let input = InputFile::from_disk(
            "missing.ts",
            PathBuf::from("/nonexistent/missing.ts"),
            ".ts",
        );
        let err = input.read().unwrap_err();
        assert!(format!("{err:#}").contains("missing.ts"));
    }
}
