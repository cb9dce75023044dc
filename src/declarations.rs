//! Best-effort type-declaration emission through an external type checker.
//!
//! The collaborator may be absent entirely. Availability is probed once and
//! cached; both "not installed" and "ran but failed" degrade to a logged
//! warning and a skipped declaration, never an error, so the primary
//! artifact is always produced.

use anyhow::{bail, Context, Result};
use log::warn;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;
use which::which;

/// A backend capable of turning source text into declaration text.
pub trait DeclarationBackend: Send + Sync {
    /// `path` is the virtual source path; its file name determines the
    /// dialect the backend parses the source as.
    fn emit(&self, source: &str, path: &str) -> Result<String>;
}

enum Backend {
    Available(Box<dyn DeclarationBackend>),
    Unavailable(String),
}

/// Wrapper enforcing the soft-failure policy around a [`DeclarationBackend`].
pub struct DeclarationEmitter {
    backend: OnceLock<Backend>,
}

impl DeclarationEmitter {
    /// Emitter that lazily probes PATH for `tsc` on first use.
    pub fn new() -> Self {
        Self {
            backend: OnceLock::new(),
        }
    }

    /// Emitter with a pre-resolved backend (tests, embedders).
    pub fn with_backend(backend: Box<dyn DeclarationBackend>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(Backend::Available(backend));
        Self { backend: cell }
    }

    /// Emitter that behaves as if the external type checker is missing.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(Backend::Unavailable(reason.into()));
        Self { backend: cell }
    }

    fn backend(&self) -> &Backend {
        self.backend.get_or_init(|| match which("tsc") {
            Ok(path) => Backend::Available(Box::new(TscCli::new(path))),
            Err(err) => Backend::Unavailable(err.to_string()),
        })
    }

    /// Best-effort declaration text for `source`. `None` means "no
    /// declaration", with the cause logged as a warning.
    pub fn emit(&self, source: &str, path: &str) -> Option<String> {
        match self.backend() {
            Backend::Unavailable(reason) => {
                warn!(
                    "skipping declaration for {path}: `tsc` is not available ({reason}); \
                     is typescript installed?"
                );
                None
            }
            Backend::Available(backend) => match backend.emit(source, path) {
                Ok(text) => Some(text),
                Err(err) => {
                    warn!("declaration emission failed for {path}: {err:#}");
                    None
                }
            },
        }
    }
}

impl Default for DeclarationEmitter {
    fn default() -> Self {
        Self::new()
    }
}

/// `tsc` binary backend. Stages the source in a temp directory because tsc
/// only reads from disk, then collects the single declaration file it emits.
pub struct TscCli {
    binary: PathBuf,
}

impl TscCli {
    pub fn new(binary: PathBuf) -> Self {
        Self { binary }
    }
}

impl DeclarationBackend for TscCli {
    fn emit(&self, source: &str, path: &str) -> Result<String> {
        let staging = tempfile::tempdir().context("failed to create staging directory")?;
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let input = staging.path().join(file_name);
        std::fs::write(&input, source)
            .with_context(|| format!("failed to stage {}", input.display()))?;

        let output = Command::new(&self.binary)
            .arg("--declaration")
            .arg("--emitDeclarationOnly")
            .arg("--skipLibCheck")
            .arg("--allowJs")
            .arg("--outDir")
            .arg(staging.path())
            .arg(&input)
            .output()
            .context("failed to run tsc")?;

        // tsc exits non-zero on type errors but may still emit; trust the
        // artifact and only fail when nothing was produced.
        if let Some(declaration) = find_emitted_declaration(staging.path())? {
            return std::fs::read_to_string(&declaration)
                .with_context(|| format!("failed to read {}", declaration.display()));
        }
        bail!(
            "tsc produced no declaration output: {}",
            String::from_utf8_lossy(&output.stdout).trim()
        );
    }
}

fn find_emitted_declaration(dir: &Path) -> Result<Option<PathBuf>> {
    for entry in std::fs::read_dir(dir).context("failed to scan staging directory")? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if crate::resolve::is_declaration_path(&name) {
            return Ok(Some(entry.path()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(&'static str);

    impl DeclarationBackend for Canned {
        fn emit(&self, _source: &str, _path: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct Exploding;

    impl DeclarationBackend for Exploding {
        fn emit(&self, _source: &str, _path: &str) -> Result<String> {
            bail!("host construction failed")
        }
    }

    #[test]
    fn unavailable_backend_degrades_to_none() {
        let emitter = DeclarationEmitter::unavailable("not found on PATH");
        assert_eq!(emitter.emit("export const a = 1", "a.ts"), None);
    }

    #[test]
    fn backend_errors_degrade_to_none() {
        let emitter = DeclarationEmitter::with_backend(Box::new(Exploding));
        assert_eq!(emitter.emit("export const a = 1", "a.ts"), None);
    }

    #[test]
    fn available_backend_text_is_passed_through() {
        let emitter = DeclarationEmitter::with_backend(Box::new(Canned("declare const a: 1;")));
        assert_eq!(
            emitter.emit("export const a = 1", "a.ts").as_deref(),
            Some("declare const a: 1;")
        );
    }
}
