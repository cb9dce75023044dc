//! Syntax transformation behind a trait seam.
//!
//! The default implementation shells out to the `esbuild` binary, streaming
//! source over stdin. The binary is located once via PATH probing; a missing
//! binary surfaces as a per-file hard failure for inputs that actually need
//! transforming, so trees of plain JS build without esbuild installed.

use crate::config::TransformOptions;
use crate::errors::DistillError;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::OnceLock;
use which::which;

/// Source dialect hint for the transpiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Js,
    Jsx,
    Ts,
    Tsx,
}

impl Dialect {
    pub fn from_extension(extension: &str) -> Self {
        match crate::resolve::bare_dialect(extension) {
            "ts" => Dialect::Ts,
            "tsx" => Dialect::Tsx,
            "jsx" => Dialect::Jsx,
            _ => Dialect::Js,
        }
    }

    /// Plain JS needs no transpilation; everything else carries types or JSX.
    pub fn needs_transpile(self) -> bool {
        !matches!(self, Dialect::Js)
    }

    fn loader_name(self) -> &'static str {
        match self {
            Dialect::Js => "js",
            Dialect::Jsx => "jsx",
            Dialect::Ts => "ts",
            Dialect::Tsx => "tsx",
        }
    }
}

/// External transpiler collaborator.
pub trait SyntaxTransform: Send + Sync {
    /// Strip types / compile JSX down to plain JS, keeping ES module syntax.
    fn transpile(&self, source: &str, dialect: Dialect, options: &TransformOptions)
        -> Result<String>;

    /// Convert ES module syntax to CommonJS.
    fn to_cjs(&self, source: &str, options: &TransformOptions) -> Result<String>;
}

/// `esbuild` binary wrapper, probed from PATH once and reused.
pub struct EsbuildCli {
    binary: OnceLock<std::result::Result<PathBuf, String>>,
}

impl EsbuildCli {
    pub fn new() -> Self {
        Self {
            binary: OnceLock::new(),
        }
    }

    fn binary(&self) -> Result<&Path> {
        let probed = self
            .binary
            .get_or_init(|| which("esbuild").map_err(|e| e.to_string()));
        match probed {
            Ok(path) => Ok(path.as_path()),
            Err(reason) => Err(DistillError::MissingTool {
                tool: "esbuild",
                reason: reason.clone(),
            }
            .into()),
        }
    }

    fn shared_args(options: &TransformOptions) -> Vec<String> {
        let mut args = Vec::new();
        if options.minify {
            args.push("--minify".to_string());
        }
        if let Some(target) = &options.target {
            args.push(format!("--target={target}"));
        }
        args
    }
}

impl Default for EsbuildCli {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxTransform for EsbuildCli {
    fn transpile(
        &self,
        source: &str,
        dialect: Dialect,
        options: &TransformOptions,
    ) -> Result<String> {
        let mut args = vec![
            format!("--loader={}", dialect.loader_name()),
            "--format=esm".to_string(),
        ];
        if let Some(jsx) = &options.jsx {
            args.push(format!("--jsx={jsx}"));
        }
        if let Some(factory) = &options.jsx_factory {
            args.push(format!("--jsx-factory={factory}"));
        }
        if let Some(fragment) = &options.jsx_fragment {
            args.push(format!("--jsx-fragment={fragment}"));
        }
        args.extend(Self::shared_args(options));
        pipe_through("esbuild", self.binary()?, &args, source)
    }

    fn to_cjs(&self, source: &str, options: &TransformOptions) -> Result<String> {
        let mut args = vec!["--loader=js".to_string(), "--format=cjs".to_string()];
        for (from, to) in &options.alias {
            args.push(format!("--alias:{from}={to}"));
        }
        args.extend(Self::shared_args(options));
        pipe_through("esbuild", self.binary()?, &args, source)
    }
}

/// Run an external tool with `source` on stdin, returning its stdout.
pub(crate) fn pipe_through(
    tool: &'static str,
    binary: &Path,
    args: &[String],
    source: &str,
) -> Result<String> {
    let mut child = Command::new(binary)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn {tool}"))?;

    // Dropping stdin after the write closes the pipe so the tool sees EOF.
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(source.as_bytes())
            .with_context(|| format!("failed to stream source to {tool}"))?;
    }

    let output = child
        .wait_with_output()
        .with_context(|| format!("failed to wait for {tool}"))?;
    if !output.status.success() {
        return Err(DistillError::ToolFailure {
            tool,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }
    String::from_utf8(output.stdout).with_context(|| format!("{tool} produced non-UTF8 output"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_from_extension() {
        assert_eq!(Dialect::from_extension(".ts"), Dialect::Ts);
        assert_eq!(Dialect::from_extension(".mts"), Dialect::Ts);
        assert_eq!(Dialect::from_extension(".tsx"), Dialect::Tsx);
        assert_eq!(Dialect::from_extension(".jsx"), Dialect::Jsx);
        assert_eq!(Dialect::from_extension(".js"), Dialect::Js);
        assert_eq!(Dialect::from_extension(".cjs"), Dialect::Js);
    }

    #[test]
    fn only_plain_js_skips_transpilation() {
        assert!(!Dialect::Js.needs_transpile());
        assert!(Dialect::Ts.needs_transpile());
        assert!(Dialect::Tsx.needs_transpile());
        assert!(Dialect::Jsx.needs_transpile());
    }
}
