//! Structured error cases for the pipeline.
//!
//! Most propagation goes through `anyhow` with context trails; these variants
//! cover the cases callers match on (missing external tools, tool failures,
//! fatal setup problems). Everything converts into `anyhow::Error` at the
//! boundary.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DistillError {
    /// A required external collaborator binary is not on PATH. For the
    /// declaration emitter this is soft-handled before it ever surfaces;
    /// for the transpiler it is a per-file hard failure.
    #[error("external tool `{tool}` is not available: {reason}")]
    MissingTool { tool: &'static str, reason: String },

    /// An external collaborator ran and failed.
    #[error("`{tool}` failed: {stderr}")]
    ToolFailure { tool: &'static str, stderr: String },

    /// Fatal setup failure: the configured source root does not exist.
    #[error("source directory {0} does not exist")]
    MissingSourceDir(PathBuf),

    /// A loader name in the configuration matches no known loader.
    #[error("unknown loader `{0}` (expected one of: markup, script, style)")]
    UnknownLoader(String),
}
