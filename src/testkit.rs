//! Test support: in-memory collaborator implementations so tests never
//! shell out to esbuild, tsc or sass.

use crate::config::TransformOptions;
use crate::declarations::DeclarationBackend;
use crate::transform::{Dialect, SyntaxTransform};
use anyhow::{bail, Result};

/// Syntax transformer that tags the source instead of transpiling it, so
/// tests can assert which stages ran.
pub struct RecordingTransform;

impl SyntaxTransform for RecordingTransform {
    fn transpile(
        &self,
        source: &str,
        dialect: Dialect,
        _options: &TransformOptions,
    ) -> Result<String> {
        Ok(format!("/* transpiled:{dialect:?} */\n{source}"))
    }

    fn to_cjs(&self, source: &str, _options: &TransformOptions) -> Result<String> {
        Ok(format!("/* cjs */\n{source}"))
    }
}

/// Transformer whose every call fails, for hard-failure policy tests.
pub struct FailingTransform;

impl SyntaxTransform for FailingTransform {
    fn transpile(
        &self,
        _source: &str,
        _dialect: Dialect,
        _options: &TransformOptions,
    ) -> Result<String> {
        bail!("transform failed")
    }

    fn to_cjs(&self, _source: &str, _options: &TransformOptions) -> Result<String> {
        bail!("transform failed")
    }
}

/// Declaration backend returning a canned declaration for every source.
pub struct StaticDeclarations {
    text: String,
}

impl StaticDeclarations {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl DeclarationBackend for StaticDeclarations {
    fn emit(&self, _source: &str, _path: &str) -> Result<String> {
        Ok(self.text.clone())
    }
}

/// Declaration backend that always errors, exercising the soft-failure path.
pub struct FailingDeclarations;

impl DeclarationBackend for FailingDeclarations {
    fn emit(&self, _source: &str, _path: &str) -> Result<String> {
        bail!("declaration backend exploded")
    }
}
