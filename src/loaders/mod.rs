//! The loader chain: ordered, pluggable per-dialect transformers.
//!
//! Loaders are trait objects tried in configured order; the first one that
//! accepts an input consumes it exclusively. A loader may re-enter the chain
//! through [`LoaderContext::load_file`] to process embedded sub-content of a
//! different dialect, which is how the markup loader delegates its script
//! block to the script loader without any coupling between the two.

pub mod markup;
pub mod script;
pub mod style;

use crate::config::BuildOptions;
use crate::core::{InputFile, OutputFile};
use crate::declarations::DeclarationEmitter;
use crate::errors::DistillError;
use crate::transform::SyntaxTransform;
use anyhow::Result;
use log::debug;

/// A pluggable per-dialect file transformer.
pub trait Loader: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` declines the input without reading its contents;
    /// `Ok(Some(outputs))` consumes it. Errors are per-file hard failures
    /// and must not affect other files.
    fn load(&self, input: &InputFile, ctx: &LoaderContext) -> Result<Option<Vec<OutputFile>>>;
}

/// Ordered dispatcher over the configured loaders.
pub struct LoaderChain {
    loaders: Vec<Box<dyn Loader>>,
}

impl std::fmt::Debug for LoaderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoaderChain")
            .field(
                "loaders",
                &self.loaders.iter().map(|l| l.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl LoaderChain {
    pub fn new(loaders: Vec<Box<dyn Loader>>) -> Self {
        Self { loaders }
    }

    /// Default order: markup first so `.vue` files never reach the script
    /// loader, then scripts, then stylesheets.
    pub fn with_defaults() -> Self {
        Self::new(vec![
            Box::new(markup::MarkupLoader),
            Box::new(script::ScriptLoader),
            Box::new(style::StyleLoader::new()),
        ])
    }

    /// Chain from configured loader names, preserving the given order.
    pub fn from_names(names: &[String]) -> Result<Self> {
        let mut loaders: Vec<Box<dyn Loader>> = Vec::with_capacity(names.len());
        for name in names {
            match name.as_str() {
                "markup" => loaders.push(Box::new(markup::MarkupLoader)),
                "script" => loaders.push(Box::new(script::ScriptLoader)),
                "style" => loaders.push(Box::new(style::StyleLoader::new())),
                other => return Err(DistillError::UnknownLoader(other.to_string()).into()),
            }
        }
        Ok(Self::new(loaders))
    }

    /// Build the shared read-only context for one top-level pipeline run.
    /// The context captures this chain's entry point, so recursive runs in
    /// concurrent builds never share dispatch state.
    pub fn context<'a>(
        &'a self,
        options: &'a BuildOptions,
        transformer: &'a dyn SyntaxTransform,
        declarations: &'a DeclarationEmitter,
    ) -> LoaderContext<'a> {
        LoaderContext {
            options,
            transformer,
            declarations,
            chain: self,
        }
    }
}

/// Read-only context threaded through one chain invocation and all of its
/// recursive re-entries.
pub struct LoaderContext<'a> {
    pub options: &'a BuildOptions,
    pub transformer: &'a dyn SyntaxTransform,
    pub declarations: &'a DeclarationEmitter,
    chain: &'a LoaderChain,
}

impl LoaderContext<'_> {
    /// Dispatch an input through the chain. `Ok(None)` means no loader
    /// accepted it, which callers treat as "skip", not an error.
    pub fn load_file(&self, input: &InputFile) -> Result<Option<Vec<OutputFile>>> {
        for loader in &self.chain.loaders {
            if let Some(outputs) = loader.load(input, self)? {
                debug!("{} handled {}", loader.name(), input.path);
                return Ok(Some(outputs));
            }
        }
        Ok(None)
    }
}
