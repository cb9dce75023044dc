//! Build driver: walk the source tree, fan per-file loading out across a
//! rayon pool, apply the copy-through policy for unhandled files and persist
//! the results.
//!
//! Per-file failures are collected rather than aborting the run; only setup
//! failures (missing source root, unwritable dist root) are fatal.

use crate::config::BuildOptions;
use crate::core::OutputFile;
use crate::declarations::{DeclarationBackend, DeclarationEmitter};
use crate::io::walker::SourceWalker;
use crate::io::writer::{self, WriteOp};
use crate::loaders::LoaderChain;
use crate::transform::{EsbuildCli, SyntaxTransform};
use anyhow::Result;
use log::{debug, error, info};
use rayon::prelude::*;
use std::path::PathBuf;

/// Outcome of one run: the externally observable written-file list plus any
/// per-file failures.
#[derive(Debug)]
pub struct BuildResult {
    /// Absolute paths written, deduplicated, in stable (walk) order.
    pub written_files: Vec<PathBuf>,
    pub failures: Vec<FileFailure>,
}

#[derive(Debug)]
pub struct FileFailure {
    /// Dist-relative path of the input that failed.
    pub path: String,
    pub error: anyhow::Error,
}

/// Configurable pipeline runner. Collaborators default to the external
/// `esbuild`/`tsc` binaries and can be replaced for tests or embedding.
pub struct Builder {
    options: BuildOptions,
    chain: LoaderChain,
    transformer: Box<dyn SyntaxTransform>,
    declarations: DeclarationEmitter,
}

impl Builder {
    pub fn new(options: BuildOptions) -> Result<Self> {
        let chain = match &options.loaders {
            Some(names) => LoaderChain::from_names(names)?,
            None => LoaderChain::with_defaults(),
        };
        Ok(Self {
            options,
            chain,
            transformer: Box::new(EsbuildCli::new()),
            declarations: DeclarationEmitter::new(),
        })
    }

    pub fn with_transformer(mut self, transformer: Box<dyn SyntaxTransform>) -> Self {
        self.transformer = transformer;
        self
    }

    pub fn with_declaration_backend(mut self, backend: Box<dyn DeclarationBackend>) -> Self {
        self.declarations = DeclarationEmitter::with_backend(backend);
        self
    }

    pub fn with_declarations(mut self, declarations: DeclarationEmitter) -> Self {
        self.declarations = declarations;
        self
    }

    pub fn run(&self) -> Result<BuildResult> {
        let inputs = SourceWalker::new(self.options.src_root())
            .with_patterns(self.options.pattern.clone())
            .walk()?;
        info!("processing {} source files", inputs.len());

        let ctx = self
            .chain
            .context(&self.options, self.transformer.as_ref(), &self.declarations);

        // Files are independent; indexed collect keeps walk order.
        let loaded: Vec<Result<Option<Vec<OutputFile>>>> = inputs
            .par_iter()
            .map(|input| ctx.load_file(input))
            .collect();

        let mut ops = Vec::new();
        let mut failures = Vec::new();
        for (input, result) in inputs.iter().zip(loaded) {
            match result {
                Ok(Some(outputs)) => {
                    ops.extend(outputs.into_iter().map(WriteOp::Render));
                }
                Ok(None) => {
                    // No loader recognized this file; ship it verbatim.
                    debug!("copying {} through unchanged", input.path);
                    if let Some(src_path) = &input.src_path {
                        ops.push(WriteOp::Copy {
                            path: input.path.clone(),
                            src_path: src_path.clone(),
                        });
                    }
                }
                Err(err) => {
                    error!("failed to process {}: {err:#}", input.path);
                    failures.push(FileFailure {
                        path: input.path.clone(),
                        error: err,
                    });
                }
            }
        }

        let written_files = writer::write_all(&self.options.dist_root(), &ops)?;
        Ok(BuildResult {
            written_files,
            failures,
        })
    }
}

/// Run one build with the default external collaborators.
pub fn build(options: BuildOptions) -> Result<BuildResult> {
    Builder::new(options)?.run()
}
