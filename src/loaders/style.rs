//! Stylesheet loader: `.css` passes through, `.scss`/`.sass` compile
//! through the external `sass` binary.

use super::{Loader, LoaderContext};
use crate::core::{InputFile, OutputFile};
use crate::errors::DistillError;
use crate::transform::pipe_through;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::OnceLock;
use which::which;

pub struct StyleLoader {
    binary: OnceLock<std::result::Result<PathBuf, String>>,
}

impl StyleLoader {
    pub fn new() -> Self {
        Self {
            binary: OnceLock::new(),
        }
    }
}

impl Default for StyleLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader for StyleLoader {
    fn name(&self) -> &'static str {
        "style"
    }

    fn load(&self, input: &InputFile, _ctx: &LoaderContext) -> Result<Option<Vec<OutputFile>>> {
        match input.extension.as_str() {
            ".css" => Ok(Some(vec![OutputFile {
                contents: input.read()?.to_string(),
                path: input.path.clone(),
                extension: ".css".to_string(),
                src_path: input.src_path.clone(),
                declaration: false,
            }])),
            ".scss" | ".sass" => {
                let contents = input.read()?;
                let probed = self
                    .binary
                    .get_or_init(|| which("sass").map_err(|e| e.to_string()));
                let binary = probed.as_ref().map_err(|reason| DistillError::MissingTool {
                    tool: "sass",
                    reason: reason.clone(),
                })?;
                let mut args = vec!["--stdin".to_string(), "--no-source-map".to_string()];
                if input.extension == ".sass" {
                    args.push("--indented".to_string());
                }
                let compiled = pipe_through("sass", binary, &args, contents)
                    .with_context(|| format!("failed to compile {}", input.path))?;
                Ok(Some(vec![OutputFile {
                    contents: compiled,
                    path: input.path.clone(),
                    extension: ".css".to_string(),
                    src_path: input.src_path.clone(),
                    declaration: false,
                }]))
            }
            _ => Ok(None),
        }
    }
}
