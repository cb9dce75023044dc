use crate::config::{BuildOptions, TransformOptions};
use crate::core::{DeclarationMode, Format};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// CommonJS output (`.js`)
    Cjs,
    /// ES module output (`.mjs`)
    Esm,
}

#[derive(Parser, Debug)]
#[command(name = "distill")]
#[command(about = "Transform a source tree into a distribution tree", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Project root directory
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Working directory the project root is resolved against
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Source directory relative to the project root
    #[arg(short, long, default_value = "src")]
    pub src: String,

    /// Destination directory relative to the project root
    #[arg(long, default_value = "dist")]
    pub dist: String,

    /// Glob pattern selecting source files; prefix with ! to exclude
    /// (repeatable)
    #[arg(long, default_value = "**")]
    pub pattern: Vec<String>,

    /// Output module format
    #[arg(short, long, value_enum, default_value = "esm")]
    pub format: FormatArg,

    /// Emit type declaration files
    #[arg(short = 'd', long)]
    pub declaration: bool,

    /// Restrict declaration emission to these source dialects (e.g. ts)
    #[arg(long = "declaration-only", value_delimiter = ',')]
    pub declaration_only: Option<Vec<String>>,

    /// Override the primary output file extension
    #[arg(long)]
    pub ext: Option<String>,

    /// JSX handling mode (transform|preserve|automatic)
    #[arg(long)]
    pub jsx: Option<String>,

    /// JSX factory (h|React.createElement)
    #[arg(long = "jsx-factory")]
    pub jsx_factory: Option<String>,

    /// JSX fragment (Fragment|React.Fragment)
    #[arg(long = "jsx-fragment")]
    pub jsx_fragment: Option<String>,

    /// Loaders to enable, in dispatch order (markup,script,style)
    #[arg(long, value_delimiter = ',')]
    pub loaders: Option<Vec<String>>,

    /// Minify output files
    #[arg(long)]
    pub minify: bool,

    /// Target environment for the transpiler
    #[arg(long)]
    pub target: Option<String>,

    /// Alias map as a JSON object, forwarded to module-syntax conversion
    #[arg(long)]
    pub alias: Option<String>,
}

impl Cli {
    pub fn into_options(self) -> Result<BuildOptions> {
        let cwd = match self.cwd {
            Some(cwd) => cwd,
            None => std::env::current_dir().context("failed to resolve working directory")?,
        };

        let declaration = if let Some(dialects) = self.declaration_only {
            DeclarationMode::Dialects(dialects)
        } else if self.declaration {
            DeclarationMode::Enabled
        } else {
            DeclarationMode::Disabled
        };

        let alias: BTreeMap<String, String> = match self.alias {
            Some(raw) => {
                serde_json::from_str(&raw).context("--alias must be a JSON object of strings")?
            }
            None => BTreeMap::new(),
        };

        Ok(BuildOptions {
            root_dir: cwd.join(self.dir),
            src_dir: self.src,
            dist_dir: self.dist,
            pattern: self.pattern,
            format: match self.format {
                FormatArg::Cjs => Format::Cjs,
                FormatArg::Esm => Format::Esm,
            },
            ext: self.ext,
            declaration,
            loaders: self.loaders,
            transform: TransformOptions {
                jsx: self.jsx,
                jsx_factory: self.jsx_factory,
                jsx_fragment: self.jsx_fragment,
                minify: self.minify,
                target: self.target,
                alias,
            },
        })
    }
}
