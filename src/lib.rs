// Export modules for library usage
pub mod build;
pub mod cli;
pub mod config;
pub mod core;
pub mod declarations;
pub mod errors;
pub mod io;
pub mod loaders;
pub mod resolve;
pub mod testkit;
pub mod transform;

// Re-export commonly used types
pub use crate::build::{build, BuildResult, Builder, FileFailure};
pub use crate::config::{BuildOptions, TransformOptions};
pub use crate::core::{DeclarationMode, Format, InputFile, OutputFile};
pub use crate::declarations::{DeclarationBackend, DeclarationEmitter};
pub use crate::errors::DistillError;
pub use crate::loaders::{Loader, LoaderChain, LoaderContext};
pub use crate::transform::{Dialect, SyntaxTransform};
