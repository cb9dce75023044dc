//! Script-family loader: `.js .mjs .cjs .ts .mts .cts .jsx .tsx`.

use super::{Loader, LoaderContext};
use crate::core::{InputFile, OutputFile};
use crate::resolve;
use crate::transform::Dialect;
use anyhow::{Context, Result};
use log::debug;

pub struct ScriptLoader;

impl Loader for ScriptLoader {
    fn name(&self) -> &'static str {
        "script"
    }

    fn load(&self, input: &InputFile, ctx: &LoaderContext) -> Result<Option<Vec<OutputFile>>> {
        if !resolve::is_script_path(&input.path) {
            return Ok(None);
        }
        if resolve::is_declaration_path(&input.path) {
            // Existing declaration files pass through on the copy path.
            debug!("declining declaration file {}", input.path);
            return Ok(None);
        }

        let options = ctx.options;
        let mut outputs = Vec::new();
        let mut contents = input.read()?.to_string();

        // Declarations are requested from the original, pre-transform text.
        if options.declaration.wants(&input.extension) {
            if let Some(declaration) = ctx.declarations.emit(&contents, &input.path) {
                let src = input
                    .src_path
                    .as_deref()
                    .map(|p| p.to_string_lossy().into_owned());
                let letter = src.as_deref().and_then(resolve::module_kind_letter);
                outputs.push(OutputFile {
                    contents: declaration,
                    path: input.path.clone(),
                    extension: resolve::declaration_extension(letter),
                    src_path: input.src_path.clone(),
                    declaration: true,
                });
            }
        }

        let dialect = Dialect::from_extension(&input.extension);
        if dialect.needs_transpile() {
            contents = ctx
                .transformer
                .transpile(&contents, dialect, &options.transform)
                .with_context(|| format!("failed to transpile {}", input.path))?;
        }

        if options.format.is_cjs() {
            contents = ctx
                .transformer
                .to_cjs(&contents, &options.transform)
                .with_context(|| format!("failed to convert {} to cjs", input.path))?;
        }

        outputs.push(OutputFile {
            contents,
            path: input.path.clone(),
            extension: resolve::resolve_extension(options.format, options.ext.as_deref()),
            src_path: input.src_path.clone(),
            declaration: false,
        });

        Ok(Some(outputs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildOptions;
    use crate::core::{DeclarationMode, Format};
    use crate::declarations::DeclarationEmitter;
    use crate::loaders::LoaderChain;
    use crate::testkit::{RecordingTransform, StaticDeclarations};
    use std::path::PathBuf;

    fn load(
        options: &BuildOptions,
        emitter: &DeclarationEmitter,
        input: &InputFile,
    ) -> Option<Vec<OutputFile>> {
        let chain = LoaderChain::new(vec![Box::new(ScriptLoader)]);
        let transformer = RecordingTransform;
        let ctx = chain.context(options, &transformer, emitter);
        ctx.load_file(input).unwrap()
    }

    #[test]
    fn declines_non_script_extensions_without_reading() {
        let options = BuildOptions::default();
        let emitter = DeclarationEmitter::unavailable("unused");
        // A disk-backed input with no backing file: any read would error.
        let input = InputFile::from_disk("logo.png", PathBuf::from("/nonexistent/logo.png"), ".png");
        assert!(load(&options, &emitter, &input).is_none());
    }

    #[test]
    fn declines_existing_declaration_files() {
        let options = BuildOptions::default();
        let emitter = DeclarationEmitter::unavailable("unused");
        let input = InputFile::from_text("types.d.ts", None, ".ts", "declare const a: 1;");
        assert!(load(&options, &emitter, &input).is_none());
    }

    #[test]
    fn typed_source_is_transpiled_to_the_format_extension() {
        let options = BuildOptions::default();
        let emitter = DeclarationEmitter::unavailable("unused");
        let input = InputFile::from_text("index.ts", None, ".ts", "export const a: number = 1");
        let outputs = load(&options, &emitter, &input).unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].extension, ".mjs");
        assert!(!outputs[0].declaration);
        assert!(outputs[0].contents.contains("transpiled:Ts"));
    }

    #[test]
    fn cjs_format_runs_module_conversion_and_uses_js_extension() {
        let mut options = BuildOptions::default();
        options.format = Format::Cjs;
        let emitter = DeclarationEmitter::unavailable("unused");
        let input = InputFile::from_text("index.js", None, ".js", "export const a = 1");
        let outputs = load(&options, &emitter, &input).unwrap();
        assert_eq!(outputs[0].extension, ".js");
        assert!(outputs[0].contents.contains("cjs"));
    }

    #[test]
    fn explicit_extension_override_wins() {
        let mut options = BuildOptions::default();
        options.ext = Some("js".to_string());
        let emitter = DeclarationEmitter::unavailable("unused");
        let input = InputFile::from_text("index.ts", None, ".ts", "export const a = 1");
        let outputs = load(&options, &emitter, &input).unwrap();
        assert_eq!(outputs[0].extension, ".js");
    }

    #[test]
    fn declaration_precedes_primary_and_carries_module_letter() {
        let mut options = BuildOptions::default();
        options.declaration = DeclarationMode::Enabled;
        let emitter =
            DeclarationEmitter::with_backend(Box::new(StaticDeclarations::new("declare const a: 1;")));
        let input = InputFile::from_text(
            "util.mts",
            Some(PathBuf::from("src/util.mts")),
            ".mts",
            "export const a = 1",
        );
        let outputs = load(&options, &emitter, &input).unwrap();
        assert_eq!(outputs.len(), 2);
        assert!(outputs[0].declaration);
        assert_eq!(outputs[0].extension, ".d.mts");
        assert!(!outputs[1].declaration);
        assert_eq!(outputs[1].extension, ".mjs");
    }

    #[test]
    fn missing_type_checker_degrades_to_primary_only() {
        let mut options = BuildOptions::default();
        options.declaration = DeclarationMode::Enabled;
        let emitter = DeclarationEmitter::unavailable("tsc not on PATH");
        let input = InputFile::from_text("index.ts", None, ".ts", "export const a = 1");
        let outputs = load(&options, &emitter, &input).unwrap();
        assert_eq!(outputs.len(), 1);
        assert!(!outputs[0].declaration);
    }

    #[test]
    fn dialect_restriction_skips_js_sources() {
        let mut options = BuildOptions::default();
        options.declaration = DeclarationMode::Dialects(vec!["ts".to_string()]);
        let emitter =
            DeclarationEmitter::with_backend(Box::new(StaticDeclarations::new("declare {}")));
        let input = InputFile::from_text("util.js", None, ".js", "export const a = 1");
        let outputs = load(&options, &emitter, &input).unwrap();
        assert!(outputs.iter().all(|o| !o.declaration));
    }
}
