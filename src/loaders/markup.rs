//! Markup loader for single-file components with an embedded script block.
//!
//! The loader never rewrites the markup itself; it extracts the script
//! block, re-enters the chain with a synthetic input of the embedded
//! dialect, and merges the nested outputs alongside a pass-through copy of
//! the untouched markup.

use super::{Loader, LoaderContext};
use crate::core::{InputFile, OutputFile};
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<script([^>]*)>(.*?)</script>").unwrap());
static LANG_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"lang\s*=\s*["']([A-Za-z]+)["']"#).unwrap());

/// Declaration sidecars only make sense for script blocks whose `lang`
/// attribute explicitly names a typed dialect.
const TYPED_LANGS: &[&str] = &["ts", "tsx", "mts", "cts"];

pub struct MarkupLoader;

impl Loader for MarkupLoader {
    fn name(&self) -> &'static str {
        "markup"
    }

    fn load(&self, input: &InputFile, ctx: &LoaderContext) -> Result<Option<Vec<OutputFile>>> {
        if input.extension != ".vue" {
            return Ok(None);
        }

        let contents = input.read()?;
        let pass_through = OutputFile {
            contents: contents.to_string(),
            path: input.path.clone(),
            extension: input.extension.clone(),
            src_path: input.src_path.clone(),
            declaration: false,
        };

        let Some(captures) = SCRIPT_BLOCK_RE.captures(contents) else {
            // Handled, nothing embedded: the writer still receives the
            // untouched markup artifact.
            return Ok(Some(vec![pass_through]));
        };

        let attrs = captures.get(1).map_or("", |m| m.as_str());
        let script = captures.get(2).map_or("", |m| m.as_str());
        let lang = LANG_ATTR_RE
            .captures(attrs)
            .and_then(|c| c.get(1))
            .map_or("js", |m| m.as_str());

        // Synthetic input for the embedded dialect: the path and extension
        // reflect the script language, the src_path stays on the enclosing
        // file so module-kind recovery sees the container.
        let embedded = InputFile::from_text(
            format!("{}.{}", input.path, lang),
            input.src_path.clone(),
            format!(".{lang}"),
            script,
        );

        let mut outputs = ctx.load_file(&embedded)?.unwrap_or_default();
        if !TYPED_LANGS.contains(&lang) {
            outputs.retain(|output| !output.declaration);
        }
        outputs.push(pass_through);
        Ok(Some(outputs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildOptions;
    use crate::core::DeclarationMode;
    use crate::declarations::DeclarationEmitter;
    use crate::loaders::{script::ScriptLoader, LoaderChain};
    use crate::testkit::{RecordingTransform, StaticDeclarations};
    use indoc::indoc;

    fn load(
        options: &BuildOptions,
        emitter: &DeclarationEmitter,
        input: &InputFile,
    ) -> Option<Vec<OutputFile>> {
        let chain = LoaderChain::new(vec![Box::new(MarkupLoader), Box::new(ScriptLoader)]);
        let transformer = RecordingTransform;
        let ctx = chain.context(options, &transformer, emitter);
        ctx.load_file(input).unwrap()
    }

    #[test]
    fn markup_without_script_block_is_handled_with_pass_through_only() {
        let options = BuildOptions::default();
        let emitter = DeclarationEmitter::unavailable("unused");
        let source = "<template><div /></template>";
        let input = InputFile::from_text("blank.vue", None, ".vue", source);
        let outputs = load(&options, &emitter, &input).unwrap();
        assert_eq!(outputs.len(), 1);
        assert_eq!(outputs[0].extension, ".vue");
        assert_eq!(outputs[0].contents, source);
    }

    #[test]
    fn typed_script_block_yields_declaration_primary_and_pass_through() {
        let mut options = BuildOptions::default();
        options.declaration = DeclarationMode::Enabled;
        let emitter =
            DeclarationEmitter::with_backend(Box::new(StaticDeclarations::new("declare const a: 1;")));
        let source = indoc! {r#"
            <template><div /></template>
            <script lang="ts">export const a: number = 1</script>
        "#};
        let input = InputFile::from_text("test.vue", None, ".vue", source);
        let outputs = load(&options, &emitter, &input).unwrap();
        assert_eq!(outputs.len(), 3);
        assert!(outputs[0].declaration);
        assert_eq!(outputs[0].path, "test.vue.ts");
        assert_eq!(outputs[0].extension, ".d.ts");
        assert!(outputs[1].contents.contains("transpiled:Ts"));
        assert_eq!(outputs[2].extension, ".vue");
        assert_eq!(outputs[2].contents, source);
    }

    #[test]
    fn untyped_script_block_never_yields_a_declaration() {
        let mut options = BuildOptions::default();
        options.declaration = DeclarationMode::Enabled;
        let emitter =
            DeclarationEmitter::with_backend(Box::new(StaticDeclarations::new("declare {}")));
        let input = InputFile::from_text("test.vue", None, ".vue", "<script>Test</script>");
        let outputs = load(&options, &emitter, &input).unwrap();
        assert!(outputs.iter().all(|o| !o.declaration));
        // Embedded primary plus the pass-through markup.
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[1].extension, ".vue");
    }

    #[test]
    fn embedded_dialect_comes_from_the_lang_attribute() {
        let options = BuildOptions::default();
        let emitter = DeclarationEmitter::unavailable("unused");
        let input = InputFile::from_text(
            "c.vue",
            None,
            ".vue",
            r#"<script lang="ts">export const a = 1</script>"#,
        );
        let outputs = load(&options, &emitter, &input).unwrap();
        assert_eq!(outputs[0].path, "c.vue.ts");
        assert!(outputs[0].contents.contains("transpiled:Ts"));
    }
}
