//! Pure extension and format resolution rules.
//!
//! The module-kind letter is the `c`/`m` infix of `.cts`/`.mts`/`.cjs`/`.mjs`
//! extensions. It forces a module calling convention for one file regardless
//! of project configuration, and has to be carried from a source file into
//! its declaration sidecar so both resolve under the same module rules.

use crate::core::Format;
use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_EXT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.([cm])?[jt]sx?$").unwrap());
static DECLARATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.d\.[cm]?ts$").unwrap());
// JSX-flavored extensions never carry the module-kind letter.
static MODULE_LETTER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.([cm])[jt]s$").unwrap());

/// Whether the path ends in a script-family extension (`.js .mjs .cjs .ts
/// .mts .cts .jsx .tsx`).
pub fn is_script_path(path: &str) -> bool {
    SCRIPT_EXT_RE.is_match(path)
}

/// Whether the path names a type-declaration file (`.d.ts` / `.d.mts` /
/// `.d.cts`).
pub fn is_declaration_path(path: &str) -> bool {
    DECLARATION_RE.is_match(path)
}

/// Recover the module-kind letter from a source path, if it has one.
pub fn module_kind_letter(path: &str) -> Option<char> {
    MODULE_LETTER_RE
        .captures(path)
        .and_then(|captures| captures.get(1))
        .and_then(|letter| letter.as_str().chars().next())
}

/// Declaration extension carrying the source's module-kind letter, so a
/// `.mts` source yields `.d.mts` and a plain source yields `.d.ts`.
pub fn declaration_extension(letter: Option<char>) -> String {
    match letter {
        Some(letter) => format!(".d.{letter}ts"),
        None => ".d.ts".to_string(),
    }
}

/// Primary output extension: an explicit override wins, else the format's
/// conventional extension.
pub fn resolve_extension(format: Format, override_ext: Option<&str>) -> String {
    if let Some(ext) = override_ext {
        return normalize_extension(ext);
    }
    match format {
        Format::Cjs => ".js",
        Format::Esm => ".mjs",
    }
    .to_string()
}

/// Ensure a leading dot on a configured extension.
pub fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

/// Dialect name of an extension with the dot and module-kind letter
/// stripped: `.mts` → `ts`, `.cjs` → `js`, `.tsx` → `tsx`.
pub fn bare_dialect(extension: &str) -> &str {
    let ext = extension.strip_prefix('.').unwrap_or(extension);
    match ext {
        "mts" | "cts" => "ts",
        "mjs" | "cjs" => "js",
        other => other,
    }
}

/// Replace the trailing textual extension of `path` with `extension`.
///
/// Only the final path segment is considered, so dotted directory names are
/// left alone. A path without an extension gets `extension` appended.
pub fn apply_extension(path: &str, extension: &str) -> String {
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[name_start..].rfind('.') {
        Some(dot) => format!("{}{}", &path[..name_start + dot], extension),
        None => format!("{path}{extension}"),
    }
}
