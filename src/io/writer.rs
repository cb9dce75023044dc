//! Output persistence: applies final extensions, creates parent
//! directories, deduplicates by final path and reports written paths in a
//! stable order.

use super::{ensure_dir, write_file};
use crate::core::OutputFile;
use crate::resolve;
use anyhow::{Context, Result};
use log::debug;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One pending write: either a rendered artifact or a verbatim copy of an
/// unhandled source file.
#[derive(Debug)]
pub enum WriteOp {
    Render(OutputFile),
    Copy { path: String, src_path: PathBuf },
}

impl WriteOp {
    fn final_rel_path(&self) -> String {
        match self {
            WriteOp::Render(output) => resolve::apply_extension(&output.path, &output.extension),
            WriteOp::Copy { path, .. } => path.clone(),
        }
    }
}

/// Persist all operations under `dist_root`. The first write to a final
/// path wins; later duplicates are skipped.
pub fn write_all(dist_root: &Path, ops: &[WriteOp]) -> Result<Vec<PathBuf>> {
    ensure_dir(dist_root).with_context(|| format!("failed to create {}", dist_root.display()))?;

    let mut written = Vec::new();
    let mut seen = HashSet::new();
    for op in ops {
        let rel = op.final_rel_path();
        if !seen.insert(rel.clone()) {
            debug!("skipping duplicate output {rel}");
            continue;
        }
        let target = dist_root.join(&rel);
        if let Some(parent) = target.parent() {
            ensure_dir(parent).with_context(|| format!("failed to create {}", parent.display()))?;
        }
        match op {
            WriteOp::Render(output) => {
                write_file(&target, &output.contents)
                    .with_context(|| format!("failed to write {}", target.display()))?;
            }
            WriteOp::Copy { src_path, .. } => {
                std::fs::copy(src_path, &target).with_context(|| {
                    format!(
                        "failed to copy {} to {}",
                        src_path.display(),
                        target.display()
                    )
                })?;
            }
        }
        written.push(target);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(path: &str, extension: &str, contents: &str) -> WriteOp {
        WriteOp::Render(OutputFile {
            contents: contents.to_string(),
            path: path.to_string(),
            extension: extension.to_string(),
            src_path: None,
            declaration: false,
        })
    }

    #[test]
    fn writes_apply_extensions_and_create_parents() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_all(
            dir.path(),
            &[render("components/a.ts", ".mjs", "export {}")],
        )
        .unwrap();
        assert_eq!(written, vec![dir.path().join("components/a.mjs")]);
        assert_eq!(
            std::fs::read_to_string(&written[0]).unwrap(),
            "export {}"
        );
    }

    #[test]
    fn first_write_to_a_final_path_wins() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_all(
            dir.path(),
            &[
                render("a.ts", ".mjs", "first"),
                render("a.mts", ".mjs", "second"),
                render("a.ts", ".mjs", "third"),
            ],
        )
        .unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(std::fs::read_to_string(&written[0]).unwrap(), "first");
    }

    #[test]
    fn copies_preserve_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("asset.bin");
        std::fs::write(&src, [0u8, 159, 146, 150]).unwrap();
        let dist = dir.path().join("dist");
        let written = write_all(
            &dist,
            &[WriteOp::Copy {
                path: "asset.bin".to_string(),
                src_path: src.clone(),
            }],
        )
        .unwrap();
        assert_eq!(std::fs::read(&written[0]).unwrap(), vec![0u8, 159, 146, 150]);
    }
}
