//! Orchestration: one output file per root namespace, then the cross-file
//! reference rewrite.

use crate::builder::{BuildContext, NamespaceBuilder};
use crate::error::{NamespacifyError, Result};
use crate::names::to_file_name;
use crate::rewrite::{LeafTarget, ReferenceRewriter, TextualRewriter};
use crate::tree::NamespaceTree;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Extensions of source files scanned during the reference rewrite.
const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx"];

/// Suffix of generated namespace files.
const MODEL_SUFFIX: &str = ".model.ts";

/// A rendered namespace file, before or after being written to disk.
#[derive(Debug, Clone)]
pub struct ModelOutput {
    pub path: PathBuf,
    pub content: String,
}

/// A planned change to one source file.
#[derive(Debug, Clone)]
pub struct FileChange {
    pub path: PathBuf,
    pub original: String,
    pub transformed: String,
}

impl FileChange {
    /// Returns true if the content was modified.
    pub fn is_modified(&self) -> bool {
        self.original != self.transformed
    }

    /// Writes the transformed content to disk.
    pub fn apply(&self) -> Result<()> {
        if self.is_modified() {
            fs::write(&self.path, &self.transformed)?;
        }
        Ok(())
    }
}

/// One row of the rename table: flat class name, its new qualified name, and
/// the generated file that holds it.
#[derive(Debug, Clone, Serialize)]
pub struct MappingEntry {
    pub flat: String,
    pub qualified: String,
    pub file: PathBuf,
}

/// Drives the builder over every root namespace directory and performs the
/// reference rewrite over a source tree.
pub struct FileStream {
    builder: NamespaceBuilder,
    rewriter: Box<dyn ReferenceRewriter>,
    targets: HashMap<String, LeafTarget>,
}

impl Default for FileStream {
    fn default() -> Self {
        Self::new(NamespaceBuilder::new())
    }
}

impl FileStream {
    pub fn new(builder: NamespaceBuilder) -> Self {
        Self {
            builder,
            rewriter: Box::new(TextualRewriter::new()),
            targets: HashMap::new(),
        }
    }

    /// Replaces the rewrite strategy.
    pub fn with_rewriter(mut self, rewriter: Box<dyn ReferenceRewriter>) -> Self {
        self.rewriter = rewriter;
        self
    }

    /// Builds and renders one tree per immediate subdirectory of
    /// `models_root`, without writing anything. `allow`, when present,
    /// selects which subdirectory names to process.
    ///
    /// Populates the stream-level target map consumed by the rewrite pass.
    pub fn consolidate(
        &mut self,
        models_root: &Path,
        out_dir: &Path,
        allow: Option<&[String]>,
    ) -> Result<Vec<ModelOutput>> {
        if !models_root.is_dir() {
            return Err(NamespacifyError::NotADirectory(models_root.to_path_buf()));
        }

        let mut roots: Vec<PathBuf> = fs::read_dir(models_root)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        roots.sort();

        if let Some(allow) = allow {
            roots.retain(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|name| allow.iter().any(|a| a == name))
            });
        }
        if roots.is_empty() {
            return Err(NamespacifyError::NoModelDirectories(
                models_root.to_path_buf(),
            ));
        }

        let mut outputs = Vec::new();
        for root_dir in roots {
            // One tree and one context per root namespace; registries never
            // leak across independent subtrees.
            let mut tree = NamespaceTree::new();
            let mut ctx = BuildContext::new();
            let root = self.builder.build(&root_dir, None, &mut tree, &mut ctx)?;

            let root_name = tree.container(root).name().to_string();
            let out_path = out_dir.join(format!("{}{}", to_file_name(&root_name), MODEL_SUFFIX));
            debug!(root = %root_name, file = %out_path.display(), "rendered namespace tree");

            for (flat_name, leaf) in ctx.into_flat_leafs() {
                self.targets.insert(
                    flat_name,
                    LeafTarget {
                        leaf,
                        output_path: out_path.clone(),
                    },
                );
            }

            outputs.push(ModelOutput {
                path: out_path,
                content: tree.render(root),
            });
        }

        Ok(outputs)
    }

    /// [`Self::consolidate`] plus writing every rendered file under `out_dir`.
    pub fn save_to_file(
        &mut self,
        models_root: &Path,
        out_dir: &Path,
        allow: Option<&[String]>,
    ) -> Result<Vec<PathBuf>> {
        let outputs = self.consolidate(models_root, out_dir, allow)?;
        fs::create_dir_all(out_dir)?;

        let mut written = Vec::new();
        for output in outputs {
            fs::write(&output.path, &output.content)?;
            info!(file = %output.path.display(), "wrote namespace file");
            written.push(output.path);
        }
        Ok(written)
    }

    /// Runs the rewriter over every source file under `source_root` except
    /// generated model files, returning the planned changes without writing.
    pub fn plan_reference_updates(&self, source_root: &Path) -> Result<Vec<FileChange>> {
        let exclude = model_file_globs()?;
        let mut changes = Vec::new();

        for entry in WalkDir::new(source_root).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if !SOURCE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
                continue;
            }
            let rel_path = path.strip_prefix(source_root).unwrap_or(path);
            if exclude.is_match(rel_path) {
                continue;
            }

            let original = fs::read_to_string(path)?;
            let file_dir = path.parent().unwrap_or(source_root);
            let transformed = self.rewriter.rewrite(&original, file_dir, &self.targets)?;

            changes.push(FileChange {
                path: path.to_path_buf(),
                original,
                transformed,
            });
        }

        Ok(changes)
    }

    /// Rewrites references in place. Best-effort batch: files already written
    /// stay written if a later one fails.
    pub fn update_references(&self, source_root: &Path) -> Result<usize> {
        let mut modified = 0;
        for change in self.plan_reference_updates(source_root)? {
            if change.is_modified() {
                change.apply()?;
                modified += 1;
            }
        }
        info!(count = modified, "updated references");
        Ok(modified)
    }

    /// The rename table accumulated by [`Self::consolidate`], sorted by flat
    /// name.
    pub fn mapping(&self) -> Vec<MappingEntry> {
        let mut entries: Vec<MappingEntry> = self
            .targets
            .iter()
            .map(|(flat, target)| MappingEntry {
                flat: flat.clone(),
                qualified: target.leaf.qualified_name(0),
                file: target.output_path.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.flat.cmp(&b.flat));
        entries
    }

    /// The rename table as pretty-printed JSON.
    pub fn mapping_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.mapping())?)
    }

    /// Writes the rename table as JSON to `path`.
    pub fn write_manifest(&self, path: &Path) -> Result<()> {
        fs::write(path, self.mapping_json()?)?;
        Ok(())
    }

    /// The flat-name target map (used by custom rewriters and tests).
    pub fn targets(&self) -> &HashMap<String, LeafTarget> {
        &self.targets
    }

    /// Replaces the target map wholesale.
    pub fn set_targets(&mut self, targets: HashMap<String, LeafTarget>) {
        self.targets = targets;
    }
}

fn model_file_globs() -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    builder.add(Glob::new("**/*.model.ts")?);
    Ok(builder.build()?)
}
