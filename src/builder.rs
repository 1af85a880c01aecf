//! Recursive directory walk that decomposes flat class names into a
//! namespace tree.

use crate::error::{NamespacifyError, Result};
use crate::names::{split_words, title_case};
use crate::scan::DeclarationScanner;
use crate::tree::{ClassLeaf, NamespaceId, NamespaceTree};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Mutable state for one build run.
///
/// Passed explicitly through every recursive call so a fresh run can never
/// accidentally reuse a previous run's registries: the caller constructs one
/// context per independent top-level directory.
#[derive(Debug, Default)]
pub struct BuildContext {
    /// Name-keyed registry of every container created in this run. Reuse is
    /// global, not scoped to a parent: a segment name recurring under two
    /// different ancestors collapses onto one shared container.
    namespaces: HashMap<String, NamespaceId>,
    /// Original flat class name -> decomposed leaf.
    flat_leafs: HashMap<String, ClassLeaf>,
    /// Segment names of the directories above the one currently being built.
    ancestors: Vec<String>,
}

impl BuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears both registries and the ancestor stack. Fresh contexts are the
    /// normal way to isolate runs; this exists for callers that hold one.
    pub fn reset(&mut self) {
        self.namespaces.clear();
        self.flat_leafs.clear();
        self.ancestors.clear();
    }

    /// The leaves registered in this run, keyed by original flat class name.
    pub fn flat_leafs(&self) -> &HashMap<String, ClassLeaf> {
        &self.flat_leafs
    }

    pub fn into_flat_leafs(self) -> HashMap<String, ClassLeaf> {
        self.flat_leafs
    }

    fn container(&mut self, tree: &mut NamespaceTree, name: &str) -> NamespaceId {
        if let Some(&id) = self.namespaces.get(name) {
            return id;
        }
        let id = tree.add_container(name);
        self.namespaces.insert(name.to_string(), id);
        id
    }
}

/// Builds a namespace tree from a directory of single-class model files.
#[derive(Default)]
pub struct NamespaceBuilder {
    scanner: DeclarationScanner,
}

impl NamespaceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recursively builds the container for `dir` into `tree`, merging into
    /// the registries carried by `ctx`. `allow`, when present, filters the
    /// immediate entry names of `dir` and does not propagate to nested
    /// directories.
    pub fn build(
        &self,
        dir: &Path,
        allow: Option<&[String]>,
        tree: &mut NamespaceTree,
        ctx: &mut BuildContext,
    ) -> Result<NamespaceId> {
        if !dir.is_dir() {
            return Err(NamespacifyError::NotADirectory(dir.to_path_buf()));
        }
        let dir_name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| NamespacifyError::InvalidDirectoryName(dir.to_path_buf()))?;
        let root_name = title_case(dir_name);
        let root = ctx.container(tree, &root_name);

        // Sorted entry names keep discovery order, and with it the rendered
        // output, deterministic across platforms.
        let mut entries: Vec<_> = fs::read_dir(dir)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|e| e.path())
            .collect();
        entries.sort();

        for entry in entries {
            if let Some(allow) = allow {
                let entry_name = entry
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default();
                if !allow.iter().any(|a| a == entry_name) {
                    continue;
                }
            }

            if entry.is_dir() {
                ctx.ancestors.push(root_name.clone());
                let child = self.build(&entry, None, tree, ctx)?;
                ctx.ancestors.pop();
                tree.add_namespace(root, child);
            } else {
                self.process_model_file(&entry, &root_name, root, tree, ctx)?;
            }
        }

        Ok(root)
    }

    fn process_model_file(
        &self,
        path: &Path,
        root_name: &str,
        root: NamespaceId,
        tree: &mut NamespaceTree,
        ctx: &mut BuildContext,
    ) -> Result<()> {
        let source = fs::read_to_string(path)?;
        let Some(declaration) = self.scanner.scan(&source) else {
            warn!(path = %path.display(), "no class declaration found, skipping");
            return Ok(());
        };

        let flat_name = declaration.name.clone();
        let (leaf_name, segments) = decompose(&declaration.name, root_name, &ctx.ancestors);

        let mut leaf = ClassLeaf::new(leaf_name, declaration.body.clone())
            .with_superclass(declaration.superclass.clone());
        leaf.set_original_flat_name(&flat_name);

        let mut qualified: Vec<String> = ctx.ancestors.clone();
        qualified.push(root_name.to_string());
        qualified.extend(segments.iter().cloned());
        leaf.set_path(qualified);

        debug!(
            flat = %flat_name,
            qualified = %leaf.qualified_name(0),
            "decomposed declaration"
        );

        // Chain the intermediate containers from the directory root inwards,
        // preferring an existing child of the same name over the registry.
        let mut parent = root;
        for segment in &segments {
            let next = match tree.find_child_namespace(parent, segment) {
                Some(existing) => existing,
                None => {
                    // A registry hit that already sits above `parent` (a
                    // segment named like the root, or like an earlier segment
                    // of this chain) must not be reattached below itself;
                    // that chain gets its own container instead.
                    let id = match ctx.namespaces.get(segment.as_str()) {
                        Some(&id) if !tree.creates_cycle(parent, id) => id,
                        Some(_) => tree.add_container(segment.as_str()),
                        None => ctx.container(tree, segment),
                    };
                    tree.add_namespace(parent, id);
                    id
                }
            };
            parent = next;
        }
        tree.add_leaf(parent, leaf.clone());

        ctx.flat_leafs.insert(flat_name, leaf);
        Ok(())
    }
}

/// Splits a flat class name into the leaf's own name and the intermediate
/// namespace segments between the directory root and the leaf.
///
/// The naming convention repeats every enclosing segment as a prefix, so the
/// ancestor segments and then the root name are stripped wherever each is the
/// current prefix of what remains; `split_words` on the remainder gives the
/// intermediates plus the leaf name as its last word.
fn decompose(flat_name: &str, root_name: &str, ancestors: &[String]) -> (String, Vec<String>) {
    if flat_name == root_name {
        return (flat_name.to_string(), Vec::new());
    }

    let mut rest = flat_name;
    for segment in ancestors.iter().map(String::as_str).chain([root_name]) {
        if let Some(stripped) = rest.strip_prefix(segment) {
            rest = stripped;
        }
    }

    let mut words = split_words(rest);
    match words.pop() {
        Some(leaf_name) => (leaf_name, words),
        // The whole name was consumed by prefix stripping; fall back to the
        // flat name so the leaf still carries something renderable.
        None => (flat_name.to_string(), Vec::new()),
    }
}
