//! Textual rewriting of imports and usages of consolidated class names.

use crate::error::Result;
use crate::tree::ClassLeaf;
use regex::Regex;
use std::collections::HashMap;
use std::path::{Component as PathComponent, Path, PathBuf};
use tracing::warn;

/// Where a consolidated class now lives: the decomposed leaf plus the
/// generated model file that holds its namespace.
#[derive(Debug, Clone)]
pub struct LeafTarget {
    pub leaf: ClassLeaf,
    pub output_path: PathBuf,
}

/// Rewrites one file's content against the known flat-name targets.
///
/// The orchestration layer only depends on this trait, so the textual
/// strategy below can be swapped for a scope-aware one without touching it.
pub trait ReferenceRewriter {
    /// `file_dir` is the directory of the file being rewritten; import paths
    /// are recomputed relative to it.
    fn rewrite(
        &self,
        source: &str,
        file_dir: &Path,
        targets: &HashMap<String, LeafTarget>,
    ) -> Result<String>;
}

/// Literal find-and-replace rewriting, matching the original tool.
///
/// For each import statement naming a known flat class: the first textual
/// occurrence of the name (the import symbol) becomes the top-level namespace
/// identifier, every later occurrence becomes the full dotted qualified name,
/// and the quoted import path is repointed at the generated model file. No
/// scope analysis: a matching name in an unrelated context is rewritten too.
pub struct TextualRewriter {
    import_pattern: Regex,
}

impl Default for TextualRewriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TextualRewriter {
    pub fn new() -> Self {
        Self {
            import_pattern: Regex::new(r#"import\s*\{([^}]*)\}\s*from\s*(['"])([^'"]+)['"]"#)
                .expect("invalid regex"),
        }
    }
}

struct ImportStatement {
    names: Vec<String>,
    quote: String,
    path: String,
}

impl ReferenceRewriter for TextualRewriter {
    fn rewrite(
        &self,
        source: &str,
        file_dir: &Path,
        targets: &HashMap<String, LeafTarget>,
    ) -> Result<String> {
        let imports: Vec<ImportStatement> = self
            .import_pattern
            .captures_iter(source)
            .map(|captures| ImportStatement {
                names: captures[1]
                    .split(',')
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty())
                    .collect(),
                quote: captures[2].to_string(),
                path: captures[3].to_string(),
            })
            .collect();

        let mut result = source.to_string();
        for import in imports {
            let mut path_target: Option<&Path> = None;
            for name in &import.names {
                let Some(target) = targets.get(name) else {
                    continue;
                };

                let top_level = target
                    .leaf
                    .path()
                    .first()
                    .cloned()
                    .unwrap_or_else(|| target.leaf.name().to_string());
                let qualified = target.leaf.qualified_name(0);

                // First occurrence is the import symbol, everything after it
                // a usage.
                result = result.replacen(name.as_str(), &top_level, 1);
                result = result.replace(name.as_str(), &qualified);

                match path_target {
                    None => {
                        let new_path = relative_import_path(file_dir, &target.output_path);
                        let old_literal =
                            format!("{}{}{}", import.quote, import.path, import.quote);
                        let new_literal = format!("{}{}{}", import.quote, new_path, import.quote);
                        result = result.replacen(&old_literal, &new_literal, 1);
                        path_target = Some(target.output_path.as_path());
                    }
                    Some(first) if first != target.output_path.as_path() => {
                        // One import statement cannot point at two files; the
                        // path stays on the first match.
                        warn!(
                            import = %import.path,
                            name = %name,
                            file = %target.output_path.display(),
                            "class lives in a different generated file than the rewritten import path"
                        );
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(result)
    }
}

/// Relative path from `from_dir` to `to`, with the file extension stripped,
/// separators normalized to `/`, and a leading `./` unless the path already
/// starts with `.`.
fn relative_import_path(from_dir: &Path, to: &Path) -> String {
    let target = to.with_extension("");
    let from: Vec<String> = normalized_components(from_dir);
    let to: Vec<String> = normalized_components(&target);

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - common];
    parts.extend(to[common..].iter().cloned());

    let joined = parts.join("/");
    if joined.starts_with('.') {
        joined
    } else {
        format!("./{joined}")
    }
}

fn normalized_components(path: &Path) -> Vec<String> {
    path.components()
        .filter(|c| !matches!(c, PathComponent::CurDir))
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect()
}
