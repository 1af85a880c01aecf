//! Best-effort extraction of a single class/interface declaration per file.

use regex::Regex;

/// A declaration extracted from one model file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub superclass: Option<String>,
    pub body: String,
}

/// Scans a source file for its single exported class or interface declaration.
///
/// This is not a parser: it matches the declaration header with a regex and
/// takes the body by naive line index (everything strictly between the
/// declaration line and the last `}` line of the file, with no brace
/// counting). Files with more than one declaration, or with a class-closing
/// brace that is not the last `}` line, are outside the supported convention.
pub struct DeclarationScanner {
    pattern: Regex,
}

impl Default for DeclarationScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclarationScanner {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(
                r"export\s+(?:class|interface)\s+(\w+)(?:\s+(?:extends|implements)\s+(\w+))?",
            )
            .expect("invalid regex"),
        }
    }

    /// Returns the declaration, or `None` when the file has no recognizable
    /// one. Callers decide how to handle the miss; nothing downstream ever
    /// sees an empty class name.
    pub fn scan(&self, source: &str) -> Option<Declaration> {
        let captures = self.pattern.captures(source)?;
        let name = captures.get(1)?.as_str().to_string();
        let superclass = captures.get(2).map(|m| m.as_str().to_string());

        let offset = captures.get(0).map(|m| m.start()).unwrap_or(0);
        let declaration_line = source[..offset].matches('\n').count();

        let lines: Vec<&str> = source.lines().collect();
        let closing_line = lines.iter().rposition(|line| line.trim() == "}");

        let body = match closing_line {
            Some(close) if close > declaration_line + 1 => {
                lines[declaration_line + 1..close].join("\n")
            }
            _ => String::new(),
        };

        Some(Declaration {
            name,
            superclass,
            body,
        })
    }
}
