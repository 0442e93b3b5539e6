//! Rewrites a generated resources type file to use a named export.
//!
//! Generators emit
//!
//! ```text
//! interface Resources { ... }
//!
//! export default Resources;
//! ```
//!
//! which `verbatimModuleSyntax` rejects. The rewrite exports the declaration
//! by name and drops the trailing default export. It is a narrow pattern
//! rewrite, not a TypeScript parser, and running it again is a no-op.

use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::NormalizeError;

/// Shape identifier emitted by the resources generator.
pub const DEFAULT_TYPE_NAME: &str = "Resources";

/// Result of normalizing one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    pub exported_declaration: bool,
    pub removed_default_export: bool,
}

impl Normalized {
    pub fn changed(&self) -> bool {
        self.exported_declaration || self.removed_default_export
    }
}

/// Normalize the file at `path` in place.
///
/// The file is always rewritten, even when the text is unchanged.
pub fn normalize_file(path: &Path, ident: &str) -> Result<Normalized, NormalizeError> {
    let source = fs::read_to_string(path).map_err(|source| NormalizeError::Io {
        action: "read",
        path: path.to_path_buf(),
        source,
    })?;

    let normalized = normalize_source(&source, ident)?;

    fs::write(path, &normalized.text).map_err(|source| NormalizeError::Io {
        action: "write",
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        path = %path.display(),
        exported_declaration = normalized.exported_declaration,
        removed_default_export = normalized.removed_default_export,
        "Type file normalized."
    );
    Ok(normalized)
}

/// Apply both rewrites to `source`.
pub fn normalize_source(source: &str, ident: &str) -> Result<Normalized, NormalizeError> {
    if !is_identifier(ident) {
        return Err(NormalizeError::InvalidIdentifier(ident.to_string()));
    }
    let escaped = regex::escape(ident);
    let invalid = |_| NormalizeError::InvalidIdentifier(ident.to_string());

    let declaration = Regex::new(&format!(
        r"(?:^|[^A-Za-z0-9_$])((?:interface|type)\s+{escaped})(?:[^A-Za-z0-9_$]|$)"
    ))
    .map_err(invalid)?;
    let default_export = Regex::new(&format!(
        r"(?:^|[^A-Za-z0-9_$.])(export\s+default\s+{escaped})\s*;?\s*$"
    ))
    .map_err(invalid)?;

    let (text, exported_declaration) = export_declaration(source, &declaration);
    let (text, removed_default_export) = strip_default_export(text, &default_export);

    Ok(Normalized {
        text,
        exported_declaration,
        removed_default_export,
    })
}

#[derive(Debug, PartialEq, Eq)]
enum Placement {
    Exported,
    InsertAt(usize),
    NotADeclaration,
}

/// Qualify the first declaration of the identifier with `export`.
fn export_declaration(source: &str, declaration: &Regex) -> (String, bool) {
    let mut from = 0;
    while let Some(keyword) = declaration
        .captures_at(source, from)
        .and_then(|captures| captures.get(1))
    {
        match placement(source, keyword.start()) {
            Placement::Exported => return (source.to_string(), false),
            Placement::InsertAt(at) => {
                let text = format!("{}export {}", &source[..at], &source[at..]);
                return (text, true);
            }
            // e.g. `import type Resources` or a mention inside a comment
            Placement::NotADeclaration => from = keyword.end(),
        }
    }
    (source.to_string(), false)
}

fn placement(source: &str, keyword_start: usize) -> Placement {
    let before = &source[..keyword_start];
    let trimmed = before.trim_end();

    let (prefix, insert_at) = match strip_word_suffix(trimmed, "declare") {
        Some(rest) => (rest, rest.len()),
        None => (before, keyword_start),
    };
    let prefix_trimmed = prefix.trim_end();

    if strip_word_suffix(prefix_trimmed, "export").is_some() {
        Placement::Exported
    } else if at_statement_start(prefix) {
        Placement::InsertAt(insert_at)
    } else {
        Placement::NotADeclaration
    }
}

fn at_statement_start(prefix: &str) -> bool {
    let trimmed = prefix.trim_end();
    trimmed.is_empty()
        || trimmed.ends_with([';', '{', '}'])
        || trimmed.ends_with("*/")
        || prefix[trimmed.len()..].contains('\n')
}

/// Remove a trailing `export default <ident>` and the blank lines before it.
///
/// The last kept line keeps its own content and line terminator.
fn strip_default_export(text: String, default_export: &Regex) -> (String, bool) {
    let start = default_export
        .captures(&text)
        .and_then(|captures| captures.get(1))
        .map(|statement| statement.start());
    let Some(start) = start else {
        return (text, false);
    };

    let head = &text[..start];
    let content_end = head.trim_end().len();
    if content_end == 0 {
        return (String::new(), true);
    }

    let rest = &head[content_end..];
    let out = match rest.find(['\r', '\n']) {
        Some(line_end) => {
            let newline = if rest[line_end..].starts_with("\r\n") {
                "\r\n"
            } else {
                "\n"
            };
            format!("{}{newline}", &head[..content_end + line_end])
        }
        // The statement shared a line with the declaration.
        None => {
            let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
            format!("{}{newline}", &head[..content_end])
        }
    };
    (out, true)
}

fn strip_word_suffix<'a>(text: &'a str, word: &str) -> Option<&'a str> {
    let rest = text.strip_suffix(word)?;
    let boundary = rest.chars().next_back().is_none_or(|c| !is_ident_char(c));
    boundary.then_some(rest)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn is_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    chars
        .next()
        .is_some_and(|first| is_ident_char(first) && !first.is_ascii_digit())
        && chars.all(is_ident_char)
}
