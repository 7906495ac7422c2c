//! The generic extraction scan.
//!
//! One left-to-right pass over lines, applying the profile's ordered rule
//! set. No AST, no cross-file resolution; malformed input degrades to a
//! smaller summary instead of an error. A minimal quote/comment tracking
//! pass suppresses matches inside string literals and single-line comments;
//! triple-quoted strings can still leak the occasional false positive, which
//! is accepted.

use std::path::Path;

use promptcraft_core::{AppError, AppResult};

use crate::profile::{classify, path_tags, DeclRule, ImportRule, LanguageProfile};
use crate::types::{ContextSummary, DeclKind, Declaration};

/// Inputs larger than this are scanned only up to this prefix; the summary
/// is tagged `truncated` so renderers can note partial context.
pub const MAX_SCAN_BYTES: usize = 64 * 1024;

/// Longest signature fragment retained for a declaration.
const MAX_SIGNATURE_LEN: usize = 100;

/// Extract a structured summary from source text.
///
/// Never fails: the worst case is an empty summary (generic profile, opaque
/// content). Deterministic for unchanged input.
pub fn extract(content: &str, profile: &LanguageProfile) -> ContextSummary {
    let mut summary = ContextSummary::empty(profile.id);
    summary.bytes = content.len();
    summary.lines = content.lines().count();

    if content.trim().is_empty() {
        return summary;
    }

    let scanned = if content.len() > MAX_SCAN_BYTES {
        let mut end = MAX_SCAN_BYTES;
        while !content.is_char_boundary(end) {
            end -= 1;
        }
        summary.tags.insert("truncated".to_string());
        &content[..end]
    } else {
        content
    };

    // Opaque fallback: no rules to run, just mark the content as present.
    if profile.import_rules.is_empty() && profile.decl_rules.is_empty() {
        summary.tags.insert("opaque-text".to_string());
        return summary;
    }

    let mut open_block: Option<&'static str> = None;

    for line in scanned.lines() {
        let code = strip_line_comment(line, profile);
        let trimmed = code.trim_start();

        if let Some(close) = open_block {
            if trimmed.starts_with(close) {
                open_block = None;
            } else if let Some(token) = first_quoted_token(trimmed) {
                push_import(&mut summary.imports, token);
            }
            continue;
        }

        for rule in profile.import_rules {
            if let Some(token) = apply_import_rule(rule, trimmed, &mut open_block) {
                push_import(&mut summary.imports, token);
                break;
            }
        }

        if let Some(decl) = scan_declaration(code, trimmed, profile) {
            if !summary
                .declarations
                .iter()
                .any(|d| d.kind == decl.kind && d.name == decl.name)
            {
                summary.declarations.push(decl);
            }
        }
    }

    for probe in profile.probes {
        if probe.markers.iter().any(|m| scanned.contains(m)) {
            summary.tags.insert(probe.tag.to_string());
        }
    }

    tracing::debug!(
        language = profile.id,
        imports = summary.imports.len(),
        declarations = summary.declarations.len(),
        tags = summary.tags.len(),
        "extracted context summary"
    );

    summary
}

/// Read a file (UTF-8 with replacement for undecodable bytes), classify it,
/// extract, and fold in path-derived tags.
pub fn extract_file(path: &Path) -> AppResult<ContextSummary> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AppError::InputNotFound(path.display().to_string()),
        _ => AppError::Io(e),
    })?;
    let content = String::from_utf8_lossy(&bytes);

    let profile = classify(Some(path), &content);
    let mut summary = extract(&content, profile);

    if !content.trim().is_empty() {
        for tag in path_tags(path) {
            summary.tags.insert(tag.to_string());
        }
    }

    Ok(summary)
}

/// Cut the line at its comment marker, honoring open quotes before it.
fn strip_line_comment<'a>(line: &'a str, profile: &LanguageProfile) -> &'a str {
    let marker = match profile.line_comment {
        Some(m) => m,
        None => return line,
    };

    match find_outside_quotes(line, marker, profile.quote_chars, false) {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Find `needle` in `haystack` at a position not inside a quoted string.
/// With `word_boundary`, the character before the match must not be part of
/// an identifier.
fn find_outside_quotes(
    haystack: &str,
    needle: &str,
    quotes: &[char],
    word_boundary: bool,
) -> Option<usize> {
    let mut in_string = false;
    let mut string_char = '\0';
    let mut prev = '\0';

    for (i, c) in haystack.char_indices() {
        if in_string {
            if c == string_char && prev != '\\' {
                in_string = false;
            }
        } else if quotes.contains(&c) {
            in_string = true;
            string_char = c;
        } else if haystack[i..].starts_with(needle) {
            let boundary_ok =
                !word_boundary || !(prev.is_alphanumeric() || prev == '_');
            if boundary_ok {
                return Some(i);
            }
        }
        prev = c;
    }

    None
}

fn apply_import_rule(
    rule: &ImportRule,
    trimmed: &str,
    open_block: &mut Option<&'static str>,
) -> Option<String> {
    match rule {
        ImportRule::Prefix { prefix } => {
            let rest = strip_visibility(trimmed).strip_prefix(prefix)?;
            let token = rest
                .split_whitespace()
                .next()?
                .trim_end_matches([';', ','])
                .to_string();
            (!token.is_empty()).then_some(token)
        }
        ImportRule::Between { prefix, until } => {
            let rest = trimmed.strip_prefix(prefix)?;
            let end = rest.find(until)?;
            let token = rest[..end].trim().to_string();
            (!token.is_empty()).then_some(token)
        }
        ImportRule::Quoted { marker } => {
            let idx = trimmed.find(marker)?;
            // Only accept markers at or near the start of the statement, so
            // prose mentioning "import" mid-line does not count.
            if idx > 16 {
                return None;
            }
            first_quoted_token(&trimmed[idx + marker.len()..])
        }
        ImportRule::Block { open, close } => {
            if trimmed.starts_with(open) {
                *open_block = Some(close);
            }
            None
        }
    }
}

/// First `"..."`, `'...'`, `` `...` `` or `<...>` token in the text.
fn first_quoted_token(text: &str) -> Option<String> {
    let open = text.find(['"', '\'', '`', '<'])?;
    let open_char = text[open..].chars().next()?;
    let close_char = if open_char == '<' { '>' } else { open_char };
    let rest = &text[open + open_char.len_utf8()..];
    let end = rest.find(close_char)?;
    let token = rest[..end].trim().to_string();
    (!token.is_empty()).then_some(token)
}

fn push_import(imports: &mut Vec<String>, token: String) {
    // Deduplicated in order of first appearance.
    if !imports.contains(&token) {
        imports.push(token);
    }
}

fn scan_declaration(
    code: &str,
    trimmed: &str,
    profile: &LanguageProfile,
) -> Option<Declaration> {
    for rule in profile.decl_rules {
        if let Some(req) = rule.requires {
            if !code.contains(req) {
                continue;
            }
        }

        // Arrow rules bind a name (`const App = ... =>`); they only count at
        // statement start and only when the line actually has an arrow.
        let defining = if rule.arrow {
            let decl_line = strip_visibility(trimmed);
            if !decl_line.starts_with(rule.keyword) || !decl_line.contains("=>") {
                continue;
            }
            decl_line
        } else {
            match find_outside_quotes(code, rule.keyword, profile.quote_chars, true) {
                Some(i) => &code[i..],
                None => continue,
            }
        };

        let name = capture_identifier(&defining[rule.keyword.len()..]);
        if name.is_empty() {
            continue;
        }

        let kind = resolve_kind(rule, &name, profile);
        let signature = capture_signature(defining);

        return Some(Declaration {
            kind,
            name,
            signature,
        });
    }

    None
}

fn resolve_kind(rule: &DeclRule, name: &str, profile: &LanguageProfile) -> DeclKind {
    if profile.uppercase_components
        && rule.kind == DeclKind::Function
        && name.chars().next().is_some_and(|c| c.is_uppercase())
    {
        DeclKind::Component
    } else {
        rule.kind
    }
}

/// Identifier starting at the text, empty if it does not begin like one.
fn capture_identifier(text: &str) -> String {
    let text = text.trim_start();
    let mut name = String::new();
    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' || c == '$' {
            name.push(c);
        } else {
            break;
        }
    }
    if name.chars().next().is_some_and(|c| c.is_alphabetic() || c == '_') {
        name
    } else {
        String::new()
    }
}

/// Best-effort signature fragment: defining text up to the body opener.
fn capture_signature(text: &str) -> Option<String> {
    let end = text.find(['{', '=']).unwrap_or(text.len());
    let sig = text[..end].trim().trim_end_matches(':').trim();
    if sig.is_empty() {
        None
    } else {
        let sig: String = sig.chars().take(MAX_SIGNATURE_LEN).collect();
        Some(sig)
    }
}

/// Drop leading visibility/export modifiers so `pub use x;` still matches a
/// `use ` prefix rule.
fn strip_visibility(trimmed: &str) -> &str {
    for modifier in ["pub ", "export ", "public "] {
        if let Some(rest) = trimmed.strip_prefix(modifier) {
            return rest.trim_start();
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{generic_profile, profile_by_id};

    fn profile(id: &str) -> &'static LanguageProfile {
        profile_by_id(id).unwrap()
    }

    #[test]
    fn test_empty_input_all_profiles() {
        for id in ["python", "javascript", "java", "go", "rust", "cpp", "ruby", "php"] {
            let summary = extract("", profile(id));
            assert!(summary.imports.is_empty(), "{id}");
            assert!(summary.declarations.is_empty(), "{id}");
            assert!(summary.tags.is_empty(), "{id}");
        }
        let summary = extract("", generic_profile());
        assert!(summary.is_empty());
    }

    #[test]
    fn test_python_scenario() {
        let src = "import os\nfrom collections import OrderedDict\n\ndef add(a, b):\n    return a + b\n\nclass Foo:\n    pass\n";
        let summary = extract(src, profile("python"));

        assert_eq!(summary.imports, vec!["os", "collections"]);
        assert_eq!(summary.declarations.len(), 2);
        assert_eq!(summary.declarations[0].kind, DeclKind::Function);
        assert_eq!(summary.declarations[0].name, "add");
        assert_eq!(summary.declarations[1].kind, DeclKind::Class);
        assert_eq!(summary.declarations[1].name, "Foo");
    }

    #[test]
    fn test_import_first_occurrence_order() {
        let src = "import a\nimport b\nimport a\n";
        let summary = extract(src, profile("python"));
        assert_eq!(summary.imports, vec!["a", "b"]);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let src = "import os\nasync def fetch():\n    await go()\n";
        let first = extract(src, profile("python"));
        let second = extract(src, profile("python"));
        assert_eq!(first, second);
        assert!(first.tags.contains("async-usage"));
    }

    #[test]
    fn test_comment_and_string_suppression() {
        let src = "# def hidden(): pass\ns = \"class Fake:\"\ndef real():\n    pass\n";
        let summary = extract(src, profile("python"));

        assert_eq!(summary.declarations.len(), 1);
        assert_eq!(summary.declarations[0].name, "real");
    }

    #[test]
    fn test_rust_extraction() {
        let src = "use std::collections::HashMap;\npub use crate::io;\n\nfn main() {\n}\n\nstruct Engine {\n}\n";
        let summary = extract(src, profile("rust"));

        assert_eq!(
            summary.imports,
            vec!["std::collections::HashMap", "crate::io"]
        );
        assert_eq!(summary.declarations[0].name, "main");
        assert_eq!(summary.declarations[1].kind, DeclKind::Class);
        assert_eq!(summary.declarations[1].name, "Engine");
        assert!(summary.tags.contains("main-entry"));
    }

    #[test]
    fn test_javascript_components_and_hooks() {
        let src = "import React from 'react'\nconst lodash = require(\"lodash\")\n\nconst App = () => {\n  const [n, setN] = useState(0)\n  return <div/>\n}\n\nfunction helper() {}\n";
        let summary = extract(src, profile("javascript"));

        assert_eq!(summary.imports, vec!["react", "lodash"]);
        let app = &summary.declarations[0];
        assert_eq!(app.kind, DeclKind::Component);
        assert_eq!(app.name, "App");
        let helper = &summary.declarations[1];
        assert_eq!(helper.kind, DeclKind::Function);
        assert!(summary.tags.contains("hook-usage"));
        assert!(summary.tags.contains("jsx"));
    }

    #[test]
    fn test_go_import_block() {
        let src = "package main\n\nimport (\n\t\"fmt\"\n\t\"os\"\n)\n\nfunc main() {\n\tfmt.Println(\"hi\")\n}\n";
        let summary = extract(src, profile("go"));

        assert_eq!(summary.imports, vec!["fmt", "os"]);
        assert_eq!(summary.declarations[0].name, "main");
        assert!(summary.tags.contains("main-entry"));
    }

    #[test]
    fn test_cpp_includes() {
        let src = "#include <stdio.h>\n#include \"local.h\"\n\nint main() { return 0; }\n";
        let summary = extract(src, profile("cpp"));

        assert_eq!(summary.imports, vec!["stdio.h", "local.h"]);
        assert!(summary.tags.contains("main-entry"));
    }

    #[test]
    fn test_generic_profile_opaque() {
        let summary = extract("just some plain text", generic_profile());
        assert!(summary.imports.is_empty());
        assert!(summary.declarations.is_empty());
        assert_eq!(summary.tags.len(), 1);
        assert!(summary.tags.contains("opaque-text"));
    }

    #[test]
    fn test_truncation_tag() {
        let mut src = String::from("import os\n");
        while src.len() <= MAX_SCAN_BYTES {
            src.push_str("x = 1\n");
        }
        let summary = extract(&src, profile("python"));

        assert!(summary.tags.contains("truncated"));
        assert_eq!(summary.imports, vec!["os"]);
        assert_eq!(summary.bytes, src.len());
    }

    #[test]
    fn test_extract_file_missing() {
        let err = extract_file(Path::new("/nonexistent/nowhere.py")).unwrap_err();
        assert!(matches!(err, AppError::InputNotFound(_)));
    }

    #[test]
    fn test_extract_file_with_path_tags() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("test_example.py");
        std::fs::write(&path, "def test_me():\n    assert True\n").unwrap();

        let summary = extract_file(&path).unwrap();
        assert_eq!(summary.language, "python");
        assert!(summary.tags.contains("test-code"));
    }
}
