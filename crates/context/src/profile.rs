//! Language profiles: static extraction rule tables plus the classifier.
//!
//! Each supported language is a data entry, not a type. Adding a language
//! means adding one `LanguageProfile` literal to `PROFILES`; the generic
//! extraction algorithm in [`crate::extract`] consumes whatever rules the
//! selected profile carries.

use std::path::Path;

/// How an import/dependency line yields a module token.
#[derive(Debug, Clone, Copy)]
pub enum ImportRule {
    /// Token is the first word after the prefix (`import os`, `use std::fmt;`).
    Prefix { prefix: &'static str },

    /// Token is the text between two markers (`from collections import X`).
    Between {
        prefix: &'static str,
        until: &'static str,
    },

    /// Token is the first quoted or angle-bracketed string after the marker
    /// (`require("lodash")`, `#include <stdio.h>`, `import x from "./mod"`).
    Quoted { marker: &'static str },

    /// Opens a multi-line import group; while open, each line's first quoted
    /// token is an import (Go's `import ( ... )`).
    Block {
        open: &'static str,
        close: &'static str,
    },
}

/// How a declaration line yields a (kind, name) pair.
#[derive(Debug, Clone, Copy)]
pub struct DeclRule {
    /// Keyword introducing the declaration, including trailing space
    /// (`"def "`, `"fn "`, `"class "`).
    pub keyword: &'static str,

    /// Kind assigned to the capture.
    pub kind: super::types::DeclKind,

    /// Extra substring the line must contain (e.g. `type X struct`).
    pub requires: Option<&'static str>,

    /// The keyword introduces a binding, not a definition; only match when
    /// the line also contains `=>` (JS arrow functions).
    pub arrow: bool,
}

/// Whole-content boolean probe adding one tag when any marker matches.
#[derive(Debug, Clone, Copy)]
pub struct Probe {
    pub tag: &'static str,
    pub markers: &'static [&'static str],
}

/// Immutable descriptor for one language: extension matchers plus the
/// ordered rule set consumed by the extraction scan.
#[derive(Debug)]
pub struct LanguageProfile {
    pub id: &'static str,
    pub extensions: &'static [&'static str],
    pub line_comment: Option<&'static str>,
    pub quote_chars: &'static [char],
    pub import_rules: &'static [ImportRule],
    pub decl_rules: &'static [DeclRule],
    pub probes: &'static [Probe],
    /// Capitalized function-like declarations count as components (JSX).
    pub uppercase_components: bool,
}

use super::types::DeclKind;

const PYTHON: LanguageProfile = LanguageProfile {
    id: "python",
    extensions: &["py", "pyi"],
    line_comment: Some("#"),
    quote_chars: &['"', '\''],
    import_rules: &[
        ImportRule::Between {
            prefix: "from ",
            until: " import",
        },
        ImportRule::Prefix { prefix: "import " },
    ],
    decl_rules: &[
        DeclRule {
            keyword: "def ",
            kind: DeclKind::Function,
            requires: None,
            arrow: false,
        },
        DeclRule {
            keyword: "class ",
            kind: DeclKind::Class,
            requires: None,
            arrow: false,
        },
    ],
    probes: &[
        Probe {
            tag: "async-usage",
            markers: &["async def ", "await "],
        },
        Probe {
            tag: "test-code",
            markers: &["def test_", "import pytest", "import unittest"],
        },
        Probe {
            tag: "main-entry",
            markers: &["__main__"],
        },
    ],
    uppercase_components: false,
};

const JAVASCRIPT: LanguageProfile = LanguageProfile {
    id: "javascript",
    extensions: &["js", "jsx", "ts", "tsx", "mjs", "cjs"],
    line_comment: Some("//"),
    quote_chars: &['"', '\'', '`'],
    import_rules: &[
        ImportRule::Quoted { marker: "import " },
        ImportRule::Quoted {
            marker: "require(",
        },
    ],
    decl_rules: &[
        DeclRule {
            keyword: "function ",
            kind: DeclKind::Function,
            requires: None,
            arrow: false,
        },
        DeclRule {
            keyword: "class ",
            kind: DeclKind::Class,
            requires: None,
            arrow: false,
        },
        DeclRule {
            keyword: "const ",
            kind: DeclKind::Function,
            requires: None,
            arrow: true,
        },
        DeclRule {
            keyword: "let ",
            kind: DeclKind::Function,
            requires: None,
            arrow: true,
        },
    ],
    probes: &[
        Probe {
            tag: "async-usage",
            markers: &["async ", "await "],
        },
        Probe {
            tag: "test-code",
            markers: &["describe(", "it(", "test(", "expect("],
        },
        Probe {
            tag: "hook-usage",
            markers: &[
                "useState(",
                "useEffect(",
                "useContext(",
                "useMemo(",
                "useCallback(",
                "useRef(",
            ],
        },
        Probe {
            tag: "jsx",
            markers: &["/>", "</"],
        },
    ],
    uppercase_components: true,
};

const JAVA: LanguageProfile = LanguageProfile {
    id: "java",
    extensions: &["java"],
    line_comment: Some("//"),
    quote_chars: &['"'],
    import_rules: &[ImportRule::Prefix { prefix: "import " }],
    decl_rules: &[
        DeclRule {
            keyword: "class ",
            kind: DeclKind::Class,
            requires: None,
            arrow: false,
        },
        DeclRule {
            keyword: "interface ",
            kind: DeclKind::Class,
            requires: None,
            arrow: false,
        },
        DeclRule {
            keyword: "enum ",
            kind: DeclKind::Class,
            requires: None,
            arrow: false,
        },
    ],
    probes: &[
        Probe {
            tag: "test-code",
            markers: &["@Test", "org.junit"],
        },
        Probe {
            tag: "main-entry",
            markers: &["public static void main"],
        },
    ],
    uppercase_components: false,
};

const GO: LanguageProfile = LanguageProfile {
    id: "go",
    extensions: &["go"],
    line_comment: Some("//"),
    quote_chars: &['"', '`'],
    import_rules: &[
        ImportRule::Block {
            open: "import (",
            close: ")",
        },
        ImportRule::Quoted { marker: "import " },
    ],
    decl_rules: &[
        DeclRule {
            keyword: "func ",
            kind: DeclKind::Function,
            requires: None,
            arrow: false,
        },
        DeclRule {
            keyword: "type ",
            kind: DeclKind::Class,
            requires: Some(" struct"),
            arrow: false,
        },
        DeclRule {
            keyword: "type ",
            kind: DeclKind::Class,
            requires: Some(" interface"),
            arrow: false,
        },
    ],
    probes: &[
        Probe {
            tag: "async-usage",
            markers: &["go func(", "chan "],
        },
        Probe {
            tag: "test-code",
            markers: &["func Test", "testing.T"],
        },
        Probe {
            tag: "main-entry",
            markers: &["func main("],
        },
    ],
    uppercase_components: false,
};

const RUST: LanguageProfile = LanguageProfile {
    id: "rust",
    extensions: &["rs"],
    line_comment: Some("//"),
    quote_chars: &['"'],
    import_rules: &[ImportRule::Prefix { prefix: "use " }],
    decl_rules: &[
        DeclRule {
            keyword: "fn ",
            kind: DeclKind::Function,
            requires: None,
            arrow: false,
        },
        DeclRule {
            keyword: "struct ",
            kind: DeclKind::Class,
            requires: None,
            arrow: false,
        },
        DeclRule {
            keyword: "enum ",
            kind: DeclKind::Class,
            requires: None,
            arrow: false,
        },
        DeclRule {
            keyword: "trait ",
            kind: DeclKind::Class,
            requires: None,
            arrow: false,
        },
    ],
    probes: &[
        Probe {
            tag: "async-usage",
            markers: &["async fn ", ".await"],
        },
        Probe {
            tag: "test-code",
            markers: &["#[test]", "#[cfg(test)]"],
        },
        Probe {
            tag: "main-entry",
            markers: &["fn main("],
        },
    ],
    uppercase_components: false,
};

const CPP: LanguageProfile = LanguageProfile {
    id: "cpp",
    extensions: &["cpp", "cc", "cxx", "hpp", "hh", "c", "h"],
    line_comment: Some("//"),
    quote_chars: &['"'],
    import_rules: &[ImportRule::Quoted { marker: "#include" }],
    decl_rules: &[
        DeclRule {
            keyword: "class ",
            kind: DeclKind::Class,
            requires: None,
            arrow: false,
        },
        DeclRule {
            keyword: "struct ",
            kind: DeclKind::Class,
            requires: None,
            arrow: false,
        },
    ],
    probes: &[
        Probe {
            tag: "test-code",
            markers: &["TEST(", "gtest"],
        },
        Probe {
            tag: "main-entry",
            markers: &["int main("],
        },
    ],
    uppercase_components: false,
};

const RUBY: LanguageProfile = LanguageProfile {
    id: "ruby",
    extensions: &["rb", "rake"],
    line_comment: Some("#"),
    quote_chars: &['"', '\''],
    import_rules: &[ImportRule::Quoted { marker: "require" }],
    decl_rules: &[
        DeclRule {
            keyword: "def ",
            kind: DeclKind::Function,
            requires: None,
            arrow: false,
        },
        DeclRule {
            keyword: "class ",
            kind: DeclKind::Class,
            requires: None,
            arrow: false,
        },
        DeclRule {
            keyword: "module ",
            kind: DeclKind::Class,
            requires: None,
            arrow: false,
        },
    ],
    probes: &[Probe {
        tag: "test-code",
        markers: &["RSpec", "describe ", "def test_"],
    }],
    uppercase_components: false,
};

const PHP: LanguageProfile = LanguageProfile {
    id: "php",
    extensions: &["php"],
    line_comment: Some("//"),
    quote_chars: &['"', '\''],
    import_rules: &[
        ImportRule::Prefix { prefix: "use " },
        ImportRule::Quoted { marker: "require" },
        ImportRule::Quoted { marker: "include" },
    ],
    decl_rules: &[
        DeclRule {
            keyword: "function ",
            kind: DeclKind::Function,
            requires: None,
            arrow: false,
        },
        DeclRule {
            keyword: "class ",
            kind: DeclKind::Class,
            requires: None,
            arrow: false,
        },
    ],
    probes: &[Probe {
        tag: "test-code",
        markers: &["PHPUnit", "function test"],
    }],
    uppercase_components: false,
};

/// Universal safety net: no rules, no probes; extraction yields an
/// `opaque-text` tag for non-empty input and nothing else.
const GENERIC: LanguageProfile = LanguageProfile {
    id: "text",
    extensions: &[],
    line_comment: None,
    quote_chars: &[],
    import_rules: &[],
    decl_rules: &[],
    probes: &[],
    uppercase_components: false,
};

/// All known profiles, in classification order.
static PROFILES: &[&LanguageProfile] = &[
    &PYTHON, &JAVASCRIPT, &JAVA, &GO, &RUST, &CPP, &RUBY, &PHP,
];

/// The generic fallback profile.
pub fn generic_profile() -> &'static LanguageProfile {
    &GENERIC
}

/// Look up a profile by id.
pub fn profile_by_id(id: &str) -> Option<&'static LanguageProfile> {
    PROFILES.iter().copied().find(|p| p.id == id)
}

/// Whether any profile claims the extension (case-insensitive).
pub fn known_extension(ext: &str) -> bool {
    let ext = ext.to_lowercase();
    PROFILES.iter().any(|p| p.extensions.contains(&ext.as_str()))
}

/// Select a profile for a file: extension first, then content sniffing,
/// then the generic fallback. Never fails.
pub fn classify(path: Option<&Path>, content: &str) -> &'static LanguageProfile {
    if let Some(path) = path {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            let ext = ext.to_lowercase();
            for profile in PROFILES {
                if profile.extensions.contains(&ext.as_str()) {
                    return profile;
                }
            }
        }
    }

    sniff_content(content).unwrap_or(&GENERIC)
}

/// Heuristic content sniffing for unknown extensions.
fn sniff_content(content: &str) -> Option<&'static LanguageProfile> {
    // Strong per-language keyword pairs; order matters, first hit wins.
    if content.contains("fn ") && (content.contains("impl ") || content.contains("pub ")) {
        return Some(&RUST);
    }
    if content.contains("func ") && content.contains("package ") {
        return Some(&GO);
    }
    if content.contains("def ") && (content.contains("import ") || content.contains("from ")) {
        return Some(&PYTHON);
    }
    if content.contains("#include") {
        return Some(&CPP);
    }
    if content.contains("function ") || content.contains("=> {") || content.contains("const ") {
        return Some(&JAVASCRIPT);
    }
    None
}

/// Tags derived from the file path rather than its content.
pub fn path_tags(path: &Path) -> Vec<&'static str> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let mut tags = Vec::new();
    if name.contains("test") || name.contains("spec") {
        tags.push("test-code");
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_classify_by_extension() {
        assert_eq!(classify(Some(Path::new("main.py")), "").id, "python");
        assert_eq!(classify(Some(Path::new("app.tsx")), "").id, "javascript");
        assert_eq!(classify(Some(Path::new("lib.rs")), "").id, "rust");
        assert_eq!(classify(Some(Path::new("server.go")), "").id, "go");
        assert_eq!(classify(Some(Path::new("util.hh")), "").id, "cpp");
    }

    #[test]
    fn test_classify_unknown_extension_falls_back() {
        assert_eq!(classify(Some(Path::new("notes.xyz")), "plain words").id, "text");
        assert_eq!(classify(None, "").id, "text");
    }

    #[test]
    fn test_classify_sniffs_content() {
        let rust = "pub fn run() {}\nimpl Runner {}";
        assert_eq!(classify(Some(Path::new("snippet")), rust).id, "rust");

        let go = "package main\nfunc main() {}";
        assert_eq!(classify(None, go).id, "go");

        let python = "import os\ndef main():\n    pass";
        assert_eq!(classify(None, python).id, "python");
    }

    #[test]
    fn test_path_tags() {
        assert_eq!(path_tags(&PathBuf::from("tests/test_api.py")), vec!["test-code"]);
        assert_eq!(path_tags(&PathBuf::from("app.spec.ts")), vec!["test-code"]);
        assert!(path_tags(&PathBuf::from("src/main.rs")).is_empty());
    }

    #[test]
    fn test_profile_by_id() {
        assert!(profile_by_id("python").is_some());
        assert!(profile_by_id("cobol").is_none());
    }
}
