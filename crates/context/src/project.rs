//! Project/framework detection.
//!
//! Fingerprints a project directory from marker files and dependency
//! manifests, then maps the detected frameworks to suggested template
//! names. Purely advisory: callers must work fine when nothing is detected.

use std::path::Path;

/// Marker files/directories per framework. A directory marker ends in '/'.
const FRAMEWORK_MARKERS: &[(&str, &[&str])] = &[
    ("react", &["src/App.jsx", "src/App.tsx", "src/index.tsx"]),
    ("node", &["package.json"]),
    ("python", &["requirements.txt", "pyproject.toml", "setup.py"]),
    ("django", &["manage.py"]),
    ("java", &["pom.xml", "build.gradle", "build.gradle.kts"]),
    ("go", &["go.mod"]),
    ("rust", &["Cargo.toml"]),
    ("flutter", &["pubspec.yaml"]),
    ("angular", &["angular.json"]),
    ("nextjs", &["next.config.js", "next.config.mjs"]),
];

/// Template suggestions per framework, in priority order.
const FRAMEWORK_TEMPLATES: &[(&str, &[&str])] = &[
    ("react", &["code-review", "testing", "refactoring"]),
    ("node", &["code-review", "debugging", "testing"]),
    ("python", &["debugging", "refactoring", "testing"]),
    ("django", &["code-review", "feature-planning", "refactoring"]),
    ("fastapi", &["code-review", "testing", "feature-planning"]),
    ("java", &["code-review", "refactoring", "testing"]),
    ("go", &["code-review", "testing", "debugging"]),
    ("rust", &["code-review", "refactoring", "debugging"]),
    ("flutter", &["feature-planning", "testing", "code-review"]),
    ("vue", &["code-review", "testing", "refactoring"]),
    ("angular", &["feature-planning", "code-review", "testing"]),
    ("nextjs", &["code-review", "feature-planning", "testing"]),
];

const DEFAULT_SUGGESTIONS: &[&str] = &["code-review", "debugging", "testing"];

const SUGGESTION_PRIORITY: &[&str] = &[
    "code-review",
    "debugging",
    "testing",
    "feature-planning",
    "refactoring",
];

/// Detect the frameworks present in a project directory.
///
/// Marker files pick the coarse set; `package.json` dependencies and Python
/// requirement files refine it (e.g. `node` becomes `react` or `nextjs`,
/// `python` becomes `django` or `fastapi`).
pub fn detect_frameworks(project_dir: &Path) -> Vec<String> {
    let mut detected: Vec<String> = Vec::new();

    for (framework, markers) in FRAMEWORK_MARKERS {
        if markers.iter().any(|m| project_dir.join(m).exists()) {
            detected.push((*framework).to_string());
        }
    }

    if let Some(js) = detect_js_framework(project_dir) {
        if !detected.iter().any(|f| f == js) {
            detected.push(js.to_string());
        }
        // A specific JS framework supersedes the generic node entry.
        if matches!(js, "react" | "vue" | "angular" | "nextjs") {
            detected.retain(|f| f != "node");
        }
    }

    if detected.iter().any(|f| f == "python") {
        if let Some(py) = detect_python_framework(project_dir) {
            if !detected.iter().any(|f| f == py) {
                detected.push(py.to_string());
            }
            detected.retain(|f| f != "python");
        }
    }

    detected
}

/// Inspect `package.json` dependencies for a specific JS framework.
fn detect_js_framework(project_dir: &Path) -> Option<&'static str> {
    let manifest = project_dir.join("package.json");
    let contents = std::fs::read_to_string(manifest).ok()?;
    let parsed: serde_json::Value = serde_json::from_str(&contents).ok()?;

    let mut deps = serde_json::Map::new();
    for key in ["dependencies", "devDependencies"] {
        if let Some(map) = parsed.get(key).and_then(|v| v.as_object()) {
            deps.extend(map.clone());
        }
    }

    if deps.contains_key("react") {
        if deps.contains_key("next") {
            return Some("nextjs");
        }
        return Some("react");
    }
    if deps.contains_key("vue") {
        return Some("vue");
    }
    if deps.contains_key("@angular/core") {
        return Some("angular");
    }
    if deps.contains_key("express") {
        return Some("node");
    }

    None
}

/// Inspect requirement files for a specific Python framework.
fn detect_python_framework(project_dir: &Path) -> Option<&'static str> {
    if project_dir.join("manage.py").exists() {
        return Some("django");
    }

    for file in ["requirements.txt", "pyproject.toml"] {
        if let Ok(contents) = std::fs::read_to_string(project_dir.join(file)) {
            let contents = contents.to_lowercase();
            if contents.contains("fastapi") {
                return Some("fastapi");
            }
            if contents.contains("django") {
                return Some("django");
            }
        }
    }

    None
}

/// Top-3 template suggestions for the project, in fixed priority order.
pub fn suggested_templates(project_dir: &Path) -> Vec<String> {
    let frameworks = detect_frameworks(project_dir);

    let mut pool: Vec<&str> = Vec::new();
    for framework in &frameworks {
        if let Some((_, templates)) = FRAMEWORK_TEMPLATES.iter().find(|(f, _)| f == framework) {
            for t in *templates {
                if !pool.contains(t) {
                    pool.push(t);
                }
            }
        }
    }

    if pool.is_empty() {
        return DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect();
    }

    let mut ordered: Vec<String> = SUGGESTION_PRIORITY
        .iter()
        .filter(|t| pool.contains(*t))
        .map(|t| t.to_string())
        .collect();
    for t in pool {
        if !ordered.iter().any(|o| o == t) {
            ordered.push(t.to_string());
        }
    }

    ordered.truncate(3);
    ordered
}

/// Human-readable description of the detected project type.
pub fn project_description(project_dir: &Path) -> String {
    let frameworks = detect_frameworks(project_dir);

    match frameworks.len() {
        0 => "Unknown project type".to_string(),
        1 => format!("{} project", title_case(&frameworks[0])),
        _ => {
            let names: Vec<String> = frameworks.iter().map(|f| title_case(f)).collect();
            format!("{} project", names.join(" and "))
        }
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_rust_project() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[package]\n").unwrap();

        let detected = detect_frameworks(dir.path());
        assert_eq!(detected, vec!["rust"]);
        assert_eq!(project_description(dir.path()), "Rust project");
    }

    #[test]
    fn test_detect_react_from_package_json() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("package.json"),
            r#"{"dependencies": {"react": "^18.0.0"}}"#,
        )
        .unwrap();

        let detected = detect_frameworks(dir.path());
        assert!(detected.iter().any(|f| f == "react"));
        assert!(!detected.iter().any(|f| f == "node"));
    }

    #[test]
    fn test_detect_fastapi_refines_python() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("requirements.txt"), "fastapi\nuvicorn\n").unwrap();

        let detected = detect_frameworks(dir.path());
        assert!(detected.iter().any(|f| f == "fastapi"));
        assert!(!detected.iter().any(|f| f == "python"));
    }

    #[test]
    fn test_suggestions_default_for_empty_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let suggestions = suggested_templates(dir.path());
        assert_eq!(suggestions, vec!["code-review", "debugging", "testing"]);
    }

    #[test]
    fn test_suggestions_capped_at_three() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("Cargo.toml"), "[package]\n").unwrap();
        std::fs::write(dir.path().join("go.mod"), "module x\n").unwrap();

        let suggestions = suggested_templates(dir.path());
        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[0], "code-review");
    }
}
