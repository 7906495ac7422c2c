use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use promptcraft_core::{AppError, AppResult};
use promptcraft_prompt::PromptSpec;
use tracing::debug;
use walkdir::WalkDir;

/// File-backed store of named prompt specifications.
///
/// Writes are last-writer-wins: a record is serialized fully before
/// the file is replaced, so a reader never sees a partial session.
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Open (and create if needed) the store under `state_dir`, the
    /// project's `.promptcraft` directory.
    pub fn new(state_dir: &Path) -> AppResult<Self> {
        let dir = state_dir.join("sessions");
        fs::create_dir_all(&dir)
            .map_err(|e| AppError::Storage(format!("cannot create {}: {e}", dir.display())))?;
        Ok(SessionStore { dir })
    }

    fn path_for(&self, name: &str) -> AppResult<PathBuf> {
        // Separators would escape the store directory; a leading dot would
        // collide with temp files and be hidden from listings.
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(AppError::Storage(format!("invalid session name '{name}'")));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }

    /// Save a session, overwriting any existing record with the name.
    pub fn save(&self, name: &str, spec: &PromptSpec) -> AppResult<()> {
        self.write(name, spec, false)
    }

    /// Save a session only if the name is not already taken.
    pub fn save_new(&self, name: &str, spec: &PromptSpec) -> AppResult<()> {
        self.write(name, spec, true)
    }

    fn write(&self, name: &str, spec: &PromptSpec, create_only: bool) -> AppResult<()> {
        let path = self.path_for(name)?;
        if create_only && path.exists() {
            return Err(AppError::Storage(format!(
                "session '{name}' already exists"
            )));
        }

        let json = serde_json::to_string_pretty(spec)?;
        // Write to a sibling temp file first so a crash mid-write
        // never leaves a half-record behind the session name.
        let tmp = self.dir.join(format!(".{name}.json.tmp"));
        fs::write(&tmp, json)
            .map_err(|e| AppError::Storage(format!("cannot write session '{name}': {e}")))?;
        fs::rename(&tmp, &path)
            .map_err(|e| AppError::Storage(format!("cannot store session '{name}': {e}")))?;

        debug!(session = name, path = %path.display(), "saved session");
        Ok(())
    }

    pub fn load(&self, name: &str) -> AppResult<PromptSpec> {
        let path = self.path_for(name)?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::SessionNotFound(name.to_string()));
            }
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "cannot read session '{name}': {e}"
                )));
            }
        };
        let spec = serde_json::from_str(&contents)?;
        Ok(spec)
    }

    /// All sessions as `(name, last_modified)`, most recent first.
    pub fn list(&self) -> AppResult<Vec<(String, DateTime<Utc>)>> {
        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.dir).max_depth(1).into_iter().flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.starts_with('.') {
                continue;
            }

            // Prefer the record's own timestamp; fall back to mtime.
            let modified = match self.load(stem) {
                Ok(spec) => spec.modified_at,
                Err(_) => entry
                    .metadata()
                    .ok()
                    .and_then(|m| m.modified().ok())
                    .map(DateTime::<Utc>::from)
                    .unwrap_or_else(Utc::now),
            };
            entries.push((stem.to_string(), modified));
        }

        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(entries)
    }

    pub fn delete(&self, name: &str) -> AppResult<()> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::SessionNotFound(name.to_string()))
            }
            Err(e) => Err(AppError::Storage(format!(
                "cannot delete session '{name}': {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use promptcraft_prompt::{get_template, PromptSpec};

    fn store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::TempDir::new().unwrap();
        let store = SessionStore::new(&dir.path().join(".promptcraft")).unwrap();
        (dir, store)
    }

    fn sample_spec() -> PromptSpec {
        let template = get_template("code-review").unwrap();
        let mut spec = PromptSpec::new(template);
        spec.set("Code", "fn main() {}").unwrap();
        spec
    }

    #[test]
    fn test_round_trip_preserves_all_sections() {
        let (_dir, store) = store();
        let spec = sample_spec();
        store.save("review", &spec).unwrap();

        let loaded = store.load("review").unwrap();
        assert_eq!(loaded.template, spec.template);
        assert_eq!(loaded.sections, spec.sections);
    }

    #[test]
    fn test_load_missing_session() {
        let (_dir, store) = store();
        let err = store.load("ghost").unwrap_err();
        assert!(matches!(err, AppError::SessionNotFound(_)));
    }

    #[test]
    fn test_save_overwrites_but_save_new_refuses() {
        let (_dir, store) = store();
        let spec = sample_spec();
        store.save("x", &spec).unwrap();
        store.save("x", &spec).unwrap();
        assert!(matches!(
            store.save_new("x", &spec),
            Err(AppError::Storage(_))
        ));
    }

    #[test]
    fn test_list_is_most_recent_first() {
        let (_dir, store) = store();
        let mut older = sample_spec();
        older.modified_at = Utc::now() - Duration::hours(1);
        let newer = sample_spec();

        store.save("older", &older).unwrap();
        store.save("newer", &newer).unwrap();

        let names: Vec<String> = store.list().unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["newer", "older"]);
    }

    #[test]
    fn test_delete_and_invalid_names() {
        let (_dir, store) = store();
        store.save("temp", &sample_spec()).unwrap();
        store.delete("temp").unwrap();
        assert!(matches!(
            store.delete("temp"),
            Err(AppError::SessionNotFound(_))
        ));
        assert!(store.save("../escape", &sample_spec()).is_err());
        assert!(store.save(".hidden", &sample_spec()).is_err());
    }

    #[test]
    fn test_interior_dots_are_legal_names() {
        let (_dir, store) = store();
        let spec = sample_spec();
        store.save("v1..v2", &spec).unwrap();

        let loaded = store.load("v1..v2").unwrap();
        assert_eq!(loaded.sections, spec.sections);
        store.delete("v1..v2").unwrap();
    }
}
