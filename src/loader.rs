//! Schema file discovery and loading
//!
//! Walks files and directories for schema documents and decodes each one.
//! Paths that are given explicitly are always listed; extension and
//! directory filters only apply while walking. The parser is picked by
//! [`Schema::from_source`], so an unknown extension fails at load time.

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::checksum::Checksum;
use crate::config::InputConfig;
use crate::schema::Schema;

/// A decoded schema together with where it came from
#[derive(Debug, Clone)]
pub struct LoadedSchema {
    pub path: PathBuf,
    pub schema: Schema,
    /// Fingerprint of the file contents as read
    pub source_checksum: Checksum,
}

/// Expand files and directories into a sorted, de-duplicated list of schema files
pub fn discover(paths: &[PathBuf], config: &InputConfig) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for root in paths {
        if root.is_file() {
            files.push(root.clone());
            continue;
        }
        if !root.is_dir() {
            anyhow::bail!("No such file or directory: {}", root.display());
        }

        let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !config
                    .skip_dirs
                    .iter()
                    .any(|skip| entry.file_name().to_string_lossy() == skip.as_str())
        });

        let mut found: Vec<PathBuf> = walker
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| has_schema_extension(e.path(), config))
            .map(|e| e.into_path())
            .collect();
        found.sort();
        files.extend(found);
    }

    let mut seen = std::collections::HashSet::new();
    files.retain(|path| seen.insert(path.clone()));

    tracing::debug!(count = files.len(), "discovered schema files");
    Ok(files)
}

/// Read and decode one schema file
pub fn load(path: &Path) -> anyhow::Result<LoadedSchema> {
    let content = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;

    let schema = Schema::from_source(&content, path)
        .map_err(|e| anyhow::anyhow!("Failed to parse schema in {}: {}", path.display(), e))?;

    Ok(LoadedSchema {
        path: path.to_path_buf(),
        schema,
        source_checksum: Checksum::from_text(&content),
    })
}

fn has_schema_extension(path: &Path, config: &InputConfig) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| config.extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERSON: &str = "classes:\n  Person:\n    slots:\n      - id\n";

    #[test]
    fn test_discover_walks_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.yaml"), PERSON).unwrap();
        fs::write(dir.path().join("a.yml"), PERSON).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a schema").unwrap();
        fs::create_dir(dir.path().join("target")).unwrap();
        fs::write(dir.path().join("target/skipped.yaml"), PERSON).unwrap();

        let files = discover(&[dir.path().to_path_buf()], &InputConfig::default()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.yml", "b.yaml"]);
    }

    #[test]
    fn test_discover_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(discover(&[missing], &InputConfig::default()).is_err());
    }

    #[test]
    fn test_load_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("person.yaml");
        let json = dir.path().join("person.json");
        fs::write(&yaml, PERSON).unwrap();
        fs::write(&json, r#"{"classes": {"Person": {"slots": ["id"]}}}"#).unwrap();

        let from_yaml = load(&yaml).unwrap();
        let from_json = load(&json).unwrap();
        assert_eq!(from_yaml.schema, from_json.schema);
        assert!(from_yaml.source_checksum.verify(PERSON));
    }

    #[test]
    fn test_load_reports_path_on_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "classes:\n  Person: 42\n").unwrap();

        let err = load(&path).unwrap_err().to_string();
        assert!(err.contains("broken.yaml"));
        assert!(err.contains("classes.Person"));
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("person.txt");
        fs::write(&path, PERSON).unwrap();

        let err = load(&path).unwrap_err().to_string();
        assert!(err.contains("person.txt"));
        assert!(err.contains("Unsupported schema file extension: txt"));
    }
}
