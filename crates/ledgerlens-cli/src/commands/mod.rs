//! Command implementations.

pub mod compare;
pub mod extract;
pub mod group;
pub mod run;
pub mod validate;

pub use self::compare::execute_compare;
pub use self::extract::execute_extract;
pub use self::group::execute_group;
pub use self::run::execute_run;
pub use self::validate::execute_validate;

use crate::error::{CliError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read a whole text file.
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| CliError::File {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and deserialize a JSON artifact.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = read_text(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Write a pretty-printed JSON artifact, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let to_file_error = |source| CliError::File {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(to_file_error)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(to_file_error)?;
    debug!("Wrote {}", path.display());
    Ok(())
}

/// `report.json` with suffix `grouped` becomes `report.grouped.json` in the same directory.
pub fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "json".to_string());
    path.with_file_name(format!("{}.{}.{}", stem, suffix, extension))
}

/// File name reported as the extraction source.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_sibling_path() {
        assert_eq!(
            sibling_path(Path::new("out/report.json"), "grouped"),
            PathBuf::from("out/report.grouped.json")
        );
        assert_eq!(
            sibling_path(Path::new("report"), "validation"),
            PathBuf::from("report.validation.json")
        );
    }

    #[test]
    fn test_source_name() {
        assert_eq!(source_name(Path::new("/data/annual.txt")), "annual.txt");
    }

    #[test]
    fn test_write_then_read_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/artifact.json");

        write_json(&path, &json!({"a": 1})).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\n  \"a\": 1"));

        let value: Value = read_json(&path).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_missing_input_names_file() {
        let err = read_text(Path::new("/nonexistent/input.txt")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/input.txt"));
    }
}
