//! Report output on disk

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Summary file name written by the k6 scenario's `handleSummary`
pub const DEFAULT_INPUT_FILE: &str = "custom-report.json";

/// Report file name written next to the default input
pub const DEFAULT_OUTPUT_FILE: &str = "custom-report.html";

/// Output path next to `input`, with the extension swapped
pub fn default_output_path(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension)
}

/// True when `a` and `b` name the same file
///
/// Paths are compared as given and, when both exist, after canonicalization.
pub fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Write data to file atomically using temp file + rename
///
/// Any existing file at `path` is replaced. The temp file is removed if any
/// step fails.
pub fn atomic_write(path: &Path, contents: &str) -> Result<()> {
    use std::fs;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }

    let temp_path = temp_path_for(path);

    if let Err(e) = write_then_rename(&temp_path, path, contents) {
        if temp_path.exists() {
            if let Err(cleanup) = fs::remove_file(&temp_path) {
                tracing::warn!(
                    path = %temp_path.display(),
                    error = %cleanup,
                    "failed to remove temp file"
                );
            }
        }
        return Err(e);
    }

    tracing::debug!(path = %path.display(), bytes = contents.len(), "report written");
    Ok(())
}

fn write_then_rename(temp_path: &Path, path: &Path, contents: &str) -> Result<()> {
    use std::fs;
    use std::io::Write;

    let mut file = fs::File::create(temp_path)
        .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("failed to write to temp file: {}", temp_path.display()))?;
    file.sync_all()
        .with_context(|| format!("failed to sync temp file: {}", temp_path.display()))?;
    drop(file);

    fs::rename(temp_path, path)
        .with_context(|| format!("failed to rename temp file to: {}", path.display()))?;
    Ok(())
}

/// `report.html` -> `.report.html.tmp` in the same directory
fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    path.with_file_name(format!(".{}.tmp", file_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_output_is_sibling_of_input() {
        let input = Path::new("reports/custom-report.json");
        assert_eq!(
            default_output_path(input, "html"),
            PathBuf::from("reports/custom-report.html")
        );
        assert_eq!(
            default_output_path(Path::new(DEFAULT_INPUT_FILE), "html"),
            PathBuf::from(DEFAULT_OUTPUT_FILE)
        );
    }

    #[test]
    fn test_atomic_write_overwrites() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("custom-report.html");
        fs::write(&path, "old").unwrap();

        atomic_write(&path, "new").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!temp.path().join(".custom-report.html.tmp").exists());
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let temp = tempfile::TempDir::new().unwrap();
        // A non-empty directory cannot be replaced by a file rename.
        let path = temp.path().join("custom-report.html");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep.txt"), "x").unwrap();

        assert!(atomic_write(&path, "<html></html>").is_err());
        assert!(!temp.path().join(".custom-report.html.tmp").exists());
        assert!(path.join("keep.txt").exists());
    }

    #[test]
    fn test_same_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let input = temp.path().join("run.html");
        fs::write(&input, "{}").unwrap();

        assert!(same_file(&input, &default_output_path(&input, "html")));
        assert!(same_file(&input, &temp.path().join(".").join("run.html")));
        assert!(!same_file(&input, &temp.path().join("run.txt")));
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("out").join("nested").join("report.html");
        atomic_write(&path, "<html></html>").unwrap();
        assert!(path.exists());
    }
}
