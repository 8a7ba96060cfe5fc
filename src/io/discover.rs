//! Input file discovery.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::InstrumentModel;
use crate::error::AppError;

/// Recursively collect raw files for `model` under `dir`, sorted by path.
///
/// Sorting keeps the summary order stable across platforms and runs.
pub fn discover_files(dir: &Path, model: InstrumentModel) -> Result<Vec<PathBuf>, AppError> {
    if !dir.is_dir() {
        return Err(AppError::new(
            2,
            format!("Input directory '{}' does not exist or is not a directory.", dir.display()),
        ));
    }

    let mut files = Vec::new();
    walk(dir, model.extension(), &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, extension: &str, files: &mut Vec<PathBuf>) -> Result<(), AppError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| AppError::new(2, format!("Failed to list '{}': {e}", dir.display())))?;

    for entry in entries {
        let entry = entry.map_err(|e| AppError::new(2, format!("Failed to list '{}': {e}", dir.display())))?;
        let path = entry.path();

        if path.is_dir() {
            walk(&path, extension, files)?;
        } else if path.is_file() && has_extension(&path, extension) {
            files.push(path);
        }
    }
    Ok(())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn finds_matching_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("day2");
        fs::create_dir(&nested).unwrap();
        File::create(dir.path().join("b.vpd")).unwrap();
        File::create(dir.path().join("a.VPD")).unwrap();
        File::create(dir.path().join("notes.txt")).unwrap();
        File::create(dir.path().join("c.dat")).unwrap();
        File::create(nested.join("d.vpd")).unwrap();

        let files = discover_files(dir.path(), InstrumentModel::MidasEcm).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["a.VPD", "b.vpd", "day2/d.vpd"]);

        let files = discover_files(dir.path(), InstrumentModel::Aquadopp).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn missing_directory_is_an_input_error() {
        let err = discover_files(Path::new("/definitely/not/here"), InstrumentModel::Aquadopp).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
