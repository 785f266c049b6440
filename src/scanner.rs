use crate::error::{EngineError, Result};
use crate::outcome::{Outcome, Warning};
use std::path::Path;

pub const INPUT_PREFIX: &str = "PersoFile_";

/// Names of embossing files in `directory`, in filesystem order.
///
/// Symlinks are followed. Prefixed names that are not valid UTF-8 are left
/// out and reported as warnings.
pub fn list_input_files(directory: &Path) -> Result<Outcome<Vec<String>>> {
    if !directory.is_dir() {
        return Err(EngineError::DirectoryNotFound(directory.to_path_buf()));
    }

    let entries = std::fs::read_dir(directory).map_err(|err| EngineError::io(directory, err))?;
    let mut names = Vec::new();
    let mut warnings = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| EngineError::io(directory, err))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let raw_name = entry.file_name();
        match raw_name.to_str() {
            Some(name) if name.starts_with(INPUT_PREFIX) => names.push(name.to_string()),
            Some(_) => {}
            None => {
                if raw_name.to_string_lossy().starts_with(INPUT_PREFIX) {
                    warnings.push(Warning::general(EngineError::UndecodableFilename(path)));
                }
            }
        }
    }

    if names.is_empty() {
        return Err(EngineError::EmptyOrNoMatches(directory.to_path_buf()));
    }
    Ok(Outcome::with_warnings(names, warnings))
}

/// Same as [`list_input_files`] but sorted by name.
pub fn list_input_files_sorted(directory: &Path) -> Result<Outcome<Vec<String>>> {
    let mut listed = list_input_files(directory)?;
    listed.value.sort();
    Ok(listed)
}

/// Whole-file read. Bytes that are not UTF-8 (legacy code pages) are
/// replaced rather than failing the file.
pub fn read_body(directory: &Path, file_name: &str) -> Result<String> {
    let path = directory.join(file_name);
    let bytes = std::fs::read(&path).map_err(|err| EngineError::io(path, err))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
