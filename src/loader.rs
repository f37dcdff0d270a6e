//! This module provides the `ProgramLoader` struct, responsible for loading machine
//! definitions from files and strings. Two formats are understood: the `.tm` text
//! format (see [`parser`](crate::parser)) and the JSON form of [`Program`].

use crate::parser::parse;
use crate::types::{Program, TuringMachineError};
use crate::validator::validate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extension of the text definition format.
pub const TEXT_EXTENSION: &str = "tm";
/// File extension of the JSON definition format.
pub const JSON_EXTENSION: &str = "json";

/// `ProgramLoader` is a utility struct for loading machine definitions.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single program from the specified file path.
    ///
    /// Files ending in `.json` are decoded as JSON; anything else is parsed as
    /// the text format.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is successfully read, decoded and validated.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * Any parsing, decoding or validation error otherwise.
    pub fn load_program(path: &Path) -> Result<Program, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), bytes = content.len(), "loading program");

        if has_extension(path, JSON_EXTENSION) {
            Self::load_program_from_json(&content)
        } else {
            parse(&content)
        }
    }

    /// Loads a single program from text-format content.
    ///
    /// This is useful for programs that are not stored in files, e.g. piped via stdin.
    pub fn load_program_from_string(content: &str) -> Result<Program, TuringMachineError> {
        parse(content)
    }

    /// Loads a single program from its JSON representation.
    pub fn load_program_from_json(content: &str) -> Result<Program, TuringMachineError> {
        let program: Program = serde_json::from_str(content)
            .map_err(|e| TuringMachineError::DefinitionError(format!("Invalid JSON: {}", e)))?;

        validate(&program)?;

        Ok(program)
    }

    /// Loads every definition file (`.tm` or `.json`) from a given directory.
    ///
    /// Directories and files with other extensions are skipped.
    ///
    /// # Returns
    ///
    /// One result per definition file: its path and program, or the error that
    /// prevented it from loading.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), TuringMachineError>> {
        if !directory.exists() {
            return vec![Err(TuringMachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        let mut results: Vec<_> = entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(TuringMachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir()
                    || !(has_extension(&path, TEXT_EXTENSION)
                        || has_extension(&path, JSON_EXTENSION))
                {
                    return None;
                }

                match Self::load_program(&path) {
                    Ok(program) => Some(Ok((path, program))),
                    Err(e) => Some(Err(TuringMachineError::FileError(format!(
                        "Failed to load program from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect();

        // Directory order is platform dependent.
        results.sort_by(|a, b| match (a, b) {
            (Ok((a, _)), Ok((b, _))) => a.cmp(b),
            (Ok(_), Err(_)) => std::cmp::Ordering::Less,
            (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
            (Err(_), Err(_)) => std::cmp::Ordering::Equal,
        });

        results
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::State;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const VALID_PROGRAM: &str =
        "name: Test Program\naccept: stop\nrules:\n  start, a -> b, R, stop\n";

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_valid_program() {
        let dir = tempdir().unwrap();
        let file_path = write_file(dir.path(), "test.tm", VALID_PROGRAM);

        let program = ProgramLoader::load_program(&file_path).unwrap();

        assert_eq!(program.name, "Test Program");
        assert_eq!(program.start.as_str(), "start");
        assert!(program.rules.get(&State::from("start"), 'a').is_some());
    }

    #[test]
    fn test_load_invalid_program() {
        let dir = tempdir().unwrap();
        let file_path = write_file(dir.path(), "invalid.tm", "This is not a valid program");

        let result = ProgramLoader::load_program(&file_path);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = ProgramLoader::load_program(&dir.path().join("missing.tm"));

        assert!(matches!(result, Err(TuringMachineError::FileError(_))));
    }

    #[test]
    fn test_json_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let program = ProgramLoader::load_program_from_string(VALID_PROGRAM).unwrap();
        let json = serde_json::to_string_pretty(&program).unwrap();
        let file_path = write_file(dir.path(), "test.json", &json);

        let loaded = ProgramLoader::load_program(&file_path).unwrap();
        assert_eq!(loaded, program);
    }

    #[test]
    fn test_json_is_validated() {
        let json = r#"{
            "name": "Conflict",
            "start": "q0",
            "accept": ["q1"],
            "reject": ["q1"],
            "rules": [
                {"state": "q0", "read": "a", "write": "a", "direction": "Right", "next": "q1"}
            ]
        }"#;

        let result = ProgramLoader::load_program_from_json(json);
        assert!(matches!(result, Err(TuringMachineError::Validation(_))));
    }

    #[test]
    fn test_invalid_json() {
        let result = ProgramLoader::load_program_from_json("{ not json");
        assert!(matches!(result, Err(TuringMachineError::DefinitionError(_))));
    }

    #[test]
    fn test_load_programs_from_directory() {
        let dir = tempdir().unwrap();

        write_file(dir.path(), "valid.tm", VALID_PROGRAM);
        write_file(dir.path(), "invalid.tm", "This is not a valid program");
        write_file(dir.path(), "ignored.txt", "This file should be ignored");

        let results = ProgramLoader::load_programs(dir.path());

        // 1 success and 1 error, successes first
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(results[1].is_err());
    }

    #[test]
    fn test_load_programs_missing_directory() {
        let dir = tempdir().unwrap();
        let results = ProgramLoader::load_programs(&dir.path().join("nope"));

        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
