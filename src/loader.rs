//! This module provides the `ProgramLoader` struct, responsible for loading machine
//! descriptions from files and strings.

use crate::config::Config;
use crate::parser::{parse, parse_with};
use crate::types::{Program, TuringMachineError};
use std::fs;
use std::path::Path;
use tracing::debug;

/// `ProgramLoader` is a utility struct for loading machine descriptions.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a description from the specified file path using the default limits.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is successfully read and parsed.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::ParseError)` if a field is missing or malformed.
    /// * `Err(TuringMachineError::ValidationError)` if the machine exceeds a limit.
    pub fn load_program(path: &Path) -> Result<Program, TuringMachineError> {
        Self::load_program_with(path, &Config::default())
    }

    /// Loads a description from the specified file path, checking it against `config`.
    pub fn load_program_with(path: &Path, config: &Config) -> Result<Program, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        debug!(path = %path.display(), bytes = content.len(), "loading machine description");

        parse_with(&content, config)
    }

    /// Loads a description from the provided string content using the default limits.
    pub fn load_program_from_string(content: &str) -> Result<Program, TuringMachineError> {
        parse(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_valid_program() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("input.txt");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"ab\n6\n1\n1 a b D 5\n2\na\nab\n").unwrap();

        let program = ProgramLoader::load_program(&file_path).unwrap();
        assert_eq!(program.definition.transitions.len(), 1);
        assert_eq!(program.inputs, vec!["a", "ab"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("missing.txt");

        let result = ProgramLoader::load_program(&file_path);
        match result {
            Err(TuringMachineError::FileError(msg)) => assert!(msg.contains("missing.txt")),
            other => panic!("Expected a file error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_invalid_program() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("invalid.txt");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"ab six states").unwrap();

        let result = ProgramLoader::load_program(&file_path);
        assert!(matches!(result, Err(TuringMachineError::ParseError(_))));
    }

    #[test]
    fn test_load_with_smaller_tape() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("input.txt");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"a 6 0 1 aaaa").unwrap();

        let config = Config {
            tape_size: 4,
            ..Config::default()
        };

        let result = ProgramLoader::load_program_with(&file_path, &config);
        assert!(matches!(result, Err(TuringMachineError::ValidationError(_))));
    }

    #[test]
    fn test_load_program_from_string() {
        let program = ProgramLoader::load_program_from_string("a 1 0 0").unwrap();
        assert!(program.inputs.is_empty());
    }
}
