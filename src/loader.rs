//! This module provides the `DocumentLoader` struct, responsible for loading Turing machines and
//! DFAs from JSON documents on disk or in memory.

use crate::codec::{decode_dfa, decode_turing};
use crate::dfa::Dfa;
use crate::machine::TuringMachine;
use crate::types::AutomatonError;
use std::fs;
use std::path::{Path, PathBuf};

/// `DocumentLoader` is a utility struct for loading persisted machines.
/// It provides methods to load a single document from a file or a string, and to discover
/// and load every `.json` Turing machine document within a directory.
pub struct DocumentLoader;

impl DocumentLoader {
    /// Loads a Turing machine, including its saved tape and state, from `path`.
    ///
    /// # Returns
    ///
    /// * `Ok(TuringMachine)` if the file is read and decoded.
    /// * `Err(AutomatonError::FileError)` if the file cannot be read.
    /// * `Err(AutomatonError::Document)` or `Err(AutomatonError::Invalid)` if the content
    ///   is not a valid machine document.
    pub fn load_turing(path: &Path) -> Result<TuringMachine, AutomatonError> {
        decode_turing(&read(path)?)
    }

    /// Loads a DFA from `path`.
    pub fn load_dfa(path: &Path) -> Result<Dfa, AutomatonError> {
        decode_dfa(&read(path)?)
    }

    /// Loads a Turing machine from string content, e.g. piped input.
    pub fn load_turing_from_string(content: &str) -> Result<TuringMachine, AutomatonError> {
        decode_turing(content)
    }

    /// Loads every Turing machine document (`.json` extension) in `directory`.
    ///
    /// Directories and other files are skipped. Each loaded file yields one result, so a
    /// broken document does not hide the others.
    pub fn load_turing_dir(
        directory: &Path,
    ) -> Vec<Result<(PathBuf, TuringMachine), AutomatonError>> {
        if !directory.exists() {
            return vec![Err(AutomatonError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(AutomatonError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(AutomatonError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                if path.is_dir() || path.extension().is_none_or(|ext| ext != "json") {
                    return None;
                }

                Some(Self::load_turing(&path).map(|machine| (path, machine)))
            })
            .collect()
    }
}

fn read(path: &Path) -> Result<String, AutomatonError> {
    fs::read_to_string(path).map_err(|e| {
        AutomatonError::FileError(format!("Failed to read file {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const MACHINE: &str = r#"{
        "states": ["q0", "qa"],
        "tape_alphabet": ["a", null],
        "input_alphabet": ["a"],
        "start": "q0",
        "accept": ["qa"],
        "reject": [],
        "transitions": [
            {"state": "q0", "read": "a", "write": {"Put": null}, "move": "Right", "next": "qa"}
        ],
        "tape": ["a"]
    }"#;

    fn write_file(path: &Path, content: &str) {
        let mut file = File::create(path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn test_load_valid_document() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("erase.json");
        write_file(&file_path, MACHINE);

        let mut machine = DocumentLoader::load_turing(&file_path).unwrap();
        assert!(machine.run());
        assert_eq!(machine.tape().contents(), &[crate::types::Symbol::Blank]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = DocumentLoader::load_dfa(&dir.path().join("missing.json"));

        assert!(matches!(result, Err(AutomatonError::FileError(_))));
    }

    #[test]
    fn test_load_invalid_document() {
        let result = DocumentLoader::load_turing_from_string("This is not a document");
        assert!(matches!(result, Err(AutomatonError::Document(_))));
    }

    #[test]
    fn test_load_directory() {
        let dir = tempdir().unwrap();

        write_file(&dir.path().join("valid.json"), MACHINE);
        write_file(&dir.path().join("invalid.json"), "{}");
        write_file(&dir.path().join("ignored.txt"), "This file should be ignored");

        let results = DocumentLoader::load_turing_dir(dir.path());
        assert_eq!(results.len(), 2);

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(success_count, 1);
    }
}
