//! Puzzle inputs read from disk

use crate::error::InputError;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Read-only store of puzzle inputs.
///
/// Directory structure: `{dir}/{year}_day{day:02}.txt`. An explicit override
/// file, when set, is served for every puzzle; the CLI only allows it
/// together with `--day`.
#[derive(Debug, Clone)]
pub struct InputStore {
    dir: PathBuf,
    override_file: Option<PathBuf>,
}

impl InputStore {
    pub fn new(dir: PathBuf, override_file: Option<PathBuf>) -> Self {
        Self { dir, override_file }
    }

    /// Where the input for a year/day is read from
    pub fn path(&self, year: u16, day: u8) -> PathBuf {
        match &self.override_file {
            Some(file) => file.clone(),
            None => self.dir.join(format!("{}_day{:02}.txt", year, day)),
        }
    }

    pub fn contains(&self, year: u16, day: u8) -> bool {
        self.path(year, day).is_file()
    }

    pub fn get(&self, year: u16, day: u8) -> Result<String, InputError> {
        read(&self.path(year, day))
    }
}

fn read(path: &Path) -> Result<String, InputError> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => InputError::Missing(path.to_path_buf()),
        _ => InputError::Read {
            path: path.to_path_buf(),
            source,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_format() {
        let temp = TempDir::new().unwrap();
        let store = InputStore::new(temp.path().to_path_buf(), None);

        let path = store.path(2023, 8);
        assert!(path.starts_with(temp.path()));
        assert!(path.to_string_lossy().ends_with("2023_day08.txt"));

        let path = store.path(2023, 23);
        assert!(path.to_string_lossy().ends_with("2023_day23.txt"));
    }

    #[test]
    fn test_reads_existing_input() {
        let temp = TempDir::new().unwrap();
        let store = InputStore::new(temp.path().to_path_buf(), None);

        assert!(!store.contains(2023, 17));
        assert!(matches!(store.get(2023, 17), Err(InputError::Missing(_))));

        fs::write(temp.path().join("2023_day17.txt"), "2413\n3215\n").unwrap();
        assert!(store.contains(2023, 17));
        assert_eq!(store.get(2023, 17).unwrap(), "2413\n3215\n");
    }

    #[test]
    fn test_override_file_wins() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("custom.txt");
        fs::write(&file, "R 6 (#70c710)\n").unwrap();
        fs::write(temp.path().join("2023_day18.txt"), "ignored").unwrap();

        let store = InputStore::new(temp.path().to_path_buf(), Some(file.clone()));
        assert_eq!(store.path(2023, 18), file);
        assert_eq!(store.get(2023, 18).unwrap(), "R 6 (#70c710)\n");
    }

    #[test]
    fn test_directory_is_not_an_input() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("2023_day21.txt")).unwrap();
        let store = InputStore::new(temp.path().to_path_buf(), None);
        assert!(!store.contains(2023, 21));
        assert!(store.get(2023, 21).is_err());
    }
}
