//! The ordered list of ROM directories to search.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::error::DatError;

/// Candidate root directories, in the order they are tried.
///
/// Order is significant: the first directory that satisfies an entry wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchList {
    dirs: Vec<PathBuf>,
}

impl SearchList {
    pub fn new<I, P>(dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// Read one directory per line. Blank lines and `#` comments are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, DatError> {
        let mut dirs = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            dirs.push(PathBuf::from(line));
        }
        Ok(Self { dirs })
    }

    /// Load a directory list file.
    pub fn load(path: &Path) -> Result<Self, DatError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.dirs.iter()
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

impl<'a> IntoIterator for &'a SearchList {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.dirs.iter()
    }
}
