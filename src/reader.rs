//! Line-by-line reading of a recorded input file.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use crate::replay::ReplayError;

/// A single forward pass over a recording, one line at a time.
///
/// Lines come out in file order with trailing whitespace and line endings
/// stripped. The sequence is finite and not restartable; read failures
/// carry the file path.
#[derive(Debug)]
pub struct RecordReader<R> {
    path: PathBuf,
    lines: Lines<R>,
}

impl RecordReader<BufReader<File>> {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ReplayError> {
        let path = path.into();
        let file = File::open(&path).map_err(|source| ReplayError::File {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            path,
            lines: BufReader::new(file).lines(),
        })
    }
}

impl<R: BufRead> RecordReader<R> {
    /// Reader over an already-open stream; used by tests to feed
    /// in-memory recordings.
    pub fn from_reader(reader: R) -> Self {
        Self {
            path: PathBuf::from("<memory>"),
            lines: reader.lines(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<String, ReplayError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.lines.next()? {
            Ok(mut line) => {
                line.truncate(line.trim_end().len());
                Some(Ok(line))
            }
            Err(source) => Some(Err(ReplayError::File {
                path: self.path.clone(),
                source,
            })),
        }
    }
}
