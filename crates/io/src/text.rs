//! Line-oriented helpers shared by the text readers.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::IoError;

/// Reads a text file line by line, tracking the 1-based line number for
/// error messages.
pub(crate) struct LineReader {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line: usize,
}

impl LineReader {
    pub(crate) fn open(path: &Path) -> Result<Self, IoError> {
        if !path.exists() {
            return Err(IoError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(Self {
            path: path.to_path_buf(),
            lines: BufReader::new(File::open(path)?).lines(),
            line: 0,
        })
    }

    /// 1-based number of the most recently returned line.
    pub(crate) fn line_number(&self) -> usize {
        self.line
    }

    /// The next line, or `None` at end of file.
    pub(crate) fn next_line(&mut self) -> Result<Option<String>, IoError> {
        match self.lines.next() {
            Some(line) => {
                self.line += 1;
                Ok(Some(line?))
            }
            None => Ok(None),
        }
    }

    /// The next line; end of file is an error naming what was expected.
    pub(crate) fn expect_line(&mut self, what: &str) -> Result<String, IoError> {
        match self.next_line()? {
            Some(line) => Ok(line),
            None => Err(IoError::MalformedLine {
                path: self.path.clone(),
                line: self.line + 1,
                reason: format!("unexpected end of file, expected {what}"),
            }),
        }
    }

    /// An error for the most recently returned line.
    pub(crate) fn malformed(&self, reason: impl Into<String>) -> IoError {
        IoError::MalformedLine {
            path: self.path.clone(),
            line: self.line,
            reason: reason.into(),
        }
    }

    /// Parses `token` or reports it against the current line.
    pub(crate) fn parse<T: FromStr>(&self, token: Option<&str>, what: &str) -> Result<T, IoError> {
        let token = token.ok_or_else(|| self.malformed(format!("missing {what}")))?;
        token
            .parse()
            .map_err(|_| self.malformed(format!("invalid {what} '{token}'")))
    }
}

/// Splits a line on commas and whitespace, dropping empty fields.
pub(crate) fn fields(line: &str) -> Vec<&str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .collect()
}
