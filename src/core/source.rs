use crate::domain::model::Entry;
use crate::utils::error::{KmlError, Result};
use regex::Regex;
use std::cell::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static WHEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<when>(?P<when>[0-9.\-\s:A-Z]*)</when>").expect("valid <when> pattern")
});

static COORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<gx:coord>(?P<coord>[0-9.\-\s:]*)</gx:coord>").expect("valid <gx:coord> pattern")
});

/// A KML track file holding `<when>` / `<gx:coord>` line pairs.
///
/// Nothing is read on construction. The file's lines, the entry count and the line
/// of the first entry are each computed on first use and kept for the lifetime of
/// the value, so the file must not change while a `KmlSource` is alive.
#[derive(Debug, Clone)]
pub struct KmlSource {
    path: PathBuf,
    lines: OnceCell<Vec<String>>,
    entry_count: OnceCell<usize>,
    first_line: OnceCell<Option<usize>>,
}

impl KmlSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(KmlError::SourceNotFound {
                path: path.display().to_string(),
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            lines: OnceCell::new(),
            entry_count: OnceCell::new(),
            first_line: OnceCell::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    fn lines(&self) -> Result<&[String]> {
        if let Some(lines) = self.lines.get() {
            return Ok(lines);
        }

        let bytes = fs::read(&self.path)?;
        let lines: Vec<String> = String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_owned)
            .collect();
        tracing::debug!("Read {} lines from {}", lines.len(), self.path.display());

        Ok(self.lines.get_or_init(|| lines))
    }

    /// Number of `<when>` lines in the file.
    pub fn entry_count(&self) -> Result<usize> {
        if let Some(count) = self.entry_count.get() {
            return Ok(*count);
        }

        let count = self
            .lines()?
            .iter()
            .filter(|line| WHEN.is_match(line))
            .count();

        Ok(*self.entry_count.get_or_init(|| count))
    }

    /// 1-based line number of the first `<when>` line.
    pub fn first_entry_line_number(&self) -> Result<usize> {
        let first = match self.first_line.get() {
            Some(first) => *first,
            None => {
                let first = self
                    .lines()?
                    .iter()
                    .position(|line| WHEN.is_match(line))
                    .map(|index| index + 1);
                *self.first_line.get_or_init(|| first)
            }
        };

        first.ok_or_else(|| KmlError::EmptySource {
            path: self.display_path(),
        })
    }

    /// Derived from the count, entries take exactly two lines each.
    pub fn last_entry_line_number(&self) -> Result<usize> {
        let first = self.first_entry_line_number()?;
        let count = self.entry_count()?;
        Ok((count - 1) * 2 + first)
    }

    /// Reads the entry whose `<when>` line is `line_number` and whose `<gx:coord>` line
    /// follows it.
    pub fn get_entry(&self, line_number: usize) -> Result<Entry> {
        let lines = self.lines()?;
        let not_found = || KmlError::EntryLookup {
            path: self.display_path(),
            line: line_number,
        };

        let when_line = line_number
            .checked_sub(1)
            .and_then(|index| lines.get(index))
            .ok_or_else(not_found)?;
        let coord_line = lines.get(line_number).ok_or_else(not_found)?;

        let when = WHEN
            .captures(when_line)
            .and_then(|caps| caps.name("when"))
            .ok_or_else(not_found)?;
        let coord = COORD
            .captures(coord_line)
            .and_then(|caps| caps.name("coord"))
            .ok_or_else(not_found)?;

        Ok(Entry::new(when.as_str(), coord.as_str()))
    }

    pub fn first_entry(&self) -> Result<Entry> {
        self.get_entry(self.first_entry_line_number()?)
    }

    pub fn last_entry(&self) -> Result<Entry> {
        self.get_entry(self.last_entry_line_number()?)
    }

    /// Every entry in file order. Each call starts over from the first entry; an empty
    /// file yields nothing.
    pub fn entries(&self) -> Result<Entries<'_>> {
        if self.entry_count()? == 0 {
            return Ok(Entries {
                source: self,
                next: 1,
                last: 0,
            });
        }

        Ok(Entries {
            source: self,
            next: self.first_entry_line_number()?,
            last: self.last_entry_line_number()?,
        })
    }

    /// Time between the first and the last entry, if both timestamps are RFC 3339.
    pub fn time_span(&self) -> Result<Option<chrono::Duration>> {
        if self.entry_count()? == 0 {
            return Ok(None);
        }

        let first = self.first_entry()?;
        let last = self.last_entry()?;
        let span = chrono::DateTime::parse_from_rfc3339(first.timestamp.trim())
            .and_then(|start| {
                chrono::DateTime::parse_from_rfc3339(last.timestamp.trim()).map(|end| end - start)
            })
            .ok();

        Ok(span)
    }
}

pub struct Entries<'a> {
    source: &'a KmlSource,
    next: usize,
    last: usize,
}

impl Iterator for Entries<'_> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.last {
            return None;
        }

        let line_number = self.next;
        self.next += 2;
        Some(self.source.get_entry(line_number))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.next > self.last {
            0
        } else {
            (self.last - self.next) / 2 + 1
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Entries<'_> {}
