use crate::core::source::KmlSource;
use crate::domain::model::Entry;
use crate::domain::ports::{Renderer, Storage};
use crate::utils::error::{KmlError, Result};
use regex::Regex;
use std::sync::LazyLock;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[,;\s]").expect("valid separator pattern"));

pub const SELECT_ALL: &str = "All";

/// What the user asked for at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Indices(Vec<usize>),
}

impl Selection {
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.eq_ignore_ascii_case(SELECT_ALL) {
            return Ok(Selection::All);
        }

        let indices = SEPARATORS
            .split(input)
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<usize>().map_err(|_| KmlError::InvalidSelection {
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if indices.is_empty() {
            return Err(KmlError::InvalidSelection {
                token: input.to_string(),
            });
        }

        Ok(Selection::Indices(indices))
    }

    pub fn resolve<'a>(
        &self,
        sources: &'a [KmlSource],
        ignored: &[String],
    ) -> Result<Vec<&'a KmlSource>> {
        match self {
            Selection::All => Ok(sources
                .iter()
                .filter(|source| !ignored.contains(&source.file_name()))
                .collect()),
            Selection::Indices(indices) => indices
                .iter()
                .map(|&index| {
                    sources.get(index).ok_or(KmlError::SelectionOutOfRange {
                        index,
                        available: sources.len(),
                    })
                })
                .collect(),
        }
    }
}

/// Resolves raw prompt input against the listing.
pub fn select_sources<'a>(
    sources: &'a [KmlSource],
    input: &str,
    ignored: &[String],
) -> Result<Vec<&'a KmlSource>> {
    Selection::parse(input)?.resolve(sources, ignored)
}

/// Orders the sources by the timestamp of their first entry and chains their entries.
///
/// Entries of different files are never interleaved: each file is assumed to be in
/// time order already and not to overlap with the others. Files without entries are
/// skipped.
pub fn join_sources<'a, I>(sources: I) -> Result<Vec<Entry>>
where
    I: IntoIterator<Item = &'a KmlSource>,
{
    let mut keyed = Vec::new();
    for source in sources {
        match source.first_entry() {
            Ok(first) => keyed.push((first.timestamp, source)),
            Err(KmlError::EmptySource { path }) => {
                tracing::warn!("Skipping {}: no waypoint entries", path);
            }
            Err(e) => return Err(e),
        }
    }

    // stable, equal timestamps keep the selection order
    keyed.sort_by(|a, b| a.0.cmp(&b.0));

    let mut data = Vec::new();
    let mut previous_end: Option<String> = None;
    for (first_timestamp, source) in keyed {
        if let Some(end) = &previous_end {
            if first_timestamp < *end {
                tracing::warn!(
                    "{} starts at {} before the previous file ends at {}",
                    source.file_name(),
                    first_timestamp,
                    end
                );
            }
        }

        let before = data.len();
        for entry in source.entries()? {
            data.push(entry?);
        }
        tracing::debug!("Appended {} entries from {}", data.len() - before, source.file_name());

        previous_end = data.last().map(|entry| entry.timestamp.clone());
    }

    Ok(data)
}

/// Renders the entries and writes the document to `output_path`, replacing any
/// existing file.
pub fn render<R, S>(entries: &[Entry], renderer: &R, storage: &S, output_path: &str) -> Result<String>
where
    R: Renderer + ?Sized,
    S: Storage + ?Sized,
{
    let document = renderer.render(entries)?;
    storage.write_file(output_path, document.as_bytes())?;
    tracing::debug!("Wrote {} bytes to {}", document.len(), output_path);
    Ok(document)
}
