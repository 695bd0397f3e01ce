use crate::core::source::KmlSource;
use crate::utils::error::{KmlError, Result};
use regex::Regex;
use std::fs;
use std::path::Path;

pub const DEFAULT_PATTERN: &str = "*.kml";
pub const DEFAULT_TEMPLATE: &str = "kml_template.kml";
pub const DEFAULT_OUTPUT: &str = "JoinedFile.kml";

/// Files that match the pattern but are never offered for joining.
pub fn default_ignored() -> Vec<String> {
    vec![DEFAULT_TEMPLATE.to_string(), DEFAULT_OUTPUT.to_string()]
}

/// Translates a shell style file name pattern (`*` and `?`) into an anchored regex.
pub fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let mut expr = String::from("^");
    for c in pattern.chars() {
        match c {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            other => expr.push_str(&regex::escape(&other.to_string())),
        }
    }
    expr.push('$');

    Regex::new(&expr).map_err(|e| KmlError::InvalidConfigValueError {
        field: "pattern".to_string(),
        value: pattern.to_string(),
        reason: e.to_string(),
    })
}

/// Lists the files in `dir` (not recursing) whose names match `pattern`, minus the
/// ignored names, sorted by file name. Hidden files are only listed when the pattern
/// itself starts with a dot.
pub fn discover_sources<P: AsRef<Path>>(
    dir: P,
    pattern: &str,
    ignored: &[String],
) -> Result<Vec<KmlSource>> {
    let dir = dir.as_ref();
    let matcher = glob_to_regex(pattern)?;
    let include_hidden = pattern.starts_with('.');

    let mut paths = Vec::new();
    for dir_entry in fs::read_dir(dir)? {
        let path = dir_entry?.path();
        if !path.is_file() {
            continue;
        }

        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if !matcher.is_match(name) || (name.starts_with('.') && !include_hidden) {
            continue;
        }
        if ignored.iter().any(|ignored_name| ignored_name == name) {
            tracing::debug!("Ignoring {}", name);
            continue;
        }

        paths.push(path);
    }
    paths.sort();

    tracing::info!(
        "Found {} files matching '{}' in {}",
        paths.len(),
        pattern,
        dir.display()
    );

    paths.iter().map(KmlSource::new).collect()
}
