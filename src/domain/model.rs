use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One waypoint as found in a track file: the `<when>` text and the `<gx:coord>` text,
/// exactly as captured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub timestamp: String,
    pub coordinate: String,
}

impl Entry {
    pub fn new(timestamp: impl Into<String>, coordinate: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            coordinate: coordinate.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MergeResult {
    pub entries: Vec<Entry>,
    pub document: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Kml,
    Csv,
    Json,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Kml, OutputFormat::Csv, OutputFormat::Json];

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Kml => "kml",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kml" => Ok(OutputFormat::Kml),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}
