use thiserror::Error;

#[derive(Error, Debug)]
pub enum KmlError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("File does not exist: {path}")]
    SourceNotFound { path: String },

    #[error("No waypoint entries in {path}")]
    EmptySource { path: String },

    #[error("Waypoint entry in {path} not found on line {line}")]
    EntryLookup { path: String, line: usize },

    #[error("Invalid input '{token}', please try again.")]
    InvalidSelection { token: String },

    #[error("List contains invalid number {index} (only {available} files available), please try again.")]
    SelectionOutOfRange { index: usize, available: usize },

    #[error("Template error: {message}")]
    TemplateError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Source,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl KmlError {
    /// Errors caused by what the user typed at the prompt. These are retried,
    /// everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            KmlError::InvalidSelection { .. } | KmlError::SelectionOutOfRange { .. }
        )
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            KmlError::InvalidSelection { .. } | KmlError::SelectionOutOfRange { .. } => {
                ErrorCategory::Input
            }
            KmlError::SourceNotFound { .. }
            | KmlError::EmptySource { .. }
            | KmlError::EntryLookup { .. } => ErrorCategory::Source,
            KmlError::IoError(_)
            | KmlError::CsvError(_)
            | KmlError::SerializationError(_)
            | KmlError::TemplateError { .. } => ErrorCategory::Output,
            KmlError::ConfigError { .. } | KmlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            KmlError::InvalidSelection { .. } | KmlError::SelectionOutOfRange { .. } => {
                ErrorSeverity::Medium
            }
            KmlError::EmptySource { .. } => ErrorSeverity::Low,
            KmlError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            KmlError::SourceNotFound { path } => format!("Could not find the file {}", path),
            KmlError::EmptySource { path } => format!("{} contains no waypoints", path),
            KmlError::EntryLookup { path, line } => {
                format!("{} is not laid out as expected around line {}", path, line)
            }
            KmlError::TemplateError { .. } => format!("The output template is broken: {}", self),
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Enter 'All' or a list of numbers from the listing",
            ErrorCategory::Source => {
                "Check that every <when> line is directly followed by its <gx:coord> line"
            }
            ErrorCategory::Output => "Check the template file and that the output path is writable",
            ErrorCategory::Configuration => "Review the command line flags or the TOML config file",
        }
    }
}

pub type Result<T> = std::result::Result<T, KmlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_errors_are_recoverable() {
        let invalid = KmlError::InvalidSelection {
            token: "abc".to_string(),
        };
        let out_of_range = KmlError::SelectionOutOfRange {
            index: 5,
            available: 3,
        };

        assert!(invalid.is_recoverable());
        assert!(out_of_range.is_recoverable());
        assert_eq!(out_of_range.category(), ErrorCategory::Input);
    }

    #[test]
    fn test_source_errors_are_fatal() {
        let lookup = KmlError::EntryLookup {
            path: "a.kml".to_string(),
            line: 12,
        };

        assert!(!lookup.is_recoverable());
        assert_eq!(lookup.severity(), ErrorSeverity::High);
        assert_eq!(
            lookup.to_string(),
            "Waypoint entry in a.kml not found on line 12"
        );
    }
}
