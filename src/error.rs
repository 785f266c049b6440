use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No folder exists. Please select the appropriate folder.")]
    DirectoryNotFound(PathBuf),

    #[error("The folder is empty or does not contain embossing files.")]
    EmptyOrNoMatches(PathBuf),

    #[error("invalid file name shape: {file_name} ({segments} segment(s), expected at least 5)")]
    InvalidFilenameShape { file_name: String, segments: usize },

    #[error("file name is not valid UTF-8: {}", .0.display())]
    UndecodableFilename(PathBuf),

    #[error("invalid date token '{token}' in {file_name}")]
    InvalidDateToken { file_name: String, token: String },

    #[error("reference data unavailable at {}: {reason}", .path.display())]
    MissingReferenceData { path: PathBuf, reason: String },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("no embossing files dated between {start} and {end}")]
    NoMatchesInRange { start: NaiveDate, end: NaiveDate },
}

/// Coarse grouping used by callers to pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    DirectoryNotFound,
    EmptyOrNoMatches,
    PerFile,
    Reference,
    Io,
    Input,
}

impl EngineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        EngineError::Csv {
            path: path.into(),
            source,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            EngineError::DirectoryNotFound(_) => ErrorClass::DirectoryNotFound,
            EngineError::EmptyOrNoMatches(_) => ErrorClass::EmptyOrNoMatches,
            EngineError::InvalidFilenameShape { .. }
            | EngineError::UndecodableFilename(_)
            | EngineError::InvalidDateToken { .. } => ErrorClass::PerFile,
            EngineError::MissingReferenceData { .. } => ErrorClass::Reference,
            EngineError::Io { .. } | EngineError::Csv { .. } => ErrorClass::Io,
            EngineError::InvalidDateRange { .. } | EngineError::NoMatchesInRange { .. } => {
                ErrorClass::Input
            }
        }
    }
}
