use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("ZIP file not found: {}", .0.display())]
    ArchiveNotFound(PathBuf),
    #[error("Invalid ZIP file: {}: {source}", .path.display())]
    CorruptArchive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("No ZIP files found in {}", .0.display())]
    NoArchives(PathBuf),
    #[error("Could not read config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ProcessorError {
    pub fn corrupt_archive(path: impl Into<PathBuf>, source: zip::result::ZipError) -> Self {
        Self::CorruptArchive {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ProcessorError::ArchiveNotFound(PathBuf::from("exports/missing.zip"));
        assert_eq!(err.to_string(), "ZIP file not found: exports/missing.zip");

        let err = ProcessorError::NoArchives(PathBuf::from("exports"));
        assert_eq!(err.to_string(), "No ZIP files found in exports");
    }
}
