//! Error types for the media catalog

use std::io;
use thiserror::Error;

/// Failures a lookup can report to its caller.
///
/// A missing item is not an error: lookups return `Ok(None)` for that.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The category key is not part of the configured mapping
    #[error("Category not found: {0}")]
    UnknownCategory(String),
    /// The filename is not a single plain path component
    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),
}

/// How a filesystem failure is handled at the call site that hit it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsErrorKind {
    /// Permission denied when accessing a file or directory
    PermissionDenied,
    /// File or directory vanished or never existed
    NotFound,
    /// Any other I/O failure
    Other,
}

impl FsErrorKind {
    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FsErrorKind::PermissionDenied => "permission_denied",
            FsErrorKind::NotFound => "not_found",
            FsErrorKind::Other => "io_error",
        }
    }
}

impl std::fmt::Display for FsErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify a raw I/O error
pub fn classify_io_error(err: &io::Error) -> FsErrorKind {
    match err.kind() {
        io::ErrorKind::PermissionDenied => FsErrorKind::PermissionDenied,
        io::ErrorKind::NotFound => FsErrorKind::NotFound,
        _ => FsErrorKind::Other,
    }
}

/// Classify an error yielded while walking a directory.
///
/// Loop errors can only occur when following links, which the catalog never does.
pub fn classify_walk_error(err: &walkdir::Error) -> FsErrorKind {
    err.io_error().map(classify_io_error).unwrap_or(FsErrorKind::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_io_error() {
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(classify_io_error(&denied), FsErrorKind::PermissionDenied);

        let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert_eq!(classify_io_error(&missing), FsErrorKind::NotFound);

        let other = io::Error::new(io::ErrorKind::InvalidData, "bad");
        assert_eq!(classify_io_error(&other), FsErrorKind::Other);
    }

    #[test]
    fn test_classify_walk_error_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = walkdir::WalkDir::new(&missing)
            .into_iter()
            .find_map(Result::err)
            .unwrap();
        assert_eq!(classify_walk_error(&err), FsErrorKind::NotFound);
    }

    #[test]
    fn test_lookup_error_display() {
        assert_eq!(
            LookupError::UnknownCategory("anime".to_string()).to_string(),
            "Category not found: anime"
        );
        assert_eq!(
            LookupError::InvalidFilename("../x".to_string()).to_string(),
            "Invalid filename: \"../x\""
        );
    }
}
