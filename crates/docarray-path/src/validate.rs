//! Validation functions for dotted paths.

use thiserror::Error;

/// Maximum allowed path string length.
const MAX_PATH_LENGTH: usize = 1024;

/// Maximum allowed path depth.
const MAX_PATH_DEPTH: usize = 64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path is empty")]
    Empty,
    #[error("path has an empty segment at position {0}")]
    EmptySegment(usize),
    #[error("path exceeds {MAX_PATH_LENGTH} bytes")]
    TooLong,
    #[error("path exceeds {MAX_PATH_DEPTH} segments")]
    TooDeep,
}

/// Validate a dotted path used to bind an array.
///
/// # Errors
///
/// Returns an error if:
/// - The path is empty
/// - Any segment is empty (`"a..b"`, `".a"`, `"a."`)
/// - The path is longer than 1024 bytes or deeper than 64 segments
///
/// # Example
///
/// ```
/// use docarray_path::validate_path;
///
/// validate_path("comments").unwrap();
/// validate_path("post.comments").unwrap();
/// validate_path("post..comments").unwrap_err();
/// ```
pub fn validate_path(path: &str) -> Result<(), PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    if path.len() > MAX_PATH_LENGTH {
        return Err(PathError::TooLong);
    }
    let mut depth = 0;
    for (i, segment) in path.split('.').enumerate() {
        if segment.is_empty() {
            return Err(PathError::EmptySegment(i));
        }
        depth += 1;
    }
    if depth > MAX_PATH_DEPTH {
        return Err(PathError::TooDeep);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_segments() {
        assert_eq!(validate_path(".a"), Err(PathError::EmptySegment(0)));
        assert_eq!(validate_path("a."), Err(PathError::EmptySegment(1)));
    }

    #[test]
    fn rejects_deep_paths() {
        let deep = vec!["a"; 65].join(".");
        assert_eq!(validate_path(&deep), Err(PathError::TooDeep));
    }
}
