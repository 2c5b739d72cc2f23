//! Dotted schema-path utilities.
//!
//! Paths address a location inside a document's declared structure, e.g.
//! `"comments"` or `"comments.3.author"`. Segments are separated by `.`;
//! a segment made of digits addresses an array position.
//!
//! # Example
//!
//! ```
//! use docarray_path::{format_path, index_path, parse_path, parse_index};
//!
//! let path = parse_path("comments.3.author");
//! assert_eq!(path, vec!["comments", "3", "author"]);
//! assert_eq!(format_path(&path), "comments.3.author");
//!
//! assert_eq!(index_path("comments", 1), "comments.1");
//! assert_eq!(parse_index("3"), Some(3));
//! assert_eq!(parse_index("03"), None);
//! ```

use serde_json::Value;

pub mod types;
pub use types::{Path, PathStep};

pub mod validate;
pub use validate::{validate_path, PathError};

/// Segment separator.
pub const SEPARATOR: char = '.';

/// Parse a dotted path into its segments.
///
/// The empty string is the root and yields no segments.
///
/// ```
/// use docarray_path::parse_path;
///
/// assert_eq!(parse_path(""), Vec::<String>::new());
/// assert_eq!(parse_path("tags"), vec!["tags"]);
/// assert_eq!(parse_path("a.0.b"), vec!["a", "0", "b"]);
/// ```
pub fn parse_path(path: &str) -> Path {
    if path.is_empty() {
        return Vec::new();
    }
    path.split(SEPARATOR).map(str::to_string).collect()
}

/// Format segments back into a dotted path.
pub fn format_path(path: &[String]) -> String {
    path.join(".")
}

/// Append one segment to `base`.
///
/// ```
/// use docarray_path::join_path;
///
/// assert_eq!(join_path("", "tags"), "tags");
/// assert_eq!(join_path("post.tags", "name"), "post.tags.name");
/// ```
pub fn join_path(base: &str, segment: &str) -> String {
    if base.is_empty() {
        return segment.to_string();
    }
    let mut out = String::with_capacity(base.len() + 1 + segment.len());
    out.push_str(base);
    out.push(SEPARATOR);
    out.push_str(segment);
    out
}

/// Path of the element at `index` inside the array at `base`.
pub fn index_path(base: &str, index: usize) -> String {
    join_path(base, &index.to_string())
}

/// Parse a segment as an array index.
///
/// Only canonical non-negative integers qualify: no sign, no leading zero
/// (except `"0"` itself), and the value must fit in `usize`.
pub fn parse_index(segment: &str) -> Option<usize> {
    if !is_index(segment) {
        return None;
    }
    segment.parse().ok()
}

/// Check whether a segment has the shape of an array index.
pub fn is_index(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return false;
    }
    bytes.iter().all(u8::is_ascii_digit)
}

/// Check if `child` lies strictly below `parent`.
///
/// ```
/// use docarray_path::is_child;
///
/// assert!(is_child("tags", "tags.0"));
/// assert!(is_child("", "tags"));
/// assert!(!is_child("tags", "tagsx.0"));
/// assert!(!is_child("tags", "tags"));
/// ```
pub fn is_child(parent: &str, child: &str) -> bool {
    if parent.is_empty() {
        return !child.is_empty();
    }
    child.len() > parent.len()
        && child.starts_with(parent)
        && child.as_bytes()[parent.len()] == SEPARATOR as u8
}

/// Parent of a dotted path, or `None` for the root.
pub fn parent_path(path: &str) -> Option<&str> {
    if path.is_empty() {
        return None;
    }
    Some(match path.rfind(SEPARATOR) {
        Some(pos) => &path[..pos],
        None => "",
    })
}

/// Look up the value at `path` inside `doc`.
///
/// Objects are walked by key, arrays by index segment.
pub fn get<'a>(doc: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut current = doc;
    for step in path {
        current = match current {
            Value::Object(map) => map.get(step)?,
            Value::Array(arr) => arr.get(parse_index(step)?)?,
            _ => return None,
        };
    }
    Some(current)
}
