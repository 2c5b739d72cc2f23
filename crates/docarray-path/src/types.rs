//! Type definitions for dotted paths.

/// A single path segment: a field name or a decimal array index.
pub type PathStep = String;

/// A parsed dotted path.
pub type Path = Vec<PathStep>;
