use docarray_path::PathError;
use docarray_schema::CastFailure;
use thiserror::Error;

/// A value could not be cast to the element type of an array.
///
/// Carries the array path and target index of the rejected write.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("cast failed for element {index} of \"{path}\": {source}")]
pub struct CastError {
    pub path: String,
    pub index: usize,
    #[source]
    pub source: CastFailure,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DocArrayError {
    #[error(transparent)]
    Cast(#[from] CastError),
    #[error("index {index} is out of range for array of length {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("\"{0}\" is not an array index")]
    UnknownProperty(String),
}

/// Reasons an array was built with reduced capability.
///
/// Never returned as an error; see [`crate::DocumentArray::binding_warning`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindingWarning {
    #[error("owner of \"{path}\" is not a schema-backed document; array is unbound")]
    NotADocument { path: String },
    #[error("\"{path}\" is not a valid array path: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: PathError,
    },
    #[error("schema declares nothing at \"{path}\"; elements are stored uncast")]
    UnresolvedPath { path: String },
}
