//! Mutation-tracking arrays of sub-documents.
//!
//! A [`DocumentArray`] is an ordered sequence of [`SubDocument`]s bound to one
//! owning document and one schema path. Every write is cast to the element
//! type the owner's schema declares at that path, recorded in an
//! [`AtomicLog`] of positional and structural operations, and reported to the
//! owner's modification ledger. A persistence layer turns the log into
//! partial update commands ([`UpdateOp`]) instead of rewriting the array.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use docarray::{AtomicKey, Document, DocumentArray};
//! use docarray_schema::{DocSchema, SchemaType};
//! use serde_json::json;
//!
//! let tag = DocSchema::builder().id(false).field("name", SchemaType::Str).build();
//! let post = DocSchema::builder().field("tags", SchemaType::documents(tag)).build();
//! let doc = Document::new(Arc::new(post));
//!
//! let mut tags = DocumentArray::new(vec![json!({"name": "a"})], "tags", &doc).unwrap();
//! tags.set_at(1, json!({"name": "b"})).unwrap();
//!
//! assert_eq!(tags.len(), 2);
//! assert!(tags.atomics().contains_key(&AtomicKey::SetAt(1)));
//! assert!(doc.is_modified("tags.1"));
//! ```

pub mod array;
pub mod atomics;
pub mod delta;
pub mod document;
pub mod error;
pub mod subdoc;

pub use array::{resolve_element_schema, DocumentArray, ElementInput, InitialValues};
pub use atomics::{AtomicKey, AtomicLog, AtomicOp, Atomics, PopEnd};
pub use delta::{to_update_document, UpdateOp};
pub use document::{Document, DocumentId, ModifiedPaths, Owner};
pub use error::{BindingWarning, CastError, DocArrayError};
pub use subdoc::{ArrayLink, SubDocument};
