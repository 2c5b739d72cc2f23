//! Owning documents and their modification ledger.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use docarray_path::{is_child, join_path};
use docarray_schema::DocSchema;
use indexmap::IndexSet;

/// Process-unique identity of a document instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u64);

impl DocumentId {
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "doc#{}", self.0)
    }
}

/// The document an array belongs to.
///
/// Arrays hold their owner through a `Weak` reference and only reach it to
/// resolve the element schema at construction and to report modifications.
pub trait Owner {
    fn document_id(&self) -> DocumentId;

    /// Schema of the owner, or `None` when the owner is not a schema-backed
    /// document. Arrays bound to such an owner degrade to unbound mode.
    fn schema(&self) -> Option<Arc<DocSchema>>;

    /// Record that the value at `path` changed.
    fn mark_modified(&self, path: &str);
}

/// Paths modified since the last successful persist.
///
/// A recorded path covers all of its descendants: recording `tags` after
/// `tags.1` keeps only `tags`, and recording `tags.1` after `tags` is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifiedPaths {
    paths: IndexSet<String>,
}

impl ModifiedPaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if `path` was already covered.
    pub fn insert(&mut self, path: &str) -> bool {
        if self.paths.iter().any(|p| p == path || is_child(p, path)) {
            return false;
        }
        self.paths.retain(|p| !is_child(path, p));
        self.paths.insert(path.to_string())
    }

    /// True if `path`, one of its ancestors, or one of its descendants was
    /// recorded.
    pub fn is_modified(&self, path: &str) -> bool {
        self.paths
            .iter()
            .any(|p| p == path || is_child(p, path) || is_child(path, p))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }
}

#[derive(Debug)]
struct ParentLink {
    owner: Weak<dyn Owner>,
    prefix: String,
}

/// A schema-backed document that tracks modified paths.
///
/// An embedded document forwards every modification to its parent with its
/// own location prefixed, so changes propagate up the ownership chain.
#[derive(Debug)]
pub struct Document {
    id: DocumentId,
    schema: Arc<DocSchema>,
    modified: RefCell<ModifiedPaths>,
    parent: Option<ParentLink>,
}

impl Document {
    pub fn new(schema: Arc<DocSchema>) -> Rc<Self> {
        Rc::new(Self {
            id: DocumentId::next(),
            schema,
            modified: RefCell::new(ModifiedPaths::new()),
            parent: None,
        })
    }

    /// A document embedded in `parent` at `prefix` (e.g. `"comments.0"`).
    pub fn embedded<O: Owner + 'static>(
        schema: Arc<DocSchema>,
        parent: &Rc<O>,
        prefix: impl Into<String>,
    ) -> Rc<Self> {
        let owner = Rc::downgrade(parent) as Weak<dyn Owner>;
        Rc::new(Self {
            id: DocumentId::next(),
            schema,
            modified: RefCell::new(ModifiedPaths::new()),
            parent: Some(ParentLink {
                owner,
                prefix: prefix.into(),
            }),
        })
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn is_modified(&self, path: &str) -> bool {
        self.modified.borrow().is_modified(path)
    }

    pub fn modified_paths(&self) -> Vec<String> {
        self.modified.borrow().iter().map(str::to_string).collect()
    }

    /// Forget recorded modifications, typically after a successful persist.
    pub fn clear_modified(&self) {
        self.modified.borrow_mut().clear();
    }
}

impl Owner for Document {
    fn document_id(&self) -> DocumentId {
        self.id
    }

    fn schema(&self) -> Option<Arc<DocSchema>> {
        Some(Arc::clone(&self.schema))
    }

    fn mark_modified(&self, path: &str) {
        self.modified.borrow_mut().insert(path);
        if let Some(link) = &self.parent {
            if let Some(parent) = link.owner.upgrade() {
                parent.mark_modified(&join_path(&link.prefix, path));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ancestors_cover_descendants() {
        let mut paths = ModifiedPaths::new();
        assert!(paths.insert("tags.1"));
        assert!(paths.insert("tags.2.name"));
        assert!(paths.insert("tags"));
        assert_eq!(paths.iter().collect::<Vec<_>>(), vec!["tags"]);
        assert!(!paths.insert("tags.3"));
        assert!(paths.is_modified("tags.3.name"));
        assert!(!paths.is_modified("title"));
    }

    #[test]
    fn descendants_mark_ancestors_modified() {
        let mut paths = ModifiedPaths::new();
        paths.insert("tags.1");
        assert!(paths.is_modified("tags"));
        assert!(!paths.is_modified("tags.0"));
        assert!(!paths.is_modified("tagsx"));
    }

    #[test]
    fn embedded_documents_forward_upward() {
        let root = Document::new(Arc::new(DocSchema::default()));
        let child = Document::embedded(Arc::new(DocSchema::default()), &root, "comments.0");
        child.mark_modified("replies.2");
        assert!(child.is_modified("replies.2"));
        assert_eq!(root.modified_paths(), vec!["comments.0.replies.2"]);
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(DocumentId::next(), DocumentId::next());
    }

    proptest! {
        #[test]
        fn recorded_paths_never_nest(paths in prop::collection::vec("[ab](\\.[0-2]){0,2}", 0..12)) {
            let mut ledger = ModifiedPaths::new();
            for p in &paths {
                ledger.insert(p);
            }
            let recorded: Vec<&str> = ledger.iter().collect();
            for a in &recorded {
                for b in &recorded {
                    prop_assert!(!is_child(a, b));
                }
            }
            for p in &paths {
                prop_assert!(ledger.is_modified(p));
            }
        }
    }
}
