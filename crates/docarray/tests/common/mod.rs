#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use docarray::{DocumentId, Owner};
use docarray_schema::{DocSchema, SchemaType};

/// An owner that records every path it is told about, in order.
pub struct RecordingOwner {
    id: DocumentId,
    schema: Option<Arc<DocSchema>>,
    pub notified: RefCell<Vec<String>>,
}

impl RecordingOwner {
    pub fn new(schema: DocSchema) -> Rc<Self> {
        Rc::new(Self {
            id: DocumentId::next(),
            schema: Some(Arc::new(schema)),
            notified: RefCell::new(Vec::new()),
        })
    }

    /// An owner with no schema, which arrays cannot bind to.
    pub fn plain() -> Rc<Self> {
        Rc::new(Self {
            id: DocumentId::next(),
            schema: None,
            notified: RefCell::new(Vec::new()),
        })
    }

    pub fn notified(&self) -> Vec<String> {
        self.notified.borrow().clone()
    }

    pub fn notification_count(&self) -> usize {
        self.notified.borrow().len()
    }

    pub fn reset(&self) {
        self.notified.borrow_mut().clear();
    }
}

impl Owner for RecordingOwner {
    fn document_id(&self) -> DocumentId {
        self.id
    }

    fn schema(&self) -> Option<Arc<DocSchema>> {
        self.schema.clone()
    }

    fn mark_modified(&self, path: &str) {
        self.notified.borrow_mut().push(path.to_string());
    }
}

pub fn tag_schema() -> DocSchema {
    DocSchema::builder()
        .id(false)
        .field("name", SchemaType::Str)
        .build()
}

pub fn comment_schema() -> DocSchema {
    DocSchema::builder()
        .field("body", SchemaType::Str)
        .field("votes", SchemaType::Num)
        .build()
}

/// `tags` holds id-less sub-documents, `comments` holds sub-documents with
/// generated `_id`s, `scores` holds numbers.
pub fn post_schema() -> DocSchema {
    DocSchema::builder()
        .field("title", SchemaType::Str)
        .field("tags", SchemaType::documents(tag_schema()))
        .field("comments", SchemaType::documents(comment_schema()))
        .field("scores", SchemaType::array_of(SchemaType::Num))
        .build()
}

pub fn post_owner() -> Rc<RecordingOwner> {
    RecordingOwner::new(post_schema())
}
