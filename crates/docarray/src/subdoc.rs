use std::sync::Arc;

use docarray_path::{get, index_path, join_path, parse_path};
use docarray_schema::DocSchema;
use serde_json::Value;

use crate::document::DocumentId;

/// Position of a sub-document inside its array.
///
/// Stores the owner's id and the array path rather than a live reference;
/// the owner is resolved through the array when a change is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayLink {
    pub owner: Option<DocumentId>,
    pub path: String,
    pub index: usize,
}

impl ArrayLink {
    /// `"<array path>.<index>"`.
    pub fn element_path(&self) -> String {
        index_path(&self.path, self.index)
    }
}

/// An element of a [`crate::DocumentArray`].
#[derive(Debug, Clone)]
pub struct SubDocument {
    value: Value,
    schema: Option<Arc<DocSchema>>,
    link: Option<ArrayLink>,
}

impl SubDocument {
    /// A value not attached to any array and not cast to any schema.
    pub fn detached(value: Value) -> Self {
        Self {
            value,
            schema: None,
            link: None,
        }
    }

    pub(crate) fn bound(value: Value, schema: Option<Arc<DocSchema>>, link: ArrayLink) -> Self {
        Self {
            value,
            schema,
            link: Some(link),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.value.get(field)
    }

    pub fn get_path(&self, path: &str) -> Option<&Value> {
        get(&self.value, &parse_path(path))
    }

    /// The `_id` field, if any.
    pub fn id(&self) -> Option<&Value> {
        self.get("_id")
    }

    pub fn schema(&self) -> Option<&Arc<DocSchema>> {
        self.schema.as_ref()
    }

    pub fn link(&self) -> Option<&ArrayLink> {
        self.link.as_ref()
    }

    pub fn index(&self) -> Option<usize> {
        self.link.as_ref().map(|l| l.index)
    }

    /// Full path of this element within the owning document.
    pub fn path(&self) -> Option<String> {
        self.link.as_ref().map(ArrayLink::element_path)
    }

    /// Full path of one of this element's fields, e.g. `"tags.1.name"`.
    pub fn field_path(&self, field: &str) -> Option<String> {
        self.path().map(|p| join_path(&p, field))
    }

    pub fn is_bound_to(&self, owner: Option<DocumentId>, path: &str, index: usize) -> bool {
        matches!(&self.link, Some(l) if l.owner == owner && l.path == path && l.index == index)
    }

    pub(crate) fn same_schema(&self, schema: Option<&Arc<DocSchema>>) -> bool {
        match (&self.schema, schema) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    pub(crate) fn rebind(&mut self, link: ArrayLink) {
        self.link = Some(link);
    }

    /// Forget the array position after removal.
    pub(crate) fn unbind(&mut self) {
        self.link = None;
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        if let Some(link) = &mut self.link {
            link.index = index;
        }
    }
}

/// Equal values, equal links, and the same schema instance.
impl PartialEq for SubDocument {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && self.link == other.link
            && self.same_schema(other.schema.as_ref())
    }
}
