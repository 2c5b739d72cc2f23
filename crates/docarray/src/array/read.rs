use std::ops::Deref;

use serde_json::Value;

use super::DocumentArray;
use crate::subdoc::SubDocument;

impl Deref for DocumentArray {
    type Target = [SubDocument];

    fn deref(&self) -> &[SubDocument] {
        &self.elements
    }
}

impl<'a> IntoIterator for &'a DocumentArray {
    type Item = &'a SubDocument;
    type IntoIter = std::slice::Iter<'a, SubDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl DocumentArray {
    /// First element whose `_id` equals `id`.
    pub fn id(&self, id: &Value) -> Option<&SubDocument> {
        self.elements.iter().find(|doc| doc.id() == Some(id))
    }

    pub fn position_of_id(&self, id: &Value) -> Option<usize> {
        self.elements.iter().position(|doc| doc.id() == Some(id))
    }

    /// Plain values of every element.
    pub fn to_values(&self) -> Vec<Value> {
        self.elements.iter().map(|doc| doc.value().clone()).collect()
    }

    pub fn to_value(&self) -> Value {
        Value::Array(self.to_values())
    }
}
