//! Mutating sequence operations.
//!
//! Each accepted call runs validate, cast, record, notify, apply in that
//! order. A call that fails validation or casting leaves elements and
//! atomics untouched and notifies nobody. Calls that would change nothing
//! (popping an empty array, pulling no matches) are no-ops.

use std::cmp::Ordering;

use docarray_path::parse_index;
use serde_json::Value;

use super::{DocumentArray, ElementInput};
use crate::atomics::{AtomicKey, AtomicOp, PopEnd};
use crate::error::{CastError, DocArrayError};
use crate::subdoc::SubDocument;

impl DocumentArray {
    /// Assign the element at `index`; `index == len` appends.
    pub fn set_at(
        &mut self,
        index: usize,
        value: impl Into<ElementInput>,
    ) -> Result<&mut Self, DocArrayError> {
        let len = self.elements.len();
        if index > len {
            return Err(DocArrayError::OutOfRange { index, len });
        }
        let doc = self.cast(value.into(), index)?;
        self.log.record(AtomicOp::SetAt {
            index,
            value: doc.value().clone(),
        });
        self.mark_modified(index);
        self.store_unchecked(index, doc);
        Ok(self)
    }

    /// Property-style assignment: numeric keys route to [`Self::set_at`].
    ///
    /// ```
    /// use docarray::{DocArrayError, DocumentArray};
    /// use serde_json::json;
    ///
    /// let mut arr = DocumentArray::detached(vec![json!(1)], "nums").unwrap();
    /// arr.set("1", json!(2)).unwrap();
    /// assert_eq!(arr.len(), 2);
    /// assert!(matches!(arr.set("length", json!(0)), Err(DocArrayError::UnknownProperty(_))));
    /// ```
    pub fn set(
        &mut self,
        key: &str,
        value: impl Into<ElementInput>,
    ) -> Result<&mut Self, DocArrayError> {
        match parse_index(key) {
            Some(index) => self.set_at(index, value),
            None => Err(DocArrayError::UnknownProperty(key.to_string())),
        }
    }

    /// Append one element; returns the new length.
    pub fn push(&mut self, value: impl Into<ElementInput>) -> Result<usize, DocArrayError> {
        self.push_many(std::iter::once(value))
    }

    pub fn push_many<I, V>(&mut self, values: I) -> Result<usize, DocArrayError>
    where
        I: IntoIterator<Item = V>,
        V: Into<ElementInput>,
    {
        let start = self.elements.len();
        let docs = self.cast_all(values, start)?;
        if docs.is_empty() {
            return Ok(start);
        }
        self.log.record(AtomicOp::Push(values_of(&docs)));
        self.mark_all_modified();
        self.elements.extend(docs);
        Ok(self.elements.len())
    }

    /// Prepend elements; returns the new length.
    pub fn unshift<I, V>(&mut self, values: I) -> Result<usize, DocArrayError>
    where
        I: IntoIterator<Item = V>,
        V: Into<ElementInput>,
    {
        let docs = self.cast_all(values, 0)?;
        if docs.is_empty() {
            return Ok(self.elements.len());
        }
        let inserted = docs.len();
        self.log.record(AtomicOp::Set);
        self.mark_all_modified();
        self.elements.splice(0..0, docs);
        self.reindex_from(inserted);
        Ok(self.elements.len())
    }

    pub fn pop(&mut self) -> Option<SubDocument> {
        if self.elements.is_empty() {
            return None;
        }
        self.log.record(AtomicOp::Set);
        self.mark_all_modified();
        self.elements.pop().map(detach)
    }

    pub fn shift(&mut self) -> Option<SubDocument> {
        if self.elements.is_empty() {
            return None;
        }
        self.log.record(AtomicOp::Set);
        self.mark_all_modified();
        let doc = self.elements.remove(0);
        self.reindex_from(0);
        Some(detach(doc))
    }

    /// Remove the last element, recorded as `$pop`.
    ///
    /// Works once per save cycle; later calls return `None` until the
    /// atomics are cleared.
    pub fn pop_atomic(&mut self) -> Option<SubDocument> {
        self.pop_end(PopEnd::Back)
    }

    /// Remove the first element, recorded as `$pop: -1`. Same once-per-save
    /// rule as [`Self::pop_atomic`].
    pub fn shift_atomic(&mut self) -> Option<SubDocument> {
        self.pop_end(PopEnd::Front)
    }

    fn pop_end(&mut self, end: PopEnd) -> Option<SubDocument> {
        if self.elements.is_empty() || self.log.contains(&AtomicKey::Pop) {
            return None;
        }
        self.log.record(AtomicOp::Pop(end));
        self.mark_all_modified();
        let doc = match end {
            PopEnd::Back => self.elements.pop(),
            PopEnd::Front => {
                let doc = self.elements.remove(0);
                self.reindex_from(0);
                Some(doc)
            }
        };
        doc.map(detach)
    }

    /// Remove up to `delete_count` elements at `start` and insert `items`
    /// there; returns the removed elements.
    pub fn splice<I, V>(
        &mut self,
        start: usize,
        delete_count: usize,
        items: I,
    ) -> Result<Vec<SubDocument>, DocArrayError>
    where
        I: IntoIterator<Item = V>,
        V: Into<ElementInput>,
    {
        let len = self.elements.len();
        if start > len {
            return Err(DocArrayError::OutOfRange { index: start, len });
        }
        let end = start + delete_count.min(len - start);
        let docs = self.cast_all(items, start)?;
        if end == start && docs.is_empty() {
            return Ok(Vec::new());
        }
        let inserted = docs.len();
        self.log.record(AtomicOp::Set);
        self.mark_all_modified();
        let removed: Vec<SubDocument> =
            self.elements.splice(start..end, docs).map(detach).collect();
        if inserted != removed.len() {
            self.reindex_from(start + inserted);
        }
        Ok(removed)
    }

    /// Remove every element matching `predicate`.
    ///
    /// Recorded as `$pull` by `_id` when every removed element has one,
    /// otherwise as `$pullAll` by value.
    pub fn pull<F>(&mut self, mut predicate: F) -> Vec<SubDocument>
    where
        F: FnMut(&SubDocument) -> bool,
    {
        let matched: Vec<usize> = self
            .elements
            .iter()
            .enumerate()
            .filter_map(|(i, doc)| predicate(doc).then_some(i))
            .collect();
        let Some(&first) = matched.first() else {
            return Vec::new();
        };

        let ids: Option<Vec<Value>> = matched
            .iter()
            .map(|&i| self.elements[i].id().cloned())
            .collect();
        let op = match ids {
            Some(ids) => AtomicOp::Pull { ids },
            None => AtomicOp::PullAll(
                matched
                    .iter()
                    .map(|&i| self.elements[i].value().clone())
                    .collect(),
            ),
        };
        self.log.record(op);
        self.mark_all_modified();

        let mut removed = Vec::with_capacity(matched.len());
        let mut kept = Vec::with_capacity(self.elements.len() - matched.len());
        for (i, doc) in std::mem::take(&mut self.elements).into_iter().enumerate() {
            if matched.binary_search(&i).is_ok() {
                removed.push(detach(doc));
            } else {
                kept.push(doc);
            }
        }
        self.elements = kept;
        self.reindex_from(first);
        removed
    }

    pub fn pull_id(&mut self, id: &Value) -> Vec<SubDocument> {
        self.pull(|doc| doc.id() == Some(id))
    }

    /// Append values not already present; returns how many were added.
    ///
    /// Elements with an `_id` are compared by id, others by value.
    pub fn add_to_set<I, V>(&mut self, values: I) -> Result<usize, DocArrayError>
    where
        I: IntoIterator<Item = V>,
        V: Into<ElementInput>,
    {
        let start = self.elements.len();
        let mut added: Vec<SubDocument> = Vec::new();
        for value in values {
            let doc = self.cast(value.into(), start + added.len())?;
            let present = self
                .elements
                .iter()
                .chain(added.iter())
                .any(|existing| same_member(existing, &doc));
            if !present {
                added.push(doc);
            }
        }
        if added.is_empty() {
            return Ok(0);
        }
        let count = added.len();
        self.log.record(AtomicOp::AddToSet(values_of(&added)));
        self.mark_all_modified();
        self.elements.extend(added);
        Ok(count)
    }

    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&SubDocument, &SubDocument) -> Ordering,
    {
        if self.elements.len() < 2 {
            return;
        }
        self.log.record(AtomicOp::Set);
        self.mark_all_modified();
        self.elements.sort_by(compare);
        self.reindex_from(0);
    }

    /// Replace the whole contents.
    pub fn replace_all<I, V>(&mut self, values: I) -> Result<(), DocArrayError>
    where
        I: IntoIterator<Item = V>,
        V: Into<ElementInput>,
    {
        let docs = self.cast_all(values, 0)?;
        if docs.is_empty() && self.elements.is_empty() {
            return Ok(());
        }
        self.log.record(AtomicOp::Set);
        self.mark_all_modified();
        self.elements = docs;
        Ok(())
    }

    /// Remove every element; returns them.
    pub fn empty(&mut self) -> Vec<SubDocument> {
        if self.elements.is_empty() {
            return Vec::new();
        }
        self.log.record(AtomicOp::Set);
        self.mark_all_modified();
        std::mem::take(&mut self.elements)
            .into_iter()
            .map(detach)
            .collect()
    }

    fn cast_all<I, V>(&self, values: I, start: usize) -> Result<Vec<SubDocument>, CastError>
    where
        I: IntoIterator<Item = V>,
        V: Into<ElementInput>,
    {
        values
            .into_iter()
            .enumerate()
            .map(|(i, value)| self.cast(value.into(), start + i))
            .collect()
    }

    fn reindex_from(&mut self, start: usize) {
        for (i, doc) in self.elements.iter_mut().enumerate().skip(start) {
            doc.set_index(i);
        }
    }
}

/// Removed elements no longer hold a position.
fn detach(mut doc: SubDocument) -> SubDocument {
    doc.unbind();
    doc
}

fn values_of(docs: &[SubDocument]) -> Vec<Value> {
    docs.iter().map(|doc| doc.value().clone()).collect()
}

fn same_member(a: &SubDocument, b: &SubDocument) -> bool {
    match (a.id(), b.id()) {
        (Some(x), Some(y)) => x == y,
        _ => a.value() == b.value(),
    }
}
