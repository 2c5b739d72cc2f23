use std::rc::Weak;

use docarray_path::{index_path, join_path};

use super::DocumentArray;
use crate::error::DocArrayError;

impl DocumentArray {
    /// Report `"<path>.<index>"` as modified to the owner.
    pub fn mark_modified(&self, index: usize) {
        self.notify(&index_path(&self.path, index));
    }

    /// Report a change made inside element `index`, at `field` relative to
    /// the element (e.g. `"name"` or `"author.email"`).
    pub fn mark_field_modified(&self, index: usize, field: &str) -> Result<(), DocArrayError> {
        let len = self.elements.len();
        let Some(doc) = self.elements.get(index) else {
            return Err(DocArrayError::OutOfRange { index, len });
        };
        let path = doc
            .field_path(field)
            .unwrap_or_else(|| join_path(&index_path(&self.path, index), field));
        self.notify(&path);
        Ok(())
    }

    /// Report the whole array path as modified to the owner.
    pub fn mark_all_modified(&self) {
        self.notify(&self.path);
    }

    fn notify(&self, path: &str) {
        match self.owner.as_ref().map(Weak::upgrade) {
            Some(Some(owner)) => owner.mark_modified(path),
            Some(None) => log::debug!("owner of {:?} is gone; {path:?} not reported", self.path),
            None => {}
        }
    }
}
