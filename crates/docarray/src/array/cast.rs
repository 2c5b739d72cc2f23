use docarray_schema::{cast, cast_document};

use super::{DocumentArray, ElementInput};
use crate::error::CastError;
use crate::subdoc::{ArrayLink, SubDocument};

impl DocumentArray {
    /// Normalize `input` into an element bound to this array at `index`.
    ///
    /// Elements already bound here, or carrying this array's schema, are
    /// kept as-is (rebound if needed); anything else is cast from its raw
    /// value. Unbound arrays pass every input through.
    pub(crate) fn cast(&self, input: ElementInput, index: usize) -> Result<SubDocument, CastError> {
        let Some(schema) = &self.schema else {
            log::trace!("{:?} has no element schema; storing value uncast", self.path);
            return Ok(match input {
                ElementInput::Raw(value) => SubDocument::detached(value),
                ElementInput::Doc(doc) => SubDocument::detached(doc.into_value()),
            });
        };
        let doc_schema = schema.document_schema().cloned();
        let link = ArrayLink {
            owner: self.owner_id,
            path: self.path.clone(),
            index,
        };

        let raw = match input {
            ElementInput::Doc(doc)
                if doc.is_bound_to(self.owner_id, &self.path, index)
                    && doc.same_schema(doc_schema.as_ref()) =>
            {
                return Ok(doc);
            }
            ElementInput::Doc(mut doc)
                if doc_schema.is_some() && doc.same_schema(doc_schema.as_ref()) =>
            {
                doc.rebind(link);
                return Ok(doc);
            }
            ElementInput::Doc(doc) => doc.into_value(),
            ElementInput::Raw(value) => value,
        };

        let value = match &doc_schema {
            Some(s) => cast_document(s, raw),
            None => cast(schema, raw),
        }
        .map_err(|source| CastError {
            path: self.path.clone(),
            index,
            source,
        })?;
        Ok(SubDocument::bound(value, doc_schema, link))
    }

    /// Cast `value` as if it were appended, without inserting it.
    pub fn create(&self, value: impl Into<ElementInput>) -> Result<SubDocument, CastError> {
        self.cast(value.into(), self.elements.len())
    }
}
