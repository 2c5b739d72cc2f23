//! The document array façade.
//!
//! Reads go straight to the element storage through `Deref<Target = [SubDocument]>`.
//! Writes go through typed methods that cast, record an atomic, notify the
//! owner, and only then touch storage.

use std::rc::{Rc, Weak};

use docarray_schema::SchemaType;
use serde_json::Value;

use crate::atomics::{AtomicLog, Atomics};
use crate::document::{DocumentId, Owner};
use crate::error::{BindingWarning, CastError};
use crate::subdoc::SubDocument;

mod binding;
mod cast;
mod ops;
mod propagate;
mod read;
mod save;

pub use binding::resolve_element_schema;
use binding::Binding;

/// Values an array is constructed from.
#[derive(Debug, Clone)]
pub enum InitialValues {
    Values(Vec<Value>),
    Elements(Vec<SubDocument>),
    /// Re-wrap an existing array. Its atomics carry forward when it has the
    /// same path and owner.
    Array(DocumentArray),
}

impl From<Vec<Value>> for InitialValues {
    fn from(values: Vec<Value>) -> Self {
        Self::Values(values)
    }
}

impl From<Vec<SubDocument>> for InitialValues {
    fn from(elements: Vec<SubDocument>) -> Self {
        Self::Elements(elements)
    }
}

impl From<DocumentArray> for InitialValues {
    fn from(array: DocumentArray) -> Self {
        Self::Array(array)
    }
}

/// A value headed for an array slot.
#[derive(Debug, Clone)]
pub enum ElementInput {
    Raw(Value),
    Doc(SubDocument),
}

impl From<Value> for ElementInput {
    fn from(value: Value) -> Self {
        Self::Raw(value)
    }
}

impl From<SubDocument> for ElementInput {
    fn from(doc: SubDocument) -> Self {
        Self::Doc(doc)
    }
}

/// An ordered sequence of sub-documents bound to one owner and one path.
#[derive(Debug, Clone)]
pub struct DocumentArray {
    elements: Vec<SubDocument>,
    path: String,
    schema: Option<SchemaType>,
    owner: Option<Weak<dyn Owner>>,
    owner_id: Option<DocumentId>,
    log: AtomicLog,
    warning: Option<BindingWarning>,
}

impl DocumentArray {
    /// Bind a new array to `owner` at `path` and cast `values` into it.
    ///
    /// An owner without a schema, or a path the schema does not declare,
    /// degrades the array instead of failing; see [`Self::binding_warning`].
    pub fn new<O: Owner + 'static>(
        values: impl Into<InitialValues>,
        path: impl Into<String>,
        owner: &Rc<O>,
    ) -> Result<Self, CastError> {
        let path = path.into();
        let binding = Binding::resolve(owner, &path);
        Self::build(values.into(), path, binding)
    }

    /// An array with no owner: values pass through uncast and
    /// modifications are not reported anywhere.
    pub fn detached(
        values: impl Into<InitialValues>,
        path: impl Into<String>,
    ) -> Result<Self, CastError> {
        Self::build(values.into(), path.into(), Binding::unbound())
    }

    fn build(values: InitialValues, path: String, binding: Binding) -> Result<Self, CastError> {
        let mut array = Self {
            elements: Vec::new(),
            path,
            schema: binding.schema,
            owner: binding.owner,
            owner_id: binding.owner_id,
            log: AtomicLog::new(),
            warning: binding.warning,
        };
        let inputs: Vec<ElementInput> = match values {
            InitialValues::Values(values) => values.into_iter().map(ElementInput::Raw).collect(),
            InitialValues::Elements(docs) => docs.into_iter().map(ElementInput::Doc).collect(),
            InitialValues::Array(prior) => {
                if prior.path == array.path && prior.owner_id == array.owner_id {
                    if !prior.log.is_empty() {
                        log::debug!(
                            "carrying {} pending atomics forward for {:?}",
                            prior.log.len(),
                            array.path
                        );
                    }
                    array.log = AtomicLog::carried(prior.log.atomics());
                }
                prior.elements.into_iter().map(ElementInput::Doc).collect()
            }
        };
        array.elements.reserve(inputs.len());
        for (index, input) in inputs.into_iter().enumerate() {
            let doc = array.cast(input, index)?;
            array.store_unchecked(index, doc);
        }
        Ok(array)
    }

    /// Store a known-correct element without casting, logging, or notifying.
    pub(crate) fn store_unchecked(&mut self, index: usize, doc: SubDocument) {
        debug_assert!(index <= self.elements.len());
        match self.elements.get_mut(index) {
            Some(slot) => *slot = doc,
            None => self.elements.push(doc),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Resolved element descriptor; `None` when unbound.
    pub fn schema(&self) -> Option<&SchemaType> {
        self.schema.as_ref()
    }

    pub fn owner_id(&self) -> Option<DocumentId> {
        self.owner_id
    }

    /// The owner, if bound and still alive.
    pub fn owner(&self) -> Option<Rc<dyn Owner>> {
        self.owner.as_ref().and_then(Weak::upgrade)
    }

    pub fn is_bound(&self) -> bool {
        self.owner.is_some()
    }

    pub fn binding_warning(&self) -> Option<&BindingWarning> {
        self.warning.as_ref()
    }

    pub fn atomics(&self) -> &Atomics {
        self.log.atomics()
    }

    pub fn atomic_log(&self) -> &AtomicLog {
        &self.log
    }

    /// Back up the atomics before a save attempt.
    pub fn snapshot_atomics(&mut self) {
        self.log.snapshot();
    }

    /// Roll the atomics back to the backup after a rejected save.
    pub fn restore_atomics(&mut self) {
        self.log.restore();
    }

    /// Drop the atomics and any backup after a successful save.
    pub fn clear_atomics(&mut self) {
        self.log.clear();
    }
}
