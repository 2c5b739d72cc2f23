use std::rc::{Rc, Weak};

use docarray_path::validate_path;
use docarray_schema::{DocSchema, SchemaType};

use crate::document::{DocumentId, Owner};
use crate::error::BindingWarning;

/// Identity fields established at construction.
pub(super) struct Binding {
    pub(super) owner: Option<Weak<dyn Owner>>,
    pub(super) owner_id: Option<DocumentId>,
    pub(super) schema: Option<SchemaType>,
    pub(super) warning: Option<BindingWarning>,
}

impl Binding {
    pub(super) fn unbound() -> Self {
        Self {
            owner: None,
            owner_id: None,
            schema: None,
            warning: None,
        }
    }

    fn degraded(warning: BindingWarning) -> Self {
        log::warn!("{warning}");
        Self {
            warning: Some(warning),
            ..Self::unbound()
        }
    }

    pub(super) fn resolve<O: Owner + 'static>(owner: &Rc<O>, path: &str) -> Self {
        let Some(doc_schema) = owner.schema() else {
            return Self::degraded(BindingWarning::NotADocument {
                path: path.to_string(),
            });
        };
        if let Err(source) = validate_path(path) {
            return Self::degraded(BindingWarning::InvalidPath {
                path: path.to_string(),
                source,
            });
        }

        let schema = resolve_element_schema(&doc_schema, path);
        let warning = match schema {
            Some(_) => None,
            None => {
                let warning = BindingWarning::UnresolvedPath {
                    path: path.to_string(),
                };
                log::warn!("{warning}");
                Some(warning)
            }
        };
        let weak = Rc::downgrade(owner) as Weak<dyn Owner>;
        Self {
            owner: Some(weak),
            owner_id: Some(owner.document_id()),
            schema,
            warning,
        }
    }
}

/// Element descriptor of the array declared at `path`.
///
/// Plain array wrappers are unwrapped until a document array, a document,
/// or a non-array descriptor is reached.
pub fn resolve_element_schema(schema: &DocSchema, path: &str) -> Option<SchemaType> {
    let mut resolved = schema.path(path);
    loop {
        match resolved {
            Some(SchemaType::Array(inner)) => resolved = Some(*inner),
            other => return other,
        }
    }
}
