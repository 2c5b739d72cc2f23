use std::sync::Arc;

use docarray_path::{is_index, parse_path};
use indexmap::IndexMap;
use serde_json::Value;

use crate::builder::SchemaBuilder;

/// Name of the implicit identity field.
pub const ID_FIELD: &str = "_id";

/// Descriptor of the value type declared at a schema path.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaType {
    /// Untyped; values pass through unchanged.
    Any,
    Bool,
    Num,
    Str,
    /// 24 hex digit identifier string.
    ObjectId,
    /// A single embedded document.
    Document(Arc<DocSchema>),
    /// A plain array wrapper around another descriptor. Nesting is
    /// expressed as `Array(Array(..))`.
    Array(Box<SchemaType>),
    /// An array whose elements are sub-documents.
    DocumentArray(Arc<DocSchema>),
}

impl SchemaType {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Bool => "boolean",
            Self::Num => "number",
            Self::Str => "string",
            Self::ObjectId => "objectid",
            Self::Document(_) => "document",
            Self::Array(_) => "array",
            Self::DocumentArray(_) => "documentarray",
        }
    }

    pub fn array_of(inner: SchemaType) -> Self {
        Self::Array(Box::new(inner))
    }

    pub fn documents(schema: DocSchema) -> Self {
        Self::DocumentArray(Arc::new(schema))
    }

    pub fn document(schema: DocSchema) -> Self {
        Self::Document(Arc::new(schema))
    }

    /// True for both plain arrays and document arrays.
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_) | Self::DocumentArray(_))
    }

    pub fn is_document_array(&self) -> bool {
        matches!(self, Self::DocumentArray(_))
    }

    /// Element descriptor of a plain array wrapper.
    pub fn caster(&self) -> Option<&SchemaType> {
        match self {
            Self::Array(inner) => Some(inner),
            _ => None,
        }
    }

    /// The document schema carried by `Document` and `DocumentArray`.
    pub fn document_schema(&self) -> Option<&Arc<DocSchema>> {
        match self {
            Self::Document(s) | Self::DocumentArray(s) => Some(s),
            _ => None,
        }
    }

    /// Resolve one path segment below this descriptor.
    fn child(&self, step: &str) -> Option<SchemaType> {
        match self {
            Self::Document(s) => s.field_type(step),
            Self::DocumentArray(s) => {
                if is_index(step) {
                    Some(Self::Document(Arc::clone(s)))
                } else {
                    s.field_type(step)
                }
            }
            Self::Array(inner) => {
                if is_index(step) {
                    Some((**inner).clone())
                } else {
                    inner.child(step)
                }
            }
            _ => None,
        }
    }
}

/// A declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub ty: SchemaType,
    /// Applied when the field is absent from a value being cast.
    pub default: Option<Value>,
}

impl FieldDef {
    pub fn new(ty: SchemaType) -> Self {
        Self { ty, default: None }
    }
}

/// Casting behaviour of a document schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaOptions {
    /// Drop undeclared fields while casting.
    pub strict: bool,
    /// Maintain an implicit `_id` field, generating one when absent.
    pub id: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            strict: true,
            id: true,
        }
    }
}

/// The declared structure of a document or sub-document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocSchema {
    pub(crate) fields: IndexMap<String, FieldDef>,
    pub(crate) options: SchemaOptions,
}

impl DocSchema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDef)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn options(&self) -> &SchemaOptions {
        &self.options
    }

    /// Type of a direct field, including the implicit `_id`.
    pub fn field_type(&self, name: &str) -> Option<SchemaType> {
        match self.fields.get(name) {
            Some(def) => Some(def.ty.clone()),
            None if name == ID_FIELD && self.options.id => Some(SchemaType::ObjectId),
            None => None,
        }
    }

    /// Resolve the descriptor declared at a dotted path.
    ///
    /// Index segments step into array elements; other segments step into
    /// document fields. Unknown paths resolve to `None`.
    pub fn path(&self, path: &str) -> Option<SchemaType> {
        let steps = parse_path(path);
        let (first, rest) = steps.split_first()?;
        let mut current = self.field_type(first)?;
        for step in rest {
            current = current.child(step)?;
        }
        Some(current)
    }
}
