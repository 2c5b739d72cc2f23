//! Fluent construction of [`DocSchema`] values.

use serde_json::Value;

use crate::schema::{DocSchema, FieldDef, SchemaOptions, SchemaType};

/// Fluent builder for [`DocSchema`].
///
/// ```
/// use docarray_schema::{DocSchema, SchemaType};
///
/// let tag = DocSchema::builder()
///     .field("name", SchemaType::Str)
///     .field_with_default("weight", SchemaType::Num, 1.into())
///     .build();
/// assert_eq!(tag.fields().count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    schema: DocSchema,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: impl Into<String>, ty: SchemaType) -> Self {
        self.schema.fields.insert(name.into(), FieldDef::new(ty));
        self
    }

    pub fn field_with_default(
        mut self,
        name: impl Into<String>,
        ty: SchemaType,
        default: Value,
    ) -> Self {
        self.schema.fields.insert(
            name.into(),
            FieldDef {
                ty,
                default: Some(default),
            },
        );
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.schema.options.strict = strict;
        self
    }

    pub fn id(mut self, id: bool) -> Self {
        self.schema.options.id = id;
        self
    }

    pub fn options(mut self, options: SchemaOptions) -> Self {
        self.schema.options = options;
        self
    }

    pub fn build(self) -> DocSchema {
        self.schema
    }
}
