//! Coerces raw JSON values into the type a descriptor declares.
//!
//! Runtime match dispatch over [`SchemaType`]; documents are cast field by
//! field, arrays element by element.

use std::collections::HashMap;

use docarray_path::format_path;
use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::object_id::{is_object_id, new_object_id};
use crate::schema::{DocSchema, SchemaType, ID_FIELD};

/// A value could not be coerced to its declared type.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("cast to {expected} failed for value {value}{}", at_path(.path))]
pub struct CastFailure {
    /// Dotted path of the offending value, relative to the value being cast.
    pub path: String,
    pub expected: &'static str,
    pub value: Value,
}

fn at_path(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" at \"{path}\"")
    }
}

fn fail(expected: &'static str, value: Value, path: &[String]) -> CastFailure {
    CastFailure {
        path: format_path(path),
        expected,
        value,
    }
}

/// Cast `value` to the type described by `ty`.
///
/// `null` is accepted by every descriptor.
pub fn cast(ty: &SchemaType, value: Value) -> Result<Value, CastFailure> {
    let mut path = Vec::new();
    cast_inner(ty, value, &mut path)
}

/// Cast `value` into a document of `schema`.
///
/// Unlike [`cast`], `null` is rejected: the result is always an object.
pub fn cast_document(schema: &DocSchema, value: Value) -> Result<Value, CastFailure> {
    let mut path = Vec::new();
    cast_doc(schema, value, &mut path)
}

fn cast_inner(ty: &SchemaType, value: Value, path: &mut Vec<String>) -> Result<Value, CastFailure> {
    if value.is_null() {
        return Ok(Value::Null);
    }
    match ty {
        SchemaType::Any => Ok(value),
        SchemaType::Bool => cast_bool(value).map_err(|v| fail("boolean", v, path)),
        SchemaType::Num => cast_num(value).map_err(|v| fail("number", v, path)),
        SchemaType::Str => cast_str(value).map_err(|v| fail("string", v, path)),
        SchemaType::ObjectId => cast_object_id(value).map_err(|v| fail("objectid", v, path)),
        SchemaType::Document(s) => cast_doc(s, value, path),
        SchemaType::Array(inner) => {
            cast_items(value, path, |item, path| cast_inner(inner, item, path))
        }
        SchemaType::DocumentArray(s) => {
            cast_items(value, path, |item, path| cast_doc(s, item, path))
        }
    }
}

/// Cast each array item; a lone non-array value is wrapped first.
fn cast_items<F>(value: Value, path: &mut Vec<String>, mut each: F) -> Result<Value, CastFailure>
where
    F: FnMut(Value, &mut Vec<String>) -> Result<Value, CastFailure>,
{
    let items = match value {
        Value::Array(items) => items,
        other => vec![other],
    };
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        path.push(i.to_string());
        let cast = each(item, path);
        path.pop();
        out.push(cast?);
    }
    Ok(Value::Array(out))
}

fn cast_doc(
    schema: &DocSchema,
    value: Value,
    path: &mut Vec<String>,
) -> Result<Value, CastFailure> {
    let input = match value {
        Value::Object(map) => map,
        other => return Err(fail("document", other, path)),
    };
    let options = schema.options;
    let implicit_id = options.id && schema.field(ID_FIELD).is_none();

    let mut id = None;
    let mut declared = HashMap::new();
    let mut extras = Map::new();
    for (key, val) in input {
        if schema.field(&key).is_some() {
            declared.insert(key, val);
        } else if implicit_id && key == ID_FIELD {
            id = Some(val);
        } else if !options.strict {
            extras.insert(key, val);
        } else {
            log::trace!("dropping undeclared field {key:?} under strict schema");
        }
    }

    let mut out = Map::new();
    if implicit_id {
        let id = match id {
            None | Some(Value::Null) => Value::String(new_object_id()),
            Some(raw) => {
                path.push(ID_FIELD.to_string());
                let cast = cast_inner(&SchemaType::ObjectId, raw, path);
                path.pop();
                cast?
            }
        };
        out.insert(ID_FIELD.to_string(), id);
    }
    for (name, def) in schema.fields() {
        let raw = match declared.remove(name) {
            Some(raw) => raw,
            None => match &def.default {
                Some(default) => default.clone(),
                None => continue,
            },
        };
        path.push(name.to_string());
        let cast = cast_inner(&def.ty, raw, path);
        path.pop();
        out.insert(name.to_string(), cast?);
    }
    out.extend(extras);
    Ok(Value::Object(out))
}

fn cast_bool(value: Value) -> Result<Value, Value> {
    let b = match &value {
        Value::Bool(b) => *b,
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 1.0 => true,
            Some(f) if f == 0.0 => false,
            _ => return Err(value),
        },
        Value::String(s) => match s.as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            _ => return Err(value),
        },
        _ => return Err(value),
    };
    Ok(Value::Bool(b))
}

fn cast_num(value: Value) -> Result<Value, Value> {
    match &value {
        Value::Number(_) => Ok(value),
        Value::Bool(b) => Ok(Value::from(u8::from(*b))),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(value);
            }
            if let Ok(i) = s.parse::<i64>() {
                return Ok(Value::from(i));
            }
            if let Ok(u) = s.parse::<u64>() {
                return Ok(Value::from(u));
            }
            match s.parse::<f64>().ok().and_then(Number::from_f64) {
                Some(n) => Ok(Value::Number(n)),
                None => Err(value),
            }
        }
        _ => Err(value),
    }
}

fn cast_str(value: Value) -> Result<Value, Value> {
    match value {
        Value::String(_) => Ok(value),
        Value::Number(n) => Ok(Value::String(n.to_string())),
        Value::Bool(b) => Ok(Value::String(b.to_string())),
        other => Err(other),
    }
}

fn cast_object_id(value: Value) -> Result<Value, Value> {
    match &value {
        Value::String(s) if is_object_id(s) => Ok(Value::String(s.to_ascii_lowercase())),
        _ => Err(value),
    }
}
