//! Translation of recorded atomics into partial update commands.

use docarray_path::index_path;
use serde_json::{json, Map, Value};

use crate::atomics::AtomicOp;
use crate::subdoc::SubDocument;

/// One operator applied to one path, e.g. `$push tags {"$each": [...]}`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOp {
    pub operator: &'static str,
    pub path: String,
    pub value: Value,
}

pub(crate) fn translate(op: &AtomicOp, path: &str, elements: &[SubDocument]) -> UpdateOp {
    let (path, value) = match op {
        AtomicOp::Set => (
            path.to_string(),
            Value::Array(elements.iter().map(|d| d.value().clone()).collect()),
        ),
        AtomicOp::SetAt { index, value } => (index_path(path, *index), value.clone()),
        AtomicOp::Push(each) | AtomicOp::AddToSet(each) => {
            (path.to_string(), json!({ "$each": each }))
        }
        AtomicOp::PullAll(values) => (path.to_string(), Value::Array(values.clone())),
        AtomicOp::Pull { ids } => (path.to_string(), json!({ "_id": { "$in": ids } })),
        AtomicOp::Pop(end) => (path.to_string(), Value::from(end.direction())),
    };
    UpdateOp {
        operator: op.operator(),
        path,
        value,
    }
}

/// Group update ops by operator into a single update document.
///
/// ```
/// use docarray::{to_update_document, UpdateOp};
/// use serde_json::json;
///
/// let ops = vec![
///     UpdateOp { operator: "$set", path: "tags.0".into(), value: json!({"name": "a"}) },
///     UpdateOp { operator: "$set", path: "tags.2".into(), value: json!({"name": "c"}) },
/// ];
/// assert_eq!(
///     to_update_document(&ops),
///     json!({"$set": {"tags.0": {"name": "a"}, "tags.2": {"name": "c"}}})
/// );
/// ```
pub fn to_update_document(ops: &[UpdateOp]) -> Value {
    let mut doc = Map::new();
    for op in ops {
        let slot = doc
            .entry(op.operator)
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(fields) = slot {
            fields.insert(op.path.clone(), op.value.clone());
        }
    }
    Value::Object(doc)
}
