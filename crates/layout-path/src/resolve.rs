//! Read and write resolution of path expressions against JSON values.

use serde_json::Value;

use crate::types::PathStep;

/// Walk `path` through `doc` and return the addressed value.
///
/// Any absent segment yields `None`; resolution never errors. An empty path
/// addresses the root.
pub fn resolve<'a>(doc: &'a Value, path: &[PathStep]) -> Option<&'a Value> {
    let mut current = doc;
    for step in path {
        current = match (step, current) {
            (PathStep::Key(key), Value::Object(map)) => map.get(key)?,
            (PathStep::Index(idx), Value::Array(arr)) => arr.get(*idx)?,
            (PathStep::First, Value::Array(arr)) => arr.first()?,
            _ => return None,
        };
    }
    Some(current)
}

/// Mutable variant of [`resolve`].
pub fn resolve_mut<'a>(doc: &'a mut Value, path: &[PathStep]) -> Option<&'a mut Value> {
    let mut current = doc;
    for step in path {
        current = match (step, current) {
            (PathStep::Key(key), Value::Object(map)) => map.get_mut(key)?,
            (PathStep::Index(idx), Value::Array(arr)) => arr.get_mut(*idx)?,
            (PathStep::First, Value::Array(arr)) => arr.first_mut()?,
            _ => return None,
        };
    }
    Some(current)
}

/// Overwrite the location addressed by `path` with `value`.
///
/// The parent path must fully resolve; a missing parent makes the write a
/// no-op and returns `false`. Writing never creates intermediate structure.
/// For an object parent the final key is inserted or overwritten; for an
/// array parent the indexed element must already exist.
pub fn write(doc: &mut Value, path: &[PathStep], value: Value) -> bool {
    let Some((leaf, parent_path)) = path.split_last() else {
        *doc = value;
        return true;
    };
    let Some(parent) = resolve_mut(doc, parent_path) else {
        return false;
    };
    match (leaf, parent) {
        (PathStep::Key(key), Value::Object(map)) => {
            map.insert(key.clone(), value);
            true
        }
        (PathStep::Index(idx), Value::Array(arr)) => match arr.get_mut(*idx) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        },
        (PathStep::First, Value::Array(arr)) => match arr.first_mut() {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        },
        _ => false,
    }
}
