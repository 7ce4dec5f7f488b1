//! JSON merge and dotted-path helpers.

use serde_json::{Map, Value};

/// Merge `overlay` into `base`, recursing into objects.
///
/// Scalars and arrays in `overlay` replace whatever `base` holds at the same
/// path; keys only present in `base` survive.
pub(crate) fn merge_json_values(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base_slot, overlay_value) => {
            *base_slot = overlay_value.clone();
        }
    }
}

/// Fold layers left to right on top of an empty object.
pub(crate) fn merge_layers<'a>(layers: impl IntoIterator<Item = &'a Value>) -> Value {
    let mut merged = Value::Object(Map::new());
    for layer in layers {
        merge_json_values(&mut merged, layer);
    }
    merged
}

/// Split a dotted path into its segments, rejecting empty segments.
pub(crate) fn split_path(path: &str) -> Option<Vec<&str>> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return None;
    }
    Some(segments)
}

/// Write `value` at `segments`, creating intermediate objects as needed.
///
/// Any non-object found along the way (including the root) is replaced by an
/// empty object.
pub(crate) fn set_path(root: &mut Value, segments: &[&str], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        *root = value;
        return;
    };

    let mut cursor = root;
    for segment in parents {
        make_object(cursor);
        let Value::Object(map) = cursor else {
            return;
        };
        cursor = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    make_object(cursor);
    if let Value::Object(map) = cursor {
        map.insert(last.to_string(), value);
    }
}

/// Read the value at `segments`, if every step exists.
pub(crate) fn get_path<'a>(root: &'a Value, segments: &[&str]) -> Option<&'a Value> {
    segments
        .iter()
        .try_fold(root, |cursor, segment| cursor.as_object()?.get(*segment))
}

fn make_object(value: &mut Value) {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
}
