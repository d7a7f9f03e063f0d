use crate::common::{Value, DOC_DATA, DOC_SUB_COLLECTIONS};

/// Recursively removes empty sub-collections from a rendered document tree.
///
/// The input is the shape produced by [`crate::collection::Document::to_value`]:
/// a map with `id`, `data` and `subcollections` keys, where `subcollections`
/// maps a name to an array of rendered documents. Nested documents that carry
/// neither data nor sub-collections are dropped, a sub-collection left without
/// documents is dropped, and the `subcollections` key itself disappears when
/// nothing is left under it. Any other value is returned unchanged.
pub fn prune_empty_sub_collections(value: Value) -> Value {
    let Value::Map(mut map) = value else {
        return value;
    };

    let key = Value::from(DOC_SUB_COLLECTIONS);
    let subs = match map.get_mut(&key) {
        Some(subs) => std::mem::take(subs),
        None => return Value::Map(map),
    };

    let mut cleaned_subs = crate::common::ValueMap::new();
    if let Value::Map(subs) = subs {
        for (name, documents) in subs {
            let Value::Array(documents) = documents else {
                continue;
            };

            let cleaned: Vec<Value> = documents
                .into_iter()
                .map(prune_empty_sub_collections)
                .filter(|doc| {
                    has_content(doc.get(DOC_SUB_COLLECTIONS)) || has_content(doc.get(DOC_DATA))
                })
                .collect();

            if !cleaned.is_empty() {
                cleaned_subs.insert(name, Value::Array(cleaned));
            }
        }
    }

    if cleaned_subs.is_empty() {
        map.shift_remove(&key);
    } else {
        map.insert(key, Value::Map(cleaned_subs));
    }
    Value::Map(map)
}

fn has_content(value: Option<&Value>) -> bool {
    match value {
        None => false,
        Some(Value::Bool(v)) => *v,
        Some(Value::I64(v)) => *v != 0,
        Some(Value::F64(v)) => *v != 0.0,
        Some(v) => !v.is_empty(),
    }
}
