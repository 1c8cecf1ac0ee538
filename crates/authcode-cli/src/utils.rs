use serde_json::{Map, Value};

// drops nulls and empty objects so unset flags never shadow the config file
pub fn clean_json(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let cleaned_map: Map<String, Value> = map
                .into_iter()
                .filter_map(|(k, v)| {
                    let cleaned_v = clean_json(v);
                    let empty = cleaned_v.as_object().is_some_and(Map::is_empty);
                    if cleaned_v.is_null() || empty {
                        None
                    } else {
                        Some((k, cleaned_v))
                    }
                })
                .collect();
            Value::Object(cleaned_map)
        }
        Value::Array(arr) => Value::Array(arr.into_iter().map(clean_json).collect()),
        _ => value,
    }
}
