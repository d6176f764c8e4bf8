//! Canonical JSON minimal: claves de objetos ordenadas, sin espacios.
//!
//! Los números se emiten tal como los formatea `serde_json`; dos payloads con
//! el mismo contenido y distinto orden de claves producen el mismo string.

use serde_json::Value;
use std::collections::BTreeMap;

pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(_) => value.to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(to_canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        Value::Object(map) => {
            let mut tree = BTreeMap::new();
            for (k, v) in map {
                tree.insert(k, to_canonical_json(v));
            }
            let items: Vec<String> = tree.into_iter()
                                         .map(|(k, v)| format!("{}:{}", Value::String(k.clone()), v))
                                         .collect();
            format!("{{{}}}", items.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keys_are_sorted_recursively() {
        let v = json!({"b": {"z": 1, "a": [true, null]}, "a": "x\"y"});
        assert_eq!(to_canonical_json(&v), r#"{"a":"x\"y","b":{"a":[true,null],"z":1}}"#);
    }
}
