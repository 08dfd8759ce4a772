//! Argument normalization for capability callbacks.

use serde::Serialize;
use serde_json::{Map, Value};

/// Converts callback arguments of any serializable shape into a plain map.
///
/// Objects are taken as they are. A list of `[key, value]` pairs becomes a
/// map of those pairs; elements that are not pairs with a string key are
/// dropped. Everything else, including values that fail to serialize,
/// normalizes to an empty map.
pub fn normalize_args<T: Serialize + ?Sized>(args: &T) -> Map<String, Value> {
    match serde_json::to_value(args) {
        Ok(Value::Object(map)) => map,
        Ok(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Array(pair) if pair.len() == 2 => {
                    let mut pair = pair.into_iter();
                    match (pair.next(), pair.next()) {
                        (Some(Value::String(key)), Some(value)) => Some((key, value)),
                        _ => None,
                    }
                }
                _ => None,
            })
            .collect(),
        Ok(_) => Map::new(),
        Err(err) => {
            tracing::debug!(error = %err, "capability arguments failed to serialize");
            Map::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde_json::json;

    use super::*;

    #[derive(Serialize)]
    struct PageArgs {
        title: &'static str,
        status: Option<&'static str>,
    }

    #[test]
    fn structs_and_maps_become_objects() {
        let args = normalize_args(&PageArgs {
            title: "About",
            status: None,
        });
        assert_eq!(args.get("title"), Some(&json!("About")));
        assert_eq!(args.get("status"), Some(&Value::Null));

        let mut map = BTreeMap::new();
        map.insert("slug", "home");
        assert_eq!(normalize_args(&map).get("slug"), Some(&json!("home")));
    }

    #[test]
    fn pair_lists_become_objects() {
        let args = normalize_args(&json!([["title", "Home"], ["bad"], [1, 2], ["page_id", 4]]));
        assert_eq!(args.len(), 2);
        assert_eq!(args["page_id"], 4);
    }

    #[test]
    fn scalars_become_empty() {
        assert!(normalize_args(&json!("title")).is_empty());
        assert!(normalize_args(&Value::Null).is_empty());
        assert!(normalize_args(&42).is_empty());
    }
}
