//! Augmentation for registries that collect capabilities through a
//! transform hook instead of imperative registration.

use std::collections::HashSet;

use serde_json::Value;

use super::registry::CapabilityEntry;

/// Adds a descriptor for every capability missing from `current`.
///
/// `current` is either a list of records carrying a `name` field or a map
/// keyed by name; the result keeps that shape. A null collection is treated
/// as an empty list. Any other value is returned as is.
pub fn augment_collection(current: Value, entries: &[CapabilityEntry]) -> Value {
    match current {
        Value::Null => Value::Array(entries.iter().map(CapabilityEntry::descriptor).collect()),
        Value::Array(mut records) => {
            let mut present: HashSet<String> = records
                .iter()
                .filter_map(|r| r.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect();
            for entry in entries {
                if present.insert(entry.name.clone()) {
                    records.push(entry.descriptor());
                }
            }
            Value::Array(records)
        }
        Value::Object(mut map) => {
            for entry in entries {
                if !map.contains_key(&entry.name) {
                    map.insert(entry.name.clone(), entry.descriptor());
                }
            }
            Value::Object(map)
        }
        other => {
            tracing::debug!("registry collection has an unknown shape, left unchanged");
            other
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::bridge::registry::CapabilityHandler;

    struct Echo;

    #[async_trait]
    impl CapabilityHandler for Echo {
        async fn call(&self, args: Value) -> Value {
            args
        }
    }

    fn entry(name: &str) -> CapabilityEntry {
        CapabilityEntry {
            name: name.to_string(),
            description: format!("{} test", name),
            input_schema: json!({ "type": "object" }),
            output_schema: json!({ "type": "object" }),
            handler: Arc::new(Echo),
        }
    }

    #[test]
    fn list_shape_gains_only_missing_records() {
        let current = json!([{ "name": "wpai.site_info", "custom": true }, { "label": "nameless" }]);
        let out = augment_collection(current, &[entry("wpai.site_info"), entry("wpai.create_page")]);

        let records = out.as_array().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["custom"], true);
        assert_eq!(records[2]["name"], "wpai.create_page");
    }

    #[test]
    fn map_shape_keeps_existing_entries() {
        let current = json!({ "wpai.site_info": { "owner": "other" } });
        let out = augment_collection(current, &[entry("wpai.site_info"), entry("wpai.set_option")]);

        let map = out.as_object().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["wpai.site_info"], json!({ "owner": "other" }));
        assert_eq!(map["wpai.set_option"]["name"], "wpai.set_option");
    }

    #[test]
    fn null_becomes_a_list_and_scalars_pass_through() {
        let out = augment_collection(Value::Null, &[entry("a"), entry("b")]);
        assert_eq!(out.as_array().map(Vec::len), Some(2));
        assert_eq!(augment_collection(json!(3), &[entry("a")]), json!(3));
    }
}
