//! Upgrades for older stored and exported documents
//!
//! Documents before version 12 predate the fiber and salt fields. Upgrading
//! fills them with 0 on every per-100 profile and bumps the version.

use serde_json::{Map, Value};

/// Version written by this build
pub const CURRENT_VERSION: u64 = 12;

const LATE_FIELDS: [&str; 2] = ["fiber", "salt"];

/// Version of a document; missing or unreadable counts as 0
pub fn document_version(doc: &Value) -> u64 {
    doc.get("version").and_then(Value::as_u64).unwrap_or(0)
}

/// Bring a document up to `CURRENT_VERSION`. Non-objects pass through.
pub fn migrate(mut doc: Value) -> Value {
    let version = document_version(&doc);
    if version >= CURRENT_VERSION {
        return doc;
    }
    if let Value::Object(root) = &mut doc {
        for list in ["cards", "items"] {
            if let Some(Value::Array(entries)) = root.get_mut(list) {
                entries.iter_mut().for_each(fill_late_fields);
            }
        }
        root.insert("version".to_string(), Value::from(CURRENT_VERSION));
        tracing::debug!(from = version, to = CURRENT_VERSION, "Migrated document");
    }
    doc
}

fn fill_late_fields(entry: &mut Value) {
    let Some(Value::Object(per100)) = entry.get_mut("per100") else {
        return;
    };
    fill(per100);

    // meal components carry their own profiles
    if let Some(Value::Array(items)) = entry.get_mut("items") {
        for item in items.iter_mut() {
            if let Some(Value::Object(p)) = item.get_mut("per100") {
                fill(p);
            }
        }
    }
}

fn fill(per100: &mut Map<String, Value>) {
    for field in LATE_FIELDS {
        per100.entry(field).or_insert(Value::from(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_old_document_gains_fields() {
        let doc = json!({
            "version": 7,
            "cards": [{"per100": {"protein": 3, "salt": 0.2}}],
        });
        let out = migrate(doc);
        assert_eq!(out["version"], 12);
        assert_eq!(out["cards"][0]["per100"]["fiber"], 0);
        assert_eq!(out["cards"][0]["per100"]["salt"], 0.2);
    }

    #[test]
    fn test_meal_components_are_filled() {
        let doc = json!({
            "items": [{"per100": {}, "items": [{"per100": {"fat": 1}}]}],
        });
        let out = migrate(doc);
        assert_eq!(out["items"][0]["items"][0]["per100"]["fiber"], 0);
        assert_eq!(out["items"][0]["per100"]["salt"], 0);
    }

    #[test]
    fn test_current_document_untouched() {
        let doc = json!({"version": 12, "cards": [{"per100": {}}]});
        assert_eq!(migrate(doc.clone()), doc);
        assert_eq!(migrate(json!([1, 2])), json!([1, 2]));
    }
}
