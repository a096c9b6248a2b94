//! Library document
//!
//! Export writes `{format, version, exportedAt, items}`. Import accepts that
//! document or a bare array of items and merges: nameless items are skipped,
//! every imported item gets a fresh id, duplicates are left to
//! `Library::merge`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::lenient::{self, Per100Record};
use super::migrations::{migrate, CURRENT_VERSION};
use super::{timestamp, ImportError};
use crate::models::{new_id, FoodItem, FoodKind, Library, MealComponent, DEFAULT_LIBRARY_CATEGORY};
use crate::nutrition::{Unit, DEFAULT_INGREDIENT_MAX, DEFAULT_MEAL_MAX};

pub const LIBRARY_FORMAT: &str = "CalorieCalculatorLibrary";
pub const LIBRARY_DOCUMENT_VERSION: u64 = 1;

/// Exported library
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryDocument {
    pub format: String,
    pub version: u64,
    pub exported_at: String,
    pub items: Vec<FoodItem>,
}

pub fn export_library(library: &Library) -> LibraryDocument {
    export_library_at(library, Utc::now())
}

pub fn export_library_at(library: &Library, at: DateTime<Utc>) -> LibraryDocument {
    LibraryDocument {
        format: LIBRARY_FORMAT.to_string(),
        version: LIBRARY_DOCUMENT_VERSION,
        exported_at: timestamp(at),
        items: library.items().to_vec(),
    }
}

/// Items of an exported library, normalized and with fresh ids
pub fn parse_library_items(text: &str) -> Result<Vec<FoodItem>, ImportError> {
    let root: Value = serde_json::from_str(text)?;
    let list = match root {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("items") {
            Some(Value::Array(items)) => items,
            _ => return Err(ImportError::Schema("No items array found.".to_string())),
        },
        _ => return Err(ImportError::Schema("No items array found.".to_string())),
    };

    // exported libraries are versioned separately; fill late fields regardless
    let list = take_items(migrate(json!({ "items": list })));

    let items: Vec<FoodItem> = list.into_iter().filter_map(|v| normalize_item(v, true)).collect();
    tracing::info!(items = items.len(), "Parsed library import");
    Ok(items)
}

/// Stored library state: `{version, items}` with ids kept
pub fn library_state(library: &Library) -> Value {
    json!({ "version": CURRENT_VERSION, "items": library.items() })
}

/// Rebuild the library from stored state; a bare array is accepted too
pub fn restore_library(value: Value) -> Library {
    let doc = match value {
        Value::Array(items) => json!({ "items": items }),
        other => other,
    };
    let items = take_items(migrate(doc));
    Library::from_items(items.into_iter().filter_map(|v| normalize_item(v, false)).collect())
}

fn take_items(doc: Value) -> Vec<Value> {
    match doc {
        Value::Object(mut obj) => match obj.remove("items") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Stored or imported item, read forgivingly
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ItemRecord {
    #[serde(deserialize_with = "lenient::string")]
    id: String,
    #[serde(rename = "type", deserialize_with = "lenient::string")]
    kind: String,
    #[serde(deserialize_with = "lenient::string")]
    name: String,
    #[serde(deserialize_with = "lenient::string")]
    category: String,
    #[serde(deserialize_with = "lenient::string")]
    unit: String,
    #[serde(deserialize_with = "lenient::opt_number")]
    max: Option<f64>,
    #[serde(deserialize_with = "lenient::or_default")]
    per100: Per100Record,
    #[serde(deserialize_with = "lenient::number")]
    grams_per_piece: f64,
    #[serde(deserialize_with = "lenient::or_default")]
    items: Vec<MealComponent>,
}

fn normalize_item(value: Value, fresh_id: bool) -> Option<FoodItem> {
    let record: ItemRecord = serde_json::from_value(value).ok()?;
    let name = record.name.trim().to_string();
    if name.is_empty() {
        return None;
    }

    let is_meal = record.kind == "meal";
    let (kind, unit, default_max) = if is_meal {
        let kind = FoodKind::Meal {
            grams_per_piece: record.grams_per_piece.max(0.0).floor(),
            items: record.items,
        };
        (kind, Unit::Piece, DEFAULT_MEAL_MAX)
    } else {
        let unit = Unit::from_str(&record.unit)
            .filter(Unit::is_per_100)
            .unwrap_or_default();
        (FoodKind::Ingredient, unit, DEFAULT_INGREDIENT_MAX)
    };

    let max = record.max.unwrap_or(default_max).floor().max(1.0);
    let category = match record.category.trim() {
        "" => DEFAULT_LIBRARY_CATEGORY.to_string(),
        c => c.to_string(),
    };
    let id = if fresh_id || record.id.is_empty() {
        new_id()
    } else {
        record.id
    };

    Some(FoodItem {
        id,
        kind,
        name,
        category,
        unit,
        max,
        per100: record.per100.into_profile(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FoodItemCreate;
    use chrono::TimeZone;

    fn library() -> Library {
        let mut lib = Library::new();
        lib.add_ingredient(&FoodItemCreate {
            name: "Oats".to_string(),
            category: Some("grains".to_string()),
            protein: 13.0,
            fat: 7.0,
            carbs: 60.0,
            fiber: 10.0,
            ..Default::default()
        })
        .unwrap();
        lib
    }

    #[test]
    fn test_export_shape() {
        let at = Utc.with_ymd_and_hms(2024, 1, 9, 12, 0, 0).unwrap();
        let doc = export_library_at(&library(), at);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["format"], LIBRARY_FORMAT);
        assert_eq!(json["version"], 1);
        assert_eq!(json["exportedAt"], "2024-01-09T12:00:00.000Z");
        assert_eq!(json["items"][0]["type"], "ingredient");
        assert_eq!(json["items"][0]["per100"]["fiber"], 10.0);
    }

    #[test]
    fn test_import_assigns_fresh_ids() {
        let lib = library();
        let text = serde_json::to_string(&export_library(&lib)).unwrap();
        let items = parse_library_items(&text).unwrap();
        assert_eq!(items.len(), 1);
        assert_ne!(items[0].id, lib.items()[0].id);
        assert_eq!(items[0].per100, lib.items()[0].per100);
    }

    #[test]
    fn test_import_bare_array_and_normalizes() {
        let text = r#"[
            {"name": "  Soup ", "unit": "ml", "max": 0.5, "per100": {"protein": 2, "carbs": 5}},
            {"name": "", "per100": {}},
            {"name": "Stew", "type": "meal", "gramsPerPiece": 450.7, "per100": {"fat": 4}},
            {"name": "Dust", "unit": "piece"}
        ]"#;
        let items = parse_library_items(text).unwrap();
        assert_eq!(items.len(), 3);

        assert_eq!(items[0].name, "Soup");
        assert_eq!(items[0].unit, Unit::Milliliter);
        assert_eq!(items[0].max, 1.0);
        assert_eq!(items[0].category, DEFAULT_LIBRARY_CATEGORY);
        assert_eq!(items[0].per100.kcal, 28.0);
        assert_eq!(items[0].per100.salt, 0.0);

        assert!(items[1].is_meal());
        assert_eq!(items[1].grams_per_piece(), Some(450.0));
        assert_eq!(items[1].max, DEFAULT_MEAL_MAX);

        assert_eq!(items[2].unit, Unit::Gram);
    }

    #[test]
    fn test_import_rejects_non_library() {
        assert!(matches!(parse_library_items(r#"{"cards": []}"#), Err(ImportError::Schema(_))));
        assert!(matches!(parse_library_items("not json"), Err(ImportError::Parse(_))));
    }

    #[test]
    fn test_state_round_trip_keeps_ids() {
        let lib = library();
        let restored = restore_library(library_state(&lib));
        assert_eq!(restored, lib);
    }

    #[test]
    fn test_restore_old_state() {
        let stored = json!([{"id": "x1", "name": "Egg", "unit": "g", "max": 300,
                             "per100": {"protein": 13, "fat": 10, "carbs": 1, "sugar": 1}}]);
        let lib = restore_library(stored);
        let egg = lib.get("x1").unwrap();
        assert_eq!(egg.per100.fiber, 0.0);
        // 13*4 + 10*9 + 1*4
        assert_eq!(egg.per100.kcal, 146.0);
    }
}
