//! Day document
//!
//! The exported day is `{version, exportedAt, totals, cards}`. Import is
//! strict: the first shape problem rejects the whole file and nothing is
//! applied. Restoring stored state is lenient instead.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient::{self, Per100Record};
use super::migrations::{migrate, CURRENT_VERSION};
use super::{timestamp, ImportError};
use crate::models::{new_id, round1, Category, DayBoard, DayEntry, Nutrition};
use crate::nutrition::{clamp_amount, with_kcal, Unit};

/// Version stamped on exported day documents
pub const DAY_DOCUMENT_VERSION: u64 = CURRENT_VERSION;

const REQUIRED_STRINGS: [&str; 4] = ["id", "name", "category", "unit"];
const REQUIRED_MACROS: [&str; 4] = ["protein", "fat", "carbs", "sugar"];
const OPTIONAL_MACROS: [&str; 4] = ["satFat", "fiber", "salt", "kcal"];

/// Exported day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayDocument {
    pub version: u64,
    pub exported_at: String,
    pub totals: ExportTotals,
    pub cards: Vec<DayEntry>,
}

/// Day totals as written to a document: whole kcal, macros to 1 dp
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTotals {
    pub kcal: i64,
    pub protein: f64,
    pub fat: f64,
    pub sat_fat: f64,
    pub carbs: f64,
    pub sugar: f64,
    pub fiber: f64,
    pub salt: f64,
}

impl From<&Nutrition> for ExportTotals {
    fn from(t: &Nutrition) -> Self {
        Self {
            kcal: t.kcal.round() as i64,
            protein: round1(t.protein),
            fat: round1(t.fat),
            sat_fat: round1(t.sat_fat),
            carbs: round1(t.carbs),
            sugar: round1(t.sugar),
            fiber: round1(t.fiber),
            salt: round1(t.salt),
        }
    }
}

pub fn export_day(board: &DayBoard) -> DayDocument {
    export_day_at(board, Utc::now())
}

pub fn export_day_at(board: &DayBoard, at: DateTime<Utc>) -> DayDocument {
    DayDocument {
        version: DAY_DOCUMENT_VERSION,
        exported_at: timestamp(at),
        totals: ExportTotals::from(&board.totals()),
        cards: board.entries().to_vec(),
    }
}

/// Parse and validate an exported day. The board is replaced wholesale by
/// the caller; nothing is merged.
pub fn import_day(text: &str) -> Result<DayBoard, ImportError> {
    let root: Value = serde_json::from_str(text)?;
    validate_day(&root).map_err(ImportError::Schema)?;
    let board = normalize(migrate(root));
    tracing::info!(cards = board.len(), "Imported day");
    Ok(board)
}

/// Check a parsed day document; the message names the first offending field
pub fn validate_day(root: &Value) -> Result<(), String> {
    let Value::Object(root) = root else {
        return Err("Root is not an object.".to_string());
    };
    let Some(Value::Array(cards)) = root.get("cards") else {
        return Err("Missing 'cards' array.".to_string());
    };
    let mut ids = HashSet::new();
    for (i, card) in cards.iter().enumerate() {
        let path = format!("cards[{}]", i);
        validate_card(&path, card)?;
        if !ids.insert(card["id"].as_str().unwrap_or_default()) {
            return Err(format!("{}.id duplicate", path));
        }
    }
    Ok(())
}

fn validate_card(path: &str, card: &Value) -> Result<(), String> {
    let Value::Object(card) = card else {
        return Err(format!("{} must be an object", path));
    };

    for k in REQUIRED_STRINGS {
        if !card.get(k).is_some_and(Value::is_string) {
            return Err(format!("{}.{} must be a string", path, k));
        }
    }
    for k in ["max", "amount"] {
        if !is_number(card.get(k)) {
            return Err(format!("{}.{} must be a number", path, k));
        }
    }

    let Some(Value::Object(per100)) = card.get("per100") else {
        return Err(format!("{}.per100 missing", path));
    };
    for k in REQUIRED_MACROS {
        if !is_number(per100.get(k)) {
            return Err(format!("{}.per100.{} must be a number", path, k));
        }
    }
    for k in OPTIONAL_MACROS {
        if per100.get(k).is_some_and(|v| !v.is_number()) {
            return Err(format!("{}.per100.{} must be a number if present", path, k));
        }
    }

    let category = str_field(card, "category");
    if !Category::ALL.iter().any(|c| c.as_str() == category) {
        return Err(format!("{}.category invalid", path));
    }

    match str_field(card, "unit") {
        "g" | "ml" => Ok(()),
        // pieces only make sense with a weight per piece
        "piece" if is_number(card.get("gramsPerPiece")) => Ok(()),
        "piece" => Err(format!("{}.gramsPerPiece must be a number", path)),
        _ => Err(format!("{}.unit must be 'ml' or 'g'", path)),
    }
}

fn is_number(v: Option<&Value>) -> bool {
    v.is_some_and(Value::is_number)
}

fn str_field<'a>(obj: &'a Map<String, Value>, key: &str) -> &'a str {
    obj.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// Rebuild a board from stored state, repairing what can be repaired
///
/// Unknown categories become `extra`, missing orders are assigned per
/// category in encounter order, missing optional values count as 0.
/// Amounts are clamped to `[0, max]` and repeated ids get a fresh one.
pub fn restore_day(value: Value) -> DayBoard {
    normalize(migrate(value))
}

/// Demo board for a fresh install
pub fn seed_day() -> DayBoard {
    let milk = Nutrition {
        protein: 3.4,
        fat: 3.6,
        sat_fat: 2.3,
        carbs: 4.8,
        sugar: 4.8,
        fiber: 0.0,
        salt: 0.1,
        ..Nutrition::zero()
    };
    let rice = Nutrition {
        protein: 2.7,
        fat: 0.3,
        sat_fat: 0.1,
        carbs: 28.0,
        sugar: 0.1,
        fiber: 0.4,
        salt: 0.0,
        ..Nutrition::zero()
    };
    DayBoard::from_entries(vec![
        seed_entry("Milk (3.5%)", Category::Breakfast, Unit::Milliliter, 1000.0, 250.0, milk),
        seed_entry("Rice (cooked)", Category::Lunch, Unit::Gram, 500.0, 200.0, rice),
    ])
}

fn seed_entry(name: &str, category: Category, unit: Unit, max: f64, amount: f64, per100: Nutrition) -> DayEntry {
    DayEntry {
        id: new_id(),
        name: name.to_string(),
        category,
        unit,
        max,
        amount,
        order: 0,
        per100: with_kcal(per100, None),
        grams_per_piece: None,
    }
}

/// Stored card, read forgivingly
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CardRecord {
    #[serde(deserialize_with = "lenient::string")]
    id: String,
    #[serde(deserialize_with = "lenient::string")]
    name: String,
    #[serde(deserialize_with = "lenient::string")]
    category: String,
    #[serde(deserialize_with = "lenient::string")]
    unit: String,
    #[serde(deserialize_with = "lenient::number")]
    max: f64,
    #[serde(deserialize_with = "lenient::number")]
    amount: f64,
    #[serde(deserialize_with = "lenient::opt_number")]
    order: Option<f64>,
    #[serde(deserialize_with = "lenient::or_default")]
    per100: Per100Record,
    #[serde(deserialize_with = "lenient::opt_number")]
    grams_per_piece: Option<f64>,
}

fn normalize(root: Value) -> DayBoard {
    let cards = match root {
        Value::Object(mut obj) => match obj.remove("cards") {
            Some(Value::Array(cards)) => cards,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    let mut next_order: HashMap<Category, u32> = HashMap::new();
    let mut seen: HashSet<String> = HashSet::new();
    let entries = cards
        .into_iter()
        .filter_map(|card| match serde_json::from_value::<CardRecord>(card) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping unreadable card");
                None
            }
        })
        .map(|record| {
            let category = Category::from_str_or_extra(&record.category);
            let order = match record.order.filter(|o| *o >= 0.0) {
                Some(o) => o.floor() as u32,
                None => {
                    let slot = next_order.entry(category).or_insert(0);
                    let o = *slot;
                    *slot += 1;
                    o
                }
            };
            let grams_per_piece = record.grams_per_piece.map(|g| g.max(0.0));
            let unit = match Unit::from_str(&record.unit) {
                Some(Unit::Piece) if grams_per_piece.is_none() => Unit::Gram,
                Some(unit) => unit,
                None => Unit::Gram,
            };
            let max = if record.max > 0.0 { record.max } else { unit.default_max() };
            let id = if record.id.is_empty() || seen.contains(&record.id) {
                new_id()
            } else {
                record.id
            };
            seen.insert(id.clone());
            DayEntry {
                id,
                name: record.name,
                category,
                unit,
                max,
                amount: clamp_amount(record.amount, max),
                order,
                per100: record.per100.into_profile(),
                grams_per_piece: if unit == Unit::Piece { grams_per_piece } else { None },
            }
        })
        .collect();

    DayBoard::from_entries(entries)
}
