//! Day Entry model
//!
//! A food placed on a day board. The food's profile is copied in when the
//! entry is created; later library edits do not reach it.

use serde::{Deserialize, Serialize};

use super::{new_id, Category, FoodItem, Nutrition};
use crate::nutrition::{clamp_amount, Portion, Unit};

/// A food card on the day board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayEntry {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub unit: Unit,
    pub max: f64,
    pub amount: f64,
    pub order: u32,
    pub per100: Nutrition,
    /// Set for meal entries measured in pieces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grams_per_piece: Option<f64>,
}

/// Data for editing an entry in place
#[derive(Debug, Clone, Default)]
pub struct DayEntryUpdate {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub unit: Option<Unit>,
    pub max: Option<f64>,
    pub per100: Option<Nutrition>,
}

impl DayEntry {
    /// Snapshot a library item into a new entry; `order` is assigned on insert
    pub fn from_food(item: &FoodItem, category: Category, amount: f64) -> Self {
        let max = item.effective_max();
        Self {
            id: new_id(),
            name: item.name.clone(),
            category,
            unit: item.unit,
            max,
            amount: clamp_amount(amount, max),
            order: 0,
            per100: item.per100,
            grams_per_piece: item.grams_per_piece(),
        }
    }

    pub fn is_meal(&self) -> bool {
        self.unit == Unit::Piece
    }

    /// Consumed grams/ml; piece amounts go through `grams_per_piece`
    pub fn grams(&self) -> f64 {
        if self.is_meal() {
            self.grams_per_piece.unwrap_or(0.0) * self.amount
        } else {
            self.amount
        }
    }

    /// Nutrition of one piece, for meal entries
    pub fn per_piece(&self) -> Option<Nutrition> {
        if !self.is_meal() {
            return None;
        }
        let gpp = self.grams_per_piece.unwrap_or(0.0);
        Some((self.per100, gpp).nutrition())
    }
}

impl Portion for DayEntry {
    fn per100(&self) -> &Nutrition {
        &self.per100
    }

    fn base_amount(&self) -> f64 {
        self.grams()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FoodKind;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn soup() -> FoodItem {
        FoodItem {
            id: "soup".to_string(),
            kind: FoodKind::Meal { grams_per_piece: 350.0, items: Vec::new() },
            name: "Soup".to_string(),
            category: "other".to_string(),
            unit: Unit::Piece,
            max: 10.0,
            per100: Nutrition { kcal: 40.0, protein: 2.0, ..Nutrition::zero() },
        }
    }

    #[test]
    fn test_from_food_snapshots_profile() {
        let mut item = soup();
        let entry = DayEntry::from_food(&item, Category::Dinner, 2.0);
        item.per100.kcal = 999.0;

        assert_eq!(entry.per100.kcal, 40.0);
        assert_eq!(entry.category, Category::Dinner);
        assert_eq!(entry.grams_per_piece, Some(350.0));
        assert_ne!(entry.id, item.id);
    }

    #[test]
    fn test_meal_entry_scales_by_pieces() {
        let entry = DayEntry::from_food(&soup(), Category::Dinner, 2.0);
        assert!(approx(entry.grams(), 700.0));
        assert!(approx(entry.nutrition().kcal, 280.0));
        assert!(approx(entry.per_piece().unwrap().kcal, 140.0));
    }

    #[test]
    fn test_amount_is_clamped_to_max() {
        let entry = DayEntry::from_food(&soup(), Category::Lunch, 25.0);
        assert_eq!(entry.amount, 10.0);
    }

    #[test]
    fn test_grams_per_piece_is_omitted_for_ingredients() {
        let entry = DayEntry {
            id: "a".to_string(),
            name: "Rice".to_string(),
            category: Category::Lunch,
            unit: Unit::Gram,
            max: 500.0,
            amount: 200.0,
            order: 0,
            per100: Nutrition::zero(),
            grams_per_piece: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("gramsPerPiece").is_none());
        assert_eq!(json["category"], "lunch");
        assert!(entry.per_piece().is_none());
    }
}
