//! Food Item model
//!
//! A library entry: either a plain ingredient measured in g/ml, or a meal
//! built in the cooking pot and measured in pieces.

use serde::{Deserialize, Serialize};

use super::validation::check_non_negative;
use super::{new_id, Nutrition, ValidationErrors};
use crate::nutrition::{scale_profile, with_kcal, Unit};

/// Library category used when none is given
pub const DEFAULT_LIBRARY_CATEGORY: &str = "other";

/// Ingredient or meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FoodKind {
    Ingredient,
    Meal {
        /// Weight one piece stands for
        #[serde(rename = "gramsPerPiece")]
        grams_per_piece: f64,
        /// Pot contents the meal was built from
        #[serde(default)]
        items: Vec<MealComponent>,
    },
}

/// One component of a saved meal, snapshotted at save time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealComponent {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub unit: Unit,
    pub per100: Nutrition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grams_per_piece: Option<f64>,
    pub max_at_save: f64,
}

/// A food item with a per-100 nutrition profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: String,
    #[serde(flatten)]
    pub kind: FoodKind,
    pub name: String,
    pub category: String,
    pub unit: Unit,
    pub max: f64,
    pub per100: Nutrition,
}

/// Data for creating or editing an ingredient (form input)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItemCreate {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub unit: String,
    pub max: f64,
    pub protein: f64,
    pub fat: f64,
    #[serde(default)]
    pub sat_fat: f64,
    pub carbs: f64,
    #[serde(default)]
    pub sugar: f64,
    #[serde(default)]
    pub fiber: f64,
    #[serde(default)]
    pub salt: f64,
    /// Manual kcal override; derived from macros when absent
    #[serde(default)]
    pub kcal: Option<f64>,
}

impl Default for FoodItemCreate {
    fn default() -> Self {
        Self {
            name: String::new(),
            category: None,
            unit: Unit::Gram.as_str().to_string(),
            max: Unit::Gram.default_max(),
            protein: 0.0,
            fat: 0.0,
            sat_fat: 0.0,
            carbs: 0.0,
            sugar: 0.0,
            fiber: 0.0,
            salt: 0.0,
            kcal: None,
        }
    }
}

/// Validated ingredient fields
struct IngredientFields {
    name: String,
    category: String,
    unit: Unit,
    max: f64,
    per100: Nutrition,
}

impl FoodItemCreate {
    /// Validate the form, collecting every problem
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        self.fields().map(|_| ())
    }

    fn fields(&self) -> Result<IngredientFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.push("Name is required.");
        }

        let unit = match Unit::from_str(&self.unit) {
            Some(u) if u.is_per_100() => Some(u),
            _ => {
                errors.push("Unit must be ml or g.");
                None
            }
        };

        if !self.max.is_finite() || self.max < 1.0 {
            errors.push("Slider max must be at least 1.");
        }

        let macros = [
            ("protein", self.protein),
            ("fat", self.fat),
            ("satFat", self.sat_fat),
            ("carbs", self.carbs),
            ("sugar", self.sugar),
            ("fiber", self.fiber),
            ("salt", self.salt),
        ];
        let mut all_valid = true;
        for (field, value) in macros {
            all_valid &= check_non_negative(&mut errors, field, value);
        }

        if all_valid {
            if self.sugar > self.carbs {
                errors.push("Sugar per 100 cannot exceed Carbs per 100.");
            }
            if self.sat_fat > self.fat {
                errors.push("Sat fat per 100 cannot exceed Fat per 100.");
            }
        }

        if let Some(kcal) = self.kcal {
            check_non_negative(&mut errors, "kcal", kcal);
        }

        errors.into_result()?;

        let per100 = Nutrition {
            kcal: 0.0,
            protein: self.protein,
            fat: self.fat,
            sat_fat: self.sat_fat,
            carbs: self.carbs,
            sugar: self.sugar,
            fiber: self.fiber,
            salt: self.salt,
        };

        Ok(IngredientFields {
            name,
            category: self
                .category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .unwrap_or(DEFAULT_LIBRARY_CATEGORY)
                .to_string(),
            unit: unit.unwrap_or_default(),
            max: self.max.floor(),
            per100: with_kcal(per100, self.kcal),
        })
    }
}

impl FoodItem {
    /// Build a new ingredient from validated form data
    pub fn new_ingredient(data: &FoodItemCreate) -> Result<Self, ValidationErrors> {
        let f = data.fields()?;
        Ok(Self {
            id: new_id(),
            kind: FoodKind::Ingredient,
            name: f.name,
            category: f.category,
            unit: f.unit,
            max: f.max,
            per100: f.per100,
        })
    }

    /// Overwrite this item's ingredient fields, keeping its id and kind
    pub fn apply_ingredient_update(&mut self, data: &FoodItemCreate) -> Result<(), ValidationErrors> {
        let f = data.fields()?;
        self.name = f.name;
        self.category = f.category;
        self.unit = f.unit;
        self.max = f.max;
        self.per100 = f.per100;
        Ok(())
    }

    pub fn is_meal(&self) -> bool {
        matches!(self.kind, FoodKind::Meal { .. })
    }

    pub fn type_str(&self) -> &'static str {
        match self.kind {
            FoodKind::Ingredient => "ingredient",
            FoodKind::Meal { .. } => "meal",
        }
    }

    /// Gram weight of one piece (meals only)
    pub fn grams_per_piece(&self) -> Option<f64> {
        match self.kind {
            FoodKind::Meal { grams_per_piece, .. } => Some(grams_per_piece),
            FoodKind::Ingredient => None,
        }
    }

    /// Convert an amount in this item's unit to grams/ml
    pub fn grams_for(&self, amount: f64) -> f64 {
        match self.grams_per_piece() {
            Some(gpp) => gpp * amount,
            None => amount,
        }
    }

    /// Nutrition for `amount` of this item in its own unit
    pub fn nutrition_for(&self, amount: f64) -> Nutrition {
        scale_profile(&self.per100, self.grams_for(amount))
    }

    /// Nutrition of a single piece of a meal
    pub fn per_piece(&self) -> Option<Nutrition> {
        self.grams_per_piece()
            .filter(|gpp| *gpp > 0.0)
            .map(|gpp| scale_profile(&self.per100, gpp))
    }

    /// Amount added to the pot by one click
    pub fn pot_increment(&self) -> f64 {
        if self.is_meal() {
            1.0
        } else {
            100.0
        }
    }

    /// Slider upper bound, falling back to the unit default
    pub fn effective_max(&self) -> f64 {
        if self.max.is_finite() && self.max > 0.0 {
            self.max
        } else {
            self.unit.default_max()
        }
    }

    /// Whether `name` matches this item's name, ignoring case and padding
    pub fn has_name(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn oats() -> FoodItemCreate {
        FoodItemCreate {
            name: "  Oats ".to_string(),
            category: Some("grains".to_string()),
            unit: "g".to_string(),
            max: 300.0,
            protein: 13.0,
            fat: 7.0,
            sat_fat: 1.2,
            carbs: 60.0,
            sugar: 1.0,
            fiber: 10.0,
            salt: 0.0,
            kcal: None,
        }
    }

    #[test]
    fn test_new_ingredient_derives_kcal() {
        let item = FoodItem::new_ingredient(&oats()).unwrap();
        assert_eq!(item.name, "Oats");
        assert_eq!(item.category, "grains");
        assert_eq!(item.unit, Unit::Gram);
        // 13*4 + 7*9 + 50*4 + 10*2
        assert!(approx(item.per100.kcal, 335.0));
        assert!(!item.is_meal());
    }

    #[test]
    fn test_manual_kcal_is_kept() {
        let item = FoodItem::new_ingredient(&FoodItemCreate { kcal: Some(350.0), ..oats() }).unwrap();
        assert!(approx(item.per100.kcal, 350.0));
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let data = FoodItemCreate {
            name: "   ".to_string(),
            unit: "piece".to_string(),
            max: 0.0,
            fat: -1.0,
            ..oats()
        };
        let err = FoodItem::new_ingredient(&data).unwrap_err();
        let messages = err.messages();
        assert!(messages.contains(&"Name is required.".to_string()));
        assert!(messages.contains(&"Unit must be ml or g.".to_string()));
        assert!(messages.contains(&"Slider max must be at least 1.".to_string()));
        assert!(messages.contains(&"fat must be a number ≥ 0.".to_string()));
    }

    #[test]
    fn test_sugar_cannot_exceed_carbs() {
        let err = FoodItemCreate { sugar: 70.0, ..oats() }.validate().unwrap_err();
        assert_eq!(err.messages(), ["Sugar per 100 cannot exceed Carbs per 100."]);
    }

    #[test]
    fn test_sat_fat_cannot_exceed_fat() {
        let err = FoodItemCreate { sat_fat: 8.0, ..oats() }.validate().unwrap_err();
        assert_eq!(err.messages(), ["Sat fat per 100 cannot exceed Fat per 100."]);
    }

    #[test]
    fn test_missing_category_defaults_to_other() {
        let item = FoodItem::new_ingredient(&FoodItemCreate { category: None, ..oats() }).unwrap();
        assert_eq!(item.category, DEFAULT_LIBRARY_CATEGORY);
    }

    #[test]
    fn test_meal_converts_pieces_to_grams() {
        let meal = FoodItem {
            id: "m1".to_string(),
            kind: FoodKind::Meal { grams_per_piece: 400.0, items: Vec::new() },
            name: "Stew".to_string(),
            category: "other".to_string(),
            unit: Unit::Piece,
            max: 10.0,
            per100: Nutrition { kcal: 80.0, protein: 5.0, ..Nutrition::zero() },
        };
        assert!(approx(meal.grams_for(2.0), 800.0));
        let n = meal.nutrition_for(2.0);
        assert!(approx(n.kcal, 640.0));
        assert!(approx(n.protein, 40.0));
        assert!(approx(meal.per_piece().unwrap().kcal, 320.0));
        assert_eq!(meal.pot_increment(), 1.0);
    }

    #[test]
    fn test_serialized_shape_is_tagged() {
        let item = FoodItem::new_ingredient(&oats()).unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "ingredient");
        assert_eq!(json["unit"], "g");
        assert_eq!(json["per100"]["satFat"], 1.2);

        let back: FoodItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_has_name_ignores_case() {
        let item = FoodItem::new_ingredient(&oats()).unwrap();
        assert!(item.has_name(" OATS"));
        assert!(!item.has_name("oat"));
    }
}
