//! Cooking pot
//!
//! Scratch area for combining library items into a new meal (or a new
//! ingredient with a blended per-100 profile). Lines reference library items
//! by id; lines whose item was deleted are skipped.

use serde::{Deserialize, Serialize};

use super::{new_id, FoodItem, FoodItemCreate, FoodKind, Library, MealComponent, Nutrition};
use crate::nutrition::{clamp_amount, snap_amount, Unit, DEFAULT_MEAL_MAX};

/// Library category given to meals built in the pot
pub const MEAL_CATEGORY: &str = "other";

/// One library item in the pot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotLine {
    pub id: String,
    pub amount: f64,
    /// Upper bound carried over from a saved meal component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

/// Pot contents and the meal being edited, if any
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookingPot {
    #[serde(default)]
    lines: Vec<PotLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    editing_meal_id: Option<String>,
}

/// Combined weight and nutrition of the pot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PotTotals {
    pub total_grams: f64,
    pub nutrition: Nutrition,
}

impl CookingPot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[PotLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Id of the library meal this pot was loaded from
    pub fn editing_meal_id(&self) -> Option<&str> {
        self.editing_meal_id.as_deref()
    }

    /// One click on a library card: +100 g/ml or +1 piece, capped at the item's max
    pub fn add_item(&mut self, item: &FoodItem) {
        let inc = item.pot_increment();
        match self.lines.iter_mut().find(|l| l.id == item.id) {
            Some(line) => {
                let max = line.max.unwrap_or_else(|| item.effective_max());
                line.amount = clamp_amount(line.amount + inc, max);
            }
            None => self.lines.push(PotLine {
                id: item.id.clone(),
                amount: clamp_amount(inc, item.effective_max()),
                max: None,
            }),
        }
    }

    /// Slider commit for a pot line
    pub fn set_amount(&mut self, id: &str, amount: f64, library: &Library) -> bool {
        let Some(line) = self.lines.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        let max = line
            .max
            .or_else(|| library.get(id).map(FoodItem::effective_max))
            .unwrap_or(0.0);
        line.amount = clamp_amount(amount, max);
        true
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != id);
        self.lines.len() != before
    }

    /// Empty the pot and leave meal-edit mode
    pub fn clear(&mut self) {
        self.lines.clear();
        self.editing_meal_id = None;
    }

    /// Lines joined with their library items
    fn resolved<'a>(&'a self, library: &'a Library) -> impl Iterator<Item = (&'a PotLine, &'a FoodItem)> + 'a {
        self.lines
            .iter()
            .filter_map(move |line| library.get(&line.id).map(|item| (line, item)))
    }

    pub fn totals(&self, library: &Library) -> PotTotals {
        self.resolved(library).fold(PotTotals::default(), |acc, (line, item)| PotTotals {
            total_grams: acc.total_grams + item.grams_for(line.amount),
            nutrition: acc.nutrition + item.nutrition_for(line.amount),
        })
    }

    /// Per-100 profile of the blended pot, or `None` when it weighs nothing
    pub fn per100(&self, library: &Library) -> Option<Nutrition> {
        let totals = self.totals(library);
        if totals.total_grams <= 0.0 {
            return None;
        }
        Some(totals.nutrition.scale(100.0 / totals.total_grams).rounded())
    }

    /// Prefilled ingredient form from the pot's per-100 profile
    pub fn ingredient_prefill(&self, library: &Library) -> Option<FoodItemCreate> {
        let p = self.per100(library)?;
        Some(FoodItemCreate {
            protein: p.protein,
            fat: p.fat,
            sat_fat: p.sat_fat,
            carbs: p.carbs,
            sugar: p.sugar,
            fiber: p.fiber,
            salt: p.salt,
            kcal: Some(p.kcal),
            ..Default::default()
        })
    }

    /// Build a meal from the pot: one piece is the whole pot
    pub fn build_meal(&self, name: &str, library: &Library) -> Option<FoodItem> {
        if self.lines.is_empty() {
            return None;
        }

        let components: Vec<MealComponent> = self
            .resolved(library)
            .map(|(line, item)| MealComponent {
                id: item.id.clone(),
                name: item.name.clone(),
                amount: line.amount,
                unit: if item.is_meal() { Unit::Piece } else { item.unit },
                per100: item.per100,
                grams_per_piece: item.grams_per_piece(),
                max_at_save: item.effective_max(),
            })
            .collect();

        let totals = self.totals(library);
        let per100 = if totals.total_grams > 0.0 {
            totals.nutrition.scale(100.0 / totals.total_grams).rounded()
        } else {
            Nutrition::zero()
        };

        Some(FoodItem {
            id: new_id(),
            kind: FoodKind::Meal {
                grams_per_piece: totals.total_grams.round(),
                items: components,
            },
            name: name.trim().to_string(),
            category: MEAL_CATEGORY.to_string(),
            unit: Unit::Piece,
            max: DEFAULT_MEAL_MAX,
            per100,
        })
    }

    /// Load a saved meal's components back into a pot for editing
    ///
    /// Amounts are snapped to the slider step and clamped to the max stored
    /// with each component.
    pub fn load_meal(meal: &FoodItem, library: &Library) -> Option<Self> {
        let FoodKind::Meal { ref items, .. } = meal.kind else {
            return None;
        };

        let lines = items
            .iter()
            .map(|component| {
                let lib_item = library.get(&component.id);
                let is_meal = lib_item.map(FoodItem::is_meal).unwrap_or(component.unit == Unit::Piece);
                let unit = if is_meal { Unit::Piece } else { component.unit };
                let max = if component.max_at_save.is_finite() && component.max_at_save > 0.0 {
                    component.max_at_save
                } else {
                    lib_item.map(FoodItem::effective_max).unwrap_or_else(|| unit.default_max())
                };
                PotLine {
                    id: component.id.clone(),
                    amount: snap_amount(component.amount, unit, max),
                    max: Some(max),
                }
            })
            .collect();

        Some(Self {
            lines,
            editing_meal_id: Some(meal.id.clone()),
        })
    }
}
