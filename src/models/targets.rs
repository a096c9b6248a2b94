//! Daily targets
//!
//! Eight target values. `kcal` always follows from protein, fat, carbs and
//! fiber through the Atwater factors and cannot be set on its own.

use serde::{Deserialize, Serialize};

use super::validation::check_non_negative;
use super::{Nutrition, ValidationErrors};
use crate::nutrition::{kcal_from_macros, percent_of, MacroGrams};

/// Daily nutrition targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "TargetsRecord")]
pub struct DailyTargets {
    kcal: f64,
    pub protein: f64,
    pub fat: f64,
    pub sat_fat: f64,
    pub carbs: f64,
    pub sugar: f64,
    pub fiber: f64,
    pub salt: f64,
}

/// Stored shape; missing fields take the defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TargetsRecord {
    protein: f64,
    fat: f64,
    sat_fat: f64,
    carbs: f64,
    sugar: f64,
    fiber: f64,
    salt: f64,
}

impl Default for TargetsRecord {
    fn default() -> Self {
        Self {
            protein: 50.0,
            fat: 70.0,
            sat_fat: 20.0,
            carbs: 260.0,
            sugar: 90.0,
            fiber: 30.0,
            salt: 6.0,
        }
    }
}

impl From<TargetsRecord> for DailyTargets {
    fn from(r: TargetsRecord) -> Self {
        let mut t = Self {
            kcal: 0.0,
            protein: r.protein,
            fat: r.fat,
            sat_fat: r.sat_fat,
            carbs: r.carbs,
            sugar: r.sugar,
            fiber: r.fiber,
            salt: r.salt,
        };
        t.recompute_kcal();
        t
    }
}

impl Default for DailyTargets {
    fn default() -> Self {
        TargetsRecord::default().into()
    }
}

/// Partial targets edit; `None` leaves a field alone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetsUpdate {
    pub protein: Option<f64>,
    pub fat: Option<f64>,
    pub sat_fat: Option<f64>,
    pub carbs: Option<f64>,
    pub sugar: Option<f64>,
    pub fiber: Option<f64>,
    pub salt: Option<f64>,
}

impl DailyTargets {
    pub fn kcal(&self) -> f64 {
        self.kcal
    }

    fn recompute_kcal(&mut self) {
        self.kcal = kcal_from_macros(&MacroGrams {
            protein: self.protein,
            fat: self.fat,
            carbs: self.carbs,
            fiber: self.fiber,
            alcohol: 0.0,
        });
    }

    /// Apply an edit: every value must be a number ≥ 0 and is rounded to a
    /// whole number. Nothing changes when any value is invalid.
    pub fn apply(&mut self, update: &TargetsUpdate) -> Result<(), ValidationErrors> {
        let fields = [
            ("protein", update.protein),
            ("fat", update.fat),
            ("satFat", update.sat_fat),
            ("carbs", update.carbs),
            ("sugar", update.sugar),
            ("fiber", update.fiber),
            ("salt", update.salt),
        ];

        let mut errors = ValidationErrors::new();
        for (name, value) in fields {
            if let Some(v) = value {
                check_non_negative(&mut errors, name, v);
            }
        }
        errors.into_result()?;

        let whole = |v: f64| v.round().max(0.0);
        if let Some(v) = update.protein {
            self.protein = whole(v);
        }
        if let Some(v) = update.fat {
            self.fat = whole(v);
        }
        if let Some(v) = update.sat_fat {
            self.sat_fat = whole(v);
        }
        if let Some(v) = update.carbs {
            self.carbs = whole(v);
        }
        if let Some(v) = update.sugar {
            self.sugar = whole(v);
        }
        if let Some(v) = update.fiber {
            self.fiber = whole(v);
        }
        if let Some(v) = update.salt {
            self.salt = whole(v);
        }
        self.recompute_kcal();
        Ok(())
    }

    /// Target values as a `Nutrition` for field-wise comparisons
    pub fn as_nutrition(&self) -> Nutrition {
        Nutrition {
            kcal: self.kcal,
            protein: self.protein,
            fat: self.fat,
            sat_fat: self.sat_fat,
            carbs: self.carbs,
            sugar: self.sugar,
            fiber: self.fiber,
            salt: self.salt,
        }
    }
}

/// Integer percentage of each target reached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub kcal: i64,
    pub protein: i64,
    pub fat: i64,
    pub sat_fat: i64,
    pub carbs: i64,
    pub sugar: i64,
    pub fiber: i64,
    pub salt: i64,
}

impl Progress {
    pub fn of(totals: &Nutrition, targets: &DailyTargets) -> Self {
        let t = targets.as_nutrition();
        Self {
            kcal: percent_of(totals.kcal, t.kcal),
            protein: percent_of(totals.protein, t.protein),
            fat: percent_of(totals.fat, t.fat),
            sat_fat: percent_of(totals.sat_fat, t.sat_fat),
            carbs: percent_of(totals.carbs, t.carbs),
            sugar: percent_of(totals.sugar, t.sugar),
            fiber: percent_of(totals.fiber, t.fiber),
            salt: percent_of(totals.salt, t.salt),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_kcal_follows_macros() {
        let t = DailyTargets::default();
        // 50*4 + 70*9 + 230*4 + 30*2
        assert_eq!(t.kcal(), 1810.0);
        assert_eq!(t.salt, 6.0);
    }

    #[test]
    fn test_apply_rounds_and_recomputes() {
        let mut t = DailyTargets::default();
        t.apply(&TargetsUpdate { protein: Some(120.4), fiber: Some(0.0), ..Default::default() })
            .unwrap();
        assert_eq!(t.protein, 120.0);
        // 120*4 + 70*9 + 260*4
        assert_eq!(t.kcal(), 2150.0);
    }

    #[test]
    fn test_apply_rejects_negative_without_changes() {
        let mut t = DailyTargets::default();
        let err = t
            .apply(&TargetsUpdate { protein: Some(80.0), fat: Some(-1.0), ..Default::default() })
            .unwrap_err();
        assert_eq!(err.messages(), ["fat must be a number ≥ 0."]);
        assert_eq!(t, DailyTargets::default());
    }

    #[test]
    fn test_stored_kcal_is_ignored_on_load() {
        let t: DailyTargets = serde_json::from_str(r#"{"kcal": 9999, "protein": 100}"#).unwrap();
        assert_eq!(t.protein, 100.0);
        assert_eq!(t.fat, 70.0);
        assert_eq!(t.kcal(), 2010.0);
    }

    #[test]
    fn test_serialized_targets_include_kcal() {
        let json = serde_json::to_value(DailyTargets::default()).unwrap();
        assert_eq!(json["kcal"], 1810.0);
        assert_eq!(json["satFat"], 20.0);
    }

    #[test]
    fn test_progress_against_zero_target() {
        let mut t = DailyTargets::default();
        t.apply(&TargetsUpdate { salt: Some(0.0), ..Default::default() }).unwrap();
        let totals = Nutrition { salt: 3.0, protein: 75.0, ..Nutrition::zero() };
        let p = Progress::of(&totals, &t);
        assert_eq!(p.salt, 0);
        assert_eq!(p.protein, 150);
    }
}
