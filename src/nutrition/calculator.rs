//! Nutrition calculator
//!
//! Pure functions: macro grams to kcal (Atwater factors), per-100 scaling,
//! aggregation over portions, and percent-of-target.
//!
//! The canonical stored kcal is rounded to one decimal place. Display code
//! may round again to whole kcal.

use crate::models::{round1, Nutrition};

/// kcal per gram of protein
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
/// kcal per gram of fat
pub const KCAL_PER_G_FAT: f64 = 9.0;
/// kcal per gram of net carbohydrate
pub const KCAL_PER_G_CARBS: f64 = 4.0;
/// kcal per gram of fiber
pub const KCAL_PER_G_FIBER: f64 = 2.0;
/// kcal per gram of alcohol
pub const KCAL_PER_G_ALCOHOL: f64 = 7.0;

/// Macro grams that carry energy
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MacroGrams {
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub fiber: f64,
    pub alcohol: f64,
}

impl From<&Nutrition> for MacroGrams {
    fn from(n: &Nutrition) -> Self {
        Self {
            protein: n.protein,
            fat: n.fat,
            carbs: n.carbs,
            fiber: n.fiber,
            alcohol: 0.0,
        }
    }
}

/// Treat missing/non-numeric values as zero
fn coalesce(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// kcal from macros, rounded to one decimal place
///
/// Net carbs are `carbs - fiber`, floored at zero; fiber counts 2 kcal/g.
pub fn kcal_from_macros(m: &MacroGrams) -> f64 {
    let protein = coalesce(m.protein);
    let fat = coalesce(m.fat);
    let carbs = coalesce(m.carbs);
    let fiber = coalesce(m.fiber);
    let alcohol = coalesce(m.alcohol);

    let net_carbs = (carbs - fiber).max(0.0);
    let kcal = protein * KCAL_PER_G_PROTEIN
        + fat * KCAL_PER_G_FAT
        + net_carbs * KCAL_PER_G_CARBS
        + fiber * KCAL_PER_G_FIBER
        + alcohol * KCAL_PER_G_ALCOHOL;

    round1(kcal)
}

/// Derive kcal for a profile from its macros, ignoring any stored kcal
pub fn derive_kcal(profile: &Nutrition) -> f64 {
    kcal_from_macros(&MacroGrams::from(profile))
}

/// Resolve a profile's kcal once: keep a supplied value, derive otherwise
pub fn with_kcal(mut profile: Nutrition, kcal: Option<f64>) -> Nutrition {
    profile.kcal = match kcal {
        Some(k) if k.is_finite() && k >= 0.0 => round1(k),
        _ => derive_kcal(&profile),
    };
    profile
}

/// Scale a per-100 profile to `amount` grams/ml
///
/// Every field is multiplied by `amount / 100`. Negative and non-finite
/// inputs contribute zero, so no field of the result is negative.
pub fn scale_profile(profile: &Nutrition, amount: f64) -> Nutrition {
    let amount = coalesce(amount).max(0.0);
    profile.sanitized().scale(amount / 100.0)
}

/// Something that contributes a scaled profile to a total
pub trait Portion {
    /// Per-100 profile
    fn per100(&self) -> &Nutrition;

    /// Consumed amount in the profile's base unit (grams or ml)
    fn base_amount(&self) -> f64;

    /// Scaled contribution of this portion
    fn nutrition(&self) -> Nutrition {
        scale_profile(self.per100(), self.base_amount())
    }
}

impl Portion for (Nutrition, f64) {
    fn per100(&self) -> &Nutrition {
        &self.0
    }

    fn base_amount(&self) -> f64 {
        self.1
    }
}

/// Sum the scaled contribution of every portion, field by field
pub fn aggregate<'a, P, I>(portions: I) -> Nutrition
where
    P: Portion + 'a,
    I: IntoIterator<Item = &'a P>,
{
    portions.into_iter().map(|p| p.nutrition()).sum()
}

/// Integer percentage of a target; zero when the target is not positive
///
/// Not clamped: exceeding the target yields more than 100.
pub fn percent_of(value: f64, target: f64) -> i64 {
    if !value.is_finite() || !target.is_finite() || target <= 0.0 {
        return 0;
    }
    (value / target * 100.0).round() as i64
}
