//! Shared nutrition data structure
//!
//! Used for per-100 profiles, scaled portions, and day/category totals.

use serde::{Deserialize, Serialize};

/// Nutritional information
///
/// As a profile this is "per 100 g/ml"; as a result of scaling it is the
/// absolute amount eaten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nutrition {
    pub kcal: f64,
    pub protein: f64,      // grams
    pub fat: f64,          // grams
    pub sat_fat: f64,      // grams
    pub carbs: f64,        // grams
    pub sugar: f64,        // grams
    pub fiber: f64,        // grams
    pub salt: f64,         // grams
}

/// Round to one decimal place
pub fn round1(n: f64) -> f64 {
    if !n.is_finite() {
        return 0.0;
    }
    (n * 10.0).round() / 10.0
}

impl Nutrition {
    /// Create a new Nutrition with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale nutrition values by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            kcal: self.kcal * multiplier,
            protein: self.protein * multiplier,
            fat: self.fat * multiplier,
            sat_fat: self.sat_fat * multiplier,
            carbs: self.carbs * multiplier,
            sugar: self.sugar * multiplier,
            fiber: self.fiber * multiplier,
            salt: self.salt * multiplier,
        }
    }

    /// Add another nutrition to this one
    pub fn add(&self, other: &Nutrition) -> Self {
        Self {
            kcal: self.kcal + other.kcal,
            protein: self.protein + other.protein,
            fat: self.fat + other.fat,
            sat_fat: self.sat_fat + other.sat_fat,
            carbs: self.carbs + other.carbs,
            sugar: self.sugar + other.sugar,
            fiber: self.fiber + other.fiber,
            salt: self.salt + other.salt,
        }
    }

    /// Apply `f` to every field
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            kcal: f(self.kcal),
            protein: f(self.protein),
            fat: f(self.fat),
            sat_fat: f(self.sat_fat),
            carbs: f(self.carbs),
            sugar: f(self.sugar),
            fiber: f(self.fiber),
            salt: f(self.salt),
        }
    }

    /// Every field rounded to one decimal place
    pub fn rounded(&self) -> Self {
        self.map(round1)
    }

    /// Replace non-finite or negative fields with zero
    pub fn sanitized(&self) -> Self {
        self.map(|v| if v.is_finite() && v > 0.0 { v } else { 0.0 })
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

impl std::ops::Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition::add(&self, &other)
    }
}

impl std::ops::Mul<f64> for Nutrition {
    type Output = Nutrition;

    fn mul(self, multiplier: f64) -> Nutrition {
        self.scale(multiplier)
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::zero(), |acc, n| acc + n)
    }
}
